//! Ledger aggregation and financial statement engine for Folio.
//!
//! This crate contains pure report logic with ZERO file, network, or
//! database dependencies. It reads an immutable [`LedgerSnapshot`] and
//! returns report-shaped values; it never posts, persists, or reads the clock.
//!
//! # Modules
//!
//! - `ledger` - Account classification, period filtering, balance aggregation
//! - `reports` - Statement builders, aging summaries, request dispatch
//! - `snapshot` - The input snapshot consumed by every report

pub mod ledger;
pub mod reports;
pub mod snapshot;

pub use snapshot::LedgerSnapshot;
