//! Report error types.

use folio_shared::AppError;
use folio_shared::types::AccountId;
use thiserror::Error;

use crate::ledger::LedgerError;

/// Errors that can occur during report generation.
///
/// Data-quality problems (unbalanced books, unreconciled cash) are never
/// errors; they are flagged on the report itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// The snapshot could not be resolved (unknown type, dangling line,
    /// invalid range).
    #[error(transparent)]
    Configuration(#[from] LedgerError),

    /// Selected account is not in the chart of accounts.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),
}

impl ReportError {
    /// Returns true if the failure comes from bad ledger configuration rather
    /// than a bad request.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(err) if !matches!(err, LedgerError::InvalidDateRange { .. })
        )
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match &err {
            ReportError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            ReportError::Configuration(_) if err.is_configuration() => {
                Self::LedgerConfiguration(err.to_string())
            }
            ReportError::Configuration(_) => Self::InvalidInput(err.to_string()),
        }
    }
}
