//! Training-time feature allow-list gate.
//!
//! Applied to the column set of the raw dataset before any encoding or
//! fitting. The target column is not a feature and is set aside first.

use advisor_core::schema::enforce_allow_list;
use advisor_core::{GovernanceViolationError, TARGET_NAME};

/// Reject a dataset whose feature columns are not exactly the allow-list.
pub fn check_dataset_columns<S: AsRef<str>>(
    columns: &[S],
) -> Result<(), GovernanceViolationError> {
    let features: Vec<&str> = columns
        .iter()
        .map(|c| c.as_ref())
        .filter(|c| *c != TARGET_NAME)
        .collect();
    match enforce_allow_list(&features) {
        Ok(()) => {
            tracing::info!(columns = features.len(), "feature allow-list satisfied");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, "feature allow-list violated; training halted");
            Err(e)
        }
    }
}
