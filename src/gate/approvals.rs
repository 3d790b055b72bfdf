//! Approval counting

use crate::platform::PlatformService;
use crate::pr_ref::PrRef;
use crate::types::ReviewState;
use tracing::{debug, error};

/// Count approving reviews on a PR
///
/// Every `APPROVED` review counts, including repeat approvals by the same
/// reviewer. Returns 0 when the reviews cannot be fetched.
pub async fn count_approvals(platform: &dyn PlatformService, pr: &PrRef) -> u32 {
    match platform.list_reviews(pr).await {
        Ok(reviews) => {
            let approvers: Vec<&str> = reviews
                .iter()
                .filter(|r| r.state == ReviewState::Approved)
                .map(|r| r.reviewer.as_deref().unwrap_or("ghost"))
                .collect();
            let approvals = u32::try_from(approvers.len()).unwrap_or(u32::MAX);
            debug!(%pr, approvals, ?approvers, "counted approvals");
            approvals
        }
        Err(e) => {
            error!(%pr, error = %e, "failed to fetch reviews, counting zero approvals");
            0
        }
    }
}
