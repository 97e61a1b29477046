use crate::dispatch::DispatchOptions;
use crate::error::Result;
use crate::host::types::InputRequest;
use crate::workflow::{Chain, WorkflowOutcome};

/// Reply to `p4 logout` when there was no ticket to drop.
pub const NOT_LOGGED_IN_ERROR: &str = "Perforce password (P4PASSWD) invalid or unset.";

/// Drop any ticket, then store the new password with `p4 set`.
pub async fn login(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    let Some(password) = chain
        .host()
        .input(InputRequest::new("Enter Perforce Password", ""))
        .await
    else {
        return Ok(WorkflowOutcome::Cancelled);
    };

    chain
        .run(
            &["logout"],
            DispatchOptions::new().allow_error(NOT_LOGGED_IN_ERROR),
        )
        .await?;

    let assignment = format!("P4PASSWD={password}");
    chain
        .run(
            &["set", &assignment],
            DispatchOptions::new().secret(password.as_str()),
        )
        .await?;
    tracing::info!("Stored Perforce password");
    Ok(WorkflowOutcome::Completed)
}

pub async fn logout(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    chain.run(&["set", "P4PASSWD="], DispatchOptions::new()).await?;
    tracing::info!("Cleared Perforce password");
    Ok(WorkflowOutcome::Completed)
}
