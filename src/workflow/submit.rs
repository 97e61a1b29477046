use crate::dispatch::DispatchOptions;
use crate::error::Result;
use crate::host::types::PickItem;
use crate::workflow::changelists::pending_changelists;
use crate::workflow::{Chain, WorkflowOutcome};

/// Pick one of the user's pending changelists and submit it.
pub async fn submit(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    let changelists = pending_changelists(chain).await?;
    if changelists.is_empty() {
        let message = "There are no pending changelists".to_string();
        chain.app().dispatcher.show_panel(&message).await;
        return Ok(WorkflowOutcome::NothingFound { message });
    }

    let items = changelists
        .iter()
        .map(|cl| PickItem::single(cl.label()))
        .collect();
    let Some(picked) = chain.host().pick(items).await.and_then(|index| changelists.get(index)) else {
        return Ok(WorkflowOutcome::Cancelled);
    };

    let number = &picked.number;
    let output = chain
        .run(&["submit", "-c", number], DispatchOptions::new())
        .await?;
    chain.app().dispatcher.show_panel(&output).await;
    Ok(WorkflowOutcome::Completed)
}

/// Every pending changelist of the current user, shown in the output panel.
pub async fn list_pending_changelists(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    let changelists = pending_changelists(chain).await?;
    let text = if changelists.is_empty() {
        "There are no pending changelists".to_string()
    } else {
        changelists
            .iter()
            .map(|cl| cl.label())
            .collect::<Vec<_>>()
            .join("\n")
    };
    chain.app().dispatcher.show_panel(&text).await;
    Ok(WorkflowOutcome::Changelists(changelists))
}
