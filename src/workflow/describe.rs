use std::ops::ControlFlow;

use crate::dispatch::DispatchOptions;
use crate::error::Result;
use crate::host::types::InputRequest;
use crate::protocol::change_form::append_description_line;
use crate::workflow::{pick_pending_changelist, Chain, WorkflowOutcome};

/// Append one line to the description of a pending changelist.
pub async fn add_description_line(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    let changelist = match pick_pending_changelist(chain).await? {
        ControlFlow::Continue(changelist) => changelist,
        ControlFlow::Break(outcome) => return Ok(outcome),
    };

    let Some(line) = chain
        .host()
        .input(InputRequest::new("Changelist Description", ""))
        .await
    else {
        return Ok(WorkflowOutcome::Cancelled);
    };

    let separator = chain.config().behavior.end_line_separator.clone();
    let form = chain
        .step(
            &["change", "-o", &changelist.number],
            DispatchOptions::new(),
            |form| append_description_line(form, &line, &separator),
        )
        .await?;

    let output = chain
        .run(&["change", "-i"], DispatchOptions::new().stdin(form))
        .await?;
    chain.app().dispatcher.show_panel(&output).await;
    Ok(WorkflowOutcome::Completed)
}
