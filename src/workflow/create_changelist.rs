use crate::dispatch::DispatchOptions;
use crate::error::{AppError, Result};
use crate::host::types::InputRequest;
use crate::protocol::change_form::fill_new_changelist;
use crate::protocol::changes::parse_created_changelist;
use crate::workflow::{Chain, WorkflowOutcome};

/// `change -o` → fill in `description` → `change -i`. Returns the new number
/// and the server's reply.
pub async fn create_changelist(chain: &mut Chain<'_>, description: &str) -> Result<(String, String)> {
    let separator = chain.config().behavior.end_line_separator.clone();

    let form = chain
        .step(&["change", "-o"], DispatchOptions::new(), |template| {
            fill_new_changelist(template, description, &separator)
        })
        .await?;

    chain
        .step(&["change", "-i"], DispatchOptions::new().stdin(form), |output| {
            let number = parse_created_changelist(output).ok_or_else(|| {
                AppError::Parse(format!("no changelist number in reply: {output}"))
            })?;
            Ok((number, output.to_string()))
        })
        .await
}

/// Prompt for a description and create a changelist from it.
pub async fn create_changelist_interactive(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    let Some(description) = chain
        .host()
        .input(InputRequest::new("Changelist Description", ""))
        .await
    else {
        return Ok(WorkflowOutcome::Cancelled);
    };

    let (number, reply) = create_changelist(chain, &description).await?;
    chain.app().dispatcher.show_panel(&reply).await;
    Ok(WorkflowOutcome::ChangelistCreated { number })
}
