use std::ops::ControlFlow;

use crate::dispatch::DispatchOptions;
use crate::error::Result;
use crate::workflow::{pick_pending_changelist, Chain, WorkflowOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShelveDirection {
    Shelve,
    Unshelve,
}

impl ShelveDirection {
    fn args(self, number: &str) -> Vec<&str> {
        match self {
            ShelveDirection::Shelve => vec!["shelve", "-c", number],
            ShelveDirection::Unshelve => vec!["unshelve", "-s", number, "-f"],
        }
    }
}

/// Shelve a pending changelist, or restore its shelved files.
pub async fn shelve(chain: &mut Chain<'_>, direction: ShelveDirection) -> Result<WorkflowOutcome> {
    let changelist = match pick_pending_changelist(chain).await? {
        ControlFlow::Continue(changelist) => changelist,
        ControlFlow::Break(outcome) => return Ok(outcome),
    };

    let output = chain
        .run(&direction.args(&changelist.number), DispatchOptions::new())
        .await?;
    chain.app().dispatcher.show_panel(&output).await;
    Ok(WorkflowOutcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args() {
        assert_eq!(ShelveDirection::Shelve.args("12"), vec!["shelve", "-c", "12"]);
        assert_eq!(
            ShelveDirection::Unshelve.args("12"),
            vec!["unshelve", "-s", "12", "-f"]
        );
    }
}
