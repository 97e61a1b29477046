use crate::dispatch::DispatchOptions;
use crate::error::Result;
use crate::host::types::{InputRequest, PickItem};
use crate::protocol::changes::DEFAULT_CHANGELIST;
use crate::protocol::Changelist;
use crate::workflow::changelists::{check_depot_file, path_arg, pending_changelists};
use crate::workflow::create_changelist::create_changelist;
use crate::workflow::{Chain, WorkflowOutcome};

/// Where the user asked the file to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    New,
    Default,
    Existing(String),
}

impl Destination {
    fn from_pick(index: usize, changelists: &[Changelist]) -> Option<Self> {
        match index {
            0 => Some(Destination::New),
            1 => Some(Destination::Default),
            n => changelists
                .get(n - 2)
                .map(|cl| Destination::Existing(cl.number.clone())),
        }
    }
}

fn destination_rows(changelists: &[Changelist]) -> Vec<PickItem> {
    [PickItem::single("New"), PickItem::single("Default")]
        .into_iter()
        .chain(super::changelist_rows(changelists))
        .collect()
}

/// Reopen the active file in a new, the default or an existing changelist.
pub async fn move_to_changelist(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    let file = check_depot_file(chain).await?;
    let changelists = pending_changelists(chain).await?;

    let Some(index) = chain.host().pick(destination_rows(&changelists)).await else {
        return Ok(WorkflowOutcome::Cancelled);
    };
    let Some(destination) = Destination::from_pick(index, &changelists) else {
        return Ok(WorkflowOutcome::Cancelled);
    };

    let number = match destination {
        Destination::Default => DEFAULT_CHANGELIST.to_string(),
        Destination::Existing(number) => number,
        Destination::New => {
            let Some(description) = chain
                .host()
                .input(InputRequest::new("Changelist Description", ""))
                .await
            else {
                return Ok(WorkflowOutcome::Cancelled);
            };
            let (number, _) = create_changelist(chain, &description).await?;
            number
        }
    };

    chain
        .run(
            &["reopen", "-c", &number, &path_arg(&file)],
            DispatchOptions::new().verbose(),
        )
        .await?;
    Ok(WorkflowOutcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cl(number: &str) -> Changelist {
        Changelist {
            number: number.to_string(),
            date: "2012/10/01".to_string(),
            author: "alice@ws".to_string(),
            description: format!("change {number}"),
        }
    }

    #[test]
    fn test_rows_start_with_new_and_default() {
        let rows = destination_rows(&[cl("12")]);
        let titles: Vec<&str> = rows.iter().map(PickItem::title).collect();
        assert_eq!(titles, vec!["New", "Default", "Changelist 12 - change 12"]);
    }

    #[test]
    fn test_destination_from_pick() {
        let changelists = [cl("12"), cl("15")];
        assert_eq!(Destination::from_pick(0, &changelists), Some(Destination::New));
        assert_eq!(Destination::from_pick(1, &changelists), Some(Destination::Default));
        assert_eq!(
            Destination::from_pick(3, &changelists),
            Some(Destination::Existing("15".to_string()))
        );
        assert_eq!(Destination::from_pick(4, &changelists), None);
    }
}
