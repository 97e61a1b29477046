use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::host::types::PickItem;
use crate::workflow::{Chain, WorkflowOutcome};

/// `{"applications": [...]}` as shipped next to the configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DiffCatalog {
    #[serde(default)]
    pub applications: Vec<DiffApplication>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DiffApplication {
    pub name: String,
    pub exename: String,
    pub diffcommand: String,
}

impl DiffCatalog {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::parse(&json)
    }
}

/// Pick a graphical diff application for the rest of this session.
pub async fn select_diff_application(chain: &mut Chain<'_>) -> Result<WorkflowOutcome> {
    let path = chain
        .config()
        .diff
        .catalog_path
        .clone()
        .ok_or_else(|| AppError::Config("diff.catalog_path is not set".to_string()))?;

    let catalog = DiffCatalog::load(&path).await?;
    if catalog.applications.is_empty() {
        let message = format!("No graphical diff applications listed in {}", path.display());
        chain.host().status_message(&message).await;
        return Ok(WorkflowOutcome::NothingFound { message });
    }

    let items = catalog
        .applications
        .iter()
        .map(|app| PickItem::multi([app.name.as_str(), app.exename.as_str()]))
        .collect();
    let picked = chain.host().pick(items).await;
    let Some(entry) = picked.and_then(|index| catalog.applications.get(index)) else {
        return Ok(WorkflowOutcome::Cancelled);
    };

    {
        let mut session = chain.app().session.write().await;
        session.diff_app = Some(entry.name.clone());
        session.diff_command = Some(entry.diffcommand.clone());
    }
    tracing::info!(app = %entry.name, "Selected graphical diff application");

    chain
        .host()
        .status_message(&format!(
            "Please make sure that {} is reachable",
            entry.exename
        ))
        .await;
    Ok(WorkflowOutcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let catalog = DiffCatalog::parse(
            r#"{"applications": [
                {"name": "P4Merge", "exename": "p4merge", "diffcommand": "p4merge \"%depotfile_path\" \"%file_path\""},
                {"name": "Meld", "exename": "meld", "diffcommand": "meld %depotfile_path %file_path"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(catalog.applications.len(), 2);
        assert_eq!(catalog.applications[1].exename, "meld");
    }

    #[test]
    fn test_malformed_catalog_is_serialization_error() {
        let err = DiffCatalog::parse("{\"applications\": [{\"name\": 1}]}").unwrap_err();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
