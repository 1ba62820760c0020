use anyhow::anyhow;
use tracing::error;

use super::Command;
use crate::domain::{Key, Network};
use crate::infrastructure::key_service::KeyLifecycleFacade;

/// Run one key command and render its result for stdout.
///
/// Failures are logged with their full cause chain; the caller only sees a
/// generic message.
pub(super) async fn execute(
    facade: &KeyLifecycleFacade,
    command: &Command,
    network: Network,
) -> anyhow::Result<String> {
    let project_ref = command.project_ref();

    let result: anyhow::Result<String> = match command {
        Command::CreateProject { .. } => facade
            .create_project(project_ref, network)
            .await
            .map_err(anyhow::Error::from)
            .and_then(|key| render_key(&key)),
        Command::Generate { .. } => facade
            .generate(project_ref, network)
            .await
            .map_err(anyhow::Error::from)
            .and_then(|key| render_key(&key)),
        Command::Rotate { .. } => facade
            .rotate(project_ref, network)
            .await
            .map_err(anyhow::Error::from)
            .and_then(|key| render_key(&key)),
        Command::Fetch { .. } => facade
            .fetch(project_ref, network)
            .await
            .map_err(anyhow::Error::from),
        Command::FetchAll { .. } => facade
            .fetch_all(project_ref, network)
            .await
            .map(|tokens| tokens.join("\n"))
            .map_err(anyhow::Error::from),
        Command::Invalidate { .. } => facade
            .invalidate(project_ref, network)
            .await
            .map(|_| String::new())
            .map_err(anyhow::Error::from),
    };

    result.map_err(|e| {
        error!(project_ref, %network, error = %format!("{:#}", e), "Key operation failed");
        anyhow!("key operation failed")
    })
}

fn render_key(key: &Key) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(key)?)
}
