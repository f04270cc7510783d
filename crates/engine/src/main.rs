//! Veilkeep engine - interactive session runner.
//!
//! Starts one in-process session with an authority and a player, then reads
//! UI events as JSON lines from stdin:
//!
//! ```text
//! {"participant": "player", "event": {"type": "PrintAbilities", "actorId": "..."}}
//! ```

use std::sync::Arc;

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use veilkeep_engine::api::UiEventRouter;
use veilkeep_engine::infrastructure::chat_log::{InMemoryChatLog, LocalChatView};
use veilkeep_engine::infrastructure::config::EngineConfig;
use veilkeep_engine::infrastructure::memory_store::InMemoryActorRepo;
use veilkeep_engine::infrastructure::session_hub::{ParticipantRole, SessionHub};
use veilkeep_engine::infrastructure::templates::HtmlTemplates;
use veilkeep_engine::App;
use veilkeep_shared::ClientEvent;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Seat {
    Authority,
    Player,
}

#[derive(Debug, Deserialize)]
struct InputLine {
    participant: Seat,
    event: ClientEvent,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veilkeep_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Veilkeep engine");

    let config = EngineConfig::from_env();
    let profile = config.rule_profile();

    let actors = match &config.world_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading actors");
            let json = tokio::fs::read_to_string(path).await?;
            Arc::new(InMemoryActorRepo::from_json(&json)?)
        }
        None => Arc::new(InMemoryActorRepo::new()),
    };
    tracing::info!(actors = actors.len(), "Actor store ready");

    let hub = SessionHub::new(config.authority_timeout, config.ledger_capacity);
    let log = Arc::new(InMemoryChatLog::new());

    let mut routers = Vec::with_capacity(2);
    for role in [ParticipantRole::Authority, ParticipantRole::Player] {
        let channel = Arc::new(hub.join(role).await?);
        let view = Arc::new(LocalChatView::new(log.clone()));
        let app = Arc::new(App::new(
            actors.clone(),
            Arc::new(HtmlTemplates::new()),
            log.clone(),
            view,
            channel,
            profile,
        ));
        routers.push(UiEventRouter::new(app));
    }
    let [authority, player]: [UiEventRouter; 2] = routers
        .try_into()
        .map_err(|_| anyhow::anyhow!("session needs exactly two participants"))?;

    tracing::info!("Session ready; reading UI events from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let input: InputLine = match serde_json::from_str(&line) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable input line");
                continue;
            }
        };
        let router = match input.participant {
            Seat::Authority => &authority,
            Seat::Player => &player,
        };
        match router.handle(input.event).await {
            Ok(outcome) => tracing::info!(outcome = ?outcome, "UI event handled"),
            Err(e) => tracing::error!(error = %e, "UI event failed"),
        }
        for artifact in log.transcript() {
            tracing::debug!(message_id = %artifact.id, content = %artifact.content, "Transcript");
        }
    }

    for artifact in log.transcript() {
        println!("{}\t{}", artifact.id, artifact.content);
    }

    tracing::info!("Stdin closed, shutting down");
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
