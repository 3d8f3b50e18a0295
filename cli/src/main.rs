//! Directus configuration reconciler
//!
//! Applies a declared role, policy, permission, settings or file document to
//! a Directus instance and keeps a local state file of what it manages.
//!
//! Usage:
//!   directus-sync --url https://cms.example.com apply --kind role --desired editors.json
//!
//! `DIRECTUS_URL` and `DIRECTUS_TOKEN` may be used instead of `--url`/`--token`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use directus_cli::{load_desired, TrackedState};
use directus_client::{ClientConfig, DirectusClient, DEFAULT_TIMEOUT_SECS};
use directus_model::{kinds, Record, ResourceSchema};
use directus_sync::EntitySynchronizer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "directus-sync")]
#[command(about = "Reconcile Directus configuration against declared state")]
struct Args {
    /// Base URL of the Directus instance
    #[arg(long, env = "DIRECTUS_URL", global = true)]
    url: Option<String>,

    /// Static access token
    #[arg(long, env = "DIRECTUS_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout_secs: u64,

    /// Allow plain http:// URLs
    #[arg(long, global = true)]
    insecure_http: bool,

    /// Path to the tracked state file
    #[arg(long, default_value = "directus-state.json", global = true)]
    state: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create or update an entity from a desired-state document
    Apply {
        #[arg(long)]
        kind: String,
        #[arg(long)]
        desired: PathBuf,
    },
    /// Re-read the tracked entity, forgetting it if it was removed remotely
    Refresh {
        #[arg(long)]
        kind: String,
    },
    /// Delete the tracked entity (settings are only forgotten)
    Destroy {
        #[arg(long)]
        kind: String,
    },
    /// Start tracking an existing entity
    Import {
        #[arg(long)]
        kind: String,
        #[arg(long)]
        id: String,
    },
    /// List the supported resource kinds
    Kinds,
}

impl Command {
    fn kind(&self) -> Option<&str> {
        match self {
            Command::Apply { kind, .. }
            | Command::Refresh { kind }
            | Command::Destroy { kind }
            | Command::Import { kind, .. } => Some(kind.as_str()),
            Command::Kinds => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let Some(kind) = args.command.kind() else {
        for schema in kinds::all() {
            let mode = if schema.singleton { "singleton" } else { "collection" };
            println!("{:<12} /{:<12} {}", schema.type_name, schema.collection, mode);
        }
        return Ok(());
    };

    let schema = kinds::by_name(kind).with_context(|| {
        format!("Unknown kind {kind:?}; expected one of {}", kinds::NAMES.join(", "))
    })?;

    let config = ClientConfig {
        base_url: args.url.clone().context("--url or DIRECTUS_URL is required")?,
        token: args.token.clone().unwrap_or_default(),
        timeout_secs: args.timeout_secs,
        insecure_http: args.insecure_http,
    };
    let client = DirectusClient::new(&config).context("Invalid connection settings")?;
    info!("Using Directus at {}", client.base_url());
    let synchronizer = EntitySynchronizer::new(Arc::new(client), schema.clone());

    let mut state = TrackedState::load(&args.state)?;
    let result = run(&args.command, &synchronizer, &schema, &mut state).await?;
    state.save(&args.state)?;

    if let Some(record) = result {
        let doc = record.to_document(&schema);
        println!("{}", serde_json::to_string_pretty(&doc)?);
    }
    Ok(())
}

async fn run(
    command: &Command,
    synchronizer: &EntitySynchronizer,
    schema: &ResourceSchema,
    state: &mut TrackedState,
) -> Result<Option<Record>> {
    match command {
        Command::Apply { desired, .. } => {
            let desired = load_desired(schema, desired)?;
            directus_cli::apply(synchronizer, schema, state, &desired)
                .await
                .map(Some)
        }
        Command::Refresh { .. } => directus_cli::refresh(synchronizer, schema, state).await,
        Command::Destroy { .. } => {
            if !directus_cli::destroy(synchronizer, schema, state).await? {
                info!("Nothing tracked for {}", schema.type_name);
            }
            Ok(None)
        }
        Command::Import { id, .. } => directus_cli::import(synchronizer, schema, state, id)
            .await
            .map(Some),
        Command::Kinds => Ok(None),
    }
}
