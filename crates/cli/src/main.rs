//! hrsync CLI - leave and candidate records from the command line.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hrsync_client::{ClientConfig, FilePart, HrClient, HttpTransport, MultipartForm, DEFAULT_BASE_URL};
use hrsync_core::{RecordId, SessionToken, StaticSession};
use hrsync_store::{CandidateStore, LeaveStore, StoreError};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hrsync")]
#[command(about = "Leave and candidate records from the HR backend", long_about = None)]
struct Cli {
    /// Backend address
    #[arg(long, global = true, env = "HRSYNC_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Bearer token
    #[arg(long, global = true, env = "HRSYNC_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds (none by default)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Leave requests
    Leaves {
        #[command(subcommand)]
        action: LeaveAction,
    },
    /// Candidates
    Candidates {
        #[command(subcommand)]
        action: CandidateAction,
    },
}

#[derive(Subcommand)]
enum LeaveAction {
    /// List all leave requests
    List {
        /// Only show requests with this status
        #[arg(long)]
        status: Option<String>,
    },
    /// Submit a leave request
    Add {
        /// Form field as key=value (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// Attachment path (repeatable, at least one)
        #[arg(long = "file", required = true)]
        files: Vec<PathBuf>,
        /// Form field name for attachments
        #[arg(long, default_value = "file")]
        file_field: String,
    },
    /// Set a leave request's status
    Status {
        /// Leave ID
        id: String,
        /// New status
        status: String,
    },
}

#[derive(Subcommand)]
enum CandidateAction {
    /// List all candidates
    List,
    /// Create a candidate
    Add {
        /// Form field as key=value (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Replace a candidate's data
    Edit {
        /// Candidate ID
        id: String,
        /// JSON object with the updated record
        #[arg(long)]
        json: String,
    },
    /// Delete a candidate
    Delete {
        /// Candidate ID
        id: String,
    },
    /// Set hiring status
    Status {
        /// Candidate ID
        id: String,
        /// New status
        status: String,
    },
    /// Set attendance status
    Attendance {
        /// Candidate ID
        id: String,
        /// New attendance status
        attendance: String,
    },
    /// Set task
    Task {
        /// Candidate ID
        id: String,
        /// New task
        task: String,
    },
}

fn init_logging() {
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = ClientConfig::default().with_base_url(cli.base_url);
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    info!(base_url = %config.base_url, "Using backend");

    let transport = HttpTransport::new(config).context("Failed to build HTTP client")?;
    let client = HrClient::new(Arc::new(transport));
    let session = Arc::new(StaticSession::new(cli.token.map(SessionToken::new)));

    let outcome = match cli.command {
        Commands::Leaves { action } => run_leaves(action, client, session.clone()).await,
        Commands::Candidates { action } => run_candidates(action, client, session.clone()).await,
    };

    if session_rejected(&outcome, &session) {
        warn!(logouts = session.logout_count(), "Backend rejected the session");
        bail!("Session rejected by the backend (HTTP 401); supply a fresh --token");
    }
    outcome
}

/// Whether the run ended with the backend refusing the session.
fn session_rejected(outcome: &Result<()>, session: &StaticSession) -> bool {
    let unauthorized = outcome
        .as_ref()
        .err()
        .and_then(|e| e.downcast_ref::<StoreError>())
        .is_some_and(StoreError::is_unauthorized);
    unauthorized || session.logout_count() > 0
}

async fn run_leaves(action: LeaveAction, client: HrClient, session: Arc<StaticSession>) -> Result<()> {
    let store = LeaveStore::new(client, session);

    match action {
        LeaveAction::List { status } => {
            store.fetch_leaves().await?;
            let leaves: Vec<_> = store
                .get_state()
                .records
                .into_iter()
                .filter(|l| status.is_none() || l.status == status)
                .collect();
            print_json(&leaves)?;
        }
        LeaveAction::Add { fields, files, file_field } => {
            let mut form = MultipartForm::new();
            for (name, value) in fields {
                form = form.text(name, value);
            }
            for path in files {
                let part = FilePart::from_path(file_field.clone(), &path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                form = form.file(part);
            }
            let created = store.add_leave(form).await?;
            print_json(&created.record)?;
        }
        LeaveAction::Status { id, status } => {
            store.fetch_leaves().await?;
            let id = RecordId::new(id);
            store.edit_leave_status(&id, &status).await?;
            print_json(&store.get_state().find(&id))?;
        }
    }

    Ok(())
}

async fn run_candidates(
    action: CandidateAction,
    client: HrClient,
    session: Arc<StaticSession>,
) -> Result<()> {
    let store = CandidateStore::new(client, session);

    match action {
        CandidateAction::List => {
            store.fetch_candidates().await?;
            print_json(&store.get_state().records)?;
        }
        CandidateAction::Add { fields } => {
            let created = store.add_candidate(fields).await?;
            print_json(&created.record)?;
        }
        CandidateAction::Edit { id, json } => {
            let updated: serde_json::Value =
                serde_json::from_str(&json).context("--json is not valid JSON")?;
            if !updated.is_object() {
                bail!("--json must be a JSON object");
            }
            let candidate = store.edit_candidate(&RecordId::new(id), updated).await?;
            print_json(&candidate)?;
        }
        CandidateAction::Delete { id } => {
            store.fetch_candidates().await?;
            store.delete_candidate(&RecordId::new(id)).await?;
            print_json(&store.get_state().records)?;
        }
        CandidateAction::Status { id, status } => {
            store.fetch_candidates().await?;
            let id = RecordId::new(id);
            store.update_candidate_status(&id, &status).await?;
            print_json(&store.get_state().find(&id))?;
        }
        CandidateAction::Attendance { id, attendance } => {
            store.fetch_candidates().await?;
            let id = RecordId::new(id);
            store.update_candidate_attendance(&id, &attendance).await?;
            print_json(&store.get_state().find(&id))?;
        }
        CandidateAction::Task { id, task } => {
            store.fetch_candidates().await?;
            let id = RecordId::new(id);
            store.update_candidate_task(&id, &task).await?;
            print_json(&store.get_state().find(&id))?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_field(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", s))?;
    if key.is_empty() {
        return Err(format!("empty key in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}
