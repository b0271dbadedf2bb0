use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use warden::access::{
    evaluate_request, loader, Authorizer, DanglingReference, EvaluateRequest, GraphIndex,
    PermissionIndex, Snapshot,
};
use warden::errors::WardenError;
use warden::settings::{EvaluationMode, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "warden",
    version,
    about = "Group and policy based access control evaluation"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Snapshot file or directory, overriding `snapshot.path`
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide whether a principal may perform an action on a resource
    Check {
        #[arg(long)]
        principal: String,
        #[arg(long)]
        resource: String,
        #[arg(long)]
        action: String,
    },
    /// List every (action, resource) pair a principal is allowed
    Permissions {
        #[arg(long)]
        principal: String,
    },
    /// List the principals allowed an action on a resource
    Who {
        #[arg(long)]
        resource: String,
        #[arg(long)]
        action: String,
    },
    /// Load the snapshot and report its size and dangling references
    Validate,
    /// Evaluate a self-contained JSON request, ignoring the configured snapshot
    Evaluate {
        #[arg(long)]
        request: PathBuf,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationReport {
    users: usize,
    groups: usize,
    policies: usize,
    statements: usize,
    principals_with_grants: usize,
    grants: usize,
    dangling: Vec<DanglingReference>,
}

fn main() -> Result<()> {
    // logging goes to stderr, results to stdout
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load(&cli.config)?;
    if let Some(path) = cli.snapshot {
        settings.snapshot.path = path;
    }
    tracing::debug!(?settings, "Loaded configuration");

    run(&settings, cli.command)?;
    Ok(())
}

fn run(settings: &Settings, command: Command) -> Result<(), WardenError> {
    let load = || loader::load_snapshot(&settings.snapshot.path);

    match command {
        Command::Check {
            principal,
            resource,
            action,
        } => {
            let snapshot = load()?;
            let decision = match settings.evaluator.mode {
                EvaluationMode::OnDemand => {
                    GraphIndex::from_snapshot(&snapshot).decide(&principal, &resource, &action)?
                }
                EvaluationMode::Indexed => PermissionIndex::from_snapshot(&snapshot)
                    .decide(&principal, &resource, &action)?,
            };
            print_json(&decision)
        }
        Command::Permissions { principal } => {
            let index = PermissionIndex::from_snapshot(&load()?);
            print_json(&index.effective_permissions(&principal))
        }
        Command::Who { resource, action } => {
            let index = PermissionIndex::from_snapshot(&load()?);
            print_json(&index.principals_with(&resource, &action))
        }
        Command::Validate => print_json(&validate(&load()?)),
        Command::Evaluate { request } => {
            let source = std::fs::read_to_string(&request)?;
            let req = EvaluateRequest::from_json(&source)?;
            print_json(&evaluate_request(&req)?)
        }
    }
}

fn validate(snapshot: &Snapshot) -> ValidationReport {
    let index = PermissionIndex::from_snapshot(snapshot);
    ValidationReport {
        users: snapshot.users.len(),
        groups: snapshot.groups.len(),
        policies: snapshot.policies.len(),
        statements: snapshot.statement_count(),
        principals_with_grants: index.principal_count(),
        grants: index.grant_count(),
        dangling: snapshot.dangling_references(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), WardenError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
