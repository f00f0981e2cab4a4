//! # LokiStack Status CLI
//!
//! Command-line interface for inspecting and setting LokiStack status conditions.
//!
//! ## Usage
//!
//! ```bash
//! # Mark a LokiStack as ready
//! lokistack-status ready --namespace openshift-logging --name lokistack-dev
//!
//! # Record a degraded cause
//! lokistack-status degraded --name lokistack-dev \
//!     --message "Missing object storage secret" --reason MissingObjectStorageSecret
//!
//! # Show the condition ledger
//! lokistack-status show --name lokistack-dev
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kube::Client;
use lokistack_status::runtime::initialize;
use lokistack_status::{ConditionReason, ConditionReconciler, ObjectRef, StatusStore};

/// LokiStack status condition CLI
#[derive(Debug, Parser)]
#[command(name = "lokistack-status")]
#[command(about = "Inspect and set LokiStack status conditions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct Target {
    /// Namespace of the LokiStack
    #[arg(short, long, default_value = "default")]
    namespace: String,

    /// Name of the LokiStack
    #[arg(short = 'N', long)]
    name: String,
}

impl Target {
    fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(&self.namespace, &self.name)
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Set the Ready condition
    Ready(Target),
    /// Set the Failed condition
    Failed(Target),
    /// Set the Pending condition
    Pending(Target),
    /// Set the Degraded condition with a custom cause
    Degraded {
        #[command(flatten)]
        target: Target,

        /// Human-readable description of the problem
        #[arg(short, long)]
        message: String,

        /// Reason code, e.g. MissingObjectStorageSecret
        #[arg(short, long)]
        reason: String,
    },
    /// Print the condition ledger
    Show(Target),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize()?;

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;
    let reconciler = ConditionReconciler::from_client(client);

    match cli.command {
        Commands::Ready(target) => {
            let object = target.object_ref();
            reconciler.set_ready(&object).await?;
            println!("✅ {object}: Ready");
        }
        Commands::Failed(target) => {
            let object = target.object_ref();
            reconciler.set_failed(&object).await?;
            println!("✅ {object}: Failed");
        }
        Commands::Pending(target) => {
            let object = target.object_ref();
            reconciler.set_pending(&object).await?;
            println!("✅ {object}: Pending");
        }
        Commands::Degraded {
            target,
            message,
            reason,
        } => {
            let object = target.object_ref();
            reconciler
                .set_degraded(&object, &message, ConditionReason::from(reason.as_str()))
                .await?;
            println!("✅ {object}: Degraded ({reason})");
        }
        Commands::Show(target) => {
            let object = target.object_ref();
            show(reconciler.store(), &object).await?;
        }
    }

    Ok(())
}

async fn show(store: &impl StatusStore, object: &ObjectRef) -> Result<()> {
    let Some(stack) = store
        .get(object)
        .await
        .with_context(|| format!("Failed to get LokiStack {object}"))?
    else {
        println!("LokiStack {object} not found");
        return Ok(());
    };

    let conditions = stack.status.unwrap_or_default().conditions;
    if conditions.is_empty() {
        println!("LokiStack {object} has no conditions");
        return Ok(());
    }

    println!(
        "{:<10} {:<8} {:<22} {:<34} MESSAGE",
        "TYPE", "STATUS", "LAST TRANSITION", "REASON"
    );
    for condition in conditions {
        println!(
            "{:<10} {:<8} {:<22} {:<34} {}",
            condition.r#type,
            condition.status,
            condition
                .last_transition_time
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            condition.reason,
            condition.message
        );
    }
    Ok(())
}
