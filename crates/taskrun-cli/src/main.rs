//! TaskRun CLI - inspect and plan TaskRun snapshots.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use taskrun_controller::{plan, Config, Reconciler};
use taskrun_core::{ObjectReference, PipelineMembership, RunState, TaskRun};

/// TaskRun CLI - snapshot inspection tool
#[derive(Parser)]
#[command(name = "taskrun")]
#[command(about = "Inspect and plan TaskRun snapshots", long_about = None)]
struct Cli {
    /// Service account used when a TaskRun names none
    #[arg(long, default_value = "default")]
    default_service_account: String,

    /// Maximum concurrent reconciles
    #[arg(short, long, default_value_t = 4)]
    workers: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print lifecycle and relationship queries for each snapshot
    Inspect {
        /// TaskRun JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the next reconcile step for a snapshot
    Plan {
        /// TaskRun JSON file
        file: PathBuf,
    },

    /// Run snapshots through the reconciler
    Reconcile {
        /// TaskRun JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Query results for one snapshot.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Inspection {
    name: String,
    namespace: String,
    state: RunState,
    has_started: bool,
    is_done: bool,
    is_cancelled: bool,
    build_pod_ref: ObjectReference,
    pipeline_run_pvc_name: String,
    has_pipeline_run_owner_reference: bool,
    pipeline: Option<PipelineMembership>,
    service_account_name: String,
}

impl From<&TaskRun> for Inspection {
    fn from(tr: &TaskRun) -> Self {
        Self {
            name: tr.metadata.name.clone(),
            namespace: tr.metadata.namespace.clone(),
            state: tr.state(),
            has_started: tr.has_started(),
            is_done: tr.is_done(),
            is_cancelled: tr.is_cancelled(),
            build_pod_ref: tr.build_pod_ref(),
            pipeline_run_pvc_name: tr.pipeline_run_pvc_name(),
            has_pipeline_run_owner_reference: tr.has_pipeline_run_owner_reference(),
            pipeline: tr.is_part_of_pipeline(),
            service_account_name: tr.service_account_name().to_string(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("taskrun=info".parse()?))
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let config = Config {
        default_service_account: cli.default_service_account,
        workers: cli.workers,
        ..Config::default()
    };

    match cli.command {
        Commands::Inspect { files } => {
            inspect(&files)?;
        }
        Commands::Plan { file } => {
            plan_one(&file, &config)?;
        }
        Commands::Reconcile { files } => {
            reconcile(&files, config).await?;
        }
    }

    Ok(())
}

/// Decode a snapshot without admission checks; every query is total.
fn load(path: &Path) -> Result<TaskRun, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let tr = TaskRun::from_json(&json)?;
    debug!(file = %path.display(), taskrun = %tr.metadata.name, "Loaded snapshot");
    Ok(tr)
}

/// Decode a snapshot and run admission validation on it.
fn load_valid(path: &Path) -> Result<TaskRun, Box<dyn std::error::Error>> {
    let tr = load(path)?;
    tr.validate()?;
    Ok(tr)
}

fn inspect(files: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let mut inspections = Vec::with_capacity(files.len());
    for path in files {
        let tr = load(path)?;
        inspections.push(Inspection::from(&tr));
    }

    println!("{}", serde_json::to_string_pretty(&inspections)?);
    Ok(())
}

fn plan_one(file: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let tr = load_valid(file)?;
    let action = plan(Some(&tr), config);

    println!("{}", serde_json::to_string_pretty(&action)?);
    Ok(())
}

async fn reconcile(files: &[PathBuf], config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut snapshots = Vec::with_capacity(files.len());
    for path in files {
        snapshots.push(Arc::new(load_valid(path)?));
    }

    let capacity = config.queue_capacity.max(1);
    let reconciler = Reconciler::new(config);
    let (queue_tx, queue_rx) = mpsc::channel(capacity);
    let (results_tx, mut results_rx) = mpsc::channel(capacity);

    let driver = tokio::spawn(reconciler.run(queue_rx, results_tx));

    let feeder = tokio::spawn(async move {
        for tr in snapshots {
            if queue_tx.send(tr).await.is_err() {
                break;
            }
        }
    });

    let mut failed = 0usize;
    while let Some(outcome) = results_rx.recv().await {
        match outcome.result {
            Ok(action) => {
                let line = serde_json::json!({
                    "name": outcome.name,
                    "namespace": outcome.namespace,
                    "result": action,
                });
                println!("{line}");
            }
            Err(e) => {
                failed += 1;
                eprintln!("{}/{}: {}", outcome.namespace, outcome.name, e);
            }
        }
    }

    feeder.await?;
    driver.await?;

    info!(total = files.len(), failed, "Reconcile finished");

    if failed > 0 {
        return Err(format!("{failed} snapshot(s) failed to reconcile").into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskrun_core::OwnerReference;

    #[test]
    fn test_inspection_from_taskrun() {
        let tr = TaskRun::new("taskrunname", "testns")
            .with_owner_reference(OwnerReference::new("PipelineRun", "testpr"))
            .with_deprecated_service_account("deprecatedSA");

        let value = serde_json::to_value(Inspection::from(&tr)).unwrap();
        assert_eq!(value["state"], "PENDING");
        assert_eq!(value["pipelineRunPvcName"], "testpr-pvc");
        assert_eq!(value["hasPipelineRunOwnerReference"], true);
        assert_eq!(value["buildPodRef"]["kind"], "Pod");
        assert_eq!(value["serviceAccountName"], "deprecatedSA");
        assert!(value["pipeline"].is_null());
    }

    #[test]
    fn test_inspect_skips_admission_validation() {
        let path = std::env::temp_dir().join(format!(
            "taskrun-inspect-{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{"metadata": {"name": "build.v1", "namespace": "ci"}}"#,
        )
        .unwrap();

        let tr = load(&path).unwrap();
        assert_eq!(Inspection::from(&tr).build_pod_ref.name, "build.v1");
        assert!(load_valid(&path).is_err());

        std::fs::remove_file(&path).unwrap();
    }
}
