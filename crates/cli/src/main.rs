// Landing-zone provisioning CLI
// Composes one deployment descriptor into accounts, OUs and assignments

mod config;

use anyhow::Context;
use config::Config;
use dotenvy::dotenv;
use lz_cloud::{CloudConfig, HttpCloudClient, InMemoryCloud};
use lz_models::DeploymentDescriptor;
use lz_provision::{AssignmentStatus, DeploymentComposer, DeploymentReport};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,lz_provision=debug".to_string()),
        )
        .init();

    tracing::info!("🚀 Starting landing-zone provisioning");
    tracing::info!("📦 Version: {}", env!("CARGO_PKG_VERSION"));

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let dry_run = if let Some(position) = args.iter().position(|a| a == "--dry-run") {
        args.remove(position);
        true
    } else {
        false
    };
    let descriptor_path = args
        .first()
        .context("usage: lz <deployment-descriptor.json> [--dry-run]")?;

    let raw = std::fs::read_to_string(descriptor_path)
        .with_context(|| format!("Failed to read descriptor {}", descriptor_path))?;
    let descriptor: DeploymentDescriptor =
        serde_json::from_str(&raw).context("Malformed deployment descriptor")?;
    tracing::info!(
        "📋 Descriptor: {} team(s), {} standalone account(s)",
        descriptor.teams.len(),
        descriptor.accounts.len()
    );

    let config = Config::from_env();
    let report = if dry_run {
        tracing::info!("🧪 Dry run: composing against an in-memory control plane");
        let cloud = Arc::new(InMemoryCloud::permissive());
        cloud.set_parameter(&config.sso_parameter, "dry-run");
        cloud.set_parameter(&config.identity_store_parameter, "dry-run");
        let composer = DeploymentComposer::new(
            cloud.clone(),
            cloud.clone(),
            cloud.clone(),
            cloud.clone(),
            config.composer(),
        );
        composer.run(&descriptor).await?
    } else {
        let client = Arc::new(HttpCloudClient::new(CloudConfig::from_env())?);
        let composer = DeploymentComposer::new(
            client.clone(),
            client.clone(),
            client.clone(),
            client.clone(),
            config.composer(),
        );
        composer.run(&descriptor).await?
    };

    summarize(&report);

    if report.has_failures() {
        anyhow::bail!("deployment finished with failures");
    }
    tracing::info!("✅ Deployment complete");
    Ok(())
}

fn summarize(report: &DeploymentReport) {
    tracing::info!("🌳 Organization root: {}", report.root_id);
    for unit in &report.organizational_units {
        tracing::info!("   OU {} ({})", unit.name, unit.id);
    }
    tracing::info!(
        "🔐 Permission set: {} ({})",
        report.permission_set.name,
        report.permission_set.id
    );

    for team in &report.teams {
        match &team.outcome {
            Ok(outcome) => {
                tracing::info!(
                    "👥 Team {}: account {} accepted",
                    team.team_name,
                    outcome.account.id
                );
                for assignment in &outcome.assignments {
                    match &assignment.status {
                        AssignmentStatus::Created { principal_type, .. } => tracing::info!(
                            "   assigned {} ({})",
                            assignment.principal_id,
                            principal_type
                        ),
                        AssignmentStatus::Failed { reason } => tracing::warn!(
                            "   assignment for {} failed: {}",
                            assignment.principal_id,
                            reason
                        ),
                    }
                }
            }
            Err(err) => tracing::error!("👥 Team {} failed: {}", team.team_name, err),
        }
    }

    for account in &report.accounts {
        match &account.outcome {
            Ok(created) => {
                tracing::info!("🏦 Account {}: {} accepted", account.name, created.id)
            }
            Err(err) => tracing::error!("🏦 Account {} failed: {}", account.name, err),
        }
    }
}
