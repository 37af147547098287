//! Atitia Subscription Sweeper
//!
//! Daily batch job over the owner subscription store:
//!
//! - Sends renewal reminders 7/3/1 days before expiry
//! - Moves expired subscriptions into a 7-day grace period
//! - Downgrades subscriptions whose grace period has elapsed
//!
//! The process either runs once (`RUN_ONCE=true`, for external cron)
//! or sleeps until the configured UTC hour and sweeps daily. A
//! database lease keeps overlapping invocations from racing on the
//! same subscriptions.

mod config;

use std::sync::Arc;

use atitia_db::pg::{
    PgLifecycleRepository, PgNotificationRepository, PgOwnerProfileRepository,
    PgSubscriptionRepository, PgSweepLeaseRepository, Repositories,
};
use atitia_db::SweepLeaseRepository;
use atitia_sweep_core::{SweepService, SweepSummary};
use chrono::{DateTime, Utc};
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::config::Config;

/// Lease name shared by every sweeper invocation
const SWEEP_LEASE: &str = "subscription_sweep";

type PgSweepService = SweepService<
    PgSubscriptionRepository,
    PgOwnerProfileRepository,
    PgNotificationRepository,
    PgLifecycleRepository,
>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("sweeper=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Atitia subscription sweeper");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        sweep_hour_utc = config.sweep_hour_utc,
        run_once = config.run_once,
        grace_period_days = config.sweep.grace_period_days,
        "Configuration loaded"
    );

    // Create database pool and repositories
    let pool = atitia_db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");
    let repos = Repositories::new(pool);

    let service = SweepService::new(
        config.sweep.clone(),
        Arc::new(repos.subscriptions.clone()),
        Arc::new(repos.owner_profiles.clone()),
        Arc::new(repos.notifications.clone()),
        Arc::new(repos.lifecycle.clone()),
    )?;

    // Each process instance holds the lease under its own identity
    let holder = Uuid::new_v4();

    if config.run_once {
        // Propagate failure so the external scheduler's retry path fires
        run_guarded(&service, &repos.leases, holder, config.lease_ttl_secs).await?;
        return Ok(());
    }

    loop {
        let wait = duration_until_next_run(Utc::now(), config.sweep_hour_utc);
        tracing::info!(
            seconds_until_run = wait.as_secs(),
            "Sleeping until next scheduled sweep"
        );

        tokio::select! {
            () = shutdown_signal() => {
                tracing::info!("Shutdown signal received");
                break;
            }
            () = tokio::time::sleep(wait) => {
                if let Err(error) = run_guarded(
                    &service,
                    &repos.leases,
                    holder,
                    config.lease_ttl_secs,
                ).await {
                    tracing::error!(%error, "Sweep run failed, retrying at next scheduled run");
                }
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Run one sweep under the shared lease
///
/// A lease held by another invocation makes this run a no-op rather
/// than an error; overlapping sweeps would double-send reminders.
async fn run_guarded(
    service: &PgSweepService,
    leases: &PgSweepLeaseRepository,
    holder: Uuid,
    lease_ttl_secs: i64,
) -> anyhow::Result<Option<SweepSummary>> {
    if !leases.try_acquire(SWEEP_LEASE, holder, lease_ttl_secs).await? {
        tracing::warn!("Sweep lease held by another invocation, skipping run");
        return Ok(None);
    }

    let result = service.run(Utc::now()).await;
    leases.release(SWEEP_LEASE, holder).await?;

    Ok(Some(result?))
}

/// Time until the next daily run at `hour`:00 UTC
fn duration_until_next_run(now: DateTime<Utc>, hour: u32) -> std::time::Duration {
    let today = now
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .expect("validated hour of day")
        .and_utc();

    let next = if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    };

    (next - now).to_std().unwrap_or_default()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
