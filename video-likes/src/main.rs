//! Video Likes Simulation Entry Point
//!
//! Runs many like button controllers concurrently against one video in an
//! in-memory document store and checks that no toggle was lost.

use dotenv::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use video_likes::{AppError, Dependencies, Simulation};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("video_likes=info,video_likes_repository=info"));

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "video-likes",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "video-likes",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting video likes simulation");

    let deps = match Dependencies::new() {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let simulation = Simulation::new(deps.ledger.clone(), deps.config.clone());
    match simulation.run().await {
        Ok(report) if report.is_consistent() => {
            info!(
                voters = report.voters,
                toggles = report.toggles,
                final_count = report.final_count,
                "Simulation completed successfully"
            );
            Ok(())
        }
        Ok(report) => {
            error!(
                expected_likes = report.expected_likes,
                final_count = report.final_count,
                "Like count diverged from confirmed toggles"
            );
            Err(AppError::CountMismatch {
                expected: report.expected_likes,
                actual: report.final_count,
            })
        }
        Err(e) => {
            error!(error = %e, "Simulation failed");
            Err(e)
        }
    }
}
