//! Comentaram board server
//!
//! Seed the catalog, start the driver and serve the board page.

use std::sync::Arc;

use comentaram_board::{BoardConfig, BoardServer, Driver, Simulation, SystemClock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comentaram_board=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BoardConfig::from_env()?;
    tracing::info!(
        "Starting board ({:?} mode, step {:?}, rotation {:?})",
        config.simulation.mode,
        config.driver.step_interval,
        config.driver.rotation_interval
    );

    let sim = Simulation::seeded(config.simulation.clone())?;
    tracing::info!("Seeded {} topics", sim.topic_count());

    let driver = Driver::new(sim, Arc::new(SystemClock::new()), config.driver);
    driver.start();

    BoardServer::new(driver).serve(config.addr).await?;
    Ok(())
}
