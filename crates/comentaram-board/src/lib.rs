//! Comentaram Board
//!
//! Live trending-topic board: a clock-driven simulation of the catalog with a
//! web frontend.
//!
//! # Architecture
//!
//! - **Simulation**: Applies evidence (or rotation) steps and records
//!   transitions into a bounded event log
//! - **Driver**: Runs due steps from an injected clock, start/stop
//! - **WebSocket**: Streams snapshots and events, tracks each page's search
//!   and featured card
//! - **REST API**: Board, topic details, likes, featured selection, driver
//!   control
//!
//! # Usage
//!
//! ```ignore
//! let config = BoardConfig::from_env()?;
//! let sim = Simulation::seeded(config.simulation.clone())?;
//! let driver = Driver::new(sim, Arc::new(SystemClock::new()), config.driver);
//! driver.start();
//!
//! BoardServer::new(driver).serve(config.addr).await?;
//! ```

mod clock;
mod config;
mod driver;
mod error;
mod events;
mod server;
mod simulation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::BoardConfig;
pub use driver::{BoardUpdate, Driver, DriverConfig, PumpReport, MAX_CATCH_UP_STEPS};
pub use error::{Error, Result};
pub use events::{BoardEvent, BoardSnapshot, TopicDetail};
pub use server::BoardServer;
pub use simulation::{Simulation, SimulationConfig, SimulationMode, StepReport};
