//! # STRATA
//!
//! The driver crate, tying world and culling together one tick at a time.
//!
//! ## Tick Orchestration
//!
//! ```text
//! Tick N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. STREAM                                                           │
//! │    ├─ Evict chunks beyond the render distance                       │
//! │    └─ Generate missing chunks around the observer                   │
//! │                                                                     │
//! │ 2. FLUIDS                                                           │
//! │    └─ One double-buffered water update                              │
//! │                                                                     │
//! │ 3. CULL                                                             │
//! │    ├─ Extract frustum planes from the view-projection matrix        │
//! │    ├─ List visible chunks                                           │
//! │    └─ Drain dirty chunks for the mesher                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: Session configuration loaded from TOML
//! - `observer`: Scripted observer walking a straight line
//! - `simulation`: Tick orchestration and timing
//! - `session`: A full run, observer plus simulation

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod observer;
pub mod session;
pub mod simulation;

// Re-export the layers
pub use strata_culling as culling;
pub use strata_world as world;

// Re-export commonly used types
pub use config::SessionConfig;
pub use observer::Observer;
pub use session::Session;
pub use simulation::{Simulation, TickStats, TickStatsAccumulator, MAX_TICK_TIME, TARGET_TICK_TIME};
