//! Charged point bodies under Coulomb, strong-force and gravitational
//! attraction, with contact resolution and a bounded domain.
//!
//! Every pair of bodies is visited on every tick. [`Scheduler`] runs the
//! pair loop either on the calling thread or partitioned across a worker
//! pool; [`Simulation`] owns the collection and the tunables.

pub mod body;
pub mod collision;
pub mod config;
pub mod error;
pub mod feed;
pub mod forces;
pub mod params;
pub mod scheduler;
pub mod simulation;
pub mod snapshot;
pub mod utils;

pub use body::{Body, Species};
pub use collision::resolve_collision;
pub use config::RunConfig;
pub use error::{Result, SimError};
pub use feed::SnapshotFeed;
pub use forces::compute_force;
pub use params::{BoundaryPolicy, Parameters, Space, StrongFalloff};
pub use scheduler::{Execution, Scheduler, TickReport};
pub use simulation::Simulation;
pub use snapshot::{Snapshot, SnapshotRecord};

pub use ultraviolet::DVec3;
