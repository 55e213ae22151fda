//! Reference planning environment for drone teams
//!
//! Implements [`PlanningEnvironment`](crate::common::PlanningEnvironment)
//! over static sphere and box obstacles loaded from TOML files.

pub mod obstacles;
pub mod multi_drone;

pub use obstacles::*;
pub use multi_drone::*;
