//! multi_drone_prm - centralised PRM* motion planning for drone teams
//!
//! The planner treats a fixed team of drones as a single robot in the joint
//! configuration space, builds a PRM* roadmap under a wall-clock budget and
//! extracts the shortest start-to-goal path.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod path_planning;

// Environment and experiment support
pub mod environment;
pub mod evaluation;

// Re-export common types for convenience
pub use common::{JointConfiguration, JointPath, PlanRequest, Point3D, WorkspaceBounds};
pub use common::{MultiRobotPlanner, PlanningEnvironment};
pub use common::{PlanFailure, RoboticsError, RoboticsResult};
pub use path_planning::{CentralisedPrmStar, PlanReport, PrmStarConfig};
