//! Common types, traits, and error definitions for multi_drone_prm
//!
//! This module provides the foundational building blocks shared by the
//! planner, the reference environment and the drivers.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
