//! Utility modules for multi_drone_prm

pub mod visualization;

pub use visualization::{colors, visualize_paths, PathVisualizer};
