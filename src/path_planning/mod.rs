// Path Planning algorithms module

pub mod time_budget;
pub mod sampler;
pub mod spatial_index;
pub mod kd_tree;
pub mod roadmap;
pub mod dijkstra;
pub mod prm_star;

pub use time_budget::*;
pub use sampler::*;
pub use spatial_index::*;
pub use kd_tree::*;
pub use roadmap::*;
pub use dijkstra::*;
pub use prm_star::*;
