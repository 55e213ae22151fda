//! Common types used throughout multi_drone_prm

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::common::error::{RoboticsError, RoboticsResult};

/// 3D point representation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }

    pub fn distance(&self, other: &Point3D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2)).sqrt()
    }

    /// Linear interpolation towards `other`, `t` in [0, 1]
    pub fn lerp(&self, other: &Point3D, t: f64) -> Point3D {
        Point3D::new(
            self.x + t * (other.x - self.x),
            self.y + t * (other.y - self.y),
            self.z + t * (other.z - self.z),
        )
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Point3D {
    fn from(a: [f64; 3]) -> Self {
        Self { x: a[0], y: a[1], z: a[2] }
    }
}

impl From<Point3D> for [f64; 3] {
    fn from(p: Point3D) -> Self {
        p.to_array()
    }
}

/// Positions of every robot in the team, in a fixed robot order.
///
/// The flattened form `[x0, y0, z0, x1, y1, z1, ...]` is what distances and
/// the spatial index operate on; its length is always `3 * robot_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointConfiguration {
    positions: Vec<Point3D>,
}

impl JointConfiguration {
    pub fn new(positions: Vec<Point3D>) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &[Point3D] {
        &self.positions
    }

    pub fn robot_count(&self) -> usize {
        self.positions.len()
    }

    /// Dimensionality of the joint space (3 per robot)
    pub fn dimension(&self) -> usize {
        3 * self.positions.len()
    }

    pub fn flatten(&self) -> DVector<f64> {
        DVector::from_iterator(
            self.dimension(),
            self.positions.iter().flat_map(|p| p.to_array()),
        )
    }

    /// Euclidean norm of the difference of the flattened vectors
    pub fn distance(&self, other: &JointConfiguration) -> f64 {
        self.positions
            .iter()
            .zip(other.positions.iter())
            .map(|(a, b)| (a.x - b.x).powi(2) + (a.y - b.y).powi(2) + (a.z - b.z).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// Per-robot linear interpolation towards `other`
    pub fn interpolate(&self, other: &JointConfiguration, t: f64) -> JointConfiguration {
        JointConfiguration::new(
            self.positions
                .iter()
                .zip(other.positions.iter())
                .map(|(a, b)| a.lerp(b, t))
                .collect(),
        )
    }
}

impl From<Vec<Point3D>> for JointConfiguration {
    fn from(positions: Vec<Point3D>) -> Self {
        Self::new(positions)
    }
}

/// Ordered sequence of joint configurations, start first and goal last
pub type JointPath = Vec<JointConfiguration>;

/// Total joint-space length of a path
pub fn path_cost(path: &[JointConfiguration]) -> f64 {
    if path.len() < 2 {
        return 0.0;
    }
    path.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// Closed interval along one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct AxisBounds {
    pub low: f64,
    pub high: f64,
}

impl AxisBounds {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Shrink the interval by `margin` on both ends
    pub fn inset(&self, margin: f64) -> AxisBounds {
        AxisBounds::new(self.low + margin, self.high - margin)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    pub fn is_empty(&self) -> bool {
        !(self.low <= self.high)
    }
}

impl From<[f64; 2]> for AxisBounds {
    fn from(a: [f64; 2]) -> Self {
        Self { low: a[0], high: a[1] }
    }
}

impl From<AxisBounds> for [f64; 2] {
    fn from(b: AxisBounds) -> Self {
        [b.low, b.high]
    }
}

/// Axis-aligned workspace box shared by all robots
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[AxisBounds; 3]", into = "[AxisBounds; 3]")]
pub struct WorkspaceBounds {
    pub x: AxisBounds,
    pub y: AxisBounds,
    pub z: AxisBounds,
}

impl WorkspaceBounds {
    pub fn new(x: AxisBounds, y: AxisBounds, z: AxisBounds) -> Self {
        Self { x, y, z }
    }

    /// Same `[low, high]` range on all three axes
    pub fn cube(low: f64, high: f64) -> Self {
        let axis = AxisBounds::new(low, high);
        Self { x: axis, y: axis, z: axis }
    }

    pub fn from_array(bounds: [[f64; 2]; 3]) -> Self {
        Self {
            x: bounds[0].into(),
            y: bounds[1].into(),
            z: bounds[2].into(),
        }
    }

    pub fn axes(&self) -> [AxisBounds; 3] {
        [self.x, self.y, self.z]
    }

    /// Shrink every axis by `margin`; fails when an axis becomes empty
    pub fn inset(&self, margin: f64) -> RoboticsResult<WorkspaceBounds> {
        let inset = WorkspaceBounds::new(
            self.x.inset(margin),
            self.y.inset(margin),
            self.z.inset(margin),
        );
        if inset.axes().iter().any(AxisBounds::is_empty) {
            return Err(RoboticsError::InvalidParameter(format!(
                "margin {} leaves an empty workspace for bounds {:?}",
                margin, self
            )));
        }
        Ok(inset)
    }

    pub fn contains(&self, p: &Point3D) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }
}

impl From<[AxisBounds; 3]> for WorkspaceBounds {
    fn from(a: [AxisBounds; 3]) -> Self {
        Self { x: a[0], y: a[1], z: a[2] }
    }
}

impl From<WorkspaceBounds> for [AxisBounds; 3] {
    fn from(b: WorkspaceBounds) -> Self {
        b.axes()
    }
}

/// Per-call planning parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanRequest {
    /// Wall-clock budget in seconds
    pub timeout: f64,
    /// Seed for the sampler; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Degree cap used by the k-nearest fallback
    pub k_neighbors: usize,
}

impl PlanRequest {
    pub fn new(timeout: f64, seed: Option<u64>, k_neighbors: usize) -> Self {
        Self { timeout, seed, k_neighbors }
    }
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            timeout: 120.0,
            seed: None,
            k_neighbors: 20,
        }
    }
}
