//! Static obstacles of the drone workspace

use serde::{Deserialize, Serialize};

use crate::common::Point3D;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Obstacle {
    Sphere { center: Point3D, radius: f64 },
    /// Axis-aligned box
    Box { min: Point3D, max: Point3D },
}

impl Obstacle {
    pub fn sphere(center: Point3D, radius: f64) -> Self {
        Obstacle::Sphere { center, radius }
    }

    pub fn cuboid(min: Point3D, max: Point3D) -> Self {
        Obstacle::Box { min, max }
    }

    /// Signed distance from `p` to the obstacle surface, negative inside
    pub fn signed_distance(&self, p: &Point3D) -> f64 {
        match self {
            Obstacle::Sphere { center, radius } => center.distance(p) - radius,
            Obstacle::Box { min, max } => {
                let q = [
                    (min.x - p.x).max(p.x - max.x),
                    (min.y - p.y).max(p.y - max.y),
                    (min.z - p.z).max(p.z - max.z),
                ];
                let outside = q.iter().map(|d| d.max(0.0).powi(2)).sum::<f64>().sqrt();
                let inside = q[0].max(q[1]).max(q[2]).min(0.0);
                outside + inside
            }
        }
    }

    /// Whether a ball of `radius` at `p` touches the obstacle
    pub fn collides(&self, p: &Point3D, radius: f64) -> bool {
        self.signed_distance(p) < radius
    }

    pub fn center(&self) -> Point3D {
        match self {
            Obstacle::Sphere { center, .. } => *center,
            Obstacle::Box { min, max } => min.lerp(max, 0.5),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        match self {
            Obstacle::Sphere { radius, .. } => *radius >= 0.0,
            Obstacle::Box { min, max } => min.x <= max.x && min.y <= max.y && min.z <= max.z,
        }
    }
}
