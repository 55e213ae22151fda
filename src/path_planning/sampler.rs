//! Uniform sampling of joint configurations inside an inset workspace box
//!
//! Each robot's three coordinates are drawn independently. Collisions
//! between robots or with obstacles are left to the environment's validity
//! check.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};

use crate::common::{JointConfiguration, Point3D, RoboticsError, RoboticsResult, WorkspaceBounds};

pub struct JointSampler {
    bounds: WorkspaceBounds,
    axes: [Uniform<f64>; 3],
    robot_count: usize,
    rng: StdRng,
}

impl JointSampler {
    /// Build a sampler over `bounds` shrunk by `margin` on every side.
    ///
    /// With `seed` set the draw sequence is reproducible; without it the
    /// generator is seeded from OS entropy.
    pub fn new(
        bounds: &WorkspaceBounds,
        margin: f64,
        robot_count: usize,
        seed: Option<u64>,
    ) -> RoboticsResult<Self> {
        if robot_count == 0 {
            return Err(RoboticsError::InvalidParameter(
                "sampler needs at least one robot".to_string(),
            ));
        }
        let inset = bounds.inset(margin)?;
        if inset.axes().iter().any(|a| !a.low.is_finite() || !a.high.is_finite()) {
            return Err(RoboticsError::InvalidParameter(format!(
                "workspace bounds must be finite, got {:?}",
                inset
            )));
        }
        let axes = inset.axes().map(|a| Uniform::new_inclusive(a.low, a.high));
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            bounds: inset,
            axes,
            robot_count,
            rng,
        })
    }

    /// The inset box samples are drawn from
    pub fn sampling_bounds(&self) -> &WorkspaceBounds {
        &self.bounds
    }

    /// Draw one joint configuration, robot by robot, x then y then z
    pub fn sample(&mut self) -> JointConfiguration {
        let positions = (0..self.robot_count)
            .map(|_| {
                Point3D::new(
                    self.axes[0].sample(&mut self.rng),
                    self.axes[1].sample(&mut self.rng),
                    self.axes[2].sample(&mut self.rng),
                )
            })
            .collect();
        JointConfiguration::new(positions)
    }
}
