//! Reference drone-team environment
//!
//! Drones are spheres of `drone_radius`. A joint configuration is valid when
//! every drone is fully inside the workspace, clear of every obstacle, and
//! at least `2 * drone_radius` away from every other drone. Motions are
//! checked by validating evenly spaced interpolated configurations.

use std::fs;
use std::path::Path;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::{
    JointConfiguration, PlanningEnvironment, Point3D, RoboticsError, RoboticsResult,
    WorkspaceBounds,
};
use crate::environment::obstacles::Obstacle;
use crate::path_planning::PrmStarConfig;

fn default_drone_radius() -> f64 {
    0.3
}

fn default_motion_resolution() -> f64 {
    0.5
}

/// On-disk (TOML) description of an environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub bounds: WorkspaceBounds,
    pub initial_configuration: Vec<Point3D>,
    pub goal_positions: Vec<Point3D>,
    #[serde(default = "default_drone_radius")]
    pub drone_radius: f64,
    /// Largest per-drone step between checked motion configurations
    #[serde(default = "default_motion_resolution")]
    pub motion_resolution: f64,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    /// Planner overrides shipped with the environment
    #[serde(default)]
    pub planner: Option<PrmStarConfig>,
}

impl EnvironmentConfig {
    pub fn from_toml_str(text: &str) -> RoboticsResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> RoboticsResult<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn num_drones(&self) -> usize {
        self.initial_configuration.len()
    }
}

#[derive(Debug, Clone)]
pub struct MultiDroneEnvironment {
    start: JointConfiguration,
    goal: JointConfiguration,
    bounds: WorkspaceBounds,
    drone_radius: f64,
    motion_resolution: f64,
    obstacles: Vec<Obstacle>,
}

impl MultiDroneEnvironment {
    pub fn new(
        start: JointConfiguration,
        goal: JointConfiguration,
        bounds: WorkspaceBounds,
        drone_radius: f64,
        motion_resolution: f64,
        obstacles: Vec<Obstacle>,
    ) -> RoboticsResult<Self> {
        if start.robot_count() == 0 || start.robot_count() != goal.robot_count() {
            return Err(RoboticsError::InvalidParameter(format!(
                "start has {} drones and goal has {}",
                start.robot_count(),
                goal.robot_count()
            )));
        }
        if !(drone_radius >= 0.0) || !(motion_resolution > 0.0) {
            return Err(RoboticsError::InvalidParameter(format!(
                "drone_radius {} must be >= 0 and motion_resolution {} > 0",
                drone_radius, motion_resolution
            )));
        }
        if let Some(bad) = obstacles.iter().find(|o| !o.is_well_formed()) {
            return Err(RoboticsError::InvalidParameter(format!("malformed obstacle {:?}", bad)));
        }
        Ok(Self {
            start,
            goal,
            bounds,
            drone_radius,
            motion_resolution,
            obstacles,
        })
    }

    pub fn from_config(config: &EnvironmentConfig) -> RoboticsResult<Self> {
        Self::new(
            JointConfiguration::new(config.initial_configuration.clone()),
            JointConfiguration::new(config.goal_positions.clone()),
            config.bounds,
            config.drone_radius,
            config.motion_resolution,
            config.obstacles.clone(),
        )
    }

    pub fn load<P: AsRef<Path>>(path: P) -> RoboticsResult<Self> {
        Self::from_config(&EnvironmentConfig::load(path)?)
    }

    pub fn num_drones(&self) -> usize {
        self.start.robot_count()
    }

    pub fn drone_radius(&self) -> f64 {
        self.drone_radius
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    fn check_shape(&self, config: &JointConfiguration) -> RoboticsResult<()> {
        if config.robot_count() != self.num_drones() {
            return Err(RoboticsError::InvalidParameter(format!(
                "configuration has {} drones, environment has {}",
                config.robot_count(),
                self.num_drones()
            )));
        }
        Ok(())
    }

    fn drone_is_free(&self, p: &Point3D) -> bool {
        let r = self.drone_radius;
        let inside = self
            .bounds
            .axes()
            .iter()
            .zip(p.to_array())
            .all(|(axis, v)| v - r >= axis.low && v + r <= axis.high);
        inside && !self.obstacles.iter().any(|o| o.collides(p, r))
    }

    fn drones_separated(&self, config: &JointConfiguration) -> bool {
        let min_gap = 2.0 * self.drone_radius;
        config
            .positions()
            .iter()
            .tuple_combinations()
            .all(|(a, b)| a.distance(b) >= min_gap)
    }

    fn config_is_free(&self, config: &JointConfiguration) -> bool {
        config.positions().iter().all(|p| self.drone_is_free(p)) && self.drones_separated(config)
    }
}

impl PlanningEnvironment for MultiDroneEnvironment {
    fn initial_configuration(&self) -> &JointConfiguration {
        &self.start
    }

    fn goal_positions(&self) -> &JointConfiguration {
        &self.goal
    }

    fn bounds(&self) -> &WorkspaceBounds {
        &self.bounds
    }

    fn is_valid(&self, config: &JointConfiguration) -> RoboticsResult<bool> {
        self.check_shape(config)?;
        Ok(self.config_is_free(config))
    }

    fn motion_valid(&self, from: &JointConfiguration, to: &JointConfiguration) -> RoboticsResult<bool> {
        self.check_shape(from)?;
        self.check_shape(to)?;

        let max_step = from
            .positions()
            .iter()
            .zip(to.positions())
            .map(|(a, b)| a.distance(b))
            .fold(0.0, f64::max);
        let steps = ((max_step / self.motion_resolution).ceil() as usize).max(1);

        for s in 0..=steps {
            let t = s as f64 / steps as f64;
            if !self.config_is_free(&from.interpolate(to, t)) {
                debug!(step = s, steps, "motion blocked");
                return Ok(false);
            }
        }
        Ok(true)
    }
}
