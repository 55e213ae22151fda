//! Centralised PRM* planner for a team of drones
//!
//! The whole team is planned as one robot in the joint configuration space.
//! A call runs through
//! `ValidateEndpoints -> Sampling -> Building -> Searching` under a shared
//! wall-clock budget:
//!
//! * sampling stops once only `sampling_time_fraction` of the budget is left
//!   (or `num_samples` nodes exist),
//! * roadmap construction stops once only `building_time_fraction` is left,
//! * search only runs if the budget is not fully spent.
//!
//! Invalid endpoints, an exhausted budget and a disconnected roadmap are
//! normal outcomes and yield an empty path. Oracle errors are propagated.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::common::{
    path_cost, JointConfiguration, JointPath, MultiRobotPlanner, PlanFailure, PlanRequest,
    PlanningEnvironment, RoboticsError, RoboticsResult,
};
use crate::path_planning::dijkstra::shortest_path;
use crate::path_planning::roadmap::RoadmapBuilder;
use crate::path_planning::sampler::JointSampler;
use crate::path_planning::spatial_index::SpatialIndexKind;
use crate::path_planning::time_budget::TimeBudget;

/// Constructor-level planner parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrmStarConfig {
    /// Target roadmap size, start included; goal is appended on top
    pub num_samples: usize,
    /// Floor for the connection radius
    pub connection_radius: f64,
    /// Inset applied to every side of the workspace before sampling
    pub margin: f64,
    /// Scale of the PRM* radius term
    pub gamma: f64,
    /// Sampling runs while more than this share of the budget remains
    pub sampling_time_fraction: f64,
    /// Roadmap construction runs while more than this share remains
    pub building_time_fraction: f64,
    pub spatial_index: SpatialIndexKind,
}

impl Default for PrmStarConfig {
    fn default() -> Self {
        Self {
            num_samples: 2000,
            connection_radius: 30.0,
            margin: 1.5,
            gamma: 50.0,
            sampling_time_fraction: 0.5,
            building_time_fraction: 0.4,
            spatial_index: SpatialIndexKind::KdTree,
        }
    }
}

impl PrmStarConfig {
    pub fn with_samples(mut self, num_samples: usize) -> Self {
        self.num_samples = num_samples;
        self
    }

    pub fn with_connection_radius(mut self, radius: f64) -> Self {
        self.connection_radius = radius;
        self
    }

    pub fn validate(&self) -> RoboticsResult<()> {
        let invalid = |msg: String| Err(RoboticsError::InvalidParameter(msg));
        if self.num_samples == 0 {
            return invalid("num_samples must be at least 1".to_string());
        }
        for (name, value) in [
            ("connection_radius", self.connection_radius),
            ("margin", self.margin),
            ("gamma", self.gamma),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{} must be finite and non-negative, got {}", name, value));
            }
        }
        for (name, value) in [
            ("sampling_time_fraction", self.sampling_time_fraction),
            ("building_time_fraction", self.building_time_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{} must lie in [0, 1], got {}", name, value));
            }
        }
        if self.building_time_fraction > self.sampling_time_fraction {
            return invalid(format!(
                "building_time_fraction {} exceeds sampling_time_fraction {}",
                self.building_time_fraction, self.sampling_time_fraction
            ));
        }
        Ok(())
    }
}

/// Where a planning call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanPhase {
    ValidateEndpoints,
    Sampling,
    Building,
    Searching,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanStats {
    /// Candidates drawn from the sampler, accepted or not
    pub samples_drawn: usize,
    /// Interior samples accepted by the validity check
    pub samples_accepted: usize,
    /// Roadmap nodes, start and goal included
    pub node_count: usize,
    pub edge_count: usize,
    pub motion_checks: usize,
    pub nodes_processed: usize,
    pub connection_radius: f64,
    pub terminal_phase: PlanPhase,
    pub elapsed: Duration,
    /// Joint-space length of the returned path
    pub path_cost: Option<f64>,
}

impl PlanStats {
    fn new() -> Self {
        PlanStats {
            samples_drawn: 0,
            samples_accepted: 0,
            node_count: 0,
            edge_count: 0,
            motion_checks: 0,
            nodes_processed: 0,
            connection_radius: 0.0,
            terminal_phase: PlanPhase::ValidateEndpoints,
            elapsed: Duration::ZERO,
            path_cost: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlanReport {
    pub result: Result<JointPath, PlanFailure>,
    pub stats: PlanStats,
}

impl PlanReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The path, or an empty one on failure
    pub fn into_path(self) -> JointPath {
        self.result.unwrap_or_default()
    }
}

pub struct CentralisedPrmStar<'a, E: PlanningEnvironment + ?Sized> {
    env: &'a E,
    config: PrmStarConfig,
    robot_count: usize,
}

impl<'a, E: PlanningEnvironment + ?Sized> CentralisedPrmStar<'a, E> {
    pub fn new(env: &'a E, config: PrmStarConfig) -> RoboticsResult<Self> {
        config.validate()?;
        let robot_count = env.initial_configuration().robot_count();
        if robot_count == 0 {
            return Err(RoboticsError::InvalidParameter(
                "initial configuration has no robots".to_string(),
            ));
        }
        if env.goal_positions().robot_count() != robot_count {
            return Err(RoboticsError::InvalidParameter(format!(
                "start has {} robots but goal has {}",
                robot_count,
                env.goal_positions().robot_count()
            )));
        }
        env.bounds().inset(config.margin)?;
        Ok(Self {
            env,
            config,
            robot_count,
        })
    }

    pub fn config(&self) -> &PrmStarConfig {
        &self.config
    }

    pub fn robot_count(&self) -> usize {
        self.robot_count
    }

    /// Plan with `timeout` seconds; an empty path signals failure
    pub fn plan(&self, timeout: f64, seed: Option<u64>, k_neighbors: usize) -> RoboticsResult<JointPath> {
        self.plan_with_report(&PlanRequest::new(timeout, seed, k_neighbors))
            .map(PlanReport::into_path)
    }

    pub fn plan_with_report(&self, request: &PlanRequest) -> RoboticsResult<PlanReport> {
        if !request.timeout.is_finite() || request.timeout < 0.0 {
            return Err(RoboticsError::InvalidParameter(format!(
                "timeout must be finite and non-negative, got {}",
                request.timeout
            )));
        }
        let budget = TimeBudget::from_secs_f64(request.timeout);
        let mut stats = PlanStats::new();
        let result = self.run(request, &budget, &mut stats)?;
        stats.elapsed = budget.elapsed();
        stats.path_cost = result.as_ref().ok().map(|p| path_cost(p));

        match &result {
            Ok(path) => info!(
                steps = path.len(),
                elapsed = ?stats.elapsed,
                nodes = stats.node_count,
                edges = stats.edge_count,
                "path found"
            ),
            Err(failure) => info!(
                %failure,
                phase = ?stats.terminal_phase,
                elapsed = ?stats.elapsed,
                nodes = stats.node_count,
                edges = stats.edge_count,
                "planning failed"
            ),
        }
        Ok(PlanReport { result, stats })
    }

    fn run(
        &self,
        request: &PlanRequest,
        budget: &TimeBudget,
        stats: &mut PlanStats,
    ) -> RoboticsResult<Result<JointPath, PlanFailure>> {
        let start = self.env.initial_configuration();
        let goal = self.env.goal_positions();

        stats.terminal_phase = PlanPhase::ValidateEndpoints;
        if !self.env.is_valid(start)? || !self.env.is_valid(goal)? {
            warn!("start or goal configuration is invalid");
            return Ok(Err(PlanFailure::EndpointInvalid));
        }

        stats.terminal_phase = PlanPhase::Sampling;
        let samples = self.collect_samples(request.seed, budget, stats)?;
        stats.node_count = samples.len();
        info!(nodes = samples.len(), "collected nodes including start and goal");

        stats.terminal_phase = PlanPhase::Building;
        if budget.is_exhausted() {
            return Ok(Err(PlanFailure::BudgetExhausted));
        }
        let builder = RoadmapBuilder {
            connection_radius: self.config.connection_radius,
            gamma: self.config.gamma,
            k_neighbors: request.k_neighbors,
            stop_fraction: self.config.building_time_fraction,
            index_kind: self.config.spatial_index,
        };
        let built = builder.build(&samples, self.env, budget)?;
        stats.edge_count = built.roadmap.edge_count();
        stats.motion_checks = built.motion_checks;
        stats.nodes_processed = built.nodes_processed;
        stats.connection_radius = built.radius;

        if budget.is_exhausted() {
            return Ok(Err(PlanFailure::BudgetExhausted));
        }

        stats.terminal_phase = PlanPhase::Searching;
        let goal_index = samples.len() - 1;
        match shortest_path(&built.roadmap, 0, goal_index) {
            Some(found) => {
                debug!(cost = found.cost, hops = found.nodes.len(), "shortest path");
                Ok(Ok(found.nodes.into_iter().map(|i| samples[i].clone()).collect()))
            }
            None => Ok(Err(PlanFailure::NoPathFound)),
        }
    }

    /// Start, accepted interior samples, then goal
    fn collect_samples(
        &self,
        seed: Option<u64>,
        budget: &TimeBudget,
        stats: &mut PlanStats,
    ) -> RoboticsResult<Vec<JointConfiguration>> {
        let mut sampler = JointSampler::new(self.env.bounds(), self.config.margin, self.robot_count, seed)?;
        let mut samples = vec![self.env.initial_configuration().clone()];

        while samples.len() < self.config.num_samples
            && budget.has_more_than(self.config.sampling_time_fraction)
        {
            let candidate = sampler.sample();
            stats.samples_drawn += 1;
            if self.env.is_valid(&candidate)? {
                samples.push(candidate);
                stats.samples_accepted += 1;
            }
        }
        debug!(
            drawn = stats.samples_drawn,
            accepted = stats.samples_accepted,
            "sampling finished"
        );

        samples.push(self.env.goal_positions().clone());
        Ok(samples)
    }
}

impl<E: PlanningEnvironment + ?Sized> MultiRobotPlanner for CentralisedPrmStar<'_, E> {
    fn plan_request(&self, request: &PlanRequest) -> RoboticsResult<JointPath> {
        self.plan_with_report(request).map(PlanReport::into_path)
    }
}
