// End-to-end planning scenarios through the public API

use std::cell::Cell;
use std::thread::sleep;
use std::time::Duration;

use multi_drone_prm::environment::{EnvironmentConfig, MultiDroneEnvironment};
use multi_drone_prm::{
    CentralisedPrmStar, JointConfiguration, MultiRobotPlanner, PlanFailure, PlanRequest,
    PlanningEnvironment, Point3D, PrmStarConfig, RoboticsResult, WorkspaceBounds,
};

struct ScriptedOracle {
    start: JointConfiguration,
    goal: JointConfiguration,
    bounds: WorkspaceBounds,
    goal_valid: bool,
    latency: Duration,
    validity_calls: Cell<usize>,
    motion_calls: Cell<usize>,
}

impl ScriptedOracle {
    fn new() -> Self {
        ScriptedOracle {
            start: JointConfiguration::new(vec![Point3D::new(10.0, 10.0, 10.0), Point3D::new(20.0, 10.0, 10.0)]),
            goal: JointConfiguration::new(vec![Point3D::new(80.0, 80.0, 80.0), Point3D::new(70.0, 80.0, 80.0)]),
            bounds: WorkspaceBounds::cube(0.0, 100.0),
            goal_valid: true,
            latency: Duration::ZERO,
            validity_calls: Cell::new(0),
            motion_calls: Cell::new(0),
        }
    }
}

impl PlanningEnvironment for ScriptedOracle {
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
        self.validity_calls.set(self.validity_calls.get() + 1);
        sleep(self.latency);
        Ok(self.goal_valid || *config != self.goal)
    }
    fn motion_valid(&self, _from: &JointConfiguration, _to: &JointConfiguration) -> RoboticsResult<bool> {
        self.motion_calls.set(self.motion_calls.get() + 1);
        sleep(self.latency);
        Ok(true)
    }
}

fn scenario_config() -> PrmStarConfig {
    PrmStarConfig::default().with_samples(10).with_connection_radius(200.0)
}

#[test]
fn always_valid_oracle_connects_start_to_goal_directly() {
    let oracle = ScriptedOracle::new();
    let planner = CentralisedPrmStar::new(&oracle, scenario_config()).unwrap();
    let path = planner.plan(5.0, Some(2024), 20).unwrap();
    assert_eq!(path, vec![oracle.start.clone(), oracle.goal.clone()]);
}

#[test]
fn invalid_goal_returns_empty_before_sampling() {
    let mut oracle = ScriptedOracle::new();
    oracle.goal_valid = false;
    let planner = CentralisedPrmStar::new(&oracle, scenario_config()).unwrap();
    let report = planner.plan_with_report(&PlanRequest::new(5.0, Some(1), 20)).unwrap();
    assert_eq!(report.result, Err(PlanFailure::EndpointInvalid));
    assert_eq!(oracle.validity_calls.get(), 2);
    assert_eq!(oracle.motion_calls.get(), 0);
    assert_eq!(report.stats.samples_drawn, 0);
}

#[test]
fn slow_oracle_exhausts_budget_without_search() {
    let mut oracle = ScriptedOracle::new();
    oracle.latency = Duration::from_millis(30);
    let planner = CentralisedPrmStar::new(&oracle, scenario_config()).unwrap();
    let report = planner.plan_with_report(&PlanRequest::new(0.01, Some(1), 20)).unwrap();
    assert_eq!(report.result, Err(PlanFailure::BudgetExhausted));
    assert_eq!(oracle.motion_calls.get(), 0);
    assert!(planner.plan_request(&PlanRequest::new(0.01, Some(1), 20)).unwrap().is_empty());
}

fn load_env(name: &str) -> (MultiDroneEnvironment, PrmStarConfig) {
    let path = format!("{}/envs/{}", env!("CARGO_MANIFEST_DIR"), name);
    let config = EnvironmentConfig::load(&path).unwrap();
    let env = MultiDroneEnvironment::from_config(&config).unwrap();
    (env, config.planner.unwrap_or_default())
}

#[test]
fn empty_environment_from_file_is_solved() {
    let (env, config) = load_env("env_empty.toml");
    let planner = CentralisedPrmStar::new(&env, config).unwrap();
    let path = planner.plan(30.0, Some(7), 20).unwrap();
    assert!(!path.is_empty());
    assert_eq!(path.first(), Some(env.initial_configuration()));
    assert_eq!(path.last(), Some(env.goal_positions()));
    for w in path.windows(2) {
        assert!(env.motion_valid(&w[0], &w[1]).unwrap());
    }
}

#[test]
fn fixed_seed_reproduces_the_same_path() {
    let (env, config) = load_env("env_wall.toml");
    let config = config.with_samples(150);
    let planner = CentralisedPrmStar::new(&env, config).unwrap();
    let request = PlanRequest::new(120.0, Some(11), 15);
    let a = planner.plan_with_report(&request).unwrap();
    let b = planner.plan_with_report(&request).unwrap();
    assert_eq!(a.result, b.result);
    assert_eq!(a.stats.samples_drawn, b.stats.samples_drawn);
    assert!(a.stats.samples_accepted < 150);
}
