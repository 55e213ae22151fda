//! Common traits defining interfaces for planners and their environments

use crate::common::error::RoboticsError;
use crate::common::types::*;

/// The simulation side of planning: endpoints, workspace and collision checks.
///
/// Both checks are synchronous and may be expensive. An `Err` means the
/// oracle itself failed and is propagated untouched by planners.
pub trait PlanningEnvironment {
    /// Fixed start configuration
    fn initial_configuration(&self) -> &JointConfiguration;

    /// Fixed goal configuration
    fn goal_positions(&self) -> &JointConfiguration;

    /// Workspace extent before any sampling margin is applied
    fn bounds(&self) -> &WorkspaceBounds;

    /// Single-configuration collision check
    fn is_valid(&self, config: &JointConfiguration) -> Result<bool, RoboticsError>;

    /// Continuous collision check of the straight-line motion `from -> to`
    fn motion_valid(
        &self,
        from: &JointConfiguration,
        to: &JointConfiguration,
    ) -> Result<bool, RoboticsError>;
}

/// Trait for multi-robot path planning algorithms
pub trait MultiRobotPlanner {
    /// Plan a joint path from the environment's start to its goal.
    ///
    /// An empty path means planning failed in an expected way.
    fn plan_request(&self, request: &PlanRequest) -> Result<JointPath, RoboticsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OpenSpace {
        start: JointConfiguration,
        goal: JointConfiguration,
        bounds: WorkspaceBounds,
    }

    impl PlanningEnvironment for OpenSpace {
        fn initial_configuration(&self) -> &JointConfiguration {
            &self.start
        }
        fn goal_positions(&self) -> &JointConfiguration {
            &self.goal
        }
        fn bounds(&self) -> &WorkspaceBounds {
            &self.bounds
        }
        fn is_valid(&self, config: &JointConfiguration) -> Result<bool, RoboticsError> {
            Ok(config.positions().iter().all(|p| self.bounds.contains(p)))
        }
        fn motion_valid(
            &self,
            from: &JointConfiguration,
            to: &JointConfiguration,
        ) -> Result<bool, RoboticsError> {
            Ok(self.is_valid(from)? && self.is_valid(to)?)
        }
    }

    struct StraightLine<'a, E: PlanningEnvironment>(&'a E);

    impl<E: PlanningEnvironment> MultiRobotPlanner for StraightLine<'_, E> {
        fn plan_request(&self, _request: &PlanRequest) -> Result<JointPath, RoboticsError> {
            let start = self.0.initial_configuration();
            let goal = self.0.goal_positions();
            if self.0.motion_valid(start, goal)? {
                Ok(vec![start.clone(), goal.clone()])
            } else {
                Ok(Vec::new())
            }
        }
    }

    #[test]
    fn test_planner_trait_over_environment() {
        let env = OpenSpace {
            start: JointConfiguration::new(vec![Point3D::new(1.0, 1.0, 1.0)]),
            goal: JointConfiguration::new(vec![Point3D::new(9.0, 9.0, 9.0)]),
            bounds: WorkspaceBounds::cube(0.0, 10.0),
        };
        let path = StraightLine(&env).plan_request(&PlanRequest::default()).unwrap();
        assert_eq!(path.len(), 2);
    }
}
