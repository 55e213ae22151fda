//! Repeated planning trials and their summary statistics

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::common::{JointPath, PlanRequest, PlanningEnvironment, RoboticsResult};
use crate::path_planning::{CentralisedPrmStar, PrmStarConfig};

/// Outcome of a single trial
#[derive(Debug, Clone)]
pub struct TrialRecord {
    pub index: usize,
    pub success: bool,
    pub duration: Duration,
    /// Empty unless the trial succeeded
    pub path: JointPath,
    /// Oracle error message when the trial aborted
    pub error: Option<String>,
}

/// How the 95% interval around the mean planning time is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntervalMethod {
    /// `1.96 * std / sqrt(n)` with the population deviation
    #[default]
    Normal,
    /// Student-t quantile with `n - 1` degrees of freedom times the
    /// standard error of the mean; zero for a single success
    StudentT,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrialSummary {
    pub trials: usize,
    pub successes: usize,
    pub method: IntervalMethod,
    /// Mean planning time over successful trials [s]
    pub mean_secs: Option<f64>,
    /// Standard deviation over successful trials [s]; population for
    /// [`IntervalMethod::Normal`], sample for [`IntervalMethod::StudentT`]
    pub std_secs: Option<f64>,
    /// Half-width of the 95% confidence interval [s]
    pub ci95_secs: Option<f64>,
}

impl TrialSummary {
    pub fn success_rate(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.successes as f64 / self.trials as f64
    }
}

/// The earliest trial that found a path
pub fn first_success(records: &[TrialRecord]) -> Option<&TrialRecord> {
    records.iter().find(|r| r.success)
}

/// Two-sided 95% Student-t critical values for 1..=30 degrees of freedom
const T_975: [f64; 30] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, 2.201, 2.179, 2.160,
    2.145, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086, 2.080, 2.074, 2.069, 2.064, 2.060, 2.056,
    2.052, 2.048, 2.045, 2.042,
];

const Z_975: f64 = 1.959_963_984_540_054;

/// 0.975 quantile of Student's t; a Cornish-Fisher expansion past the table
fn t_quantile_975(dof: usize) -> f64 {
    if dof == 0 {
        return f64::NAN;
    }
    if let Some(t) = T_975.get(dof - 1) {
        return *t;
    }
    let z = Z_975;
    let v = dof as f64;
    z + (z.powi(3) + z) / (4.0 * v)
        + (5.0 * z.powi(5) + 16.0 * z.powi(3) + 3.0 * z) / (96.0 * v * v)
        + (3.0 * z.powi(7) + 19.0 * z.powi(5) + 17.0 * z.powi(3) - 15.0 * z) / (384.0 * v.powi(3))
}

/// Run `trials` independent planning calls.
///
/// With a seed in `request`, trial `i` uses `seed + i`. A failing oracle
/// marks that trial as failed instead of aborting the whole run.
pub fn run_trials<E: PlanningEnvironment + ?Sized>(
    env: &E,
    config: &PrmStarConfig,
    request: &PlanRequest,
    trials: usize,
) -> RoboticsResult<Vec<TrialRecord>> {
    let planner = CentralisedPrmStar::new(env, config.clone())?;
    let mut records = Vec::with_capacity(trials);

    for index in 0..trials {
        let trial_request = PlanRequest {
            seed: request.seed.map(|s| s.wrapping_add(index as u64)),
            ..*request
        };
        let started = Instant::now();
        let record = match planner.plan(trial_request.timeout, trial_request.seed, trial_request.k_neighbors) {
            Ok(path) => TrialRecord {
                index,
                success: !path.is_empty(),
                duration: started.elapsed(),
                path,
                error: None,
            },
            Err(e) => {
                warn!(trial = index + 1, error = %e, "trial aborted");
                TrialRecord {
                    index,
                    success: false,
                    duration: started.elapsed(),
                    path: JointPath::new(),
                    error: Some(e.to_string()),
                }
            }
        };
        if record.success {
            info!(trial = index + 1, secs = record.duration.as_secs_f64(), "path found");
        } else {
            info!(trial = index + 1, "no path found");
        }
        records.push(record);
    }
    Ok(records)
}

/// Summary with the normal-approximation interval
pub fn summarize(records: &[TrialRecord]) -> TrialSummary {
    summarize_with(records, IntervalMethod::Normal)
}

pub fn summarize_with(records: &[TrialRecord], method: IntervalMethod) -> TrialSummary {
    let times: Vec<f64> = records
        .iter()
        .filter(|r| r.success)
        .map(|r| r.duration.as_secs_f64())
        .collect();

    let (mean_secs, std_secs, ci95_secs) = if times.is_empty() {
        (None, None, None)
    } else {
        let n = times.len() as f64;
        let mean = times.iter().sum::<f64>() / n;
        let squares = times.iter().map(|t| (t - mean).powi(2)).sum::<f64>();
        match method {
            IntervalMethod::Normal => {
                let std = (squares / n).sqrt();
                (Some(mean), Some(std), Some(1.96 * std / n.sqrt()))
            }
            IntervalMethod::StudentT if times.len() == 1 => (Some(mean), None, Some(0.0)),
            IntervalMethod::StudentT => {
                let std = (squares / (n - 1.0)).sqrt();
                let sem = std / n.sqrt();
                (Some(mean), Some(std), Some(sem * t_quantile_975(times.len() - 1)))
            }
        }
    };

    TrialSummary {
        trials: records.len(),
        successes: times.len(),
        method,
        mean_secs,
        std_secs,
        ci95_secs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::MultiDroneEnvironment;
    use crate::common::{JointConfiguration, Point3D, WorkspaceBounds};
    use approx::assert_relative_eq;

    fn record(success: bool, secs: f64) -> TrialRecord {
        TrialRecord {
            index: 0,
            success,
            duration: Duration::from_secs_f64(secs),
            path: if success {
                vec![JointConfiguration::new(vec![Point3D::origin()]); 2]
            } else {
                Vec::new()
            },
            error: None,
        }
    }

    #[test]
    fn test_summary_statistics() {
        let records = vec![record(true, 1.0), record(true, 3.0), record(false, 9.0)];
        let summary = summarize(&records);
        assert_eq!(summary.trials, 3);
        assert_eq!(summary.successes, 2);
        assert_relative_eq!(summary.mean_secs.unwrap(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(summary.std_secs.unwrap(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(summary.ci95_secs.unwrap(), 1.96 / 2f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(summary.success_rate(), 2.0 / 3.0);
    }

    #[test]
    fn test_summary_without_successes() {
        let summary = summarize(&[record(false, 1.0)]);
        assert_eq!(summary.successes, 0);
        assert_eq!(summary.mean_secs, None);
        assert_eq!(summarize(&[]).success_rate(), 0.0);
        let t = summarize_with(&[record(false, 1.0)], IntervalMethod::StudentT);
        assert_eq!(t.ci95_secs, None);
    }

    #[test]
    fn test_student_t_interval() {
        let records = vec![record(true, 1.0), record(true, 2.0), record(true, 3.0)];
        let summary = summarize_with(&records, IntervalMethod::StudentT);
        assert_eq!(summary.method, IntervalMethod::StudentT);
        assert_relative_eq!(summary.mean_secs.unwrap(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(summary.std_secs.unwrap(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(summary.ci95_secs.unwrap(), 4.303 / 3f64.sqrt(), epsilon = 1e-9);

        // wider than the normal approximation on small samples
        let normal = summarize(&records);
        assert!(summary.ci95_secs.unwrap() > normal.ci95_secs.unwrap());
    }

    #[test]
    fn test_student_t_single_success_has_zero_width() {
        let summary = summarize_with(&[record(true, 4.0), record(false, 1.0)], IntervalMethod::StudentT);
        assert_eq!(summary.mean_secs, Some(4.0));
        assert_eq!(summary.ci95_secs, Some(0.0));
    }

    #[test]
    fn test_t_quantile_approaches_normal() {
        assert_relative_eq!(t_quantile_975(1), 12.706);
        assert_relative_eq!(t_quantile_975(40), 2.021, epsilon = 1e-3);
        assert_relative_eq!(t_quantile_975(120), 1.980, epsilon = 1e-3);
        assert!(t_quantile_975(31) < t_quantile_975(30));
        assert!(t_quantile_975(10_000) - Z_975 < 1e-3);
    }

    #[test]
    fn test_first_success_is_reported() {
        let mut records = vec![record(false, 1.0), record(true, 2.0), record(true, 3.0)];
        records[1].index = 1;
        records[2].index = 2;
        assert_eq!(first_success(&records).map(|r| r.index), Some(1));
        assert!(first_success(&records[..1]).is_none());
    }

    #[test]
    fn test_trials_in_open_space_succeed() {
        let env = MultiDroneEnvironment::new(
            JointConfiguration::new(vec![Point3D::new(10.0, 10.0, 10.0), Point3D::new(20.0, 10.0, 10.0)]),
            JointConfiguration::new(vec![Point3D::new(30.0, 30.0, 30.0), Point3D::new(40.0, 30.0, 30.0)]),
            WorkspaceBounds::cube(0.0, 50.0),
            0.3,
            1.0,
            Vec::new(),
        )
        .unwrap();
        let config = PrmStarConfig::default().with_samples(20).with_connection_radius(100.0);
        let records = run_trials(&env, &config, &PlanRequest::new(10.0, Some(4), 30), 3).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.success && r.path.len() == 2));
    }
}
