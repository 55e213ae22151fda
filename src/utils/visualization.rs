//! Visualization utilities for multi_drone_prm
//!
//! Renders joint paths in 3D using gnuplot. Series are collected first and
//! drawn onto a single set of axes when the figure is shown or saved.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{
    JointConfiguration, PlanningEnvironment, Point3D, RoboticsError, RoboticsResult, WorkspaceBounds,
};
use crate::environment::{MultiDroneEnvironment, Obstacle};

/// Color palette for consistent styling
pub mod colors {
    pub const GREEN: &str = "#00AA00";
    pub const BLUE: &str = "#0000FF";
    pub const GRAY: &str = "#808080";

    pub const OBSTACLE: &str = GRAY;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;

    /// Cycled through for per-drone trajectories
    pub const DRONES: [&str; 8] = [
        "#E41A1C", "#377EB8", "#4DAF4A", "#984EA3", "#FF7F00", "#A65628", "#F781BF", "#999999",
    ];
}

#[derive(Debug, Clone)]
enum Series {
    Line {
        points: Vec<Point3D>,
        color: String,
        caption: String,
        width: f64,
    },
    Points {
        points: Vec<Point3D>,
        color: String,
        caption: String,
        symbol: char,
        size: f64,
    },
}

fn split_xyz(points: &[Point3D]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    (
        points.iter().map(|p| p.x).collect(),
        points.iter().map(|p| p.y).collect(),
        points.iter().map(|p| p.z).collect(),
    )
}

pub struct PathVisualizer {
    figure: Figure,
    title: String,
    bounds: Option<WorkspaceBounds>,
    series: Vec<Series>,
}

impl PathVisualizer {
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            title: String::new(),
            bounds: None,
            series: Vec::new(),
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    /// Fix the axis ranges to the workspace
    pub fn set_bounds(&mut self, bounds: WorkspaceBounds) -> &mut Self {
        self.bounds = Some(bounds);
        self
    }

    /// One polyline per drone, plus start and goal markers
    pub fn plot_joint_path(&mut self, path: &[JointConfiguration]) -> &mut Self {
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return self;
        };
        for drone in 0..first.robot_count() {
            let track: Vec<Point3D> = path.iter().map(|c| c.positions()[drone]).collect();
            self.series.push(Series::Line {
                points: track,
                color: colors::DRONES[drone % colors::DRONES.len()].to_string(),
                caption: format!("Drone {}", drone),
                width: 2.0,
            });
        }
        self.plot_markers(first.positions(), colors::START, "Start");
        self.plot_markers(last.positions(), colors::GOAL, "Goal");
        self
    }

    /// Obstacle centres; boxes and spheres are not meshed
    pub fn plot_obstacles(&mut self, obstacles: &[Obstacle]) -> &mut Self {
        if obstacles.is_empty() {
            return self;
        }
        self.series.push(Series::Points {
            points: obstacles.iter().map(Obstacle::center).collect(),
            color: colors::OBSTACLE.to_string(),
            caption: "Obstacles".to_string(),
            symbol: 'S',
            size: 2.0,
        });
        self
    }

    pub fn plot_markers(&mut self, points: &[Point3D], color: &str, caption: &str) -> &mut Self {
        self.series.push(Series::Points {
            points: points.to_vec(),
            color: color.to_string(),
            caption: caption.to_string(),
            symbol: 'O',
            size: 1.5,
        });
        self
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Finalize and show the plot
    pub fn show(&mut self) -> RoboticsResult<()> {
        self.render();
        self.figure
            .show()
            .map(|_| ())
            .map_err(|e| RoboticsError::VisualizationError(e.to_string()))
    }

    /// Save plot to SVG file
    pub fn save_svg(&mut self, path: &str) -> RoboticsResult<()> {
        self.render();
        self.figure
            .save_to_svg(path, 800, 600)
            .map_err(|e| RoboticsError::VisualizationError(e.to_string()))
    }

    fn render(&mut self) {
        self.figure.clear_axes();
        let axes = self.figure.axes3d();

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label("X [m]", &[]);
        axes.set_y_label("Y [m]", &[]);
        axes.set_z_label("Z [m]", &[]);

        if let Some(b) = self.bounds {
            axes.set_x_range(AutoOption::Fix(b.x.low), AutoOption::Fix(b.x.high));
            axes.set_y_range(AutoOption::Fix(b.y.low), AutoOption::Fix(b.y.high));
            axes.set_z_range(AutoOption::Fix(b.z.low), AutoOption::Fix(b.z.high));
        }

        for series in &self.series {
            match series {
                Series::Line { points, color, caption, width } => {
                    let (x, y, z) = split_xyz(points);
                    axes.lines(&x, &y, &z, &[Caption(caption.as_str()), Color(color.as_str()), LineWidth(*width)]);
                }
                Series::Points { points, color, caption, symbol, size } => {
                    let (x, y, z) = split_xyz(points);
                    axes.points(
                        &x,
                        &y,
                        &z,
                        &[
                            Caption(caption.as_str()),
                            Color(color.as_str()),
                            PointSymbol(*symbol),
                            PointSize(*size),
                        ],
                    );
                }
            }
        }
    }
}

impl Default for PathVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Plot a planned path inside its environment; save to `svg` and/or show it
pub fn visualize_paths(
    path: &[JointConfiguration],
    env: &MultiDroneEnvironment,
    svg: Option<&str>,
    show: bool,
) -> RoboticsResult<()> {
    let mut vis = PathVisualizer::new();
    vis.set_title(&format!("Centralised PRM* ({} drones)", env.num_drones()))
        .set_bounds(*env.bounds())
        .plot_obstacles(env.obstacles())
        .plot_joint_path(path);

    if let Some(file) = svg {
        vis.save_svg(file)?;
    }
    if show {
        vis.show()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two(a: [f64; 3], b: [f64; 3]) -> JointConfiguration {
        JointConfiguration::new(vec![a.into(), b.into()])
    }

    #[test]
    fn test_series_per_drone_plus_markers() {
        let path = vec![two([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]), two([5.0, 5.0, 5.0], [6.0, 5.0, 5.0])];
        let mut vis = PathVisualizer::new();
        vis.plot_joint_path(&path);
        assert_eq!(vis.series_count(), 4);
    }

    #[test]
    fn test_empty_inputs_add_nothing() {
        let mut vis = PathVisualizer::default();
        vis.plot_joint_path(&[]).plot_obstacles(&[]);
        assert_eq!(vis.series_count(), 0);
    }

    #[test]
    fn test_split_xyz() {
        let (x, y, z) = split_xyz(&[Point3D::new(1.0, 2.0, 3.0), Point3D::new(4.0, 5.0, 6.0)]);
        assert_eq!(x, vec![1.0, 4.0]);
        assert_eq!(y, vec![2.0, 5.0]);
        assert_eq!(z, vec![3.0, 6.0]);
    }
}
