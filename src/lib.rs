pub mod dijkstra;
pub mod entry;
mod error;
pub mod priority_queue;

pub use dijkstra::{shortest_paths, Grid, Neighbourhood, Point, ShortestPaths};
pub use entry::{Comparator, Entry, Order};
pub use error::{EmptyQueue, Error};
use itertools::Itertools;
use log::info;
pub use priority_queue::{PriorityQueue, ScoredPairQueue};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    cost: Vec<Vec<f64>>,
    sources: Vec<Point>,
    #[serde(default)]
    targets: Vec<Point>,
    #[serde(default)]
    neighbourhood: Neighbourhood,
    #[serde(default = "path_limit_default")]
    path_limit: usize,
}

fn path_limit_default() -> usize {
    usize::MAX
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Negative and non-finite costs mark walls.
    fn grid(&self) -> Result<Grid, Error> {
        let rows = self
            .cost
            .iter()
            .map(|r| {
                r.iter()
                    .map(|&c| if c.is_finite() && c >= 0.0 { c } else { f64::INFINITY })
                    .collect_vec()
            })
            .collect_vec();
        Grid::from_rows(&rows)
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TargetReport {
    pub target: Point,
    pub distance: Option<f64>,
    pub path: Vec<Point>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Report {
    pub height: usize,
    pub width: usize,
    pub reachable: usize,
    pub targets: Vec<TargetReport>,
}

pub fn run(config: &Config) -> Result<Report, Error> {
    let grid = config.grid()?;
    info!(
        "searching {}x{} grid from {} sources",
        grid.height(),
        grid.width(),
        config.sources.len()
    );
    let sp = shortest_paths(&grid, &config.sources, config.neighbourhood)?;
    let reachable = (0..grid.height())
        .cartesian_product(0..grid.width())
        .filter(|&(r, c)| sp.distance((r as i32, c as i32)).is_some())
        .count();
    let targets = config
        .targets
        .iter()
        .map(|&t| TargetReport {
            target: t,
            distance: sp.distance(t),
            path: sp.path(t, config.path_limit),
        })
        .collect_vec();
    Ok(Report {
        height: grid.height(),
        width: grid.width(),
        reachable,
        targets,
    })
}
