use crate::entry::{Entry, Order};
use crate::error::Error;
use crate::priority_queue::ScoredPairQueue;
use log::{debug, trace};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::f64::consts::SQRT_2;

/// `(row, col)`. Carried through the queue as `(id_a, id_b)`.
pub type Point = (i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighbourhood {
    #[default]
    Orthogonal,
    /// Orthogonal plus diagonal steps. A diagonal step costs the entered
    /// cell's cost times sqrt(2).
    Diagonal,
}

const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Row-major matrix of entry costs. Infinite cost means impassable.
#[derive(Debug, Clone)]
pub struct Grid {
    height: usize,
    width: usize,
    cost: Vec<f64>,
}

impl Grid {
    pub fn new(height: usize, width: usize, cost: Vec<f64>) -> Result<Self, Error> {
        if i32::try_from(height).is_err() || i32::try_from(width).is_err() {
            return Err(Error::InvalidGrid(format!("{height}x{width} grid is too large")));
        }
        let size = height
            .checked_mul(width)
            .ok_or_else(|| Error::InvalidGrid(format!("{height}x{width} grid is too large")))?;
        if cost.len() != size {
            return Err(Error::InvalidGrid(format!(
                "{height}x{width} grid needs {size} costs, got {}",
                cost.len()
            )));
        }
        if let Some(c) = cost.iter().find(|c| c.is_nan() || **c < 0.0) {
            return Err(Error::InvalidGrid(format!("cost {c} is not allowed")));
        }
        Ok(Grid {
            height,
            width,
            cost,
        })
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, Error> {
        let width = rows.first().map_or(0, Vec::len);
        if let Some((i, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(Error::InvalidGrid(format!(
                "row {i} has {} cells, expected {width}",
                r.len()
            )));
        }
        Grid::new(rows.len(), width, rows.concat())
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn contains(&self, p: Point) -> bool {
        self.index(p).is_some()
    }

    pub fn cost(&self, p: Point) -> Option<f64> {
        self.index(p).map(|i| self.cost[i])
    }

    fn index(&self, (row, col): Point) -> Option<usize> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < self.height && col < self.width).then_some(row * self.width + col)
    }
}

fn neighbours((x, y): Point, n: Neighbourhood) -> SmallVec<[(Point, f64); 8]> {
    let mut ns: SmallVec<[(Point, f64); 8]> = ORTHOGONAL
        .iter()
        .map(|&(dx, dy)| ((x + dx, y + dy), 1.0))
        .collect();
    if n == Neighbourhood::Diagonal {
        ns.extend(
            DIAGONAL
                .iter()
                .map(|&(dx, dy)| ((x + dx, y + dy), SQRT_2)),
        );
    }
    ns
}

#[derive(Debug, Clone)]
pub struct ShortestPaths {
    grid: Grid,
    dist: Vec<f64>,
    prev: Vec<Option<Point>>,
    sources: FxHashSet<Point>,
}

impl ShortestPaths {
    /// Distance from the nearest source, or `None` when `p` is unreachable
    /// or outside the grid.
    pub fn distance(&self, p: Point) -> Option<f64> {
        let d = self.dist[self.grid.index(p)?];
        d.is_finite().then_some(d)
    }

    pub fn predecessor(&self, p: Point) -> Option<Point> {
        self.prev[self.grid.index(p)?]
    }

    pub fn is_source(&self, p: Point) -> bool {
        self.sources.contains(&p)
    }

    /// Walks back from `target` towards its source, returning at most
    /// `limit` points starting with `target`.
    pub fn path(&self, target: Point, limit: usize) -> Vec<Point> {
        let mut path = Vec::new();
        if self.distance(target).is_none() {
            return path;
        }
        let mut u = Some(target);
        while let Some(p) = u {
            if path.len() >= limit {
                break;
            }
            path.push(p);
            u = self.predecessor(p);
        }
        path
    }
}

/// Multi-source Dijkstra over `grid`. Entering a cell costs that cell's
/// cost (scaled for diagonal steps); sources start at zero.
pub fn shortest_paths(
    grid: &Grid,
    sources: &[Point],
    neighbourhood: Neighbourhood,
) -> Result<ShortestPaths, Error> {
    let size = grid.height * grid.width;
    let mut dist = vec![f64::INFINITY; size];
    let mut prev = vec![None; size];
    let mut source_set = FxHashSet::default();
    let mut q = ScoredPairQueue::with_capacity(size.min(1024), Order::MinScore.comparator());

    for &s in sources {
        let i = grid.index(s).ok_or_else(|| {
            Error::InvalidGrid(format!(
                "source {s:?} is outside the {}x{} grid",
                grid.height, grid.width
            ))
        })?;
        if source_set.insert(s) {
            dist[i] = 0.0;
            q.push(Entry::new(0.0, s.0, s.1));
        }
    }

    let mut settled = 0usize;
    while let Ok(e) = q.pop() {
        let u = e.ids();
        let Some(ui) = grid.index(u) else {
            continue;
        };
        let du = dist[ui];
        if e.score != du {
            continue;
        }
        settled += 1;
        for (v, weight) in neighbours(u, neighbourhood) {
            let Some(vi) = grid.index(v) else {
                continue;
            };
            let alt = du + grid.cost[vi] * weight;
            if dist[vi] <= alt {
                continue;
            }
            trace!("relax {v:?}: {} -> {alt} via {u:?}", dist[vi]);
            dist[vi] = alt;
            prev[vi] = Some(u);
            q.push(Entry::new(alt, v.0, v.1));
        }
    }
    debug!(
        "settled {settled} of {size} cells from {} sources",
        source_set.len()
    );

    Ok(ShortestPaths {
        grid: grid.clone(),
        dist,
        prev,
        sources: source_set,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const INF: f64 = f64::INFINITY;

    fn uniform(h: usize, w: usize) -> Grid {
        Grid::new(h, w, vec![1.0; h * w]).unwrap()
    }

    #[test]
    fn orthogonal_distances() {
        let g = uniform(3, 4);
        let sp = shortest_paths(&g, &[(0, 0)], Neighbourhood::Orthogonal).unwrap();
        assert_eq!(sp.distance((0, 0)), Some(0.0));
        assert_eq!(sp.distance((2, 3)), Some(5.0));
        assert_eq!(sp.distance((3, 0)), None);
        assert_eq!(sp.distance((-1, 0)), None);
    }

    #[test]
    fn diagonal_distances() {
        let g = uniform(3, 3);
        let sp = shortest_paths(&g, &[(0, 0)], Neighbourhood::Diagonal).unwrap();
        let d = sp.distance((2, 2)).unwrap();
        assert!((d - 2.0 * SQRT_2).abs() < 1e-12);
        assert_eq!(sp.path((2, 2), usize::MAX), vec![(2, 2), (1, 1), (0, 0)]);
    }

    #[test]
    fn walls_are_avoided() {
        let g = Grid::from_rows(&[
            vec![1.0, INF, 1.0],
            vec![1.0, INF, 1.0],
            vec![1.0, 1.0, 1.0],
        ])
        .unwrap();
        let sp = shortest_paths(&g, &[(0, 0)], Neighbourhood::Orthogonal).unwrap();
        assert_eq!(sp.distance((0, 2)), Some(6.0));
        assert_eq!(sp.distance((0, 1)), None);
        let path = sp.path((0, 2), usize::MAX);
        assert_eq!(path.len(), 7);
        assert_eq!(path.first(), Some(&(0, 2)));
        assert_eq!(path.last(), Some(&(0, 0)));
        assert!(path.iter().all(|&p| g.cost(p) == Some(1.0)));
    }

    #[test]
    fn enclosed_target_is_unreachable() {
        let g = Grid::from_rows(&[
            vec![1.0, INF, 1.0],
            vec![INF, INF, 1.0],
            vec![1.0, 1.0, 1.0],
        ])
        .unwrap();
        let sp = shortest_paths(&g, &[(0, 0)], Neighbourhood::Orthogonal).unwrap();
        assert_eq!(sp.distance((2, 2)), None);
        assert!(sp.path((2, 2), 10).is_empty());
    }

    #[test]
    fn nearest_source_wins() {
        let g = uniform(1, 7);
        let sp = shortest_paths(&g, &[(0, 0), (0, 6), (0, 6)], Neighbourhood::Orthogonal).unwrap();
        assert_eq!(sp.distance((0, 2)), Some(2.0));
        assert_eq!(sp.distance((0, 5)), Some(1.0));
        assert!(sp.is_source((0, 6)));
        assert_eq!(sp.path((0, 4), usize::MAX), vec![(0, 4), (0, 5), (0, 6)]);
        assert_eq!(sp.path((0, 4), 2), vec![(0, 4), (0, 5)]);
    }

    #[test]
    fn costs_of_entered_cells() {
        let g = Grid::from_rows(&[vec![9.0, 2.0, 3.0]]).unwrap();
        let sp = shortest_paths(&g, &[(0, 0)], Neighbourhood::Orthogonal).unwrap();
        assert_eq!(sp.distance((0, 2)), Some(5.0));
        assert_eq!(sp.predecessor((0, 2)), Some((0, 1)));
        assert_eq!(sp.predecessor((0, 0)), None);
    }

    #[test]
    fn bad_inputs() {
        let g = uniform(2, 2);
        assert!(matches!(
            shortest_paths(&g, &[(2, 0)], Neighbourhood::Orthogonal),
            Err(Error::InvalidGrid(_))
        ));
        assert!(Grid::new(2, 2, vec![1.0; 3]).is_err());
        assert!(Grid::new(1, 1, vec![-1.0]).is_err());
        assert!(Grid::from_rows(&[vec![1.0], vec![1.0, 2.0]]).is_err());
        assert!(matches!(
            Grid::new(1 << 33, 1 << 33, vec![]),
            Err(Error::InvalidGrid(_))
        ));
        assert!(matches!(
            Grid::new(1 << 16, 1 << 16, vec![]),
            Err(Error::InvalidGrid(_))
        ));
    }
}
