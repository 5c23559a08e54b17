//! Module for loading and representing weighted graphs.
//!
//! Graph files use a plain adjacency-list format: the first line holds the
//! vertex count `n`, every following line reads
//! `vertex neighbor1 weight1 neighbor2 weight2 ...`. Pairs that never appear
//! have no edge, and self-distance is always 0.

use crate::error::{Result, SolverError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A directed weighted graph stored as a dense weight matrix.
///
/// `None` entries mean "no edge". The matrix is not required to be symmetric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedGraph {
    /// Name of the graph (file stem when loaded from disk)
    pub name: String,
    /// Number of vertices
    dimension: usize,
    /// Dense weight matrix, `weights[i][j]` is the cost of travelling i -> j
    weights: Vec<Vec<Option<f64>>>,
}

impl WeightedGraph {
    /// Create a graph of `dimension` vertices with no edges besides self-loops of weight 0.
    pub fn new(dimension: usize) -> Self {
        let mut weights = vec![vec![None; dimension]; dimension];
        for (i, row) in weights.iter_mut().enumerate() {
            row[i] = Some(0.0);
        }

        WeightedGraph {
            name: "graph".to_string(),
            dimension,
            weights,
        }
    }

    /// Build a graph from a square matrix. Diagonal entries are forced to 0.
    pub fn from_matrix(matrix: Vec<Vec<Option<f64>>>) -> Result<Self> {
        let n = matrix.len();
        if n == 0 {
            return Err(SolverError::format(0, "graph must have at least one vertex"));
        }

        let mut graph = WeightedGraph::new(n);
        for (i, row) in matrix.into_iter().enumerate() {
            if row.len() != n {
                return Err(SolverError::format(
                    i + 1,
                    format!("matrix row {} has {} entries, expected {}", i, row.len(), n),
                ));
            }
            for (j, weight) in row.into_iter().enumerate() {
                if let Some(w) = weight {
                    graph.set_weight(i, j, w)?;
                }
            }
        }

        Ok(graph)
    }

    /// Parse a graph from its adjacency-list file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let mut graph = Self::from_reader(BufReader::new(file))?;

        if let Some(stem) = path.as_ref().file_stem() {
            graph.name = stem.to_string_lossy().into_owned();
        }

        Ok(graph)
    }

    /// Parse a graph from an in-memory string.
    pub fn parse(input: &str) -> Result<Self> {
        Self::from_reader(input.as_bytes())
    }

    /// Parse a graph from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines().enumerate();

        let mut graph = loop {
            let (index, line) = match lines.next() {
                Some(entry) => entry,
                None => return Err(SolverError::format(1, "missing vertex count")),
            };
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let dimension: usize = line
                .parse()
                .map_err(|_| SolverError::format(index + 1, format!("invalid vertex count '{}'", line)))?;
            if dimension == 0 {
                return Err(SolverError::format(index + 1, "vertex count must be at least 1"));
            }
            break WeightedGraph::new(dimension);
        };

        for (index, line) in lines {
            let line_no = index + 1;
            let line = line?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            let values = line
                .split_whitespace()
                .map(|token| {
                    token
                        .parse::<i64>()
                        .map_err(|_| SolverError::format(line_no, format!("'{}' is not an integer", token)))
                })
                .collect::<Result<Vec<i64>>>()?;

            let (&vertex, pairs) = match values.split_first() {
                Some(split) => split,
                None => continue,
            };
            if pairs.len() % 2 != 0 {
                return Err(SolverError::format(
                    line_no,
                    format!("expected neighbor/weight pairs, got {} values", pairs.len()),
                ));
            }

            let from = graph.checked_vertex(vertex, line_no)?;
            for pair in pairs.chunks_exact(2) {
                let to = graph.checked_vertex(pair[0], line_no)?;
                let weight = pair[1];
                if weight < 0 {
                    return Err(SolverError::format(
                        line_no,
                        format!("negative weight {} for edge {} -> {}", weight, from, to),
                    ));
                }
                if from == to {
                    if weight != 0 {
                        log::warn!("line {}: ignoring self-distance {} for vertex {}", line_no, weight, from);
                    }
                    continue;
                }
                // later occurrences overwrite earlier ones
                graph.weights[from][to] = Some(weight as f64);
            }
        }

        Ok(graph)
    }

    fn checked_vertex(&self, vertex: i64, line: usize) -> Result<usize> {
        if vertex < 0 || vertex as u64 >= self.dimension as u64 {
            return Err(SolverError::OutOfRange {
                line,
                vertex,
                dimension: self.dimension,
            });
        }
        Ok(vertex as usize)
    }

    /// Set the weight of the directed edge `from -> to`.
    ///
    /// Self-loops stay at 0 whatever the weight given.
    pub fn set_weight(&mut self, from: usize, to: usize, weight: f64) -> Result<()> {
        for vertex in [from, to] {
            if vertex >= self.dimension {
                return Err(SolverError::OutOfRange {
                    line: 0,
                    vertex: vertex as i64,
                    dimension: self.dimension,
                });
            }
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(SolverError::format(0, format!("invalid weight {} for edge {} -> {}", weight, from, to)));
        }
        if from != to {
            self.weights[from][to] = Some(weight);
        }
        Ok(())
    }

    /// Number of vertices
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Weight of the directed edge `from -> to`, `None` when there is no edge.
    #[inline]
    pub fn weight(&self, from: usize, to: usize) -> Option<f64> {
        self.weights[from][to]
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.weights[from][to].is_some()
    }

    /// Whether `weight(i, j) == weight(j, i)` for every pair
    pub fn is_symmetric(&self) -> bool {
        (0..self.dimension).all(|i| (i + 1..self.dimension).all(|j| self.weights[i][j] == self.weights[j][i]))
    }

    /// Get statistics about the graph
    pub fn statistics(&self) -> GraphStatistics {
        let edges: Vec<f64> = (0..self.dimension)
            .flat_map(|i| (0..self.dimension).filter(move |&j| j != i).map(move |j| (i, j)))
            .filter_map(|(i, j)| self.weights[i][j])
            .collect();

        let possible = self.dimension * self.dimension.saturating_sub(1);
        let density = if possible > 0 { edges.len() as f64 / possible as f64 } else { 0.0 };

        let (min_weight, avg_weight, max_weight) = if edges.is_empty() {
            (None, None, None)
        } else {
            (
                Some(edges.iter().cloned().fold(f64::INFINITY, f64::min)),
                Some(edges.iter().sum::<f64>() / edges.len() as f64),
                Some(edges.iter().cloned().fold(0.0, f64::max)),
            )
        };

        GraphStatistics {
            name: self.name.clone(),
            dimension: self.dimension,
            edge_count: edges.len(),
            density,
            symmetric: self.is_symmetric(),
            min_weight,
            avg_weight,
            max_weight,
        }
    }
}

/// Statistics about a weighted graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub name: String,
    pub dimension: usize,
    /// Directed edges, self-loops excluded
    pub edge_count: usize,
    pub density: f64,
    pub symmetric: bool,
    pub min_weight: Option<f64>,
    pub avg_weight: Option<f64>,
    pub max_weight: Option<f64>,
}

impl std::fmt::Display for GraphStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |w: Option<f64>| w.map(|w| format!("{:.2}", w)).unwrap_or_else(|| "-".to_string());

        writeln!(f, "Graph: {}", self.name)?;
        writeln!(f, "  Vertices: {}", self.dimension)?;
        writeln!(f, "  Directed edges: {}", self.edge_count)?;
        writeln!(f, "  Density: {:.2}%", self.density * 100.0)?;
        writeln!(f, "  Symmetric: {}", self.symmetric)?;
        writeln!(f, "  Min weight: {}", show(self.min_weight))?;
        writeln!(f, "  Avg weight: {}", show(self.avg_weight))?;
        writeln!(f, "  Max weight: {}", show(self.max_weight))
    }
}
