//! QAOA circuits for Max-Cut.

use std::fmt;
use std::str::FromStr;

use qforge_ir::{Circuit, IrError, IrResult, QubitId};

use super::bit;

/// Built-in problem graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    /// Cycle through every node.
    Ring,
    /// Path through every node.
    Line,
    /// Every pair of nodes.
    Complete,
    /// Node 0 joined to every other node.
    Star,
}

impl GraphKind {
    pub const NAMES: [&'static str; 4] = ["ring", "line", "complete", "star"];

    /// Smallest node count for which the graph is distinct and simple.
    pub fn min_nodes(self) -> u32 {
        match self {
            GraphKind::Ring => 3,
            GraphKind::Line | GraphKind::Complete | GraphKind::Star => 2,
        }
    }

    /// Unweighted edge list on `n` nodes.
    pub fn edges(self, n: u32) -> Vec<(u32, u32)> {
        match self {
            GraphKind::Line => (1..n).map(|i| (i - 1, i)).collect(),
            GraphKind::Ring => {
                let mut edges = GraphKind::Line.edges(n);
                if n > 2 {
                    edges.push((n - 1, 0));
                }
                edges
            }
            GraphKind::Complete => (0..n)
                .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
                .collect(),
            GraphKind::Star => (1..n).map(|i| (0, i)).collect(),
        }
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GraphKind::Ring => "ring",
            GraphKind::Line => "line",
            GraphKind::Complete => "complete",
            GraphKind::Star => "star",
        };
        f.write_str(name)
    }
}

impl FromStr for GraphKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ring" => Ok(GraphKind::Ring),
            "line" => Ok(GraphKind::Line),
            "complete" => Ok(GraphKind::Complete),
            "star" => Ok(GraphKind::Star),
            other => Err(format!("unknown graph '{other}'")),
        }
    }
}

/// Number of edges cut by the assignment whose bit `i` is node `i`'s side.
pub fn cut_value(edges: &[(u32, u32)], assignment: u64) -> usize {
    edges
        .iter()
        .filter(|(a, b)| bit(assignment, *a) != bit(assignment, *b))
        .count()
}

/// QAOA with one `(gamma, beta)` pair per layer.
///
/// Starts in |+⟩ⁿ; each layer applies `rzz(gamma)` on every edge and
/// `rx(2·beta)` on every node.
pub fn qaoa_circuit(
    num_nodes: u32,
    edges: &[(u32, u32)],
    gammas: &[f64],
    betas: &[f64],
    measure: bool,
) -> IrResult<Circuit> {
    if gammas.len() != betas.len() {
        return Err(IrError::ParameterCountMismatch {
            gate_name: "qaoa_maxcut".into(),
            expected: gammas.len(),
            got: betas.len(),
        });
    }

    let mut circuit = Circuit::with_size("qaoa_maxcut", num_nodes, 0)?;
    for q in 0..num_nodes {
        circuit.h(QubitId(q))?;
    }
    for (gamma, beta) in gammas.iter().zip(betas) {
        for (a, b) in edges {
            circuit.rzz(*gamma, QubitId(*a), QubitId(*b))?;
        }
        for q in 0..num_nodes {
            circuit.rx(2.0 * beta, QubitId(q))?;
        }
    }
    if measure {
        circuit.measure_all()?;
    }
    Ok(circuit)
}

/// QAOA for a built-in graph with the same angles in every layer.
pub fn qaoa_maxcut(
    num_nodes: u32,
    graph: GraphKind,
    layers: u32,
    gamma: f64,
    beta: f64,
    measure: bool,
) -> IrResult<Circuit> {
    let edges = graph.edges(num_nodes);
    let gammas = vec![gamma; layers as usize];
    let betas = vec![beta; layers as usize];
    qaoa_circuit(num_nodes, &edges, &gammas, &betas, measure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_edges() {
        assert_eq!(GraphKind::Ring.edges(4), vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
        assert_eq!(GraphKind::Line.edges(3), vec![(0, 1), (1, 2)]);
        assert_eq!(GraphKind::Complete.edges(4).len(), 6);
        assert_eq!(GraphKind::Star.edges(4), vec![(0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn test_cut_value() {
        let ring = GraphKind::Ring.edges(4);
        assert_eq!(cut_value(&ring, 0b0101), 4);
        assert_eq!(cut_value(&ring, 0b0011), 2);
        assert_eq!(cut_value(&ring, 0), 0);
    }

    #[test]
    fn test_layer_structure() {
        let c = qaoa_maxcut(4, GraphKind::Ring, 2, 0.8, 0.4, true).unwrap();
        let ops = c.count_ops();
        assert_eq!(ops["h"], 4);
        assert_eq!(ops["rzz"], 8);
        assert_eq!(ops["rx"], 8);
        assert_eq!(ops["measure"], 4);
    }

    #[test]
    fn test_mismatched_angles() {
        assert!(qaoa_circuit(2, &[(0, 1)], &[0.1, 0.2], &[0.1], false).is_err());
    }
}
