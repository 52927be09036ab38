//! DAG-based circuit representation.

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex as PetNodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId};

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq)]
pub enum DagNode {
    /// Input node for a wire.
    In(WireId),
    /// Output node for a wire.
    Out(WireId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }

    /// Get mutable reference to the instruction.
    #[inline]
    pub fn instruction_mut(&mut self) -> Option<&mut Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// Identifier for a wire in the DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireId {
    /// A quantum wire.
    Qubit(QubitId),
    /// A classical wire.
    Clbit(ClbitId),
}

impl From<QubitId> for WireId {
    fn from(q: QubitId) -> Self {
        WireId::Qubit(q)
    }
}

impl From<ClbitId> for WireId {
    fn from(c: ClbitId) -> Self {
        WireId::Clbit(c)
    }
}

/// DAG-based circuit representation used by compiler passes.
///
/// Every wire runs from an `In` node through the operations touching it to
/// an `Out` node; each edge is labelled with its wire. The graph is a
/// `StableDiGraph`, so node indices survive removals and passes may keep
/// indices across edits.
#[derive(Debug, Clone)]
pub struct CircuitDag {
    graph: StableDiGraph<DagNode, WireId, u32>,
    inputs: FxHashMap<WireId, NodeIndex>,
    outputs: FxHashMap<WireId, NodeIndex>,
    num_qubits: u32,
    num_clbits: u32,
}

impl CircuitDag {
    /// Create a DAG with `num_qubits` quantum and `num_clbits` classical wires.
    pub fn with_size(num_qubits: u32, num_clbits: u32) -> Self {
        let mut dag = Self {
            graph: StableDiGraph::default(),
            inputs: FxHashMap::default(),
            outputs: FxHashMap::default(),
            num_qubits,
            num_clbits,
        };
        for q in 0..num_qubits {
            dag.add_wire(WireId::Qubit(QubitId(q)));
        }
        for c in 0..num_clbits {
            dag.add_wire(WireId::Clbit(ClbitId(c)));
        }
        dag
    }

    fn add_wire(&mut self, wire: WireId) {
        let in_node = self.graph.add_node(DagNode::In(wire));
        let out_node = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(in_node, out_node, wire);
        self.inputs.insert(wire, in_node);
        self.outputs.insert(wire, out_node);
    }

    /// Append an instruction at the end of its wires.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let wires = wires_of(&instruction);
        for wire in &wires {
            if !self.outputs.contains_key(wire) {
                return Err(IrError::InvalidDag(format!("unknown wire {wire:?}")));
            }
        }
        let op_node = self.graph.add_node(DagNode::Op(instruction));
        for wire in wires {
            let out_node = self.outputs[&wire];
            let edge = self
                .graph
                .edges_directed(out_node, Direction::Incoming)
                .find(|e| *e.weight() == wire)
                .map(|e| (e.id(), e.source()))
                .ok_or_else(|| IrError::InvalidDag(format!("wire {wire:?} has no front")))?;
            self.graph.remove_edge(edge.0);
            self.graph.add_edge(edge.1, op_node, wire);
            self.graph.add_edge(op_node, out_node, wire);
        }
        Ok(op_node)
    }

    /// Remove an operation node, reconnecting each of its wires.
    pub fn remove_op(&mut self, node: NodeIndex) -> IrResult<Instruction> {
        if !matches!(self.graph.node_weight(node), Some(DagNode::Op(_))) {
            return Err(IrError::InvalidNode);
        }
        let incoming: Vec<(NodeIndex, WireId)> = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .map(|e| (e.source(), *e.weight()))
            .collect();
        let outgoing: FxHashMap<WireId, NodeIndex> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (*e.weight(), e.target()))
            .collect();

        let Some(DagNode::Op(instruction)) = self.graph.remove_node(node) else {
            return Err(IrError::InvalidNode);
        };
        for (pred, wire) in incoming {
            let succ = outgoing.get(&wire).copied().ok_or_else(|| {
                IrError::InvalidDag(format!("wire {wire:?} enters but never leaves node"))
            })?;
            self.graph.add_edge(pred, succ, wire);
        }
        Ok(instruction)
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(DagNode::instruction)
    }

    /// Get a mutable instruction by node index.
    #[inline]
    pub fn get_instruction_mut(&mut self, node: NodeIndex) -> Option<&mut Instruction> {
        self.graph
            .node_weight_mut(node)
            .and_then(DagNode::instruction_mut)
    }

    /// Next operation on `wire` after `node`, `None` when the wire ends.
    pub fn successor_on(&self, node: NodeIndex, wire: WireId) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .find(|e| *e.weight() == wire)
            .map(|e| e.target())
            .filter(|t| matches!(self.graph[*t], DagNode::Op(_)))
    }

    /// Previous operation on `wire` before `node`, `None` at the wire start.
    pub fn predecessor_on(&self, node: NodeIndex, wire: WireId) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .find(|e| *e.weight() == wire)
            .map(|e| e.source())
            .filter(|s| matches!(self.graph[*s], DagNode::Op(_)))
    }

    /// Operations in topological order.
    ///
    /// Among operations that are ready at the same time the one inserted
    /// first comes first, so a DAG built from a circuit and left untouched
    /// reproduces the original instruction order.
    pub fn topological_ops(&self) -> IrResult<Vec<(NodeIndex, &Instruction)>> {
        let mut indegree: FxHashMap<NodeIndex, usize> = FxHashMap::default();
        let mut ready = BinaryHeap::new();
        for node in self.graph.node_indices() {
            let deg = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .count();
            if deg == 0 {
                ready.push(Reverse(node));
            }
            indegree.insert(node, deg);
        }

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse(node)) = ready.pop() {
            if let DagNode::Op(inst) = &self.graph[node] {
                order.push((node, inst));
            }
            for edge in self.graph.edges_directed(node, Direction::Outgoing) {
                let target = edge.target();
                if let Some(deg) = indegree.get_mut(&target) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.push(Reverse(target));
                    }
                }
            }
        }

        let visited_all = indegree.values().all(|d| *d == 0);
        if !visited_all {
            return Err(IrError::InvalidDag("cycle detected in circuit graph".into()));
        }
        Ok(order)
    }

    /// Number of qubit wires.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of classical wires.
    #[inline]
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// Number of operation nodes.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph.node_count() - self.inputs.len() - self.outputs.len()
    }
}

fn wires_of(instruction: &Instruction) -> Vec<WireId> {
    instruction
        .qubits
        .iter()
        .map(|&q| WireId::Qubit(q))
        .chain(instruction.clbits.iter().map(|&c| WireId::Clbit(c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    fn gate(g: StandardGate, qubits: &[u32]) -> Instruction {
        Instruction::gate(g, qubits.iter().map(|&q| QubitId(q))).unwrap()
    }

    #[test]
    fn test_apply_and_order() {
        let mut dag = CircuitDag::with_size(2, 0);
        dag.apply(gate(StandardGate::H, &[0])).unwrap();
        dag.apply(gate(StandardGate::X, &[1])).unwrap();
        dag.apply(gate(StandardGate::CX, &[0, 1])).unwrap();
        assert_eq!(dag.num_ops(), 3);
        let names: Vec<_> = dag
            .topological_ops()
            .unwrap()
            .into_iter()
            .map(|(_, i)| i.name())
            .collect();
        assert_eq!(names, vec!["h", "x", "cx"]);
    }

    #[test]
    fn test_successor_skips_other_wires() {
        let mut dag = CircuitDag::with_size(2, 0);
        let a = dag.apply(gate(StandardGate::X, &[0])).unwrap();
        dag.apply(gate(StandardGate::H, &[1])).unwrap();
        let b = dag.apply(gate(StandardGate::X, &[0])).unwrap();
        let wire = WireId::Qubit(QubitId(0));
        assert_eq!(dag.successor_on(a, wire), Some(b));
        assert_eq!(dag.predecessor_on(b, wire), Some(a));
        assert_eq!(dag.successor_on(b, wire), None);
    }

    #[test]
    fn test_remove_op_reconnects_wires() {
        let mut dag = CircuitDag::with_size(2, 0);
        let a = dag.apply(gate(StandardGate::H, &[0])).unwrap();
        let cx = dag.apply(gate(StandardGate::CX, &[0, 1])).unwrap();
        let c = dag.apply(gate(StandardGate::Z, &[1])).unwrap();
        let removed = dag.remove_op(cx).unwrap();
        assert_eq!(removed.name(), "cx");
        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.successor_on(a, WireId::Qubit(QubitId(0))), None);
        assert_eq!(dag.predecessor_on(c, WireId::Qubit(QubitId(1))), None);
        // Indices stay valid after removal.
        assert_eq!(dag.get_instruction(c).unwrap().name(), "z");
    }

    #[test]
    fn test_remove_non_op_fails() {
        let mut dag = CircuitDag::with_size(1, 0);
        let op = dag.apply(gate(StandardGate::H, &[0])).unwrap();
        dag.remove_op(op).unwrap();
        assert!(matches!(dag.remove_op(op), Err(IrError::InvalidNode)));
    }

    #[test]
    fn test_measure_orders_on_classical_wire() {
        let mut dag = CircuitDag::with_size(2, 1);
        dag.apply(Instruction::measure(QubitId(0), ClbitId(0))).unwrap();
        dag.apply(Instruction::measure(QubitId(1), ClbitId(0))).unwrap();
        let ops = dag.topological_ops().unwrap();
        assert_eq!(ops[0].1.qubits, vec![QubitId(0)]);
        assert_eq!(ops[1].1.qubits, vec![QubitId(1)]);
    }

    #[test]
    fn test_unknown_wire_rejected() {
        let mut dag = CircuitDag::with_size(1, 0);
        assert!(dag.apply(gate(StandardGate::X, &[3])).is_err());
    }
}
