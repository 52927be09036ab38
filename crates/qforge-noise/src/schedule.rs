//! As-soon-as-possible scheduling with provider gate durations.

use qforge_ir::Circuit;
use qforge_target::ProviderConstraints;

/// Timing summary of a circuit on a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    /// Wall-clock duration of the whole circuit in nanoseconds.
    pub duration_ns: f64,
    /// Number of multi-qubit gates in each depth layer.
    pub multi_qubit_gates_per_layer: Vec<usize>,
}

impl Schedule {
    /// Schedule every instruction at the earliest time its wires are free.
    ///
    /// Layers follow the same leveling as [`Circuit::depth`]: an instruction
    /// sits one layer above the latest instruction sharing a wire with it,
    /// and barriers align wires without occupying a layer.
    pub fn asap(circuit: &Circuit, provider: &ProviderConstraints) -> Self {
        let nq = circuit.num_qubits() as usize;
        let nc = circuit.num_clbits() as usize;
        let mut ready = vec![0.0_f64; nq + nc];
        let mut level = vec![0usize; nq + nc];
        let mut layers: Vec<usize> = Vec::new();

        for inst in circuit.instructions() {
            let wires: Vec<usize> = inst
                .qubits
                .iter()
                .map(|q| q.index())
                .chain(inst.clbits.iter().map(|c| nq + c.index()))
                .collect();
            let start = wires.iter().map(|w| ready[*w]).fold(0.0, f64::max);
            let base = wires.iter().map(|w| level[*w]).max().unwrap_or(0);
            let end = start + provider.duration_ns(inst);
            let layer = if inst.is_barrier() { base } else { base + 1 };

            for w in &wires {
                ready[*w] = end;
                level[*w] = layer;
            }
            if inst.is_multi_qubit_gate() {
                if layers.len() < layer {
                    layers.resize(layer, 0);
                }
                layers[layer - 1] += 1;
            }
        }

        Self {
            duration_ns: ready.into_iter().fold(0.0, f64::max),
            multi_qubit_gates_per_layer: layers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qforge_ir::QubitId;

    #[test]
    fn test_parallel_gates_share_time() {
        let p = ProviderConstraints::generic();
        let mut c = Circuit::with_size("par", 4, 0).unwrap();
        c.cx(QubitId(0), QubitId(1)).unwrap();
        c.cx(QubitId(2), QubitId(3)).unwrap();
        c.h(QubitId(0)).unwrap();
        let s = Schedule::asap(&c, &p);
        assert_eq!(s.duration_ns, p.two_qubit_gate_time_ns + p.avg_gate_time_ns);
        assert_eq!(s.multi_qubit_gates_per_layer, vec![2]);
    }

    #[test]
    fn test_barrier_synchronises_wires() {
        let p = ProviderConstraints::generic();
        let mut c = Circuit::with_size("bar", 2, 0).unwrap();
        c.cx(QubitId(0), QubitId(1)).unwrap();
        c.h(QubitId(0)).unwrap();
        c.barrier_all().unwrap();
        c.h(QubitId(1)).unwrap();
        let s = Schedule::asap(&c, &p);
        assert_eq!(
            s.duration_ns,
            p.two_qubit_gate_time_ns + 2.0 * p.avg_gate_time_ns
        );
    }

    #[test]
    fn test_empty_circuit() {
        let c = Circuit::with_size("empty", 3, 0).unwrap();
        let s = Schedule::asap(&c, &ProviderConstraints::ionq());
        assert_eq!(s.duration_ns, 0.0);
        assert!(s.multi_qubit_gates_per_layer.is_empty());
    }
}
