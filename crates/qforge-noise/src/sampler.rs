//! Shot sampling with a provider's noise applied.
//!
//! Circuits that only measure at the end are simulated once and every shot is
//! drawn from the final distribution. A circuit that resets a qubit, or keeps
//! acting on a qubit after measuring it, is simulated shot by shot with each
//! measurement collapsing the state.
//!
//! Noise is layered on top per shot: with the probability of any gate,
//! decoherence or crosstalk failure every written bit is replaced by a
//! uniformly random one, then each bit flips independently with the
//! provider's readout error.

use qforge_ir::{Circuit, InstructionKind};
use qforge_target::ProviderConstraints;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::error::{NoiseError, NoiseResult};
use crate::fidelity::estimate;
use crate::statevector::Statevector;

/// Default cap on simulated qubits.
pub const DEFAULT_MAX_QUBITS: u32 = 24;

/// Outcome histogram. Character `i` of a key is classical bit `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts(BTreeMap<String, usize>);

impl Counts {
    /// Total number of shots.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Count for one bitstring.
    pub fn get(&self, bitstring: &str) -> usize {
        self.0.get(bitstring).copied().unwrap_or(0)
    }

    /// The most frequent bitstring, ties broken by the smaller key.
    pub fn most_frequent(&self) -> Option<(&str, usize)> {
        self.0
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(k, v)| (k.as_str(), *v))
    }

    /// Bitstrings and counts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn record(&mut self, bitstring: String) {
        *self.0.entry(bitstring).or_insert(0) += 1;
    }
}

/// Statevector sampler with a simple provider noise model.
#[derive(Debug, Clone)]
pub struct NoisySampler {
    max_qubits: u32,
}

impl Default for NoisySampler {
    fn default() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }
}

impl NoisySampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the largest circuit the sampler will simulate.
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Sample `shots` outcomes of `circuit` on `provider`.
    ///
    /// Each classical bit holds the result of the last measurement that
    /// wrote it. A circuit without measurements reads every qubit at the
    /// end, one bit per qubit.
    #[instrument(
        skip(self, circuit, provider, rng),
        fields(circuit = circuit.name(), provider = %provider.id)
    )]
    pub fn sample<R: Rng + ?Sized>(
        &self,
        circuit: &Circuit,
        provider: &ProviderConstraints,
        shots: usize,
        rng: &mut R,
    ) -> NoiseResult<Counts> {
        if shots == 0 {
            return Err(NoiseError::InvalidShots);
        }
        let num_qubits = circuit.num_qubits();
        if num_qubits > self.max_qubits {
            return Err(NoiseError::TooManyQubits {
                num_qubits,
                max: self.max_qubits,
            });
        }

        let noise = estimate(circuit, provider);
        let readout = Readout {
            depolarize: 1.0
                - (1.0 - noise.gate_error)
                    * (1.0 - noise.decoherence_error)
                    * (1.0 - noise.crosstalk_error),
            flip: provider.readout_error,
        };
        debug!(
            "Sampling {} shots, depolarizing probability {:.6}, readout flip {:.6}",
            shots, readout.depolarize, readout.flip
        );

        let mut counts = Counts::default();
        if needs_shot_by_shot(circuit) {
            debug!("Mid-circuit measurement or reset, simulating each shot");
            for _ in 0..shots {
                let bits = run_shot(circuit, rng);
                counts.record(readout.apply(&bits, rng));
            }
            return Ok(counts);
        }

        let mut state = Statevector::new(num_qubits as usize);
        for inst in circuit.instructions() {
            state.apply(inst);
        }
        let sources = readout_map(circuit);

        let mut cumulative = Vec::with_capacity(state.amplitudes().len());
        let mut acc = 0.0;
        for p in state.probabilities() {
            acc += p;
            cumulative.push(acc);
        }

        for _ in 0..shots {
            let r = rng.r#gen::<f64>() * acc;
            let outcome = cumulative
                .partition_point(|c| *c <= r)
                .min(cumulative.len() - 1);
            let bits: Vec<Option<bool>> = sources
                .iter()
                .map(|source| source.map(|q| (outcome >> q) & 1 == 1))
                .collect();
            counts.record(readout.apply(&bits, rng));
        }
        Ok(counts)
    }
}

/// Per-shot noise applied to the ideal classical bits.
struct Readout {
    depolarize: f64,
    flip: f64,
}

impl Readout {
    /// Render `bits` as a bitstring. Unwritten bits stay `0` and see no noise.
    fn apply<R: Rng + ?Sized>(&self, bits: &[Option<bool>], rng: &mut R) -> String {
        let depolarized = rng.r#gen::<f64>() < self.depolarize;
        bits.iter()
            .map(|bit| match bit {
                None => '0',
                Some(bit) => {
                    let mut bit = if depolarized { rng.r#gen::<bool>() } else { *bit };
                    if rng.r#gen::<f64>() < self.flip {
                        bit = !bit;
                    }
                    if bit { '1' } else { '0' }
                }
            })
            .collect()
    }
}

/// True when deferring every measurement to the end would change the result:
/// any reset, or any gate on a qubit that was already measured.
fn needs_shot_by_shot(circuit: &Circuit) -> bool {
    let mut measured = vec![false; circuit.num_qubits() as usize];
    for inst in circuit.instructions() {
        match &inst.kind {
            InstructionKind::Reset => return true,
            InstructionKind::Measure => {
                for q in &inst.qubits {
                    measured[q.index()] = true;
                }
            }
            InstructionKind::Gate(_) => {
                if inst.qubits.iter().any(|q| measured[q.index()]) {
                    return true;
                }
            }
            InstructionKind::Barrier => {}
        }
    }
    false
}

/// Simulate one shot, collapsing the state at every measurement.
fn run_shot<R: Rng + ?Sized>(circuit: &Circuit, rng: &mut R) -> Vec<Option<bool>> {
    let num_qubits = circuit.num_qubits() as usize;
    let mut state = Statevector::new(num_qubits);
    let mut bits = vec![None; circuit.num_clbits() as usize];
    for inst in circuit.instructions() {
        match &inst.kind {
            InstructionKind::Gate(_) => state.apply(inst),
            InstructionKind::Measure => {
                for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                    bits[c.index()] = Some(state.measure(q.index(), rng));
                }
            }
            InstructionKind::Reset => {
                for q in &inst.qubits {
                    state.reset(q.index(), rng);
                }
            }
            InstructionKind::Barrier => {}
        }
    }
    if circuit.has_measurements() {
        return bits;
    }
    let outcome = state.sample_index(rng);
    (0..num_qubits).map(|q| Some((outcome >> q) & 1 == 1)).collect()
}

/// Source qubit of each classical bit, `None` when the bit is never written.
fn readout_map(circuit: &Circuit) -> Vec<Option<usize>> {
    if !circuit.has_measurements() {
        return (0..circuit.num_qubits() as usize).map(Some).collect();
    }
    let mut map = vec![None; circuit.num_clbits() as usize];
    for inst in circuit.instructions() {
        if inst.is_measure() {
            for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                map[c.index()] = Some(q.index());
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use qforge_ir::{ClbitId, QubitId};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn bell() -> Circuit {
        let mut c = Circuit::with_size("bell", 2, 2).unwrap();
        c.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        c.measure_all().unwrap();
        c
    }

    #[test]
    fn test_ideal_bell_is_correlated() {
        let mut rng = SmallRng::seed_from_u64(7);
        let counts = NoisySampler::new()
            .sample(&bell(), &ProviderConstraints::simulator(), 1000, &mut rng)
            .unwrap();
        assert_eq!(counts.total(), 1000);
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert!(counts.get("00") > 350 && counts.get("11") > 350);
    }

    #[test]
    fn test_bit_order_follows_clbits() {
        let mut c = Circuit::with_size("x0", 2, 2).unwrap();
        c.x(QubitId(0)).unwrap();
        c.measure(QubitId(0), ClbitId(0)).unwrap();
        c.measure(QubitId(1), ClbitId(1)).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let counts = NoisySampler::new()
            .sample(&c, &ProviderConstraints::simulator(), 10, &mut rng)
            .unwrap();
        assert_eq!(counts.get("10"), 10);
    }

    #[test]
    fn test_unmeasured_circuit_reads_all_qubits() {
        let mut c = Circuit::with_size("x", 3, 0).unwrap();
        c.x(QubitId(2)).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let counts = NoisySampler::new()
            .sample(&c, &ProviderConstraints::simulator(), 5, &mut rng)
            .unwrap();
        assert_eq!(counts.most_frequent(), Some(("001", 5)));
    }

    #[test]
    fn test_noise_spreads_outcomes() {
        let mut rng = SmallRng::seed_from_u64(11);
        let counts = NoisySampler::new()
            .sample(&bell(), &ProviderConstraints::rigetti(), 4000, &mut rng)
            .unwrap();
        assert!(counts.get("01") + counts.get("10") > 0);
        assert!(counts.get("00") + counts.get("11") > 2400);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let sampler = NoisySampler::new();
        let p = ProviderConstraints::ibm_quantum();
        let a = sampler
            .sample(&bell(), &p, 500, &mut SmallRng::seed_from_u64(42))
            .unwrap();
        let b = sampler
            .sample(&bell(), &p, 500, &mut SmallRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_bad_requests() {
        let mut rng = SmallRng::seed_from_u64(0);
        let sampler = NoisySampler::new().with_max_qubits(1);
        assert!(matches!(
            sampler.sample(&bell(), &ProviderConstraints::simulator(), 10, &mut rng),
            Err(NoiseError::TooManyQubits { num_qubits: 2, max: 1 })
        ));
        assert!(matches!(
            NoisySampler::new().sample(&bell(), &ProviderConstraints::simulator(), 0, &mut rng),
            Err(NoiseError::InvalidShots)
        ));
    }

    #[test]
    fn test_measurement_mid_circuit_collapses() {
        let mut c = Circuit::with_size("remeasure", 1, 2).unwrap();
        c.h(QubitId(0)).unwrap();
        c.measure(QubitId(0), ClbitId(0)).unwrap();
        c.h(QubitId(0)).unwrap();
        c.measure(QubitId(0), ClbitId(1)).unwrap();

        let mut rng = SmallRng::seed_from_u64(1);
        let counts = NoisySampler::new()
            .sample(&c, &ProviderConstraints::simulator(), 4000, &mut rng)
            .unwrap();
        assert_eq!(counts.total(), 4000);
        for key in ["00", "01", "10", "11"] {
            let n = counts.get(key);
            assert!((800..1200).contains(&n), "{key}: {n}");
        }
    }

    #[test]
    fn test_reset_leaves_entangled_partner_mixed() {
        let mut c = Circuit::with_size("reset", 2, 1).unwrap();
        c.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        c.reset(QubitId(0)).unwrap();
        c.h(QubitId(1)).unwrap();
        c.measure(QubitId(1), ClbitId(0)).unwrap();

        let mut rng = SmallRng::seed_from_u64(1);
        let counts = NoisySampler::new()
            .sample(&c, &ProviderConstraints::simulator(), 4000, &mut rng)
            .unwrap();
        let zeros = counts.get("0");
        assert!((1800..2200).contains(&zeros), "{zeros}");
        assert_eq!(zeros + counts.get("1"), 4000);
    }

    #[test]
    fn test_reset_then_reuse_reads_fresh_qubit() {
        let mut c = Circuit::with_size("reuse", 1, 2).unwrap();
        c.x(QubitId(0)).unwrap();
        c.measure(QubitId(0), ClbitId(0)).unwrap();
        c.reset(QubitId(0)).unwrap();
        c.measure(QubitId(0), ClbitId(1)).unwrap();

        let mut rng = SmallRng::seed_from_u64(2);
        let counts = NoisySampler::new()
            .sample(&c, &ProviderConstraints::simulator(), 50, &mut rng)
            .unwrap();
        assert_eq!(counts.get("10"), 50);
    }

    #[test]
    fn test_terminal_measurements_stay_on_fast_path() {
        assert!(!needs_shot_by_shot(&bell()));
        let mut c = bell();
        c.h(QubitId(0)).unwrap();
        assert!(needs_shot_by_shot(&c));
    }
}
