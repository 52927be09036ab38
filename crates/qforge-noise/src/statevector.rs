//! Dense statevector used by the sampler.

use num_complex::Complex64;
use qforge_ir::{Instruction, InstructionKind, Matrix2, StandardGate};
use rand::Rng;

/// Amplitudes of an n-qubit pure state; bit `q` of an index is qubit `q`.
#[derive(Debug, Clone)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// The all-zero state.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Apply a gate. Measurements, resets and barriers leave the state
    /// alone; they need [`Statevector::measure`] and [`Statevector::reset`].
    pub fn apply(&mut self, instruction: &Instruction) {
        if let InstructionKind::Gate(gate) = &instruction.kind {
            let q: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
            self.apply_gate(gate, &q);
        }
    }

    /// Probability of reading 1 on `qubit`.
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = 1 << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Measure `qubit`, collapsing the state onto the drawn outcome.
    pub fn measure<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) -> bool {
        let p1 = self.probability_one(qubit);
        let outcome = rng.r#gen::<f64>() < p1;
        self.collapse(qubit, outcome, if outcome { p1 } else { 1.0 - p1 });
        outcome
    }

    /// Measure `qubit` and flip it back to |0⟩ when it read 1.
    pub fn reset<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) {
        if self.measure(qubit, rng) {
            self.apply_single(qubit, &single(StandardGate::X));
        }
    }

    /// Draw a basis-state index from the current distribution.
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let total: f64 = self.amplitudes.iter().map(Complex64::norm_sqr).sum();
        let mut r = rng.r#gen::<f64>() * total;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            r -= amp.norm_sqr();
            if r < 0.0 {
                return i;
            }
        }
        self.amplitudes.len() - 1
    }

    /// Zero the amplitudes disagreeing with `outcome` and renormalise.
    fn collapse(&mut self, qubit: usize, outcome: bool, probability: f64) {
        let mask = 1 << qubit;
        let scale = if probability > 0.0 { probability.sqrt().recip() } else { 0.0 };
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                *amp *= scale;
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
    }

    fn apply_gate(&mut self, gate: &StandardGate, q: &[usize]) {
        if let Some(m) = gate.matrix() {
            self.apply_single(q[0], &m);
            return;
        }
        match *gate {
            StandardGate::CX => self.apply_cx(q[0], q[1]),
            StandardGate::CY => self.apply_controlled(q[0], q[1], &single(StandardGate::Y)),
            StandardGate::CZ => self.apply_cp(q[0], q[1], std::f64::consts::PI),
            StandardGate::CH => self.apply_controlled(q[0], q[1], &single(StandardGate::H)),
            StandardGate::Swap => self.apply_swap(q[0], q[1]),
            StandardGate::CRz(theta) => {
                self.apply_controlled(q[0], q[1], &single(StandardGate::Rz(theta)));
            }
            StandardGate::CP(lambda) => self.apply_cp(q[0], q[1], lambda),
            StandardGate::RZZ(theta) => self.apply_rzz(q[0], q[1], theta),
            StandardGate::CCX => self.apply_ccx(q[0], q[1], q[2]),
            StandardGate::CSwap => self.apply_cswap(q[0], q[1], q[2]),
            _ => {}
        }
    }

    fn apply_single(&mut self, qubit: usize, m: &Matrix2) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    fn apply_controlled(&mut self, control: usize, target: usize, m: &Matrix2) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cp(&mut self, control: usize, target: usize, lambda: f64) {
        let mask = (1 << control) | (1 << target);
        let phase = Complex64::from_polar(1.0, lambda);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp *= phase;
            }
        }
    }

    fn apply_rzz(&mut self, q1: usize, q2: usize, theta: f64) {
        let even = Complex64::from_polar(1.0, -theta / 2.0);
        let odd = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            let parity = ((i >> q1) ^ (i >> q2)) & 1;
            *amp *= if parity == 0 { even } else { odd };
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if (i & mask1 != 0) && (i & mask2 == 0) {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) {
        let ctrl_mask = (1 << c1) | (1 << c2);
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask == ctrl_mask) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cswap(&mut self, control: usize, t1: usize, t2: usize) {
        let ctrl_mask = 1 << control;
        let t1_mask = 1 << t1;
        let t2_mask = 1 << t2;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & t1_mask != 0) && (i & t2_mask == 0) {
                let j = (i & !t1_mask) | t2_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }
}

fn single(gate: StandardGate) -> Matrix2 {
    gate.matrix().unwrap_or_default()
}
