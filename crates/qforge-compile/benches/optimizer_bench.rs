//! Benchmarks for the optimizer
//!
//! Run with: cargo bench -p qforge-compile

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qforge_compile::Optimizer;
use qforge_ir::{Circuit, QubitId};

/// Layers of H, T, CX and redundant pairs across `n` qubits.
fn layered_circuit(n: u32, layers: usize) -> Circuit {
    let mut circuit = Circuit::with_size("bench", n, 0).unwrap();
    for layer in 0..layers {
        for q in 0..n {
            circuit.h(QubitId(q)).unwrap();
            circuit.t(QubitId(q)).unwrap();
            circuit.rz(0.1 * layer as f64, QubitId(q)).unwrap();
        }
        for q in 0..n - 1 {
            circuit.cx(QubitId(q), QubitId(q + 1)).unwrap();
            circuit.cx(QubitId(q), QubitId(q + 1)).unwrap();
        }
    }
    circuit
}

fn bench_single_passes(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_pass");
    let optimizer = Optimizer::default();

    for pass in ["cancel", "merge", "transpile"] {
        let circuit = layered_circuit(10, 10);
        group.bench_with_input(BenchmarkId::new(pass, 10), &circuit, |b, circuit| {
            b.iter(|| {
                optimizer
                    .optimize(black_box(circuit), "ibm_quantum", &[pass])
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_default_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("default_pipeline");
    let optimizer = Optimizer::default();
    let none: [&str; 0] = [];

    for provider in ["ibm_quantum", "ionq", "rigetti"] {
        for num_qubits in &[5u32, 20] {
            let circuit = layered_circuit(*num_qubits, 10);
            group.bench_with_input(
                BenchmarkId::new(provider, num_qubits),
                &circuit,
                |b, circuit| {
                    b.iter(|| optimizer.optimize(black_box(circuit), provider, &none).unwrap());
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_single_passes, bench_default_pipeline);
criterion_main!(benches);
