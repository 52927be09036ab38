//! Integration tests for provider profile loading.

use qforge_target::{NoiseLevel, ProviderConstraints, ProviderRegistry, TargetError};

const LAB_PROFILES: &str = r"
providers:
  - id: Lab_Device
    name: Lab Device
    max_qubits: 5
    max_depth: 100
    max_gate_count: 500
    noise_level: high
    native_gates: [rz, sx, cnot]
    avg_gate_time_ns: 50
    two_qubit_gate_time_ns: 400
    single_qubit_error: 0.002
    two_qubit_error: 0.03
    readout_error: 0.05
    t1_us: 40
    t2_us: 30
    crosstalk: 0.02
  - id: ionq
    name: IonQ (override)
    max_qubits: 11
    max_depth: 500
    max_gate_count: 5000
    noise_level: low
    native_gates: [rx, ry, rz, rzz]
    avg_gate_time_ns: 10000
    two_qubit_gate_time_ns: 200000
    measure_time_ns: 100000
    single_qubit_error: 0.001
    two_qubit_error: 0.01
    readout_error: 0.01
    t1_us: 10000000
    t2_us: 1000000
    crosstalk: 0.0
";

#[test]
fn test_yaml_profiles_extend_and_override() {
    let mut registry = ProviderRegistry::builtin();
    let loaded = registry.extend_from_yaml(LAB_PROFILES).unwrap();
    assert_eq!(loaded, 2);

    let lab = registry.require("lab_device").unwrap();
    assert_eq!(lab.noise_level, NoiseLevel::High);
    assert!(lab.native_gates.contains("cx"));
    // Omitted measurement time takes the default.
    assert_eq!(lab.measure_time_ns, 1_000.0);

    assert_eq!(registry.get("ionq").max_qubits, 11);
    assert_eq!(registry.ids().len(), 8);
}

#[test]
fn test_profiles_serialize_to_json() {
    let json = serde_json::to_value(ProviderConstraints::rigetti()).unwrap();
    assert_eq!(json["noise_level"], "high");
    assert_eq!(json["native_gates"], serde_json::json!(["cz", "rx", "rz"]));
}

#[test]
fn test_missing_field_is_an_error() {
    let err = ProviderRegistry::from_yaml("providers:\n  - id: x\n").unwrap_err();
    assert!(matches!(err, TargetError::Yaml(_)));
}
