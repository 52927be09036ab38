//! Provider registry with default-profile fallback.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{TargetError, TargetResult};
use crate::provider::ProviderConstraints;

/// Id of the profile returned for unrecognised providers.
pub const DEFAULT_PROVIDER: &str = "generic";

const ALIASES: &[(&str, &str)] = &[
    ("ibm", "ibm_quantum"),
    ("ibmq", "ibm_quantum"),
    ("google", "google_quantum_ai"),
    ("sim", "simulator"),
    ("default", DEFAULT_PROVIDER),
];

/// A YAML document of extra provider profiles.
#[derive(Debug, Deserialize)]
struct ProfileDocument {
    providers: Vec<ProviderConstraints>,
}

/// Lookup table of provider profiles.
///
/// Ids are matched case-insensitively and a few short aliases are accepted.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: FxHashMap<String, ProviderConstraints>,
}

impl ProviderRegistry {
    /// Registry holding the built-in profiles.
    pub fn builtin() -> Self {
        let mut registry = Self {
            providers: FxHashMap::default(),
        };
        for profile in [
            ProviderConstraints::ibm_quantum(),
            ProviderConstraints::google_quantum_ai(),
            ProviderConstraints::ionq(),
            ProviderConstraints::rigetti(),
            ProviderConstraints::quantinuum(),
            ProviderConstraints::simulator(),
            ProviderConstraints::generic(),
        ] {
            registry.providers.insert(profile.id.clone(), profile);
        }
        registry
    }

    /// Built-in profiles plus the ones in a YAML document.
    ///
    /// ```
    /// use qforge_target::ProviderRegistry;
    ///
    /// let yaml = r"
    /// providers:
    ///   - id: lab_device
    ///     name: Lab Device
    ///     max_qubits: 5
    ///     max_depth: 100
    ///     max_gate_count: 500
    ///     noise_level: high
    ///     native_gates: [rz, sx, cx]
    ///     avg_gate_time_ns: 50
    ///     two_qubit_gate_time_ns: 400
    ///     single_qubit_error: 0.002
    ///     two_qubit_error: 0.03
    ///     readout_error: 0.05
    ///     t1_us: 40
    ///     t2_us: 30
    ///     crosstalk: 0.02
    /// ";
    /// let registry = ProviderRegistry::from_yaml(yaml).unwrap();
    /// assert_eq!(registry.get("lab_device").max_qubits, 5);
    /// ```
    pub fn from_yaml(yaml: &str) -> TargetResult<Self> {
        let mut registry = Self::builtin();
        registry.extend_from_yaml(yaml)?;
        Ok(registry)
    }

    /// Add or replace profiles from a YAML document with a `providers` list.
    ///
    /// Returns the number of profiles loaded. Nothing is added when any
    /// profile is invalid.
    pub fn extend_from_yaml(&mut self, yaml: &str) -> TargetResult<usize> {
        let doc: ProfileDocument = serde_yaml_ng::from_str(yaml)?;
        for profile in &doc.providers {
            profile.validate()?;
        }
        let count = doc.providers.len();
        for profile in doc.providers {
            self.insert(profile);
        }
        Ok(count)
    }

    /// Add or replace a profile.
    pub fn insert(&mut self, mut profile: ProviderConstraints) {
        profile.id = profile.id.to_ascii_lowercase();
        debug!("Registering provider profile: {}", profile.id);
        self.providers.insert(profile.id.clone(), profile);
    }

    /// Look up a provider, falling back to the default profile.
    pub fn get(&self, id: &str) -> &ProviderConstraints {
        match self.lookup(id) {
            Some(profile) => profile,
            None => {
                warn!(
                    "Unknown provider '{}', using default profile '{}'",
                    id, DEFAULT_PROVIDER
                );
                self.default_profile()
            }
        }
    }

    /// Look up a provider without fallback.
    pub fn require(&self, id: &str) -> TargetResult<&ProviderConstraints> {
        self.lookup(id)
            .ok_or_else(|| TargetError::UnknownProvider(id.to_string()))
    }

    /// True when `id` names a profile or alias.
    pub fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }

    /// The profile used for unknown ids.
    pub fn default_profile(&self) -> &ProviderConstraints {
        static GENERIC: std::sync::OnceLock<ProviderConstraints> = std::sync::OnceLock::new();
        self.providers
            .get(DEFAULT_PROVIDER)
            .unwrap_or_else(|| GENERIC.get_or_init(ProviderConstraints::generic))
    }

    /// Profile ids in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Profiles sorted by id.
    pub fn profiles(&self) -> Vec<&ProviderConstraints> {
        let mut profiles: Vec<_> = self.providers.values().collect();
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        profiles
    }

    fn lookup(&self, id: &str) -> Option<&ProviderConstraints> {
        let key = id.trim().to_ascii_lowercase();
        let key = ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map_or(key.as_str(), |(_, target)| *target);
        self.providers.get(key)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(
            registry.ids(),
            vec![
                "generic",
                "google_quantum_ai",
                "ibm_quantum",
                "ionq",
                "quantinuum",
                "rigetti",
                "simulator"
            ]
        );
    }

    #[test]
    fn test_unknown_provider_falls_back_to_default() {
        let registry = ProviderRegistry::builtin();
        let profile = registry.get("acme_quantum_9000");
        assert_eq!(profile.id, DEFAULT_PROVIDER);
        assert_eq!(profile, &ProviderConstraints::generic());
        assert!(!registry.contains("acme_quantum_9000"));
    }

    #[test]
    fn test_case_insensitive_and_aliases() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(registry.get("IBM_Quantum").id, "ibm_quantum");
        assert_eq!(registry.get("ibm").id, "ibm_quantum");
        assert_eq!(registry.get(" Google ").id, "google_quantum_ai");
        assert_eq!(registry.get("sim").id, "simulator");
    }

    #[test]
    fn test_require_is_strict() {
        let registry = ProviderRegistry::builtin();
        assert!(registry.require("ionq").is_ok());
        assert!(matches!(
            registry.require("nope"),
            Err(TargetError::UnknownProvider(ref id)) if id == "nope"
        ));
    }

    #[test]
    fn test_extend_rejects_invalid_profile() {
        let mut registry = ProviderRegistry::builtin();
        let mut bad = ProviderConstraints::generic();
        bad.id = "bad".into();
        bad.readout_error = 2.0;
        let yaml = serde_yaml_ng::to_string(&serde_yaml_ng::Mapping::from_iter([(
            "providers".into(),
            serde_yaml_ng::to_value(vec![bad]).unwrap(),
        )]))
        .unwrap();
        assert!(registry.extend_from_yaml(&yaml).is_err());
        assert!(!registry.contains("bad"));
    }

    #[test]
    fn test_malformed_yaml() {
        let mut registry = ProviderRegistry::builtin();
        assert!(matches!(
            registry.extend_from_yaml("providers: 12"),
            Err(TargetError::Yaml(_))
        ));
    }
}
