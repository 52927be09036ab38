//! Built-in optimization passes.
//!
//! - [`GateCancellation`]: drops identities and adjacent inverse pairs
//! - [`GateMerging`]: folds runs of single-qubit gates
//! - [`ProviderTranspilation`]: rewrites gates into a provider's native set

mod cancel;
mod merge;
mod transpile;

pub use cancel::GateCancellation;
pub use merge::GateMerging;
pub use transpile::{ProviderTranspilation, transpile_gate};
