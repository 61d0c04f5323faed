// === PUBLIC CONTRACT ===
// Other crates should depend on the contract module only.
pub mod contract;

pub use contract::{client, error, model};

// === MODULE WIRING ===
pub mod module;
pub use module::DeviceRegistry;

// === INTERNAL MODULES ===
// Exposed for tests and for the binaries that own the wiring.
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
