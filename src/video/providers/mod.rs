//! Video generation task providers.

#[cfg(feature = "ark")]
mod ark;

#[cfg(feature = "ark")]
pub use ark::{ArkProvider, ArkProviderBuilder, DEFAULT_TIMEOUT};
