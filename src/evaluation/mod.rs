//! evaluation — diagnostics for importance weights.
//!
//! Purpose
//! -------
//! Judge a density-ratio estimate by what it does to the source sample:
//! how far the reweighted sample is from the target (MMD), and how many
//! effective observations the weights leave.
//!
//! Key behaviors
//! -------------
//! - [`kernel`]: the [`KernelFunction`] seam and the built-in [`Kernel`]s.
//! - [`mmd`]: [`mmd_squared`] and [`weighted_density_compare`].
//! - [`weights`]: sanitizing, normalizing, ESS, weighted means.
//!
//! Testing notes
//! -------------
//! - MMD idempotence on identical samples is checked for every built-in
//!   kernel here and again end to end in the integration tests.

pub mod kernel;
pub mod mmd;
pub mod weights;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::kernel::{Kernel, KernelFunction};
pub use self::mmd::{mmd_squared, weighted_density_compare, DensityComparison};
pub use self::weights::{effective_sample_size, normalize_weights, sanitize_weights, weighted_mean};

pub mod prelude {
    pub use super::kernel::{Kernel, KernelFunction};
    pub use super::mmd::{mmd_squared, weighted_density_compare, DensityComparison};
    pub use super::weights::{effective_sample_size, sanitize_weights};
}
