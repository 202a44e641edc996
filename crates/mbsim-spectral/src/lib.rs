//! # mbsim-spectral
//!
//! One-sided DFT magnitude spectra of bubble trajectories and the harmonic
//! levels read off them.

pub mod analyzer;
pub mod harmonics;
pub mod spectrum;

// Re-exports
pub use analyzer::SpectrumAnalyzer;
pub use harmonics::{HarmonicLevel, HarmonicSignature};
pub use spectrum::{Peak, Spectrum};
