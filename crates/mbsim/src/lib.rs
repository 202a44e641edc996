//! mbsim library: application logic for the microbubble simulator.

pub mod app;
pub mod config;
pub mod errors;
