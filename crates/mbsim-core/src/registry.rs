//! Integrator factory and registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::dopri::DormandPrince45;
use crate::error::SimError;
use crate::integrator::{GridIntegrator, Integrator};
use crate::rk4::ClassicalRk4;

/// Factory trait for creating integrators.
pub trait IntegratorFactory: Send + Sync {
    /// Get or create an integrator by name.
    fn get(&self, name: &str) -> Result<Arc<dyn Integrator>, SimError>;

    /// List all available integrator names.
    fn available(&self) -> Vec<&str>;
}

/// Default factory with lazy creation and cache.
pub struct DefaultFactory {
    cache: RwLock<HashMap<&'static str, Arc<dyn Integrator>>>,
}

impl DefaultFactory {
    /// Create a new default factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve aliases to the canonical integrator name.
    fn canonical(name: &str) -> Result<&'static str, SimError> {
        match name.to_ascii_lowercase().as_str() {
            "dopri5" | "dopri" | "rk45" => Ok("dopri5"),
            "rk4" => Ok("rk4"),
            _ => Err(SimError::invalid(format!("unknown integrator: {name}"))),
        }
    }

    fn create_integrator(name: &'static str) -> Arc<dyn Integrator> {
        match name {
            "rk4" => Arc::new(GridIntegrator::new(Arc::new(ClassicalRk4::new()))),
            _ => Arc::new(GridIntegrator::new(Arc::new(DormandPrince45::new()))),
        }
    }
}

impl Default for DefaultFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegratorFactory for DefaultFactory {
    fn get(&self, name: &str) -> Result<Arc<dyn Integrator>, SimError> {
        let name = Self::canonical(name)?;
        if let Some(integrator) = self.cache.read().get(name) {
            return Ok(Arc::clone(integrator));
        }

        let integrator = Self::create_integrator(name);
        self.cache.write().insert(name, Arc::clone(&integrator));
        Ok(integrator)
    }

    fn available(&self) -> Vec<&str> {
        vec!["dopri5", "rk4"]
    }
}
