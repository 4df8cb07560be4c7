//! Registry configuration.

use docuchain_core::Limits;

/// Configuration for the Registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Bounds on names, metadata, and status labels.
    pub limits: Limits,
    /// Buffered events per subscriber before the slowest one starts lagging.
    pub event_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            event_capacity: 256,
        }
    }
}
