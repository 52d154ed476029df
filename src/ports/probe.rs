//! Environment constraint probe.
//!
//! Whether the host currently satisfies a job's scheduling constraints
//! (network metering, battery, charging, idle) is platform knowledge; the
//! scheduler only consumes the answer through this port.

/// Environmental preconditions for a scheduled job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Constraints {
    /// Only run on an unmetered network connection.
    pub unmetered_network: bool,
    /// Only run while the battery is not low.
    pub battery_not_low: bool,
    /// Only run while charging.
    pub charging: bool,
    /// Only run while the device is idle.
    pub device_idle: bool,
}

impl Constraints {
    /// No environmental requirements.
    pub fn none() -> Self {
        Self::default()
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait ConstraintProbe: Send + Sync {
    /// Report whether the environment currently satisfies `constraints`.
    fn satisfied(&self, constraints: &Constraints) -> bool;
}

/// Probe that reports every constraint as satisfied.
///
/// Stands in on hosts without battery or network-metering introspection.
pub struct PermissiveProbe;

impl ConstraintProbe for PermissiveProbe {
    fn satisfied(&self, _constraints: &Constraints) -> bool {
        true
    }
}
