//! Timing and handshake parameters.
//!
//! All values can be loaded from any serde format. Missing fields fall back to
//! the defaults, which are the nominal targets of a 1 MHz BDM clock.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delays used while clocking bits and pulsing the control lines.
///
/// These are nominal targets. The host gives no hard real-time guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timing {
    /// Data setup time before DSCLK rises, in nanoseconds.
    pub setup_ns: u64,
    /// High and low hold time of DSCLK, in nanoseconds.
    pub hold_ns: u64,
    /// How long RESET is held asserted, in milliseconds.
    pub reset_hold_ms: u64,
    /// How long the target is given to restart after RESET is released, in milliseconds.
    pub reset_recovery_ms: u64,
    /// How long BKPT is held asserted, in microseconds.
    pub breakpoint_hold_us: u64,
}

impl Timing {
    /// A timing with every delay set to zero.
    ///
    /// Useful when the pins are simulated.
    pub const fn immediate() -> Self {
        Timing {
            setup_ns: 0,
            hold_ns: 0,
            reset_hold_ms: 0,
            reset_recovery_ms: 0,
            breakpoint_hold_us: 0,
        }
    }

    pub fn setup(&self) -> Duration {
        Duration::from_nanos(self.setup_ns)
    }

    pub fn hold(&self) -> Duration {
        Duration::from_nanos(self.hold_ns)
    }

    pub fn reset_hold(&self) -> Duration {
        Duration::from_millis(self.reset_hold_ms)
    }

    pub fn reset_recovery(&self) -> Duration {
        Duration::from_millis(self.reset_recovery_ms)
    }

    pub fn breakpoint_hold(&self) -> Duration {
        Duration::from_micros(self.breakpoint_hold_us)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            setup_ns: 500,
            hold_ns: 1_000,
            reset_hold_ms: 100,
            reset_recovery_ms: 100,
            breakpoint_hold_us: 1_000,
        }
    }
}

/// Parameters of the synchronization handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Clock cycles sent with DSI held low before DSO is polled.
    pub kick_cycles: u32,
    /// How often DSO is polled before the handshake is given up.
    pub attempts: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            kick_cycles: 16,
            attempts: 1000,
        }
    }
}

/// The complete protocol configuration of a [`Session`](crate::Session).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BdmConfig {
    pub timing: Timing,
    pub sync: SyncConfig,
}

impl BdmConfig {
    /// The default handshake with all delays removed.
    pub fn immediate() -> Self {
        BdmConfig {
            timing: Timing::immediate(),
            sync: SyncConfig::default(),
        }
    }
}
