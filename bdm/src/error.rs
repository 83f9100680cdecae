use crate::pins::PinError;

/// The overarching error type of this crate.
#[derive(thiserror::Error, Debug, docsplay::Display)]
pub enum Error {
    /// The session is not connected. Synchronize with the target first.
    NotConnected,

    /// Synchronization failed: DSO never went high within {attempts} attempts.
    SyncFailed {
        /// The attempt budget that was exhausted.
        attempts: u32,
    },

    /// Pin access failed.
    Pin(#[from] PinError),

    /// Invalid memory region {start:#010x}..{end:#010x}: the start must lie below the end and the end must be addressable.
    InvalidRegion {
        /// First byte of the rejected region.
        start: u64,
        /// End of the rejected region (exclusive).
        end: u64,
    },

    /// Invalid register '{0}'. Use d0-d7 or a0-a7.
    InvalidRegister(String),

    /// Unknown dump format '{0}'. Use bin, hex or srec.
    UnknownFormat(String),

    /// Unknown memory region '{0}'. Use bootrom, flash, sram or all.
    UnknownRegion(String),

    /// Writing the dump failed.
    Io(#[from] std::io::Error),
}
