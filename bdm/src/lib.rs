//! # Bit-banged Background Debug Mode for ColdFire targets
//!
//! This crate drives the BDM serial debug port of a ColdFire microcontroller
//! (DSI, DSO, DSCLK, BKPT and RESET) through any implementation of [`PinSignal`].
//! It owns the protocol discipline: bit clocking, the synchronization handshake,
//! command framing and the 32-bit memory and register accessors. It also encodes
//! memory dumps as raw binary, hex/ASCII listings or Motorola S-records.
//!
//! # Examples
//!
//! ## Reading a word from memory
//!
//! ```no_run
//! use bdm::{BdmConfig, Error, PinSignal, Session};
//!
//! fn peek(pins: impl PinSignal) -> Result<u32, Error> {
//!     let mut session = Session::new(pins, BdmConfig::default())?;
//!
//!     // Reset the target, request debug mode and synchronize.
//!     session.init()?;
//!
//!     let word = session.read_word_32(0x2000_0000)?;
//!     session.write_word_32(0x2000_0000, word ^ 0xFFFF_FFFF)?;
//!     Ok(word)
//! }
//! ```
//!
//! ## Dumping a region as S-records
//!
//! ```no_run
//! use bdm::{dump, BdmConfig, DumpFormat, Error, MemoryRegion, PinSignal, ReadErrorPolicy, Session};
//!
//! fn dump_boot_sector(pins: impl PinSignal) -> Result<Vec<u8>, Error> {
//!     let mut session = Session::new(pins, BdmConfig::default())?;
//!     session.connect()?;
//!
//!     let region = MemoryRegion::new(0x0000_0000, 0x0000_0400)?;
//!     let data = session.read_region(&region, ReadErrorPolicy::Substitute(0))?;
//!     Ok(dump::encode(&data, region.start(), DumpFormat::SRecord))
//! }
//! ```

mod clock;
pub mod command;
pub mod config;
pub mod dump;
mod error;
pub mod memory_map;
mod pins;
mod region;
mod registers;
mod session;
mod sync;

pub use crate::clock::BitClock;
pub use crate::command::CommandCodec;
pub use crate::config::{BdmConfig, SyncConfig, Timing};
pub use crate::dump::DumpFormat;
pub use crate::error::Error;
pub use crate::pins::{Pin, PinError, PinSignal};
pub use crate::region::{MemoryRegion, ReadErrorPolicy};
pub use crate::registers::{RegisterBank, RegisterId};
pub use crate::session::{Session, SessionState};
pub use crate::sync::{SyncAttempt, SyncEngine};
