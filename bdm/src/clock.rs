use std::thread;
use std::time::Duration;

use crate::config::Timing;
use crate::pins::{Pin, PinError, PinSignal};

/// Transfers single bits over the BDM port using a [`PinSignal`].
///
/// Every transferred bit costs exactly one DSCLK cycle: a setup delay with the
/// clock low, the clock driven high for one hold period, then low again for one
/// hold period.
#[derive(Debug)]
pub struct BitClock<P> {
    pins: P,
    timing: Timing,
}

impl<P: PinSignal> BitClock<P> {
    pub fn new(pins: P, timing: Timing) -> Self {
        Self { pins, timing }
    }

    /// Generate a single clock cycle. DSI must already hold the bit to send.
    pub fn cycle(&mut self) -> Result<(), PinError> {
        pause(self.timing.setup());
        self.pins.set_level(Pin::Clock, true)?;
        pause(self.timing.hold());
        self.pins.set_level(Pin::Clock, false)?;
        pause(self.timing.hold());

        Ok(())
    }

    /// Drive DSI to `bit` and clock it into the target.
    pub fn write_bit(&mut self, bit: bool) -> Result<(), PinError> {
        self.pins.set_level(Pin::DataOut, bit)?;
        self.cycle()
    }

    /// Clock one bit out of the target and sample DSO.
    ///
    /// DSO is sampled after the clock pulse has completed, not while DSCLK is high.
    // TODO: confirm the sampling edge against a logic analyzer capture of a real MCF54415.
    pub fn read_bit(&mut self) -> Result<bool, PinError> {
        self.cycle()?;
        self.pins.level(Pin::DataIn)
    }

    /// Access the underlying pins, e.g. to pulse the control lines.
    pub fn pins(&mut self) -> &mut P {
        &mut self.pins
    }

    /// Give back the pins.
    pub fn into_pins(self) -> P {
        self.pins
    }
}

/// Sleep for `duration`, skipping the syscall for zero delays.
pub(crate) fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}
