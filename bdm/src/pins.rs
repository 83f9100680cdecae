//! The digital pin capability the protocol engine is driven through.

use std::fmt;

/// The BDM port lines, named from the host's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pin {
    /// Data serial input of the target (DSI), driven by the host.
    DataOut,
    /// Data serial output of the target (DSO), sampled by the host.
    DataIn,
    /// Data serial clock (DSCLK), driven by the host.
    Clock,
    /// Breakpoint request (BKPT), active low.
    Breakpoint,
    /// Target reset (RESET), active low.
    Reset,
}

impl Pin {
    /// All lines, outputs first.
    pub const ALL: [Pin; 5] = [
        Pin::DataOut,
        Pin::Clock,
        Pin::Breakpoint,
        Pin::Reset,
        Pin::DataIn,
    ];

    /// The signal name used in the ColdFire BDM documentation.
    pub fn signal_name(self) -> &'static str {
        match self {
            Pin::DataOut => "DSI",
            Pin::DataIn => "DSO",
            Pin::Clock => "DSCLK",
            Pin::Breakpoint => "BKPT",
            Pin::Reset => "RESET",
        }
    }

    /// Whether the host drives this line.
    pub fn is_output(self) -> bool {
        !matches!(self, Pin::DataIn)
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signal_name())
    }
}

/// A failure of the underlying pin driver.
#[derive(thiserror::Error, Debug, docsplay::Display)]
pub enum PinError {
    /// The {0} line is not available.
    Unavailable(Pin),

    /// The pin driver reported an error.
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Sets and samples the individual BDM lines.
///
/// Implementations carry no protocol knowledge. `true` is a logical high level.
pub trait PinSignal {
    /// Drive `pin` to `level`.
    fn set_level(&mut self, pin: Pin, level: bool) -> Result<(), PinError>;

    /// Sample the current level of `pin`.
    fn level(&mut self, pin: Pin) -> Result<bool, PinError>;
}

impl<P: PinSignal + ?Sized> PinSignal for &mut P {
    fn set_level(&mut self, pin: Pin, level: bool) -> Result<(), PinError> {
        (**self).set_level(pin, level)
    }

    fn level(&mut self, pin: Pin) -> Result<bool, PinError> {
        (**self).level(pin)
    }
}

impl<P: PinSignal + ?Sized> PinSignal for Box<P> {
    fn set_level(&mut self, pin: Pin, level: bool) -> Result<(), PinError> {
        (**self).set_level(pin, level)
    }

    fn level(&mut self, pin: Pin) -> Result<bool, PinError> {
        (**self).level(pin)
    }
}
