//! Drives the BDM lines through the Linux GPIO character device.

use bdm::{Pin, PinError, PinSignal};

use crate::config::GpioConfig;

#[cfg(target_os = "linux")]
pub use linux::GpioPins;

/// The pin driver of this host.
#[cfg(target_os = "linux")]
pub type Pins = GpioPins;
#[cfg(not(target_os = "linux"))]
pub type Pins = Unsupported;

/// Open the configured GPIO lines.
#[cfg(target_os = "linux")]
pub fn open(config: &GpioConfig) -> anyhow::Result<Pins> {
    GpioPins::open(config)
}

#[cfg(not(target_os = "linux"))]
pub fn open(_config: &GpioConfig) -> anyhow::Result<Pins> {
    anyhow::bail!("GPIO access is only supported on Linux")
}

/// Placeholder pin driver on hosts without a GPIO character device.
#[cfg(not(target_os = "linux"))]
#[derive(Debug)]
pub enum Unsupported {}

#[cfg(not(target_os = "linux"))]
impl PinSignal for Unsupported {
    fn set_level(&mut self, _pin: Pin, _level: bool) -> Result<(), PinError> {
        match *self {}
    }

    fn level(&mut self, _pin: Pin) -> Result<bool, PinError> {
        match *self {}
    }
}

/// The line offset configured for `pin`.
pub fn offset(config: &GpioConfig, pin: Pin) -> u32 {
    match pin {
        Pin::DataOut => config.dsi,
        Pin::DataIn => config.dso,
        Pin::Clock => config.dsclk,
        Pin::Breakpoint => config.bkpt,
        Pin::Reset => config.reset,
    }
}

#[cfg(target_os = "linux")]
mod linux {
    use gpiocdev::line::Value;
    use gpiocdev::Request;

    use super::*;

    /// All five BDM lines, requested together from one chip.
    pub struct GpioPins {
        request: Request,
        config: GpioConfig,
    }

    impl std::fmt::Debug for GpioPins {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("GpioPins")
                .field("config", &self.config)
                .finish_non_exhaustive()
        }
    }

    impl GpioPins {
        /// Request the lines with every output at its idle level: DSI and DSCLK
        /// low, BKPT and RESET released.
        pub fn open(config: &GpioConfig) -> anyhow::Result<Self> {
            tracing::debug!("Requesting BDM lines from {}", config.chip.display());

            let request = Request::builder()
                .on_chip(&config.chip)
                .with_consumer("bdm")
                .with_lines(&[config.dsi, config.dsclk])
                .as_output(Value::Inactive)
                .with_lines(&[config.bkpt, config.reset])
                .as_output(Value::Active)
                .with_line(config.dso)
                .as_input()
                .request()?;

            Ok(Self {
                request,
                config: config.clone(),
            })
        }
    }

    impl PinSignal for GpioPins {
        fn set_level(&mut self, pin: Pin, level: bool) -> Result<(), PinError> {
            if !pin.is_output() {
                return Err(PinError::Unavailable(pin));
            }
            let value = if level { Value::Active } else { Value::Inactive };
            self.request
                .set_value(offset(&self.config, pin), value)
                .map_err(|error| PinError::Driver(Box::new(error)))
        }

        fn level(&mut self, pin: Pin) -> Result<bool, PinError> {
            let value = self
                .request
                .value(offset(&self.config, pin))
                .map_err(|error| PinError::Driver(Box::new(error)))?;
            Ok(value == Value::Active)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_offsets() {
        let config = GpioConfig::default();
        let offsets: Vec<u32> = Pin::ALL.iter().map(|&pin| offset(&config, pin)).collect();

        assert_eq!(offsets, vec![13, 19, 26, 17, 6]);
    }
}
