use std::io::Write;
use std::thread;
use std::time::Duration;

use bdm::{Pin, PinSignal, Session};

use crate::config::Config;
use crate::gpio;
use crate::util::cli;
use crate::util::parse_u32;

/// Check the wiring: show the line assignment, then clock DSCLK slowly and sample DSO
///
/// Does not synchronize with the target.
#[derive(clap::Parser)]
pub struct Cmd {
    /// Number of DSCLK pulses
    #[clap(long, value_parser = parse_u32, default_value = "5")]
    pulses: u32,

    /// Time DSCLK spends high and then low in each pulse, in milliseconds
    #[clap(long, value_parser = parse_u32, default_value = "1")]
    pulse_ms: u32,
}

impl Cmd {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut session = cli::open_session(config)?;
        let mut out = std::io::stdout().lock();

        for pin in Pin::ALL {
            let direction = if pin.is_output() { "output" } else { "input" };
            writeln!(
                out,
                "{:<6} ({direction}): GPIO {}",
                pin.signal_name(),
                gpio::offset(&config.gpio, pin)
            )?;
        }
        writeln!(out)?;

        self.execute(&mut session, &mut out)
    }

    pub fn execute<P: PinSignal>(
        &self,
        session: &mut Session<P>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        let pins = session.pins();
        let half_period = Duration::from_millis(u64::from(self.pulse_ms));

        writeln!(out, "DSO: {}", u8::from(pins.level(Pin::DataIn)?))?;
        writeln!(out, "Testing clock generation...")?;
        for pulse in 1..=self.pulses {
            pins.set_level(Pin::Clock, true)?;
            thread::sleep(half_period);
            pins.set_level(Pin::Clock, false)?;
            thread::sleep(half_period);

            writeln!(
                out,
                "Clock pulse {pulse}, DSO = {}",
                u8::from(pins.level(Pin::DataIn)?)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdm::test::{MockPins, PinOperation};
    use bdm::BdmConfig;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn pulses_the_clock_and_samples_dso() {
        let mut session = Session::new(MockPins::new(), BdmConfig::immediate()).unwrap();
        session.pins().push_data_in([true, false, true, true, false, false]);
        session.pins().clear_operations();

        let cmd = Cmd::try_parse_from(["test", "--pulse-ms", "0"]).unwrap();
        let mut out = Vec::new();
        cmd.execute(&mut session, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "DSO: 1\n\
             Testing clock generation...\n\
             Clock pulse 1, DSO = 0\n\
             Clock pulse 2, DSO = 1\n\
             Clock pulse 3, DSO = 1\n\
             Clock pulse 4, DSO = 0\n\
             Clock pulse 5, DSO = 0\n"
        );

        let pins = session.pins();
        assert_eq!(pins.clock_cycles(), 5);
        let samples = pins
            .operations()
            .iter()
            .filter(|op| matches!(op, PinOperation::Read(Pin::DataIn, _)))
            .count();
        assert_eq!(samples, 1 + 5);
        assert!(pins.clocked_out_bits().iter().all(|bit| !bit));
    }

    #[test]
    fn defaults() {
        let cmd = Cmd::try_parse_from(["test"]).unwrap();
        assert_eq!(cmd.pulses, 5);
        assert_eq!(cmd.pulse_ms, 1);
    }
}
