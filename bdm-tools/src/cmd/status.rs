use std::io::Write;

use bdm::{Pin, PinSignal, Session};

use crate::config::Config;
use crate::gpio;
use crate::util::cli;

/// Show the connection state and the current level of every BDM line
#[derive(clap::Parser)]
pub struct Cmd {}

impl Cmd {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut session = cli::open_session(config)?;
        let mut out = std::io::stdout().lock();

        writeln!(out, "Lines on {}:", config.gpio.chip.display())?;
        for pin in Pin::ALL {
            writeln!(
                out,
                "  {:<6} GPIO {}",
                pin.signal_name(),
                gpio::offset(&config.gpio, pin)
            )?;
        }

        self.execute(&mut session, &mut out)
    }

    pub fn execute<P: PinSignal>(
        &self,
        session: &mut Session<P>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        let state = if session.state().is_connected() {
            "Connected"
        } else {
            "Not connected"
        };
        writeln!(out, "Status: {state}")?;

        writeln!(out, "Current levels:")?;
        for pin in Pin::ALL {
            let level = session.pins().level(pin)?;
            writeln!(out, "  {:<6} {}", format!("{}:", pin.signal_name()), u8::from(level))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdm::test::MockPins;
    use bdm::BdmConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn idle_levels() {
        let mut session = Session::new(MockPins::new(), BdmConfig::immediate()).unwrap();
        let mut out = Vec::new();

        Cmd {}.execute(&mut session, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Status: Not connected\n\
             Current levels:\n  \
             DSI:   0\n  \
             DSCLK: 0\n  \
             BKPT:  1\n  \
             RESET: 1\n  \
             DSO:   0\n"
        );
    }
}
