use std::io::Write;

use bdm::{PinSignal, Session};

use crate::config::Config;
use crate::util::cli;

/// Pulse BKPT to request debug mode
#[derive(clap::Parser)]
pub struct Cmd {}

impl Cmd {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut session = cli::open_session(config)?;
        self.execute(&mut session, &mut std::io::stdout().lock())
    }

    pub fn execute<P: PinSignal>(
        &self,
        session: &mut Session<P>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        session.enter_debug_mode()?;
        writeln!(out, "Debug mode requested")?;
        Ok(())
    }
}
