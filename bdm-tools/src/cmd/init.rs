use std::io::Write;

use anyhow::Context;
use bdm::{PinSignal, Session};

use crate::config::Config;
use crate::util::cli;

/// Reset the target, request debug mode and synchronize
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
        session
            .init()
            .context("Failed to establish the BDM connection")?;
        writeln!(out, "BDM connection established")?;
        Ok(())
    }
}
