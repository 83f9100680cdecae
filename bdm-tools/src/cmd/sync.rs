use std::io::Write;

use bdm::{PinSignal, Session, SessionState};

use crate::config::Config;
use crate::util::cli;

/// Run the synchronization handshake without resetting the target
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
        match session.sync()? {
            SessionState::Connected => {
                writeln!(out, "BDM sync successful")?;
                Ok(())
            }
            SessionState::Disconnected => anyhow::bail!(
                "BDM sync failed, DSO stayed low for {} attempts",
                session.config().sync.attempts
            ),
        }
    }
}
