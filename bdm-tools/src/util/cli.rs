use anyhow::Context;
use bdm::{PinSignal, Session};

use crate::config::Config;
use crate::gpio::{self, Pins};

/// How a command brings the target into a state where it accepts commands.
#[derive(clap::Parser, Clone, Copy, Debug, Default)]
pub struct ConnectOptions {
    /// Reset the target and request debug mode before synchronizing
    #[clap(long, help_heading = "CONNECTION")]
    pub init: bool,
}

/// Claim the BDM lines and put them into their idle state, without talking to the target.
pub fn open_session(config: &Config) -> anyhow::Result<Session<Pins>> {
    let pins = gpio::open(&config.gpio).with_context(|| {
        format!(
            "Failed to request the BDM lines from {}",
            config.gpio.chip.display()
        )
    })?;

    Session::new(pins, config.bdm).context("Failed to drive the BDM lines to their idle levels")
}

/// Open a session and connect to the target.
pub fn attach(config: &Config, options: ConnectOptions) -> anyhow::Result<Session<Pins>> {
    let mut session = open_session(config)?;
    connect(&mut session, options)?;
    Ok(session)
}

/// Synchronize with the target, running the full init sequence first if requested.
pub fn connect<P: PinSignal>(
    session: &mut Session<P>,
    options: ConnectOptions,
) -> anyhow::Result<()> {
    let result = if options.init {
        session.init()
    } else {
        session.connect()
    };
    result.context("Failed to connect to the target")
}
