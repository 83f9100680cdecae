use std::io::Write;

use bdm::{PinSignal, Session};

use crate::config::Config;
use crate::util::cli::{self, ConnectOptions};
use crate::util::{parse_hex_u32, parse_u32};

/// Print consecutive 32-bit words of target memory
#[derive(clap::Parser)]
pub struct Cmd {
    #[clap(flatten)]
    connect: ConnectOptions,

    /// Address of the first word, hexadecimal unless prefixed
    #[clap(value_parser = parse_hex_u32)]
    address: u32,

    /// Number of words to read
    #[clap(value_parser = parse_u32, default_value = "8")]
    count: u32,
}

impl Cmd {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut session = cli::attach(config, self.connect)?;
        self.execute(&mut session, &mut std::io::stdout().lock())
    }

    pub fn execute<P: PinSignal>(
        &self,
        session: &mut Session<P>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        let words = session.read_words(self.address, self.count as usize)?;

        writeln!(out, "Memory dump starting at {:#010X}:", self.address)?;
        let mut address = self.address;
        for word in words {
            writeln!(out, "{address:#010X}: {word:#010X}")?;
            address = address.wrapping_add(4);
        }
        Ok(())
    }
}
