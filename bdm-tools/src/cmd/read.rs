use std::io::Write;

use bdm::{PinSignal, Session};

use crate::config::Config;
use crate::util::cli::{self, ConnectOptions};
use crate::util::parse_hex_u32;

/// Read a 32-bit word from target memory
///
/// e.g. bdm read 20000000
///      Memory[0x20000000] = 0x12345678
#[derive(clap::Parser)]
#[clap(verbatim_doc_comment)]
pub struct Cmd {
    #[clap(flatten)]
    connect: ConnectOptions,

    /// Address of the word, hexadecimal unless prefixed
    #[clap(value_parser = parse_hex_u32)]
    address: u32,
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
        let value = session.read_word_32(self.address)?;
        writeln!(out, "Memory[{:#010X}] = {:#010X}", self.address, value)?;
        Ok(())
    }
}
