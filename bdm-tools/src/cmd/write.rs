use std::io::Write;

use bdm::{PinSignal, Session};

use crate::config::Config;
use crate::util::cli::{self, ConnectOptions};
use crate::util::parse_hex_u32;

/// Write a 32-bit word to target memory
///
/// e.g. bdm write 20000000 DEADBEEF
///
/// Writes are not acknowledged by the target, use `bdm read` to check the result.
#[derive(clap::Parser)]
#[clap(verbatim_doc_comment)]
pub struct Cmd {
    #[clap(flatten)]
    connect: ConnectOptions,

    /// Address of the word, hexadecimal unless prefixed
    #[clap(value_parser = parse_hex_u32)]
    address: u32,

    /// Value to write, hexadecimal unless prefixed
    #[clap(value_parser = parse_hex_u32)]
    data: u32,
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
        session.write_word_32(self.address, self.data)?;
        writeln!(out, "Memory[{:#010X}] = {:#010X}", self.address, self.data)?;
        Ok(())
    }
}
