use std::io::Write;

use bdm::{PinSignal, RegisterId, Session};

use crate::config::Config;
use crate::util::cli::{self, ConnectOptions};
use crate::util::parse_hex_u32;

/// Read a general purpose register (d0-d7, a0-a7)
#[derive(clap::Parser)]
pub struct ReadCmd {
    #[clap(flatten)]
    connect: ConnectOptions,

    register: RegisterId,
}

impl ReadCmd {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut session = cli::attach(config, self.connect)?;
        self.execute(&mut session, &mut std::io::stdout().lock())
    }

    pub fn execute<P: PinSignal>(
        &self,
        session: &mut Session<P>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        let value = session.read_register(self.register)?;
        writeln!(out, "{} = {:#010X}", self.register, value)?;
        Ok(())
    }
}

/// Write a general purpose register (d0-d7, a0-a7)
#[derive(clap::Parser)]
pub struct WriteCmd {
    #[clap(flatten)]
    connect: ConnectOptions,

    register: RegisterId,

    /// Value to write, hexadecimal unless prefixed
    #[clap(value_parser = parse_hex_u32)]
    data: u32,
}

impl WriteCmd {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut session = cli::attach(config, self.connect)?;
        self.execute(&mut session, &mut std::io::stdout().lock())
    }

    pub fn execute<P: PinSignal>(
        &self,
        session: &mut Session<P>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        session.write_register(self.register, self.data)?;
        writeln!(out, "{} = {:#010X}", self.register, self.data)?;
        Ok(())
    }
}

/// Read all data and address registers
#[derive(clap::Parser)]
pub struct AllCmd {
    #[clap(flatten)]
    connect: ConnectOptions,
}

impl AllCmd {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut session = cli::attach(config, self.connect)?;
        self.execute(&mut session, &mut std::io::stdout().lock())
    }

    pub fn execute<P: PinSignal>(
        &self,
        session: &mut Session<P>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        let values = session.read_all_registers()?;
        let (data, address) = values.split_at(values.len() / 2);

        writeln!(out, "CPU Registers:")?;
        writeln!(out, "{}", "-".repeat(40))?;
        for ((d, d_value), (a, a_value)) in data.iter().zip(address) {
            writeln!(out, "{d}: {d_value:#010X}    {a}: {a_value:#010X}")?;
        }
        Ok(())
    }
}
