mod cmd;
mod config;
mod gpio;
mod util;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::{load_config, Config};
use crate::util::logging::{setup_logging, LevelFilter};

#[derive(clap::Parser)]
#[clap(
    name = "bdm",
    about = "Read and write ColdFire MCF54415 targets over a bit-banged BDM port",
    version
)]
struct Cli {
    /// Location for a JSON log file
    #[clap(long, global = true, help_heading = "LOG CONFIGURATION")]
    log_file: Option<PathBuf>,
    /// Log level on stderr. Without it the configuration file, then `RUST_LOG` is used.
    #[clap(long, global = true, value_enum, help_heading = "LOG CONFIGURATION")]
    log_level: Option<LevelFilter>,
    /// Configuration file [default: bdm.toml in the current directory]
    #[clap(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    subcommand: Subcommand,
}

impl Cli {
    fn run(self, config: &Config) -> Result<()> {
        match self.subcommand {
            Subcommand::Init(cmd) => cmd.run(config),
            Subcommand::Sync(cmd) => cmd.run(config),
            Subcommand::Reset(cmd) => cmd.run(config),
            Subcommand::Debug(cmd) => cmd.run(config),
            Subcommand::Status(cmd) => cmd.run(config),
            Subcommand::Test(cmd) => cmd.run(config),
            Subcommand::Read(cmd) => cmd.run(config),
            Subcommand::Write(cmd) => cmd.run(config),
            Subcommand::Dump(cmd) => cmd.run(config),
            Subcommand::DumpFile(cmd) => cmd.run(config),
            Subcommand::Map(cmd) => cmd.run(),
            Subcommand::QuickDump(cmd) => cmd.run(config),
            Subcommand::ReadReg(cmd) => cmd.run(config),
            Subcommand::WriteReg(cmd) => cmd.run(config),
            Subcommand::Regs(cmd) => cmd.run(config),
        }
    }
}

#[derive(clap::Subcommand)]
enum Subcommand {
    Init(cmd::init::Cmd),
    Sync(cmd::sync::Cmd),
    Reset(cmd::reset::Cmd),
    Debug(cmd::debug::Cmd),
    Status(cmd::status::Cmd),
    Test(cmd::connectivity::Cmd),
    Read(cmd::read::Cmd),
    Write(cmd::write::Cmd),
    Dump(cmd::dump::Cmd),
    DumpFile(cmd::dump_file::Cmd),
    Map(cmd::map::Cmd),
    QuickDump(cmd::quick_dump::Cmd),
    ReadReg(cmd::registers::ReadCmd),
    WriteReg(cmd::registers::WriteCmd),
    Regs(cmd::registers::AllCmd),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let _logger_guard = setup_logging(cli.log_file.as_deref(), cli.log_level.or(config.log_level))?;
    tracing::debug!("Using {:?}", config);

    cli.run(&config)
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn subcommand_names() {
        for args in [
            &["bdm", "init"][..],
            &["bdm", "status"],
            &["bdm", "test", "--pulses", "10"],
            &["bdm", "dump-file", "0", "100", "boot.bin"],
            &["bdm", "quick-dump", "all", "--init"],
            &["bdm", "read-reg", "d0"],
            &["bdm", "write-reg", "a7", "0x20010000"],
            &["bdm", "regs", "--log-level", "DEBUG"],
        ] {
            assert!(Cli::try_parse_from(args).is_ok(), "{args:?}");
        }
    }
}
