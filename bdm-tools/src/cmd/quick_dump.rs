use std::io::Write;
use std::path::Path;

use anyhow::Context;
use bdm::dump::DumpFormat;
use bdm::memory_map::PresetSelection;

use super::dump_file::{dump_to_file, ReadOptions};
use crate::config::Config;
use crate::util::cli::{self, ConnectOptions};

/// Dump a well known MCF54415 region to a binary file
///
/// Regions:
///     bootrom  0x00000000 - 0x00100000  mcf54415_bootrom.bin
///     flash    0x40000000 - 0x40100000  mcf54415_flash.bin
///     sram     0x20000000 - 0x20020000  mcf54415_sram.bin
///     all      all of the above
#[derive(clap::Parser)]
#[clap(verbatim_doc_comment)]
pub struct Cmd {
    #[clap(flatten)]
    connect: ConnectOptions,

    #[clap(flatten)]
    read: ReadOptions,

    /// Region to dump
    region: PresetSelection,
}

impl Cmd {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut session = cli::attach(config, self.connect)?;
        let mut out = std::io::stdout().lock();

        let presets = self.region.presets();
        let total = presets.len();
        for (index, preset) in presets.into_iter().enumerate() {
            let region = preset.region();
            writeln!(
                out,
                "[{}/{}] Dumping {} {:#010X} - {:#010X} ({}KB) to {}",
                index + 1,
                total,
                preset.name,
                region.start(),
                region.end(),
                region.size() / 1024,
                preset.file_name
            )?;

            let written = dump_to_file(
                &mut session,
                &region,
                self.read.policy(),
                DumpFormat::Binary,
                Path::new(preset.file_name),
            )
            .with_context(|| format!("Failed to dump {}", preset.name))?;

            writeln!(out, "Completed: {} ({written} bytes)", preset.file_name)?;
        }

        Ok(())
    }
}
