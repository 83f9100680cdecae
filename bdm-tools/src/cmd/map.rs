use std::io::Write;

use bdm::memory_map::{self, MCF54415};

/// Print the MCF54415 memory map
#[derive(clap::Parser)]
pub struct Cmd {}

impl Cmd {
    pub fn run(self) -> anyhow::Result<()> {
        self.execute(&mut std::io::stdout().lock())
    }

    pub fn execute(&self, out: &mut impl Write) -> anyhow::Result<()> {
        writeln!(out, "MCF54415 Memory Map:")?;
        writeln!(out, "{}", "=".repeat(50))?;
        for entry in MCF54415 {
            writeln!(
                out,
                "{:#010X} - {:#010X} : {}",
                entry.start, entry.last, entry.name
            )?;
        }

        writeln!(out)?;
        writeln!(out, "Quick dump regions:")?;
        for preset in [memory_map::BOOT_ROM, memory_map::FLASH, memory_map::SRAM] {
            writeln!(
                out,
                "  {:<8} {:#010X} ({}KB)",
                preset.name,
                preset.start,
                preset.region().size() / 1024
            )?;
        }
        Ok(())
    }
}
