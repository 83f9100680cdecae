use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use bdm::dump::{self, DumpFormat};
use bdm::{MemoryRegion, PinSignal, ReadErrorPolicy, Session};

use crate::config::Config;
use crate::util::cli::{self, ConnectOptions};
use crate::util::{parse_hex_u32, parse_region_end};

/// Dump a memory region to a file
///
/// e.g. bdm dump-file 40000000 40100000 flash.srec --format srec
///
/// The file is created in the current directory, any directories in the given path are ignored.
#[derive(clap::Parser)]
#[clap(verbatim_doc_comment)]
pub struct Cmd {
    #[clap(flatten)]
    connect: ConnectOptions,

    #[clap(flatten)]
    read: ReadOptions,

    /// First address of the region, hexadecimal unless prefixed
    #[clap(value_parser = parse_hex_u32)]
    start: u32,

    /// Address one past the end of the region, hexadecimal unless prefixed
    #[clap(value_parser = parse_region_end)]
    end: u64,

    /// Output file
    file: PathBuf,

    /// Output format: bin, hex or srec
    #[clap(long, short, default_value = "bin")]
    format: DumpFormat,
}

/// How unreadable words are handled while dumping.
#[derive(clap::Parser, Clone, Copy, Debug)]
pub struct ReadOptions {
    /// Stop at the first word that cannot be read instead of filling it with zeros
    #[clap(long)]
    pub abort_on_error: bool,
}

impl ReadOptions {
    pub fn policy(self) -> ReadErrorPolicy {
        if self.abort_on_error {
            ReadErrorPolicy::Abort
        } else {
            ReadErrorPolicy::Substitute(0)
        }
    }
}

impl Cmd {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        // Reject a bad range or file name before touching the target.
        let region = MemoryRegion::new(u64::from(self.start), self.end)?;
        let path = output_path(&self.file)?;

        let mut session = cli::attach(config, self.connect)?;
        let mut out = std::io::stdout().lock();
        writeln!(
            out,
            "Dumping {:#X} bytes from {:#010X} to {:#010X}",
            region.size(),
            region.start(),
            region.end()
        )?;
        writeln!(out, "Output file: {}", path.display())?;

        let written = dump_to_file(
            &mut session,
            &region,
            self.read.policy(),
            self.format,
            &path,
        )?;
        writeln!(out, "Successfully dumped {written} bytes to {}", path.display())?;
        Ok(())
    }
}

/// The file name of `file`, to be created in the current directory.
pub fn output_path(file: &Path) -> anyhow::Result<PathBuf> {
    file.file_name()
        .map(PathBuf::from)
        .with_context(|| format!("{} does not name a file", file.display()))
}

/// Read `region` and write it to `path` in `format`. Returns the number of bytes read.
///
/// The file is only created once the whole region has been read.
pub fn dump_to_file<P: PinSignal>(
    session: &mut Session<P>,
    region: &MemoryRegion,
    policy: ReadErrorPolicy,
    format: DumpFormat,
    path: &Path,
) -> anyhow::Result<usize> {
    let mut reported = 0;
    let data = session.read_region_with(region, policy, |done, total| {
        let percent = done * 100 / total;
        if percent >= reported + 10 {
            reported = percent - percent % 10;
            tracing::info!("Read {}% ({:#x} of {:#x} bytes)", reported, done, total);
        }
    })?;

    let file = File::create(path)
        .map(BufWriter::new)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    dump::write_dump(file, &data, region.start(), format)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(data.len())
}
