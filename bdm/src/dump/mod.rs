//! Output encoders for memory dumps.
//!
//! Every encoder is a pure function of the dumped bytes and the address of the
//! first byte. The text formats are produced line by line and each line ends
//! with `\n`.

mod hex;
mod srec;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use hex::{hex_ascii_line, hex_ascii_lines, BYTES_PER_LINE};
pub use srec::{checksum, s3_record, s7_record, srecord_lines, S0_HEADER, MAX_RECORD_DATA};

/// The shape of a memory dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DumpFormat {
    /// The bytes as read.
    #[default]
    Binary,
    /// Sixteen bytes per line as hex and printable ASCII.
    HexAscii,
    /// Motorola S-records with 32-bit addresses.
    SRecord,
}

impl fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DumpFormat::Binary => "bin",
            DumpFormat::HexAscii => "hex",
            DumpFormat::SRecord => "srec",
        })
    }
}

impl FromStr for DumpFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &s.to_ascii_lowercase()[..] {
            "bin" | "binary" => Ok(DumpFormat::Binary),
            "hex" => Ok(DumpFormat::HexAscii),
            "srec" => Ok(DumpFormat::SRecord),
            _ => Err(Error::UnknownFormat(s.to_owned())),
        }
    }
}

/// The text lines of a dump. Binary dumps have no lines and yield nothing.
pub fn lines(data: &[u8], start: u32, format: DumpFormat) -> Vec<String> {
    match format {
        DumpFormat::Binary => Vec::new(),
        DumpFormat::HexAscii => hex_ascii_lines(data, start).collect(),
        DumpFormat::SRecord => srecord_lines(data, start).collect(),
    }
}

/// Encode a dump into a single byte buffer.
pub fn encode(data: &[u8], start: u32, format: DumpFormat) -> Vec<u8> {
    match format {
        DumpFormat::Binary => data.to_vec(),
        text => lines(data, start, text).concat().into_bytes(),
    }
}

/// Stream a dump into `writer`.
pub fn write_dump(
    mut writer: impl Write,
    data: &[u8],
    start: u32,
    format: DumpFormat,
) -> Result<(), Error> {
    match format {
        DumpFormat::Binary => writer.write_all(data)?,
        DumpFormat::HexAscii => {
            for line in hex_ascii_lines(data, start) {
                writer.write_all(line.as_bytes())?;
            }
        }
        DumpFormat::SRecord => {
            for line in srecord_lines(data, start) {
                writer.write_all(line.as_bytes())?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("bin", DumpFormat::Binary)]
    #[test_case("BINARY", DumpFormat::Binary)]
    #[test_case("hex", DumpFormat::HexAscii)]
    #[test_case("Srec", DumpFormat::SRecord)]
    fn parse_format(name: &str, format: DumpFormat) {
        assert_eq!(name.parse::<DumpFormat>().unwrap(), format);
    }

    #[test]
    fn unknown_format() {
        assert!(matches!(
            "ihex".parse::<DumpFormat>(),
            Err(Error::UnknownFormat(name)) if name == "ihex"
        ));
    }

    #[test]
    fn binary_is_identity() {
        let data = [0x00, 0x7F, 0x80, 0xFF];

        assert_eq!(encode(&data, 0x1234, DumpFormat::Binary), data.to_vec());
        assert!(lines(&data, 0x1234, DumpFormat::Binary).is_empty());
    }

    #[test]
    fn write_matches_encode() {
        let data: Vec<u8> = (0..=0x50).collect();

        for format in [DumpFormat::Binary, DumpFormat::HexAscii, DumpFormat::SRecord] {
            let mut written = Vec::new();
            write_dump(&mut written, &data, 0x2000_0000, format).unwrap();
            assert_eq!(written, encode(&data, 0x2000_0000, format));
        }
    }
}
