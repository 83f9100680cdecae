use std::fmt::Write;

/// The header record that opens every dump.
pub const S0_HEADER: &str = "S00F000068656C6C6F202020202000003C";

/// Maximum number of data bytes in one S3 record.
pub const MAX_RECORD_DATA: usize = 32;

/// Address bytes plus the checksum byte, counted in the record length.
const ADDRESS_AND_CHECKSUM: u8 = 5;

/// One's complement of the 8-bit sum of the length byte, the four address bytes
/// and the data bytes.
pub fn checksum(length: u8, address: u32, data: &[u8]) -> u8 {
    let sum = address
        .to_be_bytes()
        .iter()
        .chain(data)
        .fold(length, |sum, byte| sum.wrapping_add(*byte));
    !sum
}

/// An S3 data record for up to 32 bytes at `address`.
///
/// # Panics
///
/// Panics if `data` holds more than [`MAX_RECORD_DATA`] bytes.
pub fn s3_record(address: u32, data: &[u8]) -> String {
    assert!(
        data.len() <= MAX_RECORD_DATA,
        "S3 record data is limited to {MAX_RECORD_DATA} bytes"
    );
    // At most 32 + 5.
    let length = data.len() as u8 + ADDRESS_AND_CHECKSUM;

    let mut record = format!("S3{length:02X}{address:08X}");
    for byte in data {
        // Writing to a String cannot fail.
        let _ = write!(record, "{byte:02X}");
    }
    let _ = writeln!(record, "{:02X}", checksum(length, address, data));
    record
}

/// The S7 termination record carrying the start address.
pub fn s7_record(address: u32) -> String {
    let length = ADDRESS_AND_CHECKSUM;
    format!(
        "S7{length:02X}{address:08X}{:02X}\n",
        checksum(length, address, &[])
    )
}

/// The full record sequence for `data` starting at `start`: the S0 header, one
/// S3 record per 32-byte chunk and the S7 terminator.
pub fn srecord_lines(data: &[u8], start: u32) -> impl Iterator<Item = String> + '_ {
    let header = std::iter::once(format!("{S0_HEADER}\n"));
    let records = data
        .chunks(MAX_RECORD_DATA)
        .enumerate()
        .map(move |(index, chunk)| {
            let offset = (index * MAX_RECORD_DATA) as u32;
            s3_record(start.wrapping_add(offset), chunk)
        });
    let terminator = std::iter::once_with(move || s7_record(start));

    header.chain(records).chain(terminator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_byte_record() {
        let lines: Vec<_> = srecord_lines(&[0xFF], 0x0000_1000).collect();

        let expected_checksum = !(0x06u8 + 0x00 + 0x00 + 0x10 + 0x00).wrapping_add(0xFF);
        assert_eq!(expected_checksum, 0xEA);
        assert_eq!(
            lines,
            vec![
                "S00F000068656C6C6F202020202000003C\n".to_owned(),
                "S30600001000FFEA\n".to_owned(),
                s7_record(0x0000_1000),
            ]
        );
    }

    #[test]
    fn terminator_checksum() {
        // !(0x05 + 0x00 + 0x00 + 0x10 + 0x00) = !0x15
        assert_eq!(s7_record(0x0000_1000), "S70500001000EA\n");
        assert_eq!(s7_record(0), "S70500000000FA\n");
    }

    #[test]
    fn checksum_wraps_every_addition() {
        let data = [0xFF; 32];
        // 0x25 + 0x40 + 32 * 0xFF = 0x2045, truncated 0x45.
        assert_eq!(checksum(0x25, 0x4000_0000, &data), !0x45);
    }

    #[test]
    fn chunks_of_32_with_running_address() {
        let data: Vec<u8> = (0..70).collect();
        let lines: Vec<_> = srecord_lines(&data, 0x2000_0000).collect();

        assert_eq!(lines.len(), 1 + 3 + 1);
        assert!(lines[1].starts_with("S32520000000000102"));
        assert!(lines[2].starts_with("S32520000020202122"));
        assert!(lines[3].starts_with("S30B20000040404142"));
        // The terminator always carries the start address of the dump.
        assert!(lines[4].starts_with("S70520000000"));
        for line in &lines {
            assert!(line.ends_with('\n'));
        }
    }

    #[test]
    fn empty_dump_has_header_and_terminator() {
        let lines: Vec<_> = srecord_lines(&[], 0x100).collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], s7_record(0x100));
    }

    #[test]
    #[should_panic]
    fn oversized_record_panics() {
        s3_record(0, &[0; 33]);
    }
}
