/// Bytes shown on one line of a hex/ASCII listing.
pub const BYTES_PER_LINE: usize = 16;

/// Width of the hex column: 16 pairs and the spaces between them, plus one.
const HEX_COLUMN: usize = BYTES_PER_LINE * 3;

/// Render up to 16 bytes at `address` as
/// `AAAAAAAA: XX XX ...                                  |ascii...|`.
pub fn hex_ascii_line(address: u32, bytes: &[u8]) -> String {
    let hex = bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ");
    let ascii: String = bytes
        .iter()
        .map(|&byte| {
            if (32..=126).contains(&byte) {
                byte as char
            } else {
                '.'
            }
        })
        .collect();

    format!("{address:08X}: {hex:<HEX_COLUMN$} |{ascii}|\n")
}

/// Split `data` into 16-byte lines starting at `start`.
pub fn hex_ascii_lines(data: &[u8], start: u32) -> impl Iterator<Item = String> + '_ {
    data.chunks(BYTES_PER_LINE)
        .enumerate()
        .map(move |(index, chunk)| {
            let offset = (index * BYTES_PER_LINE) as u32;
            hex_ascii_line(start.wrapping_add(offset), chunk)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sixteen_zero_bytes() {
        let lines: Vec<_> = hex_ascii_lines(&[0; 16], 0).collect();

        assert_eq!(
            lines,
            vec![format!(
                "00000000: {} |{}|\n",
                ["00"; 16].join(" "),
                ".".repeat(16)
            )]
        );
    }

    #[test]
    fn short_last_line_is_padded() {
        let data = b"Hello, BDM world!\x00\x7f";
        let lines: Vec<_> = hex_ascii_lines(data, 0x4000_0000).collect();

        assert_eq!(
            lines,
            vec![
                "40000000: 48 65 6C 6C 6F 2C 20 42 44 4D 20 77 6F 72 6C 64  |Hello, BDM world|\n"
                    .to_owned(),
                format!("40000010: {:<48} |!..|\n", "21 00 7F"),
            ]
        );
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert_eq!(hex_ascii_lines(&[], 0).count(), 0);
    }

    #[test]
    fn printable_range_bounds() {
        let line = hex_ascii_line(0, &[31, 32, 126, 127]);

        assert!(line.ends_with("|. ~.|\n"));
    }
}
