//! The MCF54415 memory map and the regions worth dumping.

use std::str::FromStr;

use crate::error::Error;
use crate::region::MemoryRegion;

/// A named block of the target address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapEntry {
    pub start: u32,
    /// Last byte of the block (inclusive).
    pub last: u32,
    pub name: &'static str,
}

impl MapEntry {
    pub fn size(&self) -> u64 {
        u64::from(self.last) - u64::from(self.start) + 1
    }

    pub fn region(&self) -> MemoryRegion {
        MemoryRegion::from_valid_bounds(u64::from(self.start), u64::from(self.last) + 1)
    }
}

/// The MCF54415 address map.
pub const MCF54415: &[MapEntry] = &[
    MapEntry {
        start: 0x0000_0000,
        last: 0x000F_FFFF,
        name: "Boot ROM",
    },
    MapEntry {
        start: 0x0010_0000,
        last: 0x001F_FFFF,
        name: "Reserved",
    },
    MapEntry {
        start: 0x2000_0000,
        last: 0x2001_FFFF,
        name: "Internal SRAM",
    },
    MapEntry {
        start: 0x4000_0000,
        last: 0x400F_FFFF,
        name: "FlexBus CS0 (External Flash)",
    },
    MapEntry {
        start: 0x6000_0000,
        last: 0x600F_FFFF,
        name: "FlexBus CS1",
    },
    MapEntry {
        start: 0x8000_0000,
        last: 0x800F_FFFF,
        name: "FlexBus CS2",
    },
    MapEntry {
        start: 0xA000_0000,
        last: 0xA00F_FFFF,
        name: "FlexBus CS3",
    },
    MapEntry {
        start: 0xFC00_0000,
        last: 0xFFFF_FFFF,
        name: "Internal Peripherals",
    },
];

/// A region commonly dumped to recover firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpPreset {
    pub name: &'static str,
    pub start: u32,
    /// Exclusive end.
    pub end: u32,
    /// Default output file name.
    pub file_name: &'static str,
}

impl DumpPreset {
    pub fn region(&self) -> MemoryRegion {
        MemoryRegion::from_valid_bounds(u64::from(self.start), u64::from(self.end))
    }
}

/// Reset vectors and boot code.
pub const BOOT_ROM: DumpPreset = DumpPreset {
    name: "bootrom",
    start: 0x0000_0000,
    end: 0x0010_0000,
    file_name: "mcf54415_bootrom.bin",
};

/// The first megabyte of the external flash, which holds the main OS image.
pub const FLASH: DumpPreset = DumpPreset {
    name: "flash",
    start: 0x4000_0000,
    end: 0x4010_0000,
    file_name: "mcf54415_flash.bin",
};

/// Runtime data.
pub const SRAM: DumpPreset = DumpPreset {
    name: "sram",
    start: 0x2000_0000,
    end: 0x2002_0000,
    file_name: "mcf54415_sram.bin",
};

/// A preset name as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetSelection {
    One(DumpPreset),
    All,
}

impl PresetSelection {
    /// The presets to dump, in order.
    pub fn presets(self) -> Vec<DumpPreset> {
        match self {
            PresetSelection::One(preset) => vec![preset],
            PresetSelection::All => vec![BOOT_ROM, FLASH, SRAM],
        }
    }
}

impl FromStr for PresetSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &s.to_ascii_lowercase()[..] {
            "bootrom" => Ok(PresetSelection::One(BOOT_ROM)),
            "flash" => Ok(PresetSelection::One(FLASH)),
            "sram" => Ok(PresetSelection::One(SRAM)),
            "all" => Ok(PresetSelection::All),
            _ => Err(Error::UnknownRegion(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_is_sorted_and_disjoint() {
        for pair in MCF54415.windows(2) {
            assert!(pair[0].last < pair[1].start);
        }
        assert_eq!(MCF54415.last().unwrap().region().end(), 1 << 32);
    }

    #[test]
    fn presets_lie_inside_the_map() {
        for preset in PresetSelection::All.presets() {
            let region = preset.region();
            assert!(MCF54415
                .iter()
                .any(|entry| entry.region().contains(u64::from(preset.start))
                    && u64::from(entry.last) + 1 >= region.end()));
        }
    }

    #[test]
    fn parse_presets() {
        assert_eq!("Flash".parse::<PresetSelection>().unwrap(), PresetSelection::One(FLASH));
        assert_eq!("all".parse::<PresetSelection>().unwrap().presets().len(), 3);
        assert!(matches!(
            "eeprom".parse::<PresetSelection>(),
            Err(Error::UnknownRegion(_))
        ));
    }

    #[test]
    fn sizes() {
        assert_eq!(MCF54415[0].size(), 1024 * 1024);
        assert_eq!(SRAM.region().size(), 128 * 1024);
    }
}
