use std::fmt;
use std::str::FromStr;

use crate::command::{opcodes, Command};
use crate::error::Error;

/// The two banks of general purpose registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterBank {
    /// D0-D7
    Data,
    /// A0-A7
    Address,
}

/// One of the 16 general purpose registers.
///
/// In the unified numbering, ids 0-7 are D0-D7 and ids 8-15 are A0-A7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegisterId(u8);

impl RegisterId {
    /// Number of general purpose registers.
    pub const COUNT: u8 = 16;

    /// Create a register id from the unified numbering. Returns `None` for ids above 15.
    pub const fn new(id: u8) -> Option<Self> {
        if id < Self::COUNT {
            Some(RegisterId(id))
        } else {
            None
        }
    }

    /// Data register `Dn`. Returns `None` for `n` above 7.
    pub const fn data(n: u8) -> Option<Self> {
        if n < 8 {
            Some(RegisterId(n))
        } else {
            None
        }
    }

    /// Address register `An`. Returns `None` for `n` above 7.
    pub const fn address(n: u8) -> Option<Self> {
        if n < 8 {
            Some(RegisterId(n + 8))
        } else {
            None
        }
    }

    /// All 16 registers, D0-D7 followed by A0-A7.
    pub fn all() -> impl Iterator<Item = RegisterId> {
        (0..Self::COUNT).map(RegisterId)
    }

    /// The unified id, 0-15.
    pub const fn id(self) -> u8 {
        self.0
    }

    pub const fn bank(self) -> RegisterBank {
        if self.0 < 8 {
            RegisterBank::Data
        } else {
            RegisterBank::Address
        }
    }

    /// The register number within its bank, 0-7.
    pub const fn number(self) -> u8 {
        self.0 & 0x7
    }

    pub fn read_command(self) -> Command {
        let base = match self.bank() {
            RegisterBank::Data => opcodes::READ_DATA_REGISTER,
            RegisterBank::Address => opcodes::READ_ADDRESS_REGISTER,
        };
        Command::new(base | u16::from(self.number()))
    }

    pub fn write_command(self) -> Command {
        let base = match self.bank() {
            RegisterBank::Data => opcodes::WRITE_DATA_REGISTER,
            RegisterBank::Address => opcodes::WRITE_ADDRESS_REGISTER,
        };
        Command::new(base | u16::from(self.number()))
    }

    /// Recover the register addressed by a register read or write command.
    pub fn from_command(command: Command) -> Option<Self> {
        let opcode = command.opcode();
        let number = (opcode & 0x7) as u8;

        match opcode & !0x7 {
            opcodes::READ_DATA_REGISTER | opcodes::WRITE_DATA_REGISTER => Self::data(number),
            opcodes::READ_ADDRESS_REGISTER | opcodes::WRITE_ADDRESS_REGISTER => {
                Self::address(number)
            }
            _ => None,
        }
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.bank() {
            RegisterBank::Data => 'D',
            RegisterBank::Address => 'A',
        };
        write!(f, "{}{}", prefix, self.number())
    }
}

impl FromStr for RegisterId {
    type Err = Error;

    /// Parse `d0`-`d7` or `a0`-`a7`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidRegister(s.to_owned());

        let mut chars = s.chars();
        let (Some(bank), Some(digit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let number = digit
            .to_digit(10)
            .and_then(|n| u8::try_from(n).ok())
            .ok_or_else(invalid)?;

        match bank.to_ascii_lowercase() {
            'd' => Self::data(number),
            'a' => Self::address(number),
            _ => None,
        }
        .ok_or_else(invalid)
    }
}
