//! BDM command framing.
//!
//! A frame is a 16-bit opcode followed by zero or more fixed-width operands, all
//! sent MSB first. Responses are read back MSB first with the same clock. The
//! protocol has no framing markers besides bit position, so a frame that is
//! interrupted leaves the target desynchronized.

use std::fmt;

use crate::clock::BitClock;
use crate::pins::{PinError, PinSignal};

/// Width of an opcode on the wire.
pub const OPCODE_BITS: u32 = 16;
/// Width of address, data and register value operands.
pub const WORD_BITS: u32 = 32;

/// Opcode values of the commands this crate issues.
///
/// These are the wire contract with the target and must not be changed.
pub mod opcodes {
    /// Read a longword from memory.
    pub const READ_MEMORY_LONG: u16 = 0x2190;
    /// Write a longword to memory.
    pub const WRITE_MEMORY_LONG: u16 = 0x2080;
    /// Read a data register. The register number is or'ed into the low bits.
    pub const READ_DATA_REGISTER: u16 = 0x2580;
    /// Read an address register. The register number is or'ed into the low bits.
    pub const READ_ADDRESS_REGISTER: u16 = 0x2588;
    /// Write a data register. The register number is or'ed into the low bits.
    pub const WRITE_DATA_REGISTER: u16 = 0x2480;
    /// Write an address register. The register number is or'ed into the low bits.
    pub const WRITE_ADDRESS_REGISTER: u16 = 0x2488;
}

/// A 16-bit BDM opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Command(u16);

impl Command {
    pub const READ_MEMORY_LONG: Command = Command(opcodes::READ_MEMORY_LONG);
    pub const WRITE_MEMORY_LONG: Command = Command(opcodes::WRITE_MEMORY_LONG);

    pub const fn new(opcode: u16) -> Self {
        Command(opcode)
    }

    pub const fn opcode(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Serializes frames onto, and responses off, a [`BitClock`].
#[derive(Debug)]
pub struct CommandCodec<'clock, P> {
    clock: &'clock mut BitClock<P>,
}

impl<'clock, P: PinSignal> CommandCodec<'clock, P> {
    pub fn new(clock: &'clock mut BitClock<P>) -> Self {
        Self { clock }
    }

    /// Send the 16 opcode bits of `command`, MSB first.
    pub fn send_command(&mut self, command: Command) -> Result<(), PinError> {
        tracing::trace!("sending command {}", command);
        self.send_operand(u32::from(command.opcode()), OPCODE_BITS)
    }

    /// Send the low `width` bits of `value`, MSB first.
    ///
    /// # Panics
    ///
    /// Panics if `width` is larger than 32.
    pub fn send_operand(&mut self, value: u32, width: u32) -> Result<(), PinError> {
        assert!(width <= u32::BITS, "operand width {width} exceeds 32 bits");

        for bit in (0..width).rev() {
            self.clock.write_bit((value >> bit) & 1 == 1)?;
        }
        Ok(())
    }

    /// Read `width` bits and assemble them into an integer, the first bit read
    /// becoming the most significant one.
    ///
    /// # Panics
    ///
    /// Panics if `width` is larger than 32.
    pub fn receive_response(&mut self, width: u32) -> Result<u32, PinError> {
        assert!(width <= u32::BITS, "response width {width} exceeds 32 bits");

        let mut value = 0u64;
        for _ in 0..width {
            value = (value << 1) | u64::from(self.clock.read_bit()?);
        }
        // At most 32 bits were shifted in.
        Ok(value as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timing;
    use crate::test::{Loopback, MockPins};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn bits(value: u32, width: u32) -> Vec<bool> {
        (0..width).rev().map(|bit| (value >> bit) & 1 == 1).collect()
    }

    #[test]
    fn command_is_sent_msb_first() {
        let mut clock = BitClock::new(MockPins::new(), Timing::immediate());

        CommandCodec::new(&mut clock)
            .send_command(Command::READ_MEMORY_LONG)
            .unwrap();

        let pins = clock.into_pins();
        assert_eq!(pins.clock_cycles(), 16);
        assert_eq!(pins.clocked_out_bits(), bits(0x2190, 16));
    }

    #[test]
    fn operand_width_is_honoured() {
        let mut clock = BitClock::new(MockPins::new(), Timing::immediate());

        CommandCodec::new(&mut clock)
            .send_operand(0b1011_0110, 5)
            .unwrap();

        assert_eq!(
            clock.into_pins().clocked_out_bits(),
            vec![true, false, true, true, false]
        );
    }

    #[test]
    fn response_first_bit_is_msb() {
        let mut pins = MockPins::new();
        pins.push_data_in([true, false, false, true]);
        let mut clock = BitClock::new(pins, Timing::immediate());

        let value = CommandCodec::new(&mut clock).receive_response(4).unwrap();

        assert_eq!(value, 0b1001);
    }

    #[test]
    fn zero_width_response_reads_nothing() {
        let mut clock = BitClock::new(MockPins::new(), Timing::immediate());

        let value = CommandCodec::new(&mut clock).receive_response(0).unwrap();

        assert_eq!(value, 0);
        assert!(clock.into_pins().operations().is_empty());
    }

    #[test_case(0x0000_0000, 32; "all zeros")]
    #[test_case(0xFFFF_FFFF, 32; "all ones")]
    #[test_case(0xDEAD_BEEF, 32; "word")]
    #[test_case(0x8000_0001, 32; "edges")]
    #[test_case(opcodes::READ_MEMORY_LONG as u32, 16; "read memory opcode")]
    #[test_case(opcodes::WRITE_ADDRESS_REGISTER as u32 | 7, 16; "write a7 opcode")]
    fn loopback_round_trip(value: u32, width: u32) {
        let mut clock = BitClock::new(Loopback::new(), Timing::immediate());
        let mut codec = CommandCodec::new(&mut clock);

        codec.send_operand(value, width).unwrap();
        let echoed = codec.receive_response(width).unwrap();

        assert_eq!(echoed, value);
        assert_eq!(clock.into_pins().queued(), 0);
    }

    #[test]
    fn loopback_round_trips_command_then_operand() {
        let mut clock = BitClock::new(Loopback::new(), Timing::immediate());
        let mut codec = CommandCodec::new(&mut clock);

        codec.send_command(Command::WRITE_MEMORY_LONG).unwrap();
        codec.send_operand(0x4000_0000, WORD_BITS).unwrap();

        assert_eq!(
            codec.receive_response(OPCODE_BITS).unwrap(),
            u32::from(opcodes::WRITE_MEMORY_LONG)
        );
        assert_eq!(codec.receive_response(WORD_BITS).unwrap(), 0x4000_0000);
    }

    #[test]
    #[should_panic]
    fn oversized_operand_panics() {
        let mut clock = BitClock::new(MockPins::new(), Timing::immediate());
        let _ = CommandCodec::new(&mut clock).send_operand(0, 33);
    }
}
