use crate::clock::{pause, BitClock};
use crate::command::{Command, CommandCodec, WORD_BITS};
use crate::config::BdmConfig;
use crate::error::Error;
use crate::pins::{Pin, PinError, PinSignal};
use crate::region::{MemoryRegion, ReadErrorPolicy};
use crate::registers::RegisterId;
use crate::sync::{SyncAttempt, SyncEngine};

/// Connection state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No handshake has succeeded since the last reset or failure.
    #[default]
    Disconnected,
    /// The target answered the synchronization handshake.
    Connected,
}

impl SessionState {
    /// The state after a target reset.
    pub fn after_reset(self) -> SessionState {
        SessionState::Disconnected
    }

    /// The state after a transfer failed part way through a frame.
    pub fn after_transport_failure(self) -> SessionState {
        SessionState::Disconnected
    }

    pub fn is_connected(self) -> bool {
        self == SessionState::Connected
    }
}

/// An exclusive connection to a single target.
///
/// The session owns the pins and the connection state. All protocol traffic goes
/// through `&mut self`, so frames can never interleave. Memory and register
/// accessors refuse to run unless the session is [`SessionState::Connected`], and
/// any pin failure during a frame drops the session back to
/// [`SessionState::Disconnected`] because the target can no longer be assumed to be
/// in step with the host.
#[derive(Debug)]
pub struct Session<P> {
    clock: BitClock<P>,
    sync: SyncEngine,
    config: BdmConfig,
    state: SessionState,
}

impl<P: PinSignal> Session<P> {
    /// Take ownership of `pins` and drive every output to its idle level: DSI and
    /// DSCLK low, BKPT and RESET released (high).
    pub fn new(mut pins: P, config: BdmConfig) -> Result<Self, Error> {
        pins.set_level(Pin::DataOut, false)?;
        pins.set_level(Pin::Clock, false)?;
        pins.set_level(Pin::Breakpoint, true)?;
        pins.set_level(Pin::Reset, true)?;

        Ok(Self {
            clock: BitClock::new(pins, config.timing),
            sync: SyncEngine::new(config.sync),
            config,
            state: SessionState::Disconnected,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &BdmConfig {
        &self.config
    }

    /// Direct access to the pins, e.g. to report their levels.
    ///
    /// Driving the BDM lines through this handle desynchronizes the target.
    pub fn pins(&mut self) -> &mut P {
        self.clock.pins()
    }

    /// Release the pins.
    pub fn into_pins(self) -> P {
        self.clock.into_pins()
    }

    /// Run the synchronization handshake and return the resulting state.
    ///
    /// A handshake that runs out of attempts is not an error, it leaves the session
    /// [`SessionState::Disconnected`].
    pub fn sync(&mut self) -> Result<SessionState, Error> {
        self.sync_with(|attempt| {
            tracing::trace!("DSO = {}, attempt {}", attempt.level, attempt.attempt)
        })
    }

    /// Like [`Session::sync`], calling `observer` once per DSO poll.
    #[tracing::instrument(skip_all)]
    pub fn sync_with(&mut self, observer: impl FnMut(SyncAttempt)) -> Result<SessionState, Error> {
        match self.sync.run_with(&mut self.clock, observer) {
            Ok(outcome) => {
                self.state = outcome;
                Ok(self.state)
            }
            Err(error) => {
                self.state = self.state.after_transport_failure();
                Err(error.into())
            }
        }
    }

    /// Synchronize, turning an exhausted handshake into [`Error::SyncFailed`].
    pub fn connect(&mut self) -> Result<(), Error> {
        match self.sync()? {
            SessionState::Connected => Ok(()),
            SessionState::Disconnected => Err(Error::SyncFailed {
                attempts: self.config.sync.attempts,
            }),
        }
    }

    /// Reset the target, request debug mode and synchronize.
    pub fn init(&mut self) -> Result<(), Error> {
        self.reset_target()?;
        self.enter_debug_mode()?;
        self.connect()
    }

    /// Pulse RESET low, then give the target time to restart.
    ///
    /// The session is disconnected afterwards, whether or not the pulse succeeded.
    #[tracing::instrument(skip_all)]
    pub fn reset_target(&mut self) -> Result<(), Error> {
        tracing::debug!("Resetting target");
        self.state = self.state.after_reset();

        let timing = self.config.timing;
        let pins = self.clock.pins();
        pins.set_level(Pin::Reset, false)?;
        pause(timing.reset_hold());
        pins.set_level(Pin::Reset, true)?;
        pause(timing.reset_recovery());

        Ok(())
    }

    /// Pulse BKPT low to request debug mode. Does not change the session state.
    #[tracing::instrument(skip_all)]
    pub fn enter_debug_mode(&mut self) -> Result<(), Error> {
        tracing::debug!("Requesting debug mode");

        let hold = self.config.timing.breakpoint_hold();
        let pins = self.clock.pins();
        pins.set_level(Pin::Breakpoint, false)?;
        pause(hold);
        pins.set_level(Pin::Breakpoint, true)?;

        Ok(())
    }

    /// Read the longword at `address`.
    pub fn read_word_32(&mut self, address: u32) -> Result<u32, Error> {
        let value = self.transfer(|codec| {
            codec.send_command(Command::READ_MEMORY_LONG)?;
            codec.send_operand(address, WORD_BITS)?;
            codec.receive_response(WORD_BITS)
        })?;

        tracing::trace!("read_word_32 {:#010x} = {:#010x}", address, value);
        Ok(value)
    }

    /// Write the longword `value` to `address`.
    ///
    /// The target does not acknowledge writes.
    pub fn write_word_32(&mut self, address: u32, value: u32) -> Result<(), Error> {
        tracing::trace!("write_word_32 {:#010x} = {:#010x}", address, value);

        self.transfer(|codec| {
            codec.send_command(Command::WRITE_MEMORY_LONG)?;
            codec.send_operand(address, WORD_BITS)?;
            codec.send_operand(value, WORD_BITS)
        })
    }

    /// Read `count` consecutive longwords starting at `address`.
    pub fn read_words(&mut self, address: u32, count: usize) -> Result<Vec<u32>, Error> {
        let mut words = Vec::with_capacity(count);
        let mut address = address;
        for _ in 0..count {
            words.push(self.read_word_32(address)?);
            address = address.wrapping_add(4);
        }
        Ok(words)
    }

    /// Read a general purpose register.
    pub fn read_register(&mut self, register: RegisterId) -> Result<u32, Error> {
        let command = register.read_command();
        tracing::debug!("Reading {} with command {}", register, command);

        let value = self.transfer(|codec| {
            codec.send_command(command)?;
            codec.receive_response(WORD_BITS)
        })?;

        tracing::debug!("{} = {:#010x}", register, value);
        Ok(value)
    }

    /// Write a general purpose register.
    pub fn write_register(&mut self, register: RegisterId, value: u32) -> Result<(), Error> {
        let command = register.write_command();
        tracing::debug!("Writing {:#010x} to {} with command {}", value, register, command);

        self.transfer(|codec| {
            codec.send_command(command)?;
            codec.send_operand(value, WORD_BITS)
        })
    }

    /// Read all 16 general purpose registers, D0-D7 then A0-A7.
    pub fn read_all_registers(&mut self) -> Result<Vec<(RegisterId, u32)>, Error> {
        RegisterId::all()
            .map(|register| self.read_register(register).map(|value| (register, value)))
            .collect()
    }

    /// Read the bytes of `region`.
    ///
    /// Words are read in ascending order and stored big-endian, and the result is
    /// truncated to the size of the region. See [`Session::read_region_with`].
    pub fn read_region(
        &mut self,
        region: &MemoryRegion,
        policy: ReadErrorPolicy,
    ) -> Result<Vec<u8>, Error> {
        self.read_region_with(region, policy, |_, _| {})
    }

    /// Read the bytes of `region`, calling `progress` with the number of bytes read
    /// so far and the region size after each word.
    ///
    /// With [`ReadErrorPolicy::Substitute`], a word that fails is replaced by the
    /// sentinel and the handshake is run again before the next word. If the target
    /// does not answer it, the read stops with the error of the failed word.
    #[tracing::instrument(skip(self, progress), fields(start = region.start(), end = region.end()))]
    pub fn read_region_with(
        &mut self,
        region: &MemoryRegion,
        policy: ReadErrorPolicy,
        mut progress: impl FnMut(u64, u64),
    ) -> Result<Vec<u8>, Error> {
        // Nothing may go on the wire unless the whole region can be read.
        self.ensure_connected()?;

        let size = region.size();
        let mut data = Vec::with_capacity(usize::try_from(region.word_count() * 4).unwrap_or(0));

        for address in region.word_addresses() {
            let word = match (self.read_word_32(address), policy) {
                (Ok(word), _) => word,
                (Err(error), ReadErrorPolicy::Abort) => return Err(error),
                (Err(error), ReadErrorPolicy::Substitute(sentinel)) => {
                    tracing::warn!("Error reading at {:#010x}: {}", address, error);
                    // The failed frame left the target out of step with the host.
                    if !self.sync()?.is_connected() {
                        return Err(error);
                    }
                    sentinel
                }
            };
            data.extend_from_slice(&word.to_be_bytes());
            progress((data.len() as u64).min(size), size);
        }

        // `size` is at most 2^32 and `data` is at most three bytes longer.
        data.truncate(size as usize);
        Ok(data)
    }

    fn ensure_connected(&self) -> Result<(), Error> {
        if self.state.is_connected() {
            Ok(())
        } else {
            Err(Error::NotConnected)
        }
    }

    /// Run one complete frame. A failure part way through disconnects the session.
    fn transfer<T>(
        &mut self,
        frame: impl FnOnce(&mut CommandCodec<'_, P>) -> Result<T, PinError>,
    ) -> Result<T, Error> {
        self.ensure_connected()?;

        let result = frame(&mut CommandCodec::new(&mut self.clock));
        result.map_err(|error| {
            tracing::error!("BDM transfer failed: {}", error);
            self.state = self.state.after_transport_failure();
            Error::from(error)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::opcodes;
    use crate::test::{MockPins, PinOperation};
    use pretty_assertions::assert_eq;

    fn bits(value: u32, width: u32) -> Vec<bool> {
        (0..width).rev().map(|bit| (value >> bit) & 1 == 1).collect()
    }

    /// A connected session with the recorded setup and handshake traffic cleared.
    fn connected() -> Session<MockPins> {
        let mut pins = MockPins::new();
        pins.push_data_in([true]);
        let mut session = Session::new(pins, BdmConfig::immediate()).unwrap();
        session.connect().unwrap();
        session.pins().clear_operations();
        session
    }

    #[test]
    fn new_session_idles_the_lines() {
        let mut session = Session::new(MockPins::new(), BdmConfig::immediate()).unwrap();

        assert_eq!(session.state(), SessionState::Disconnected);
        let pins = session.pins();
        assert!(!pins.driven_level(Pin::DataOut));
        assert!(!pins.driven_level(Pin::Clock));
        assert!(pins.driven_level(Pin::Breakpoint));
        assert!(pins.driven_level(Pin::Reset));
    }

    #[test]
    fn failed_sync_disconnects() {
        let mut session = connected();
        session.pins().push_data_in([false; 1000]);

        assert_eq!(session.sync().unwrap(), SessionState::Disconnected);
        assert!(matches!(
            session.connect(),
            Err(Error::SyncFailed { attempts: 1000 })
        ));
    }

    #[test]
    fn read_word_frame() {
        let mut session = connected();
        session.pins().push_word(0xCAFE_F00D, 32);

        assert_eq!(session.read_word_32(0x2000_0010).unwrap(), 0xCAFE_F00D);

        let pins = session.into_pins();
        let mut expected = bits(u32::from(opcodes::READ_MEMORY_LONG), 16);
        expected.extend(bits(0x2000_0010, 32));
        // The response clocks keep DSI at the last address bit.
        expected.extend(vec![false; 32]);
        assert_eq!(pins.clocked_out_bits(), expected);
    }

    #[test]
    fn write_word_frame() {
        let mut session = connected();

        session.write_word_32(0x4000_0000, 0x1234_5678).unwrap();

        let pins = session.into_pins();
        let mut expected = bits(u32::from(opcodes::WRITE_MEMORY_LONG), 16);
        expected.extend(bits(0x4000_0000, 32));
        expected.extend(bits(0x1234_5678, 32));
        assert_eq!(pins.clocked_out_bits(), expected);
        assert!(!pins
            .operations()
            .iter()
            .any(|op| matches!(op, PinOperation::Read(..))));
    }

    #[test]
    fn register_frames() {
        let mut session = connected();
        let a7 = RegisterId::address(7).unwrap();
        session.pins().push_word(0xFF00_0000, 32);

        assert_eq!(session.read_register(a7).unwrap(), 0xFF00_0000);
        session.pins().clear_operations();
        session.write_register(a7, 0x0000_1000).unwrap();

        let mut expected = bits(0x248F, 16);
        expected.extend(bits(0x0000_1000, 32));
        assert_eq!(session.into_pins().clocked_out_bits(), expected);
    }

    #[test]
    fn accessors_refuse_while_disconnected() {
        let mut session = Session::new(MockPins::new(), BdmConfig::immediate()).unwrap();
        session.pins().clear_operations();
        let d0 = RegisterId::data(0).unwrap();
        let region = MemoryRegion::new(0, 8).unwrap();

        assert!(matches!(session.read_word_32(0), Err(Error::NotConnected)));
        assert!(matches!(session.write_word_32(0, 1), Err(Error::NotConnected)));
        assert!(matches!(session.read_register(d0), Err(Error::NotConnected)));
        assert!(matches!(session.write_register(d0, 1), Err(Error::NotConnected)));
        assert!(matches!(
            session.read_region(&region, ReadErrorPolicy::Substitute(0)),
            Err(Error::NotConnected)
        ));
        assert!(session.pins().operations().is_empty());
    }

    #[test]
    fn reset_disconnects() {
        let mut session = connected();

        session.reset_target().unwrap();

        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(
            session.pins().operations(),
            &[
                PinOperation::Set(Pin::Reset, false),
                PinOperation::Set(Pin::Reset, true),
            ]
        );
    }

    #[test]
    fn debug_request_keeps_state() {
        let mut session = connected();

        session.enter_debug_mode().unwrap();

        assert_eq!(session.state(), SessionState::Connected);
        assert_eq!(
            session.pins().operations(),
            &[
                PinOperation::Set(Pin::Breakpoint, false),
                PinOperation::Set(Pin::Breakpoint, true),
            ]
        );
    }

    #[test]
    fn transport_failure_disconnects() {
        let mut session = connected();
        session.pins().fail_after(10);

        assert!(matches!(session.read_word_32(0), Err(Error::Pin(_))));
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[test]
    fn region_is_big_endian_and_truncated() {
        let mut session = connected();
        session.pins().push_word(0x0102_0304, 32);
        session.pins().push_word(0x0506_0708, 32);
        let region = MemoryRegion::new(0x100, 0x106).unwrap();
        let mut reports = Vec::new();

        let data = session
            .read_region_with(&region, ReadErrorPolicy::Abort, |done, total| {
                reports.push((done, total))
            })
            .unwrap();

        assert_eq!(data, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(reports, vec![(4, 6), (6, 6)]);
    }

    /// Pin accesses of one complete memory read frame: three per bit.
    const READ_FRAME_ACCESSES: usize = 16 * 3 + 32 * 3 + 32 * 3;

    #[test]
    fn region_substitutes_sentinel_and_resynchronizes() {
        let mut session = connected();
        session.pins().push_word(0xAABB_CCDD, 32);
        // Handshake after the glitch, then the third word.
        session.pins().push_data_in([true]);
        session.pins().push_word(0x1122_3344, 32);
        // A single failure a few bits into the second frame.
        session.pins().glitch_after(READ_FRAME_ACCESSES + 5);
        let region = MemoryRegion::new(0, 12).unwrap();

        let data = session
            .read_region(&region, ReadErrorPolicy::Substitute(0))
            .unwrap();

        assert_eq!(
            data,
            [0xAA, 0xBB, 0xCC, 0xDD, 0, 0, 0, 0, 0x11, 0x22, 0x33, 0x44]
        );
        assert_eq!(session.state(), SessionState::Connected);
    }

    #[test]
    fn region_stops_when_target_is_lost() {
        let mut session = connected();
        session.pins().push_word(0xAABB_CCDD, 32);
        // DSO stays low, so the handshake after the glitch fails.
        session.pins().glitch_after(READ_FRAME_ACCESSES + 5);
        let region = MemoryRegion::new(0, 4096).unwrap();

        let result = session.read_region(&region, ReadErrorPolicy::Substitute(0));

        assert!(matches!(result, Err(Error::Pin(PinError::Unavailable(_)))));
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[test]
    fn region_stops_when_pins_keep_failing() {
        let mut session = connected();
        session.pins().push_word(0xAABB_CCDD, 32);
        session.pins().fail_after(READ_FRAME_ACCESSES + 5);
        let region = MemoryRegion::new(0, 4096).unwrap();

        let result = session.read_region(&region, ReadErrorPolicy::Substitute(0));

        assert!(matches!(result, Err(Error::Pin(_))));
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[test]
    fn region_abort_propagates() {
        let mut session = connected();
        session.pins().fail_after(0);
        let region = MemoryRegion::new(0, 8).unwrap();

        assert!(matches!(
            session.read_region(&region, ReadErrorPolicy::Abort),
            Err(Error::Pin(_))
        ));
    }

    #[test]
    fn all_registers_in_unified_order() {
        let mut session = connected();
        for value in 0..16 {
            session.pins().push_word(value, 32);
        }

        let registers = session.read_all_registers().unwrap();

        assert_eq!(registers.len(), 16);
        for (index, (register, value)) in registers.into_iter().enumerate() {
            assert_eq!(usize::from(register.id()), index);
            assert_eq!(value as usize, index);
        }
    }
}
