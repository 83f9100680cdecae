use crate::clock::BitClock;
use crate::config::SyncConfig;
use crate::pins::{Pin, PinError, PinSignal};
use crate::session::SessionState;

/// One poll of DSO during the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncAttempt {
    /// Zero based attempt number.
    pub attempt: u32,
    /// The sampled DSO level.
    pub level: bool,
}

/// Runs the synchronization handshake.
///
/// DSI is held low for a fixed number of kick cycles, then DSO is polled with
/// one extra clock cycle between polls until it reads high or the attempt budget
/// runs out. This is the only retry loop of the protocol.
#[derive(Debug, Clone, Copy)]
pub struct SyncEngine {
    config: SyncConfig,
}

impl SyncEngine {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Run the handshake without observing individual attempts.
    pub fn run<P: PinSignal>(&self, clock: &mut BitClock<P>) -> Result<SessionState, PinError> {
        self.run_with(clock, |_| {})
    }

    /// Run the handshake, calling `observer` once per DSO poll.
    pub fn run_with<P: PinSignal>(
        &self,
        clock: &mut BitClock<P>,
        mut observer: impl FnMut(SyncAttempt),
    ) -> Result<SessionState, PinError> {
        clock.pins().set_level(Pin::DataOut, false)?;
        for _ in 0..self.config.kick_cycles {
            clock.cycle()?;
        }

        for attempt in 0..self.config.attempts {
            let level = clock.pins().level(Pin::DataIn)?;
            observer(SyncAttempt { attempt, level });

            if level {
                tracing::debug!("BDM sync achieved after {} attempts", attempt + 1);
                return Ok(SessionState::Connected);
            }
            clock.cycle()?;
        }

        tracing::debug!(
            "BDM sync failed, DSO stayed low for {} attempts",
            self.config.attempts
        );
        Ok(SessionState::Disconnected)
    }
}
