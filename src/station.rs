//! Command station: the single writer between the codecs and the track.
//!
//! [`CommandStation`] owns one [`Transport`] and one delay source for its
//! whole lifetime. Every packet goes out through [`send`](CommandStation::send),
//! which renders it, writes it `repeat_count` times and pauses for the
//! configured inter-packet delay after each write. Encoders never sleep.
//!
//! # Example
//!
//! ```rust
//! use rs_dcc::{
//!     hal::{MockDelay, MockTransport},
//!     Accessory, CommandStation, Direction, Loco, SpeedStepMode, StationConfig,
//! };
//!
//! let mut station = CommandStation::new(
//!     MockTransport::new(),
//!     MockDelay::new(),
//!     StationConfig::default(),
//! );
//!
//! station.reset_all().unwrap();
//!
//! let mut scotsman = Loco::new(3, SpeedStepMode::Steps128).unwrap();
//! let mut signal = Accessory::with_states(42, &["green", "red"]).unwrap();
//!
//! station.set_accessory_named(&mut signal, "red").unwrap();
//! station.set_speed(&mut scotsman, 20, Direction::Forward).unwrap();
//! station.stop_all().unwrap();
//!
//! let (transport, _delay) = station.close().unwrap();
//! assert_eq!(transport.writes.len(), 4);
//! assert!(transport.closed);
//! ```
//!
//! # Thread Safety
//!
//! The station is not thread-safe. DCC frames share one wire and must not
//! interleave, so callers on several threads wrap it in
//! `Arc<Mutex<CommandStation<..>>>` or funnel commands to one owner.

use log::{debug, info, warn};

use crate::accessory::{Accessory, State};
use crate::broadcast::Broadcast;
use crate::config::StationConfig;
use crate::error::{DccError, StationError};
use crate::loco::Loco;
use crate::packet::Packet;
use crate::speed::Direction;
use crate::traits::{DelayNs, Transport};

/// Result of a station operation.
pub type StationResult<T, E> = core::result::Result<T, StationError<E>>;

/// Owns the transport and serializes packet transmission.
///
/// # Type Parameters
///
/// - `T`: the byte sink ([`Transport`] trait)
/// - `D`: the inter-packet delay source ([`DelayNs`])
pub struct CommandStation<T: Transport, D: DelayNs> {
    transport: T,
    delay: D,
    config: StationConfig,
    reset_epoch: u32,
    packets_sent: u64,
}

impl<T: Transport, D: DelayNs> CommandStation<T, D> {
    /// Create a station around an open transport.
    pub fn new(transport: T, delay: D, config: StationConfig) -> Self {
        Self {
            transport,
            delay,
            config,
            reset_epoch: 0,
            packets_sent: 0,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    /// The transport, for inspection.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The delay source, for inspection.
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Number of broadcast resets sent so far.
    pub fn reset_epoch(&self) -> u32 {
        self.reset_epoch
    }

    /// Total frames written, repeats included.
    pub fn packets_sent(&self) -> u64 {
        self.packets_sent
    }

    /// Write a packet once, then wait the inter-packet delay.
    ///
    /// Transport errors are returned as-is; nothing is retried.
    pub fn send_once(&mut self, packet: &Packet) -> Result<(), T::Error> {
        let wire = packet.to_wire(self.config.wire_format, self.config.preamble_bits as usize);
        debug!("tx {:?}", packet);
        self.transport.write(&wire)?;
        self.packets_sent += 1;
        self.delay.delay_ms(self.config.inter_packet_delay_ms);
        Ok(())
    }

    /// Write a packet `repeat_count` times.
    pub fn send(&mut self, packet: &Packet) -> StationResult<(), T::Error> {
        for _ in 0..self.config.repeat_count.max(1) {
            self.send_once(packet).map_err(StationError::Transport)?;
        }
        Ok(())
    }

    /// Send one of the fixed broadcast packets.
    pub fn broadcast(&mut self, kind: Broadcast) -> StationResult<(), T::Error> {
        info!("broadcast {:?}", kind);
        self.send(&kind.packet())?;
        if kind.resets_decoders() {
            self.reset_epoch = self.reset_epoch.wrapping_add(1);
        }
        Ok(())
    }

    /// Erase the volatile memory of every decoder.
    ///
    /// Loco function states held in memory are not cleared; see
    /// [`needs_resync`](Self::needs_resync).
    pub fn reset_all(&mut self) -> StationResult<(), T::Error> {
        self.broadcast(Broadcast::Reset)
    }

    /// Send the idle packet.
    pub fn idle_all(&mut self) -> StationResult<(), T::Error> {
        self.broadcast(Broadcast::Idle)
    }

    /// Stop every locomotive on the track.
    pub fn stop_all(&mut self) -> StationResult<(), T::Error> {
        self.broadcast(Broadcast::StopAll)
    }

    /// Encode and send a speed/direction command.
    pub fn set_speed(
        &mut self,
        loco: &mut Loco,
        speed: i16,
        direction: Direction,
    ) -> StationResult<(), T::Error> {
        let address = loco.address().value() as u16;
        let before = loco.clone();
        let packet = loco
            .speed_and_direction(speed, direction)
            .map_err(|e| rejected(e, address))?;
        self.send_loco(loco, before, &packet)
    }

    /// Emergency stop one locomotive.
    pub fn emergency_stop(&mut self, loco: &mut Loco) -> StationResult<(), T::Error> {
        let address = loco.address().value() as u16;
        let before = loco.clone();
        let packet = loco.emergency_stop().map_err(|e| rejected(e, address))?;
        self.send_loco(loco, before, &packet)
    }

    /// Encode and send a function change (only the affected group).
    pub fn set_function(
        &mut self,
        loco: &mut Loco,
        index: usize,
        on: bool,
    ) -> StationResult<(), T::Error> {
        let address = loco.address().value() as u16;
        let before = loco.clone();
        let packet = loco
            .set_function(index, on)
            .map_err(|e| rejected(e, address))?;
        self.send_loco(loco, before, &packet)
    }

    /// Send a loco command. On transport failure `loco` is put back to
    /// `before`, so the model only holds commands the decoder was sent.
    ///
    /// A loco that was in sync before the command stays in sync after it:
    /// one group packet cannot make the decoder diverge.
    fn send_loco(
        &mut self,
        loco: &mut Loco,
        before: Loco,
        packet: &Packet,
    ) -> StationResult<(), T::Error> {
        if let Err(e) = self.send(packet) {
            *loco = before;
            return Err(e);
        }
        if !self.needs_resync(&before) {
            loco.mark_synced(self.reset_epoch);
        }
        Ok(())
    }

    /// Returns true if the decoder may hold different function states than
    /// `loco`: at least one function is on in memory and either a reset went
    /// out since the loco was last in sync, or those functions were never
    /// sent through this station.
    pub fn needs_resync(&self, loco: &Loco) -> bool {
        loco.functions().any_on() && loco.synced_epoch() != Some(self.reset_epoch)
    }

    /// Re-send every function group of `loco` and record it as in sync.
    pub fn resync(&mut self, loco: &mut Loco) -> StationResult<(), T::Error> {
        info!("resync loco {}", loco.address().value());
        for packet in loco.function_packets()? {
            self.send(&packet)?;
        }
        loco.mark_synced(self.reset_epoch);
        Ok(())
    }

    /// Apply an accessory state and send the resulting packet.
    ///
    /// An unknown state fails with [`DccError::StateNotAvailable`] and the
    /// accessory keeps its previous state. So does a transport failure.
    pub fn set_accessory(
        &mut self,
        accessory: &mut Accessory,
        state: State,
    ) -> StationResult<(), T::Error> {
        let address = accessory.address().value();
        let before = accessory.clone();
        let packet = accessory
            .set_state(state)
            .map_err(|e| rejected(e, address))?;
        self.send(&packet).map_err(|e| {
            *accessory = before;
            e
        })
    }

    /// Apply an accessory state by name and send the resulting packet.
    pub fn set_accessory_named(
        &mut self,
        accessory: &mut Accessory,
        name: &str,
    ) -> StationResult<(), T::Error> {
        let address = accessory.address().value();
        let before = accessory.clone();
        let packet = accessory
            .set_named(name)
            .map_err(|e| rejected(e, address))?;
        self.send(&packet).map_err(|e| {
            *accessory = before;
            e
        })
    }

    /// Send an accessory's current state without changing it.
    pub fn sync_accessory(&mut self, accessory: &Accessory) -> StationResult<(), T::Error> {
        self.send(&accessory.packet()?)
    }

    /// Close the transport and hand back the owned resources.
    pub fn close(mut self) -> StationResult<(T, D), T::Error> {
        info!("closing transport after {} packets", self.packets_sent);
        self.transport.close().map_err(StationError::Transport)?;
        Ok((self.transport, self.delay))
    }
}

fn rejected(err: DccError, address: u16) -> DccError {
    warn!("rejected command for address {}: {}", address, err);
    err
}
