//! Fixed broadcast packets defined by S-9.2.
//!
//! These are literals, not derived from any locomotive: they bypass the
//! address and speed codecs entirely.

use crate::packet::Packet;

/// Digital decoder reset: every decoder erases its volatile state.
pub const RESET: Packet = Packet::literal([0x00, 0x00, 0x00]);

/// Digital decoder idle packet.
pub const IDLE: Packet = Packet::literal([0xFF, 0x00, 0xFF]);

/// Broadcast stop: every locomotive on the track stops.
pub const STOP_ALL: Packet = Packet::literal([0x00, 0x70, 0x70]);

/// Named broadcast packet kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Broadcast {
    /// [`RESET`].
    Reset,
    /// [`IDLE`].
    Idle,
    /// [`STOP_ALL`].
    StopAll,
}

impl Broadcast {
    /// The literal packet for this broadcast.
    pub const fn packet(&self) -> Packet {
        match self {
            Broadcast::Reset => RESET,
            Broadcast::Idle => IDLE,
            Broadcast::StopAll => STOP_ALL,
        }
    }

    /// Returns true if decoders lose their volatile state on this packet.
    pub const fn resets_decoders(&self) -> bool {
        matches!(self, Broadcast::Reset)
    }

    /// Parse a broadcast name (`reset`, `idle`, `stop`).
    pub fn from_text(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("reset") {
            Some(Broadcast::Reset)
        } else if s.eq_ignore_ascii_case("idle") {
            Some(Broadcast::Idle)
        } else if s.eq_ignore_ascii_case("stop") || s.eq_ignore_ascii_case("stop_all") {
            Some(Broadcast::StopAll)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_bytes() {
        assert_eq!(RESET.as_bytes(), &[0x00, 0x00, 0x00]);
        assert!(RESET.is_valid());
    }

    #[test]
    fn idle_bytes() {
        assert_eq!(IDLE.as_bytes(), &[0xFF, 0x00, 0xFF]);
        assert!(IDLE.is_valid());
    }

    #[test]
    fn stop_all_bytes() {
        assert_eq!(STOP_ALL.as_bytes(), &[0x00, 0x70, 0x70]);
        assert!(STOP_ALL.is_valid());
    }

    #[test]
    fn literals_match_computed_packets() {
        assert_eq!(Packet::new(&[0x00, 0x00]).unwrap(), RESET);
        assert_eq!(Packet::new(&[0xFF, 0x00]).unwrap(), IDLE);
        assert_eq!(Packet::new(&[0x00, 0x70]).unwrap(), STOP_ALL);
    }

    #[test]
    fn only_reset_resets() {
        assert!(Broadcast::Reset.resets_decoders());
        assert!(!Broadcast::Idle.resets_decoders());
        assert!(!Broadcast::StopAll.resets_decoders());
    }

    #[test]
    fn broadcast_from_text() {
        assert_eq!(Broadcast::from_text("RESET"), Some(Broadcast::Reset));
        assert_eq!(Broadcast::from_text(" idle "), Some(Broadcast::Idle));
        assert_eq!(Broadcast::from_text("stop"), Some(Broadcast::StopAll));
        assert_eq!(Broadcast::from_text("halt"), None);
        assert_eq!(Broadcast::StopAll.packet(), STOP_ALL);
    }
}
