//! Error types for packet encoding and transmission.
//!
//! Encoding errors are local and recoverable: the codecs validate every input
//! before a single bit is framed, so a rejected command never reaches the
//! track. Transport errors are carried through [`StationError`] unchanged.

/// Reasons an intent could not be encoded into a DCC packet.
///
/// Every variant is reported to the caller; none of them leaves a
/// partially-built packet behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DccError {
    /// Address does not fit the decoder kind (loco 1..=127, accessory 1..=511).
    InvalidAddress,

    /// Speed value outside the range of the locomotive's step mode.
    InvalidSpeed,

    /// Accessory sub-state outside 0..=7, or more than 8 named states.
    InvalidSubState,

    /// Function index outside F0..=F12.
    FunctionNotAvailable,

    /// Accessory state not present in the configured state set.
    StateNotAvailable,

    /// Data bytes do not fit in a packet.
    PacketTooLong,

    /// Instruction bytes do not match the expected command class.
    MalformedInstruction,
}

impl DccError {
    /// Returns a short, stable identifier for the error.
    ///
    /// ```
    /// use rs_dcc::DccError;
    ///
    /// assert_eq!(DccError::InvalidSpeed.as_str(), "invalid_speed");
    /// ```
    pub const fn as_str(&self) -> &'static str {
        match self {
            DccError::InvalidAddress => "invalid_address",
            DccError::InvalidSpeed => "invalid_speed",
            DccError::InvalidSubState => "invalid_sub_state",
            DccError::FunctionNotAvailable => "function_not_available",
            DccError::StateNotAvailable => "state_not_available",
            DccError::PacketTooLong => "packet_too_long",
            DccError::MalformedInstruction => "malformed_instruction",
        }
    }
}

impl core::fmt::Display for DccError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidAddress => write!(f, "address out of range for decoder kind"),
            Self::InvalidSpeed => write!(f, "speed out of range for step mode"),
            Self::InvalidSubState => write!(f, "accessory sub-state out of range"),
            Self::FunctionNotAvailable => write!(f, "function not available"),
            Self::StateNotAvailable => write!(f, "state not available"),
            Self::PacketTooLong => write!(f, "packet exceeds maximum length"),
            Self::MalformedInstruction => write!(f, "malformed instruction bytes"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DccError {}

/// Convenient result alias for the encoding layer.
pub type Result<T> = core::result::Result<T, DccError>;

/// Error returned by [`CommandStation`](crate::CommandStation) operations.
///
/// `E` is the transport's own error type, propagated without retry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StationError<E> {
    /// The command was rejected before framing.
    Encode(DccError),
    /// The transport failed to write the frame.
    Transport(E),
}

impl<E> From<DccError> for StationError<E> {
    fn from(err: DccError) -> Self {
        StationError::Encode(err)
    }
}

impl<E> StationError<E> {
    /// Returns the encoding error, if this is one.
    pub fn encode_error(&self) -> Option<DccError> {
        match self {
            StationError::Encode(e) => Some(*e),
            StationError::Transport(_) => None,
        }
    }

    /// Returns true if the transport failed.
    pub fn is_transport(&self) -> bool {
        matches!(self, StationError::Transport(_))
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for StationError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Encode(e) => write!(f, "encode error: {}", e),
            Self::Transport(e) => write!(f, "transport error: {:?}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for StationError<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_distinguishable() {
        assert_ne!(DccError::InvalidAddress, DccError::InvalidSpeed);
        assert_ne!(DccError::FunctionNotAvailable, DccError::StateNotAvailable);
        assert_ne!(DccError::InvalidSubState, DccError::StateNotAvailable);
    }

    #[test]
    fn station_error_from_dcc_error() {
        let err: StationError<()> = DccError::InvalidSpeed.into();
        assert_eq!(err.encode_error(), Some(DccError::InvalidSpeed));
        assert!(!err.is_transport());
    }

    #[test]
    fn station_error_transport() {
        let err: StationError<&str> = StationError::Transport("line down");
        assert_eq!(err.encode_error(), None);
        assert!(err.is_transport());
    }

    #[cfg(feature = "std")]
    #[test]
    fn display_messages() {
        assert_eq!(
            DccError::FunctionNotAvailable.to_string(),
            "function not available"
        );
        let err: StationError<u8> = StationError::Transport(5);
        assert_eq!(err.to_string(), "transport error: 5");
    }
}
