//! Command-station configuration.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! # Example
//!
//! ```rust
//! use rs_dcc::config::{Config, StationConfig, TransportConfig};
//! use rs_dcc::WireFormat;
//!
//! // Use defaults
//! let config = Config::default();
//!
//! // Or customize
//! let config = Config::default()
//!     .with_station(
//!         StationConfig::default()
//!             .with_inter_packet_delay_ms(50)
//!             .with_wire_format(WireFormat::AsciiBits),
//!     )
//!     .with_transport(TransportConfig::default().with_port("COM5"));
//! ```

use heapless::String as HString;

use crate::packet::{WireFormat, MAX_PREAMBLE_BITS, MIN_PREAMBLE_BITS};

/// Maximum length for short config strings (device paths, state names)
pub const MAX_SHORT_STRING: usize = 64;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Most times a single command packet may be repeated.
pub const MAX_REPEAT_COUNT: u8 = 8;

// ============================================================================
// Helper for creating heapless strings
// ============================================================================

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    // Find the last char boundary that still fits
    let valid_end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|end| *end <= MAX_SHORT_STRING)
        .last()
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Packet timing and framing
    #[cfg_attr(feature = "serde", serde(default))]
    pub station: StationConfig,
    /// Serial connection
    #[cfg_attr(feature = "serde", serde(default))]
    pub transport: TransportConfig,
}

impl Config {
    /// Set station configuration
    pub fn with_station(mut self, station: StationConfig) -> Self {
        self.station = station;
        self
    }

    /// Set transport configuration
    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    /// Parse a JSON configuration.
    ///
    /// Missing sections fall back to their defaults. Out-of-range values are
    /// clamped the same way the builders clamp them.
    ///
    /// ```rust
    /// use rs_dcc::config::Config;
    ///
    /// let config = Config::from_json(r#"{"transport": {"port": "/dev/ttyUSB0"}}"#).unwrap();
    /// assert_eq!(config.transport.port.as_str(), "/dev/ttyUSB0");
    /// assert_eq!(config.station.preamble_bits, 14);
    /// ```
    #[cfg(feature = "serde-json-core")]
    pub fn from_json(json: &str) -> Result<Self, serde_json_core::de::Error> {
        let (config, _): (Config, usize) = serde_json_core::from_str(json)?;
        Ok(config.normalized())
    }

    /// Re-apply builder clamping to every field.
    pub fn normalized(self) -> Self {
        let s = self.station;
        Self {
            station: StationConfig::default()
                .with_preamble_bits(s.preamble_bits)
                .with_inter_packet_delay_ms(s.inter_packet_delay_ms)
                .with_repeat_count(s.repeat_count)
                .with_wire_format(s.wire_format),
            transport: self.transport,
        }
    }
}

// ============================================================================
// Station Config
// ============================================================================

/// Packet framing and timing configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StationConfig {
    /// Preamble length in bits (14..=32)
    pub preamble_bits: u8,
    /// Pause after every transmitted packet in milliseconds
    pub inter_packet_delay_ms: u32,
    /// How many times each command packet is sent (1..=8)
    pub repeat_count: u8,
    /// Serial rendering of each packet
    pub wire_format: WireFormat,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            preamble_bits: MIN_PREAMBLE_BITS as u8,
            inter_packet_delay_ms: 100,
            repeat_count: 1,
            wire_format: WireFormat::Bytes,
        }
    }
}

impl StationConfig {
    /// Set the preamble length
    pub fn with_preamble_bits(mut self, bits: u8) -> Self {
        self.preamble_bits = bits.clamp(MIN_PREAMBLE_BITS as u8, MAX_PREAMBLE_BITS as u8);
        self
    }

    /// Set the inter-packet delay
    pub fn with_inter_packet_delay_ms(mut self, ms: u32) -> Self {
        self.inter_packet_delay_ms = ms;
        self
    }

    /// Set the repeat count
    pub fn with_repeat_count(mut self, count: u8) -> Self {
        self.repeat_count = count.clamp(1, MAX_REPEAT_COUNT);
        self
    }

    /// Set the wire format
    pub fn with_wire_format(mut self, format: WireFormat) -> Self {
        self.wire_format = format;
        self
    }
}

// ============================================================================
// Transport Config
// ============================================================================

/// Serial connection configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransportConfig {
    /// Serial device path (e.g. "/dev/ttyACM0", "COM5")
    pub port: ShortString,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: short_string("/dev/ttyACM0"),
        }
    }
}

impl TransportConfig {
    /// Set the serial device path
    pub fn with_port(mut self, port: &str) -> Self {
        self.port = short_string(port);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.station.preamble_bits, 14);
        assert_eq!(config.station.inter_packet_delay_ms, 100);
        assert_eq!(config.station.repeat_count, 1);
        assert_eq!(config.station.wire_format, WireFormat::Bytes);
        assert_eq!(config.transport.port.as_str(), "/dev/ttyACM0");
    }

    #[test]
    fn builder_pattern() {
        let config = Config::default()
            .with_station(
                StationConfig::default()
                    .with_preamble_bits(20)
                    .with_inter_packet_delay_ms(5)
                    .with_repeat_count(2)
                    .with_wire_format(WireFormat::AsciiBits),
            )
            .with_transport(TransportConfig::default().with_port("COM5"));

        assert_eq!(config.station.preamble_bits, 20);
        assert_eq!(config.station.inter_packet_delay_ms, 5);
        assert_eq!(config.station.repeat_count, 2);
        assert_eq!(config.station.wire_format, WireFormat::AsciiBits);
        assert_eq!(config.transport.port.as_str(), "COM5");
    }

    #[test]
    fn preamble_clamped() {
        let s = StationConfig::default().with_preamble_bits(10);
        assert_eq!(s.preamble_bits, 14);

        let s = StationConfig::default().with_preamble_bits(200);
        assert_eq!(s.preamble_bits, 32);
    }

    #[test]
    fn repeat_count_clamped() {
        assert_eq!(StationConfig::default().with_repeat_count(0).repeat_count, 1);
        assert_eq!(StationConfig::default().with_repeat_count(50).repeat_count, 8);
    }

    #[test]
    fn normalized_clamps_raw_fields() {
        let mut config = Config::default();
        config.station.preamble_bits = 3;
        config.station.repeat_count = 0;
        let config = config.normalized();
        assert_eq!(config.station.preamble_bits, 14);
        assert_eq!(config.station.repeat_count, 1);
    }

    // =========================================================================
    // String Helper Tests
    // =========================================================================

    #[test]
    fn short_string_truncation() {
        let long_input = "a".repeat(100);
        let s = short_string(&long_input);
        assert_eq!(s.len(), MAX_SHORT_STRING);
    }

    #[test]
    fn short_string_utf8_boundary() {
        // 17 four-byte chars = 68 bytes; only 16 fit
        let input = "\u{1F682}".repeat(17);
        let s = short_string(&input);
        assert_eq!(s.len(), 64);
        assert!(core::str::from_utf8(s.as_bytes()).is_ok());
    }

    #[cfg(feature = "serde-json-core")]
    #[test]
    fn from_json_full() {
        let json = r#"{
            "station": {
                "preamble_bits": 16,
                "inter_packet_delay_ms": 20,
                "repeat_count": 3,
                "wire_format": "ascii_bits"
            },
            "transport": { "port": "COM5" }
        }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.station.preamble_bits, 16);
        assert_eq!(config.station.inter_packet_delay_ms, 20);
        assert_eq!(config.station.repeat_count, 3);
        assert_eq!(config.station.wire_format, WireFormat::AsciiBits);
        assert_eq!(config.transport.port.as_str(), "COM5");
    }

    #[cfg(feature = "serde-json-core")]
    #[test]
    fn from_json_clamps() {
        let config = Config::from_json(r#"{"station": {"preamble_bits": 2}}"#).unwrap();
        assert_eq!(config.station.preamble_bits, 14);
    }

    #[cfg(feature = "serde-json-core")]
    #[test]
    fn from_json_rejects_garbage() {
        assert!(Config::from_json("not json").is_err());
    }
}
