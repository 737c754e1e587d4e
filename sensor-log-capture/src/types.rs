//! Core types for the capture library
//!
//! This module defines the fundamental types the capture engine works with:
//! the three fixed logical ports, the timestamped record emitted for each
//! completed frame, and the error type shared across the library.

use chrono::Utc;
use std::fmt;

/// Result type for capture operations
pub type Result<T> = std::result::Result<T, CaptureError>;

/// The three fixed logical ports a session can log from.
///
/// Two inertial streams and one positioning stream. The variant order is
/// also the fixed poll order within a session iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortId {
    /// First inertial sensor
    Imu1,
    /// Second inertial sensor
    Imu2,
    /// Positioning receiver
    Gps,
}

impl PortId {
    /// All logical ports, in poll order
    pub const POLL_ORDER: [PortId; 3] = [PortId::Imu1, PortId::Imu2, PortId::Gps];

    /// Short label used in filenames and log messages
    pub fn label(self) -> &'static str {
        match self {
            PortId::Imu1 => "imu1",
            PortId::Imu2 => "imu2",
            PortId::Gps => "gps",
        }
    }

    /// Byte that opens a frame on this port.
    ///
    /// Inertial frames start with `$`, positioning frames with `#`.
    pub fn start_marker(self) -> u8 {
        match self {
            PortId::Imu1 | PortId::Imu2 => b'$',
            PortId::Gps => b'#',
        }
    }

    /// True for the inertial ports, which need a start-streaming handshake
    pub fn is_inertial(self) -> bool {
        matches!(self, PortId::Imu1 | PortId::Imu2)
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A completed frame paired with its wall-clock capture time
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampedRecord {
    /// Capture time as fractional Unix seconds
    pub unix_time: f64,
    /// Raw frame text, start marker through terminator inclusive
    pub text: String,
}

impl TimestampedRecord {
    /// Stamp a frame with the current wall clock
    pub fn now(text: String) -> Self {
        let unix_time = Utc::now().timestamp_micros() as f64 / 1_000_000.0;
        Self { unix_time, text }
    }

    /// Render the output line: `"<unix_time> <frame_text>"`.
    ///
    /// The frame text carries its own terminator, so no newline is added.
    pub fn render(&self) -> String {
        format!("{:.6} {}", self.unix_time, self.text)
    }
}

/// Errors that can occur during capture
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to open {port}: {source}")]
    PortOpen {
        port: PortId,
        #[source]
        source: serialport::Error,
    },

    #[error("byte 0x{byte:02X} is not valid frame text")]
    Decode { byte: u8 },

    #[error("read failed on {port}: {source}")]
    Read {
        port: PortId,
        #[source]
        source: std::io::Error,
    },

    #[error("write failed on {port}: {source}")]
    Write {
        port: PortId,
        #[source]
        source: std::io::Error,
    },

    #[error("no requested port could be opened")]
    NoActivePorts,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
