//! Port profiles and activation flags
//!
//! The serial parameters for each logical port live in a [`ProfileTable`]
//! rather than inline in the session code, so deployments can remap devices
//! without rebuilding. The built-in defaults reproduce the fielded sensor
//! rig; a TOML file can override any subset of them.

use crate::types::PortId;
use serde::{Deserialize, Serialize};

/// Parity setting for serial port configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl Default for Parity {
    fn default() -> Self {
        Parity::None
    }
}

/// Serial parameters for one logical port
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortProfile {
    /// Serial device path (e.g., "/dev/ttyUSB0", "COM3")
    pub device: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Parity ("none", "odd", "even") - defaults to "none"
    #[serde(default)]
    pub parity: Parity,
    /// Stop bits (1, 2) - defaults to 1
    #[serde(default = "default_stop_bits")]
    pub stop_bits: u8,
    /// Data bits (5, 6, 7, 8) - defaults to 8
    #[serde(default = "default_data_bits")]
    pub data_bits: u8,
    /// Read timeout in milliseconds; zero means a non-blocking poll that
    /// returns immediately with whatever is buffered
    #[serde(default)]
    pub timeout_ms: u64,
}

fn default_stop_bits() -> u8 {
    1
}

fn default_data_bits() -> u8 {
    8
}

fn default_imu1() -> PortProfile {
    PortProfile {
        device: "/dev/ttyUSB0".to_string(),
        baud_rate: 57_600,
        parity: Parity::None,
        stop_bits: 1,
        data_bits: 8,
        timeout_ms: 0,
    }
}

fn default_imu2() -> PortProfile {
    PortProfile {
        device: "/dev/ttyUSB1".to_string(),
        baud_rate: 115_200,
        parity: Parity::None,
        stop_bits: 1,
        data_bits: 8,
        timeout_ms: 0,
    }
}

fn default_gps() -> PortProfile {
    PortProfile {
        device: "/dev/ttyUSB0".to_string(),
        baud_rate: 115_200,
        parity: Parity::None,
        stop_bits: 1,
        data_bits: 8,
        timeout_ms: 0,
    }
}

/// One profile per logical port, TOML-overridable per section
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileTable {
    #[serde(default = "default_imu1")]
    pub imu1: PortProfile,
    #[serde(default = "default_imu2")]
    pub imu2: PortProfile,
    #[serde(default = "default_gps")]
    pub gps: PortProfile,
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self {
            imu1: default_imu1(),
            imu2: default_imu2(),
            gps: default_gps(),
        }
    }
}

impl ProfileTable {
    /// Profile for the given logical port
    pub fn profile(&self, id: PortId) -> &PortProfile {
        match id {
            PortId::Imu1 => &self.imu1,
            PortId::Imu2 => &self.imu2,
            PortId::Gps => &self.gps,
        }
    }
}

/// Ordered activation triple selecting which logical ports a session polls
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortFlags {
    pub imu1: bool,
    pub imu2: bool,
    pub gps: bool,
}

impl Default for PortFlags {
    /// Positional-only
    fn default() -> Self {
        Self {
            imu1: false,
            imu2: false,
            gps: true,
        }
    }
}

impl PortFlags {
    /// Build flags from the CLI's positional integers.
    ///
    /// Fewer than three values falls back to the positional-only default;
    /// any nonzero value activates its port.
    pub fn from_args(args: &[u8]) -> Self {
        if args.len() < 3 {
            return Self::default();
        }
        Self {
            imu1: args[0] != 0,
            imu2: args[1] != 0,
            gps: args[2] != 0,
        }
    }

    /// Whether the given port is selected
    pub fn is_active(self, id: PortId) -> bool {
        match id {
            PortId::Imu1 => self.imu1,
            PortId::Imu2 => self.imu2,
            PortId::Gps => self.gps,
        }
    }

    /// Selected ports, in poll order
    pub fn active_ports(self) -> impl Iterator<Item = PortId> {
        PortId::POLL_ORDER
            .into_iter()
            .filter(move |&id| self.is_active(id))
    }
}
