//! Serial port opening
//!
//! Opens a handle per flagged port from the profile table. An open failure
//! (device missing, permission denied, already in use) disables that port
//! for the session instead of aborting the run; a partially opened session
//! still logs from the ports that did come up. No reads happen here.

use crate::profile::{Parity, PortFlags, PortProfile, ProfileTable};
use crate::types::{CaptureError, PortId, Result};
use serialport::{DataBits, Parity as SerialParity, SerialPort, StopBits};
use std::time::Duration;

/// A successfully opened port
pub struct OpenPort {
    pub id: PortId,
    pub handle: Box<dyn SerialPort>,
}

/// A port that failed to open and is disabled for the session
pub struct DisabledPort {
    pub id: PortId,
    pub error: CaptureError,
}

/// Attempt to open every flagged port.
///
/// Returns the opened handles in poll order plus the list of ports that
/// failed to open. Each failure is logged as a warning here; the caller
/// decides whether an all-failed result is fatal.
pub fn open_ports(flags: PortFlags, profiles: &ProfileTable) -> (Vec<OpenPort>, Vec<DisabledPort>) {
    let mut opened = Vec::new();
    let mut disabled = Vec::new();

    for id in flags.active_ports() {
        let profile = profiles.profile(id);
        match open_port(id, profile) {
            Ok(handle) => {
                log::info!(
                    "opened {} on {} at {} baud",
                    id,
                    profile.device,
                    profile.baud_rate
                );
                opened.push(OpenPort { id, handle });
            }
            Err(error) => {
                log::warn!("{}; disabling {} for this session", error, id);
                disabled.push(DisabledPort { id, error });
            }
        }
    }

    (opened, disabled)
}

fn open_port(id: PortId, profile: &PortProfile) -> Result<Box<dyn SerialPort>> {
    serialport::new(&profile.device, profile.baud_rate)
        .data_bits(to_serialport_data_bits(profile.data_bits))
        .parity(to_serialport_parity(profile.parity))
        .stop_bits(to_serialport_stop_bits(profile.stop_bits))
        .timeout(Duration::from_millis(profile.timeout_ms))
        .open()
        .map_err(|source| CaptureError::PortOpen { port: id, source })
}

/// Convert our Parity enum to the serialport crate's Parity type
fn to_serialport_parity(p: Parity) -> SerialParity {
    match p {
        Parity::None => SerialParity::None,
        Parity::Odd => SerialParity::Odd,
        Parity::Even => SerialParity::Even,
    }
}

/// Convert a data bits count to the serialport crate's DataBits type
fn to_serialport_data_bits(bits: u8) -> DataBits {
    match bits {
        5 => DataBits::Five,
        6 => DataBits::Six,
        7 => DataBits::Seven,
        _ => DataBits::Eight,
    }
}

/// Convert a stop bits count to the serialport crate's StopBits type
fn to_serialport_stop_bits(bits: u8) -> StopBits {
    match bits {
        2 => StopBits::Two,
        _ => StopBits::One,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_serialport_parity() {
        assert!(matches!(to_serialport_parity(Parity::None), SerialParity::None));
        assert!(matches!(to_serialport_parity(Parity::Odd), SerialParity::Odd));
        assert!(matches!(to_serialport_parity(Parity::Even), SerialParity::Even));
    }

    #[test]
    fn test_to_serialport_data_bits() {
        assert!(matches!(to_serialport_data_bits(5), DataBits::Five));
        assert!(matches!(to_serialport_data_bits(6), DataBits::Six));
        assert!(matches!(to_serialport_data_bits(7), DataBits::Seven));
        assert!(matches!(to_serialport_data_bits(8), DataBits::Eight));
        assert!(matches!(to_serialport_data_bits(9), DataBits::Eight)); // default
    }

    #[test]
    fn test_to_serialport_stop_bits() {
        assert!(matches!(to_serialport_stop_bits(1), StopBits::One));
        assert!(matches!(to_serialport_stop_bits(2), StopBits::Two));
        assert!(matches!(to_serialport_stop_bits(0), StopBits::One)); // default
    }

    #[test]
    fn test_missing_device_soft_fails() {
        // A device path that cannot exist lands in the disabled list and
        // does not abort the rest of the session
        let mut profiles = ProfileTable::default();
        profiles.gps.device = "/dev/nonexistent-sensor-port".to_string();

        let flags = PortFlags::from_args(&[0, 0, 1]);
        let (opened, disabled) = open_ports(flags, &profiles);

        assert!(opened.is_empty());
        assert_eq!(disabled.len(), 1);
        assert_eq!(disabled[0].id, PortId::Gps);
        assert!(matches!(
            disabled[0].error,
            CaptureError::PortOpen { port: PortId::Gps, .. }
        ));
    }
}
