//! Port profile table loading
//!
//! The built-in [`ProfileTable`] defaults match the fielded rig; a TOML file
//! can override any subset, for example:
//!
//! ```toml
//! [imu1]
//! device = "/dev/ttyUSB2"
//! baud_rate = 57600
//!
//! [gps]
//! device = "/dev/ttyACM0"
//! baud_rate = 115200
//! ```

use anyhow::{Context, Result};
use sensor_log_capture::ProfileTable;
use std::fs;
use std::path::Path;

/// Load a profile table from a TOML file
pub fn load_profiles(path: &Path) -> Result<ProfileTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile table: {:?}", path))?;

    let table: ProfileTable = toml::from_str(&content)
        .with_context(|| format!("Failed to parse profile table: {:?}", path))?;

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_table_deserialization() {
        let toml_content = r#"
            [imu1]
            device = "/dev/ttyUSB2"
            baud_rate = 57600

            [gps]
            device = "/dev/ttyACM0"
            baud_rate = 115200
            stop_bits = 2
        "#;

        let table: ProfileTable = toml::from_str(toml_content).unwrap();
        assert_eq!(table.imu1.device, "/dev/ttyUSB2");
        assert_eq!(table.gps.device, "/dev/ttyACM0");
        assert_eq!(table.gps.stop_bits, 2);
        // Unnamed section keeps its built-in default
        assert_eq!(table.imu2, ProfileTable::default().imu2);
    }

    #[test]
    fn test_missing_file_reports_context() {
        let err = load_profiles(Path::new("/nonexistent/profiles.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read profile table"));
    }
}
