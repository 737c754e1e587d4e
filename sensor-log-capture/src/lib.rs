//! Serial Sensor Capture Library
//!
//! A small, reusable engine for logging timestamped frames from up to three
//! heterogeneous serial sensor sources: two inertial streams and one
//! positioning stream, each with its own byte-level framing convention.
//!
//! # Architecture
//!
//! The library is intentionally minimal and focused on capture:
//! - Opens serial ports from a per-port profile table, soft-failing ports
//!   that cannot be opened
//! - Assembles discrete frames from raw bytes with one pure state machine
//!   per port
//! - Appends timestamped records to one output file per port, echoing them
//!   for live observation
//! - Runs a single-threaded poll loop that round-robins non-blocking reads
//!   across the active ports and releases every resource on every exit path
//!
//! The library does NOT:
//! - Decode the sensor protocols' field semantics
//! - Reformat captured logs into tabular output
//! - Compute spectral estimates from captured columns
//!
//! Those are downstream tools consuming the files this library produces.
//!
//! # Example Usage
//!
//! ```no_run
//! use sensor_log_capture::{PortFlags, ProfileTable, Session};
//! use std::path::Path;
//! use std::sync::atomic::AtomicBool;
//!
//! let flags = PortFlags::from_args(&[0, 0, 1]);
//! let profiles = ProfileTable::default();
//! let stop = AtomicBool::new(false);
//!
//! let mut session = Session::start(flags, &profiles, Path::new(".")).unwrap();
//! session.run(&stop).unwrap();
//! ```

// Public modules
pub mod framing;
pub mod ports;
pub mod profile;
pub mod session;
pub mod sink;
pub mod types;

// Re-export main types for convenience
pub use framing::{FrameAssembler, FrameState, FRAME_TERMINATOR};
pub use profile::{Parity, PortFlags, PortProfile, ProfileTable};
pub use session::{log_file_name, Session, SessionPhase, SETTLE_DELAY};
pub use sink::RecordSink;
pub use types::{CaptureError, PortId, Result, TimestampedRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
