//! Per-port frame assembly
//!
//! Builds discrete frames out of a raw byte stream. A frame runs from the
//! port's start marker through the newline terminator, inclusive. The
//! assembler is a pure state machine with no I/O; the session owns one per
//! active port and feeds it a byte at a time.
//!
//! A start marker observed mid-collection resets the buffer and discards the
//! partial frame silently. This mirrors the sensor firmware's behavior of
//! re-synchronizing on the marker; callers needing loss visibility must add
//! their own counters.

use crate::types::{CaptureError, PortId, Result};

/// Byte that terminates every frame, on every port type
pub const FRAME_TERMINATOR: u8 = b'\n';

/// Assembly state of a single port's byte stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Waiting for a start marker; bytes are dropped
    Idle,
    /// Inside a frame; bytes accumulate until the terminator
    Collecting,
}

/// Accumulates raw bytes between a start marker and a newline terminator.
pub struct FrameAssembler {
    marker: u8,
    state: FrameState,
    buf: String,
}

impl FrameAssembler {
    /// Create an assembler for the given start marker
    pub fn new(marker: u8) -> Self {
        Self {
            marker,
            state: FrameState::Idle,
            buf: String::new(),
        }
    }

    /// Create an assembler using the port's own start marker
    pub fn for_port(id: PortId) -> Self {
        Self::new(id.start_marker())
    }

    /// Current assembly state
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Feed one byte; returns the completed frame text when the terminator
    /// closes a frame.
    ///
    /// The marker always begins a fresh frame, even mid-collection. A byte
    /// that is not valid single-byte text yields [`CaptureError::Decode`]
    /// and is dropped without disturbing the frame in progress.
    pub fn feed(&mut self, byte: u8) -> Result<Option<String>> {
        if !byte.is_ascii() {
            return Err(CaptureError::Decode { byte });
        }

        if byte == self.marker {
            self.buf.clear();
            self.buf.push(byte as char);
            self.state = FrameState::Collecting;
            return Ok(None);
        }

        match self.state {
            FrameState::Idle => Ok(None),
            FrameState::Collecting => {
                self.buf.push(byte as char);
                if byte == FRAME_TERMINATOR {
                    self.state = FrameState::Idle;
                    Ok(Some(std::mem::take(&mut self.buf)))
                } else {
                    Ok(None)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed a whole byte string, collecting completed frames and ignoring
    /// decode errors.
    fn feed_all(assembler: &mut FrameAssembler, input: &[u8]) -> Vec<String> {
        let mut frames = Vec::new();
        for &byte in input {
            if let Ok(Some(frame)) = assembler.feed(byte) {
                frames.push(frame);
            }
        }
        frames
    }

    #[test]
    fn test_single_well_formed_frame() {
        let mut assembler = FrameAssembler::new(b'#');
        let frames = feed_all(&mut assembler, b"#GPGGA,1234\n");
        assert_eq!(frames, vec!["#GPGGA,1234\n"]);
        assert_eq!(assembler.state(), FrameState::Idle);
    }

    #[test]
    fn test_leading_noise_is_dropped() {
        // Scenario: noise before the first marker never reaches the output
        let mut assembler = FrameAssembler::new(b'#');
        let frames = feed_all(&mut assembler, b"noise#AAA\n#BBB\n");
        assert_eq!(frames, vec!["#AAA\n", "#BBB\n"]);
    }

    #[test]
    fn test_premature_marker_discards_partial_frame() {
        // A second marker before the terminator restarts collection; only
        // bytes from the second marker onward survive.
        let mut assembler = FrameAssembler::new(b'#');
        let frames = feed_all(&mut assembler, b"#AAA#BBB\n");
        assert_eq!(frames, vec!["#BBB\n"]);
    }

    #[test]
    fn test_idle_bytes_never_emitted() {
        let mut assembler = FrameAssembler::new(b'$');
        let frames = feed_all(&mut assembler, b"garbage\nmore\n");
        assert!(frames.is_empty());
        assert_eq!(assembler.state(), FrameState::Idle);
    }

    #[test]
    fn test_inertial_marker() {
        let mut assembler = FrameAssembler::for_port(PortId::Imu1);
        let frames = feed_all(&mut assembler, b"$1,2,3\n");
        assert_eq!(frames, vec!["$1,2,3\n"]);
    }

    #[test]
    fn test_non_ascii_byte_is_typed_error() {
        let mut assembler = FrameAssembler::new(b'#');
        assert!(assembler.feed(b'#').unwrap().is_none());
        assert!(assembler.feed(b'A').unwrap().is_none());

        let err = assembler.feed(0xC3).unwrap_err();
        assert!(matches!(err, CaptureError::Decode { byte: 0xC3 }));

        // The frame in progress is untouched by the dropped byte
        assert_eq!(assembler.state(), FrameState::Collecting);
        let frame = assembler.feed(b'\n').unwrap().unwrap();
        assert_eq!(frame, "#A\n");
    }

    #[test]
    fn test_back_to_back_frames() {
        let mut assembler = FrameAssembler::new(b'#');
        let frames = feed_all(&mut assembler, b"#1\n#2\n#3\n");
        assert_eq!(frames, vec!["#1\n", "#2\n", "#3\n"]);
    }

    #[test]
    fn test_terminator_while_idle_is_dropped() {
        let mut assembler = FrameAssembler::new(b'#');
        assert!(assembler.feed(b'\n').unwrap().is_none());
        assert_eq!(assembler.state(), FrameState::Idle);
    }
}
