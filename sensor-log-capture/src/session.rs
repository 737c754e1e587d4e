//! Session lifecycle and the poll loop
//!
//! A session runs from port-open through all-resources-closed:
//! `Starting -> Running -> ShuttingDown -> Closed`. The session owns every
//! device handle and output sink it opens, so teardown is a single drop:
//! the run loop can exit normally, on error, or on interrupt and the same
//! release path runs exactly once.
//!
//! Scheduling is single-threaded cooperative polling: each loop iteration
//! performs one non-blocking single-byte read attempt per active port in
//! fixed order. Cross-port interleaving of records therefore reflects poll
//! order within an iteration, not true arrival order.

use crate::framing::{FrameAssembler, FRAME_TERMINATOR};
use crate::ports::{self, OpenPort};
use crate::profile::{PortFlags, ProfileTable};
use crate::sink::RecordSink;
use crate::types::{CaptureError, PortId, Result, TimestampedRecord};
use chrono::{DateTime, Local};
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Pause between opening the ports and starting the poll loop, giving the
/// devices time to settle after the handles come up
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Byte the inertial firmware expects before it starts streaming frames
const IMU_STREAM_START: u8 = b'4';

/// Upper bound on bytes consumed while draining a stale buffered line
const STALE_DRAIN_LIMIT: usize = 4096;

/// Lifecycle phase of a capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Starting,
    Running,
    ShuttingDown,
    Closed,
}

/// One port's capture chain: device handle, assembler, and sink.
///
/// Each pipeline owns its resources exclusively; no two pipelines ever touch
/// the same handle, so the loop needs no locking.
struct Pipeline {
    id: PortId,
    device: Box<dyn Read + Send>,
    assembler: FrameAssembler,
    sink: RecordSink,
}

impl Pipeline {
    /// One non-blocking single-byte read attempt.
    ///
    /// A timed-out or would-block read means no data this pass. A decode
    /// failure drops the offending byte and keeps the session alive. Any
    /// other read error is fatal for the session.
    fn poll(&mut self) -> Result<()> {
        let mut byte = [0u8; 1];
        match self.device.read(&mut byte) {
            Ok(0) => Ok(()),
            Ok(_) => match self.assembler.feed(byte[0]) {
                Ok(Some(text)) => self.sink.write(&TimestampedRecord::now(text)),
                Ok(None) => Ok(()),
                Err(e) => {
                    log::warn!("{}: {}", self.id, e);
                    Ok(())
                }
            },
            Err(e) if is_no_data(&e) => Ok(()),
            Err(source) => Err(CaptureError::Read {
                port: self.id,
                source,
            }),
        }
    }
}

/// One logging run: open ports, poll until stopped, release everything.
pub struct Session {
    started_at: DateTime<Local>,
    pipelines: Vec<Pipeline>,
    phase: SessionPhase,
}

impl Session {
    /// Open the flagged ports and prepare each one for capture.
    ///
    /// Ports that fail to open are disabled and the session proceeds with
    /// the rest; if nothing opens at all the session is refused. After the
    /// settle delay, each opened port gets its output file and assembler;
    /// inertial ports are drained of one stale line and sent the
    /// start-streaming handshake, the positioning port is drained only.
    pub fn start(flags: PortFlags, profiles: &ProfileTable, output_dir: &Path) -> Result<Self> {
        log::info!("opening serial ports");
        let (opened, _disabled) = ports::open_ports(flags, profiles);
        if opened.is_empty() {
            return Err(CaptureError::NoActivePorts);
        }

        thread::sleep(SETTLE_DELAY);

        let started_at = Local::now();
        let mut pipelines = Vec::with_capacity(opened.len());
        for OpenPort { id, mut handle } in opened {
            let sink = RecordSink::create(output_dir.join(log_file_name(id, &started_at)), true)?;
            prepare_port(id, handle.as_mut())?;
            pipelines.push(Pipeline {
                id,
                device: Box::new(handle),
                assembler: FrameAssembler::for_port(id),
                sink,
            });
        }

        Ok(Self {
            started_at,
            pipelines,
            phase: SessionPhase::Starting,
        })
    }

    /// Wall-clock instant the session started; names the output files
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Poll the active ports until the stop flag is set or a port fails.
    ///
    /// The flag is typically set from an interrupt handler; it is observed
    /// between reads, so the loop unwinds within one iteration. Resources
    /// are released when the session is dropped, on every exit path.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<()> {
        self.phase = SessionPhase::Running;
        log::info!("logging on {} port(s)", self.pipelines.len());

        while !stop.load(Ordering::Relaxed) {
            for pipeline in &mut self.pipelines {
                if let Err(e) = pipeline.poll() {
                    self.phase = SessionPhase::ShuttingDown;
                    return Err(e);
                }
            }
        }

        self.phase = SessionPhase::ShuttingDown;
        log::info!("stop requested, shutting down");
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        for pipeline in &mut self.pipelines {
            if let Err(e) = pipeline.sink.flush() {
                log::warn!("failed to flush {} log: {}", pipeline.id, e);
            }
        }
        self.phase = SessionPhase::Closed;
        log::info!("session closed, all ports released");
    }
}

/// Output filename for one port, derived from the session start instant.
///
/// Colons are stripped so the name is safe on every filesystem.
pub fn log_file_name(id: PortId, started_at: &DateTime<Local>) -> String {
    let stamp = started_at
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
        .replace(':', "");
    format!("{}_log_{}.txt", id.label(), stamp)
}

/// Discard one stale buffered line so capture starts at a frame boundary
fn drain_stale_line<D: Read + ?Sized>(device: &mut D) -> io::Result<()> {
    let mut byte = [0u8; 1];
    for _ in 0..STALE_DRAIN_LIMIT {
        match device.read(&mut byte) {
            Ok(0) => break,
            Ok(_) if byte[0] == FRAME_TERMINATOR => break,
            Ok(_) => continue,
            Err(e) if is_no_data(&e) => break,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn prepare_port<D: Read + Write + ?Sized>(id: PortId, device: &mut D) -> Result<()> {
    drain_stale_line(device).map_err(|source| CaptureError::Read { port: id, source })?;
    if id.is_inertial() {
        device
            .write_all(&[IMU_STREAM_START])
            .and_then(|_| device.flush())
            .map_err(|source| CaptureError::Write { port: id, source })?;
    }
    Ok(())
}

fn is_no_data(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}
