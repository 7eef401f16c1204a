//! Packet framing, silence policy and best-effort transmission.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lightwave_protocol::Packet;

use crate::transport::Transport;

/// What happened to one window's intensities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// The whole packet was written.
    Sent,
    /// Every band was zero and silence suppression is on; nothing written.
    Suppressed,
    /// No transport, a failed write, or a short write. The packet is gone.
    Dropped,
}

/// Counters shared between the capture thread and the control thread.
#[derive(Debug, Default)]
pub struct EmitterStats {
    windows: AtomicU64,
    sent: AtomicU64,
    suppressed: AtomicU64,
    dropped: AtomicU64,
}

impl EmitterStats {
    /// Read all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            windows: self.windows.load(Ordering::Relaxed),
            sent: self.sent.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }

    fn record(&self, emission: Emission) {
        self.windows.fetch_add(1, Ordering::Relaxed);
        let counter = match emission {
            Emission::Sent => &self.sent,
            Emission::Suppressed => &self.suppressed,
            Emission::Dropped => &self.dropped,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time copy of [`EmitterStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Windows offered to the emitter.
    pub windows: u64,
    /// Packets written in full.
    pub sent: u64,
    /// Silent windows not transmitted.
    pub suppressed: u64,
    /// Packets lost to a missing or failing transport.
    pub dropped: u64,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} windows: {} sent, {} suppressed, {} dropped",
            self.windows, self.sent, self.suppressed, self.dropped
        )
    }
}

/// Frames intensity vectors and writes them to a transport.
///
/// The emitter owns its packet buffer, so emitting never allocates. Writes are
/// best effort: a failed or short write is logged and counted as dropped, and
/// the next window starts fresh with a new sentinel, which the controller's
/// decoder uses to resynchronise.
///
/// With silence suppression on, an all-zero window is not transmitted. The
/// controller keeps fading on its own timer, so lights still go dark.
pub struct PacketEmitter<T> {
    transport: Option<T>,
    suppress_silence: bool,
    packet: Vec<u8>,
    stats: Arc<EmitterStats>,
    link_healthy: bool,
}

impl<T: Transport> PacketEmitter<T> {
    /// Create an emitter. With `transport` set to `None` every non-silent
    /// window is counted as dropped.
    pub fn new(transport: Option<T>, suppress_silence: bool) -> Self {
        Self {
            transport,
            suppress_silence,
            packet: Vec::new(),
            stats: Arc::new(EmitterStats::default()),
            link_healthy: true,
        }
    }

    /// Shared counters; clone the `Arc` to read them from another thread.
    pub fn stats(&self) -> &Arc<EmitterStats> {
        &self.stats
    }

    /// Whether silent windows are skipped.
    pub fn suppresses_silence(&self) -> bool {
        self.suppress_silence
    }

    /// The transport, if one is attached.
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    /// Mutable access to the transport.
    pub fn transport_mut(&mut self) -> Option<&mut T> {
        self.transport.as_mut()
    }

    /// Detach and return the transport.
    pub fn take_transport(&mut self) -> Option<T> {
        self.transport.take()
    }

    /// Frame `intensities` and write the packet.
    pub fn emit(&mut self, intensities: &[u8]) -> Emission {
        let emission = self.transmit(intensities);
        self.stats.record(emission);
        emission
    }

    fn transmit(&mut self, intensities: &[u8]) -> Emission {
        let packet = Packet::new(intensities);
        if self.suppress_silence && packet.is_silent() {
            return Emission::Suppressed;
        }

        let Some(transport) = self.transport.as_mut() else {
            return Emission::Dropped;
        };

        let len = packet.encoded_len();
        if self.packet.len() < len {
            self.packet.resize(len, 0);
        }
        let Some(len) = packet.encode_into(&mut self.packet) else {
            return Emission::Dropped;
        };

        match transport.write(&self.packet[..len]) {
            Ok(written) if written == len => {
                if !self.link_healthy {
                    tracing::info!("transport recovered");
                    self.link_healthy = true;
                }
                Emission::Sent
            }
            Ok(written) => {
                if self.link_healthy {
                    tracing::warn!(written, expected = len, "short write, packet dropped");
                } else {
                    tracing::debug!(written, expected = len, "short write, packet dropped");
                }
                self.link_healthy = false;
                Emission::Dropped
            }
            Err(e) => {
                if self.link_healthy {
                    tracing::warn!(error = %e, "transport write failed, packet dropped");
                } else {
                    tracing::debug!(error = %e, "transport write failed, packet dropped");
                }
                self.link_healthy = false;
                Emission::Dropped
            }
        }
    }

    /// Flush the transport, if any.
    pub fn flush(&mut self) -> std::io::Result<()> {
        match self.transport.as_mut() {
            Some(transport) => transport.flush(),
            None => Ok(()),
        }
    }
}

impl<T> fmt::Debug for PacketEmitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketEmitter")
            .field("connected", &self.transport.is_some())
            .field("suppress_silence", &self.suppress_silence)
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryTransport;
    use lightwave_protocol::SENTINEL;

    #[test]
    fn sends_framed_packet() {
        let mut emitter = PacketEmitter::new(Some(MemoryTransport::new()), true);
        assert_eq!(emitter.emit(&[10, 0, 255]), Emission::Sent);
        let bytes = emitter.transport().unwrap().bytes();
        assert_eq!(bytes, &[SENTINEL, 10, 0, 0xFD]);
    }

    #[test]
    fn silence_suppressed_only_when_enabled() {
        let mut quiet = PacketEmitter::new(Some(MemoryTransport::new()), true);
        assert_eq!(quiet.emit(&[0, 0, 0]), Emission::Suppressed);
        assert!(quiet.transport().unwrap().bytes().is_empty());

        let mut chatty = PacketEmitter::new(Some(MemoryTransport::new()), false);
        assert_eq!(chatty.emit(&[0, 0, 0]), Emission::Sent);
        assert_eq!(chatty.transport().unwrap().bytes(), &[SENTINEL, 0, 0, 0]);
    }

    #[test]
    fn short_write_is_dropped_not_retried() {
        let transport = MemoryTransport::new().with_write_limit(2);
        let mut emitter = PacketEmitter::new(Some(transport), true);
        assert_eq!(emitter.emit(&[1, 2, 3]), Emission::Dropped);
        let transport = emitter.transport().unwrap();
        assert_eq!(transport.writes(), 1);
        assert_eq!(transport.bytes(), &[SENTINEL, 1]);
    }

    #[test]
    fn failure_then_recovery() {
        let mut emitter = PacketEmitter::new(Some(MemoryTransport::new()), true);
        emitter.transport_mut().unwrap().fail_writes(true);
        assert_eq!(emitter.emit(&[5]), Emission::Dropped);
        assert_eq!(emitter.emit(&[6]), Emission::Dropped);
        emitter.transport_mut().unwrap().fail_writes(false);
        assert_eq!(emitter.emit(&[7]), Emission::Sent);

        let stats = emitter.stats().snapshot();
        assert_eq!(
            stats,
            StatsSnapshot {
                windows: 3,
                sent: 1,
                suppressed: 0,
                dropped: 2
            }
        );
    }

    #[test]
    fn no_transport_drops() {
        let mut emitter: PacketEmitter<MemoryTransport> = PacketEmitter::new(None, true);
        assert_eq!(emitter.emit(&[9]), Emission::Dropped);
        assert_eq!(emitter.emit(&[0]), Emission::Suppressed);
        assert!(emitter.flush().is_ok());
    }

    #[test]
    fn snapshot_display() {
        let s = StatsSnapshot {
            windows: 4,
            sent: 2,
            suppressed: 1,
            dropped: 1,
        };
        assert_eq!(s.to_string(), "4 windows: 2 sent, 1 suppressed, 1 dropped");
    }
}
