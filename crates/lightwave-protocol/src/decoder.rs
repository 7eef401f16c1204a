//! Non-blocking packet decoder for the controller's serial input.
//!
//! The decoder is a two-state machine polled once per controller loop
//! iteration. It never waits: if a full payload has not arrived yet it leaves
//! the bytes where they are and returns.
//!
//! ```text
//!            byte == SENTINEL
//! ┌─────────────┐ ─────────────▶ ┌──────────────────────┐
//! │ AwaitMarker │                │ AwaitCompletePacket  │──┐ SENTINEL in payload:
//! └─────────────┘ ◀───────────── └──────────────────────┘◀─┘ restart payload
//!     ▲   │ other bytes         N bytes read, frame returned
//!     └───┘ discarded
//! ```

use crate::SENTINEL;

/// A source of received bytes, such as a UART receive buffer.
///
/// Mirrors the usual serial API on microcontrollers: a count of buffered
/// bytes and a non-blocking single-byte read.
pub trait ByteSource {
    /// Number of bytes that can be read without waiting.
    fn available(&self) -> usize;

    /// Reads one byte, or `None` if nothing is buffered.
    fn read(&mut self) -> Option<u8>;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    #[inline]
    fn available(&self) -> usize {
        (**self).available()
    }

    #[inline]
    fn read(&mut self) -> Option<u8> {
        (**self).read()
    }
}

#[cfg(feature = "std")]
impl ByteSource for std::collections::VecDeque<u8> {
    #[inline]
    fn available(&self) -> usize {
        self.len()
    }

    #[inline]
    fn read(&mut self) -> Option<u8> {
        self.pop_front()
    }
}

/// Decoder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderState {
    /// Discarding bytes until a [`SENTINEL`] arrives.
    #[default]
    AwaitMarker,
    /// Sentinel seen; waiting until a whole payload is buffered.
    AwaitCompletePacket,
}

/// Packet decoder for `N` bands.
///
/// `N` must match the host's band count. Each [`poll`](Self::poll) returns at
/// most one frame; callers loop until it returns `None` to drain a backlog.
///
/// # Resynchronisation
///
/// A sentinel found while reading a payload abandons the bytes read so far and
/// starts a new payload after it. Together with the encoder never putting a
/// sentinel in a payload, this means a truncated packet costs at most that one
/// packet: the next sentinel realigns the stream.
///
/// # Example
///
/// ```rust
/// use lightwave_protocol::{FrameDecoder, SENTINEL};
/// use std::collections::VecDeque;
///
/// let mut decoder = FrameDecoder::<3>::new();
/// let mut rx: VecDeque<u8> = VecDeque::from(vec![0x11, SENTINEL, 1, 2]);
///
/// assert_eq!(decoder.poll(&mut rx), None); // payload incomplete, bytes kept
/// assert_eq!(rx.len(), 2);
///
/// rx.push_back(3);
/// assert_eq!(decoder.poll(&mut rx), Some([1, 2, 3]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrameDecoder<const N: usize> {
    state: DecoderState,
    frames: u32,
    resyncs: u32,
}

impl<const N: usize> FrameDecoder<N> {
    /// Creates a decoder waiting for a sentinel.
    pub const fn new() -> Self {
        Self {
            state: DecoderState::AwaitMarker,
            frames: 0,
            resyncs: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Frames decoded since creation.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Payloads abandoned because a sentinel appeared inside them.
    pub fn resyncs(&self) -> u32 {
        self.resyncs
    }

    /// Returns to [`DecoderState::AwaitMarker`].
    pub fn reset(&mut self) {
        self.state = DecoderState::AwaitMarker;
    }

    /// Advances the state machine with whatever `source` has buffered.
    ///
    /// Returns a complete intensity vector when one is available. Never
    /// blocks; when fewer than `N` payload bytes are buffered no payload bytes
    /// are consumed.
    pub fn poll<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Option<[u8; N]> {
        loop {
            match self.state {
                DecoderState::AwaitMarker => loop {
                    if source.read()? == SENTINEL {
                        self.state = DecoderState::AwaitCompletePacket;
                        break;
                    }
                },
                DecoderState::AwaitCompletePacket => {
                    if source.available() < N {
                        return None;
                    }

                    let mut frame = [0u8; N];
                    let mut restarted = false;
                    for slot in &mut frame {
                        let byte = source.read()?;
                        if byte == SENTINEL {
                            restarted = true;
                            break;
                        }
                        *slot = byte;
                    }

                    if restarted {
                        self.resyncs = self.resyncs.wrapping_add(1);
                        #[cfg(feature = "tracing")]
                        tracing::debug!(resyncs = self.resyncs, "sentinel inside payload, resynchronising");
                        continue;
                    }

                    self.state = DecoderState::AwaitMarker;
                    self.frames = self.frames.wrapping_add(1);
                    return Some(frame);
                }
            }
        }
    }
}
