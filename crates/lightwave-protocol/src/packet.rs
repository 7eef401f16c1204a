//! Packet framing and serial link parameters.
//!
//! A packet is the [`SENTINEL`] followed by one byte per band, in configured
//! band order. There is no length field, checksum or escaping: the band count
//! is fixed at build time on both ends and the decoder resynchronises on the
//! sentinel.

use crate::{BAUD_RATE, MAX_INTENSITY, SENTINEL};

/// Clamps an intensity into the range the encoder may transmit.
///
/// Values above [`MAX_INTENSITY`] collide with the sentinel and are pulled
/// down to it; everything else passes through unchanged.
#[inline]
pub const fn clamp_intensity(value: u8) -> u8 {
    if value > MAX_INTENSITY {
        MAX_INTENSITY
    } else {
        value
    }
}

/// An outgoing packet borrowing its intensity vector.
///
/// Built only when emitting; nothing about a packet is retained between
/// windows.
///
/// # Example
///
/// ```rust
/// use lightwave_protocol::{Packet, SENTINEL};
///
/// let packet = Packet::new(&[0, 128, 255]);
/// let mut buf = [0u8; 4];
/// assert_eq!(packet.encode_into(&mut buf), Some(4));
/// assert_eq!(buf, [SENTINEL, 0, 128, 0xFD]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet<'a> {
    intensities: &'a [u8],
}

impl<'a> Packet<'a> {
    /// Wraps an intensity vector, one byte per band in channel order.
    pub const fn new(intensities: &'a [u8]) -> Self {
        Self { intensities }
    }

    /// The intensities as given (before clamping).
    pub const fn intensities(&self) -> &'a [u8] {
        self.intensities
    }

    /// Length of the encoded packet in bytes.
    pub const fn encoded_len(&self) -> usize {
        1 + self.intensities.len()
    }

    /// Whether every band is zero (a silent window).
    pub fn is_silent(&self) -> bool {
        self.intensities.iter().all(|&v| v == 0)
    }

    /// Encodes the packet into the front of `buf`.
    ///
    /// Returns the number of bytes written, or `None` if `buf` is shorter than
    /// [`encoded_len`](Self::encoded_len). Nothing is written in that case.
    pub fn encode_into(&self, buf: &mut [u8]) -> Option<usize> {
        let len = self.encoded_len();
        let out = buf.get_mut(..len)?;
        out[0] = SENTINEL;
        for (dst, &src) in out[1..].iter_mut().zip(self.intensities) {
            *dst = clamp_intensity(src);
        }
        Some(len)
    }

    /// Encodes the packet into a freshly allocated buffer.
    #[cfg(feature = "std")]
    pub fn to_vec(&self) -> Vec<u8> {
        let mut buf = vec![0; self.encoded_len()];
        // Sized exactly, cannot fail.
        let _ = self.encode_into(&mut buf);
        buf
    }
}

/// Serial parity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// No parity bit.
    None,
    /// Even parity.
    Even,
    /// Odd parity.
    Odd,
}

/// Serial line parameters both ends are configured with.
///
/// The protocol is defined for 8N1; the struct exists so the host can report
/// and check what it opened rather than to make the framing configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSettings {
    /// Line speed in baud.
    pub baud_rate: u32,
    /// Data bits per character.
    pub data_bits: u8,
    /// Parity mode.
    pub parity: Parity,
    /// Stop bits per character.
    pub stop_bits: u8,
}

impl LinkSettings {
    /// The protocol's link: [`BAUD_RATE`], 8 data bits, no parity, 1 stop bit.
    pub const DEFAULT: Self = Self {
        baud_rate: BAUD_RATE,
        data_bits: 8,
        parity: Parity::None,
        stop_bits: 1,
    };

    /// Same framing at a different line speed.
    pub const fn with_baud_rate(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Self::DEFAULT
        }
    }

    /// Approximate time on the wire for `bytes` bytes, in microseconds.
    ///
    /// Counts start, data, parity and stop bits per character.
    pub const fn transmit_time_us(&self, bytes: usize) -> u64 {
        let parity_bits = match self.parity {
            Parity::None => 0,
            Parity::Even | Parity::Odd => 1,
        };
        let bits_per_char = 1 + self.data_bits as u64 + parity_bits + self.stop_bits as u64;
        bytes as u64 * bits_per_char * 1_000_000 / self.baud_rate as u64
    }
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BAND_COUNT, PACKET_LEN};

    #[test]
    fn encode_prepends_sentinel_and_keeps_order() {
        let packet = Packet::new(&[1, 2, 3, 4, 5, 6]);
        let mut buf = [0u8; PACKET_LEN];
        assert_eq!(packet.encode_into(&mut buf), Some(PACKET_LEN));
        assert_eq!(buf, [SENTINEL, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn encode_rejects_short_buffer() {
        let packet = Packet::new(&[1, 2, 3]);
        let mut buf = [0xAAu8; 3];
        assert_eq!(packet.encode_into(&mut buf), None);
        assert_eq!(buf, [0xAA; 3], "short buffer must be left untouched");
    }

    #[cfg(feature = "std")]
    #[test]
    fn encode_clamps_sentinel_collisions() {
        let packet = Packet::new(&[SENTINEL, 0xFF, MAX_INTENSITY]);
        let bytes = packet.to_vec();
        assert_eq!(bytes, vec![SENTINEL, MAX_INTENSITY, MAX_INTENSITY, MAX_INTENSITY]);
        assert!(!bytes[1..].contains(&SENTINEL));
    }

    #[test]
    fn packet_length_is_one_plus_bands() {
        let zeros = [0u8; BAND_COUNT];
        assert_eq!(Packet::new(&zeros).encoded_len(), PACKET_LEN);
        assert!(Packet::new(&zeros).is_silent());
        assert!(!Packet::new(&[0, 0, 1]).is_silent());
    }

    #[test]
    fn default_link_is_8n1() {
        let link = LinkSettings::default();
        assert_eq!(link.baud_rate, 115_200);
        assert_eq!(link.data_bits, 8);
        assert_eq!(link.parity, Parity::None);
        assert_eq!(link.stop_bits, 1);
    }

    #[test]
    fn transmit_time_for_one_packet() {
        // 7 bytes * 10 bits at 115200 baud ~ 607 us
        let us = LinkSettings::DEFAULT.transmit_time_us(PACKET_LEN);
        assert!((600..=610).contains(&us), "got {us}");
    }
}
