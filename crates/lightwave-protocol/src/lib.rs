//! Lightwave Protocol - the wire schema and controller state machines
//!
//! This crate is the single definition of everything the host and the LED
//! controller must agree on, plus the controller-side logic that consumes it.
//! Both ends are built against the same constants; nothing is negotiated on
//! the wire.
//!
//! # Wire Format
//!
//! | Byte offset | Field | Notes |
//! |---|---|---|
//! | 0 | [`SENTINEL`] (`0xFE`) | marks packet start |
//! | 1..=[`BAND_COUNT`] | per-band intensity | one unsigned byte per band, configured order |
//!
//! Payload bytes are clamped to [`MAX_INTENSITY`] by the encoder so a
//! sentinel can only ever mean "packet start". The decoder still treats a
//! sentinel inside a payload as a restart, which lets it recover from a
//! stream that was cut mid-packet.
//!
//! # Controller Side
//!
//! - [`FrameDecoder`] - two-state, non-blocking packet scanner over a [`ByteSource`]
//! - [`DecayEngine`] - per-channel intensity with timer-driven halving
//! - [`Controller`] - one poll step: decay first, then decode and apply
//! - [`OutputDriver`] - where channel values go (PWM, LED strip, test recorder)
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible and allocation free. Disable the default
//! `std` feature for firmware builds:
//!
//! ```toml
//! [dependencies]
//! lightwave-protocol = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use lightwave_protocol::{Controller, Millis, OutputDriver, Packet};
//! use std::collections::VecDeque;
//!
//! struct Pwm([u8; 3]);
//!
//! impl OutputDriver for Pwm {
//!     fn set_output(&mut self, channel: usize, _pin: u8, value: u8) {
//!         self.0[channel] = value;
//!     }
//! }
//!
//! let mut controller = Controller::<3>::new([3, 5, 6], Millis::from_millis(10), Millis::ZERO);
//! let mut line: VecDeque<u8> = Packet::new(&[40, 0, 200]).to_vec().into();
//! let mut pwm = Pwm([0; 3]);
//!
//! controller.poll(Millis::from_millis(1), &mut line, &mut pwm);
//! assert_eq!(pwm.0, [40, 0, 200]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod channel;
pub mod controller;
pub mod decay;
pub mod decoder;
pub mod packet;
pub mod time;

pub use channel::ChannelState;
pub use controller::Controller;
pub use decay::{DecayEngine, OutputDriver};
pub use decoder::{ByteSource, DecoderState, FrameDecoder};
pub use packet::{LinkSettings, Packet, Parity, clamp_intensity};
pub use time::Millis;

/// Marker byte that starts every packet.
pub const SENTINEL: u8 = 0xFE;

/// Largest intensity the encoder puts on the wire.
///
/// One below [`SENTINEL`], so payload bytes never look like a packet start.
pub const MAX_INTENSITY: u8 = SENTINEL - 1;

/// Number of bands (and controller channels) both ends are built with.
///
/// Not transmitted. A host and controller built with different values will
/// misframe every packet.
pub const BAND_COUNT: usize = 6;

/// Total packet length on the wire: sentinel plus one byte per band.
pub const PACKET_LEN: usize = 1 + BAND_COUNT;

/// Serial link speed in baud.
pub const BAUD_RATE: u32 = 115_200;

/// Default decay period: each channel halves once per interval without updates.
pub const DEFAULT_FADE_INTERVAL: Millis = Millis::from_millis(10);

/// Intensity vector for one analysis window, one byte per band.
pub type Intensities = [u8; BAND_COUNT];
