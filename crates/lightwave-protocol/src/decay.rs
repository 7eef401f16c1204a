//! Timer-driven fade-out for the controller's channels.
//!
//! Every channel carries its own fade deadline. A single global wake time,
//! the earliest pending deadline, gates the per-channel scan so most polls
//! cost one comparison. When it fires, every channel whose deadline has passed
//! halves and is rescheduled one interval later; channels raised recently keep
//! their later deadlines. The result is independent exponential decay per
//! channel with a half-life of one fade interval.

use crate::{ChannelState, Millis};

/// Receives channel values as they change.
///
/// Implementations must return immediately (set a PWM compare register,
/// update an LED buffer, record for a test). The engine calls it after every
/// raise and every halving.
pub trait OutputDriver {
    /// Drives channel `channel` (physical `pin`) to `value`.
    fn set_output(&mut self, channel: usize, pin: u8, value: u8);
}

impl<T: OutputDriver + ?Sized> OutputDriver for &mut T {
    #[inline]
    fn set_output(&mut self, channel: usize, pin: u8, value: u8) {
        (**self).set_output(channel, pin, value);
    }
}

/// Fixed set of `N` channels with decay scheduling.
///
/// Owns all channel state; the decoder's output is handed in through
/// [`apply`](Self::apply) rather than written to shared globals.
///
/// # Example
///
/// ```rust
/// use lightwave_protocol::{DecayEngine, Millis, OutputDriver};
///
/// struct Null;
/// impl OutputDriver for Null {
///     fn set_output(&mut self, _: usize, _: u8, _: u8) {}
/// }
///
/// let interval = Millis::from_millis(10);
/// let mut engine = DecayEngine::new([3], interval, Millis::ZERO);
/// engine.apply(&[200], Millis::ZERO, &mut Null);
///
/// engine.tick(Millis::from_millis(10), &mut Null);
/// assert_eq!(engine.values(), [100]);
/// ```
#[derive(Debug, Clone)]
pub struct DecayEngine<const N: usize> {
    channels: [ChannelState; N],
    fade_interval: Millis,
    next_fade_time: Millis,
}

impl<const N: usize> DecayEngine<N> {
    /// Creates dark channels on `pins`, first fade check at `now + fade_interval`.
    pub fn new(pins: [u8; N], fade_interval: Millis, now: Millis) -> Self {
        let first = now + fade_interval;
        Self {
            channels: pins.map(|pin| ChannelState::new(pin, first)),
            fade_interval,
            next_fade_time: first,
        }
    }

    /// Channel states in packet order.
    pub fn channels(&self) -> &[ChannelState; N] {
        &self.channels
    }

    /// Current values in packet order.
    pub fn values(&self) -> [u8; N] {
        self.channels.map(|ch| ch.value)
    }

    /// Decay period.
    pub fn fade_interval(&self) -> Millis {
        self.fade_interval
    }

    /// Earliest time the next [`tick`](Self::tick) can do any work.
    pub fn next_fade_time(&self) -> Millis {
        self.next_fade_time
    }

    /// Applies a received intensity vector.
    ///
    /// Each channel takes the larger of its current value and the received
    /// byte. A channel that rises gets a fresh fade deadline and is driven
    /// immediately; lower or equal bytes are ignored. Returns how many
    /// channels rose.
    pub fn apply<D: OutputDriver + ?Sized>(
        &mut self,
        intensities: &[u8; N],
        now: Millis,
        driver: &mut D,
    ) -> usize {
        let mut raised = 0;
        for (index, (channel, &value)) in self.channels.iter_mut().zip(intensities).enumerate() {
            if channel.raise(value, now, self.fade_interval) {
                driver.set_output(index, channel.pin, channel.value);
                raised += 1;
            }
        }
        raised
    }

    /// Runs a decay pass if the global wake time has arrived.
    ///
    /// Channels whose own deadline has passed halve, are driven and get a
    /// deadline of `now + fade_interval`. The next wake time becomes the
    /// earliest of that and any deadline still pending. Returns whether a pass
    /// ran.
    pub fn tick<D: OutputDriver + ?Sized>(&mut self, now: Millis, driver: &mut D) -> bool {
        if now < self.next_fade_time {
            return false;
        }

        let required_next = now + self.fade_interval;
        let mut next_wake = required_next;

        for (index, channel) in self.channels.iter_mut().enumerate() {
            if channel.fade_due(now) {
                channel.halve(required_next);
                driver.set_output(index, channel.pin, channel.value);
            } else {
                next_wake = next_wake.min(channel.next_fade);
            }
        }

        self.next_fade_time = next_wake;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        writes: usize,
        last: [u8; 4],
    }

    impl OutputDriver for Recorder {
        fn set_output(&mut self, channel: usize, _pin: u8, value: u8) {
            self.writes += 1;
            self.last[channel] = value;
        }
    }

    fn ms(v: u64) -> Millis {
        Millis::from_millis(v)
    }

    #[test]
    fn apply_only_raises() {
        let mut out = Recorder::default();
        let mut engine = DecayEngine::new([3, 5, 6, 9], ms(10), ms(0));

        assert_eq!(engine.apply(&[50, 0, 10, 0], ms(1), &mut out), 2);
        assert_eq!(engine.apply(&[30, 0, 10, 1], ms(2), &mut out), 1);
        assert_eq!(engine.values(), [50, 0, 10, 1]);
        assert_eq!(out.writes, 3);
        assert_eq!(out.last, [50, 0, 10, 1]);
    }

    #[test]
    fn tick_waits_for_global_deadline() {
        let mut out = Recorder::default();
        let mut engine = DecayEngine::new([3, 5, 6, 9], ms(10), ms(0));
        engine.apply(&[80, 80, 80, 80], ms(0), &mut out);

        assert!(!engine.tick(ms(9), &mut out));
        assert_eq!(engine.values(), [80; 4]);
        assert!(engine.tick(ms(10), &mut out));
        assert_eq!(engine.values(), [40; 4]);
        assert_eq!(engine.next_fade_time(), ms(20));
    }

    #[test]
    fn recently_raised_channel_keeps_its_deadline() {
        let mut out = Recorder::default();
        let mut engine = DecayEngine::new([3, 5, 6, 9], ms(10), ms(0));
        engine.apply(&[100, 100, 0, 0], ms(0), &mut out);
        // Channel 1 raised again at t=7: its deadline moves to 17.
        engine.apply(&[0, 120, 0, 0], ms(7), &mut out);

        assert!(engine.tick(ms(10), &mut out));
        assert_eq!(engine.values(), [50, 120, 0, 0]);
        assert_eq!(engine.next_fade_time(), ms(17), "wake for the pending channel");

        assert!(engine.tick(ms(17), &mut out));
        assert_eq!(engine.values(), [50, 60, 0, 0]);
        assert_eq!(engine.next_fade_time(), ms(20));
    }

    #[test]
    fn dark_channels_stay_dark() {
        let mut out = Recorder::default();
        let mut engine = DecayEngine::new([3, 5, 6, 9], ms(10), ms(0));
        for t in (10..100).step_by(10) {
            engine.tick(ms(t), &mut out);
        }
        assert_eq!(engine.values(), [0; 4]);
    }
}
