//! Per-channel controller state.

use crate::Millis;

/// One output channel on the controller.
///
/// `value` rises only when a packet carries a larger intensity and falls only
/// through [`halve`](Self::halve), which the decay engine calls when
/// `next_fade` has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelState {
    /// Physical output pin driven by this channel.
    pub pin: u8,
    /// Current output value.
    pub value: u8,
    /// When this channel next halves if nothing raises it first.
    pub next_fade: Millis,
}

impl ChannelState {
    /// A dark channel on `pin` whose first fade is due at `next_fade`.
    pub const fn new(pin: u8, next_fade: Millis) -> Self {
        Self {
            pin,
            value: 0,
            next_fade,
        }
    }

    /// Raises the value to `value` if it is larger.
    ///
    /// On a raise the fade deadline moves to `now + fade_interval` and `true`
    /// is returned; otherwise the channel is untouched.
    #[inline]
    pub fn raise(&mut self, value: u8, now: Millis, fade_interval: Millis) -> bool {
        if value <= self.value {
            return false;
        }
        self.value = value;
        self.next_fade = now + fade_interval;
        true
    }

    /// Whether the fade deadline has passed at `now`.
    #[inline]
    pub fn fade_due(&self, now: Millis) -> bool {
        self.next_fade <= now
    }

    /// Halves the value (rounding toward zero) and schedules the next fade.
    #[inline]
    pub fn halve(&mut self, next_fade: Millis) {
        self.value >>= 1;
        self.next_fade = next_fade;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_ignores_lower_and_equal() {
        let mut ch = ChannelState::new(3, Millis::ZERO);
        assert!(ch.raise(50, Millis::from_millis(1), Millis::from_millis(10)));
        assert!(!ch.raise(30, Millis::from_millis(2), Millis::from_millis(10)));
        assert!(!ch.raise(50, Millis::from_millis(3), Millis::from_millis(10)));
        assert_eq!(ch.value, 50);
        assert_eq!(ch.next_fade, Millis::from_millis(11));
    }

    #[test]
    fn halve_rounds_toward_zero() {
        let mut ch = ChannelState::new(5, Millis::ZERO);
        ch.value = 25;
        ch.halve(Millis::from_millis(10));
        assert_eq!(ch.value, 12);
        ch.value = 1;
        ch.halve(Millis::from_millis(20));
        assert_eq!(ch.value, 0);
        assert_eq!(ch.next_fade, Millis::from_millis(20));
    }
}
