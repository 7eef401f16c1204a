//! The controller's main-loop step.

use crate::{ByteSource, DecayEngine, FrameDecoder, Millis, OutputDriver};

/// Decoder plus decay engine, polled once per firmware loop iteration.
///
/// Within one [`poll`](Self::poll) the decay check runs before the serial
/// scan, so a packet arriving in the same iteration as a due fade always lands
/// after the halving and is never undone by it.
///
/// # Example
///
/// ```rust,ignore
/// let mut controller = Controller::<BAND_COUNT>::new(PINS, DEFAULT_FADE_INTERVAL, clock.now());
/// loop {
///     controller.poll(clock.now(), &mut uart, &mut pwm);
///     // other firmware duties
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Controller<const N: usize> {
    decoder: FrameDecoder<N>,
    engine: DecayEngine<N>,
}

impl<const N: usize> Controller<N> {
    /// Creates a controller with dark channels on `pins`.
    pub fn new(pins: [u8; N], fade_interval: Millis, now: Millis) -> Self {
        Self {
            decoder: FrameDecoder::new(),
            engine: DecayEngine::new(pins, fade_interval, now),
        }
    }

    /// The packet decoder.
    pub fn decoder(&self) -> &FrameDecoder<N> {
        &self.decoder
    }

    /// The channel state and decay schedule.
    pub fn engine(&self) -> &DecayEngine<N> {
        &self.engine
    }

    /// Current channel values in packet order.
    pub fn values(&self) -> [u8; N] {
        self.engine.values()
    }

    /// One loop iteration: decay pass if due, then apply every complete packet
    /// buffered in `source`.
    ///
    /// Returns the number of packets applied.
    pub fn poll<S, D>(&mut self, now: Millis, source: &mut S, driver: &mut D) -> usize
    where
        S: ByteSource + ?Sized,
        D: OutputDriver + ?Sized,
    {
        self.engine.tick(now, driver);

        let mut applied = 0;
        while let Some(frame) = self.decoder.poll(source) {
            self.engine.apply(&frame, now, driver);
            applied += 1;
        }

        #[cfg(feature = "tracing")]
        if applied > 1 {
            tracing::debug!(applied, "drained packet backlog");
        }

        applied
    }
}
