use gloo::timers::callback::{Interval, Timeout};

const TICK_MILLIS: u32 = 1000;

/// One-second browser timer. Dropping it clears the interval.
pub(crate) struct Ticker {
    interval: Interval,
}

impl Ticker {
    pub(crate) fn every_second(callback: impl FnMut() + 'static) -> Self {
        Self {
            interval: Interval::new(TICK_MILLIS, callback),
        }
    }

    /// Clears the interval now and releases its callback on a later turn of the event loop, so a
    /// ticker can be stopped from inside its own callback.
    pub(crate) fn stop(self) {
        let callback = self.interval.cancel();
        Timeout::new(0, move || drop(callback)).forget();
    }
}
