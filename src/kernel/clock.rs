use {
    std::sync::RwLock,
    time::{
        Duration,
        OffsetDateTime,
    },
};

/// Source of "now" for every deadline decision. Deadlines are real-time, so
/// workflows must read the clock fresh for each decision instead of caching
/// a timestamp across a request boundary.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock that only moves when told to. Used by tests to sit exactly on
/// either side of a deadline or a grace window.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.write().expect("clock lock poisoned");
        *now += duration;
    }

    pub fn set(&self, instant: OffsetDateTime) {
        *self.now.write().expect("clock lock poisoned") = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.read().expect("clock lock poisoned")
    }
}
