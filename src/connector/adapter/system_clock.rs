use std::sync::Mutex;

use chrono::{DateTime, Duration, SubsecRound, Utc};

use crate::application::Clock;

/// Wall-clock time in UTC, truncated to microseconds so that values survive
/// a round trip through storage unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}

/// Clock that only moves when told to. Used to make timestamps deterministic.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now.trunc_subsecs(6)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_has_microsecond_precision() {
        let now = SystemClock::new().now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_fixed_clock_advances_only_on_request() {
        let start = Utc::now();
        let clock = FixedClock::new(start);
        let first = clock.now();

        assert_eq!(clock.now(), first);

        clock.advance(Duration::seconds(5));
        assert_eq!(clock.now(), first + Duration::seconds(5));
    }
}
