// Clock Port (for testability)

use chrono::{DateTime, Local};

/// Wall-clock interface (allows pinning the launch line timestamp in tests)
pub trait Clock: Send + Sync {
    /// Current local time
    fn now_local(&self) -> DateTime<Local>;

    /// Milliseconds since epoch, for duration tracking
    fn now_millis(&self) -> i64 {
        self.now_local().timestamp_millis()
    }
}

/// System clock (production)
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_local(&self) -> DateTime<Local> {
        Local::now()
    }
}

pub mod mocks {
    use super::*;

    /// Clock frozen at a single instant
    pub struct FixedClock(pub DateTime<Local>);

    impl Clock for FixedClock {
        fn now_local(&self) -> DateTime<Local> {
            self.0
        }
    }
}
