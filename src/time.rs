use chrono::Utc;

/// Milliseconds since the UNIX epoch.
pub fn now_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Injectable time source so TTL logic is testable with frozen time.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        now_ms()
    }
}
