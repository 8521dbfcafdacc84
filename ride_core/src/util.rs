//! Common time/period helpers for ride_core.

/// Number of microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;
/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Compute the period in microseconds for a given tick rate in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero.
/// - Ensures result is at least 1 microsecond.
#[inline]
pub fn period_us(hz: u32) -> u64 {
    (MICROS_PER_SEC / u64::from(hz.max(1))).max(1)
}

/// Compute the period in milliseconds for a given tick rate in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero.
/// - Ensures result is at least 1 millisecond.
#[inline]
pub fn period_ms(hz: u32) -> u64 {
    (MILLIS_PER_SEC / u64::from(hz.max(1))).max(1)
}

/// Milliseconds from `since` to `now` on a counter that may wrap.
///
/// Correct as long as the true interval is shorter than one full counter
/// period, which a monotonic ms counter guarantees for any realistic uptime.
#[inline]
pub fn elapsed_ms(now: u64, since: u64) -> u64 {
    now.wrapping_sub(since)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_clamp_zero_hz() {
        assert_eq!(period_ms(0), 1000);
        assert_eq!(period_us(0), 1_000_000);
        assert_eq!(period_ms(5), 200);
        assert_eq!(period_ms(5000), 1);
    }

    #[test]
    fn elapsed_survives_wraparound() {
        assert_eq!(elapsed_ms(1500, 300), 1200);
        assert_eq!(elapsed_ms(99, u64::MAX - 100), 200);
    }
}
