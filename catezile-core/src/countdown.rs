//! Countdown state for a target instant.
//!
//! Everything here is a pure function of its inputs. Whoever displays the
//! countdown owns the tick timer and calls [`compute_state`] on every tick.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::CateZileResult;
use crate::format::{Unit, quantity, resolve_locale};
use crate::instant::{InstantInput, parse_instant};

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// How long a live-capable target (a fixture) stays `Live` after its start.
pub const DEFAULT_LIVE_WINDOW_MINUTES: i64 = 120;

pub fn default_live_window() -> Duration {
    Duration::minutes(DEFAULT_LIVE_WINDOW_MINUTES)
}

/// A non-negative span split into whole days, hours, minutes, seconds and the
/// sub-second remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimeLeft {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub millis: u16,
}

impl TimeLeft {
    /// Recompose the exact millisecond count this was decomposed from.
    pub fn total_millis(&self) -> u64 {
        self.days * MS_PER_DAY
            + u64::from(self.hours) * MS_PER_HOUR
            + u64::from(self.minutes) * MS_PER_MINUTE
            + u64::from(self.seconds) * MS_PER_SECOND
            + u64::from(self.millis)
    }

    pub fn is_zero(&self) -> bool {
        self.total_millis() == 0
    }
}

/// Exact floor-division decomposition of a millisecond count.
pub fn decompose(duration_ms: u64) -> TimeLeft {
    let days = duration_ms / MS_PER_DAY;
    let rem = duration_ms % MS_PER_DAY;

    TimeLeft {
        days,
        hours: (rem / MS_PER_HOUR) as u8,
        minutes: (rem % MS_PER_HOUR / MS_PER_MINUTE) as u8,
        seconds: (rem % MS_PER_MINUTE / MS_PER_SECOND) as u8,
        millis: (rem % MS_PER_SECOND) as u16,
    }
}

/// Positive gap rounded up to whole milliseconds, so a sub-millisecond gap
/// still counts as 1 ms.
fn remaining_millis(gap: Duration) -> u64 {
    let floor = gap.num_milliseconds();
    let ceil = if gap > Duration::milliseconds(floor) {
        floor + 1
    } else {
        floor
    };
    ceil.unsigned_abs()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "remaining", rename_all = "lowercase")]
pub enum CountdownState {
    /// Target still ahead; never carries a zero span.
    Pending(TimeLeft),
    /// A live-capable target has started and is inside its live window.
    Live,
    Elapsed,
}

impl CountdownState {
    pub fn is_elapsed(&self) -> bool {
        matches!(self, CountdownState::Elapsed)
    }
}

/// Countdown state using [`default_live_window`].
pub fn compute_state(
    now: DateTime<Utc>,
    target: DateTime<Utc>,
    live_capable: bool,
) -> CountdownState {
    compute_state_with_window(now, target, live_capable, default_live_window())
}

/// Countdown state for `target` as seen at `now`.
///
/// A live-capable target is `Live` from `target` through `target + window`
/// inclusive; a negative window counts as zero.
pub fn compute_state_with_window(
    now: DateTime<Utc>,
    target: DateTime<Utc>,
    live_capable: bool,
    window: Duration,
) -> CountdownState {
    if now < target {
        return CountdownState::Pending(decompose(remaining_millis(target - now)));
    }

    if live_capable && now - target <= window.max(Duration::zero()) {
        CountdownState::Live
    } else {
        CountdownState::Elapsed
    }
}

/// Validate a countdown target given in any supported representation.
pub fn parse_target(input: impl Into<InstantInput>) -> CateZileResult<DateTime<Utc>> {
    parse_instant(input)
}

/// A countdown target together with its live behaviour.
///
/// Holds no timer; call [`Countdown::state_at`] from whatever drives the display.
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    pub target: DateTime<Utc>,
    pub live_capable: bool,
    pub live_window: Duration,
}

impl Countdown {
    pub fn new(target: DateTime<Utc>, live_capable: bool) -> Self {
        Countdown {
            target,
            live_capable,
            live_window: default_live_window(),
        }
    }

    pub fn parse(input: impl Into<InstantInput>, live_capable: bool) -> CateZileResult<Self> {
        Ok(Countdown::new(parse_target(input)?, live_capable))
    }

    pub fn with_live_window(mut self, window: Duration) -> Self {
        self.live_window = window;
        self
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> CountdownState {
        compute_state_with_window(now, self.target, self.live_capable, self.live_window)
    }
}

/// Display string for a state: `3 zile 04:05:06`, `ÎN DESFĂȘURARE`, `Încheiat`.
pub fn render_state(state: &CountdownState, locale: &str) -> String {
    let locale = resolve_locale(locale);
    let romanian = matches!(locale, chrono::Locale::ro_RO);

    match state {
        CountdownState::Pending(left) => {
            let clock = format!("{:02}:{:02}:{:02}", left.hours, left.minutes, left.seconds);
            if left.days == 0 {
                clock
            } else {
                format!("{} {}", quantity(left.days, Unit::Day, locale), clock)
            }
        }
        CountdownState::Live if romanian => "ÎN DESFĂȘURARE".to_string(),
        CountdownState::Live => "LIVE".to_string(),
        CountdownState::Elapsed if romanian => "Încheiat".to_string(),
        CountdownState::Elapsed => "Ended".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 12, h, m, s).unwrap()
    }

    #[test]
    fn test_decompose_zero_is_all_zero() {
        assert_eq!(decompose(0), TimeLeft::default());
        assert!(decompose(0).is_zero());
    }

    #[test]
    fn test_decompose_fields() {
        let ms = 3 * MS_PER_DAY + 4 * MS_PER_HOUR + 5 * MS_PER_MINUTE + 6 * MS_PER_SECOND + 7;
        assert_eq!(
            decompose(ms),
            TimeLeft {
                days: 3,
                hours: 4,
                minutes: 5,
                seconds: 6,
                millis: 7,
            }
        );
    }

    #[test]
    fn test_decompose_recomposes_exactly() {
        let samples = [
            1,
            999,
            1_000,
            59_999,
            MS_PER_HOUR - 1,
            MS_PER_DAY,
            MS_PER_DAY - 1,
            123_456_789,
            9_876_543_210_123,
            u64::MAX / 2,
            u64::MAX,
        ];
        for ms in samples {
            let left = decompose(ms);
            assert_eq!(left.total_millis(), ms, "recomposition failed for {}", ms);
            assert!(left.hours < 24 && left.minutes < 60);
            assert!(left.seconds < 60 && left.millis < 1000);
        }

        // Whole seconds recompose without the sub-second field
        for secs in [0u64, 1, 61, 3_601, 86_399, 86_400, 31_536_000] {
            let ms = secs * 1_000;
            let left = decompose(ms);
            assert_eq!(left.millis, 0);
            assert_eq!(
                left.days * 86_400_000
                    + u64::from(left.hours) * 3_600_000
                    + u64::from(left.minutes) * 60_000
                    + u64::from(left.seconds) * 1_000,
                ms
            );
        }
    }

    #[test]
    fn test_future_target_is_pending_with_exact_remaining() {
        let now = at(12, 0, 0);
        let new_year = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        for target in [at(12, 0, 1), at(13, 30, 15), new_year] {
            match compute_state(now, target, false) {
                CountdownState::Pending(left) => {
                    assert_eq!(left.total_millis() as i64, (target - now).num_milliseconds());
                }
                other => panic!("expected Pending for {}, got {:?}", target, other),
            }
        }
    }

    #[test]
    fn test_sub_millisecond_gap_rounds_up() {
        let target = at(15, 0, 0);

        let half_ms = target - Duration::microseconds(500);
        match compute_state(half_ms, target, false) {
            CountdownState::Pending(left) => assert_eq!(left.total_millis(), 1),
            other => panic!("expected Pending, got {:?}", other),
        }

        let one_ns = target - Duration::nanoseconds(1);
        assert_eq!(
            compute_state(one_ns, target, true),
            CountdownState::Pending(decompose(1))
        );

        let just_over = target - Duration::microseconds(1_500);
        assert_eq!(
            compute_state(just_over, target, true),
            CountdownState::Pending(decompose(2))
        );
    }

    #[test]
    fn test_exact_target_is_never_zero_pending() {
        let target = at(15, 0, 0);
        assert_eq!(compute_state(target, target, true), CountdownState::Live);
        assert_eq!(compute_state(target, target, false), CountdownState::Elapsed);
        assert_eq!(
            compute_state_with_window(target, target, true, Duration::zero()),
            CountdownState::Live
        );
    }

    #[test]
    fn test_elapsed_is_permanent_for_non_live_targets() {
        let target = at(15, 0, 0);
        let mut now = target;
        for _ in 0..100 {
            assert_eq!(compute_state(now, target, false), CountdownState::Elapsed);
            now += Duration::minutes(37);
        }
    }

    #[test]
    fn test_live_window_for_fixtures() {
        let target = at(15, 0, 0);

        assert_eq!(compute_state(at(16, 59, 59), target, true), CountdownState::Live);
        assert_eq!(compute_state(at(17, 0, 0), target, true), CountdownState::Live);
        assert_eq!(compute_state(at(17, 0, 1), target, true), CountdownState::Elapsed);

        let short = Countdown::new(target, true).with_live_window(Duration::minutes(5));
        assert_eq!(short.state_at(at(15, 4, 0)), CountdownState::Live);
        assert_eq!(short.state_at(at(15, 6, 0)), CountdownState::Elapsed);

        let negative = Countdown::new(target, true).with_live_window(Duration::minutes(-5));
        assert_eq!(negative.state_at(target), CountdownState::Live);
    }

    #[test]
    fn test_countdown_parse_rejects_bad_target() {
        assert!(Countdown::parse("2025-02-30T10:00:00Z", false).is_err());

        let countdown = Countdown::parse("2025-08-12T18:00", true).unwrap();
        assert_eq!(countdown.target, at(15, 0, 0));
    }

    #[test]
    fn test_render_state() {
        let left =
            decompose(3 * MS_PER_DAY + 4 * MS_PER_HOUR + 5 * MS_PER_MINUTE + 6 * MS_PER_SECOND);
        let pending = CountdownState::Pending(left);

        assert_eq!(render_state(&pending, "ro"), "3 zile 04:05:06");
        assert_eq!(render_state(&pending, "en"), "3 days 04:05:06");
        assert_eq!(render_state(&CountdownState::Pending(decompose(59_000)), "ro"), "00:00:59");
        assert_eq!(render_state(&CountdownState::Live, "ro"), "ÎN DESFĂȘURARE");
        assert_eq!(render_state(&CountdownState::Elapsed, "en"), "Ended");
    }
}
