//! Event timestamp units.
//!
//! Event timestamps are counts of a fixed 100 ns clock. The header's
//! `timestamp_frequency` field is informational only; all conversions go
//! through the constants here.

/// Duration of one timestamp tick in seconds.
pub const TICK_SECONDS: f64 = 100e-9;

/// Number of ticks per second.
pub const TICKS_PER_SECOND: f64 = 10_000_000.0;

/// Relative distance below which a converted value snaps to a whole tick.
const TICK_SNAP: f64 = 1e-9;

/// Converts a tick count (or fractional tick edge) to seconds.
#[inline]
#[must_use]
pub fn ticks_to_seconds(ticks: f64) -> f64 {
    ticks / TICKS_PER_SECOND
}

/// Converts seconds to fractional ticks.
///
/// Decimal seconds such as `2.5e-6` are not exact in binary, so a product
/// within rounding noise of a whole tick is returned as that tick. An
/// event stamped exactly on an edge then falls in the bin the edge opens.
#[inline]
#[must_use]
pub fn seconds_to_ticks(seconds: f64) -> f64 {
    let ticks = seconds * TICKS_PER_SECOND;
    let nearest = ticks.round();
    if (ticks - nearest).abs() <= TICK_SNAP * nearest.abs().max(1.0) {
        nearest
    } else {
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tick_resolution() {
        assert_relative_eq!(TICK_SECONDS * TICKS_PER_SECOND, 1.0);
        assert_relative_eq!(ticks_to_seconds(10_000_000.0), 1.0);
        assert_relative_eq!(seconds_to_ticks(1.5), 15_000_000.0);
    }

    #[test]
    fn test_decimal_seconds_land_on_whole_ticks() {
        for tick in 1..200_000u32 {
            let seconds: f64 = format!("{tick}e-7").parse().unwrap();
            assert_eq!(seconds_to_ticks(seconds), f64::from(tick), "{seconds}");
            assert_eq!(ticks_to_seconds(f64::from(tick)), seconds);
        }
        assert_relative_eq!(seconds_to_ticks(0.5e-7), 0.5);
    }

    #[test]
    fn test_conversion_round_trip() {
        for seconds in [0.0, 1e-7, 0.25, 3600.0] {
            assert_relative_eq!(ticks_to_seconds(seconds_to_ticks(seconds)), seconds);
        }
    }
}
