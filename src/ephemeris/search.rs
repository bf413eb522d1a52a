use chrono::{DateTime, Duration, Utc};

const FINE_STEP_MS: i64 = 1_000;

/// Outcome of scanning a window for a downward threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setting {
    At(DateTime<Utc>),
    /// Above the threshold somewhere in the window but never crossed downward.
    AlwaysUp,
    NeverUp,
}

/// Bisect `[before, after]` down to one second for the instant `altitude`
/// crosses `threshold`. Returns the first sampled instant on the far side.
pub fn refine_crossing<E>(
    mut altitude: impl FnMut(DateTime<Utc>) -> Result<f64, E>,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    threshold: f64,
    rising: bool,
) -> Result<DateTime<Utc>, E> {
    let mut low = before;
    let mut high = after;

    while (high - low).num_milliseconds() > FINE_STEP_MS {
        let mid = low + (high - low) / 2;
        let above = altitude(mid)? >= threshold;
        if above == rising {
            high = mid;
        } else {
            low = mid;
        }
    }

    Ok(high)
}

/// Ternary search for the maximum of a unimodal `altitude` on `[low, high]`.
pub fn refine_peak<E>(
    mut altitude: impl FnMut(DateTime<Utc>) -> Result<f64, E>,
    mut low: DateTime<Utc>,
    mut high: DateTime<Utc>,
) -> Result<(DateTime<Utc>, f64), E> {
    while (high - low).num_milliseconds() > FINE_STEP_MS {
        let third = (high - low) / 3;
        let m1 = low + third;
        let m2 = high - third;
        if altitude(m1)? < altitude(m2)? {
            low = m1;
        } else {
            high = m2;
        }
    }
    let mid = low + (high - low) / 2;
    Ok((mid, altitude(mid)?))
}

/// Find the first time after `start` that `altitude` drops below `threshold`.
pub fn next_setting<E>(
    mut altitude: impl FnMut(DateTime<Utc>) -> Result<f64, E>,
    start: DateTime<Utc>,
    window: Duration,
    step: Duration,
    threshold: f64,
) -> Result<Setting, E> {
    let end = start + window;
    let mut prev_time = start;
    let mut prev_above = altitude(start)? >= threshold;
    let mut seen_above = prev_above;
    let mut cursor = start;

    while cursor < end {
        cursor += step;
        let above = altitude(cursor)? >= threshold;
        if prev_above && !above {
            let exact = refine_crossing(&mut altitude, prev_time, cursor, threshold, false)?;
            return Ok(Setting::At(exact));
        }
        seen_above |= above;
        prev_above = above;
        prev_time = cursor;
    }

    Ok(if seen_above {
        Setting::AlwaysUp
    } else {
        Setting::NeverUp
    })
}
