use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use strum_macros::Display;

pub const SYNODIC_MONTH_DAYS: f64 = 29.53058867;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PhaseName {
    #[strum(serialize = "New Moon")]
    New,
    #[strum(serialize = "Waxing Crescent")]
    WaxingCrescent,
    #[strum(serialize = "First Quarter")]
    FirstQuarter,
    #[strum(serialize = "Waxing Gibbous")]
    WaxingGibbous,
    #[strum(serialize = "Full Moon")]
    Full,
    #[strum(serialize = "Waning Gibbous")]
    WaningGibbous,
    #[strum(serialize = "Last Quarter")]
    LastQuarter,
    #[strum(serialize = "Waning Crescent")]
    WaningCrescent,
}

/// Eighth-of-a-cycle bins centred on the principal phases.
pub fn phase_name(fraction: f64) -> PhaseName {
    match fraction {
        f if f < 0.0625 => PhaseName::New,
        f if f < 0.1875 => PhaseName::WaxingCrescent,
        f if f < 0.3125 => PhaseName::FirstQuarter,
        f if f < 0.4375 => PhaseName::WaxingGibbous,
        f if f < 0.5625 => PhaseName::Full,
        f if f < 0.6875 => PhaseName::WaningGibbous,
        f if f < 0.8125 => PhaseName::LastQuarter,
        f if f < 0.9375 => PhaseName::WaningCrescent,
        _ => PhaseName::New,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoonPhase {
    pub name: String,
    pub age_days: f64,
    pub illumination_pct: f64,
}

fn reference_new_moon() -> DateTime<Utc> {
    // 2000-01-06 18:14 UTC
    Utc.timestamp_opt(947_182_440, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}

pub fn moon_phase(now: DateTime<Utc>) -> MoonPhase {
    let days_since = (now - reference_new_moon()).num_milliseconds() as f64 / 86_400_000.0;
    let age = days_since.rem_euclid(SYNODIC_MONTH_DAYS);
    let fraction = age / SYNODIC_MONTH_DAYS;
    let illumination = (1.0 - (2.0 * std::f64::consts::PI * fraction).cos()) / 2.0;

    MoonPhase {
        name: phase_name(fraction).to_string(),
        age_days: round1(age),
        illumination_pct: round1(illumination * 100.0),
    }
}
