use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizonEvent {
    pub time: DateTime<Utc>,
    pub azimuth_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Culmination {
    pub time: DateTime<Utc>,
    pub altitude_deg: f64,
}

/// One horizon-to-horizon transit. Any part may be missing when the pass
/// straddles the edge of the search window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PassCandidate {
    pub rise: Option<HorizonEvent>,
    pub culmination: Option<Culmination>,
    pub set: Option<HorizonEvent>,
}

/// A pass bright and high enough to be worth looking for, in local clock time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisiblePass {
    pub time: String,
    pub date: String,
    pub max_alt: i64,
    pub rise_dir: String,
    pub set_dir: String,
    pub duration_min: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(VisiblePass),
    Exhausted { attempts: usize },
}
