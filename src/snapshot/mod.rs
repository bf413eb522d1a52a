mod writer;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::config::PlanetConfig;
use crate::http::TextFetcher;
use crate::observer::{Observer, Site};
use crate::predict::{ElementStore, PassPredictor, PredictError, SearchOutcome, VisiblePass};
use crate::widgets::{
    moon_phase, sun_times, visible_planets, AuroraError, AuroraReading, AuroraWatch, MoonPhase,
    PlanetReport, SunTimes,
};

pub use writer::{to_pretty_json, SnapshotWriter};

/// One tile's result, or the message explaining why it is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Widget<T> {
    Ready(T),
    Failed { error: String },
}

impl<T> Widget<T> {
    pub fn from_result<E: std::fmt::Display>(name: &str, result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Widget::Ready(value),
            Err(e) => {
                log::warn!("{} widget failed: {}", name, e);
                Widget::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Widget::Ready(_))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Widgets {
    pub sun: Widget<SunTimes>,
    pub moon: Widget<MoonPhase>,
    pub planets: Widget<PlanetReport>,
    pub aurora: Widget<AuroraReading>,
    pub iss: Widget<VisiblePass>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    #[serde(serialize_with = "rfc3339_utc")]
    pub timestamp: DateTime<Utc>,
    pub widgets: Widgets,
}

fn rfc3339_utc<S: Serializer>(t: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Secs, true))
}

pub trait AuroraStatus {
    fn aurora(&self) -> Result<AuroraReading, AuroraError>;
}

impl<F: TextFetcher> AuroraStatus for AuroraWatch<F> {
    fn aurora(&self) -> Result<AuroraReading, AuroraError> {
        self.current()
    }
}

#[derive(Debug, Error)]
pub enum PassWidgetError {
    #[error("No visible pass soon")]
    NoneSoon,
    #[error("{0}")]
    Predict(#[from] PredictError),
}

pub trait NextPass {
    fn next_pass(&self, now: DateTime<Utc>) -> Result<VisiblePass, PassWidgetError>;
}

impl<S: ElementStore, F: TextFetcher> NextPass for PassPredictor<S, F> {
    fn next_pass(&self, now: DateTime<Utc>) -> Result<VisiblePass, PassWidgetError> {
        match self.next_visible_pass(now)? {
            SearchOutcome::Found(pass) => Ok(pass),
            SearchOutcome::Exhausted { .. } => Err(PassWidgetError::NoneSoon),
        }
    }
}

/// Runs every calculator for one instant. A failing tile never affects the others.
pub struct Assembler<'a> {
    site: Site,
    planets: PlanetConfig,
    aurora: &'a dyn AuroraStatus,
    passes: &'a dyn NextPass,
}

impl<'a> Assembler<'a> {
    pub fn new(
        site: Site,
        planets: PlanetConfig,
        aurora: &'a dyn AuroraStatus,
        passes: &'a dyn NextPass,
    ) -> Self {
        Self {
            site,
            planets,
            aurora,
            passes,
        }
    }

    pub fn assemble(&self, now: DateTime<Utc>) -> Snapshot {
        let observer = Observer::new(&self.site, Some(now));

        let widgets = Widgets {
            sun: Widget::Ready(sun_times(&observer)),
            moon: Widget::Ready(moon_phase(now)),
            planets: Widget::from_result("planets", visible_planets(&observer, &self.planets)),
            aurora: Widget::from_result("aurora", self.aurora.aurora()),
            iss: Widget::from_result("iss", self.passes.next_pass(now)),
        };

        let ready = [
            widgets.sun.is_ready(),
            widgets.moon.is_ready(),
            widgets.planets.is_ready(),
            widgets.aurora.is_ready(),
            widgets.iss.is_ready(),
        ]
        .iter()
        .filter(|r| **r)
        .count();
        log::info!("Assembled snapshot at {} ({}/5 widgets ready)", now, ready);

        Snapshot {
            timestamp: now,
            widgets,
        }
    }
}
