mod element_cache;
mod error;
mod pass_finder;
mod types;
mod visible;

use chrono::{DateTime, Utc};

use crate::config::PassSearchConfig;
use crate::ephemeris::Satellite;
use crate::http::TextFetcher;
use crate::observer::{civil_offset_hours, Observer, Site};

pub use element_cache::{ElementCache, ElementStore, FileElementStore};
pub use error::PredictError;
pub use pass_finder::PassFinder;
pub use types::{SearchOutcome, VisiblePass};
pub use visible::{search_visible_pass, SunModel};

#[cfg(test)]
pub(crate) use element_cache::{tests as cache_fixtures, CacheError};

/// Next visible pass of the cached satellite over one site.
pub struct PassPredictor<S, F> {
    cache: ElementCache<S, F>,
    site: Site,
    search: PassSearchConfig,
}

impl<S: ElementStore, F: TextFetcher> PassPredictor<S, F> {
    pub fn new(cache: ElementCache<S, F>, site: Site, search: PassSearchConfig) -> Self {
        Self {
            cache,
            site,
            search,
        }
    }

    pub fn next_visible_pass(&self, now: DateTime<Utc>) -> Result<SearchOutcome, PredictError> {
        let record = self.cache.get(now)?;
        let satellite = Satellite::from_tle(&record.name, &record.line1, &record.line2)?;
        log::info!(
            "Searching visible passes of {} (NORAD {})",
            satellite.name(),
            satellite.norad_id()
        );

        let finder = PassFinder::new(&satellite, self.search.look_ahead);
        let outcome = search_visible_pass(
            &finder,
            &SunModel,
            Observer::new(&self.site, Some(now)),
            &self.search,
            civil_offset_hours(now),
        )?;

        match &outcome {
            SearchOutcome::Found(pass) => log::info!(
                "Next visible pass {} {} peaking at {} deg",
                pass.date,
                pass.time,
                pass.max_alt
            ),
            SearchOutcome::Exhausted { attempts } => {
                log::info!("No visible pass after {} attempts", attempts)
            }
        }
        Ok(outcome)
    }
}
