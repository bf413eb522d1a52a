use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::SatelliteConfig;
use crate::http::{FetchError, TextFetcher};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("malformed element block: {0}")]
    Malformed(String),
}

/// One satellite's element set as persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub fetched_at: DateTime<Utc>,
    pub name: String,
    pub line1: String,
    pub line2: String,
}

impl ElementRecord {
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.fetched_at < max_age
    }
}

pub trait ElementStore {
    fn get(&self, key: &str) -> Result<Option<ElementRecord>, CacheError>;
    fn put(&self, key: &str, record: &ElementRecord) -> Result<(), CacheError>;
}

impl<T: ElementStore + ?Sized> ElementStore for &T {
    fn get(&self, key: &str) -> Result<Option<ElementRecord>, CacheError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, record: &ElementRecord) -> Result<(), CacheError> {
        (**self).put(key, record)
    }
}

/// Stores each record as `<dir>/<key>_tle.json`.
pub struct FileElementStore {
    dir: PathBuf,
}

impl FileElementStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}_tle.json"))
    }
}

impl ElementStore for FileElementStore {
    fn get(&self, key: &str) -> Result<Option<ElementRecord>, CacheError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn put(&self, key: &str, record: &ElementRecord) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string(record)?)?;
        // Readers see either the old record or the new one.
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Read-through cache for a single satellite's elements.
pub struct ElementCache<S, F> {
    key: String,
    url: String,
    max_age: Duration,
    store: S,
    fetcher: F,
}

impl<S: ElementStore, F: TextFetcher> ElementCache<S, F> {
    pub fn new(config: &SatelliteConfig, store: S, fetcher: F) -> Self {
        Self {
            key: config.key.clone(),
            url: config.elements_url(),
            max_age: config.max_age,
            store,
            fetcher,
        }
    }

    pub fn get(&self, now: DateTime<Utc>) -> Result<ElementRecord, CacheError> {
        match self.store.get(&self.key) {
            Ok(Some(record)) if record.is_fresh(now, self.max_age) => {
                log::debug!(
                    "Using cached elements for {} from {}",
                    record.name,
                    record.fetched_at
                );
                return Ok(record);
            }
            Ok(Some(record)) => {
                log::info!("Cached elements for {} are stale, refetching", record.name)
            }
            Ok(None) => log::info!("No cached elements for {}, fetching", self.key),
            Err(e) => log::warn!("Ignoring unreadable element cache for {}: {}", self.key, e),
        }

        let text = self.fetcher.get_text(&self.url)?;
        let (name, line1, line2) = parse_element_block(&text)?;
        let record = ElementRecord {
            fetched_at: now,
            name,
            line1,
            line2,
        };
        self.store.put(&self.key, &record)?;
        log::info!("Fetched fresh elements for {}", record.name);
        Ok(record)
    }
}

/// Split a name + two-line block, ignoring blank lines and surrounding whitespace.
pub fn parse_element_block(text: &str) -> Result<(String, String, String), CacheError> {
    let lines: Vec<&str> = text
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    match lines.as_slice() {
        [name, line1, line2, ..] => Ok((name.to_string(), line1.to_string(), line2.to_string())),
        _ => Err(CacheError::Malformed(format!(
            "expected 3 lines, got {}",
            lines.len()
        ))),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ephemeris::satellite_fixtures::{ISS_LINE1, ISS_LINE2, ISS_NAME};
    use chrono::TimeZone;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct MemoryElementStore {
        records: RefCell<HashMap<String, ElementRecord>>,
        pub writes: Cell<usize>,
    }

    impl MemoryElementStore {
        pub fn with(key: &str, record: ElementRecord) -> Self {
            let store = Self::default();
            store.records.borrow_mut().insert(key.to_string(), record);
            store
        }
    }

    impl ElementStore for MemoryElementStore {
        fn get(&self, key: &str) -> Result<Option<ElementRecord>, CacheError> {
            Ok(self.records.borrow().get(key).cloned())
        }

        fn put(&self, key: &str, record: &ElementRecord) -> Result<(), CacheError> {
            self.writes.set(self.writes.get() + 1);
            self.records
                .borrow_mut()
                .insert(key.to_string(), record.clone());
            Ok(())
        }
    }

    /// Serves a fixed body and counts requests.
    pub struct CannedFetcher {
        body: Result<String, u16>,
        pub calls: Cell<usize>,
    }

    impl CannedFetcher {
        pub fn ok(body: &str) -> Self {
            Self {
                body: Ok(body.to_string()),
                calls: Cell::new(0),
            }
        }

        pub fn status(code: u16) -> Self {
            Self {
                body: Err(code),
                calls: Cell::new(0),
            }
        }

        pub fn iss() -> Self {
            Self::ok(&format!("{ISS_NAME}\r\n{ISS_LINE1}\r\n{ISS_LINE2}\r\n"))
        }
    }

    impl TextFetcher for CannedFetcher {
        fn get_text(&self, url: &str) -> Result<String, FetchError> {
            self.calls.set(self.calls.get() + 1);
            self.body.clone().map_err(|status| FetchError::Status {
                url: url.to_string(),
                status,
            })
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap()
    }

    fn record_aged(hours: i64) -> ElementRecord {
        ElementRecord {
            fetched_at: now() - Duration::hours(hours),
            name: "CACHED".to_string(),
            line1: ISS_LINE1.to_string(),
            line2: ISS_LINE2.to_string(),
        }
    }

    #[test]
    fn fresh_record_skips_network() {
        let store = MemoryElementStore::with("iss", record_aged(23));
        let fetcher = CannedFetcher::iss();
        let cache = ElementCache::new(&SatelliteConfig::default(), &store, &fetcher);

        let record = cache.get(now()).unwrap();
        assert_eq!(record.name, "CACHED");
        assert_eq!(fetcher.calls.get(), 0);
        assert_eq!(store.writes.get(), 0);
    }

    #[test]
    fn stale_record_is_refetched_once() {
        let store = MemoryElementStore::with("iss", record_aged(25));
        let fetcher = CannedFetcher::iss();
        let cache = ElementCache::new(&SatelliteConfig::default(), &store, &fetcher);

        let record = cache.get(now()).unwrap();
        assert_eq!(record.name, ISS_NAME);
        assert_eq!(record.fetched_at, now());
        assert_eq!(fetcher.calls.get(), 1);
        assert_eq!(store.writes.get(), 1);

        // The refreshed record now satisfies the next read.
        cache.get(now() + Duration::hours(1)).unwrap();
        assert_eq!(fetcher.calls.get(), 1);
    }

    #[test]
    fn missing_record_is_fetched() {
        let store = MemoryElementStore::default();
        let fetcher = CannedFetcher::iss();
        let cache = ElementCache::new(&SatelliteConfig::default(), &store, &fetcher);
        assert_eq!(cache.get(now()).unwrap().line1, ISS_LINE1);
        assert_eq!(fetcher.calls.get(), 1);
    }

    #[test]
    fn fetch_failures_propagate() {
        let store = MemoryElementStore::default();
        let fetcher = CannedFetcher::status(503);
        let cache = ElementCache::new(&SatelliteConfig::default(), &store, &fetcher);
        let err = cache.get(now()).unwrap_err();
        assert!(matches!(err, CacheError::Fetch(FetchError::Status { status: 503, .. })));
        assert_eq!(store.writes.get(), 0);
    }

    #[test]
    fn short_block_is_malformed() {
        let err = parse_element_block("ISS\n\n1 25544U\n").unwrap_err();
        assert!(matches!(err, CacheError::Malformed(_)));
    }

    #[test]
    fn block_lines_are_trimmed() {
        let (name, l1, l2) = parse_element_block("\n  ISS (ZARYA)  \n1 a\n\n2 b\n").unwrap();
        assert_eq!((name.as_str(), l1.as_str(), l2.as_str()), ("ISS (ZARYA)", "1 a", "2 b"));
    }

    #[test]
    fn file_store_round_trips_and_overwrites() {
        let dir = std::env::temp_dir().join(format!("skydash-cache-{}", std::process::id()));
        let store = FileElementStore::new(dir.clone());
        assert!(store.get("iss").unwrap().is_none());

        store.put("iss", &record_aged(30)).unwrap();
        store.put("iss", &record_aged(1)).unwrap();
        let loaded = store.get("iss").unwrap().unwrap();
        assert_eq!(loaded, record_aged(1));

        let raw = fs::read_to_string(dir.join("iss_tle.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        for field in ["fetched_at", "name", "line1", "line2"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn corrupt_cache_file_is_treated_as_a_miss() {
        let dir = std::env::temp_dir().join(format!("skydash-corrupt-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("iss_tle.json"), "{ not json").unwrap();

        let fetcher = CannedFetcher::iss();
        let cache = ElementCache::new(
            &SatelliteConfig::default(),
            FileElementStore::new(dir.clone()),
            &fetcher,
        );
        assert_eq!(cache.get(now()).unwrap().name, ISS_NAME);
        assert_eq!(fetcher.calls.get(), 1);
        fs::remove_dir_all(dir).unwrap();
    }
}
