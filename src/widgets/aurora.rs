use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::config::AuroraConfig;
use crate::http::{FetchError, TextFetcher};

#[derive(Debug, Error)]
pub enum AuroraError {
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("unreadable status document: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuroraReading {
    /// Latest magnetometer disturbance in nanotesla.
    pub nt: Option<i64>,
    pub level: String,
    pub status_color: String,
}

/// Client for the AuroraWatch UK status API.
pub struct AuroraWatch<F> {
    fetcher: F,
    status_url: String,
    activity_url: String,
}

impl<F: TextFetcher> AuroraWatch<F> {
    pub fn new(config: &AuroraConfig, fetcher: F) -> Self {
        Self {
            fetcher,
            status_url: config.status_url.clone(),
            activity_url: config.activity_url.clone(),
        }
    }

    /// The status call must succeed; the activity reading is best effort.
    pub fn current(&self) -> Result<AuroraReading, AuroraError> {
        let status = self.fetcher.get_text(&self.status_url)?;
        let status_color = parse_status_color(&status)?;

        let nt = match self
            .fetcher
            .get_text(&self.activity_url)
            .map_err(AuroraError::from)
            .and_then(|body| parse_latest_activity(&body))
        {
            Ok(value) => value.map(|v| v.round_ties_even() as i64),
            Err(e) => {
                log::warn!("Aurora activity unavailable: {}", e);
                None
            }
        };

        Ok(AuroraReading {
            nt,
            level: alert_level(&status_color),
            status_color,
        })
    }
}

pub fn alert_level(status_color: &str) -> String {
    match status_color {
        "green" => "LOW".to_string(),
        "yellow" => "MINOR".to_string(),
        "amber" => "MODERATE".to_string(),
        "red" => "HIGH".to_string(),
        other => other.to_uppercase(),
    }
}

fn check_xml(body: &str) -> Result<(), AuroraError> {
    if body.trim_start().starts_with('<') {
        Ok(())
    } else {
        Err(AuroraError::Parse("not an XML document".to_string()))
    }
}

/// First non-empty `status_id` attribute in document order.
pub fn parse_status_color(body: &str) -> Result<String, AuroraError> {
    check_xml(body)?;
    let re = Regex::new(r#"\bstatus_id\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .map_err(|e| AuroraError::Parse(e.to_string()))?;

    let color = re
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str())
        .find(|s| !s.is_empty())
        .unwrap_or("unknown");
    Ok(color.to_string())
}

/// Value of the last `<activity>` sample that carries a numeric `<value>`.
pub fn parse_latest_activity(body: &str) -> Result<Option<f64>, AuroraError> {
    check_xml(body)?;
    let re = Regex::new(r"(?s)<activity\b[^>]*>.*?<value>\s*([^<]*?)\s*</value>.*?</activity>")
        .map_err(|e| AuroraError::Parse(e.to_string()))?;

    Ok(re
        .captures_iter(body)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .last())
}
