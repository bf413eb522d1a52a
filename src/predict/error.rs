use thiserror::Error;

use crate::ephemeris::SatelliteError;
use crate::predict::element_cache::CacheError;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("element cache: {0}")]
    Cache(#[from] CacheError),
    #[error("{0}")]
    Satellite(#[from] SatelliteError),
}
