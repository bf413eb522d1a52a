//! Independent calculators, one per dashboard tile.

mod aurora;
mod moon;
mod planets;
mod sun;

pub use aurora::{AuroraError, AuroraReading, AuroraWatch};
pub use moon::{moon_phase, MoonPhase};
pub use planets::{visible_planets, PlanetReport};
pub use sun::{sun_times, SunTimes};
