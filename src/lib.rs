pub mod city;
pub mod config;
pub mod district;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod plot;

pub use city::{City, generate, generate_city, generate_many};
pub use config::{CityConfig, DistrictProbabilities};
pub use district::{District, DistrictId, DistrictManager, DistrictType};
pub use error::{ConfigError, LayoutError};
pub use layout::LayoutGenerator;
pub use plot::{Plot, PlotId, Rect, ZoneType};
