// src/error.rs
//! Ошибки конфигурации и генерации.
//!
//! Фатальной считается только одна ситуация: исчерпан лимит попыток
//! построить допустимую раскладку районов. Всё остальное (неделимые участки,
//! недоросшие районы, отказы на этапе добора) поглощается и логируется.

use thiserror::Error;

/// Ошибка проверки или загрузки конфигурации.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("road_width must not be negative, got {0}")]
    NegativeRoadWidth(f32),
    #[error("road_width {road_width} is not a multiple of the grid cell {cell_size}")]
    OffGridRoadWidth { road_width: f32, cell_size: f32 },
    #[error("max_plot_size {max} is smaller than min_plot_size {min}")]
    PlotSizeRange { min: f32, max: f32 },
    #[error("{field} must lie within [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },
    #[error("zone probabilities sum to {0}, which exceeds 1")]
    ZoneProbabilitySum(f32),
    #[error("district size range {min}..={max} is empty or starts at zero")]
    DistrictSizeRange { min: usize, max: usize },
    #[error("{kind} district totals range {min}..={max} is empty")]
    DistrictTotalsRange {
        kind: &'static str,
        min: usize,
        max: usize,
    },
    #[error("max_district_regen_attempts must be at least 1")]
    NoAttempts,
}

/// Ошибка генерации города.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("no valid district layout found after {attempts} attempts")]
    NoValidLayout { attempts: usize },
}
