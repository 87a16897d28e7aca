// src/config.rs
//! Конфигурация генерации города
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией:
//! - Размер карты, ширина дорог и сетка выравнивания
//! - Размеры участков и глубина рекурсивного деления
//! - Вероятности типов застройки участков
//! - Радиальная модель вероятностей районов и жёсткие ограничения размещения
//! - Правила проверки итоговой раскладки районов
//!
//! Все поля обязательны при загрузке из TOML: ядро не додумывает значения.
//! `CityConfig::default()` — готовый пресет для CLI и тестов.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Допуск кратности шагу сетки (в ячейках)
const GRID_EPSILON: f32 = 1e-3;

/// Параметры вероятности делового района: `max · exp(-d · decay)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BusinessProbability {
    /// Вес делового района в самом центре карты
    pub max: f32,
    /// Скорость затухания к окраинам
    pub decay: f32,
}

/// Параметры вероятности промышленного района
///
/// До порога `threshold` вес равен небольшой константе `base`,
/// дальше растёт как `(1 - exp(-(d - threshold) · factor)) · multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndustrialProbability {
    pub base: f32,
    pub threshold: f32,
    pub factor: f32,
    pub multiplier: f32,
}

/// Параметры вероятности жилого района: гауссов пик вокруг `peak_center` плюс `base`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidentialProbability {
    pub base: f32,
    pub peak_center: f32,
    pub peak_width: f32,
}

/// Радиальная модель вероятностей типов районов
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistrictProbabilities {
    pub business: BusinessProbability,
    pub industrial: IndustrialProbability,
    pub residential: ResidentialProbability,
}

impl Default for DistrictProbabilities {
    fn default() -> Self {
        Self {
            business: BusinessProbability {
                max: 1.0,
                decay: 5.0,
            },
            industrial: IndustrialProbability {
                base: 0.02,
                threshold: 0.45,
                factor: 5.0,
                multiplier: 1.0,
            },
            residential: ResidentialProbability {
                base: 0.1,
                peak_center: 0.5,
                peak_width: 0.08,
            },
        }
    }
}

/// Полная конфигурация генерации одного города
///
/// Все расстояния с суффиксом `_dist`/`_distance` нормализованы радиусом карты и лежат в `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityConfig {
    /// Сторона квадратной карты в мировых единицах
    pub map_size: f32,
    /// Ширина дорожного коридора между соседними участками
    pub road_width: f32,
    /// Минимальная сторона участка
    pub min_plot_size: f32,
    /// Участок, обе стороны которого не превышают этого значения, можно не делить после `max_recursion_depth`
    pub max_plot_size: f32,
    pub max_recursion_depth: u32,
    /// Число ячеек сетки на единицу длины (шаг сетки = `1 / grid_scale`)
    pub grid_scale: f32,

    // Вероятности типов застройки (накопительно, в этом порядке)
    pub park_probability: f32,
    pub industrial_zone_probability: f32,
    pub house_zone_probability: f32,
    pub skyscraper_zone_probability: f32,

    pub min_district_size: usize,
    pub max_district_size: usize,
    /// Семя ближе этого расстояния всегда порождает деловой район
    pub force_business_max_distance: f32,

    // Правила проверки раскладки
    pub validation_zone_center_max_dist: f32,
    pub validation_zone_edge_min_dist: f32,
    pub min_business_in_center: usize,
    pub min_industrial_in_edge: usize,
    /// Промышленность запрещена ближе этого расстояния
    pub strict_min_industrial_dist: f32,
    /// Деловые районы запрещены дальше этого расстояния
    pub strict_max_business_dist: f32,
    pub min_total_industrial_districts: usize,
    pub max_total_industrial_districts: usize,
    pub min_total_business_districts: usize,
    pub max_total_business_districts: usize,

    pub max_district_regen_attempts: usize,

    /// Параметры радиальной модели выбора типа района
    pub district_probabilities: DistrictProbabilities,
}

impl CityConfig {
    /// Загружает параметры из TOML-файла и проверяет их
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден, содержит недопустимый формат
    /// или значения не проходят [`CityConfig::validate`].
    ///
    /// # Пример
    /// ```toml
    /// # city.toml
    /// map_size = 800.0
    /// road_width = 10.0
    /// min_plot_size = 30.0
    /// # ... остальные поля обязательны
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Шаг сетки выравнивания
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        1.0 / self.grid_scale
    }

    /// Проверяет согласованность параметров до начала генерации.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("map_size", self.map_size),
            ("grid_scale", self.grid_scale),
            ("min_plot_size", self.min_plot_size),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !(self.road_width >= 0.0) {
            return Err(ConfigError::NegativeRoadWidth(self.road_width));
        }
        // Зазор между соседними участками должен быть ровно `road_width`
        let road_cells = self.road_width / self.cell_size();
        if (road_cells - road_cells.round()).abs() > GRID_EPSILON {
            return Err(ConfigError::OffGridRoadWidth {
                road_width: self.road_width,
                cell_size: self.cell_size(),
            });
        }
        if self.max_plot_size < self.min_plot_size {
            return Err(ConfigError::PlotSizeRange {
                min: self.min_plot_size,
                max: self.max_plot_size,
            });
        }

        let unit_fields = [
            ("park_probability", self.park_probability),
            ("industrial_zone_probability", self.industrial_zone_probability),
            ("house_zone_probability", self.house_zone_probability),
            ("skyscraper_zone_probability", self.skyscraper_zone_probability),
            ("force_business_max_distance", self.force_business_max_distance),
            (
                "validation_zone_center_max_dist",
                self.validation_zone_center_max_dist,
            ),
            (
                "validation_zone_edge_min_dist",
                self.validation_zone_edge_min_dist,
            ),
            ("strict_min_industrial_dist", self.strict_min_industrial_dist),
            ("strict_max_business_dist", self.strict_max_business_dist),
        ];
        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { field, value });
            }
        }

        let zone_sum = self.park_probability
            + self.industrial_zone_probability
            + self.house_zone_probability
            + self.skyscraper_zone_probability;
        if zone_sum > 1.0 + f32::EPSILON {
            return Err(ConfigError::ZoneProbabilitySum(zone_sum));
        }

        if self.min_district_size == 0 || self.min_district_size > self.max_district_size {
            return Err(ConfigError::DistrictSizeRange {
                min: self.min_district_size,
                max: self.max_district_size,
            });
        }
        if self.min_total_industrial_districts > self.max_total_industrial_districts {
            return Err(ConfigError::DistrictTotalsRange {
                kind: "industrial",
                min: self.min_total_industrial_districts,
                max: self.max_total_industrial_districts,
            });
        }
        if self.min_total_business_districts > self.max_total_business_districts {
            return Err(ConfigError::DistrictTotalsRange {
                kind: "business",
                min: self.min_total_business_districts,
                max: self.max_total_business_districts,
            });
        }
        if self.max_district_regen_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        Ok(())
    }
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            map_size: 800.0,
            road_width: 10.0,
            min_plot_size: 30.0,
            max_plot_size: 60.0,
            max_recursion_depth: 7,
            grid_scale: 1.0,
            park_probability: 0.08,
            industrial_zone_probability: 0.1,
            house_zone_probability: 0.35,
            skyscraper_zone_probability: 0.15,
            min_district_size: 3,
            max_district_size: 15,
            force_business_max_distance: 0.15,
            validation_zone_center_max_dist: 0.3,
            validation_zone_edge_min_dist: 0.6,
            min_business_in_center: 1,
            min_industrial_in_edge: 1,
            strict_min_industrial_dist: 0.35,
            strict_max_business_dist: 0.6,
            min_total_industrial_districts: 1,
            max_total_industrial_districts: 20,
            min_total_business_districts: 1,
            max_total_business_districts: 12,
            max_district_regen_attempts: 50,
            district_probabilities: DistrictProbabilities::default(),
        }
    }
}
