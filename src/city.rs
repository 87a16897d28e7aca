// src/city.rs
//! Полный конвейер: раскладка участков → районы → итоговые типы застройки.
//!
//! Каждый вызов работает на собственном состоянии и не разделяет ничего,
//! кроме переданного генератора случайных чисел и неизменяемой конфигурации.

use crate::config::CityConfig;
use crate::district::{District, DistrictId, DistrictManager, DistrictType};
use crate::error::LayoutError;
use crate::geometry::MapGeometry;
use crate::layout::LayoutGenerator;
use crate::plot::{Plot, PlotId, Rect, ZoneType};
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// Результат генерации города
#[derive(Debug, Clone, Serialize)]
pub struct City {
    pub plots: Vec<Plot>,
    pub districts: Vec<District>,
    pub geometry: MapGeometry,
    /// Сколько попыток понадобилось для допустимой раскладки районов
    pub attempts: usize,
}

/// Генерирует участки и районы с внешним генератором случайных чисел
///
/// # Ошибки
/// [`LayoutError::InvalidConfig`] при некорректной конфигурации,
/// [`LayoutError::NoValidLayout`] если лимит попыток исчерпан.
pub fn generate<R: Rng + ?Sized>(
    config: &CityConfig,
    rng: &mut R,
) -> Result<(Vec<Plot>, Vec<District>), LayoutError> {
    build_city(config, rng).map(City::into_parts)
}

/// Генерирует город детерминированно по сиду (`ChaCha8Rng`)
pub fn generate_city(config: &CityConfig, seed: u64) -> Result<City, LayoutError> {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    build_city(config, &mut rng)
}

/// Генерирует независимые города для нескольких сидов
#[must_use]
pub fn generate_many(config: &CityConfig, seeds: &[u64]) -> Vec<Result<City, LayoutError>> {
    #[cfg(feature = "parallel")]
    let cities = seeds.par_iter().map(|&seed| generate_city(config, seed)).collect();
    #[cfg(not(feature = "parallel"))]
    let cities = seeds.iter().map(|&seed| generate_city(config, seed)).collect();
    cities
}

fn build_city<R: Rng + ?Sized>(config: &CityConfig, rng: &mut R) -> Result<City, LayoutError> {
    config.validate()?;
    info!(
        "Генерация города {}×{} (дорога {}, участки {}..{})",
        config.map_size,
        config.map_size,
        config.road_width,
        config.min_plot_size,
        config.max_plot_size
    );

    let mut generator = LayoutGenerator::new(config);
    let mut plots = generator.generate_layout(config.map_size, rng);
    let geometry = generator.map_geometry().unwrap_or(MapGeometry {
        center: (0.0, 0.0),
        radius: config.map_size / 2.0,
    });

    let mut manager = DistrictManager::new(config, geometry);
    let districts = manager.generate_and_validate_districts(&mut plots, rng)?;

    info!(
        "Город готов: {} участков, {} районов, попыток: {}",
        plots.len(),
        districts.len(),
        manager.attempts_used()
    );
    Ok(City {
        plots,
        districts,
        geometry,
        attempts: manager.attempts_used(),
    })
}

impl City {
    #[must_use]
    pub fn into_parts(self) -> (Vec<Plot>, Vec<District>) {
        (self.plots, self.districts)
    }

    #[must_use]
    pub fn plot(&self, id: PlotId) -> Option<&Plot> {
        self.plots.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn district(&self, id: DistrictId) -> Option<&District> {
        self.districts.iter().find(|d| d.id == id)
    }

    pub fn districts_of_type(&self, district_type: DistrictType) -> impl Iterator<Item = &District> {
        self.districts
            .iter()
            .filter(move |d| d.district_type == district_type)
    }

    /// Участки, оставшиеся без района (получившие тип по умолчанию или парки)
    pub fn unassigned_plots(&self) -> impl Iterator<Item = &Plot> {
        self.plots
            .iter()
            .filter(|p| p.district_id.is_none() && p.is_buildable())
    }

    #[must_use]
    pub fn zone_counts(&self) -> HashMap<ZoneType, usize> {
        let mut counts = HashMap::new();
        for plot in &self.plots {
            *counts.entry(plot.zone_type).or_insert(0) += 1;
        }
        counts
    }

    #[must_use]
    pub fn district_counts(&self) -> HashMap<DistrictType, usize> {
        let mut counts = HashMap::new();
        for district in &self.districts {
            *counts.entry(district.district_type).or_insert(0) += 1;
        }
        counts
    }

    /// Охват всех участков
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.plots.iter().map(Plot::rect).reduce(|acc, r| acc.union(&r))
    }

    /// Выбирает до `count` районов, центры которых удалены друг от друга не меньше чем на `min_spacing`
    ///
    /// Первым берётся крупнейший район, затем жадно — самый удалённый от уже выбранных.
    /// Используется для размещения особых зданий.
    #[must_use]
    pub fn select_landmark_districts(&self, count: usize, min_spacing: f32) -> Vec<DistrictId> {
        let mut selected: Vec<&District> = Vec::new();
        let Some(first) = self
            .districts
            .iter()
            .max_by(|a, b| a.len().cmp(&b.len()).then(b.id.cmp(&a.id)))
        else {
            return Vec::new();
        };
        if count == 0 {
            return Vec::new();
        }
        selected.push(first);

        while selected.len() < count {
            let best = self
                .districts
                .iter()
                .filter(|d| !selected.iter().any(|s| s.id == d.id))
                .map(|d| {
                    let spacing = selected
                        .iter()
                        .map(|s| distance(s.center(), d.center()))
                        .fold(f32::INFINITY, f32::min);
                    (d, spacing)
                })
                .filter(|&(_, spacing)| spacing >= min_spacing)
                .max_by(|a, b| a.1.total_cmp(&b.1));
            match best {
                Some((district, _)) => selected.push(district),
                None => break,
            }
        }
        selected.into_iter().map(|d| d.id).collect()
    }
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dz = a.1 - b.1;
    (dx * dx + dz * dz).sqrt()
}
