// src/district/mod.rs
//! Районы: кластеры смежных участков одного типа.
//!
//! Район хранит только идентификаторы участков; участок ссылается на район
//! через `district_id`. Центр и границы пересчитываются при каждом добавлении.

pub mod adjacency;
pub mod grow;
pub mod manager;
pub mod probability;
pub mod reconcile;
pub mod validate;

use crate::plot::{Plot, PlotId, Rect, ZoneType};
use serde::{Deserialize, Serialize};

pub use adjacency::{AdjacencyGraph, are_neighbors, find_neighbors};
pub use manager::DistrictManager;
pub use probability::{DistrictTypeProbabilities, choose_district_type, district_type_probabilities};
pub use validate::{ValidationFailure, ValidationReport, validate_district_layout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DistrictId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistrictType {
    Residential,
    Industrial,
    Business,
}

impl DistrictType {
    pub const ALL: [DistrictType; 3] = [
        DistrictType::Residential,
        DistrictType::Industrial,
        DistrictType::Business,
    ];

    /// Базовый тип застройки участков района (для жилых — первый в чередовании)
    #[must_use]
    pub fn base_zone(self) -> ZoneType {
        match self {
            DistrictType::Residential => ZoneType::House,
            DistrictType::Industrial => ZoneType::Industrial,
            DistrictType::Business => ZoneType::Skyscraper,
        }
    }

    /// Жёсткое радиальное ограничение: промышленность не ближе `min_industrial`,
    /// деловые не дальше `max_business`
    #[must_use]
    pub fn admits_distance(self, normalized: f32, min_industrial: f32, max_business: f32) -> bool {
        match self {
            DistrictType::Industrial => normalized >= min_industrial,
            DistrictType::Business => normalized <= max_business,
            DistrictType::Residential => true,
        }
    }
}

/// Район
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct District {
    pub id: DistrictId,
    #[serde(rename = "type")]
    pub district_type: DistrictType,
    pub plots: Vec<PlotId>,
    center: (f32, f32),
    bounds: Option<Rect>,
    #[serde(skip)]
    center_sum: (f32, f32),
}

impl District {
    #[must_use]
    pub fn new(id: DistrictId, district_type: DistrictType) -> Self {
        Self {
            id,
            district_type,
            plots: Vec::new(),
            center: (0.0, 0.0),
            bounds: None,
            center_sum: (0.0, 0.0),
        }
    }

    /// Добавляет участок в район и проставляет ему `district_id`
    pub fn add_plot(&mut self, plot: &mut Plot) {
        plot.district_id = Some(self.id);
        self.plots.push(plot.id);

        let (cx, cz) = plot.center();
        self.center_sum.0 += cx;
        self.center_sum.1 += cz;
        let n = self.plots.len() as f32;
        self.center = (self.center_sum.0 / n, self.center_sum.1 / n);
        let rect = plot.rect();
        self.bounds = Some(match self.bounds {
            Some(bounds) => bounds.union(&rect),
            None => rect,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }

    /// Среднее центров участков
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        self.center
    }

    /// Осевой охватывающий прямоугольник всех участков
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    #[must_use]
    pub fn contains(&self, plot: PlotId) -> bool {
        self.plots.contains(&plot)
    }
}
