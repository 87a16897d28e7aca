// src/geometry.rs
//! Выравнивание по сетке и радиальные расстояния.

use crate::plot::Rect;
use serde::{Deserialize, Serialize};

/// Привязка размера к сетке: `round(v / cell) * cell`
#[must_use]
pub fn snap_size(value: f32, cell_size: f32) -> f32 {
    (value / cell_size).round() * cell_size
}

/// Привязка координаты к сетке: `floor(v / cell) * cell`
#[must_use]
pub fn snap_position(value: f32, cell_size: f32) -> f32 {
    (value / cell_size).floor() * cell_size
}

/// Перевод длины в целое число ячеек (с округлением)
#[must_use]
pub fn to_cells(value: f32, cell_size: f32) -> i64 {
    (value / cell_size).round() as i64
}

/// Центр и радиус карты для нормализации расстояний
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapGeometry {
    pub center: (f32, f32),
    pub radius: f32,
}

impl MapGeometry {
    /// Геометрия по корневому прямоугольнику: центр в его середине, радиус — половина большей стороны
    #[must_use]
    pub fn from_root(root: &Rect) -> Self {
        Self {
            center: root.center(),
            radius: root.width.max(root.depth) / 2.0,
        }
    }

    #[must_use]
    pub fn distance_to_center(&self, point: (f32, f32)) -> f32 {
        let dx = point.0 - self.center.0;
        let dz = point.1 - self.center.1;
        (dx * dx + dz * dz).sqrt()
    }

    /// Расстояние до центра, делённое на радиус карты и ограниченное `[0, 1]`
    #[must_use]
    pub fn normalized_distance(&self, point: (f32, f32)) -> f32 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        (self.distance_to_center(point) / self.radius).clamp(0.0, 1.0)
    }
}
