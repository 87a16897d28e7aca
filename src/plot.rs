// src/plot.rs
//! Участок (plot) — прямоугольник карты с типом застройки и ссылкой на район.

use crate::district::DistrictId;
use serde::{Deserialize, Serialize};

/// Идентификатор участка, выдаётся при создании в порядке генерации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlotId(pub u32);

/// Тип застройки участка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    /// Ещё не классифицирован (внутренние узлы дерева деления)
    #[default]
    Unassigned,
    /// Слишком мал для застройки
    Unbuildable,
    Park,
    Industrial,
    House,
    Building,
    Skyscraper,
}

impl ZoneType {
    pub const ALL: [ZoneType; 7] = [
        ZoneType::Unassigned,
        ZoneType::Unbuildable,
        ZoneType::Park,
        ZoneType::Industrial,
        ZoneType::House,
        ZoneType::Building,
        ZoneType::Skyscraper,
    ];

    #[must_use]
    pub fn is_buildable(self) -> bool {
        !matches!(self, ZoneType::Unassigned | ZoneType::Unbuildable)
    }
}

/// Осевой прямоугольник в координатах карты (x, z)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub depth: f32,
}

impl Rect {
    #[must_use]
    pub fn new(x: f32, z: f32, width: f32, depth: f32) -> Self {
        Self { x, z, width, depth }
    }

    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub fn max_z(&self) -> f32 {
        self.z + self.depth
    }

    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.z + self.depth / 2.0)
    }

    #[must_use]
    pub fn area(&self) -> f32 {
        self.width * self.depth
    }

    /// Наименьший прямоугольник, содержащий оба
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let z = self.z.min(other.z);
        Rect {
            x,
            z,
            width: self.max_x().max(other.max_x()) - x,
            depth: self.max_z().max(other.max_z()) - z,
        }
    }

    /// Площадь пересечения (0, если прямоугольники не перекрываются)
    #[must_use]
    pub fn overlap_area(&self, other: &Rect) -> f32 {
        let w = self.max_x().min(other.max_x()) - self.x.max(other.x);
        let d = self.max_z().min(other.max_z()) - self.z.max(other.z);
        if w > 0.0 && d > 0.0 { w * d } else { 0.0 }
    }
}

/// Участок карты
///
/// Дерево деления хранится плоско: `children` — индексы в арене генератора,
/// равные идентификаторам участков.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub id: PlotId,
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub depth: f32,
    pub children: Option<[PlotId; 2]>,
    pub is_leaf: bool,
    pub zone_type: ZoneType,
    /// Всегда равен `zone_type == Park`
    pub is_park: bool,
    /// Обратная ссылка на район, не владеющая
    pub district_id: Option<DistrictId>,
}

impl Plot {
    #[must_use]
    pub fn new(id: PlotId, x: f32, z: f32, width: f32, depth: f32) -> Self {
        Self {
            id,
            x,
            z,
            width,
            depth,
            children: None,
            is_leaf: false,
            zone_type: ZoneType::Unassigned,
            is_park: false,
            district_id: None,
        }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.z, self.width, self.depth)
    }

    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        self.rect().center()
    }

    /// Меняет тип застройки, синхронизируя `is_park`
    pub fn set_zone_type(&mut self, zone_type: ZoneType) {
        self.zone_type = zone_type;
        self.is_park = zone_type == ZoneType::Park;
    }

    #[must_use]
    pub fn is_buildable(&self) -> bool {
        self.zone_type.is_buildable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_midpoint_of_rectangle() {
        let plot = Plot::new(PlotId(0), -10.0, 20.0, 30.0, 40.0);
        assert_eq!(plot.center(), (5.0, 40.0));
    }

    #[test]
    fn set_zone_type_keeps_park_flag_in_sync() {
        let mut plot = Plot::new(PlotId(1), 0.0, 0.0, 10.0, 10.0);
        plot.set_zone_type(ZoneType::Park);
        assert!(plot.is_park);
        plot.set_zone_type(ZoneType::House);
        assert!(!plot.is_park);
    }

    #[test]
    fn unassigned_and_unbuildable_are_not_buildable() {
        let buildable: Vec<_> = ZoneType::ALL
            .into_iter()
            .filter(|z| z.is_buildable())
            .collect();
        assert_eq!(
            buildable,
            vec![
                ZoneType::Park,
                ZoneType::Industrial,
                ZoneType::House,
                ZoneType::Building,
                ZoneType::Skyscraper
            ]
        );
    }

    #[test]
    fn union_covers_both_rectangles() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, -5.0, 5.0, 5.0);
        assert_eq!(a.union(&b), Rect::new(0.0, -5.0, 25.0, 15.0));
    }

    #[test]
    fn overlap_area_is_zero_for_separated_rectangles() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 0.0, 10.0, 10.0);
        assert!(a.overlap_area(&b).abs() < f32::EPSILON);
        let c = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!((a.overlap_area(&c) - 25.0).abs() < f32::EPSILON);
    }
}
