// src/district/probability.rs
//! Радиальная модель вероятностей типов районов.

use super::DistrictType;
use crate::config::DistrictProbabilities;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Нормированное распределение по типам районов
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistrictTypeProbabilities {
    pub business: f32,
    pub industrial: f32,
    pub residential: f32,
}

impl DistrictTypeProbabilities {
    /// Распределение при отсутствии настроек или вырожденном радиусе карты
    pub const FALLBACK: Self = Self {
        business: 0.1,
        industrial: 0.1,
        residential: 0.8,
    };

    #[must_use]
    pub fn get(&self, district_type: DistrictType) -> f32 {
        match district_type {
            DistrictType::Business => self.business,
            DistrictType::Industrial => self.industrial,
            DistrictType::Residential => self.residential,
        }
    }
}

/// Вероятности типов районов для точки на расстоянии `distance_to_center`
///
/// Расстояние нормализуется радиусом карты и ограничивается `[0, 1]`:
/// - деловые: `max · exp(-d · decay)`
/// - промышленные: `base` до порога, затем `(1 - exp(-(d - threshold) · factor)) · multiplier`
/// - жилые: `exp(-(d - peak_center)² / (2 · peak_width)) + base`
#[must_use]
pub fn district_type_probabilities(
    distance_to_center: f32,
    map_radius: f32,
    settings: Option<&DistrictProbabilities>,
) -> DistrictTypeProbabilities {
    let Some(settings) = settings else {
        return DistrictTypeProbabilities::FALLBACK;
    };
    if !(map_radius > 0.0) {
        return DistrictTypeProbabilities::FALLBACK;
    }

    let d = (distance_to_center / map_radius).clamp(0.0, 1.0);

    let business = (-d * settings.business.decay).exp() * settings.business.max;

    let industrial_cfg = &settings.industrial;
    let industrial = if d > industrial_cfg.threshold {
        (1.0 - (-(d - industrial_cfg.threshold) * industrial_cfg.factor).exp())
            * industrial_cfg.multiplier
    } else {
        industrial_cfg.base
    };

    let residential_cfg = &settings.residential;
    let offset = d - residential_cfg.peak_center;
    let residential =
        (-(offset * offset) / (2.0 * residential_cfg.peak_width)).exp() + residential_cfg.base;

    let weights = [business.max(0.0), industrial.max(0.0), residential.max(0.0)];
    let total: f32 = weights.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return DistrictTypeProbabilities::FALLBACK;
    }

    DistrictTypeProbabilities {
        business: weights[0] / total,
        industrial: weights[1] / total,
        residential: weights[2] / total,
    }
}

/// Взвешенный выбор типа района по накопленной вероятности
pub fn choose_district_type<R: Rng + ?Sized>(
    probabilities: &DistrictTypeProbabilities,
    rng: &mut R,
) -> DistrictType {
    district_type_for_roll(probabilities, rng.gen_range(0.0..1.0))
}

fn district_type_for_roll(probabilities: &DistrictTypeProbabilities, roll: f32) -> DistrictType {
    let mut cumulative = 0.0;
    for district_type in [DistrictType::Business, DistrictType::Industrial] {
        cumulative += probabilities.get(district_type);
        if roll < cumulative {
            return district_type;
        }
    }
    DistrictType::Residential
}
