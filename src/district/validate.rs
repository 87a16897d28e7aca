// src/district/validate.rs
//! Проверка итоговой раскладки районов.

use super::{District, DistrictId, DistrictType};
use crate::config::CityConfig;
use crate::geometry::MapGeometry;
use serde::Serialize;

/// Нарушенное правило раскладки
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ValidationFailure {
    /// Мало деловых районов в центре
    TooFewBusinessInCenter { found: usize, required: usize },
    /// Мало промышленных районов на окраине
    TooFewIndustrialInEdge { found: usize, required: usize },
    /// Промышленный район ближе жёсткой границы
    IndustrialTooClose { district: DistrictId, distance: f32 },
    /// Деловой район дальше жёсткой границы
    BusinessTooFar { district: DistrictId, distance: f32 },
    IndustrialTotalOutOfRange { found: usize, min: usize, max: usize },
    BusinessTotalOutOfRange { found: usize, min: usize, max: usize },
}

/// Итог проверки: счётчики и список нарушенных правил
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub business_in_center: usize,
    pub industrial_in_edge: usize,
    pub total_business: usize,
    pub total_industrial: usize,
    pub total_residential: usize,
    pub failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Проверяет все правила одновременно
///
/// Расстояние района — нормализованное расстояние его центра до центра карты.
#[must_use]
pub fn validate_district_layout(
    districts: &[District],
    geometry: &MapGeometry,
    config: &CityConfig,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut violations = Vec::new();

    for district in districts {
        let distance = geometry.normalized_distance(district.center());
        match district.district_type {
            DistrictType::Business => {
                report.total_business += 1;
                if distance <= config.validation_zone_center_max_dist {
                    report.business_in_center += 1;
                }
                if distance > config.strict_max_business_dist {
                    violations.push(ValidationFailure::BusinessTooFar {
                        district: district.id,
                        distance,
                    });
                }
            }
            DistrictType::Industrial => {
                report.total_industrial += 1;
                if distance >= config.validation_zone_edge_min_dist {
                    report.industrial_in_edge += 1;
                }
                if distance < config.strict_min_industrial_dist {
                    violations.push(ValidationFailure::IndustrialTooClose {
                        district: district.id,
                        distance,
                    });
                }
            }
            DistrictType::Residential => report.total_residential += 1,
        }
    }

    if report.business_in_center < config.min_business_in_center {
        report.failures.push(ValidationFailure::TooFewBusinessInCenter {
            found: report.business_in_center,
            required: config.min_business_in_center,
        });
    }
    if report.industrial_in_edge < config.min_industrial_in_edge {
        report.failures.push(ValidationFailure::TooFewIndustrialInEdge {
            found: report.industrial_in_edge,
            required: config.min_industrial_in_edge,
        });
    }
    report.failures.extend(violations);

    let industrial_range =
        config.min_total_industrial_districts..=config.max_total_industrial_districts;
    if !industrial_range.contains(&report.total_industrial) {
        report.failures.push(ValidationFailure::IndustrialTotalOutOfRange {
            found: report.total_industrial,
            min: config.min_total_industrial_districts,
            max: config.max_total_industrial_districts,
        });
    }
    let business_range = config.min_total_business_districts..=config.max_total_business_districts;
    if !business_range.contains(&report.total_business) {
        report.failures.push(ValidationFailure::BusinessTotalOutOfRange {
            found: report.total_business,
            min: config.min_total_business_districts,
            max: config.max_total_business_districts,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{Plot, PlotId, Rect};

    fn geometry() -> MapGeometry {
        MapGeometry::from_root(&Rect::new(-400.0, -400.0, 800.0, 800.0))
    }

    /// Район из одного участка 10×10 с центром в (cx, 0)
    fn district_at(id: u32, district_type: DistrictType, cx: f32) -> District {
        let mut district = District::new(DistrictId(id), district_type);
        let mut plot = Plot::new(PlotId(id), cx - 5.0, -5.0, 10.0, 10.0);
        district.add_plot(&mut plot);
        district
    }

    fn config() -> CityConfig {
        CityConfig {
            validation_zone_center_max_dist: 0.3,
            validation_zone_edge_min_dist: 0.6,
            min_business_in_center: 1,
            min_industrial_in_edge: 1,
            strict_min_industrial_dist: 0.35,
            strict_max_business_dist: 0.6,
            min_total_industrial_districts: 1,
            max_total_industrial_districts: 2,
            min_total_business_districts: 1,
            max_total_business_districts: 2,
            ..CityConfig::default()
        }
    }

    #[test]
    fn balanced_layout_passes() {
        let districts = vec![
            district_at(0, DistrictType::Business, 40.0),
            district_at(1, DistrictType::Industrial, 320.0),
            district_at(2, DistrictType::Residential, 200.0),
        ];
        let report = validate_district_layout(&districts, &geometry(), &config());
        assert!(report.is_valid(), "{:?}", report.failures);
        assert_eq!(report.business_in_center, 1);
        assert_eq!(report.industrial_in_edge, 1);
        assert_eq!(report.total_residential, 1);
    }

    #[test]
    fn industrial_inside_strict_bound_invalidates_layout() {
        let districts = vec![
            district_at(0, DistrictType::Business, 40.0),
            district_at(1, DistrictType::Industrial, 320.0),
            district_at(2, DistrictType::Industrial, 100.0),
        ];
        let report = validate_district_layout(&districts, &geometry(), &config());
        assert!(!report.is_valid());
        assert!(report.failures.iter().any(|f| matches!(
            f,
            ValidationFailure::IndustrialTooClose {
                district: DistrictId(2),
                ..
            }
        )));
    }

    #[test]
    fn business_outside_strict_bound_invalidates_layout() {
        let districts = vec![
            district_at(0, DistrictType::Business, 40.0),
            district_at(1, DistrictType::Industrial, 320.0),
            district_at(2, DistrictType::Business, 300.0),
        ];
        let report = validate_district_layout(&districts, &geometry(), &config());
        assert_eq!(
            report.failures,
            vec![ValidationFailure::BusinessTooFar {
                district: DistrictId(2),
                distance: 0.75
            }]
        );
    }

    #[test]
    fn missing_center_business_and_edge_industry_are_reported() {
        let districts = vec![
            district_at(0, DistrictType::Business, 200.0),
            district_at(1, DistrictType::Industrial, 180.0),
        ];
        let report = validate_district_layout(&districts, &geometry(), &config());
        assert!(report.failures.contains(&ValidationFailure::TooFewBusinessInCenter {
            found: 0,
            required: 1
        }));
        assert!(report.failures.contains(&ValidationFailure::TooFewIndustrialInEdge {
            found: 0,
            required: 1
        }));
    }

    #[test]
    fn district_totals_must_stay_in_range() {
        let districts = vec![
            district_at(0, DistrictType::Business, 10.0),
            district_at(1, DistrictType::Business, 20.0),
            district_at(2, DistrictType::Business, 30.0),
        ];
        let report = validate_district_layout(&districts, &geometry(), &config());
        assert!(report.failures.contains(&ValidationFailure::BusinessTotalOutOfRange {
            found: 3,
            min: 1,
            max: 2
        }));
        assert!(report.failures.contains(&ValidationFailure::IndustrialTotalOutOfRange {
            found: 0,
            min: 1,
            max: 2
        }));
    }

    #[test]
    fn empty_layout_fails_minimum_rules() {
        let report = validate_district_layout(&[], &geometry(), &config());
        assert!(!report.is_valid());
    }
}
