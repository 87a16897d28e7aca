// src/district/grow.rs
//! Формирование районов за одну попытку.
//!
//! Фаза 1: случайное семя, тип по радиальному правилу, рост в ширину по графу
//! смежности до `max_district_size`. Недоросшие районы распускаются.
//! Фаза 2: оставшиеся участки присоединяются к ближайшему району со свободным местом,
//! если это не нарушает жёсткое радиальное ограничение его типа.

use super::probability::{choose_district_type, district_type_probabilities};
use super::{AdjacencyGraph, District, DistrictId, DistrictType};
use crate::config::CityConfig;
use crate::geometry::MapGeometry;
use crate::plot::{Plot, PlotId};
use rand::Rng;
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Общие параметры роста для одной попытки
pub struct GrowthContext<'a> {
    pub config: &'a CityConfig,
    pub geometry: MapGeometry,
    pub graph: &'a AdjacencyGraph,
}

impl GrowthContext<'_> {
    /// Допускает ли тип района участок с центром в `point`
    #[must_use]
    pub fn admits(&self, district_type: DistrictType, point: (f32, f32)) -> bool {
        district_type.admits_distance(
            self.geometry.normalized_distance(point),
            self.config.strict_min_industrial_dist,
            self.config.strict_max_business_dist,
        )
    }

    /// Тип района для семени: у центра — всегда деловой, иначе случайный по радиальной модели
    pub fn seed_type<R: Rng + ?Sized>(&self, point: (f32, f32), rng: &mut R) -> DistrictType {
        if self.geometry.normalized_distance(point) < self.config.force_business_max_distance {
            return DistrictType::Business;
        }
        let probabilities = district_type_probabilities(
            self.geometry.distance_to_center(point),
            self.geometry.radius,
            Some(&self.config.district_probabilities),
        );
        choose_district_type(&probabilities, rng)
    }
}

/// Фаза 1: семена и рост
///
/// `claimed` отмечает участки, уже побывавшие в каком-либо районе в этой попытке:
/// они не могут стать семенем или быть присоединены снова. Отвергнутые семена
/// попадают только в `tried` и остаются доступны для роста других районов.
pub fn seed_and_grow<R: Rng + ?Sized>(
    ctx: &GrowthContext<'_>,
    plots: &mut [Plot],
    next_id: &mut u32,
    rng: &mut R,
) -> Vec<District> {
    let min_size = ctx.config.min_district_size;
    let mut claimed = vec![false; plots.len()];
    let mut tried = vec![false; plots.len()];
    let mut districts = Vec::new();
    let mut dissolved = 0usize;

    loop {
        let unassigned: Vec<usize> = (0..plots.len())
            .filter(|&i| !claimed[i] && plots[i].is_buildable() && plots[i].district_id.is_none())
            .collect();
        if unassigned.len() < min_size {
            break;
        }
        let candidates: Vec<usize> = unassigned.into_iter().filter(|&i| !tried[i]).collect();
        if candidates.is_empty() {
            break;
        }

        let seed = candidates[rng.gen_range(0..candidates.len())];
        let seed_center = plots[seed].center();
        let district_type = ctx.seed_type(seed_center, rng);
        if !ctx.admits(district_type, seed_center) {
            trace!(
                "Семя {:?} не подходит для района типа {district_type:?}",
                plots[seed].id
            );
            tried[seed] = true;
            continue;
        }

        let id = DistrictId(*next_id);
        *next_id += 1;
        let (district, members) =
            grow_from_seed(ctx, plots, seed, id, district_type, &mut claimed);

        if district.len() < min_size {
            trace!(
                "Район {} ({district_type:?}) распущен: {} < {min_size} участков",
                id.0,
                district.len()
            );
            dissolve_district(&district, &members, plots);
            dissolved += 1;
            continue;
        }
        districts.push(district);
    }

    debug!(
        "Фаза 1: {} районов, {dissolved} распущено",
        districts.len()
    );
    districts
}

/// Рост района в ширину от семени
///
/// Возвращает район и позиции его участков в `plots`.
pub fn grow_from_seed(
    ctx: &GrowthContext<'_>,
    plots: &mut [Plot],
    seed: usize,
    id: DistrictId,
    district_type: DistrictType,
    claimed: &mut [bool],
) -> (District, Vec<usize>) {
    let max_size = ctx.config.max_district_size;
    let mut district = District::new(id, district_type);
    let mut members = vec![seed];
    claimed[seed] = true;
    district.add_plot(&mut plots[seed]);

    let mut queue = VecDeque::from([seed]);
    while district.len() < max_size {
        let Some(current) = queue.pop_front() else {
            break;
        };
        for neighbor in ctx.graph.neighbors(current) {
            if district.len() >= max_size {
                break;
            }
            let plot = &plots[neighbor];
            if claimed[neighbor]
                || !plot.is_buildable()
                || plot.district_id.is_some()
                || !ctx.admits(district_type, plot.center())
            {
                continue;
            }
            claimed[neighbor] = true;
            district.add_plot(&mut plots[neighbor]);
            members.push(neighbor);
            queue.push_back(neighbor);
        }
    }
    (district, members)
}

/// Возвращает участки распущенного района в общий пул
pub fn dissolve_district(district: &District, members: &[usize], plots: &mut [Plot]) {
    for &index in members {
        let plot = &mut plots[index];
        debug_assert_eq!(
            plot.district_id,
            Some(district.id),
            "участок {:?} сменил район до роспуска",
            plot.id
        );
        if plot.district_id == Some(district.id) {
            plot.district_id = None;
        }
    }
}

/// Фаза 2: добор оставшихся участков в ближайшие районы
///
/// Возвращает участки, которые не удалось никуда присоединить.
pub fn assign_remaining_plots(
    ctx: &GrowthContext<'_>,
    plots: &mut [Plot],
    districts: &mut [District],
) -> Vec<PlotId> {
    let max_size = ctx.config.max_district_size;
    let mut rejected = Vec::new();

    for index in 0..plots.len() {
        if !plots[index].is_buildable() || plots[index].district_id.is_some() {
            continue;
        }
        let (plot_id, center) = (plots[index].id, plots[index].center());

        let nearest = districts
            .iter_mut()
            .filter(|d| d.len() < max_size)
            .min_by(|a, b| {
                squared_distance(a.center(), center).total_cmp(&squared_distance(b.center(), center))
            });
        let Some(district) = nearest else {
            warn!("Участок {:?}: нет района со свободным местом", plot_id);
            rejected.push(plot_id);
            continue;
        };

        if ctx.admits(district.district_type, center) {
            district.add_plot(&mut plots[index]);
        } else {
            warn!(
                "Участок {:?} нарушает радиальное ограничение ближайшего района {} ({:?})",
                plot_id, district.id.0, district.district_type
            );
            rejected.push(plot_id);
        }
    }

    debug!("Фаза 2: {} участков не присоединено", rejected.len());
    rejected
}

fn squared_distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dz = a.1 - b.1;
    dx * dx + dz * dz
}
