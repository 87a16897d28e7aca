// src/district/reconcile.rs
//! Приведение типов застройки участков к типу их района.

use super::{District, DistrictType};
use crate::plot::{Plot, PlotId, ZoneType};
use std::collections::HashMap;
use tracing::warn;

/// Назначает окончательный тип застройки участкам каждого района
///
/// - деловой район → небоскрёбы, промышленный → промышленность;
/// - жилой район чередует дом и здание, начиная с дома;
/// - первый парк района сохраняется, остальные парки получают тип района;
/// - незастраиваемые участки пропускаются.
pub fn adjust_plot_types_within_districts(plots: &mut [Plot], districts: &[District]) {
    let index: HashMap<PlotId, usize> = plots
        .iter()
        .enumerate()
        .map(|(i, plot)| (plot.id, i))
        .collect();

    for district in districts {
        let mut park_kept = false;
        let mut residential_counter = 0usize;

        for plot_id in &district.plots {
            let Some(&i) = index.get(plot_id) else {
                continue;
            };
            let plot = &mut plots[i];
            if !plot.is_buildable() {
                continue;
            }
            if plot.zone_type == ZoneType::Park && !park_kept {
                park_kept = true;
                continue;
            }

            let zone = match district.district_type {
                DistrictType::Business => ZoneType::Skyscraper,
                DistrictType::Industrial => ZoneType::Industrial,
                DistrictType::Residential => {
                    let zone = if residential_counter % 2 == 0 {
                        ZoneType::House
                    } else {
                        ZoneType::Building
                    };
                    residential_counter += 1;
                    zone
                }
            };
            plot.set_zone_type(zone);
        }
    }
}

/// Участки без района (кроме парков) получают тип `Building`
///
/// Возвращает число таких участков: ненулевое значение означает отказы в фазе добора.
pub fn assign_default_type_to_unassigned(plots: &mut [Plot]) -> usize {
    let mut forced = 0;
    for plot in plots.iter_mut() {
        if plot.district_id.is_some() || !plot.is_buildable() || plot.zone_type == ZoneType::Park {
            continue;
        }
        warn!(
            "Участок {:?} остался без района, тип по умолчанию: Building",
            plot.id
        );
        plot.set_zone_type(ZoneType::Building);
        forced += 1;
    }
    forced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::district::DistrictId;

    fn plots_with(zones: &[ZoneType]) -> Vec<Plot> {
        zones
            .iter()
            .enumerate()
            .map(|(i, &zone)| {
                let mut plot = Plot::new(PlotId(i as u32), i as f32 * 40.0, 0.0, 30.0, 30.0);
                plot.set_zone_type(zone);
                plot
            })
            .collect()
    }

    fn district_of(plots: &mut [Plot], district_type: DistrictType) -> District {
        let mut district = District::new(DistrictId(0), district_type);
        for plot in plots.iter_mut() {
            district.add_plot(plot);
        }
        district
    }

    fn zones(plots: &[Plot]) -> Vec<ZoneType> {
        plots.iter().map(|p| p.zone_type).collect()
    }

    #[test]
    fn business_district_keeps_only_first_park() {
        let mut plots = plots_with(&[
            ZoneType::House,
            ZoneType::Park,
            ZoneType::Industrial,
            ZoneType::Park,
        ]);
        let district = district_of(&mut plots, DistrictType::Business);
        adjust_plot_types_within_districts(&mut plots, &[district]);
        assert_eq!(
            zones(&plots),
            vec![
                ZoneType::Skyscraper,
                ZoneType::Park,
                ZoneType::Skyscraper,
                ZoneType::Skyscraper
            ]
        );
        assert!(plots[1].is_park);
        assert!(!plots[3].is_park);
    }

    #[test]
    fn industrial_district_converts_everything_but_one_park() {
        let mut plots = plots_with(&[ZoneType::Park, ZoneType::Skyscraper, ZoneType::Park]);
        let district = district_of(&mut plots, DistrictType::Industrial);
        adjust_plot_types_within_districts(&mut plots, &[district]);
        assert_eq!(
            zones(&plots),
            vec![ZoneType::Park, ZoneType::Industrial, ZoneType::Industrial]
        );
    }

    #[test]
    fn residential_district_alternates_house_and_building() {
        let mut plots = plots_with(&[
            ZoneType::Skyscraper,
            ZoneType::Skyscraper,
            ZoneType::Park,
            ZoneType::Industrial,
            ZoneType::Park,
            ZoneType::House,
        ]);
        let district = district_of(&mut plots, DistrictType::Residential);
        adjust_plot_types_within_districts(&mut plots, &[district]);
        assert_eq!(
            zones(&plots),
            vec![
                ZoneType::House,
                ZoneType::Building,
                ZoneType::Park,
                ZoneType::House,
                ZoneType::Building,
                ZoneType::House
            ]
        );
    }

    #[test]
    fn unassigned_plots_become_buildings_except_parks() {
        let mut plots = plots_with(&[ZoneType::Skyscraper, ZoneType::Park, ZoneType::House]);
        plots[2].district_id = Some(DistrictId(1));
        let forced = assign_default_type_to_unassigned(&mut plots);
        assert_eq!(forced, 1);
        assert_eq!(
            zones(&plots),
            vec![ZoneType::Building, ZoneType::Park, ZoneType::House]
        );
    }

    #[test]
    fn unbuildable_plots_are_never_touched() {
        let mut plots = plots_with(&[ZoneType::Unbuildable, ZoneType::House]);
        let district = district_of(&mut plots, DistrictType::Business);
        adjust_plot_types_within_districts(&mut plots, &[district]);
        plots[0].district_id = None;
        assign_default_type_to_unassigned(&mut plots);
        assert_eq!(plots[0].zone_type, ZoneType::Unbuildable);
        assert_eq!(plots[1].zone_type, ZoneType::Skyscraper);
    }
}
