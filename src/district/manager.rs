// src/district/manager.rs
//! Цикл «сформировать — проверить — повторить» для раскладки районов.

use super::grow::{GrowthContext, assign_remaining_plots, seed_and_grow};
use super::reconcile::{adjust_plot_types_within_districts, assign_default_type_to_unassigned};
use super::validate::{ValidationReport, validate_district_layout};
use super::{AdjacencyGraph, District};
use crate::config::CityConfig;
use crate::error::LayoutError;
use crate::geometry::MapGeometry;
use crate::plot::Plot;
use rand::Rng;
use tracing::{debug, error, info};

/// Управляет формированием районов поверх листовых участков
///
/// Идентификаторы районов растут монотонно на протяжении жизни менеджера
/// и не сбрасываются между попытками.
pub struct DistrictManager<'a> {
    config: &'a CityConfig,
    geometry: MapGeometry,
    next_district_id: u32,
    attempts_used: usize,
    last_report: Option<ValidationReport>,
    forced_defaults: usize,
}

impl<'a> DistrictManager<'a> {
    #[must_use]
    pub fn new(config: &'a CityConfig, geometry: MapGeometry) -> Self {
        Self {
            config,
            geometry,
            next_district_id: 0,
            attempts_used: 0,
            last_report: None,
            forced_defaults: 0,
        }
    }

    /// Сколько попыток понадобилось при последнем запуске
    #[must_use]
    pub fn attempts_used(&self) -> usize {
        self.attempts_used
    }

    /// Отчёт проверки последней попытки
    #[must_use]
    pub fn last_report(&self) -> Option<&ValidationReport> {
        self.last_report.as_ref()
    }

    /// Сколько участков получили тип по умолчанию при последнем успешном запуске
    #[must_use]
    pub fn forced_defaults(&self) -> usize {
        self.forced_defaults
    }

    /// Формирует и проверяет районы, повторяя попытки до `max_district_regen_attempts`
    ///
    /// Каждая попытка начинается с чистого состояния: все `district_id` сбрасываются.
    /// После успешной проверки типы участков приводятся к типам районов,
    /// а участки без района получают тип по умолчанию.
    ///
    /// # Ошибки
    /// [`LayoutError::NoValidLayout`], если ни одна попытка не прошла проверку.
    pub fn generate_and_validate_districts<R: Rng + ?Sized>(
        &mut self,
        plots: &mut [Plot],
        rng: &mut R,
    ) -> Result<Vec<District>, LayoutError> {
        let config = self.config;
        let graph = AdjacencyGraph::build(
            plots,
            config.road_width,
            config.max_plot_size + config.road_width,
        );
        debug!(
            "Граф смежности: {} участков, {} рёбер",
            graph.node_count(),
            graph.edge_count()
        );

        let attempts = config.max_district_regen_attempts;
        for attempt in 1..=attempts {
            self.attempts_used = attempt;
            for plot in plots.iter_mut() {
                plot.district_id = None;
            }

            let ctx = GrowthContext {
                config,
                geometry: self.geometry,
                graph: &graph,
            };
            let mut districts = seed_and_grow(&ctx, plots, &mut self.next_district_id, rng);
            assign_remaining_plots(&ctx, plots, &mut districts);

            let report = validate_district_layout(&districts, &self.geometry, config);
            let valid = report.is_valid();
            if !valid {
                debug!(
                    "Попытка {attempt}/{attempts} отклонена: {:?}",
                    report.failures
                );
            }
            self.last_report = Some(report);
            if !valid {
                continue;
            }

            adjust_plot_types_within_districts(plots, &districts);
            self.forced_defaults = assign_default_type_to_unassigned(plots);
            info!(
                "Районы сформированы с попытки {attempt}: {} районов",
                districts.len()
            );
            return Ok(districts);
        }

        for plot in plots.iter_mut() {
            plot.district_id = None;
        }
        error!("Не удалось построить допустимую раскладку районов за {attempts} попыток");
        Err(LayoutError::NoValidLayout { attempts })
    }
}
