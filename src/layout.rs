// src/layout.rs
//! Рекурсивное деление карты на участки, разделённые дорожными коридорами.
//!
//! Дерево участков хранится в плоской арене (`Vec<Plot>`), индекс в арене равен `PlotId`.
//! Все вычисления разбиения ведутся в целых ячейках сетки, поэтому координаты и размеры
//! участков всегда кратны шагу сетки.

use crate::config::CityConfig;
use crate::geometry::{MapGeometry, snap_position, snap_size, to_cells};
use crate::plot::{Plot, PlotId, ZoneType};
use rand::Rng;
use tracing::{debug, trace};

/// Допуск сравнения размеров с `min_plot_size`
const SIZE_EPSILON: f32 = 1e-4;

/// Доля `min_plot_size`, при которой стороны считаются равными и ось выбирается случайно
const SQUARE_TOLERANCE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Z,
}

impl Axis {
    fn other(self) -> Self {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }
}

/// Генератор раскладки участков
pub struct LayoutGenerator<'a> {
    config: &'a CityConfig,
    plots: Vec<Plot>,
}

impl<'a> LayoutGenerator<'a> {
    #[must_use]
    pub fn new(config: &'a CityConfig) -> Self {
        Self {
            config,
            plots: Vec::new(),
        }
    }

    /// Все участки дерева деления, включая внутренние узлы
    ///
    /// Это снимок на момент `generate_layout`: листья хранят предварительный тип
    /// застройки и `district_id = None`. Итоговые типы и районы есть только
    /// в участках, возвращённых `generate_layout` и обработанных `DistrictManager`.
    #[must_use]
    pub fn all_plots(&self) -> &[Plot] {
        &self.plots
    }

    #[must_use]
    pub fn root(&self) -> Option<&Plot> {
        self.plots.first()
    }

    /// Центр и радиус текущей карты (после `generate_layout`)
    #[must_use]
    pub fn map_geometry(&self) -> Option<MapGeometry> {
        self.root().map(|root| MapGeometry::from_root(&root.rect()))
    }

    /// Строит раскладку с нуля и возвращает застраиваемые листья
    ///
    /// Корневой участок центрирован в начале координат и привязан к сетке.
    /// Листья меньше `min_plot_size` помечаются `Unbuildable` и в результат не попадают.
    pub fn generate_layout<R: Rng + ?Sized>(&mut self, map_size: f32, rng: &mut R) -> Vec<Plot> {
        self.plots.clear();

        let cell = self.config.cell_size();
        let origin = snap_position(-map_size / 2.0, cell);
        let size = snap_size(map_size, cell);
        let root = self.create_plot(origin, origin, size, size);

        self.subdivide_plot(root, 0, rng);

        let mut leaves = Vec::new();
        self.collect_leaf_plots(root, rng, &mut leaves);

        let result: Vec<Plot> = leaves
            .into_iter()
            .map(|id| self.plots[id.0 as usize].clone())
            .filter(|plot| plot.is_buildable())
            .collect();

        debug!(
            "Раскладка: {} участков в дереве, {} застраиваемых листьев",
            self.plots.len(),
            result.len()
        );
        result
    }

    fn create_plot(&mut self, x: f32, z: f32, width: f32, depth: f32) -> PlotId {
        let id = PlotId(self.plots.len() as u32);
        self.plots.push(Plot::new(id, x, z, width, depth));
        id
    }

    fn mark_leaf(&mut self, id: PlotId) {
        let plot = &mut self.plots[id.0 as usize];
        plot.is_leaf = true;
        plot.children = None;
    }

    fn min_cells(&self) -> i64 {
        (self.config.min_plot_size / self.config.cell_size() - SIZE_EPSILON).ceil() as i64
    }

    fn road_cells(&self) -> i64 {
        to_cells(self.config.road_width, self.config.cell_size())
    }

    fn can_split(&self, length_cells: i64) -> bool {
        length_cells >= 2 * self.min_cells() + self.road_cells()
    }

    /// Рекурсивное деление участка
    ///
    /// Участок становится листом, если ни одна ось не делится на две части
    /// не меньше `min_plot_size` с дорогой между ними, либо если достигнута
    /// `max_recursion_depth` и обе стороны уже не больше `max_plot_size`.
    fn subdivide_plot<R: Rng + ?Sized>(&mut self, id: PlotId, depth: u32, rng: &mut R) {
        let cell = self.config.cell_size();
        let plot = &self.plots[id.0 as usize];
        let (x_cells, z_cells) = (to_cells(plot.x, cell), to_cells(plot.z, cell));
        let (w_cells, d_cells) = (to_cells(plot.width, cell), to_cells(plot.depth, cell));
        let (width, plot_depth) = (plot.width, plot.depth);

        let can_x = self.can_split(w_cells);
        let can_z = self.can_split(d_cells);
        if !can_x && !can_z {
            self.mark_leaf(id);
            return;
        }
        if depth >= self.config.max_recursion_depth
            && width <= self.config.max_plot_size
            && plot_depth <= self.config.max_plot_size
        {
            self.mark_leaf(id);
            return;
        }

        // 1. Ось: длинная сторона, почти квадрат — случайно
        let preferred = if (width - plot_depth).abs() < self.config.min_plot_size * SQUARE_TOLERANCE
        {
            if rng.gen_bool(0.5) { Axis::X } else { Axis::Z }
        } else if width > plot_depth {
            Axis::X
        } else {
            Axis::Z
        };
        let splittable = |axis: Axis| match axis {
            Axis::X => can_x,
            Axis::Z => can_z,
        };
        let axis = if splittable(preferred) {
            preferred
        } else {
            preferred.other()
        };

        // 2. Положение дороги: длина первого ребёнка в ячейках
        let length = match axis {
            Axis::X => w_cells,
            Axis::Z => d_cells,
        };
        let road = self.road_cells();
        let lo = self.min_cells();
        let hi = length - road - lo;
        let first = if lo <= hi {
            rng.gen_range(lo..=hi)
        } else {
            (length - road) / 2
        };
        let second = length - road - first;

        // 3. Вырожденное деление — оставляем участок листом
        if first <= 0 || second <= 0 {
            trace!("Участок {} не делится: {first}/{second} ячеек", id.0);
            self.mark_leaf(id);
            return;
        }

        let to_world = |cells: i64| cells as f32 * cell;
        let (a, b) = match axis {
            Axis::X => (
                (x_cells, z_cells, first, d_cells),
                (x_cells + first + road, z_cells, second, d_cells),
            ),
            Axis::Z => (
                (x_cells, z_cells, w_cells, first),
                (x_cells, z_cells + first + road, w_cells, second),
            ),
        };
        let child_a = self.create_plot(to_world(a.0), to_world(a.1), to_world(a.2), to_world(a.3));
        let child_b = self.create_plot(to_world(b.0), to_world(b.1), to_world(b.2), to_world(b.3));

        let parent = &mut self.plots[id.0 as usize];
        parent.children = Some([child_a, child_b]);
        parent.is_leaf = false;

        // 4. Рекурсия
        self.subdivide_plot(child_a, depth + 1, rng);
        self.subdivide_plot(child_b, depth + 1, rng);
    }

    /// Обход дерева: листья получают предварительный тип застройки
    fn collect_leaf_plots<R: Rng + ?Sized>(
        &mut self,
        id: PlotId,
        rng: &mut R,
        out: &mut Vec<PlotId>,
    ) {
        if let Some([a, b]) = self.plots[id.0 as usize].children {
            self.collect_leaf_plots(a, rng, out);
            self.collect_leaf_plots(b, rng, out);
            return;
        }

        let min = self.config.min_plot_size - SIZE_EPSILON;
        let plot = &self.plots[id.0 as usize];
        let zone = if plot.width >= min && plot.depth >= min {
            zone_type_for_roll(self.config, rng.gen_range(0.0..1.0))
        } else {
            ZoneType::Unbuildable
        };
        self.plots[id.0 as usize].set_zone_type(zone);
        out.push(id);
    }
}

/// Классификация по накопленным порогам: парк, промышленность, дом, небоскрёб, иначе здание
#[must_use]
pub fn zone_type_for_roll(config: &CityConfig, roll: f32) -> ZoneType {
    let thresholds = [
        (config.park_probability, ZoneType::Park),
        (config.industrial_zone_probability, ZoneType::Industrial),
        (config.house_zone_probability, ZoneType::House),
        (config.skyscraper_zone_probability, ZoneType::Skyscraper),
    ];
    let mut cumulative = 0.0;
    for (probability, zone) in thresholds {
        cumulative += probability;
        if roll < cumulative {
            return zone;
        }
    }
    ZoneType::Building
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn scenario_config() -> CityConfig {
        CityConfig {
            map_size: 800.0,
            road_width: 10.0,
            min_plot_size: 30.0,
            max_plot_size: 60.0,
            max_recursion_depth: 7,
            ..CityConfig::default()
        }
    }

    fn is_grid_aligned(value: f32, cell: f32) -> bool {
        let cells = value / cell;
        (cells - cells.round()).abs() < 1e-3
    }

    #[test]
    fn leaves_respect_size_bounds_in_reference_scenario() {
        let config = scenario_config();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut generator = LayoutGenerator::new(&config);
        let leaves = generator.generate_layout(config.map_size, &mut rng);

        assert!(!leaves.is_empty(), "800×800 map must produce plots");
        // Неделимая сторона короче 2·min + road, делимая сторона листа не длиннее max
        let upper = config.max_plot_size.max(2.0 * config.min_plot_size + config.road_width - 1.0);
        for plot in &leaves {
            assert!(plot.is_leaf);
            assert!(plot.width >= config.min_plot_size && plot.width <= upper, "{plot:?}");
            assert!(plot.depth >= config.min_plot_size && plot.depth <= upper, "{plot:?}");
            assert_ne!(plot.zone_type, ZoneType::Unassigned);
            assert_ne!(plot.zone_type, ZoneType::Unbuildable);
        }
    }

    #[test]
    fn leaf_and_road_area_tile_the_root() {
        let config = scenario_config();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut generator = LayoutGenerator::new(&config);
        generator.generate_layout(config.map_size, &mut rng);
        let plots = generator.all_plots();

        let leaf_area: f32 = plots.iter().filter(|p| p.is_leaf).map(|p| p.width * p.depth).sum();
        let road_area: f32 = plots
            .iter()
            .filter_map(|p| p.children.map(|[a, _]| (p, &plots[a.0 as usize])))
            .map(|(parent, a)| {
                if (a.depth - parent.depth).abs() < 1e-3 {
                    config.road_width * parent.depth
                } else {
                    config.road_width * parent.width
                }
            })
            .sum();
        let root = &plots[0];
        let root_area = root.width * root.depth;
        assert!(
            (leaf_area + road_area - root_area).abs() < 1.0,
            "leaves {leaf_area} + roads {road_area} != root {root_area}"
        );
    }

    #[test]
    fn siblings_are_separated_by_exactly_one_road() {
        let config = scenario_config();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut generator = LayoutGenerator::new(&config);
        generator.generate_layout(config.map_size, &mut rng);
        let plots = generator.all_plots();

        for parent in plots {
            let Some([a, b]) = parent.children else {
                continue;
            };
            let (a, b) = (&plots[a.0 as usize], &plots[b.0 as usize]);
            let gap_x = b.x - a.rect().max_x();
            let gap_z = b.z - a.rect().max_z();
            let split_on_x = (a.depth - parent.depth).abs() < 1e-3;
            if split_on_x {
                assert!((gap_x - config.road_width).abs() < 1e-3, "x gap {gap_x}");
                assert!((a.width + b.width + config.road_width - parent.width).abs() < 1e-3);
            } else {
                assert!((gap_z - config.road_width).abs() < 1e-3, "z gap {gap_z}");
                assert!((a.depth + b.depth + config.road_width - parent.depth).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn map_smaller_than_min_plot_yields_no_buildable_plots() {
        let config = CityConfig {
            map_size: 20.0,
            ..scenario_config()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut generator = LayoutGenerator::new(&config);
        let leaves = generator.generate_layout(config.map_size, &mut rng);
        assert!(leaves.is_empty());
        let root = generator.root().expect("root plot exists");
        assert!(root.is_leaf);
        assert_eq!(root.zone_type, ZoneType::Unbuildable);
    }

    #[test]
    fn regeneration_replaces_previous_tree() {
        let config = scenario_config();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut generator = LayoutGenerator::new(&config);
        generator.generate_layout(config.map_size, &mut rng);
        generator.generate_layout(config.map_size, &mut rng);
        let plots = generator.all_plots();
        assert_eq!(plots[0].id, PlotId(0));
        for (index, plot) in plots.iter().enumerate() {
            assert_eq!(plot.id.0 as usize, index);
        }
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let config = scenario_config();
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            LayoutGenerator::new(&config).generate_layout(config.map_size, &mut rng)
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn zone_roll_follows_cumulative_order() {
        let config = CityConfig {
            park_probability: 0.1,
            industrial_zone_probability: 0.2,
            house_zone_probability: 0.3,
            skyscraper_zone_probability: 0.1,
            ..CityConfig::default()
        };
        assert_eq!(zone_type_for_roll(&config, 0.05), ZoneType::Park);
        assert_eq!(zone_type_for_roll(&config, 0.15), ZoneType::Industrial);
        assert_eq!(zone_type_for_roll(&config, 0.45), ZoneType::House);
        assert_eq!(zone_type_for_roll(&config, 0.65), ZoneType::Skyscraper);
        assert_eq!(zone_type_for_roll(&config, 0.75), ZoneType::Building);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn every_plot_is_grid_aligned(seed in any::<u64>(), half_cells in 1_u8..=4) {
            let config = CityConfig {
                map_size: 400.0,
                grid_scale: f32::from(half_cells),
                ..scenario_config()
            };
            let cell = config.cell_size();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut generator = LayoutGenerator::new(&config);
            generator.generate_layout(config.map_size, &mut rng);
            for plot in generator.all_plots() {
                prop_assert!(is_grid_aligned(plot.x, cell), "x {} in {plot:?}", plot.x);
                prop_assert!(is_grid_aligned(plot.z, cell), "z {} in {plot:?}", plot.z);
                prop_assert!(is_grid_aligned(plot.width, cell));
                prop_assert!(is_grid_aligned(plot.depth, cell));
                prop_assert!(plot.width > 0.0 && plot.depth > 0.0);
            }
        }

        #[test]
        fn leaves_never_overlap(seed in any::<u64>()) {
            let config = CityConfig { map_size: 400.0, ..scenario_config() };
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let leaves = LayoutGenerator::new(&config).generate_layout(config.map_size, &mut rng);
            for (i, a) in leaves.iter().enumerate() {
                for b in &leaves[i + 1..] {
                    prop_assert!(a.rect().overlap_area(&b.rect()) < 1e-3, "{a:?} overlaps {b:?}");
                }
            }
        }
    }
}
