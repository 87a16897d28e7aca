// src/district/adjacency.rs
//! Граф смежности участков.
//!
//! Два участка — соседи, если они касаются сторонами без зазора или разделены
//! ровно одной дорогой, и при этом перекрываются по перпендикулярной оси.
//! Кандидаты ищутся через равномерную сетку корзин, итог — `petgraph::UnGraph`,
//! в котором индекс узла совпадает с позицией участка во входном срезе.

use crate::plot::{Plot, PlotId, Rect};
use petgraph::graph::{NodeIndex, UnGraph};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Допуск сравнения зазоров и перекрытий
pub const ADJACENCY_TOLERANCE: f32 = 0.01;

/// Проверка соседства двух прямоугольников
#[must_use]
pub fn are_neighbors(a: &Rect, b: &Rect, road_width: f32) -> bool {
    let overlap_x = a.max_x().min(b.max_x()) - a.x.max(b.x);
    let overlap_z = a.max_z().min(b.max_z()) - a.z.max(b.z);
    // Отрицательный зазор означает перекрытие интервалов
    let gap_x = (b.x - a.max_x()).max(a.x - b.max_x());
    let gap_z = (b.z - a.max_z()).max(a.z - b.max_z());

    let touches = |gap: f32, overlap: f32| {
        gap.abs() <= ADJACENCY_TOLERANCE && overlap >= ADJACENCY_TOLERANCE
    };
    let across_road = |gap: f32, overlap: f32| {
        (gap - road_width).abs() <= ADJACENCY_TOLERANCE && overlap > ADJACENCY_TOLERANCE
    };

    touches(gap_x, overlap_z)
        || touches(gap_z, overlap_x)
        || across_road(gap_x, overlap_z)
        || across_road(gap_z, overlap_x)
}

/// Линейный поиск соседей участка среди всех участков
#[must_use]
pub fn find_neighbors(plot: &Plot, all_plots: &[Plot], road_width: f32) -> Vec<PlotId> {
    let rect = plot.rect();
    all_plots
        .iter()
        .filter(|other| other.id != plot.id && are_neighbors(&rect, &other.rect(), road_width))
        .map(|other| other.id)
        .collect()
}

/// Равномерная сетка корзин над прямоугольниками
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    origin: (f32, f32),
    bucket_size: f32,
    cols: usize,
    rows: usize,
    buckets: Vec<Vec<usize>>,
}

impl SpatialGrid {
    /// Раскладывает прямоугольники по корзинам со стороной `bucket_size`
    #[must_use]
    pub fn new(rects: &[Rect], bucket_size: f32) -> Self {
        let bounds = rects
            .iter()
            .copied()
            .reduce(|acc, r| acc.union(&r))
            .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
        let bucket_size = bucket_size.max(1.0);
        let cols = ((bounds.width / bucket_size).ceil() as usize).max(1);
        let rows = ((bounds.depth / bucket_size).ceil() as usize).max(1);

        let mut grid = Self {
            origin: (bounds.x, bounds.z),
            bucket_size,
            cols,
            rows,
            buckets: vec![Vec::new(); cols * rows],
        };
        for (index, rect) in rects.iter().enumerate() {
            let (c0, c1, r0, r1) = grid.cell_range(rect, 0.0);
            for row in r0..=r1 {
                for col in c0..=c1 {
                    grid.buckets[row * cols + col].push(index);
                }
            }
        }
        grid
    }

    fn clamp_cell(&self, value: f32, origin: f32, limit: usize) -> usize {
        let cell = ((value - origin) / self.bucket_size).floor();
        if cell <= 0.0 {
            0
        } else {
            (cell as usize).min(limit - 1)
        }
    }

    fn cell_range(&self, rect: &Rect, margin: f32) -> (usize, usize, usize, usize) {
        (
            self.clamp_cell(rect.x - margin, self.origin.0, self.cols),
            self.clamp_cell(rect.max_x() + margin, self.origin.0, self.cols),
            self.clamp_cell(rect.z - margin, self.origin.1, self.rows),
            self.clamp_cell(rect.max_z() + margin, self.origin.1, self.rows),
        )
    }

    /// Индексы прямоугольников в корзинах, задетых `rect`, расширенным на `margin`
    #[must_use]
    pub fn candidates(&self, rect: &Rect, margin: f32) -> Vec<usize> {
        let (c0, c1, r0, r1) = self.cell_range(rect, margin);
        let mut found = Vec::new();
        for row in r0..=r1 {
            for col in c0..=c1 {
                found.extend_from_slice(&self.buckets[row * self.cols + col]);
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }
}

/// Граф смежности листовых участков
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    graph: UnGraph<PlotId, ()>,
}

impl AdjacencyGraph {
    /// Строит граф по срезу участков; `bucket_size` — сторона корзины индекса
    #[must_use]
    pub fn build(plots: &[Plot], road_width: f32, bucket_size: f32) -> Self {
        let rects: Vec<Rect> = plots.iter().map(Plot::rect).collect();
        let index = SpatialGrid::new(&rects, bucket_size);
        let margin = road_width + ADJACENCY_TOLERANCE;

        let neighbors_of = |i: usize| -> Vec<usize> {
            index
                .candidates(&rects[i], margin)
                .into_iter()
                .filter(|&j| j > i && are_neighbors(&rects[i], &rects[j], road_width))
                .collect()
        };

        #[cfg(feature = "parallel")]
        let lists: Vec<Vec<usize>> = (0..plots.len()).into_par_iter().map(neighbors_of).collect();
        #[cfg(not(feature = "parallel"))]
        let lists: Vec<Vec<usize>> = (0..plots.len()).map(neighbors_of).collect();

        let mut graph = UnGraph::with_capacity(plots.len(), plots.len() * 3);
        for plot in plots {
            graph.add_node(plot.id);
        }
        for (i, list) in lists.into_iter().enumerate() {
            for j in list {
                graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
            }
        }
        Self { graph }
    }

    /// Позиции соседей участка с позицией `index`, по возрастанию
    #[must_use]
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        let mut result: Vec<usize> = self
            .graph
            .neighbors(NodeIndex::new(index))
            .map(NodeIndex::index)
            .collect();
        result.sort_unstable();
        result
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn graph(&self) -> &UnGraph<PlotId, ()> {
        &self.graph
    }
}
