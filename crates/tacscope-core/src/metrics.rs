use serde::{Deserialize, Serialize};

use crate::metrics_report::{CategoryBreakdown, ChartData};
use crate::types::LineClassification;

/// Aggregate cost statistics for one piece of TAC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub lines: Vec<LineClassification>,
    pub instruction_count: usize,
    pub total_cost: u64,
    pub average_cost: f64,
}

impl AnalysisResult {
    /// The result for absent or blank input.
    pub fn empty() -> Self {
        Self::from_lines(Vec::new())
    }

    /// Reduce classified lines into totals.
    pub fn from_lines(lines: Vec<LineClassification>) -> Self {
        let instruction_count = lines.len();
        let total_cost: u64 = lines.iter().map(|l| u64::from(l.cost)).sum();
        let average_cost = if instruction_count == 0 {
            0.0
        } else {
            total_cost as f64 / instruction_count as f64
        };
        Self {
            lines,
            instruction_count,
            total_cost,
            average_cost,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.instruction_count == 0
    }

    /// Per-line costs in input order.
    pub fn costs(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines.iter().map(|l| l.cost)
    }

    pub fn breakdown(&self) -> CategoryBreakdown {
        CategoryBreakdown::from_lines(&self.lines)
    }
}

/// Costs of the i-th instruction on each side; `None` past that side's end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub index: usize,
    pub before_cost: Option<u32>,
    pub after_cost: Option<u32>,
}

/// Before/after comparison of two pieces of TAC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub before: AnalysisResult,
    pub after: AnalysisResult,
    pub cost_reduction_pct: f64,
    pub instruction_reduction_pct: f64,
    pub avg_cost_reduction_pct: f64,
    /// `before.instruction_count - after.instruction_count`
    pub instruction_delta: i64,
    pub per_index_series: Vec<SeriesPoint>,
}

impl ComparisonResult {
    pub fn new(before: AnalysisResult, after: AnalysisResult) -> Self {
        let cost_reduction_pct =
            reduction_pct(before.total_cost as f64, after.total_cost as f64);
        let instruction_reduction_pct = reduction_pct(
            before.instruction_count as f64,
            after.instruction_count as f64,
        );
        let avg_cost_reduction_pct = reduction_pct(before.average_cost, after.average_cost);
        let instruction_delta = before.instruction_count as i64 - after.instruction_count as i64;
        let per_index_series = build_series(&before, &after);

        Self {
            before,
            after,
            cost_reduction_pct,
            instruction_reduction_pct,
            avg_cost_reduction_pct,
            instruction_delta,
            per_index_series,
        }
    }

    pub fn chart_data(&self) -> ChartData {
        ChartData::from_comparison(self)
    }

    /// True when the cost reduction reaches `min_pct`.
    pub fn meets_reduction(&self, min_pct: f64) -> bool {
        self.cost_reduction_pct >= min_pct
    }
}

/// `(before - after) / before * 100`, or 0 when `before` is 0.
pub fn reduction_pct(before: f64, after: f64) -> f64 {
    if before == 0.0 {
        0.0
    } else {
        (before - after) / before * 100.0
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn build_series(before: &AnalysisResult, after: &AnalysisResult) -> Vec<SeriesPoint> {
    let len = before.lines.len().max(after.lines.len());
    (0..len)
        .map(|index| SeriesPoint {
            index,
            before_cost: before.lines.get(index).map(|l| l.cost),
            after_cost: after.lines.get(index).map(|l| l.cost),
        })
        .collect()
}
