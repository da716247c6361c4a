use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::metrics::{round2, ComparisonResult};
use crate::types::{LineClassification, OpCategory};

/// Count and summed cost for one operation category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub count: usize,
    pub total_cost: u64,
}

/// Lines grouped by category, keyed in rule order. Only categories that occur
/// are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub categories: BTreeMap<OpCategory, CategoryStat>,
}

impl CategoryBreakdown {
    pub fn from_lines(lines: &[LineClassification]) -> Self {
        let mut categories: BTreeMap<OpCategory, CategoryStat> = BTreeMap::new();
        for line in lines {
            let stat = categories.entry(line.category).or_default();
            stat.count += 1;
            stat.total_cost += u64::from(line.cost);
        }
        Self { categories }
    }

    pub fn get(&self, category: OpCategory) -> CategoryStat {
        self.categories.get(&category).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// One labelled bar of a before/after dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
}

/// Two-bar datasets for drawing a comparison. Averages are rounded to two
/// decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub total_cost: [ChartBar; 2],
    pub instruction_count: [ChartBar; 2],
    pub average_cost: [ChartBar; 2],
}

fn pair(before: f64, after: f64) -> [ChartBar; 2] {
    [
        ChartBar {
            label: "before".to_string(),
            value: before,
        },
        ChartBar {
            label: "after".to_string(),
            value: after,
        },
    ]
}

impl ChartData {
    pub fn from_comparison(cmp: &ComparisonResult) -> Self {
        Self {
            total_cost: pair(cmp.before.total_cost as f64, cmp.after.total_cost as f64),
            instruction_count: pair(
                cmp.before.instruction_count as f64,
                cmp.after.instruction_count as f64,
            ),
            average_cost: pair(
                round2(cmp.before.average_cost),
                round2(cmp.after.average_cost),
            ),
        }
    }
}
