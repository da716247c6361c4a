use serde::Serialize;

use tacscope_core::metrics::{AnalysisResult, ComparisonResult};
use tacscope_core::metrics_report::{CategoryBreakdown, ChartData};
use tacscope_core::types::Span;

fn encode<T: Serialize + ?Sized>(value: &T, compact: bool) -> String {
    if compact {
        serde_json::to_string(value).expect("report should be serializable")
    } else {
        serde_json::to_string_pretty(value).expect("report should be serializable")
    }
}

/// Format tagged spans as a JSON array.
pub fn format_spans(spans: &[Span], compact: bool) -> String {
    encode(spans, compact)
}

/// Analysis plus its category breakdown.
#[derive(Debug, Serialize)]
pub struct AnalysisOutput<'a> {
    #[serde(flatten)]
    pub result: &'a AnalysisResult,
    pub breakdown: CategoryBreakdown,
}

/// Format a single analysis as JSON.
pub fn format_analysis(result: &AnalysisResult, compact: bool) -> String {
    let output = AnalysisOutput {
        result,
        breakdown: result.breakdown(),
    };
    encode(&output, compact)
}

/// Comparison plus per-side breakdowns and chart datasets.
#[derive(Debug, Serialize)]
pub struct ComparisonOutput<'a> {
    #[serde(flatten)]
    pub comparison: &'a ComparisonResult,
    pub breakdown: SideBreakdown,
    pub charts: ChartData,
}

#[derive(Debug, Serialize)]
pub struct SideBreakdown {
    pub before: CategoryBreakdown,
    pub after: CategoryBreakdown,
}

impl<'a> ComparisonOutput<'a> {
    pub fn new(comparison: &'a ComparisonResult) -> Self {
        Self {
            comparison,
            breakdown: SideBreakdown {
                before: comparison.before.breakdown(),
                after: comparison.after.breakdown(),
            },
            charts: comparison.chart_data(),
        }
    }
}

/// Format a comparison as JSON.
pub fn format_comparison(cmp: &ComparisonResult, compact: bool) -> String {
    encode(&ComparisonOutput::new(cmp), compact)
}

/// Wrapper for check output that adds pass/fail metadata.
#[derive(Debug, Serialize)]
pub struct CheckOutput<'a> {
    #[serde(flatten)]
    pub result: ComparisonOutput<'a>,
    pub check: CheckStatus,
}

#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub passed: bool,
    pub min_cost_reduction: f64,
    pub cost_reduction_pct: f64,
}

/// Format a gated comparison as JSON. Returns (json_string, passed).
pub fn format_check(cmp: &ComparisonResult, min_cost_reduction: f64, compact: bool) -> (String, bool) {
    let passed = cmp.meets_reduction(min_cost_reduction);
    let output = CheckOutput {
        result: ComparisonOutput::new(cmp),
        check: CheckStatus {
            passed,
            min_cost_reduction,
            cost_reduction_pct: cmp.cost_reduction_pct,
        },
    };
    (encode(&output, compact), passed)
}
