use tacscope_core::metrics::{AnalysisResult, ComparisonResult};

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// A reduction percentage shown as a signed change in cost.
fn cost_change(reduction_pct: f64) -> String {
    if reduction_pct > 0.0 {
        format!("-{reduction_pct:.1}%")
    } else if reduction_pct < 0.0 {
        format!("+{:.1}%", -reduction_pct)
    } else {
        "0.0%".to_string()
    }
}

fn breakdown_table(result: &AnalysisResult) -> String {
    let breakdown = result.breakdown();
    if breakdown.is_empty() {
        return String::new();
    }
    let mut out = String::from("| Category | Lines | Cost |\n|----------|-------|------|\n");
    for (category, stat) in &breakdown.categories {
        out.push_str(&format!(
            "| {category} | {} | {} |\n",
            stat.count, stat.total_cost
        ));
    }
    out
}

/// Format a single analysis as Markdown.
pub fn format_analysis(result: &AnalysisResult) -> String {
    let mut out = String::new();

    out.push_str("# tacscope - TAC Cost Analysis\n\n");
    out.push_str(&format!(
        "- **Instructions:** {}\n- **Total cost:** {}\n- **Average cost:** {:.2}\n",
        result.instruction_count, result.total_cost, result.average_cost
    ));

    if result.is_empty() {
        out.push_str("\nNo instructions to analyze.\n");
        return out;
    }

    out.push_str("\n## Categories\n\n");
    out.push_str(&breakdown_table(result));

    out.push_str("\n## Instructions\n\n");
    out.push_str("| Line | Cost | Category | Instruction |\n");
    out.push_str("|------|------|----------|-------------|\n");
    for line in &result.lines {
        out.push_str(&format!(
            "| {} | {} | {} | `{}` |\n",
            line.line_index + 1,
            line.cost,
            line.category,
            escape_cell(&line.text)
        ));
    }

    out
}

/// Format a before/after comparison as Markdown.
pub fn format_comparison(cmp: &ComparisonResult) -> String {
    let mut out = String::new();

    out.push_str("# tacscope - TAC Cost Comparison\n\n");
    out.push_str("## Detailed Statistics\n\n");
    out.push_str("| Metric | Before | After | Improvement |\n");
    out.push_str("|--------|-------:|------:|------------:|\n");
    out.push_str(&format!(
        "| Instructions | {} | {} | {} ({:.1}%) |\n",
        cmp.before.instruction_count,
        cmp.after.instruction_count,
        -cmp.instruction_delta,
        cmp.instruction_reduction_pct
    ));
    out.push_str(&format!(
        "| Total Cost | {} | {} | {} |\n",
        cmp.before.total_cost,
        cmp.after.total_cost,
        cost_change(cmp.cost_reduction_pct)
    ));
    out.push_str(&format!(
        "| Avg Cost/Instruction | {:.2} | {:.2} | {} |\n",
        cmp.before.average_cost,
        cmp.after.average_cost,
        cost_change(cmp.avg_cost_reduction_pct)
    ));

    if !cmp.before.is_empty() {
        out.push_str("\n## Before by Category\n\n");
        out.push_str(&breakdown_table(&cmp.before));
    }
    if !cmp.after.is_empty() {
        out.push_str("\n## After by Category\n\n");
        out.push_str(&breakdown_table(&cmp.after));
    }

    out
}
