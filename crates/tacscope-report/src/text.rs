use colored::{ColoredString, Colorize};

use tacscope_core::metrics::{AnalysisResult, ComparisonResult};
use tacscope_core::types::{Span, TokenCategory};

fn paint(text: &str, category: TokenCategory) -> ColoredString {
    match category {
        TokenCategory::Comment => text.truecolor(0x6A, 0x99, 0x55).italic(),
        TokenCategory::String => text.truecolor(0xCE, 0x91, 0x78),
        TokenCategory::Preprocessor => text.truecolor(0xC5, 0x86, 0xC0),
        TokenCategory::Keyword => text.truecolor(0x56, 0x9C, 0xD6).bold(),
        TokenCategory::Number => text.truecolor(0xB5, 0xCE, 0xA8),
        TokenCategory::Plain => text.normal(),
    }
}

/// Render tagged source for a terminal, optionally with a line-number gutter.
/// A trailing newline does not start a numbered line.
pub fn format_highlight(spans: &[Span], line_numbers: bool) -> String {
    let newlines = spans
        .iter()
        .map(|s| s.text.matches('\n').count())
        .sum::<usize>();
    let ends_with_newline = spans.last().is_some_and(|s| s.text.ends_with('\n'));
    let total_lines = newlines + usize::from(!ends_with_newline);
    let width = total_lines.max(1).to_string().len();
    let gutter = |n: usize| format!("{} ", format!("{n:>width$}").dimmed());

    let mut out = String::new();
    let mut line = 1;
    let mut pending_gutter = line_numbers;

    for span in spans {
        // Paint line by line so escape codes never straddle the gutter.
        for (i, piece) in span.text.split('\n').enumerate() {
            if i > 0 {
                if pending_gutter {
                    out.push_str(&gutter(line));
                }
                out.push('\n');
                line += 1;
                pending_gutter = line_numbers;
            }
            if !piece.is_empty() {
                if pending_gutter {
                    out.push_str(&gutter(line));
                    pending_gutter = false;
                }
                out.push_str(&paint(piece, span.category).to_string());
            }
        }
    }
    out
}

fn cost_color(cost: u32) -> ColoredString {
    let s = cost.to_string();
    if cost >= 9 {
        s.red()
    } else if cost >= 4 {
        s.yellow()
    } else {
        s.green()
    }
}

fn percent(value: f64) -> ColoredString {
    let s = format!("{value:.1}%");
    if value > 0.0 {
        s.green().bold()
    } else if value < 0.0 {
        s.red().bold()
    } else {
        s.normal()
    }
}

fn format_summary(result: &AnalysisResult) -> String {
    format!(
        "  Instructions:   {}\n  Total cost:     {}\n  Avg cost/instr: {:.2}\n",
        result.instruction_count, result.total_cost, result.average_cost
    )
}

fn format_breakdown(result: &AnalysisResult) -> String {
    let breakdown = result.breakdown();
    if breakdown.is_empty() {
        return String::new();
    }
    let mut out = String::from("  By category:\n");
    for (category, stat) in &breakdown.categories {
        out.push_str(&format!(
            "    {:<15} {:>4} lines  cost {:>5}\n",
            category.to_string(),
            stat.count,
            stat.total_cost
        ));
    }
    out
}

/// Format a single analysis for terminal output.
pub fn format_analysis(result: &AnalysisResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "tacscope - TAC Cost Analysis".bold()));
    out.push_str(&format!("{}\n\n", "=".repeat(40)));

    if result.is_empty() {
        out.push_str(&format!("{}\n\n", "No instructions to analyze.".yellow()));
        return out;
    }

    out.push_str(&format!("{}\n", "Summary".bold()));
    out.push_str(&format_summary(result));
    out.push_str(&format_breakdown(result));

    out.push_str(&format!("\n{}\n{}\n", "Instructions".bold(), "-".repeat(40)));
    for line in &result.lines {
        out.push_str(&format!(
            "  {:>4}  {:>2}  {:<15} {}\n",
            line.line_index + 1,
            cost_color(line.cost),
            line.category.to_string(),
            line.text
        ));
    }

    out.push('\n');
    out
}

/// Format a before/after comparison for terminal output.
pub fn format_comparison(cmp: &ComparisonResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "tacscope - TAC Cost Comparison".bold()));
    out.push_str(&format!("{}\n\n", "=".repeat(40)));

    out.push_str(&format!("{}\n", "Before".red().bold()));
    out.push_str(&format_summary(&cmp.before));
    out.push_str(&format!("\n{}\n", "After".green().bold()));
    out.push_str(&format_summary(&cmp.after));

    out.push_str(&format!("\n{}\n{}\n", "Improvement".bold(), "-".repeat(40)));
    out.push_str(&format!(
        "  Cost reduction:         {}\n",
        percent(cmp.cost_reduction_pct)
    ));
    let delta = match cmp.instruction_delta {
        d if d < 0 => format!("{} more", -d),
        d => format!("{d} fewer"),
    };
    out.push_str(&format!(
        "  Instruction reduction:  {} ({delta})\n",
        percent(cmp.instruction_reduction_pct)
    ));
    out.push_str(&format!(
        "  Avg cost reduction:     {}\n",
        percent(cmp.avg_cost_reduction_pct)
    ));

    if !cmp.per_index_series.is_empty() {
        out.push_str(&format!(
            "\n{}\n{}\n",
            "Cost per instruction".bold(),
            "-".repeat(40)
        ));
        out.push_str("  index  before  after\n");
        for point in &cmp.per_index_series {
            let cell = |c: Option<u32>| c.map_or_else(|| "-".to_string(), |c| c.to_string());
            out.push_str(&format!(
                "  {:>5}  {:>6}  {:>5}\n",
                point.index,
                cell(point.before_cost),
                cell(point.after_cost)
            ));
        }
    }

    out.push('\n');
    out
}

/// Format a comparison gated on a minimum cost reduction. Returns (text, passed).
pub fn format_check(cmp: &ComparisonResult, min_cost_reduction: f64) -> (String, bool) {
    let passed = cmp.meets_reduction(min_cost_reduction);
    let mut out = format_comparison(cmp);

    if passed {
        out.push_str(&format!("{}\n", "CHECK PASSED".green().bold()));
    } else {
        out.push_str(&format!(
            "{}: cost reduction {:.1}% is below the required {:.1}%\n",
            "CHECK FAILED".red().bold(),
            cmp.cost_reduction_pct,
            min_cost_reduction,
        ));
    }

    (out, passed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacscope_core::cost::{analyze, compare};
    use tacscope_core::tagger::tag;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_highlight_without_colors_is_source() {
        plain();
        let src = "#include <stdio.h>\nint main() { return 0; }\n";
        assert_eq!(format_highlight(&tag(src), false), src);
    }

    #[test]
    fn test_highlight_gutter_numbers_each_line() {
        plain();
        let src = "/* a\n b */\nint x;";
        let out = format_highlight(&tag(src), true);
        assert_eq!(out, "1 /* a\n2  b */\n3 int x;");
    }

    #[test]
    fn test_highlight_gutter_pads_to_widest_number() {
        plain();
        let src = "x\n".repeat(10);
        let out = format_highlight(&tag(&src), true);
        assert!(out.starts_with(" 1 x\n"), "{out:?}");
        assert!(out.ends_with("\n10 x\n"), "{out:?}");
    }

    #[test]
    fn test_highlight_gutter_skips_line_after_final_newline() {
        plain();
        assert_eq!(format_highlight(&tag("a\n\nb\n"), true), "1 a\n2 \n3 b\n");
        assert_eq!(format_highlight(&tag("a\n\n"), true), "1 a\n2 \n");
        assert_eq!(format_highlight(&tag("x\n".repeat(9).as_str()), true).lines().last(), Some("9 x"));
    }

    #[test]
    fn test_highlight_empty() {
        assert_eq!(format_highlight(&[], true), "");
    }

    #[test]
    fn test_format_analysis_lists_lines() {
        plain();
        let result = analyze("t1 = a * b\n\nreturn t1");
        let report = format_analysis(&result);
        assert!(report.contains("Instructions:   2"), "{report}");
        assert!(report.contains("Total cost:     12"), "{report}");
        assert!(report.contains("multiplication"), "{report}");
        assert!(report.contains("   3   2  return"), "{report}");
    }

    #[test]
    fn test_format_analysis_empty() {
        plain();
        let report = format_analysis(&analyze(""));
        assert!(report.contains("No instructions to analyze."));
    }

    #[test]
    fn test_format_comparison_reports_reduction() {
        plain();
        let cmp = compare("int z = (x + y) * 5 - (y / 2);", "z = t1;");
        let report = format_comparison(&cmp);
        assert!(report.contains("Cost reduction:         70.0%"), "{report}");
        assert!(report.contains("0.0% (0 fewer)"), "{report}");
    }

    #[test]
    fn test_format_comparison_reports_added_instructions() {
        plain();
        let cmp = compare("a = b", "a = b\nc = d\nreturn a");
        let report = format_comparison(&cmp);
        assert!(report.contains("(2 more)"), "{report}");
        assert!(!report.contains("fewer"), "{report}");
    }

    #[test]
    fn test_format_comparison_marks_missing_side() {
        plain();
        let cmp = compare("a = b\nreturn a", "return b");
        let report = format_comparison(&cmp);
        assert!(report.contains("      1       2      -"), "{report}");
    }

    #[test]
    fn test_format_check() {
        plain();
        let cmp = compare("a = b * c", "a = t1");
        let (report, passed) = format_check(&cmp, 50.0);
        assert!(passed);
        assert!(report.contains("CHECK PASSED"));

        let (report, passed) = format_check(&cmp, 80.0);
        assert!(!passed);
        assert!(report.contains("CHECK FAILED"));
        assert!(report.contains("below the required 80.0%"));
    }
}
