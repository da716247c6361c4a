//! Property-based tests for the tagger and the cost analyzer
//!
//! Invariants that hold for every input:
//! - Spans rebuild the input and tile it without gaps or overlaps
//! - Escaping is invertible
//! - Line classification is deterministic and priced by category alone

use proptest::prelude::*;

use tacscope_core::config::CostTable;
use tacscope_core::cost::{self, CostAnalyzer};
use tacscope_core::markup::{escape, unescape};
use tacscope_core::tagger::tag;
use tacscope_core::types::TokenCategory;

/// Text dense in the characters the recognizers react to.
fn c_like() -> impl Strategy<Value = String> {
    "[a-z0-9 #/*\"'<>&=+%!._eE\\-\\n\\t]{0,80}"
}

/// Lines built from TAC-ish fragments.
fn tac_line() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("t1"),
            Just("="),
            Just("=="),
            Just("*"),
            Just("/"),
            Just("%"),
            Just("+"),
            Just("++"),
            Just("-"),
            Just("->"),
            Just("<"),
            Just(">="),
            Just("return"),
            Just("if"),
            Just("goto"),
            Just("L1:"),
            Just("MOD"),
            Just(" "),
        ],
        0..8,
    )
    .prop_map(|parts| parts.concat())
}

fn assert_tiles(source: &str) -> Result<(), TestCaseError> {
    let spans = tag(source);
    let rebuilt: String = spans.iter().map(|s| s.text.as_str()).collect();
    prop_assert_eq!(rebuilt.as_str(), source);

    let mut expected_start = 0;
    for span in &spans {
        prop_assert_eq!(span.start, expected_start);
        prop_assert!(span.end > span.start);
        prop_assert_eq!(&source[span.start..span.end], span.text.as_str());
        expected_start = span.end;
    }
    prop_assert_eq!(expected_start, source.len());

    for pair in spans.windows(2) {
        prop_assert!(
            !(pair[0].category == TokenCategory::Plain && pair[1].category == TokenCategory::Plain)
        );
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_spans_tile_arbitrary_text(source in any::<String>()) {
        assert_tiles(&source)?;
    }

    #[test]
    fn prop_spans_tile_c_like_text(source in c_like()) {
        assert_tiles(&source)?;
    }

    #[test]
    fn prop_tagging_is_deterministic(source in c_like()) {
        prop_assert_eq!(tag(&source), tag(&source));
    }

    #[test]
    fn prop_unescape_inverts_escape(text in any::<String>()) {
        prop_assert_eq!(unescape(&escape(&text)), text);
    }

    #[test]
    fn prop_escaped_text_has_no_raw_brackets(text in c_like()) {
        let escaped = escape(&text);
        prop_assert!(!escaped.contains('<') && !escaped.contains('>'));
    }

    #[test]
    fn prop_classification_is_deterministic(line in any::<String>()) {
        let first = cost::classify_line(&line);
        let second = cost::classify_line(&line);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.cost, CostTable::default().cost_of(first.category));
    }

    #[test]
    fn prop_tac_cost_depends_only_on_category(line in tac_line()) {
        let analyzer = CostAnalyzer::default();
        let result = analyzer.classify_line(&line);
        prop_assert_eq!(result.cost, analyzer.costs().cost_of(result.category));
        prop_assert_eq!(result.category, analyzer.categorize(&line.to_uppercase()));
    }

    #[test]
    fn prop_total_cost_is_sum_of_lines(lines in prop::collection::vec(tac_line(), 0..12)) {
        let code = lines.join("\n");
        let result = cost::analyze(code.as_str());
        let sum: u64 = result.lines.iter().map(|l| u64::from(l.cost)).sum();
        prop_assert_eq!(result.total_cost, sum);
        let non_blank = lines.iter().filter(|l| !l.trim().is_empty()).count();
        prop_assert_eq!(result.instruction_count, non_blank);
    }

    #[test]
    fn prop_reduction_is_zero_for_empty_before(after in prop::collection::vec(tac_line(), 0..6)) {
        let cmp = cost::compare("", after.join("\n").as_str());
        prop_assert_eq!(cmp.cost_reduction_pct, 0.0);
        prop_assert_eq!(cmp.instruction_reduction_pct, 0.0);
    }
}
