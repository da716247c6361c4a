use std::sync::LazyLock;

use regex::Regex;

use crate::config::CostTable;
use crate::metrics::{AnalysisResult, ComparisonResult};
use crate::types::{LineClassification, OpCategory};

/// How a rule recognizes its category in a normalized line.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Contains one of `any` and none of `none`.
    Contains {
        any: &'static [&'static str],
        none: &'static [&'static str],
    },
    Pattern(Regex),
}

impl Matcher {
    fn is_match(&self, line: &str) -> bool {
        match self {
            Matcher::Contains { any, none } => {
                any.iter().any(|s| line.contains(s)) && !none.iter().any(|s| line.contains(s))
            }
            Matcher::Pattern(re) => re.is_match(line),
        }
    }
}

/// One entry of the ordered classification rule list.
#[derive(Debug, Clone)]
pub struct OpRule {
    pub category: OpCategory,
    pub matcher: Matcher,
}

impl OpRule {
    /// `line` must already be lowercased and trimmed.
    pub fn matches(&self, line: &str) -> bool {
        self.matcher.is_match(line)
    }
}

fn contains(
    category: OpCategory,
    any: &'static [&'static str],
    none: &'static [&'static str],
) -> OpRule {
    OpRule {
        category,
        matcher: Matcher::Contains { any, none },
    }
}

/// `if`, `goto` or `label` as a whole word. Word characters are ASCII only,
/// so `éif` still contains the word `if`.
static CONTROL_FLOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)(?:if|goto|label)(?-u:\b)").expect("control-flow pattern is valid")
});

static DEFAULT_ANALYZER: LazyLock<CostAnalyzer> = LazyLock::new(CostAnalyzer::default);

/// The rule list, highest-cost operations first. The first matching rule
/// decides the category, so `x *= 2` is a multiplication.
pub fn default_rules() -> Vec<OpRule> {
    let control_flow = CONTROL_FLOW.clone();
    vec![
        contains(OpCategory::Multiplication, &["*", "mult"], &[]),
        contains(OpCategory::Division, &["/", "div"], &[]),
        contains(OpCategory::Modulo, &["%", "mod"], &[]),
        contains(OpCategory::Addition, &["+"], &["++"]),
        contains(OpCategory::Subtraction, &["-"], &["--", "->"]),
        contains(OpCategory::Assignment, &["="], &["==", "!="]),
        contains(OpCategory::Return, &["return"], &[]),
        contains(OpCategory::Comparison, &["==", "!=", "<", ">"], &[]),
        OpRule {
            category: OpCategory::ControlFlow,
            matcher: Matcher::Pattern(control_flow),
        },
    ]
}

/// Classifies TAC lines by dominant operation and aggregates their cost.
#[derive(Debug, Clone)]
pub struct CostAnalyzer {
    rules: Vec<OpRule>,
    costs: CostTable,
}

impl Default for CostAnalyzer {
    fn default() -> Self {
        Self::new(CostTable::default())
    }
}

impl CostAnalyzer {
    pub fn new(costs: CostTable) -> Self {
        Self::with_rules(default_rules(), costs)
    }

    /// Lines matching no rule are `Other`.
    pub fn with_rules(rules: Vec<OpRule>, costs: CostTable) -> Self {
        Self { rules, costs }
    }

    pub fn rules(&self) -> &[OpRule] {
        &self.rules
    }

    pub fn costs(&self) -> &CostTable {
        &self.costs
    }

    /// Category of a single line; matching is case-insensitive and ignores
    /// surrounding whitespace.
    pub fn categorize(&self, line: &str) -> OpCategory {
        let normalized = line.trim().to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map_or(OpCategory::Other, |rule| rule.category)
    }

    /// Classify one line on its own (`line_index` 0).
    pub fn classify_line(&self, line: &str) -> LineClassification {
        self.classify_at(0, line)
    }

    fn classify_at(&self, line_index: usize, line: &str) -> LineClassification {
        let category = self.categorize(line);
        LineClassification {
            line_index,
            category,
            cost: self.costs.cost_of(category),
            text: line.trim().to_string(),
        }
    }

    /// Classify every non-blank line. `None` yields the empty result.
    pub fn analyze<'a>(&self, code: impl Into<Option<&'a str>>) -> AnalysisResult {
        let Some(code) = code.into() else {
            return AnalysisResult::empty();
        };
        let lines = code
            .split('\n')
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| self.classify_at(index, line))
            .collect();
        let result = AnalysisResult::from_lines(lines);
        tracing::debug!(
            instructions = result.instruction_count,
            total_cost = result.total_cost,
            "analyzed TAC"
        );
        result
    }

    /// Analyze both sides and derive the reduction statistics.
    pub fn compare<'a, 'b>(
        &self,
        before: impl Into<Option<&'a str>>,
        after: impl Into<Option<&'b str>>,
    ) -> ComparisonResult {
        let result = ComparisonResult::new(self.analyze(before), self.analyze(after));
        tracing::debug!(
            cost_reduction_pct = result.cost_reduction_pct,
            instruction_reduction_pct = result.instruction_reduction_pct,
            "compared TAC"
        );
        result
    }
}

/// [`CostAnalyzer::classify_line`] with the default tables.
pub fn classify_line(line: &str) -> LineClassification {
    DEFAULT_ANALYZER.classify_line(line)
}

/// [`CostAnalyzer::analyze`] with the default tables.
pub fn analyze<'a>(code: impl Into<Option<&'a str>>) -> AnalysisResult {
    DEFAULT_ANALYZER.analyze(code)
}

/// [`CostAnalyzer::compare`] with the default tables.
pub fn compare<'a, 'b>(
    before: impl Into<Option<&'a str>>,
    after: impl Into<Option<&'b str>>,
) -> ComparisonResult {
    DEFAULT_ANALYZER.compare(before, after)
}
