use serde::{Deserialize, Serialize};
use std::fmt;

/// Lexical category assigned to a run of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCategory {
    Comment,
    String,
    Preprocessor,
    Keyword,
    Number,
    Plain,
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenCategory::Comment => write!(f, "comment"),
            TokenCategory::String => write!(f, "string"),
            TokenCategory::Preprocessor => write!(f, "preprocessor"),
            TokenCategory::Keyword => write!(f, "keyword"),
            TokenCategory::Number => write!(f, "number"),
            TokenCategory::Plain => write!(f, "plain"),
        }
    }
}

/// A contiguous run of source text tagged with one category.
///
/// `start..end` are byte offsets into the tagged input and `text` is exactly
/// that slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub category: TokenCategory,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(category: TokenCategory, source: &str, start: usize, end: usize) -> Self {
        Self {
            category,
            text: source[start..end].to_string(),
            start,
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Dominant operation of a TAC line.
/// Declared in rule order: the classifier tries categories top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpCategory {
    Multiplication,
    Division,
    Modulo,
    Addition,
    Subtraction,
    Assignment,
    Return,
    Comparison,
    ControlFlow,
    Other,
}

impl OpCategory {
    /// Every category, in rule order.
    pub const ALL: [OpCategory; 10] = [
        OpCategory::Multiplication,
        OpCategory::Division,
        OpCategory::Modulo,
        OpCategory::Addition,
        OpCategory::Subtraction,
        OpCategory::Assignment,
        OpCategory::Return,
        OpCategory::Comparison,
        OpCategory::ControlFlow,
        OpCategory::Other,
    ];
}

impl fmt::Display for OpCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpCategory::Multiplication => write!(f, "multiplication"),
            OpCategory::Division => write!(f, "division"),
            OpCategory::Modulo => write!(f, "modulo"),
            OpCategory::Addition => write!(f, "addition"),
            OpCategory::Subtraction => write!(f, "subtraction"),
            OpCategory::Assignment => write!(f, "assignment"),
            OpCategory::Return => write!(f, "return"),
            OpCategory::Comparison => write!(f, "comparison"),
            OpCategory::ControlFlow => write!(f, "control_flow"),
            OpCategory::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for OpCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "multiplication" | "mul" => Ok(OpCategory::Multiplication),
            "division" | "div" => Ok(OpCategory::Division),
            "modulo" | "mod" => Ok(OpCategory::Modulo),
            "addition" | "add" => Ok(OpCategory::Addition),
            "subtraction" | "sub" => Ok(OpCategory::Subtraction),
            "assignment" => Ok(OpCategory::Assignment),
            "return" => Ok(OpCategory::Return),
            "comparison" => Ok(OpCategory::Comparison),
            "control_flow" => Ok(OpCategory::ControlFlow),
            "other" => Ok(OpCategory::Other),
            _ => Err(anyhow::anyhow!("unknown operation category: {s}")),
        }
    }
}

/// Classification of a single non-blank TAC line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineClassification {
    /// 0-based index of the line in the analyzed input.
    pub line_index: usize,
    pub category: OpCategory,
    pub cost: u32,
    /// The trimmed line text.
    pub text: String,
}
