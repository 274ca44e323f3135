use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two analyzer rule families jsmend knows how to repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// A binding is declared but never referenced.
    UnusedBinding,
    /// A name is referenced but never declared.
    UndeclaredReference,
}

impl RuleKind {
    /// Map an analyzer rule id onto a supported kind.
    ///
    /// Unknown rules return `None` and are ignored by intake.
    pub fn from_rule_id(rule_id: &str) -> Option<Self> {
        match rule_id.trim() {
            "no-unused-vars"
            | "@typescript-eslint/no-unused-vars"
            | "unused-imports/no-unused-vars"
            | "UnusedBinding"
            | "unused_binding" => Some(RuleKind::UnusedBinding),
            "no-undef" | "UndeclaredReference" | "undeclared_reference" => {
                Some(RuleKind::UndeclaredReference)
            }
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::UnusedBinding => "unused_binding",
            RuleKind::UndeclaredReference => "undeclared_reference",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analyzer severity. Only `MustFix` diagnostics are acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Info,
    Warn,
    MustFix,
}

impl Severity {
    /// ESLint numeric levels: 2 = error, 1 = warn, 0 = off.
    pub fn from_level(level: i64) -> Self {
        match level {
            2 => Severity::MustFix,
            1 => Severity::Warn,
            _ => Severity::Info,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "error" | "must_fix" | "mustfix" | "must-fix" | "2" => Severity::MustFix,
            "warn" | "warning" | "1" => Severity::Warn,
            _ => Severity::Info,
        }
    }

    pub fn is_must_fix(self) -> bool {
        matches!(self, Severity::MustFix)
    }
}

/// One normalized analyzer finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Path relative to the repository root.
    pub file_path: Utf8PathBuf,
    pub rule_kind: RuleKind,
    /// Symbol extracted from the quoted part of `message`.
    pub symbol_name: String,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, in UTF-16 code units.
    pub column: u32,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl Diagnostic {
    pub fn location_key(&self) -> LocationKey {
        LocationKey::from_one_based(self.line, self.column)
    }
}

/// A `(line, zero-based column)` pair used to match a diagnostic to a tree node.
///
/// Analyzers report 1-based columns while tree positions are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationKey {
    /// 1-based line.
    pub line: u32,
    /// 0-based column, in UTF-16 code units.
    pub column: u32,
}

impl LocationKey {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    pub fn from_one_based(line: u32, column: u32) -> Self {
        Self {
            line,
            column: column.saturating_sub(1),
        }
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
