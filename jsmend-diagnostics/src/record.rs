use camino::Utf8PathBuf;
use jsmend_types::diagnostic::{Diagnostic, RuleKind, Severity};
use jsmend_types::symbol::{extract_symbol, is_identifier};
use serde_json::Value;

/// One report entry, before validation. Every field is optional so that a bad
/// record can be counted instead of failing the whole report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub file_path: Option<String>,
    pub rule: Option<String>,
    pub message: Option<String>,
    pub symbol: Option<String>,
    pub line: Option<u64>,
    pub column: Option<u64>,
    pub severity: Option<Severity>,
}

/// Why a record was not turned into a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Malformed,
    IgnoredRule,
    BelowSeverity,
}

impl RawRecord {
    pub fn from_value(value: &Value) -> Self {
        Self {
            file_path: str_field(value, &["filePath", "file_path", "path"]),
            rule: str_field(value, &["ruleKind", "rule_kind", "ruleId", "rule_id"]),
            message: str_field(value, &["message"]),
            symbol: str_field(value, &["symbolName", "symbol_name"]),
            line: u64_field(value, &["line"]),
            column: u64_field(value, &["column"]),
            severity: field(value, &["severity"]).and_then(severity_of),
        }
    }

    /// Validates the record. Path checks against the source tree happen later.
    pub fn normalize(&self) -> Result<Diagnostic, Rejection> {
        let file_path = self
            .file_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or(Rejection::Malformed)?;
        let rule_kind = self
            .rule
            .as_deref()
            .and_then(RuleKind::from_rule_id)
            .ok_or(Rejection::IgnoredRule)?;
        let severity = self.severity.unwrap_or_default();
        if !severity.is_must_fix() {
            return Err(Rejection::BelowSeverity);
        }
        let line = self
            .line
            .filter(|l| *l > 0)
            .and_then(|l| u32::try_from(l).ok())
            .ok_or(Rejection::Malformed)?;
        let column = self
            .column
            .and_then(|c| u32::try_from(c).ok())
            .ok_or(Rejection::Malformed)?;
        let message = self.message.clone().unwrap_or_default();
        let symbol_name = self
            .symbol
            .clone()
            .filter(|s| is_identifier(s))
            .or_else(|| extract_symbol(&message))
            .filter(|s| is_identifier(s))
            .ok_or(Rejection::Malformed)?;

        Ok(Diagnostic {
            file_path: Utf8PathBuf::from(file_path),
            rule_kind,
            symbol_name,
            line,
            column,
            severity,
            message,
        })
    }
}

/// Flattens either report shape into records. `None` when the document is
/// neither an array nor an object wrapping one.
pub(crate) fn flatten(value: &Value) -> Option<Vec<RawRecord>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("diagnostics")
            .or_else(|| map.get("results"))
            .and_then(Value::as_array)?,
        _ => return None,
    };

    let mut out = Vec::new();
    for item in items {
        match item.get("messages").and_then(Value::as_array) {
            // ESLint formatter output: one entry per file.
            Some(messages) => {
                let file = str_field(item, &["filePath", "file_path", "path"]);
                for message in messages {
                    let mut record = RawRecord::from_value(message);
                    if record.file_path.is_none() {
                        record.file_path = file.clone();
                    }
                    out.push(record);
                }
            }
            None => out.push(RawRecord::from_value(item)),
        }
    }
    Some(out)
}

fn field<'v>(value: &'v Value, keys: &[&str]) -> Option<&'v Value> {
    keys.iter().find_map(|k| value.get(*k)).filter(|v| !v.is_null())
}

fn str_field(value: &Value, keys: &[&str]) -> Option<String> {
    field(value, keys).and_then(Value::as_str).map(str::to_string)
}

fn u64_field(value: &Value, keys: &[&str]) -> Option<u64> {
    field(value, keys).and_then(Value::as_u64)
}

fn severity_of(value: &Value) -> Option<Severity> {
    match value {
        Value::Number(n) => n.as_i64().map(Severity::from_level),
        Value::String(s) => Some(Severity::from_label(s)),
        _ => None,
    }
}
