//! Advisory rule suggestions read from SQL Server CHECK-constraint text.
//!
//! SQL Server stores CHECK definitions in a normalized form such as
//! `([Price]>=(0) AND [Price]<=(1000))`, `(len([Code])>=(3))` or
//! `([Status]='B' OR [Status]='A')`. [`suggest_rules`] recognizes those shapes
//! for the column's own name and proposes [`ConditionRule`]s. Nothing here is
//! enforced; unrecognized texts are skipped with a warning.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::json;

use crate::condition::ConditionRule;
use crate::schema::{ColumnDescriptor, DataClass, SqlTypeClass};

fn comparison_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(len\()?\[([^\]]+)\]\)?\s*(>=|<=|>|<)\s*\(*\s*(-?\d+(?:\.\d+)?)\s*\)*$")
            .expect("invalid built-in comparison regex")
    })
}

fn equality_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\[([^\]]+)\]\s*=\s*\(*\s*N?'((?:[^']|'')*)'\s*\)*$")
            .expect("invalid built-in equality regex")
    })
}

fn in_list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\[([^\]]+)\]\s+IN\s*\((.*)\)$").expect("invalid built-in IN regex")
    })
}

#[derive(Debug, Default)]
struct Bounds {
    min: Option<String>,
    max: Option<String>,
}

impl Bounds {
    fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    fn to_json(&self) -> String {
        let mut obj = serde_json::Map::new();
        if let Some(min) = &self.min {
            obj.insert("min".into(), json_number(min));
        }
        if let Some(max) = &self.max {
            obj.insert("max".into(), json_number(max));
        }
        serde_json::Value::Object(obj).to_string()
    }
}

/// Propose condition rules for `column` from its CHECK-constraint texts.
pub fn suggest_rules(column: &ColumnDescriptor) -> Vec<ConditionRule> {
    let class = column.type_class();
    let mut range = Bounds::default();
    let mut length = Bounds::default();
    let mut patterns = Vec::new();

    for text in &column.check_constraint_texts {
        let body = strip_parens(text);
        let recognized = if let Some(values) = allowed_values(body, &column.name) {
            patterns.push(values);
            true
        } else {
            split_top_level(body, "AND").into_iter().all(|conjunct| {
                apply_comparison(conjunct, column, class, &mut range, &mut length)
            })
        };
        if !recognized {
            tracing::warn!(
                target: "tablegate.check",
                column = %column.name,
                check = %text,
                "CHECK constraint not recognized, no rule suggested"
            );
        }
    }

    let mut rules = Vec::new();
    if !range.is_empty() {
        rules.push(ConditionRule::new(
            &column.name,
            DataClass::Numeric,
            "range",
            range.to_json(),
        ));
    }
    if !length.is_empty() {
        rules.push(ConditionRule::new(
            &column.name,
            DataClass::Text,
            "length",
            length.to_json(),
        ));
    }
    for values in patterns {
        let alternatives: Vec<String> = values.iter().map(|v| regex::escape(v)).collect();
        rules.push(ConditionRule::new(
            &column.name,
            DataClass::Text,
            "pattern",
            json!({ "pattern": format!("^({})$", alternatives.join("|")) }).to_string(),
        ));
    }

    tracing::debug!(
        target: "tablegate.check",
        column = %column.name,
        checks = column.check_constraint_texts.len(),
        suggested = rules.len(),
        "suggested rules"
    );
    rules
}

/// `[c] op n` tightens the numeric range; `len([c]) op n` tightens the length.
fn apply_comparison(
    conjunct: &str,
    column: &ColumnDescriptor,
    class: SqlTypeClass,
    range: &mut Bounds,
    length: &mut Bounds,
) -> bool {
    let Some(caps) = comparison_re().captures(strip_parens(conjunct)) else {
        return false;
    };
    if !caps[2].eq_ignore_ascii_case(&column.name) {
        return false;
    }
    let is_len = caps.get(1).is_some();
    let op = &caps[3];
    let number = caps[4].to_string();

    let (target, integral) = match (is_len, column.data_class()) {
        (true, DataClass::Text) => (length, true),
        (false, DataClass::Numeric) => (range, class == SqlTypeClass::Integer),
        _ => return false,
    };

    match op {
        ">=" => target.min = Some(number),
        "<=" => target.max = Some(number),
        // Strict bounds are exact only for integers; otherwise the bound is kept inclusive.
        ">" => target.min = Some(if integral { step(&number, 1) } else { number }),
        "<" => target.max = Some(if integral { step(&number, -1) } else { number }),
        _ => return false,
    }
    true
}

fn step(number: &str, by: i64) -> String {
    match number.parse::<i64>() {
        Ok(n) => n.saturating_add(by).to_string(),
        Err(_) => number.to_string(),
    }
}

/// `[c]='a' OR [c]='b'` or `[c] IN ('a','b')` → the allowed literals.
fn allowed_values(body: &str, column: &str) -> Option<Vec<String>> {
    if let Some(caps) = in_list_re().captures(body) {
        if !caps[1].eq_ignore_ascii_case(column) {
            return None;
        }
        return caps[2]
            .split(',')
            .map(|item| unquote(item.trim()))
            .collect::<Option<Vec<_>>>()
            .filter(|v| !v.is_empty());
    }

    let disjuncts = split_top_level(body, "OR");
    let mut values = Vec::with_capacity(disjuncts.len());
    for part in disjuncts {
        let caps = equality_re().captures(strip_parens(part))?;
        if !caps[1].eq_ignore_ascii_case(column) {
            return None;
        }
        values.push(caps[2].replace("''", "'"));
    }
    Some(values)
}

fn unquote(item: &str) -> Option<String> {
    let item = item.strip_prefix('N').unwrap_or(item);
    let inner = item.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(inner.replace("''", "'"))
}

fn json_number(s: &str) -> serde_json::Value {
    if let Ok(i) = s.parse::<i64>() {
        return json!(i);
    }
    s.parse::<f64>().map_or_else(|_| json!(s), |f| json!(f))
}

/// Remove parentheses that wrap the whole expression.
fn strip_parens(s: &str) -> &str {
    let mut s = s.trim();
    while s.starts_with('(') && s.ends_with(')') && closes_at_end(s) {
        s = s[1..s.len() - 1].trim();
    }
    s
}

/// Whether the `(` at index 0 is matched by the final `)`.
fn closes_at_end(s: &str) -> bool {
    let mut depth = 0usize;
    let mut in_quote = false;
    for (i, ch) in s.char_indices() {
        match ch {
            '\'' => in_quote = !in_quote,
            '(' if !in_quote => depth += 1,
            ')' if !in_quote => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == s.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

/// Split on ` <keyword> ` outside parentheses and string literals, case-insensitively.
fn split_top_level<'s>(s: &'s str, keyword: &str) -> Vec<&'s str> {
    let needle = format!(" {keyword} ");
    let bytes = s.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' => in_quote = !in_quote,
            b'(' if !in_quote => depth += 1,
            b')' if !in_quote => depth = depth.saturating_sub(1),
            b' ' if !in_quote && depth == 0 => {
                let end = i + needle.len();
                if end <= bytes.len() && bytes[i..end].eq_ignore_ascii_case(needle.as_bytes()) {
                    parts.push(s[start..i].trim());
                    start = end;
                    i = end;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(s[start..].trim());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(rule: &ConditionRule) -> serde_json::Value {
        serde_json::from_str(&rule.condition_value).unwrap()
    }

    #[test]
    fn numeric_range_from_conjunction() {
        let col = ColumnDescriptor::new("Price", "decimal(10,2)")
            .with_check("([Price]>=(0) AND [Price]<=(1000.50))");
        let rules = suggest_rules(&col);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].data_class, DataClass::Numeric);
        assert_eq!(rules[0].condition_type, "range");
        assert_eq!(values(&rules[0]), json!({"min": 0, "max": 1000.5}));
    }

    #[test]
    fn strict_integer_bounds_are_tightened() {
        let col = ColumnDescriptor::new("Age", "int")
            .with_check("([Age]>(0))")
            .with_check("([Age]<(150))");
        let rules = suggest_rules(&col);
        assert_eq!(values(&rules[0]), json!({"min": 1, "max": 149}));
    }

    #[test]
    fn text_length() {
        let col = ColumnDescriptor::new("Code", "nvarchar(10)").with_check("(len([Code])>=(3))");
        let rules = suggest_rules(&col);
        assert_eq!(rules[0].condition_type, "length");
        assert_eq!(values(&rules[0]), json!({"min": 3}));
    }

    #[test]
    fn or_chain_becomes_pattern() {
        let col = ColumnDescriptor::new("Status", "nvarchar(1)")
            .with_check("([Status]='B' OR [Status]='A' OR [Status]=N'C.')");
        let rules = suggest_rules(&col);
        assert_eq!(rules.len(), 1);
        assert_eq!(values(&rules[0]), json!({"pattern": r"^(B|A|C\.)$"}));
        assert!(rules[0].compile().unwrap().is_some());
    }

    #[test]
    fn in_list_becomes_pattern() {
        let col = ColumnDescriptor::new("Kind", "varchar(5)")
            .with_check("([Kind] IN ('x', 'it''s'))");
        let rules = suggest_rules(&col);
        assert_eq!(values(&rules[0]), json!({"pattern": "^(x|it's)$"}));
    }

    #[test]
    fn unrecognized_checks_are_skipped() {
        let col = ColumnDescriptor::new("Price", "money")
            .with_check("([Price]>[Cost])")
            .with_check("([Other]>=(0))")
            .with_check("(len([Price])>(2))");
        assert!(suggest_rules(&col).is_empty());
    }

    #[test]
    fn splitting_respects_nesting_and_quotes() {
        assert_eq!(
            split_top_level("(a AND b) AND 'x AND y' and c", "AND"),
            vec!["(a AND b)", "'x AND y'", "c"]
        );
        assert_eq!(strip_parens("((a) AND (b))"), "(a) AND (b)");
        assert_eq!(strip_parens("(a) AND (b)"), "(a) AND (b)");
    }
}
