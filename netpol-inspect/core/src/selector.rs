use crate::Labels;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// A parsed label-selector expression.
///
/// The grammar is the usual comma-joined requirement list: `tier=backend`,
/// `env!=prod`, `tier in (api,web)`, `region notin (us-east-1)`, `critical`,
/// `!legacy`. A label set satisfies the selector iff it satisfies every
/// requirement; the empty selector matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    requirements: Vec<Requirement>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Requirement {
    key: String,
    operator: Operator,
    values: BTreeSet<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operator {
    Eq,
    NotEq,
    In,
    NotIn,
    Exists,
    NotExists,
}

/// A selector that could not be parsed.
///
/// Classification aborts on this; malformed syntax is never treated as "no
/// match".
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid selector {text:?}: {reason}")]
pub struct InvalidSelector {
    text: String,
    reason: String,
}

// === impl Selector ===

impl Selector {
    pub fn parse(text: &str) -> Result<Self, InvalidSelector> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let invalid = |reason: String| InvalidSelector {
            text: text.to_string(),
            reason,
        };

        let mut requirements = Vec::new();
        for clause in split_clauses(text).map_err(&invalid)? {
            requirements.push(parse_clause(clause).map_err(&invalid)?);
        }
        Ok(Self { requirements })
    }

    pub fn matches(&self, labels: &Labels) -> bool {
        self.requirements.iter().all(|r| r.matches(labels))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, requirement) in self.requirements.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            requirement.fmt(f)?;
        }
        Ok(())
    }
}

// === impl Requirement ===

impl Requirement {
    fn matches(&self, labels: &Labels) -> bool {
        let value = labels.get(&self.key);
        match self.operator {
            Operator::Eq | Operator::In => value.is_some_and(|v| self.values.contains(v)),
            Operator::NotEq | Operator::NotIn => !value.is_some_and(|v| self.values.contains(v)),
            Operator::Exists => value.is_some(),
            Operator::NotExists => value.is_none(),
        }
    }

    fn single_value(&self) -> &str {
        self.values.iter().next().map(String::as_str).unwrap_or("")
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            Operator::Eq => write!(f, "{}={}", self.key, self.single_value()),
            Operator::NotEq => write!(f, "{}!={}", self.key, self.single_value()),
            Operator::In | Operator::NotIn => {
                let values = self
                    .values
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(",");
                let op = if self.operator == Operator::In {
                    "in"
                } else {
                    "notin"
                };
                write!(f, "{} {op} ({values})", self.key)
            }
            Operator::Exists => f.write_str(&self.key),
            Operator::NotExists => write!(f, "!{}", self.key),
        }
    }
}

// === parsing ===

/// Splits on commas outside of value sets.
fn split_clauses(text: &str) -> Result<Vec<&str>, String> {
    let mut clauses = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err("unbalanced ')'".to_string());
                }
            }
            ',' if depth == 0 => {
                clauses.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced '('".to_string());
    }
    clauses.push(&text[start..]);
    Ok(clauses)
}

fn parse_clause(clause: &str) -> Result<Requirement, String> {
    let clause = clause.trim();
    if clause.is_empty() {
        return Err("empty requirement".to_string());
    }

    if let Some(key) = clause.strip_prefix('!') {
        let key = key.trim();
        validate_key(key)?;
        return Ok(Requirement {
            key: key.to_string(),
            operator: Operator::NotExists,
            values: BTreeSet::new(),
        });
    }

    if let Some(open) = clause.find('(') {
        return parse_set_clause(clause, open);
    }

    if let Some(i) = clause.find("!=") {
        return equality(&clause[..i], &clause[i + 2..], Operator::NotEq);
    }
    if let Some(i) = clause.find("==") {
        return equality(&clause[..i], &clause[i + 2..], Operator::Eq);
    }
    if let Some(i) = clause.find('=') {
        return equality(&clause[..i], &clause[i + 1..], Operator::Eq);
    }

    validate_key(clause)?;
    Ok(Requirement {
        key: clause.to_string(),
        operator: Operator::Exists,
        values: BTreeSet::new(),
    })
}

/// Parses `KEY in (V1,V2)` / `KEY notin (V1,V2)`; `open` is the index of '('.
fn parse_set_clause(clause: &str, open: usize) -> Result<Requirement, String> {
    let mut head = clause[..open].split_whitespace();
    let (key, op) = match (head.next(), head.next(), head.next()) {
        (Some(key), Some(op), None) => (key, op),
        _ => return Err(format!("expected 'KEY in (...)' or 'KEY notin (...)', found {clause:?}")),
    };
    let operator = match op {
        "in" => Operator::In,
        "notin" => Operator::NotIn,
        other => return Err(format!("unknown set operator {other:?}")),
    };
    validate_key(key)?;

    let inner = clause[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| format!("expected ')' at the end of {clause:?}"))?;
    if inner.trim().is_empty() {
        return Err(format!("value set for {op:?} must not be empty"));
    }
    let mut values = BTreeSet::new();
    for value in inner.split(',') {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("empty value in set for key {key:?}"));
        }
        validate_value(value)?;
        values.insert(value.to_string());
    }

    Ok(Requirement {
        key: key.to_string(),
        operator,
        values,
    })
}

fn equality(key: &str, value: &str, operator: Operator) -> Result<Requirement, String> {
    let (key, value) = (key.trim(), value.trim());
    validate_key(key)?;
    validate_value(value)?;
    Ok(Requirement {
        key: key.to_string(),
        operator,
        values: Some(value.to_string()).into_iter().collect(),
    })
}

fn validate_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("empty key".to_string());
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
    {
        return Err(format!("invalid key {key:?}"));
    }
    Ok(())
}

/// Values may be empty (`k=` matches an empty-valued label) but must stay in
/// the label-value alphabet.
fn validate_value(value: &str) -> Result<(), String> {
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(format!("invalid value {value:?}"));
    }
    Ok(())
}
