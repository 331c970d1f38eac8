//! Rule compilation boundary and a basic Adblock-style compiler.
//!
//! The pipeline only sees `RuleCompiler`: it hands over raw list bytes and
//! gets back an opaque compiled form, a rule count, and a serialized artifact.
//! `BasicRuleCompiler` sorts rules into network, exception and cosmetic
//! buckets; it does not implement matching.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Error from compiling or serializing a rule set.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("malformed rule on line {line}: {rule:?}")]
    Malformed { line: usize, rule: String },
    #[error("serialize compiled rules: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Compiles raw filter list text into a ruleset.
pub trait RuleCompiler {
    type Compiled;

    /// With `report_errors`, the first malformed rule fails the whole compile;
    /// otherwise malformed rules are skipped.
    fn compile(&self, raw: &[u8], report_errors: bool) -> Result<Self::Compiled, CompileError>;

    fn rule_count(&self, compiled: &Self::Compiled) -> usize;

    fn serialize(&self, compiled: &Self::Compiled) -> Result<Vec<u8>, CompileError>;
}

impl<T: RuleCompiler + ?Sized> RuleCompiler for &T {
    type Compiled = T::Compiled;

    fn compile(&self, raw: &[u8], report_errors: bool) -> Result<Self::Compiled, CompileError> {
        (**self).compile(raw, report_errors)
    }

    fn rule_count(&self, compiled: &Self::Compiled) -> usize {
        (**self).rule_count(compiled)
    }

    fn serialize(&self, compiled: &Self::Compiled) -> Result<Vec<u8>, CompileError> {
        (**self).serialize(compiled)
    }
}

/// Serialized artifact version written by `BasicRuleCompiler`.
pub const RULESET_FORMAT_VERSION: u32 = 1;

/// Rules grouped by kind, in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledRuleset {
    pub version: u32,
    /// Network blocking rules (`||ads.example^`, `/banner/*`).
    pub blocking: Vec<String>,
    /// Network exception rules with the `@@` prefix removed.
    pub exceptions: Vec<String>,
    /// Element hiding rules (`##`, `#?#`).
    pub cosmetic: Vec<String>,
    /// Element hiding exceptions (`#@#`).
    pub cosmetic_exceptions: Vec<String>,
}

impl CompiledRuleset {
    pub fn len(&self) -> usize {
        self.blocking.len()
            + self.exceptions.len()
            + self.cosmetic.len()
            + self.cosmetic_exceptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, CompileError> {
        Ok(serde_json::from_slice(data)?)
    }
}

enum Rule<'a> {
    Blocking(&'a str),
    Exception(&'a str),
    Cosmetic(&'a str),
    CosmeticException(&'a str),
}

fn is_comment(line: &str) -> bool {
    if line.starts_with('!') {
        return true;
    }
    if line.starts_with('[') && line.ends_with(']') {
        return true;
    }
    // Hosts-style comments; `##selector` and friends are cosmetic rules.
    line.starts_with('#')
        && !line.starts_with("##")
        && !line.starts_with("#@#")
        && !line.starts_with("#?#")
}

fn cosmetic_selector(line: &str) -> Option<(bool, &str)> {
    if let Some(pos) = line.find("#@#") {
        return Some((true, &line[pos + 3..]));
    }
    if let Some(pos) = line.find("#?#") {
        return Some((false, &line[pos + 3..]));
    }
    line.find("##").map(|pos| (false, &line[pos + 2..]))
}

/// `/pattern/` or `/pattern/$options`; returns the pattern.
fn regex_body(rule: &str) -> Option<&str> {
    let rest = rule.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    (end > 0).then(|| &rest[..end])
}

fn classify(line: &str) -> Option<Rule<'_>> {
    if let Some((exception, selector)) = cosmetic_selector(line) {
        if selector.trim().is_empty() {
            return None;
        }
        return Some(if exception {
            Rule::CosmeticException(line)
        } else {
            Rule::Cosmetic(line)
        });
    }

    let (exception, body) = match line.strip_prefix("@@") {
        Some(rest) => (true, rest),
        None => (false, line),
    };
    if body.is_empty() || body.starts_with('$') {
        return None;
    }
    if let Some(pattern) = regex_body(body) {
        Regex::new(pattern).ok()?;
    }
    Some(if exception {
        Rule::Exception(body)
    } else {
        Rule::Blocking(body)
    })
}

/// Line-oriented compiler for Adblock Plus style lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRuleCompiler;

impl RuleCompiler for BasicRuleCompiler {
    type Compiled = CompiledRuleset;

    fn compile(&self, raw: &[u8], report_errors: bool) -> Result<CompiledRuleset, CompileError> {
        let text = String::from_utf8_lossy(raw);
        let mut out = CompiledRuleset {
            version: RULESET_FORMAT_VERSION,
            ..Default::default()
        };
        let mut skipped = 0usize;

        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || is_comment(line) {
                continue;
            }
            match classify(line) {
                Some(Rule::Blocking(r)) => out.blocking.push(r.to_string()),
                Some(Rule::Exception(r)) => out.exceptions.push(r.to_string()),
                Some(Rule::Cosmetic(r)) => out.cosmetic.push(r.to_string()),
                Some(Rule::CosmeticException(r)) => out.cosmetic_exceptions.push(r.to_string()),
                None if report_errors => {
                    return Err(CompileError::Malformed {
                        line: idx + 1,
                        rule: line.to_string(),
                    });
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, "skipped malformed rules");
        }
        Ok(out)
    }

    fn rule_count(&self, compiled: &CompiledRuleset) -> usize {
        compiled.len()
    }

    fn serialize(&self, compiled: &CompiledRuleset) -> Result<Vec<u8>, CompileError> {
        Ok(serde_json::to_vec(compiled)?)
    }
}
