//! Declarative field rules for request bodies.
//!
//! Rules are chained on a [`Validator`] and every rule runs; [`Validator::finish`]
//! returns the full list of `(field, rule)` pairs that failed. Values never end
//! up in the report so it is safe to log.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    Length { min: usize, max: usize },
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => f.write_str("required"),
            Rule::Email => f.write_str("email"),
            Rule::Length { min, max } => write!(f, "length {}..={}", min, max),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub rule: Rule,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<_> = self.0.iter().map(|v| v.field).collect();
        fields.dedup();
        fields
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", v.field, v.rule)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(mut self, field: &'static str, rule: Rule, ok: bool) -> Self {
        if !ok {
            self.violations.push(Violation { field, rule });
        }
        self
    }

    /// Present and non-empty.
    pub fn required(self, field: &'static str, value: Option<&str>) -> Self {
        let ok = value.map(|v| !v.is_empty()).unwrap_or(false);
        self.check(field, Rule::Required, ok)
    }

    pub fn email(self, field: &'static str, value: Option<&str>) -> Self {
        let ok = value.map(is_email).unwrap_or(false);
        self.check(field, Rule::Email, ok)
    }

    /// Character count within `min..=max`.
    pub fn length(self, field: &'static str, value: Option<&str>, min: usize, max: usize) -> Self {
        let ok = value
            .map(|v| (min..=max).contains(&v.chars().count()))
            .unwrap_or(false);
        self.check(field, Rule::Length { min, max }, ok)
    }

    pub fn finish(self) -> Result<(), Violations> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(Violations(self.violations))
        }
    }
}

const LOCAL_FORBIDDEN: &[char] = &['(', ')', '<', '>', '[', ']', '\\', ',', ';', ':', '"'];
const MAX_EMAIL_CHARS: usize = 254;
const MAX_LOCAL_BYTES: usize = 64;
const MAX_DOMAIN_BYTES: usize = 254;
const MAX_LABEL_CHARS: usize = 63;

/// Printable non-ASCII characters, accepted in local parts and domain labels.
fn is_international(c: char) -> bool {
    !c.is_ascii() && ('\u{a1}'..='\u{ffff}').contains(&c) && !c.is_whitespace()
}

pub fn is_email(value: &str) -> bool {
    if value.chars().count() > MAX_EMAIL_CHARS {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }
    is_local_part(local) && is_domain(domain)
}

fn is_local_part(local: &str) -> bool {
    if local.is_empty() || local.len() > MAX_LOCAL_BYTES {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    local.chars().all(|c| {
        (c.is_ascii_graphic() && !LOCAL_FORBIDDEN.contains(&c)) || is_international(c)
    })
}

fn is_label(label: &str) -> bool {
    !label.is_empty()
        && label.chars().count() <= MAX_LABEL_CHARS
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || is_international(c))
}

/// Letters only, or an ASCII punycode `xn--` label.
fn is_tld(tld: &str) -> bool {
    if tld.chars().count() < 2 {
        return false;
    }
    let punycode = tld.len() >= 4
        && tld.is_char_boundary(2)
        && tld[..2].eq_ignore_ascii_case("xn")
        && tld[2..].chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    punycode
        || tld
            .chars()
            .all(|c| c.is_ascii_alphabetic() || (is_international(c) && c.is_alphabetic()))
}

fn is_domain(domain: &str) -> bool {
    if domain.len() > MAX_DOMAIN_BYTES {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    labels.iter().all(|label| is_label(label)) && is_tld(labels[labels.len() - 1])
}
