//! Toolkit versions and the `<op><version>` comparisons patches are gated on.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Dot-separated integers, e.g. `6.5.2`.
///
/// Missing trailing components compare as zero, so `5.2 == 5.2.0`.
#[derive(Debug, Clone)]
pub struct Version(Vec<u64>);

impl Version {
    #[must_use]
    pub fn new(parts: impl Into<Vec<u64>>) -> Self {
        Self(parts.into())
    }

    /// Assumed when the host does not report a version.
    #[must_use]
    pub fn latest() -> Self {
        Self(vec![10, 0, 0])
    }

    #[must_use]
    pub fn parts(&self) -> &[u64] {
        &self.0
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        s.split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| Error::syntax("version", format!("invalid version \"{s}\"")))
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|i| {
                let a = self.0.get(i).copied().unwrap_or(0);
                let b = other.0.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Version {}

// ─── Comparison ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
}

impl Operator {
    /// Prefix-match order: two-character operators before their one-character
    /// prefixes.
    const PREFIXES: [(&'static str, Self); 6] = [
        ("==", Self::Eq),
        ("!=", Self::Ne),
        (">=", Self::Ge),
        ("<=", Self::Le),
        (">", Self::Gt),
        ("<", Self::Lt),
    ];

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }

    /// Whether `lhs.cmp(rhs) == ordering` satisfies `lhs <op> rhs`.
    #[must_use]
    pub const fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering.is_eq(),
            Self::Ne => ordering.is_ne(),
            Self::Ge => ordering.is_ge(),
            Self::Le => ordering.is_le(),
            Self::Gt => ordering.is_gt(),
            Self::Lt => ordering.is_lt(),
        }
    }
}

/// `<op><version>`, e.g. `>=6.0.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub op: Operator,
    pub version: Version,
}

impl Comparison {
    /// # Errors
    ///
    /// [`Error::PatchSyntax`] when no operator prefixes `text` or the version
    /// is malformed.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        for (symbol, op) in Operator::PREFIXES {
            if let Some(rest) = text.strip_prefix(symbol) {
                return Ok(Self {
                    op,
                    version: rest.trim().parse()?,
                });
            }
        }
        Err(Error::syntax(
            "version",
            format!("\"{text}\" has no comparison operator (expected one of == != >= <= > <)"),
        ))
    }

    /// Whether `version` satisfies this comparison.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.op.holds(version.cmp(&self.version))
    }
}

impl FromStr for Comparison {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.symbol(), self.version)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn versions_compare_numerically() {
        assert!(v("5.10.0") > v("5.9.9"));
        assert!(v("6") > v("5.15.2"));
        assert_eq!(v("5.2"), v("5.2.0"));
    }

    #[test]
    fn malformed_versions_are_rejected() {
        for bad in ["", "5..2", "5.x", "v6"] {
            assert!(bad.parse::<Version>().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn operators_are_matched_longest_first() {
        assert_eq!(Comparison::parse(">=5.0").unwrap().op, Operator::Ge);
        assert_eq!(Comparison::parse(">5.0").unwrap().op, Operator::Gt);
        assert_eq!(Comparison::parse("<=5.0").unwrap().op, Operator::Le);
        assert_eq!(Comparison::parse("!=5.0").unwrap().op, Operator::Ne);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        for text in [" >=6.0", ">=6.0 ", "\t>= 6.0\n"] {
            let cmp = Comparison::parse(text).unwrap();
            assert_eq!(cmp.op, Operator::Ge, "{text:?}");
            assert!(cmp.matches(&v("6.0.0")), "{text:?}");
            assert!(!cmp.matches(&v("5.15.2")), "{text:?}");
        }
    }

    #[test]
    fn comparison_evaluates_against_version() {
        let ge = Comparison::parse(">=5.0.0").unwrap();
        assert!(ge.matches(&v("5.2.0")));
        assert!(ge.matches(&v("5.0.0")));
        assert!(!ge.matches(&v("4.9.0")));

        let lt = Comparison::parse("<6.0.0").unwrap();
        assert!(lt.matches(&v("5.15.2")));
        assert!(!lt.matches(&v("6.0.0")));
    }

    #[test]
    fn missing_operator_is_syntax_error() {
        assert!(matches!(
            Comparison::parse("6.0.0"),
            Err(Error::PatchSyntax { .. })
        ));
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(Comparison::parse(" == 6.5.2 ").unwrap().to_string(), "==6.5.2");
        assert_eq!(Version::latest().to_string(), "10.0.0");
    }
}
