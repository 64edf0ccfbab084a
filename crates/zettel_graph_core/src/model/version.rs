//! Structured document version.
//!
//! # Responsibility
//! - Hold `metadata.version` as a major number plus its dotted tail instead
//!   of free text.
//! - Provide the two update disciplines used by the tooling: major bump
//!   (`N.M -> N+1.0`) and minor bump (adds one tenth, one decimal kept).
//!
//! # Invariants
//! - Text is parsed once at the document boundary.
//! - An untouched version renders exactly as it was read (`3.05` stays
//!   `3.05`, `1.2.3` stays `1.2.3`).
//! - A bump always renders as `N.D`.

use crate::error::{GraphError, GraphResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    major: u32,
    /// Digits after the first dot, verbatim.
    fraction: Option<String>,
    /// Further dotted components after the fraction, verbatim.
    rest: Option<String>,
}

impl Version {
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            fraction: Some(minor.to_string()),
            rest: None,
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    /// `N.M -> (N+1).0`; everything after the major component is dropped.
    ///
    /// # Errors
    /// - `InvalidVersion` when the major component is already `u32::MAX`.
    pub fn bump_major(&self) -> GraphResult<Self> {
        let major = self.major.checked_add(1).ok_or_else(|| self.invalid())?;
        Ok(Self::new(major, 0))
    }

    /// Adds one tenth and keeps one decimal: `3.0 -> 3.1`, `3.9 -> 4.0`,
    /// `3.10 -> 3.2`, `3.05 -> 3.2`.
    ///
    /// The sum is rounded half up at the second decimal.
    ///
    /// # Errors
    /// - `InvalidVersion` for versions with more than two dotted components
    ///   (`1.2.3` has no decimal value) and on major overflow.
    pub fn bump_minor(&self) -> GraphResult<Self> {
        if self.rest.is_some() {
            return Err(self.invalid());
        }
        let digits = self.fraction.as_deref().unwrap_or_default().as_bytes();
        let tenth = digits.first().map_or(0, |digit| u64::from(digit - b'0'));
        let round_up = digits.get(1).is_some_and(|digit| *digit >= b'5');
        let tenths = u64::from(self.major) * 10 + tenth + u64::from(round_up) + 1;
        let major = u32::try_from(tenths / 10).map_err(|_| self.invalid())?;
        Ok(Self::new(major, (tenths % 10) as u32))
    }

    fn invalid(&self) -> GraphError {
        GraphError::InvalidVersion(self.to_string())
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(fraction) = &self.fraction {
            write!(f, ".{fraction}")?;
        }
        if let Some(rest) = &self.rest {
            write!(f, ".{rest}")?;
        }
        Ok(())
    }
}

fn is_decimal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}

impl FromStr for Version {
    type Err = GraphError;

    /// Accepts `N`, `N.D...` and `N.D....D...`. Leading zeros on the major
    /// component and surrounding whitespace are rejected so the text
    /// renders back unchanged.
    fn from_str(value: &str) -> GraphResult<Self> {
        let invalid = || GraphError::InvalidVersion(value.to_string());
        let mut parts = value.splitn(3, '.');
        let major_text = parts.next().unwrap_or_default();
        if !is_decimal(major_text) || (major_text.len() > 1 && major_text.starts_with('0')) {
            return Err(invalid());
        }
        let major = major_text.parse::<u32>().map_err(|_| invalid())?;

        let fraction = parts.next();
        if fraction.is_some_and(|fraction| !is_decimal(fraction)) {
            return Err(invalid());
        }
        let rest = parts.next();
        if rest.is_some_and(|rest| !rest.split('.').all(is_decimal)) {
            return Err(invalid());
        }

        Ok(Self {
            major,
            fraction: fraction.map(str::to_string),
            rest: rest.map(str::to_string),
        })
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Older documents may carry the version as a bare JSON number.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawVersion {
    Text(String),
    Integer(u64),
    Float(f64),
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = match RawVersion::deserialize(deserializer)? {
            RawVersion::Text(text) => text,
            RawVersion::Integer(value) => value.to_string(),
            // `{:?}` keeps the decimal point: 3.0 reads as "3.0", not "3".
            RawVersion::Float(value) => format!("{value:?}"),
        };
        text.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::Version;
    use crate::error::GraphError;

    #[test]
    fn parses_dotted_and_bare_versions() {
        assert_eq!("3.1".parse::<Version>().unwrap(), Version::new(3, 1));
        assert_eq!("7".parse::<Version>().unwrap().to_string(), "7");
        assert!("v3".parse::<Version>().is_err());
        assert!("3.x".parse::<Version>().is_err());
        assert!("3.".parse::<Version>().is_err());
        assert!("03.1".parse::<Version>().is_err());
        assert!(" 3.1".parse::<Version>().is_err());
        assert!("+3.1".parse::<Version>().is_err());
    }

    #[test]
    fn text_is_kept_verbatim() {
        for text in ["3.05", "3.10", "1.2.3", "0.0", "2.000"] {
            assert_eq!(text.parse::<Version>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn major_bump_discards_everything_after_major() {
        assert_eq!(Version::new(3, 1).bump_major().unwrap().to_string(), "4.0");
        let dotted: Version = "1.2.3".parse().unwrap();
        assert_eq!(dotted.bump_major().unwrap().to_string(), "2.0");
    }

    #[test]
    fn minor_bump_adds_one_tenth() {
        let bump = |text: &str| text.parse::<Version>().unwrap().bump_minor().unwrap().to_string();
        assert_eq!(bump("3.0"), "3.1");
        assert_eq!(bump("3.9"), "4.0");
        assert_eq!(bump("3.10"), "3.2");
        assert_eq!(bump("3.14"), "3.2");
        assert_eq!(bump("3.05"), "3.2");
        assert_eq!(bump("3.96"), "4.1");
        assert_eq!(bump("7"), "7.1");
    }

    #[test]
    fn minor_bump_rejects_three_components() {
        let dotted: Version = "1.2.3".parse().unwrap();
        assert!(matches!(
            dotted.bump_minor(),
            Err(GraphError::InvalidVersion(text)) if text == "1.2.3"
        ));
    }

    #[test]
    fn bumps_report_major_overflow() {
        let top = Version::new(u32::MAX, 0);
        assert!(matches!(top.bump_major(), Err(GraphError::InvalidVersion(_))));
        let edge = Version::new(u32::MAX, 9);
        assert!(matches!(edge.bump_minor(), Err(GraphError::InvalidVersion(_))));
        assert_eq!(
            Version::new(u32::MAX, 8).bump_minor().unwrap(),
            Version::new(u32::MAX, 9)
        );
    }

    #[test]
    fn deserializes_string_or_number() {
        let from_text: Version = serde_json::from_str("\"2.3\"").unwrap();
        let from_float: Version = serde_json::from_str("2.5").unwrap();
        let from_whole_float: Version = serde_json::from_str("3.0").unwrap();
        let from_int: Version = serde_json::from_str("4").unwrap();
        assert_eq!(from_text, Version::new(2, 3));
        assert_eq!(from_float, Version::new(2, 5));
        assert_eq!(from_whole_float, Version::new(3, 0));
        assert_eq!(from_int.to_string(), "4");
        assert_eq!(serde_json::to_string(&from_text).unwrap(), "\"2.3\"");
    }
}
