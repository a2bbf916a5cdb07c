//! Media query list parsing.
//!
//! Accepts the classic Media Queries Level 3 grammar:
//!
//! ```text
//! [only | not] <type> [and (<feature>[: <value>]) [and ...]]
//! (<feature>[: <value>]) [and ...]
//! ```
//!
//! joined by commas. Level 4 range syntax (`width >= 600px`), `or`, and
//! nested conditions are rejected, as are empty comma parts.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// `min-` / `max-` prefix of a media feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Min,
    Max,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Min => "min",
            Modifier::Max => "max",
        }
    }
}

/// One `(feature: value)` test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaExpression {
    pub modifier: Option<Modifier>,
    /// Feature name without the modifier, lower-cased.
    pub feature: String,
    pub value: Option<String>,
}

/// One comma-separated entry of a media query list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaQuery {
    pub inverse: bool,
    /// Lower-cased media type, `all` when omitted.
    pub media_type: String,
    /// Combined with `and`.
    pub expressions: Vec<MediaExpression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid media query: {query:?}")]
pub struct MediaQueryError {
    pub query: String,
}

impl MediaQueryError {
    fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
        }
    }
}

impl MediaExpression {
    pub fn new(modifier: Option<Modifier>, feature: &str, value: Option<&str>) -> Self {
        Self {
            modifier,
            feature: feature.to_string(),
            value: value.map(str::to_string),
        }
    }
}

impl MediaQuery {
    /// A query of type `all` with the given expressions.
    pub fn features(expressions: Vec<MediaExpression>) -> Self {
        Self {
            inverse: false,
            media_type: "all".to_string(),
            expressions,
        }
    }
}

impl fmt::Display for MediaExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        if let Some(modifier) = self.modifier {
            write!(f, "{}-", modifier.as_str())?;
        }
        f.write_str(&self.feature)?;
        if let Some(value) = &self.value {
            write!(f, ": {}", value)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(self.expressions.len() + 1);
        if self.inverse || self.media_type != "all" || self.expressions.is_empty() {
            let prefix = if self.inverse { "not " } else { "" };
            parts.push(format!("{}{}", prefix, self.media_type));
        }
        parts.extend(self.expressions.iter().map(ToString::to_string));
        f.write_str(&parts.join(" and "))
    }
}

fn query_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and validated at compile-test time.
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)^(?:(only|not)?\s*([_a-z][_a-z0-9-]*)|(\([^\)]+\)))(?:\s*and\s*(.*))?$")
            .expect("Hardcoded regex pattern is valid")
    })
}

fn expression_list_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\([^\)]+\)").expect("Hardcoded regex pattern is valid"))
}

fn expression_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)^\(\s*([_a-z-][_a-z0-9-]*)\s*(?::\s*([^\)]+))?\s*\)$")
            .expect("Hardcoded regex pattern is valid")
    })
}

/// Parses a comma-separated media query list.
///
/// Fails as a whole if any entry fails.
pub fn parse_media_query_list(text: &str) -> Result<Vec<MediaQuery>, MediaQueryError> {
    text.split(',').map(|part| parse_media_query(part.trim())).collect()
}

fn parse_media_query(query: &str) -> Result<MediaQuery, MediaQueryError> {
    let captures = query_regex()
        .captures(query)
        .ok_or_else(|| MediaQueryError::new(query))?;

    let inverse = captures
        .get(1)
        .is_some_and(|m| m.as_str().eq_ignore_ascii_case("not"));
    let media_type = captures
        .get(2)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_else(|| "all".to_string());

    // dangling `and`
    if captures.get(4).is_some_and(|m| m.as_str().trim().is_empty()) {
        return Err(MediaQueryError::new(query));
    }

    let mut expression_text = String::new();
    for idx in [3, 4] {
        if let Some(m) = captures.get(idx) {
            expression_text.push_str(m.as_str());
        }
    }
    let expression_text = expression_text.trim();
    if expression_text.is_empty() {
        return Ok(MediaQuery {
            inverse,
            media_type,
            expressions: Vec::new(),
        });
    }

    let expressions = expression_list_regex()
        .find_iter(expression_text)
        .map(|m| parse_expression(m.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    if expressions.is_empty() {
        return Err(MediaQueryError::new(query));
    }

    Ok(MediaQuery {
        inverse,
        media_type,
        expressions,
    })
}

fn parse_expression(expression: &str) -> Result<MediaExpression, MediaQueryError> {
    let captures = expression_regex()
        .captures(expression)
        .ok_or_else(|| MediaQueryError::new(expression))?;
    let name = captures
        .get(1)
        .map(|m| m.as_str().to_ascii_lowercase())
        .ok_or_else(|| MediaQueryError::new(expression))?;
    let value = captures
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty());

    let (modifier, feature) = if let Some(rest) = name.strip_prefix("min-") {
        (Some(Modifier::Min), rest.to_string())
    } else if let Some(rest) = name.strip_prefix("max-") {
        (Some(Modifier::Max), rest.to_string())
    } else {
        (None, name)
    };
    if feature.is_empty() {
        return Err(MediaQueryError::new(expression));
    }

    Ok(MediaExpression {
        modifier,
        feature,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_type() {
        let list = parse_media_query_list("print").unwrap();
        assert_eq!(
            list,
            vec![MediaQuery {
                inverse: false,
                media_type: "print".into(),
                expressions: vec![],
            }]
        );
    }

    #[test]
    fn test_parse_not_and_only() {
        let list = parse_media_query_list("not screen, only Print").unwrap();
        assert!(list[0].inverse);
        assert_eq!(list[0].media_type, "screen");
        assert!(!list[1].inverse);
        assert_eq!(list[1].media_type, "print");
    }

    #[test]
    fn test_parse_type_with_expressions() {
        let list =
            parse_media_query_list("screen and (min-width: 500px) and (max-width:900px)").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(
            list[0].expressions,
            vec![
                MediaExpression::new(Some(Modifier::Min), "width", Some("500px")),
                MediaExpression::new(Some(Modifier::Max), "width", Some("900px")),
            ]
        );
    }

    #[test]
    fn test_parse_expressions_without_type() {
        let list = parse_media_query_list("(orientation: landscape), (color)").unwrap();
        assert_eq!(list[0].media_type, "all");
        assert_eq!(
            list[0].expressions,
            vec![MediaExpression::new(None, "orientation", Some("landscape"))]
        );
        assert_eq!(list[1].expressions, vec![MediaExpression::new(None, "color", None)]);
    }

    #[test]
    fn test_parse_vendor_prefixed_feature() {
        let list = parse_media_query_list("(-webkit-min-device-pixel-ratio: 2)").unwrap();
        assert_eq!(list[0].expressions[0].modifier, None);
        assert_eq!(list[0].expressions[0].feature, "-webkit-min-device-pixel-ratio");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_media_query_list("(width >= 600px)").is_err());
        assert!(parse_media_query_list("screen and").is_err());
        assert!(parse_media_query_list("screen and foo").is_err());
        assert!(parse_media_query_list("screen,").is_err());
        assert!(parse_media_query_list("").is_err());
        assert!(parse_media_query_list("screen, )(").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let text = "not screen and (min-width: 500px) and (color)";
        let list = parse_media_query_list(text).unwrap();
        assert_eq!(list[0].to_string(), text);
        let features = MediaQuery::features(vec![MediaExpression::new(
            Some(Modifier::Min),
            "height",
            Some("20em"),
        )]);
        assert_eq!(features.to_string(), "(min-height: 20em)");
    }
}
