//! Evaluation of parsed media queries against a [`MatchConfig`].
//!
//! A match config only knows a media type and a viewport size. Features
//! derivable from those (`width`, `height`, their `device-` variants,
//! `aspect-ratio` and `orientation`) are answered; every other feature has
//! no value and its expression evaluates to false.

use crate::config::MatchConfig;

use super::media_query::{
    parse_media_query_list, MediaExpression, MediaQuery, MediaQueryError, Modifier,
};

const PX_PER_EM: f64 = 16.0;
const PX_PER_IN: f64 = 96.0;

/// Value of a media feature in a given environment.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FeatureValue {
    Length(f64),
    Ratio(f64),
    Orientation(&'static str),
}

/// Converts a CSS length to pixels.
///
/// A unitless number is taken as pixels. Returns `None` when the text does
/// not start with a number or carries an unknown unit.
pub fn length_to_px(text: &str) -> Option<f64> {
    let text = text.trim();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);
    let value: f64 = number.parse().ok()?;

    let (num, den) = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "px" => (1.0, 1.0),
        "em" | "rem" => (PX_PER_EM, 1.0),
        "in" => (PX_PER_IN, 1.0),
        "cm" => (PX_PER_IN, 2.54),
        "mm" => (PX_PER_IN, 25.4),
        "q" => (PX_PER_IN, 101.6),
        "pt" => (PX_PER_IN, 72.0),
        "pc" => (PX_PER_IN, 6.0),
        _ => return None,
    };
    Some(value * num / den)
}

/// Parses `16/9` or a plain decimal.
fn ratio_to_decimal(text: &str) -> Option<f64> {
    match text.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            (den != 0.0).then(|| num / den)
        }
        None => text.trim().parse().ok(),
    }
}

fn feature_value(feature: &str, config: &MatchConfig) -> Option<FeatureValue> {
    let width = config.width.to_px();
    let height = config.height.to_px();
    match feature {
        "width" | "device-width" => Some(FeatureValue::Length(width)),
        "height" | "device-height" => Some(FeatureValue::Length(height)),
        "aspect-ratio" | "device-aspect-ratio" if height > 0.0 => {
            Some(FeatureValue::Ratio(width / height))
        }
        "orientation" => Some(FeatureValue::Orientation(if height >= width {
            "portrait"
        } else {
            "landscape"
        })),
        _ => None,
    }
}

fn compare(actual: f64, modifier: Option<Modifier>, expected: f64) -> bool {
    const EPSILON: f64 = 1e-9;
    match modifier {
        Some(Modifier::Min) => actual >= expected - EPSILON,
        Some(Modifier::Max) => actual <= expected + EPSILON,
        None => (actual - expected).abs() <= EPSILON,
    }
}

/// Evaluates a single `(feature: value)` expression.
pub fn expression_matches(expression: &MediaExpression, config: &MatchConfig) -> bool {
    let Some(actual) = feature_value(&expression.feature, config) else {
        return false;
    };
    let Some(expected) = expression.value.as_deref() else {
        // boolean context: `(width)` is true for any non-zero width
        return match actual {
            FeatureValue::Length(v) | FeatureValue::Ratio(v) => {
                expression.modifier.is_none() && v != 0.0
            }
            FeatureValue::Orientation(_) => expression.modifier.is_none(),
        };
    };

    match actual {
        FeatureValue::Length(actual) => match length_to_px(expected) {
            Some(expected) => compare(actual, expression.modifier, expected),
            None => false,
        },
        FeatureValue::Ratio(actual) => match ratio_to_decimal(expected) {
            Some(expected) => compare(actual, expression.modifier, expected),
            None => false,
        },
        FeatureValue::Orientation(actual) => {
            expression.modifier.is_none() && actual.eq_ignore_ascii_case(expected.trim())
        }
    }
}

/// Evaluates one parsed query: media type and all expressions, negated when
/// the query starts with `not`.
pub fn query_matches(query: &MediaQuery, config: &MatchConfig) -> bool {
    let type_match = query.media_type == "all" || query.media_type == config.media_type.as_str();
    let matched = type_match
        && query
            .expressions
            .iter()
            .all(|expression| expression_matches(expression, config));
    matched != query.inverse
}

/// Parses a media query list and reports whether any entry matches.
pub fn match_media_query(text: &str, config: &MatchConfig) -> Result<bool, MediaQueryError> {
    let queries = parse_media_query_list(text)?;
    Ok(queries.iter().any(|query| query_matches(query, config)))
}
