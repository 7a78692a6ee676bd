//! Transform string parsing and building.
//!
//! The canonical persisted form of an element transform is the SVG
//! transform-function string. Panel editing works on a lossy {scaleX,
//! scaleY, rotate} decomposition; translation is carried by the x/y or
//! cx/cy attributes instead so drag-move and panel edits stay consistent.

use serde::{Deserialize, Serialize};

/// Decomposed transform values used for panel editing round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformValues {
    pub scale_x: f64,
    pub scale_y: f64,
    /// Rotation in degrees.
    pub rotate: f64,
}

impl Default for TransformValues {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            rotate: 0.0,
        }
    }
}

/// Format a number the way a transform string carries it: no trailing
/// fractional zeros for whole values.
pub(crate) fn fmt_number(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Find the argument list of `name(...)` in `input` and parse its
/// comma/whitespace separated numbers.
///
/// Matches whole function names only: searching for `scale` will not match
/// inside `scaleX` because the match requires `name` to be followed
/// immediately by `(`.
fn function_args(input: &str, name: &str) -> Option<Vec<f64>> {
    let needle = format!("{}(", name);
    let mut search_from = 0;
    while let Some(rel) = input[search_from..].find(&needle) {
        let start = search_from + rel;
        // Reject matches that are a suffix of a longer identifier
        // (e.g. "scale(" inside "descale(").
        let preceded_by_ident = start > 0
            && input[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphanumeric());
        let args_start = start + needle.len();
        if preceded_by_ident {
            search_from = args_start;
            continue;
        }
        let end = input[args_start..].find(')')? + args_start;
        let args: Vec<f64> = input[args_start..end]
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect();
        return Some(args);
    }
    None
}

/// Parse a transform string into decomposed values.
///
/// Matches `scale(...)`, `scaleX(...)`, `scaleY(...)` and `rotate(...)`
/// sub-expressions independently; anything else is ignored. Missing or
/// unparseable components fall back to the identity values.
pub fn parse_transform(transform: &str) -> TransformValues {
    let mut result = TransformValues::default();
    if transform.is_empty() {
        return result;
    }

    if let Some(args) = function_args(transform, "scale") {
        if let Some(&sx) = args.first() {
            result.scale_x = sx;
            result.scale_y = args.get(1).copied().unwrap_or(sx);
        }
    }
    if let Some(args) = function_args(transform, "scaleX") {
        if let Some(&sx) = args.first() {
            result.scale_x = sx;
        }
    }
    if let Some(args) = function_args(transform, "scaleY") {
        if let Some(&sy) = args.first() {
            result.scale_y = sy;
        }
    }
    if let Some(args) = function_args(transform, "rotate") {
        if let Some(&r) = args.first() {
            result.rotate = r;
        }
    }

    result
}

/// Build a transform string from decomposed values.
///
/// Scale is omitted entirely when both factors are 1, collapsed to a
/// single-argument `scale(s)` when the factors are equal, and rotate is
/// omitted when it is 0.
pub fn build_transform(values: &TransformValues) -> String {
    let mut parts: Vec<String> = Vec::new();

    if values.scale_x != 1.0 || values.scale_y != 1.0 {
        if values.scale_x == values.scale_y {
            parts.push(format!("scale({})", fmt_number(values.scale_x)));
        } else {
            parts.push(format!(
                "scale({}, {})",
                fmt_number(values.scale_x),
                fmt_number(values.scale_y)
            ));
        }
    }

    if values.rotate != 0.0 {
        parts.push(format!("rotate({})", fmt_number(values.rotate)));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let t = parse_transform("");
        assert_eq!(t, TransformValues::default());
    }

    #[test]
    fn test_parse_uniform_scale() {
        let t = parse_transform("scale(2)");
        assert!((t.scale_x - 2.0).abs() < f64::EPSILON);
        assert!((t.scale_y - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_non_uniform_scale() {
        let t = parse_transform("scale(2, 0.5)");
        assert!((t.scale_x - 2.0).abs() < f64::EPSILON);
        assert!((t.scale_y - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_scale_axis_overrides() {
        let t = parse_transform("scaleX(3) scaleY(4)");
        assert!((t.scale_x - 3.0).abs() < f64::EPSILON);
        assert!((t.scale_y - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_rotate() {
        let t = parse_transform("rotate(45)");
        assert!((t.rotate - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scale_does_not_match_scale_x() {
        // A lone scaleX() must leave scale_y at identity.
        let t = parse_transform("scaleX(2)");
        assert!((t.scale_x - 2.0).abs() < f64::EPSILON);
        assert!((t.scale_y - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_build_identity_is_empty() {
        assert_eq!(build_transform(&TransformValues::default()), "");
    }

    #[test]
    fn test_build_merges_equal_scale() {
        let t = TransformValues {
            scale_x: 2.0,
            scale_y: 2.0,
            rotate: 0.0,
        };
        assert_eq!(build_transform(&t), "scale(2)");
    }

    #[test]
    fn test_build_keeps_separate_scale() {
        let t = TransformValues {
            scale_x: 2.0,
            scale_y: 0.5,
            rotate: 90.0,
        };
        assert_eq!(build_transform(&t), "scale(2, 0.5) rotate(90)");
    }

    #[test]
    fn test_round_trip() {
        for input in ["scale(1.5)", "scale(2, 3)", "rotate(45)", "scale(2) rotate(-30)"] {
            let parsed = parse_transform(input);
            let rebuilt = build_transform(&parsed);
            let reparsed = parse_transform(&rebuilt);
            assert!((parsed.scale_x - reparsed.scale_x).abs() < 1e-9, "{}", input);
            assert!((parsed.scale_y - reparsed.scale_y).abs() < 1e-9, "{}", input);
            assert!((parsed.rotate - reparsed.rotate).abs() < 1e-9, "{}", input);
        }
    }
}
