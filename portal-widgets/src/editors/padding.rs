use super::{ControlKind, EditorControl, EditorInput};
use regex::Regex;
use std::sync::OnceLock;

pub const PADDING_UNITS: &[&str] = &["px", "em", "rem", "%", "vh", "vw"];
const DEFAULT_UNIT: &str = "px";

/// Split a CSS length into amount and unit. Unparseable input reads as `0px`;
/// a bare number gets the `px` unit.
pub fn parse_length(value: &str) -> (String, String) {
    static LENGTH_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = LENGTH_REGEX.get_or_init(|| Regex::new(r"^([\d.]+)(.*)$").unwrap());

    match re.captures(value.trim()) {
        Some(caps) => {
            let unit = caps.get(2).map_or("", |m| m.as_str()).trim();
            (
                caps[1].to_string(),
                if unit.is_empty() { DEFAULT_UNIT } else { unit }.to_string(),
            )
        }
        None => ("0".to_string(), DEFAULT_UNIT.to_string()),
    }
}

pub fn compose_length(amount: &str, unit: &str) -> String {
    format!("{}{}", amount, unit)
}

pub fn padding_editor(input: &EditorInput<'_>) -> EditorControl {
    let (amount, unit) = parse_length(input.str_value());
    input.control(ControlKind::Padding {
        amount,
        unit,
        units: PADDING_UNITS.iter().map(|u| u.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("16px"), ("16".to_string(), "px".to_string()));
        assert_eq!(parse_length("1.5rem"), ("1.5".to_string(), "rem".to_string()));
        assert_eq!(parse_length("50%"), ("50".to_string(), "%".to_string()));
        assert_eq!(parse_length("8"), ("8".to_string(), "px".to_string()));
        assert_eq!(parse_length("auto"), ("0".to_string(), "px".to_string()));
        assert_eq!(parse_length(""), ("0".to_string(), "px".to_string()));
    }

    #[test]
    fn test_compose_round_trip() {
        let (amount, unit) = parse_length("12vh");
        assert_eq!(compose_length(&amount, &unit), "12vh");
        assert_eq!(compose_length("4", "em"), "4em");
    }
}
