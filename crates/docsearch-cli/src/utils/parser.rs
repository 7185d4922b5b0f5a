use docsearch::engine::config::HighlightPolicy;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidAssignment(String),

    #[error("Component '{component}' cannot be empty in '{input}'.")]
    EmptyComponent {
        component: &'static str,
        input: String,
    },

    #[error("Invalid boolean '{0}'. Expected 'true' or 'false'.")]
    InvalidBool(String),

    #[error("Invalid number '{0}'.")]
    InvalidNumber(String),

    #[error("Invalid highlight policy '{0}'. Expected 'recompute' or 'retain'.")]
    InvalidPolicy(String),

    #[error("Invalid fragment '{0}'. Expected '#name' or an empty string.")]
    InvalidFragment(String),
}

/// Splits a `KEY=VALUE` assignment at the first `=`.
pub fn parse_assignment(input: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidAssignment(input.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "key",
            input: input.to_string(),
        });
    }
    Ok((key, value.trim()))
}

pub fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ParseError::InvalidBool(value.to_string())),
    }
}

pub fn parse_offset(value: &str) -> Result<f64, ParseError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|offset| offset.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber(value.to_string()))
}

pub fn parse_policy(value: &str) -> Result<HighlightPolicy, ParseError> {
    match value.to_ascii_lowercase().as_str() {
        "recompute" => Ok(HighlightPolicy::Recompute),
        "retain" => Ok(HighlightPolicy::Retain),
        _ => Err(ParseError::InvalidPolicy(value.to_string())),
    }
}

/// Accepts `#name`, the bare `#` and the empty fragment.
pub fn parse_fragment(value: &str) -> Result<String, ParseError> {
    let value = value.trim();
    if value.is_empty() || value.starts_with('#') {
        Ok(value.to_string())
    } else {
        Err(ParseError::InvalidFragment(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_splits_at_the_first_equals_sign() {
        assert_eq!(
            parse_assignment("back-to-top.label = a=b"),
            Ok(("back-to-top.label", "a=b"))
        );
        assert_eq!(
            parse_assignment("search.marker-class"),
            Err(ParseError::InvalidAssignment("search.marker-class".to_string()))
        );
        assert!(matches!(
            parse_assignment("=value"),
            Err(ParseError::EmptyComponent { component: "key", .. })
        ));
    }

    #[test]
    fn booleans_accept_common_spellings() {
        assert_eq!(parse_bool("TRUE"), Ok(true));
        assert_eq!(parse_bool("off"), Ok(false));
        assert_eq!(parse_bool("maybe"), Err(ParseError::InvalidBool("maybe".to_string())));
    }

    #[test]
    fn offsets_must_be_finite_numbers() {
        assert_eq!(parse_offset("300"), Ok(300.0));
        assert_eq!(parse_offset("12.5"), Ok(12.5));
        assert!(parse_offset("inf").is_err());
        assert!(parse_offset("far").is_err());
    }

    #[test]
    fn policies_are_case_insensitive() {
        assert_eq!(parse_policy("Retain"), Ok(HighlightPolicy::Retain));
        assert!(parse_policy("sometimes").is_err());
    }

    #[test]
    fn fragments_must_start_with_a_hash() {
        assert_eq!(parse_fragment("#section-1"), Ok("#section-1".to_string()));
        assert_eq!(parse_fragment(""), Ok(String::new()));
        assert!(parse_fragment("section-1").is_err());
    }
}
