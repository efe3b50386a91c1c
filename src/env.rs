//! Combinators that describe one environment variable each
//!
//! Every function only builds a [`Config`]; nothing is read until the
//! descriptor is evaluated.

use crate::{config::Config, redacted::Redacted};
use std::str::FromStr;
use url::Url;

const TRUTHY: [&str; 4] = ["true", "yes", "on", "1"];
const FALSY: [&str; 4] = ["false", "no", "off", "0"];

fn parse_number(raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(n) if !n.is_nan() => Ok(n),
        _ => Err(format!("Expected a number but received '{}'", raw)),
    }
}

fn parse_integer(raw: &str) -> Result<i64, String> {
    raw.parse()
        .map_err(|_| format!("Expected an integer but received '{}'", raw))
}

fn parse_boolean(raw: &str) -> Result<bool, String> {
    if TRUTHY.contains(&raw) {
        Ok(true)
    } else if FALSY.contains(&raw) {
        Ok(false)
    } else {
        Err(format!(
            "Expected a boolean ({} or {}) but received '{}'",
            TRUTHY.join("/"),
            FALSY.join("/"),
            raw
        ))
    }
}

/// A required string, returned exactly as set
pub fn string(name: &str) -> Config<String> {
    Config::primitive(name, "string", |raw| Ok(raw.to_string()))
}

/// A required number
///
/// Parsed as `f64`; text that does not parse, or parses to `NaN`, is invalid.
pub fn number(name: &str) -> Config<f64> {
    Config::primitive(name, "number", parse_number)
}

/// A required boolean: `true`/`yes`/`on`/`1` or `false`/`no`/`off`/`0`
pub fn boolean(name: &str) -> Config<bool> {
    Config::primitive(name, "boolean", parse_boolean)
}

/// A required secret, hidden from `Debug` and `Display` output
pub fn redacted(name: &str) -> Config<Redacted> {
    Config::primitive(name, "redacted string", |raw| Ok(Redacted::new(raw.to_string())))
}

/// A string, or `default` when unset
pub fn string_or(name: &str, default: impl Into<String>) -> Config<String> {
    string(name).with_default_shown(default.into())
}

/// A number, or `default` when unset. A set but unparseable value is an error.
pub fn number_or(name: &str, default: f64) -> Config<f64> {
    number(name).with_default_shown(default)
}

/// A boolean, or `default` when unset. A value outside the vocabulary is an error.
pub fn boolean_or(name: &str, default: bool) -> Config<bool> {
    boolean(name).with_default_shown(default)
}

/// `Some(string)` when set, `None` when unset
pub fn optional_string(name: &str) -> Config<Option<String>> {
    string(name).optional()
}

/// `Some(number)` when set, `None` when unset; an unparseable value is an error
pub fn optional_number(name: &str) -> Config<Option<f64>> {
    number(name).optional()
}

/// `Some(boolean)` when set, `None` when unset; text outside the vocabulary is an error
pub fn optional_boolean(name: &str) -> Config<Option<bool>> {
    boolean(name).optional()
}

/// `Some(secret)` when set, `None` when unset
pub fn optional_redacted(name: &str) -> Config<Option<Redacted>> {
    redacted(name).optional()
}

/// A required string that must equal one of `values` exactly
///
/// Matching is case-sensitive and does not trim whitespace.
pub fn literal(name: &str, values: &[&str]) -> Config<String> {
    let allowed: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    let kind = format!("one of: {}", allowed.join(", "));
    Config::primitive(name, kind, move |raw| {
        if allowed.iter().any(|v| v == raw) {
            Ok(raw.to_string())
        } else {
            Err(format!(
                "Expected one of ({}) but received '{}'",
                allowed.join(", "),
                raw
            ))
        }
    })
}

/// Like [`literal`], with `default` used when the variable is unset
///
/// The default is substituted without being checked against `values`, so a
/// default outside the allowed set is returned unchanged. Callers are
/// responsible for passing a member of `values`.
pub fn literal_or(name: &str, default: &str, values: &[&str]) -> Config<String> {
    literal(name, values).with_default_shown(default.to_string())
}

/// A required URL, returned unchanged once it parses as a valid URL
pub fn url(name: &str) -> Config<String> {
    Config::primitive(name, "url", |raw| match Url::parse(raw) {
        Ok(_) => Ok(raw.to_string()),
        Err(e) => Err(format!("Expected a valid URL but received '{}': {}", raw, e)),
    })
}

/// A required signed integer
pub fn integer(name: &str) -> Config<i64> {
    Config::primitive(name, "integer", parse_integer)
}

/// An integer, or `default` when unset
pub fn integer_or(name: &str, default: i64) -> Config<i64> {
    integer(name).with_default_shown(default)
}

/// Any [`FromStr`] type, e.g. `u16`, `IpAddr` or a custom enum
pub fn parsed<T>(name: &str) -> Config<T>
where
    T: FromStr + Send + Sync + 'static,
{
    let kind = std::any::type_name::<T>();
    Config::primitive(name, kind, move |raw| {
        raw.parse()
            .map_err(|_| format!("Expected a value of type {} but received '{}'", kind, raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_string() {
        assert_eq!(string("A").load_from(&[("A", "  hello ")]).unwrap(), "  hello ");
        assert_eq!(string("A").load_from(&[("A", "")]).unwrap(), "");
        assert_eq!(
            string("A").load_from(&[("B", "x")]).unwrap_err(),
            vec![ConfigError::missing("A")]
        );
    }

    #[test]
    fn test_number() {
        for (raw, expected) in [("42", 42.0), ("-2.5", -2.5), ("1e3", 1000.0), ("0", 0.0)] {
            assert_eq!(number("N").load_from(&[("N", raw)]).unwrap(), expected);
        }
    }

    #[test]
    fn test_number_invalid() {
        for raw in ["abc", "", "12abc", "NaN", " 5"] {
            let errors = number("N").load_from(&[("N", raw)]).unwrap_err();
            assert!(errors[0].is_invalid_data(), "{raw:?} should be invalid");
        }
        assert!(number("N").load_from(&[("X", "1")]).unwrap_err()[0].is_missing());
    }

    #[test]
    fn test_boolean_vocabulary() {
        for raw in ["true", "yes", "on", "1"] {
            assert!(boolean("B").load_from(&[("B", raw)]).unwrap());
        }
        for raw in ["false", "no", "off", "0"] {
            assert!(!boolean("B").load_from(&[("B", raw)]).unwrap());
        }
    }

    #[test]
    fn test_boolean_rejects_other_text() {
        for raw in ["TRUE", "Yes", "2", "y", "", " true"] {
            let errors = boolean("B").load_from(&[("B", raw)]).unwrap_err();
            assert!(errors[0].is_invalid_data(), "{raw:?} should be invalid");
        }
    }

    #[test]
    fn test_redacted() {
        let secret = redacted("TOKEN").load_from(&[("TOKEN", "s3cr3t")]).unwrap();
        assert!(!secret.to_string().contains("s3cr3t"));
        assert!(!format!("{:?}", secret).contains("s3cr3t"));
        assert_eq!(secret.expose(), "s3cr3t");
        assert!(redacted("TOKEN").load_from(&[("X", "")]).unwrap_err()[0].is_missing());
    }

    #[test]
    fn test_string_or() {
        assert_eq!(string_or("S", "fallback").load_from(&[("X", "")]).unwrap(), "fallback");
        assert_eq!(string_or("S", "fallback").load_from(&[("S", " raw ")]).unwrap(), " raw ");
    }

    #[test]
    fn test_number_or() {
        assert_eq!(number_or("N", 5.0).load_from(&[("X", "")]).unwrap(), 5.0);
        assert_eq!(number_or("N", 5.0).load_from(&[("N", "7")]).unwrap(), 7.0);
        assert!(number_or("N", 5.0).load_from(&[("N", "seven")]).is_err());
    }

    #[test]
    fn test_boolean_or() {
        assert!(boolean_or("B", true).load_from(&[("X", "")]).unwrap());
        assert!(!boolean_or("B", true).load_from(&[("B", "off")]).unwrap());
        assert!(boolean_or("B", true).load_from(&[("B", "maybe")]).is_err());
    }

    #[test]
    fn test_optional_string() {
        assert_eq!(optional_string("S").load_from(&[("X", "")]).unwrap(), None);
        assert_eq!(
            optional_string("S").load_from(&[("S", "v")]).unwrap(),
            Some("v".to_string())
        );
    }

    #[test]
    fn test_optional_number() {
        assert_eq!(optional_number("N").load_from(&[("X", "")]).unwrap(), None);
        assert_eq!(optional_number("N").load_from(&[("N", "1.5")]).unwrap(), Some(1.5));
        assert!(optional_number("N").load_from(&[("N", "x")]).is_err());
    }

    #[test]
    fn test_optional_boolean() {
        assert_eq!(optional_boolean("B").load_from(&[("X", "")]).unwrap(), None);
        assert_eq!(optional_boolean("B").load_from(&[("B", "on")]).unwrap(), Some(true));
        assert_eq!(optional_boolean("B").load_from(&[("B", "0")]).unwrap(), Some(false));

        let errors = optional_boolean("B").load_from(&[("B", "maybe")]).unwrap_err();
        assert!(errors[0].is_invalid_data());
    }

    #[test]
    fn test_optional_redacted() {
        assert!(optional_redacted("TOKEN").load_from(&[("X", "")]).unwrap().is_none());

        let token = optional_redacted("TOKEN").load_from(&[("TOKEN", "s3cr3t")]).unwrap();
        assert!(!format!("{:?}", token).contains("s3cr3t"));
        assert_eq!(token.as_ref().map(|t| t.expose().as_str()), Some("s3cr3t"));
    }

    #[test]
    fn test_literal_exact_match() {
        let mode = literal("MODE", &["dev", "prod"]);
        assert_eq!(mode.load_from(&[("MODE", "prod")]).unwrap(), "prod");
        for raw in ["Prod", "PROD", " prod", "prod ", "staging"] {
            let errors = mode.load_from(&[("MODE", raw)]).unwrap_err();
            assert!(errors[0].is_invalid_data(), "{raw:?} should be rejected");
        }
        assert!(mode.load_from(&[("X", "")]).unwrap_err()[0].is_missing());
    }

    #[test]
    fn test_literal_empty_list_rejects_everything() {
        assert!(literal("MODE", &[]).load_from(&[("MODE", "")]).is_err());
    }

    #[test]
    fn test_literal_or() {
        let mode = literal_or("MODE", "dev", &["dev", "prod"]);
        assert_eq!(mode.load_from(&[("X", "")]).unwrap(), "dev");
        assert_eq!(mode.load_from(&[("MODE", "prod")]).unwrap(), "prod");
        assert!(mode.load_from(&[("MODE", "test")]).is_err());
    }

    // Known edge case: the default is not checked against the allowed values.
    #[test]
    fn test_literal_or_default_outside_allowed_values_is_returned() {
        let mode = literal_or("MODE", "staging", &["dev", "prod"]);
        assert_eq!(mode.load_from(&[("X", "")]).unwrap(), "staging");
        assert!(mode.load_from(&[("MODE", "staging")]).is_err());
    }

    #[test]
    fn test_url() {
        let endpoint = url("ENDPOINT");
        assert_eq!(
            endpoint.load_from(&[("ENDPOINT", "https://example.com")]).unwrap(),
            "https://example.com"
        );
        assert_eq!(
            endpoint.load_from(&[("ENDPOINT", "postgres://u:p@db:5432/app")]).unwrap(),
            "postgres://u:p@db:5432/app"
        );
        assert!(endpoint.load_from(&[("ENDPOINT", "not a url")]).unwrap_err()[0].is_invalid_data());
        assert!(endpoint.load_from(&[("X", "")]).unwrap_err()[0].is_missing());
    }

    #[test]
    fn test_integer() {
        assert_eq!(integer("I").load_from(&[("I", "-12")]).unwrap(), -12);
        assert!(integer("I").load_from(&[("I", "1.5")]).is_err());
        assert_eq!(integer_or("I", 9).load_from(&[("X", "")]).unwrap(), 9);
    }

    #[test]
    fn test_parsed() {
        let port = parsed::<u16>("PORT");
        assert_eq!(port.load_from(&[("PORT", "8080")]).unwrap(), 8080);
        assert!(port.load_from(&[("PORT", "70000")]).is_err());
    }

    #[test]
    fn test_metadata_kinds() {
        assert_eq!(literal("MODE", &["a", "b"]).fields()[0].kind, "one of: a, b");
        assert_eq!(url("U").fields()[0].kind, "url");
        let shape = literal_or("MODE", "a", &["a", "b"]);
        let field = &shape.fields()[0];
        assert!(!field.required);
        assert_eq!(field.default.as_deref(), Some("a"));
    }
}
