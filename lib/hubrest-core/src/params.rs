//! Name-value encoding for request bodies and query strings.
//!
//! Command arguments arrive as `name=value` tokens. [`Params`] keeps them in
//! input order and renders them either as a flat JSON object, inferring
//! booleans and numbers, or as a percent-encoded query string.
//!
//! Names starting with [`RESERVED_PREFIX`] are control parameters. They are
//! kept in the list (see [`Params::control`]) but never rendered.
//!
//! # Example
//!
//! ```
//! use hubrest_core::Params;
//!
//! let params = Params::parse(["name=hubrest", "private=true", "_follow=1"]).unwrap();
//! assert_eq!(params.to_json(), r#"{"name":"hubrest","private":true}"#);
//! assert_eq!(params.to_query_string(), "name=hubrest&private=true");
//! ```

use std::fmt;
use std::str::FromStr;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Prefix marking control parameters that are never encoded.
pub const RESERVED_PREFIX: &str = "_";

/// Everything except the RFC 3986 unreserved characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// How a value is rendered in JSON mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// The literal `true` or `false`.
    Boolean,
    /// Optional sign, digits, optional fraction.
    Number,
    /// Anything else.
    Text,
}

impl ValueKind {
    /// Classify a raw value.
    #[must_use]
    pub fn of(value: &str) -> Self {
        if value == "true" || value == "false" {
            Self::Boolean
        } else if is_numeric(value) {
            Self::Number
        } else {
            Self::Text
        }
    }
}

fn is_numeric(value: &str) -> bool {
    let unsigned = value.strip_prefix(['-', '+']).unwrap_or(value);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(integer) && fraction.is_none_or(all_digits)
}

/// A single `name=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    name: String,
    value: String,
}

impl Param {
    /// Creates a pair.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw parameter value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns `true` for control parameters.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        self.name.starts_with(RESERVED_PREFIX)
    }

    /// JSON value with boolean and number inference.
    #[must_use]
    pub fn json_value(&self) -> Value {
        match ValueKind::of(&self.value) {
            ValueKind::Boolean => Value::Bool(self.value == "true"),
            ValueKind::Number => {
                // The literal is kept digit for digit; numbers JSON cannot
                // spell (leading zeros) stay strings.
                let literal = self.value.strip_prefix('+').unwrap_or(&self.value);
                serde_json::from_str::<serde_json::Number>(literal)
                    .map_or_else(|_| Value::String(self.value.clone()), Value::Number)
            }
            ValueKind::Text => Value::String(self.value.clone()),
        }
    }
}

impl FromStr for Param {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        match token.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok(Self::new(name, value)),
            Some(_) => Err(Error::invalid_argument(format!(
                "empty name in '{token}'"
            ))),
            None => Err(Error::invalid_argument(format!(
                "expected name=value, got '{token}'"
            ))),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Ordered list of `name=value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    params: Vec<Param>,
}

impl Params {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `name=value` tokens, splitting each on its first `=`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] naming the first token without `=`.
    pub fn parse<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .map(|token| token.as_ref().parse::<Param>())
            .collect::<Result<Vec<_>>>()
            .map(|params| Self { params })
    }

    /// Appends a pair.
    pub fn push(&mut self, param: Param) {
        self.params.push(param);
    }

    /// Appends a pair, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Param::new(name, value));
        self
    }

    /// Value of the control parameter `_<name>`, last occurrence wins.
    #[must_use]
    pub fn control(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|p| p.is_reserved() && p.name.strip_prefix(RESERVED_PREFIX) == Some(name))
            .map(Param::value)
    }

    /// Pairs that are rendered, in input order.
    pub fn encodable(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|p| !p.is_reserved())
    }

    /// Returns `true` if no pair would be rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.encodable().next().is_none()
    }

    /// Render as a flat JSON object in input order.
    ///
    /// Booleans and numbers are unquoted; everything else becomes a JSON
    /// string with quotes, backslashes and newlines escaped. A repeated name
    /// keeps its first position and its last value.
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        let object: Map<String, Value> = self
            .encodable()
            .map(|p| (p.name.clone(), p.json_value()))
            .collect();
        Value::Object(object)
    }

    /// [`Params::to_json_value`] serialized compactly.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.to_json_value().to_string()
    }

    /// Render as `name=value&...` with RFC 3986 percent-encoding.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.encodable()
            .map(|p| {
                format!(
                    "{}={}",
                    utf8_percent_encode(&p.name, QUERY_VALUE),
                    utf8_percent_encode(&p.value, QUERY_VALUE)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl FromIterator<Param> for Params {
    fn from_iter<T: IntoIterator<Item = Param>>(iter: T) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

impl Extend<Param> for Params {
    fn extend<T: IntoIterator<Item = Param>>(&mut self, iter: T) {
        self.params.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use assert2::check;

    use super::*;

    fn params(tokens: &[&str]) -> Params {
        Params::parse(tokens).expect("valid params")
    }

    #[test]
    fn value_kind_inference() {
        check!(ValueKind::of("true") == ValueKind::Boolean);
        check!(ValueKind::of("false") == ValueKind::Boolean);
        check!(ValueKind::of("True") == ValueKind::Text);
        check!(ValueKind::of("123") == ValueKind::Number);
        check!(ValueKind::of("-1.5") == ValueKind::Number);
        check!(ValueKind::of("+7") == ValueKind::Number);
        check!(ValueKind::of("1.") == ValueKind::Text);
        check!(ValueKind::of(".5") == ValueKind::Text);
        check!(ValueKind::of("1e3") == ValueKind::Text);
        check!(ValueKind::of("") == ValueKind::Text);
        check!(ValueKind::of("-") == ValueKind::Text);
    }

    #[test]
    fn numbers_and_booleans_are_unquoted() {
        let json = params(&["bar=123", "baz=true", "qux=Qux=Qux"]).to_json();
        insta::assert_snapshot!(json, @r#"{"bar":123,"baz":true,"qux":"Qux=Qux"}"#);
    }

    #[test]
    fn keys_keep_input_order() {
        let json = params(&["zeta=1", "alpha=2", "mid=3"]).to_json();
        assert_eq!(json, r#"{"zeta":1,"alpha":2,"mid":3}"#);
    }

    #[test]
    fn multiline_values_are_escaped() {
        let json = params(&["body=line one\nline \"two\""]).to_json();
        assert_eq!(json, r#"{"body":"line one\nline \"two\""}"#);
        assert!(!json.contains('\n'));
    }

    #[test]
    fn text_values_round_trip() {
        let input = [
            ("title", "Release v1"),
            ("body", "multi\nline\n\"quoted\" text"),
            ("tag", "back\\slash"),
            ("empty", ""),
        ];
        let params: Params = input.iter().map(|(n, v)| Param::new(*n, *v)).collect();

        let decoded: BTreeMap<String, String> =
            serde_json::from_str(&params.to_json()).expect("valid JSON");
        let expected: BTreeMap<String, String> = input
            .iter()
            .map(|(n, v)| ((*n).to_string(), (*v).to_string()))
            .collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn unrepresentable_numbers_stay_strings() {
        let json = params(&["sha=007", "count=+5"]).to_json();
        assert_eq!(json, r#"{"sha":"007","count":5}"#);
    }

    #[test]
    fn number_literals_are_kept_verbatim() {
        let json = params(&["id=99999999999999999999", "version=1.10", "offset=-0"]).to_json();
        assert_eq!(json, r#"{"id":99999999999999999999,"version":1.10,"offset":-0}"#);
    }

    #[test]
    fn repeated_name_overwrites() {
        let json = params(&["a=1", "b=2", "a=3"]).to_json();
        assert_eq!(json, r#"{"a":3,"b":2}"#);
    }

    #[test]
    fn missing_separator_is_rejected() {
        let err = Params::parse(["ok=1", "oops"]).expect_err("invalid");
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(err.to_string().contains("'oops'"));

        assert!(Params::parse(["=value"]).is_err());
    }

    #[test]
    fn value_may_be_empty_or_contain_equals() {
        let params = params(&["a=", "b=x=y"]);
        let values: Vec<_> = params.encodable().map(Param::value).collect();
        assert_eq!(values, ["", "x=y"]);
    }

    #[test]
    fn query_string_encoding() {
        let query = params(&["q=rust lang", "sort=updated", "label=bug&fix", "x=a-b_c.d~e/f"])
            .to_query_string();
        insta::assert_snapshot!(query, @"q=rust%20lang&sort=updated&label=bug%26fix&x=a-b_c.d~e%2Ff");
    }

    #[test]
    fn query_string_encodes_utf8_bytes() {
        let query = params(&["name=café"]).to_query_string();
        assert_eq!(query, "name=caf%C3%A9");
    }

    #[test]
    fn reserved_names_are_excluded() {
        let params = params(&["per_page=100", "_follow_next=true", "state=open"]);
        assert_eq!(params.to_query_string(), "per_page=100&state=open");
        assert_eq!(params.to_json(), r#"{"per_page":100,"state":"open"}"#);
        assert_eq!(params.control("follow_next"), Some("true"));
        assert_eq!(params.control("missing"), None);
    }

    #[test]
    fn empty_params() {
        let params = params(&["_only=control"]);
        assert!(params.is_empty());
        assert_eq!(params.to_query_string(), "");
        assert_eq!(params.to_json(), "{}");
    }
}
