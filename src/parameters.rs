use serde_json::{Map, Value};
use std::borrow::Cow;
use std::convert::TryFrom;
use std::fmt;

use crate::error::Error;

/// Flat key/value mapping describing the parameters of one request.
pub type ParameterMap = Map<String, Value>;

/// A primitive request parameter, the only kind that can be signed or
/// carried in a query string.
#[derive(Clone, Debug, PartialEq)]
pub enum Parameter<'a> {
    StringValue(Cow<'a, str>),
    IntValue(i64),
    UIntValue(u64),
    FloatValue(f64),
    BoolValue(bool),
}

impl<'a> From<&'a str> for Parameter<'a> {
    fn from(s: &'a str) -> Self {
        Parameter::StringValue(s.into())
    }
}

impl From<String> for Parameter<'_> {
    fn from(s: String) -> Self {
        Parameter::StringValue(s.into())
    }
}

impl From<i64> for Parameter<'_> {
    fn from(n: i64) -> Self {
        Parameter::IntValue(n)
    }
}

impl From<u64> for Parameter<'_> {
    fn from(n: u64) -> Self {
        Parameter::UIntValue(n)
    }
}

impl From<f64> for Parameter<'_> {
    fn from(n: f64) -> Self {
        Parameter::FloatValue(n)
    }
}

impl From<bool> for Parameter<'_> {
    fn from(b: bool) -> Self {
        Parameter::BoolValue(b)
    }
}

impl<'a> TryFrom<&'a Value> for Parameter<'a> {
    type Error = ();

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Parameter::StringValue(Cow::Borrowed(s))),
            Value::Bool(b) => Ok(Parameter::BoolValue(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Parameter::IntValue(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Parameter::UIntValue(u))
                } else {
                    n.as_f64().map(Parameter::FloatValue).ok_or(())
                }
            }
            Value::Null | Value::Array(_) | Value::Object(_) => Err(()),
        }
    }
}

impl fmt::Display for Parameter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::StringValue(s) => f.write_str(s),
            Parameter::IntValue(n) => write!(f, "{}", n),
            Parameter::UIntValue(n) => write!(f, "{}", n),
            Parameter::FloatValue(n) => write!(f, "{}", n),
            Parameter::BoolValue(b) => write!(f, "{}", b),
        }
    }
}

/// Converts every entry of `params` into a primitive parameter.
///
/// Fails on the first nested or null value, naming the offending key.
pub fn primitive_parameters(params: &ParameterMap) -> Result<Vec<(&str, Parameter<'_>)>, Error> {
    params
        .iter()
        .map(|(k, v)| {
            Parameter::try_from(v)
                .map(|p| (k.as_str(), p))
                .map_err(|_| Error::UnsignableParameter(k.clone()))
        })
        .collect()
}

/// Like [`primitive_parameters`], but skips entries that are not primitive.
pub fn signable_parameters(params: &ParameterMap) -> Vec<(&str, Parameter<'_>)> {
    params
        .iter()
        .filter_map(|(k, v)| Parameter::try_from(v).ok().map(|p| (k.as_str(), p)))
        .collect()
}

/// Unwraps a JSON object literal into a parameter map. Anything else yields
/// an empty map.
pub fn object(value: Value) -> ParameterMap {
    match value {
        Value::Object(map) => map,
        _ => ParameterMap::new(),
    }
}

/// Overlays `updates` onto `base`; keys present in both take the update.
pub fn merge_fields(mut base: ParameterMap, updates: ParameterMap) -> ParameterMap {
    for (k, v) in updates {
        base.insert(k, v);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primitives_render_like_query_values() {
        assert_eq!(Parameter::from(false).to_string(), "false");
        assert_eq!(Parameter::from(500_000_000_i64).to_string(), "500000000");
        assert_eq!(Parameter::from(1.5).to_string(), "1.5");
        assert_eq!(Parameter::from("CAMPAIGN").to_string(), "CAMPAIGN");
    }

    #[test]
    fn json_numbers_keep_integer_rendering() {
        let v = json!(42);
        assert_eq!(Parameter::try_from(&v), Ok(Parameter::IntValue(42)));
    }

    #[test]
    fn integers_beyond_i64_stay_exact() {
        let v = json!(u64::MAX);
        let param = Parameter::try_from(&v).unwrap();
        assert_eq!(param, Parameter::UIntValue(u64::MAX));
        assert_eq!(param.to_string(), "18446744073709551615");
    }

    #[test]
    fn nested_values_are_not_primitive() {
        let params = object(json!({"name": "x", "placements": ["ALL_ON_TWITTER"]}));
        match primitive_parameters(&params) {
            Err(Error::UnsignableParameter(key)) => assert_eq!(key, "placements"),
            other => panic!("unexpected result: {other:?}"),
        }
        let signable = signable_parameters(&params);
        assert_eq!(signable, vec![("name", Parameter::from("x"))]);
    }

    #[test]
    fn null_is_not_primitive() {
        let params = object(json!({"funding_instrument_id": null}));
        assert!(primitive_parameters(&params).is_err());
        assert!(signable_parameters(&params).is_empty());
    }

    #[test]
    fn merge_overwrites_only_named_fields() {
        let base = object(json!({"account_id": "abc", "entity_status": "ACTIVE"}));
        let merged = merge_fields(base, object(json!({"entity_status": "PAUSED", "name": "n"})));
        assert_eq!(
            Value::Object(merged),
            json!({"account_id": "abc", "entity_status": "PAUSED", "name": "n"})
        );
    }
}
