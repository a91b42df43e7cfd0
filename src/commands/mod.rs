//! One handler per subcommand, each shaping parameters for the signed client
//! and reshaping what comes back.

use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::Config;
use crate::encoder_oauth1::percent_encode_str;
use crate::error::{Error, Result};
use crate::parameters::{object, ParameterMap};
use crate::v1::{Entropy, OAuthV1Client};

pub mod account;
pub mod audiences;
pub mod campaigns;
pub mod line_items;
pub mod metrics;
pub mod promoted_tweets;
pub mod report;
pub mod targeting;

pub const ENTITY_STATUS_ACTIVE: &str = "ACTIVE";
pub const ENTITY_STATUS_PAUSED: &str = "PAUSED";

const MICROS_PER_UNIT: i64 = 1_000_000;

/// The signed client plus the advertising account every command acts on.
#[derive(Clone)]
pub struct AppContext {
    pub client: OAuthV1Client,
    pub account_id: String,
}

impl AppContext {
    pub fn new(config: &Config, entropy: Arc<dyn Entropy>) -> Result<Self> {
        let client = OAuthV1Client::new(config.api.clone(), config.credentials.clone(), entropy)?;
        Ok(AppContext {
            client,
            account_id: config.account_id.clone(),
        })
    }

    /// `/accounts/{account_id}` followed by `suffix`.
    pub(crate) fn account_path(&self, suffix: &str) -> String {
        format!("/accounts/{}{}", path_segment(&self.account_id), suffix)
    }

    pub(crate) fn stats_path(&self) -> String {
        format!("/stats/accounts/{}", path_segment(&self.account_id))
    }

    /// Parameters every account-scoped call starts from.
    pub(crate) fn account_params(&self) -> ParameterMap {
        object(json!({ "account_id": self.account_id }))
    }
}

pub(crate) fn path_segment(id: &str) -> String {
    percent_encode_str(id)
}

/// Placeholder for a secondary lookup that failed.
pub(crate) fn unavailable(message: &str) -> Value {
    json!({ "error": message })
}

/// Converts a decimal amount in whole currency units (`"500"`, `"12.5"`) to
/// micro-units.
pub fn micros_from_units(input: &str) -> Result<i64> {
    let invalid = || {
        Error::usage(format!(
            "Invalid amount '{}': expected a non-negative number with at most six decimal places",
            input
        ))
    };
    let trimmed = input.trim();
    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty())
        || !all_digits(whole)
        || !all_digits(fraction)
        || fraction.len() > 6
    {
        return Err(invalid());
    }

    let whole = if whole.is_empty() {
        0
    } else {
        whole.parse::<i64>().map_err(|_| invalid())?
    };
    let fraction = if fraction.is_empty() {
        0
    } else {
        format!("{:0<6}", fraction).parse::<i64>().map_err(|_| invalid())?
    };
    whole
        .checked_mul(MICROS_PER_UNIT)
        .and_then(|micros| micros.checked_add(fraction))
        .ok_or_else(invalid)
}

/// Renders an entity id, string or numeric, as the API expects it in lists.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_units_become_micros() {
        assert_eq!(micros_from_units("500").unwrap(), 500_000_000);
        assert_eq!(micros_from_units(" 0 ").unwrap(), 0);
    }

    #[test]
    fn fractional_units_become_micros() {
        assert_eq!(micros_from_units("12.5").unwrap(), 12_500_000);
        assert_eq!(micros_from_units("0.000001").unwrap(), 1);
        assert_eq!(micros_from_units(".25").unwrap(), 250_000);
        assert_eq!(micros_from_units("3.").unwrap(), 3_000_000);
    }

    #[test]
    fn malformed_amounts_are_usage_errors() {
        for input in ["", ".", "-5", "abc", "5e3", "1.0000001", "1.2.3", "99999999999999999999"] {
            assert!(
                matches!(micros_from_units(input), Err(Error::Usage(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn overflowing_amount_is_rejected() {
        assert!(micros_from_units("9223372036854").is_ok());
        assert!(micros_from_units("9223372036855").is_err());
    }

    #[test]
    fn ids_render_from_strings_and_numbers() {
        assert_eq!(id_string(&json!("c1")), Some("c1".to_string()));
        assert_eq!(id_string(&json!(42)), Some("42".to_string()));
        assert_eq!(id_string(&json!(null)), None);
    }
}
