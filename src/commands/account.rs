use serde_json::{json, Value};
use tracing::warn;

use crate::commands::{unavailable, AppContext};
use crate::error::Result;
use crate::parameters::{object, ParameterMap};

const FUNDING_UNAVAILABLE: &str = "Unable to retrieve funding information";
const BILLING_UNAVAILABLE: &str = "Unable to retrieve billing information";

pub(crate) async fn funding_instruments(ctx: &AppContext) -> Result<Value> {
    ctx.client
        .get(&ctx.account_path("/funding_instruments"), ParameterMap::new())
        .await
}

/// Account details with its funding instruments attached under `funding`.
pub async fn account_info(ctx: &AppContext) -> Result<Value> {
    let account = ctx
        .client
        .get(&ctx.account_path(""), ParameterMap::new())
        .await?;

    let funding = match funding_instruments(ctx).await {
        Ok(funding) => funding,
        Err(err) => {
            warn!(error = %err, "funding lookup failed");
            unavailable(FUNDING_UNAVAILABLE)
        }
    };
    // a non-object reply is kept whole under `data`
    let mut fields = match account {
        Value::Object(fields) => fields,
        other => object(json!({ "data": other })),
    };
    fields.insert("funding".to_string(), funding);
    Ok(Value::Object(fields))
}

/// Funding instruments plus the caller's billing access, when readable.
pub async fn funding(ctx: &AppContext) -> Result<Value> {
    let funding_instruments = funding_instruments(ctx).await?;

    let billing_info = match ctx
        .client
        .get(
            &ctx.account_path("/authenticated_user_access"),
            ParameterMap::new(),
        )
        .await
    {
        Ok(billing) => billing,
        Err(err) => {
            warn!(error = %err, "billing lookup failed");
            unavailable(BILLING_UNAVAILABLE)
        }
    };

    Ok(json!({
        "funding_instruments": funding_instruments,
        "billing_info": billing_info,
    }))
}
