use serde_json::{json, Value};

use crate::commands::AppContext;
use crate::error::Result;
use crate::parameters::{merge_fields, object};

pub async fn audience_create(
    ctx: &AppContext,
    name: &str,
    audience_type: &str,
    description: Option<&str>,
) -> Result<Value> {
    let mut fields = object(json!({
        "name": name,
        "audience_type": audience_type.to_uppercase(),
    }));
    if let Some(description) = description {
        fields.insert("description".to_string(), Value::from(description));
    }
    ctx.client
        .post(
            &ctx.account_path("/tailored_audiences"),
            merge_fields(ctx.account_params(), fields),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::*;
    use anyhow::Result;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn create_uppercases_type_and_keeps_description() -> Result<()> {
        let server = MockServer::start_async().await;
        let create = server.mock(|when, then| {
            when.method(POST)
                .path(account_url("/tailored_audiences"))
                .json_body(json!({
                    "account_id": ACCOUNT_ID,
                    "name": "Newsletter",
                    "audience_type": "EMAIL",
                    "description": "Subscribers as of March",
                }));
            then.status(200).json_body(json!({"data": {"id": "ta1"}}));
        });

        let ctx = context_with(&server);
        let value =
            audience_create(&ctx, "Newsletter", "email", Some("Subscribers as of March")).await?;
        create.assert();
        assert_eq!(value["data"]["id"], "ta1");
        Ok(())
    }

    #[tokio::test]
    async fn description_is_optional() -> Result<()> {
        let server = MockServer::start_async().await;
        let create = server.mock(|when, then| {
            when.method(POST)
                .path(account_url("/tailored_audiences"))
                .json_body(json!({
                    "account_id": ACCOUNT_ID,
                    "name": "Visitors",
                    "audience_type": "WEB",
                }));
            then.status(200).json_body(json!({"data": {"id": "ta2"}}));
        });

        let ctx = context_with(&server);
        audience_create(&ctx, "Visitors", "web", None).await?;
        create.assert();
        Ok(())
    }
}
