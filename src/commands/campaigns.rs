use chrono::SecondsFormat;
use serde_json::{json, Value};
use tracing::warn;

use crate::commands::account::funding_instruments;
use crate::commands::metrics::{attach_recent_metrics, ENTITY_CAMPAIGN};
use crate::commands::{path_segment, AppContext, ENTITY_STATUS_ACTIVE, ENTITY_STATUS_PAUSED};
use crate::error::Result;
use crate::parameters::{merge_fields, object, ParameterMap};

/// Fields of a new campaign as given on the command line.
#[derive(Clone, Debug)]
pub struct CampaignDraft {
    pub name: String,
    pub objective: String,
    pub budget_micros: i64,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

pub(crate) fn list_params(ctx: &AppContext) -> ParameterMap {
    merge_fields(ctx.account_params(), object(json!({ "with_deleted": false })))
}

pub(crate) async fn fetch_campaigns(ctx: &AppContext) -> Result<Value> {
    ctx.client
        .get(&ctx.account_path("/campaigns"), list_params(ctx))
        .await
}

/// Non-deleted campaigns, each with its last-30-day metrics.
pub async fn campaigns_list(ctx: &AppContext) -> Result<Value> {
    let mut campaigns = fetch_campaigns(ctx).await?;
    attach_recent_metrics(ctx, &mut campaigns, ENTITY_CAMPAIGN).await;
    Ok(campaigns)
}

/// Creates a paused campaign on the account's first funding instrument.
pub async fn campaign_create(ctx: &AppContext, draft: CampaignDraft) -> Result<Value> {
    let start_time = draft.start_time.unwrap_or_else(|| {
        ctx.client
            .entropy()
            .now()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    });

    // a missing funding instrument is left for the API to report
    let funding_instrument_id = match funding_instruments(ctx).await {
        Ok(funding) => funding
            .pointer("/data/0/id")
            .cloned()
            .unwrap_or(Value::Null),
        Err(err) => {
            warn!(error = %err, "funding lookup failed; creating campaign without instrument");
            Value::Null
        }
    };

    let mut fields = object(json!({
        "name": draft.name,
        "funding_instrument_id": funding_instrument_id,
        "entity_status": ENTITY_STATUS_PAUSED,
        "objective": draft.objective.to_uppercase(),
        "start_time": start_time,
        "total_budget_amount_local_micro": draft.budget_micros,
    }));
    if let Some(end_time) = draft.end_time {
        fields.insert("end_time".to_string(), Value::String(end_time));
    }

    ctx.client
        .post(
            &ctx.account_path("/campaigns"),
            merge_fields(ctx.account_params(), fields),
        )
        .await
}

/// Sends `updates` over the account id; only the named fields change.
pub async fn campaign_update(
    ctx: &AppContext,
    campaign_id: &str,
    updates: ParameterMap,
) -> Result<Value> {
    let path = ctx.account_path(&format!("/campaigns/{}", path_segment(campaign_id)));
    ctx.client
        .put(&path, merge_fields(ctx.account_params(), updates))
        .await
}

fn entity_status(status: &str) -> ParameterMap {
    object(json!({ "entity_status": status }))
}

pub async fn campaign_pause(ctx: &AppContext, campaign_id: &str) -> Result<Value> {
    campaign_update(ctx, campaign_id, entity_status(ENTITY_STATUS_PAUSED)).await
}

pub async fn campaign_enable(ctx: &AppContext, campaign_id: &str) -> Result<Value> {
    campaign_update(ctx, campaign_id, entity_status(ENTITY_STATUS_ACTIVE)).await
}

pub async fn budget_update(
    ctx: &AppContext,
    campaign_id: &str,
    budget_micros: i64,
) -> Result<Value> {
    let updates = object(json!({ "total_budget_amount_local_micro": budget_micros }));
    campaign_update(ctx, campaign_id, updates).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::micros_from_units;
    use crate::commands::test_support::*;
    use anyhow::Result;
    use httpmock::prelude::*;

    fn draft(budget: &str) -> CampaignDraft {
        CampaignDraft {
            name: "Spring launch".into(),
            objective: "website_clicks".into(),
            budget_micros: micros_from_units(budget).unwrap(),
            start_time: None,
            end_time: None,
        }
    }

    #[tokio::test]
    async fn create_converts_budget_and_uses_first_instrument() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path(account_url("/funding_instruments"));
            then.status(200)
                .json_body(json!({"data": [{"id": "fi1"}, {"id": "fi2"}]}));
        });
        let create = server.mock(|when, then| {
            when.method(POST)
                .path(account_url("/campaigns"))
                .json_body(json!({
                    "account_id": ACCOUNT_ID,
                    "name": "Spring launch",
                    "funding_instrument_id": "fi1",
                    "entity_status": "PAUSED",
                    "objective": "WEBSITE_CLICKS",
                    "start_time": "2024-03-15T12:00:00.000Z",
                    "total_budget_amount_local_micro": 500_000_000_i64,
                }));
            then.status(200).json_body(json!({"data": {"id": "c9"}}));
        });

        let ctx = context_with(&server);
        let value = campaign_create(&ctx, draft("500")).await?;
        create.assert();
        assert_eq!(value["data"]["id"], "c9");
        Ok(())
    }

    #[tokio::test]
    async fn create_without_funding_sends_null_instrument() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path(account_url("/funding_instruments"));
            then.status(500);
        });
        let create = server.mock(|when, then| {
            when.method(POST)
                .path(account_url("/campaigns"))
                .json_body(json!({
                    "account_id": ACCOUNT_ID,
                    "name": "Spring launch",
                    "funding_instrument_id": null,
                    "entity_status": "PAUSED",
                    "objective": "AWARENESS",
                    "start_time": "2024-04-01",
                    "end_time": "2024-04-30",
                    "total_budget_amount_local_micro": 12_500_000,
                }));
            then.status(200).json_body(json!({"data": {"id": "c10"}}));
        });

        let ctx = context_with(&server);
        let mut draft = draft("12.5");
        draft.objective = "awareness".into();
        draft.start_time = Some("2024-04-01".into());
        draft.end_time = Some("2024-04-30".into());
        campaign_create(&ctx, draft).await?;
        create.assert();
        Ok(())
    }

    #[tokio::test]
    async fn pause_and_enable_only_touch_entity_status() -> Result<()> {
        for (status, expected) in [("pause", "PAUSED"), ("enable", "ACTIVE")] {
            let server = MockServer::start_async().await;
            let update = server.mock(|when, then| {
                when.method(PUT)
                    .path(account_url("/campaigns/c1"))
                    .json_body(json!({"account_id": ACCOUNT_ID, "entity_status": expected}));
                then.status(200).json_body(json!({"data": {"id": "c1"}}));
            });

            let ctx = context_with(&server);
            if status == "pause" {
                campaign_pause(&ctx, "c1").await?;
            } else {
                campaign_enable(&ctx, "c1").await?;
            }
            update.assert();
        }
        Ok(())
    }

    #[tokio::test]
    async fn update_merges_fields_over_account_id() -> Result<()> {
        let server = MockServer::start_async().await;
        let update = server.mock(|when, then| {
            when.method(PUT)
                .path(account_url("/campaigns/c1"))
                .json_body(json!({
                    "account_id": ACCOUNT_ID,
                    "name": "Renamed",
                    "end_time": "2024-05-01T00:00:00Z",
                }));
            then.status(200).json_body(json!({"data": {"id": "c1"}}));
        });

        let ctx = context_with(&server);
        let updates = object(json!({"name": "Renamed", "end_time": "2024-05-01T00:00:00Z"}));
        campaign_update(&ctx, "c1", updates).await?;
        update.assert();
        Ok(())
    }

    #[tokio::test]
    async fn budget_update_sends_only_budget() -> Result<()> {
        let server = MockServer::start_async().await;
        let update = server.mock(|when, then| {
            when.method(PUT)
                .path(account_url("/campaigns/c1"))
                .json_body(json!({
                    "account_id": ACCOUNT_ID,
                    "total_budget_amount_local_micro": 750_000_000_i64,
                }));
            then.status(200).json_body(json!({"data": {"id": "c1"}}));
        });

        let ctx = context_with(&server);
        budget_update(&ctx, "c1", micros_from_units("750")?).await?;
        update.assert();
        Ok(())
    }

    #[tokio::test]
    async fn list_attaches_metrics_per_campaign() -> Result<()> {
        let server = MockServer::start_async().await;
        let list = server.mock(|when, then| {
            when.method(GET)
                .path(account_url("/campaigns"))
                .query_param("account_id", ACCOUNT_ID)
                .query_param("with_deleted", "false");
            then.status(200)
                .json_body(json!({"data": [{"id": "c1", "name": "One"}]}));
        });
        let stats = server.mock(|when, then| {
            when.method(GET)
                .path(stats_url())
                .query_param("entity", "CAMPAIGN")
                .query_param("entity_ids", "c1");
            then.status(200).json_body(json!({
                "data": [{"id_data": [{"metrics": {"engagements": [7]}}]}]
            }));
        });

        let ctx = context_with(&server);
        let value = campaigns_list(&ctx).await?;
        list.assert();
        stats.assert();
        assert_eq!(value["data"][0]["name"], "One");
        assert_eq!(value["data"][0]["metrics"]["engagements"][0], 7);
        Ok(())
    }
}
