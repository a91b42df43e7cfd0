use serde_json::{json, Value};

use crate::commands::metrics::{attach_recent_metrics, ENTITY_LINE_ITEM};
use crate::commands::{AppContext, ENTITY_STATUS_PAUSED};
use crate::error::Result;
use crate::parameters::{merge_fields, object, ParameterMap};

const PRODUCT_TYPE_PROMOTED_TWEETS: &str = "PROMOTED_TWEETS";

#[derive(Clone, Debug)]
pub struct LineItemDraft {
    pub campaign_id: String,
    pub name: String,
    pub bid_micros: i64,
    pub placement: String,
    /// Targeting fields merged over the defaults.
    pub targeting: ParameterMap,
}

/// Line items of one campaign, each with its last-30-day metrics.
pub async fn line_items_list(ctx: &AppContext, campaign_id: &str) -> Result<Value> {
    let params = merge_fields(
        ctx.account_params(),
        object(json!({
            "campaign_ids": campaign_id,
            "with_deleted": false,
        })),
    );
    let mut line_items = ctx
        .client
        .get(&ctx.account_path("/line_items"), params)
        .await?;
    attach_recent_metrics(ctx, &mut line_items, ENTITY_LINE_ITEM).await;
    Ok(line_items)
}

/// Creates a paused promoted-tweets line item in a single placement.
pub async fn line_item_create(ctx: &AppContext, draft: LineItemDraft) -> Result<Value> {
    let fields = object(json!({
        "campaign_id": draft.campaign_id,
        "name": draft.name,
        "product_type": PRODUCT_TYPE_PROMOTED_TWEETS,
        "placements": [draft.placement.to_uppercase()],
        "bid_amount_local_micro": draft.bid_micros,
        "entity_status": ENTITY_STATUS_PAUSED,
    }));
    let body = merge_fields(merge_fields(ctx.account_params(), fields), draft.targeting);
    ctx.client
        .post(&ctx.account_path("/line_items"), body)
        .await
}
