use serde_json::{json, Value};

use crate::commands::{AppContext, ENTITY_STATUS_ACTIVE};
use crate::error::Result;
use crate::parameters::{merge_fields, object};

pub async fn promoted_tweets_list(ctx: &AppContext, line_item_id: Option<&str>) -> Result<Value> {
    let mut params = merge_fields(ctx.account_params(), object(json!({ "with_deleted": false })));
    if let Some(line_item_id) = line_item_id {
        params.insert("line_item_ids".to_string(), Value::from(line_item_id));
    }
    ctx.client
        .get(&ctx.account_path("/promoted_tweets"), params)
        .await
}

/// Promotes an existing tweet under a line item, active immediately.
pub async fn promote_tweet(ctx: &AppContext, line_item_id: &str, tweet_id: &str) -> Result<Value> {
    let fields = object(json!({
        "line_item_id": line_item_id,
        "tweet_id": tweet_id,
        "entity_status": ENTITY_STATUS_ACTIVE,
    }));
    ctx.client
        .post(
            &ctx.account_path("/promoted_tweets"),
            merge_fields(ctx.account_params(), fields),
        )
        .await
}
