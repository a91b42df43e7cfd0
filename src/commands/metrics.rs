use chrono::Duration;
use serde_json::{json, Value};
use tracing::warn;

use crate::commands::{unavailable, AppContext};
use crate::error::Result;
use crate::parameters::object;
use crate::util::format_day;

const METRICS_UNAVAILABLE: &str = "Unable to retrieve metrics";

/// Days of history attached to list results.
const RECENT_WINDOW_DAYS: i64 = 30;

pub const ENTITY_CAMPAIGN: &str = "CAMPAIGN";
pub const ENTITY_LINE_ITEM: &str = "LINE_ITEM";

#[derive(Clone, Debug)]
pub struct MetricsQuery {
    pub entity_type: String,
    pub entity_ids: String,
    pub start_time: String,
    pub end_time: String,
}

/// Daily engagement, billing and video metrics for the given entities.
pub async fn metrics(ctx: &AppContext, query: &MetricsQuery) -> Result<Value> {
    let params = object(json!({
        "entity": query.entity_type.to_uppercase(),
        "entity_ids": query.entity_ids,
        "start_time": query.start_time,
        "end_time": query.end_time,
        "granularity": "DAY",
        "metric_groups": "ENGAGEMENT,BILLING,VIDEO",
        "placement": "ALL_ON_TWITTER",
    }));
    ctx.client.get(&ctx.stats_path(), params).await
}

/// Attaches last-30-day totals as `metrics` to every entry of `listing.data`.
/// A failed lookup leaves an error placeholder on that entry only.
pub(crate) async fn attach_recent_metrics(ctx: &AppContext, listing: &mut Value, entity: &str) {
    let Some(items) = listing.get_mut("data").and_then(Value::as_array_mut) else {
        return;
    };
    let now = ctx.client.entropy().now();
    let start_time = format_day(&(now - Duration::days(RECENT_WINDOW_DAYS)));
    let end_time = format_day(&now);

    for item in items.iter_mut() {
        let id = item.get("id").cloned().unwrap_or(Value::Null);
        let params = object(json!({
            "entity": entity,
            "entity_ids": id,
            "start_time": start_time,
            "end_time": end_time,
            "granularity": "TOTAL",
            "metric_groups": "ENGAGEMENT,BILLING",
        }));
        let metrics = match ctx.client.get(&ctx.stats_path(), params).await {
            Ok(response) => first_metrics(&response),
            Err(err) => {
                warn!(error = %err, entity, id = %id, "metrics lookup failed");
                unavailable(METRICS_UNAVAILABLE)
            }
        };
        if let Some(fields) = item.as_object_mut() {
            fields.insert("metrics".to_string(), metrics);
        }
    }
}

/// `data[0].id_data[0].metrics`, or an empty object when absent.
fn first_metrics(response: &Value) -> Value {
    match response.pointer("/data/0/id_data/0/metrics") {
        Some(metrics) if !metrics.is_null() => metrics.clone(),
        _ => json!({}),
    }
}
