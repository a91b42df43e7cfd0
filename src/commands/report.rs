use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use crate::commands::campaigns::fetch_campaigns;
use crate::commands::metrics::{metrics, MetricsQuery, ENTITY_CAMPAIGN};
use crate::commands::{id_string, AppContext};
use crate::error::Result;

const DETAILED_METRICS_UNAVAILABLE: &str = "Unable to retrieve detailed metrics";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CampaignSummary {
    #[serde(skip_serializing_if = "Value::is_null")]
    pub id: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub name: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub status: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub objective: Value,
    pub impressions: i64,
    pub engagements: i64,
    pub spend: f64,
    pub cpe: f64,
}

/// Account-wide performance over a date range.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub date_range: DateRange,
    pub account_id: String,
    pub total_impressions: i64,
    pub total_engagements: i64,
    pub total_spend: f64,
    pub average_cpe: f64,
    pub campaigns: Vec<CampaignSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_error: Option<String>,
}

impl Report {
    pub fn new(start: &str, end: &str, account_id: &str) -> Self {
        Report {
            date_range: DateRange {
                start: start.to_string(),
                end: end.to_string(),
            },
            account_id: account_id.to_string(),
            total_impressions: 0,
            total_engagements: 0,
            total_spend: 0.0,
            average_cpe: 0.0,
            campaigns: Vec::new(),
            metrics_error: None,
        }
    }

    /// Adds one summary per campaign, joined with `metrics_result` by id.
    pub fn add_campaigns(&mut self, campaigns: &[Value], metrics_result: &Value) {
        let by_id = metrics_by_id(metrics_result);
        for campaign in campaigns {
            let metrics = campaign
                .get("id")
                .and_then(id_string)
                .and_then(|id| by_id.get(&id).copied());
            let summary = summarize(campaign, metrics);
            self.total_impressions = self.total_impressions.saturating_add(summary.impressions);
            self.total_engagements = self.total_engagements.saturating_add(summary.engagements);
            self.total_spend += summary.spend;
            self.campaigns.push(summary);
        }
        self.average_cpe = cost_per_engagement(self.total_spend, self.total_engagements);
    }
}

pub async fn report(ctx: &AppContext, start: &str, end: &str) -> Result<Value> {
    let listing = fetch_campaigns(ctx).await?;
    let campaigns = listing
        .get("data")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut summary = Report::new(start, end, &ctx.account_id);
    if !campaigns.is_empty() {
        let query = MetricsQuery {
            entity_type: ENTITY_CAMPAIGN.to_string(),
            entity_ids: campaigns
                .iter()
                .filter_map(|c| c.get("id").and_then(id_string))
                .collect::<Vec<String>>()
                .join(","),
            start_time: start.to_string(),
            end_time: end.to_string(),
        };
        match metrics(ctx, &query).await {
            Ok(result) => summary.add_campaigns(&campaigns, &result),
            Err(err) => {
                warn!(error = %err, "report metrics lookup failed");
                summary.metrics_error = Some(DETAILED_METRICS_UNAVAILABLE.to_string());
            }
        }
    }
    Ok(serde_json::to_value(summary)?)
}

fn metrics_by_id(result: &Value) -> HashMap<String, &Value> {
    let mut by_id = HashMap::new();
    let entries = result.get("data").and_then(Value::as_array);
    for entry in entries.into_iter().flatten() {
        let id_data = entry.get("id_data").and_then(Value::as_array);
        for data in id_data.into_iter().flatten() {
            let id = data.get("id").and_then(id_string);
            if let (Some(id), Some(metrics)) = (id, data.get("metrics")) {
                by_id.insert(id, metrics);
            }
        }
    }
    by_id
}

fn summarize(campaign: &Value, metrics: Option<&Value>) -> CampaignSummary {
    let field = |name: &str| campaign.get(name).cloned().unwrap_or(Value::Null);
    let metric = |name: &str| metric_total(metrics.and_then(|m| m.get(name)));

    let impressions = metric("impressions").round() as i64;
    let engagements = metric("engagements").round() as i64;
    let spend = metric("billed_charge_local_micro") / 1_000_000.0;
    CampaignSummary {
        id: field("id"),
        name: field("name"),
        status: field("entity_status"),
        objective: field("objective"),
        impressions,
        engagements,
        spend,
        cpe: cost_per_engagement(spend, engagements),
    }
}

/// Sums a metric that may be a number, a numeric string, a per-day series or
/// null.
fn metric_total(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        Some(Value::Array(series)) => series.iter().map(|v| metric_total(Some(v))).sum(),
        _ => 0.0,
    }
}

fn cost_per_engagement(spend: f64, engagements: i64) -> f64 {
    if engagements > 0 {
        spend / engagements as f64
    } else {
        0.0
    }
}
