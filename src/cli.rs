//! Argument parsing and command dispatch.

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::ffi::OsString;
use std::io::Write;
use std::sync::Arc;

use crate::commands::campaigns::CampaignDraft;
use crate::commands::line_items::LineItemDraft;
use crate::commands::metrics::MetricsQuery;
use crate::commands::targeting::TargetingType;
use crate::commands::{self, micros_from_units, AppContext};
use crate::config::Config;
use crate::error::{Error, Result, EXIT_FAILURE};
use crate::output::{render_error, render_json};
use crate::parameters::ParameterMap;
use crate::v1::{Entropy, SystemEntropy};

#[derive(Debug, Parser)]
#[command(
    name = "twads",
    version,
    about = "Signed command-line client for the Twitter Ads API",
    long_about = "Signed command-line client for the Twitter Ads API.\n\n\
                  Credentials are read from TWITTER_API_KEY, TWITTER_API_SECRET, \
                  TWITTER_ACCESS_TOKEN, TWITTER_ACCESS_SECRET and TWITTER_ADS_ACCOUNT_ID."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the advertising account and its funding instruments
    AccountInfo,
    /// List campaigns with their last 30 days of metrics
    CampaignsList,
    /// Create a paused campaign
    CampaignCreate {
        name: String,
        objective: String,
        /// Total budget in currency units, e.g. 500 or 12.5
        #[arg(value_parser = parse_amount)]
        budget: i64,
        start_date: Option<String>,
        end_date: Option<String>,
    },
    /// Update campaign fields given as field:value
    CampaignUpdate {
        campaign_id: String,
        #[arg(required = true, value_parser = parse_field_update)]
        updates: Vec<(String, String)>,
    },
    /// Pause a campaign
    CampaignPause { campaign_id: String },
    /// Activate a campaign
    CampaignEnable { campaign_id: String },
    /// List a campaign's line items with their last 30 days of metrics
    LineItemsList { campaign_id: String },
    /// Create a paused promoted-tweets line item
    LineItemCreate {
        campaign_id: String,
        name: String,
        /// Bid in currency units
        #[arg(value_parser = parse_amount)]
        bid_amount: i64,
        placement: String,
        /// JSON object merged into the line item, e.g. '{"bid_type":"AUTO"}'
        #[arg(value_parser = parse_targeting)]
        targeting_json: Option<ParameterMap>,
    },
    /// List promoted tweets, optionally for one line item
    PromotedTweetsList { line_item_id: Option<String> },
    /// Promote a tweet under a line item
    PromoteTweet { line_item_id: String, tweet_id: String },
    /// Show targeting criteria of one type
    TargetingOptions {
        #[arg(value_enum, ignore_case = true)]
        kind: TargetingType,
    },
    /// Create a tailored audience
    AudienceCreate {
        name: String,
        audience_type: String,
        description: Option<String>,
    },
    /// Daily metrics for comma-separated entity ids
    Metrics {
        entity_type: String,
        entity_ids: String,
        start_date: String,
        end_date: String,
    },
    /// Set a campaign's total budget
    BudgetUpdate {
        campaign_id: String,
        /// New total budget in currency units
        #[arg(value_parser = parse_amount)]
        new_budget: i64,
    },
    /// Summarize campaign performance over a date range
    Report { start_date: String, end_date: String },
    /// Show funding instruments and billing access
    Funding,
}

fn parse_amount(input: &str) -> std::result::Result<i64, String> {
    micros_from_units(input).map_err(|err| err.to_string())
}

fn parse_field_update(input: &str) -> std::result::Result<(String, String), String> {
    match input.split_once(':') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected field:value, got '{}'", input)),
    }
}

fn parse_targeting(input: &str) -> std::result::Result<ParameterMap, String> {
    match serde_json::from_str::<Value>(input) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err("targeting must be a JSON object".to_string()),
        Err(err) => Err(format!("targeting is not valid JSON: {}", err)),
    }
}

/// Parses arguments and configuration from the process, runs the command
/// and returns the exit code.
pub async fn run() -> i32 {
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    run_with(
        std::env::args_os(),
        |name| std::env::var(name).ok(),
        &mut stdout,
        &mut stderr,
    )
    .await
}

/// Like [`run`], with arguments, environment lookup and output streams
/// supplied by the caller.
pub async fn run_with<I, T, F>(
    args: I,
    lookup: F,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: Fn(&str) -> Option<String>,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return match write!(out, "{}", e.render()) {
                Ok(()) => 0,
                Err(_) => EXIT_FAILURE,
            };
        }
        Err(e) => {
            let message = e.render().to_string();
            return fail(err, &Error::usage(message.trim_end()));
        }
    };

    let outcome = match Config::from_lookup(lookup) {
        Ok(config) => execute(cli.command, &config, Arc::new(SystemEntropy)).await,
        Err(e) => Err(e),
    };
    match outcome {
        Ok(value) => match render_json(out, &value) {
            Ok(()) => 0,
            Err(e) => {
                tracing::error!(error = %e, "failed to write result");
                EXIT_FAILURE
            }
        },
        Err(e) => fail(err, &e),
    }
}

fn fail(err: &mut dyn Write, error: &Error) -> i32 {
    tracing::debug!(error = %error, "command failed");
    if let Err(e) = render_error(err, &error.to_string()) {
        tracing::error!(error = %e, "failed to write error");
    }
    EXIT_FAILURE
}

/// Runs one parsed command against the API.
pub async fn execute(
    command: Command,
    config: &Config,
    entropy: Arc<dyn Entropy>,
) -> Result<Value> {
    let ctx = AppContext::new(config, entropy)?;
    match command {
        Command::AccountInfo => commands::account::account_info(&ctx).await,
        Command::CampaignsList => commands::campaigns::campaigns_list(&ctx).await,
        Command::CampaignCreate {
            name,
            objective,
            budget,
            start_date,
            end_date,
        } => {
            let draft = CampaignDraft {
                name,
                objective,
                budget_micros: budget,
                start_time: start_date,
                end_time: end_date,
            };
            commands::campaigns::campaign_create(&ctx, draft).await
        }
        Command::CampaignUpdate {
            campaign_id,
            updates,
        } => {
            let updates = updates
                .into_iter()
                .map(|(field, value)| (field, Value::String(value)))
                .collect::<ParameterMap>();
            commands::campaigns::campaign_update(&ctx, &campaign_id, updates).await
        }
        Command::CampaignPause { campaign_id } => {
            commands::campaigns::campaign_pause(&ctx, &campaign_id).await
        }
        Command::CampaignEnable { campaign_id } => {
            commands::campaigns::campaign_enable(&ctx, &campaign_id).await
        }
        Command::LineItemsList { campaign_id } => {
            commands::line_items::line_items_list(&ctx, &campaign_id).await
        }
        Command::LineItemCreate {
            campaign_id,
            name,
            bid_amount,
            placement,
            targeting_json,
        } => {
            let draft = LineItemDraft {
                campaign_id,
                name,
                bid_micros: bid_amount,
                placement,
                targeting: targeting_json.unwrap_or_default(),
            };
            commands::line_items::line_item_create(&ctx, draft).await
        }
        Command::PromotedTweetsList { line_item_id } => {
            commands::promoted_tweets::promoted_tweets_list(&ctx, line_item_id.as_deref()).await
        }
        Command::PromoteTweet {
            line_item_id,
            tweet_id,
        } => commands::promoted_tweets::promote_tweet(&ctx, &line_item_id, &tweet_id).await,
        Command::TargetingOptions { kind } => {
            commands::targeting::targeting_options(&ctx, kind).await
        }
        Command::AudienceCreate {
            name,
            audience_type,
            description,
        } => {
            commands::audiences::audience_create(
                &ctx,
                &name,
                &audience_type,
                description.as_deref(),
            )
            .await
        }
        Command::Metrics {
            entity_type,
            entity_ids,
            start_date,
            end_date,
        } => {
            let query = MetricsQuery {
                entity_type,
                entity_ids,
                start_time: start_date,
                end_time: end_date,
            };
            commands::metrics::metrics(&ctx, &query).await
        }
        Command::BudgetUpdate {
            campaign_id,
            new_budget,
        } => commands::campaigns::budget_update(&ctx, &campaign_id, new_budget).await,
        Command::Report {
            start_date,
            end_date,
        } => commands::report::report(&ctx, &start_date, &end_date).await,
        Command::Funding => commands::account::funding(&ctx).await,
    }
}
