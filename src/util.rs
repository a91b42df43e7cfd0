use std::borrow::Cow;
use url::{Position, Url};

/// Splits a URL into the base string URI used for signing and its decoded
/// query pairs.
pub fn url_to_endpoint_and_queries(url: &Url) -> (&str, Vec<(Cow<'_, str>, Cow<'_, str>)>) {
    let endpoint = &url[..Position::AfterPath];
    let queries = url.query_pairs().collect();
    (endpoint, queries)
}

/// Renders one date as `YYYY-MM-DD`, the form the stats endpoint accepts.
pub fn format_day(time: &chrono::DateTime<chrono::Utc>) -> String {
    time.format("%Y-%m-%d").to_string()
}
