//! Random selection of catalog identifiers.

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::info;

use crate::error::{Error, Result};
use crate::http::HttpClient;

/// Catalog item identifier, assigned by the service.
pub type ItemId = i64;

/// Fetch every identifier at `url` and return a random subset sized by
/// `percentage` (see [`sample_size`]).
///
/// Issues exactly one GET; nothing is cached, so repeated calls may pick
/// different subsets.
pub async fn get_ids<R: Rng + ?Sized>(
    client: &HttpClient,
    url: &str,
    percentage: f64,
    rng: &mut R,
) -> Result<Vec<ItemId>> {
    let response = client.get(url).await?;
    if !response.is_success() {
        return Err(Error::Fetch {
            url: url.to_string(),
            status: response.status,
        });
    }

    let ids = extract_ids(&response.json()?)?;
    if ids.is_empty() {
        return Err(Error::EmptyCollection {
            url: url.to_string(),
        });
    }

    let selected = sample_ids(&ids, percentage, rng);
    info!(
        url,
        total = ids.len(),
        selected = selected.len(),
        percentage,
        "sampled catalog identifiers"
    );
    Ok(selected)
}

/// Pull the integer `id` out of each item of a JSON array.
pub fn extract_ids(body: &serde_json::Value) -> Result<Vec<ItemId>> {
    let items = body
        .as_array()
        .ok_or_else(|| Error::InvalidBody("collection is not a JSON array".into()))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.get("id").and_then(serde_json::Value::as_i64).ok_or_else(|| {
                Error::InvalidBody(format!("item {index} has no integer `id`: {item}"))
            })
        })
        .collect()
}

/// `max(1, floor(total * percentage / 100))`, capped at `total`.
///
/// Non-finite or non-positive percentages select a single item.
pub fn sample_size(total: usize, percentage: f64) -> usize {
    if total == 0 {
        return 0;
    }
    let raw = total as f64 * (percentage / 100.0);
    let floored = if raw.is_finite() && raw > 0.0 {
        raw.floor() as usize
    } else {
        0
    };
    floored.clamp(1, total)
}

/// Choose [`sample_size`] identifiers uniformly at random, without replacement.
pub fn sample_ids<R: Rng + ?Sized>(ids: &[ItemId], percentage: f64, rng: &mut R) -> Vec<ItemId> {
    let count = sample_size(ids.len(), percentage);
    ids.choose_multiple(rng, count).copied().collect()
}
