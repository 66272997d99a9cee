// Maps raw upstream payloads into canonical listings and gallery entries.
use crate::images::{resolve_image, ImageTable};
use crate::model::{Listing, ListingImage};
use chrono::Utc;
use serde_json::Value;
use tracing::warn;

const FALLBACK_NAME: &str = "Unnamed Listing";
const FALLBACK_IMAGE_TITLE: &str = "Untitled Listing";
const FALLBACK_DESCRIPTION: &str = "No description available";
const FALLBACK_ADDRESS: &str = "Address not provided";
const FALLBACK_HOUSEHOLD: &str = "No household information available";
const FALLBACK_PRICE: &str = "Price not provided";
const FALLBACK_HOUSE_RULES: &str = "No specific house rules";

/// Normalizes a raw upstream payload into the canonical listing sequence,
/// preserving upstream order. An invalid envelope degrades to an empty
/// sequence, never an error.
pub fn normalize_listings(payload: &Value, table: &ImageTable) -> Vec<Listing> {
    let Some(records) = envelope_records(payload) else {
        warn!("no listings found or payload incorrectly structured");
        return Vec::new();
    };

    records
        .iter()
        .map(|record| normalize_listing(record, table))
        .collect()
}

/// Image-extraction mode: same envelope gate as [`normalize_listings`], but
/// an unusable payload falls back to the full vetted table instead of an
/// empty sequence. Records that resolve to no URL at all are dropped.
pub fn normalize_images(payload: &Value, table: &ImageTable) -> Vec<ListingImage> {
    let Some(records) = envelope_records(payload) else {
        warn!("image payload unusable, serving the vetted table");
        return table.dump();
    };

    records
        .iter()
        .filter_map(|record| {
            let id = record_id(record);
            let url = resolve_with_table(record, id.as_deref(), table)?;
            Some(ListingImage {
                id: id.unwrap_or_else(synthesized_id),
                url,
                title: field_or(record, &["name", "externalListingName"], FALLBACK_IMAGE_TITLE),
            })
        })
        .collect()
}

fn normalize_listing(record: &Value, table: &ImageTable) -> Listing {
    let id = record_id(record);
    let image_url = resolve_with_table(record, id.as_deref(), table);

    Listing {
        id: id.unwrap_or_else(synthesized_id),
        name: field_or(record, &["name", "externalListingName"], FALLBACK_NAME),
        description: field_or(record, &["description"], FALLBACK_DESCRIPTION),
        address: field_or(record, &["address"], FALLBACK_ADDRESS),
        household: field_or(record, &["household"], FALLBACK_HOUSEHOLD),
        price: field_or(record, &["price", "listingPrice"], FALLBACK_PRICE),
        house_rules: field_or(record, &["houseRules"], FALLBACK_HOUSE_RULES),
        image_url,
    }
}

/// Success envelope: `status == "success"` carrying a non-empty `result`
/// array. Anything else is treated as unusable.
fn envelope_records(payload: &Value) -> Option<&[Value]> {
    if payload.get("status").and_then(Value::as_str) != Some("success") {
        return None;
    }
    match payload.get("result").and_then(Value::as_array) {
        Some(records) if !records.is_empty() => Some(records),
        _ => None,
    }
}

/// Record scan first, then the vetted table keyed by the record's id.
fn resolve_with_table(record: &Value, id: Option<&str>, table: &ImageTable) -> Option<String> {
    resolve_image(record)
        .filter(|url| !url.is_empty())
        .or_else(|| id.and_then(|id| table.lookup(id)).map(str::to_string))
}

fn record_id(record: &Value) -> Option<String> {
    scalar_string(record.get("id"))
}

/// Upstream ids and prices arrive as strings or bare numbers; either form is
/// kept as its string rendering. Empty strings count as absent.
fn scalar_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn field_or(record: &Value, keys: &[&str], fallback: &str) -> String {
    keys.iter()
        .find_map(|key| scalar_string(record.get(*key)))
        .unwrap_or_else(|| fallback.to_string())
}

/// Unique within one normalization pass, but NOT stable across reloads: a
/// record the upstream ships without an id gets a fresh value every fetch.
fn synthesized_id() -> String {
    Utc::now().timestamp_millis().to_string()
}
