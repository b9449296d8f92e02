//! Wire types for the signal feed API and storefront `products.json`
//! endpoints.
//!
//! ## Storefront shape
//!
//! Commerce storefronts built on the dominant hosted platforms expose a
//! public `products.json` with numeric product IDs, a `title`, and a list
//! of variants whose `price` is a **decimal string** (e.g., `"19.99"`),
//! never a JSON number. The first variant is the storefront-default one;
//! we take its price as the catalog price. Products occasionally ship with
//! an empty `variants` array (draft listings); those are skipped during
//! conversion rather than treated as errors.
//!
//! ## Signal feed shape
//!
//! The aggregation feed wraps records in `{"records": [...]}`. Record
//! fields vary by platform, which is why every field of
//! [`dropscout_core::RawRecord`] is optional; the wire type is the domain
//! type here and the normalizer decides what missing fields mean.

use serde::Deserialize;

use dropscout_core::RawRecord;

/// Top-level response from `GET /v1/signals/{source}`.
#[derive(Debug, Deserialize)]
pub struct FeedRecordsResponse {
    pub records: Vec<RawRecord>,
}

/// Top-level response from a storefront's `GET /products.json`.
#[derive(Debug, Deserialize)]
pub struct StoreProductsResponse {
    pub products: Vec<StoreProduct>,
}

/// A single product listing from a storefront catalog.
#[derive(Debug, Deserialize)]
pub struct StoreProduct {
    /// Platform-assigned numeric product ID; stable across scans.
    pub id: i64,

    /// Display name of the listing.
    pub title: String,

    /// Purchasable variants. May be empty for draft listings.
    #[serde(default)]
    pub variants: Vec<StoreVariant>,
}

/// One purchasable variant of a [`StoreProduct`].
#[derive(Debug, Deserialize)]
pub struct StoreVariant {
    /// Current price as a decimal string (e.g., `"19.99"`). Never null.
    pub price: String,

    /// 1-based position; `1` is the storefront-default variant. Modeled as
    /// optional for older platforms that omit it.
    #[serde(default)]
    pub position: Option<i32>,
}
