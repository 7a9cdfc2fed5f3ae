//! Flat product representation returned by the catalog client.
//!
//! These types are transient: they are built from catalog responses on every
//! call and never persisted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A catalog product normalized into a flat shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Catalog global id (e.g. `gid://shopify/Product/123`).
    pub id: String,
    /// Display title.
    pub title: String,
    /// Plain-text description, empty when the catalog has none.
    pub description: String,
    /// URL slug.
    pub handle: String,
    /// Merchant-defined product type.
    pub product_type: String,
    /// Vendor or brand.
    pub vendor: String,
    /// Lowest variant price, as the decimal string the catalog returned.
    pub price: String,
    /// ISO 4217 currency of `price`.
    pub currency: String,
    /// Primary image, i.e. the first entry of `images`.
    pub image_url: Option<String>,
    /// All fetched image URLs, in catalog order.
    pub images: Vec<String>,
    /// Purchasable variants, unique by id.
    pub variants: Vec<Variant>,
}

/// One purchasable option combination of a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Variant {
    /// Catalog global id of the variant.
    pub id: String,
    /// Display title (e.g. `"M / Blue"`).
    pub title: String,
    /// Whether the variant can currently be purchased.
    pub available: bool,
    /// Variant price as a decimal string.
    pub price: String,
    /// ISO 4217 currency of `price`.
    pub currency: String,
    /// Selected options keyed by option name (e.g. `{"Size": "M"}`).
    pub options: BTreeMap<String, String>,
}
