//! Flattening of raw Storefront product nodes into [`Product`].
//!
//! The catalog nests images and variants inside Relay-style
//! `edges { node { .. } }` connections and puts prices inside a price range.
//! [`normalize_product`] turns one raw node into the flat shape callers use:
//!
//! - missing or null `description`, `handle`, `productType`, `vendor` become `""`
//! - `price` / `currency` come from `priceRange.minVariantPrice`
//! - images become an ordered URL list; the first one is also `image_url`
//! - each variant's `selectedOptions` becomes a name → value map, where a
//!   later duplicate name overwrites an earlier one
//! - variants repeating an already seen id are dropped

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::domain::{Product, Variant};

/// Relay connection wrapper (`{ edges: [{ node }] }`).
#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

impl<T> Connection<T> {
    pub(crate) fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|edge| edge.node)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    pub node: T,
}

/// A product node exactly as the Storefront API returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    id: String,
    title: String,
    description: Option<String>,
    handle: Option<String>,
    product_type: Option<String>,
    vendor: Option<String>,
    price_range: RawPriceRange,
    images: Option<Connection<RawImage>>,
    variants: Option<Connection<RawVariant>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPriceRange {
    min_variant_price: RawMoney,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMoney {
    amount: String,
    currency_code: String,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVariant {
    id: String,
    title: String,
    available_for_sale: bool,
    price: RawMoney,
    selected_options: Option<Vec<RawSelectedOption>>,
}

#[derive(Debug, Deserialize)]
struct RawSelectedOption {
    name: String,
    value: String,
}

/// Flattens a raw catalog node into a [`Product`].
#[must_use]
pub fn normalize_product(raw: RawProduct) -> Product {
    let images: Vec<String> = raw
        .images
        .into_iter()
        .flat_map(Connection::into_nodes)
        .map(|image| image.url)
        .collect();

    let mut seen = HashSet::new();
    let variants = raw
        .variants
        .into_iter()
        .flat_map(Connection::into_nodes)
        .filter(|variant| seen.insert(variant.id.clone()))
        .map(normalize_variant)
        .collect();

    let RawMoney {
        amount,
        currency_code,
    } = raw.price_range.min_variant_price;

    Product {
        id: raw.id,
        title: raw.title,
        description: raw.description.unwrap_or_default(),
        handle: raw.handle.unwrap_or_default(),
        product_type: raw.product_type.unwrap_or_default(),
        vendor: raw.vendor.unwrap_or_default(),
        price: amount,
        currency: currency_code,
        image_url: images.first().cloned(),
        images,
        variants,
    }
}

fn normalize_variant(raw: RawVariant) -> Variant {
    let options: BTreeMap<String, String> = raw
        .selected_options
        .unwrap_or_default()
        .into_iter()
        .map(|opt| (opt.name, opt.value))
        .collect();

    Variant {
        id: raw.id,
        title: raw.title,
        available: raw.available_for_sale,
        price: raw.price.amount,
        currency: raw.price.currency_code,
        options,
    }
}
