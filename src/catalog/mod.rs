//! Product catalog: Shopify Storefront GraphQL client and response
//! normalization.
//!
//! [`CatalogClient`] issues the queries in [`queries`] and flattens every
//! returned product node with [`normalize::normalize_product`].

pub mod client;
pub mod normalize;
pub mod queries;

pub use client::{CatalogClient, DEFAULT_SEARCH_LIMIT};
pub use normalize::{RawProduct, normalize_product};
