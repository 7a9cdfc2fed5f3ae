//! GraphQL documents sent to the Storefront API.
//!
//! Search fetches one image and ten variants per product; the detail query
//! fetches five images and twenty variants.

/// Relevance-sorted keyword search. Variables: `query: String!`, `first: Int!`.
pub const SEARCH_PRODUCTS: &str = r"
query SearchProducts($query: String!, $first: Int!) {
    products(query: $query, first: $first, sortKey: RELEVANCE) {
        edges {
            node {
                id
                title
                description
                handle
                productType
                vendor
                priceRange {
                    minVariantPrice { amount currencyCode }
                    maxVariantPrice { amount currencyCode }
                }
                images(first: 1) {
                    edges { node { url altText } }
                }
                variants(first: 10) {
                    edges {
                        node {
                            id
                            title
                            availableForSale
                            price { amount currencyCode }
                            selectedOptions { name value }
                        }
                    }
                }
            }
        }
    }
}
";

/// Single product by global id. Variables: `id: ID!`.
pub const GET_PRODUCT: &str = r"
query GetProduct($id: ID!) {
    product(id: $id) {
        id
        title
        description
        handle
        productType
        vendor
        priceRange {
            minVariantPrice { amount currencyCode }
            maxVariantPrice { amount currencyCode }
        }
        images(first: 5) {
            edges { node { url altText } }
        }
        variants(first: 20) {
            edges {
                node {
                    id
                    title
                    availableForSale
                    price { amount currencyCode }
                    selectedOptions { name value }
                }
            }
        }
    }
}
";
