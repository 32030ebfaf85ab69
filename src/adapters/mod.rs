// Adapters layer: concrete implementations of the domain ports against the shop API.

pub mod http;

pub use http::{build_client, HttpCartService, HttpRecommendationSource};
