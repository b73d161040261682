//! Retrieval of recent ad creatives from an ad-library API.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

mod rate_limit;

pub use client::AdLibraryClient;
pub use error::ScraperError;
pub use normalize::normalize_ad;
pub use types::{AdArchivePage, ArchivedAd, Paging};
