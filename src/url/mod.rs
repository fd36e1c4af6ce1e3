//! URL handling module for Listing-Harvester
//!
//! This module provides URL normalization (the canonical form the dedup set
//! keys on), glob-based link filtering, and the detail-page classifier.

mod classify;
mod matcher;
mod normalize;

pub use classify::is_detail_page;
pub use matcher::GlobSet;
pub use normalize::normalize_url;
