//! Client-side list views: remote fetching combined with local filter/sort

pub mod fetcher;
pub mod view;

pub use fetcher::{CollectionFetcher, LoadRequest};
pub use view::{ListPresentation, ListView, LoadState};
