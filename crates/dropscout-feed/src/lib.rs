pub mod catalog;
pub mod error;
pub mod feed;
pub mod types;

mod retry;

pub use catalog::StorefrontClient;
pub use error::FeedError;
pub use feed::{FeedClient, SourceFeed};
pub use types::{FeedRecordsResponse, StoreProduct, StoreProductsResponse, StoreVariant};
