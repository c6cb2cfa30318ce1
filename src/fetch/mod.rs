//! Page fetching
//!
//! A [`PageFetcher`] performs one round trip for one page and returns the
//! decoded items together with the request for the next page. It keeps no
//! state between calls; the paginated stream calls it once per page.

mod fetcher;

pub use fetcher::{HttpPageFetcher, PageFetcher};
