//! Everything that reads the seminar website: fetching pages, walking the
//! paginated index and pulling fields out of a single event page.

pub mod extract;
pub mod fetch;
pub mod links;
pub mod models;

pub use extract::{extract, extract_event, EventDocument};
pub use fetch::{DocumentFetcher, HttpFetcher};
pub use links::{discover_links, scan_index_page, IndexPage, PageNumbers};
pub use models::{RawEventFields, NOT_PROVIDED};
