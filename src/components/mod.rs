// Export components
pub mod event;
pub mod event_listing;
pub mod event_times;
pub mod google_calendar;
pub mod sync;

// Re-export the pieces the binary wires together
pub use event_listing::HttpFetcher;
pub use google_calendar::GoogleCalendarClient;
pub use sync::{SyncDriver, SyncReport};
