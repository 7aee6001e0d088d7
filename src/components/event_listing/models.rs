/// Placeholder for optional fields the page does not provide
pub const NOT_PROVIDED: &str = "Not Provided";

/// Fields scraped from one event page, before any date parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEventFields {
    pub title: String,
    pub date_text: String,
    /// A range such as `2:00 - 3:00 PM`
    pub time_text: String,
    /// `Not Provided` when the page has no location
    pub location: String,
    /// `Not Provided` when the page has no description
    pub description: String,
    /// `Not Provided` when the page has no contact
    pub host: String,
    /// Short month-day-year, e.g. `Apr 20, 2024`
    pub created_text: String,
    pub modified_text: String,
    /// The page this record came from
    pub source_url: String,
}
