use super::models::{RawEventFields, NOT_PROVIDED};
use crate::error::{extraction_error, other_error, AppResult};
use crate::utils::text::collapse_whitespace;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Wrapper around the event content on a page
const EVENT_ARTICLE: &str = "article.post-type-event";
/// Definition list whose following block holds the description
const DETAILS_BLOCK: &str = "div._details.u-definition-list--table";

/// A parsed event page
pub struct EventDocument {
    html: Html,
}

impl EventDocument {
    /// Parse an HTML page. Parsing never fails; broken markup is repaired.
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// The event article. Site chrome outside it is never read.
    fn scope(&self) -> AppResult<ElementRef<'_>> {
        let article = selector(EVENT_ARTICLE)?;
        self.html
            .select(&article)
            .next()
            .ok_or_else(|| extraction_error("event article"))
    }
}

/// Parse `body` and extract the event fields from it
pub fn extract_event(body: &str, source_url: &str) -> AppResult<RawEventFields> {
    extract(&EventDocument::parse(body), source_url)
}

/// Pull every field out of an event page.
///
/// The event article, title, date, time and the posted/updated stamps are
/// required and fail with [`crate::error::Error::Extraction`] when missing. Location, host and
/// description fall back to [`NOT_PROVIDED`].
pub fn extract(document: &EventDocument, source_url: &str) -> AppResult<RawEventFields> {
    let scope = document.scope()?;

    let title = first_text(scope, "h1")?.ok_or_else(|| extraction_error("title"))?;
    let date_text = first_text(scope, "p.event-date")?.ok_or_else(|| extraction_error("date"))?;
    let time_text = first_text(scope, "p.event-time")?.ok_or_else(|| extraction_error("time"))?;

    let location = match (labelled_text(scope, "Location"), labelled_text(scope, "Address")) {
        (Some(location), Some(address)) => {
            collapse_whitespace(&format!("{},{}", location, address))
        }
        _ => {
            debug!("No location on {}", source_url);
            NOT_PROVIDED.to_string()
        }
    };

    let host = match labelled_text(scope, "Contact") {
        Some(host) => collapse_whitespace(&host),
        None => {
            debug!("No contact on {}", source_url);
            NOT_PROVIDED.to_string()
        }
    };

    let description = match description(scope)? {
        Some(description) => description,
        None => {
            debug!("No description on {}", source_url);
            NOT_PROVIDED.to_string()
        }
    };

    let created_text = labelled_text(scope, "Date posted")
        .map(|text| collapse_whitespace(&text))
        .ok_or_else(|| extraction_error("date posted"))?;
    let modified_text = labelled_text(scope, "Date updated")
        .map(|text| collapse_whitespace(&text))
        .ok_or_else(|| extraction_error("date updated"))?;

    Ok(RawEventFields {
        title,
        date_text,
        time_text,
        location,
        description,
        host,
        created_text,
        modified_text,
        source_url: source_url.to_string(),
    })
}

fn selector(css: &str) -> AppResult<Selector> {
    Selector::parse(css).map_err(|e| other_error(&format!("Invalid selector {}: {:?}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Collapsed text of the first element matching `css`
fn first_text(scope: ElementRef<'_>, css: &str) -> AppResult<Option<String>> {
    let selector = selector(css)?;
    Ok(scope
        .select(&selector)
        .next()
        .map(|element| collapse_whitespace(&element_text(element))))
}

/// Raw text of the element that follows a label.
///
/// The label is a text node equal to `label` (ignoring surrounding
/// whitespace); its value is the next element after the label's parent,
/// e.g. the `<dd>` after `<dt>Location</dt>`.
fn labelled_text(scope: ElementRef<'_>, label: &str) -> Option<String> {
    let label_node = scope
        .descendants()
        .find(|node| node.value().as_text().is_some_and(|text| text.trim() == label))?;

    let value = label_node
        .parent()?
        .next_siblings()
        .find_map(ElementRef::wrap)?;

    Some(element_text(value))
}

/// First paragraph of the block after the details list
fn description(scope: ElementRef<'_>) -> AppResult<Option<String>> {
    let details = selector(DETAILS_BLOCK)?;
    let paragraph = selector("p")?;

    Ok(scope
        .select(&details)
        .next()
        .and_then(|block| block.next_siblings().find_map(ElementRef::wrap))
        .and_then(|block| block.select(&paragraph).next())
        .map(|p| collapse_whitespace(&element_text(p))))
}
