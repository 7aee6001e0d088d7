pub mod models;

pub use models::{identity_key, NormalizedEvent};

use crate::components::event_listing::RawEventFields;
use crate::components::event_times::EventTimes;

/// Combine scraped fields and parsed times into a calendar-ready event
pub fn assemble(
    fields: &RawEventFields,
    times: &EventTimes,
    provenance_title: &str,
) -> NormalizedEvent {
    NormalizedEvent {
        summary: fields.title.clone(),
        location: fields.location.clone(),
        description: format!("{}\n\nHost: {}", fields.description, fields.host),
        start_at: times.start_at,
        end_at: times.end_at,
        source_url: fields.source_url.clone(),
        source_title: provenance_title.to_string(),
        identity_key: identity_key(&times.start_at, &times.end_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::event_listing::NOT_PROVIDED;
    use crate::components::event_times::{normalize, RepairMode};
    use chrono_tz::America::Chicago;

    fn fields(host: &str) -> RawEventFields {
        RawEventFields {
            title: "Catalysis at the Interface".to_string(),
            date_text: "May 3, 2024".to_string(),
            time_text: "2:00 - 3:00 PM".to_string(),
            location: "SES 238,845 W Taylor St".to_string(),
            description: "A talk about surfaces.".to_string(),
            host: host.to_string(),
            created_text: "Apr 20, 2024".to_string(),
            modified_text: "Apr 22, 2024".to_string(),
            source_url: "http://chem.uic.edu/events/catalysis/".to_string(),
        }
    }

    fn times(fields: &RawEventFields) -> EventTimes {
        normalize(
            &fields.date_text,
            &fields.time_text,
            &fields.created_text,
            &fields.modified_text,
            Chicago,
            RepairMode::Literal,
        )
        .unwrap()
    }

    #[test]
    fn test_assemble() {
        let fields = fields("Prof. Jane Smith");
        let event = assemble(&fields, &times(&fields), "Generated from the seminar list");

        assert_eq!(event.summary, "Catalysis at the Interface");
        assert_eq!(event.location, "SES 238,845 W Taylor St");
        assert_eq!(event.description, "A talk about surfaces.\n\nHost: Prof. Jane Smith");
        assert_eq!(event.identity_key, "20240503140000/20240503150000");
        assert_eq!(event.source_url, "http://chem.uic.edu/events/catalysis/");
        assert_eq!(event.source_title, "Generated from the seminar list");
        assert_eq!(event.time_zone(), "America/Chicago");
    }

    #[test]
    fn test_missing_host_in_description() {
        let fields = fields(NOT_PROVIDED);
        let event = assemble(&fields, &times(&fields), "Generated");
        assert!(event.description.ends_with("Host: Not Provided"));
    }

    #[test]
    fn test_identity_key_is_deterministic() {
        let fields = fields("Prof. Jane Smith");
        let first = assemble(&fields, &times(&fields), "Generated");
        let second = assemble(&fields, &times(&fields), "Generated");
        assert_eq!(first.identity_key, second.identity_key);

        // Only the times feed the key
        let mut other = fields.clone();
        other.title = "A different talk".to_string();
        other.source_url = "http://chem.uic.edu/events/other/".to_string();
        let third = assemble(&other, &times(&other), "Generated");
        assert_eq!(first.identity_key, third.identity_key);
    }
}
