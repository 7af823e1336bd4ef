//! Listing records shown by the directory screens and the field access they
//! expose to filtering.
//!
//! Every screen (businesses, people, events, vacancies, publications,
//! promotions, vendors) filters its records through
//! [`FilterableCollection`](crate::ui::FilterableCollection). The collection
//! never knows the concrete record type; it asks each record for a named field
//! through the [`Filterable`] trait and matches predicates against the returned
//! [`FieldValue`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A field value exposed to predicate matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Enumerated value compared by exact equality (industry, category).
    Category(&'a str),
    /// One or more free-text fields searched by substring.
    Text(Vec<&'a str>),
    /// Boolean attribute (availability, verification).
    Flag(bool),
}

/// Named field access for records that can be filtered.
///
/// Returns `None` for field names the record does not have. An item without
/// the field named by an active predicate never matches it.
pub trait Filterable {
    fn field(&self, key: &str) -> Option<FieldValue<'_>>;
}

/// Field names shared by the listing records.
pub mod fields {
    pub const INDUSTRY: &str = "industry";
    pub const CATEGORY: &str = "category";
    pub const CITY: &str = "city";
    pub const SEARCH_TEXT: &str = "searchText";
    pub const AVAILABILITY: &str = "availability";
    pub const VERIFIED: &str = "verified";
    pub const REMOTE: &str = "remote";
    pub const FREE: &str = "free";
    pub const ACTIVE: &str = "active";
}

/// A business in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: String,
    pub name: String,
    pub industry: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub verified: bool,
}

impl Filterable for Business {
    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            fields::INDUSTRY => Some(FieldValue::Category(&self.industry)),
            fields::CITY => Some(FieldValue::Category(&self.city)),
            fields::SEARCH_TEXT => Some(FieldValue::Text(vec![self.name.as_str(), self.description.as_str()])),
            fields::VERIFIED => Some(FieldValue::Flag(self.verified)),
            _ => None,
        }
    }
}

/// A person's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub profession: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub available: bool,
}

impl Filterable for Profile {
    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            fields::INDUSTRY | fields::CATEGORY => Some(FieldValue::Category(&self.profession)),
            fields::CITY => Some(FieldValue::Category(&self.city)),
            fields::SEARCH_TEXT => {
                let mut text = vec![self.name.as_str(), self.profession.as_str()];
                text.extend(self.skills.iter().map(String::as_str));
                Some(FieldValue::Text(text))
            }
            fields::AVAILABILITY => Some(FieldValue::Flag(self.available)),
            _ => None,
        }
    }
}

/// A scheduled event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListing {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub venue: String,
    pub starts_on: NaiveDate,
    #[serde(default)]
    pub free: bool,
}

impl Filterable for EventListing {
    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            fields::CATEGORY => Some(FieldValue::Category(&self.category)),
            fields::SEARCH_TEXT => Some(FieldValue::Text(vec![self.title.as_str(), self.venue.as_str()])),
            fields::FREE => Some(FieldValue::Flag(self.free)),
            _ => None,
        }
    }
}

/// A job vacancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vacancy {
    pub id: String,
    pub title: String,
    pub company: String,
    pub industry: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub remote: bool,
}

impl Filterable for Vacancy {
    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            fields::INDUSTRY => Some(FieldValue::Category(&self.industry)),
            fields::CITY => Some(FieldValue::Category(&self.location)),
            fields::SEARCH_TEXT => Some(FieldValue::Text(vec![self.title.as_str(), self.company.as_str()])),
            fields::REMOTE => Some(FieldValue::Flag(self.remote)),
            _ => None,
        }
    }
}

/// An article or news item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub summary: String,
}

impl Filterable for Publication {
    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            fields::CATEGORY => Some(FieldValue::Category(&self.category)),
            fields::SEARCH_TEXT => {
                Some(FieldValue::Text(vec![self.title.as_str(), self.author.as_str(), self.summary.as_str()]))
            }
            _ => None,
        }
    }
}

/// A vendor promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: String,
    pub title: String,
    pub vendor: String,
    pub category: String,
    #[serde(default)]
    pub active: bool,
}

impl Filterable for Promotion {
    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            fields::CATEGORY => Some(FieldValue::Category(&self.category)),
            fields::SEARCH_TEXT => Some(FieldValue::Text(vec![self.title.as_str(), self.vendor.as_str()])),
            fields::ACTIVE => Some(FieldValue::Flag(self.active)),
            _ => None,
        }
    }
}

/// A registered marketplace vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub verified: bool,
}

impl Filterable for Vendor {
    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            fields::CATEGORY => Some(FieldValue::Category(&self.category)),
            fields::CITY => Some(FieldValue::Category(&self.location)),
            fields::SEARCH_TEXT => Some(FieldValue::Text(vec![self.name.as_str(), self.location.as_str()])),
            fields::VERIFIED => Some(FieldValue::Flag(self.verified)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_search_text_includes_skills() {
        let profile = Profile {
            id: "p1".into(),
            name: "Grace".into(),
            profession: "Engineer".into(),
            skills: vec!["COBOL".into(), "Compilers".into()],
            city: "Arlington".into(),
            available: true,
        };
        let Some(FieldValue::Text(text)) = profile.field(fields::SEARCH_TEXT) else {
            panic!("expected text field");
        };
        assert!(text.contains(&"COBOL"));
        assert_eq!(profile.field(fields::AVAILABILITY), Some(FieldValue::Flag(true)));
    }

    #[test]
    fn unknown_field_is_absent() {
        let publication = Publication {
            id: "1".into(),
            title: "t".into(),
            author: "a".into(),
            category: "news".into(),
            summary: String::new(),
        };
        assert_eq!(publication.field(fields::VERIFIED), None);
    }

    #[test]
    fn event_listing_parses_camel_case_dates() {
        let json = r#"{"id":"e1","title":"Expo","category":"fair","startsOn":"2024-06-01"}"#;
        let event: EventListing = serde_json::from_str(json).unwrap();
        assert_eq!(event.starts_on, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert!(!event.free);
    }
}
