//! Fixed allow-list schemas for search results and detail sections

use crate::shape::{schema, Schema};

/// Schema applied to every search result
pub fn search_result_schema() -> Schema {
    schema!({
        "listing": {
            "id": true,
            "name": true,
            "title": true,
            "coordinate": true,
            "structuredContent": {
                "mapCategoryInfo": { "body": true },
                "mapSecondaryLine": { "body": true },
                "primaryLine": { "body": true },
                "secondaryLine": { "body": true }
            }
        },
        "avgRatingA11yLabel": true,
        "listingParamOverrides": true,
        "structuredDisplayPrice": {
            "primaryLine": { "accessibilityLabel": true },
            "secondaryLine": { "accessibilityLabel": true },
            "explanationData": {
                "title": true,
                "priceDetails": {
                    "items": { "description": true, "priceString": true }
                }
            }
        }
    })
}

/// Detail-page sections kept in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Location,
    Policies,
    Highlights,
    Description,
    Amenities,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        Self::Location,
        Self::Policies,
        Self::Highlights,
        Self::Description,
        Self::Amenities,
    ];

    /// Looks up a section kind by its page identifier
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Section identifier as it appears on the page
    pub fn id(self) -> &'static str {
        match self {
            Self::Location => "LOCATION_DEFAULT",
            Self::Policies => "POLICIES_DEFAULT",
            Self::Highlights => "HIGHLIGHTS_DEFAULT",
            Self::Description => "DESCRIPTION_DEFAULT",
            Self::Amenities => "AMENITIES_DEFAULT",
        }
    }

    /// Schema applied to this section's body
    pub fn schema(self) -> Schema {
        match self {
            Self::Location => schema!({
                "lat": true,
                "lng": true,
                "subtitle": true,
                "title": true
            }),
            Self::Policies => schema!({
                "title": true,
                "houseRulesSections": {
                    "title": true,
                    "items": { "title": true }
                }
            }),
            Self::Highlights => schema!({
                "highlights": { "title": true }
            }),
            Self::Description => schema!({
                "htmlDescription": { "htmlText": true }
            }),
            Self::Amenities => schema!({
                "title": true,
                "seeAllAmenitiesGroups": {
                    "title": true,
                    "amenities": { "title": true }
                }
            }),
        }
    }
}
