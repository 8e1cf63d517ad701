//! Nearby emergency-contact matching.
//!
//! When a viewer opens a report, the app lists people who can help: a static
//! emergency-services entry first, then volunteers and first responders
//! whose registered location falls in the same coarse geohash cell as the
//! incident, then nearby affected users. The relevance rule is the same
//! prefix match the report feed uses.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Identifier of the static emergency-services contact.
pub const EMERGENCY_SERVICES_UID: &str = "emergency-911";

/// Who a contact is, for ordering and labeling.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactRole {
    /// The static emergency-services entry (police, fire, medical).
    Emergency,
    /// A registered relief volunteer.
    Volunteer,
    /// A professional first responder.
    FirstResponder,
    /// An affected user who reported from the area.
    User,
}

/// A person (or service) that can be contacted about an incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Stable identifier.
    pub uid: String,
    /// Display name.
    pub name: String,
    /// Phone number as stored.
    pub phone: String,
    /// Short availability/status line shown under the name.
    pub description: String,
    /// Role, used for grouping.
    pub role: ContactRole,
    /// Latitude of the registered location.
    pub latitude: f64,
    /// Longitude of the registered location.
    pub longitude: f64,
    /// Geohash of the registered location; empty for static entries.
    pub geohash: String,
}

impl ContactRecord {
    /// The static emergency-services entry, pinned to the incident location.
    #[must_use]
    pub fn emergency_services(latitude: f64, longitude: f64) -> Self {
        Self {
            uid: EMERGENCY_SERVICES_UID.to_string(),
            name: "Emergency Services".to_string(),
            phone: "911".to_string(),
            description: "Police, Fire, Medical Emergency".to_string(),
            role: ContactRole::Emergency,
            latitude,
            longitude,
            geohash: String::new(),
        }
    }
}

/// Filters contacts to those registered inside the anchor's geohash cell.
///
/// Same relevance rule as the report feed: case-sensitive prefix match, and
/// an empty prefix matches everyone. Input order is preserved.
#[must_use]
pub fn nearby_contacts<'a>(
    contacts: &'a [ContactRecord],
    anchor_prefix: &str,
) -> Vec<&'a ContactRecord> {
    contacts
        .iter()
        .filter(|contact| contact.geohash.starts_with(anchor_prefix))
        .collect()
}

/// Assembles the ordered contact list for an incident.
///
/// Emergency services lead, followed by nearby volunteers, then nearby
/// first responders, then nearby affected users; within each group the
/// input order is kept.
#[must_use]
pub fn assemble_contact_list(
    incident_latitude: f64,
    incident_longitude: f64,
    contacts: &[ContactRecord],
    anchor_prefix: &str,
) -> Vec<ContactRecord> {
    let nearby = nearby_contacts(contacts, anchor_prefix);

    let mut list = vec![ContactRecord::emergency_services(
        incident_latitude,
        incident_longitude,
    )];
    for role in [
        ContactRole::Volunteer,
        ContactRole::FirstResponder,
        ContactRole::User,
    ] {
        list.extend(
            nearby
                .iter()
                .filter(|contact| contact.role == role)
                .map(|contact| (*contact).clone()),
        );
    }

    list
}
