use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;
use tracing::warn;
use uuid::Uuid;

/// Roles that count towards the "Lawyers" figure.
pub const LAWYER_ROLES: [StaffRole; 4] = [
    StaffRole::SeniorLawyer,
    StaffRole::JuniorLawyer,
    StaffRole::SeniorPartner,
    StaffRole::JuniorPartner,
];

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StaffRole {
    SeniorLawyer,
    JuniorLawyer,
    SeniorPartner,
    JuniorPartner,
    LegalSecretary,
    Accountant,
    Paralegal,
    Assistant,
    Manager,
    Other(String),
}

impl StaffRole {
    pub fn parse(raw: &str) -> Self {
        let key = raw.trim().replace([' ', '-'], "_").to_lowercase();
        match key.as_str() {
            "senior_lawyer" => Self::SeniorLawyer,
            "junior_lawyer" => Self::JuniorLawyer,
            "senior_partner" => Self::SeniorPartner,
            "junior_partner" => Self::JuniorPartner,
            "legal_secretary" => Self::LegalSecretary,
            "accountant" => Self::Accountant,
            "paralegal" => Self::Paralegal,
            "assistant" => Self::Assistant,
            "manager" => Self::Manager,
            _ => Self::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::SeniorLawyer => "Senior_Lawyer",
            Self::JuniorLawyer => "Junior_Lawyer",
            Self::SeniorPartner => "Senior_Partner",
            Self::JuniorPartner => "Junior_Partner",
            Self::LegalSecretary => "Legal_Secretary",
            Self::Accountant => "Accountant",
            Self::Paralegal => "Paralegal",
            Self::Assistant => "Assistant",
            Self::Manager => "Manager",
            Self::Other(label) => label.as_str(),
        }
    }

    pub fn is_lawyer(&self) -> bool {
        LAWYER_ROLES.contains(self)
    }

    /// Badge colours for the staff card.
    pub fn badge_classes(&self) -> &'static str {
        match self {
            Self::SeniorLawyer | Self::SeniorPartner => "bg-blue-100 text-blue-800",
            Self::JuniorLawyer | Self::JuniorPartner => "bg-green-100 text-green-800",
            Self::LegalSecretary => "bg-purple-100 text-purple-800",
            Self::Accountant => "bg-orange-100 text-orange-800",
            Self::Paralegal => "bg-indigo-100 text-indigo-800",
            Self::Assistant => "bg-pink-100 text-pink-800",
            Self::Manager => "bg-red-100 text-red-800",
            Self::Other(_) => "bg-slate-100 text-slate-700",
        }
    }
}

impl From<String> for StaffRole {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<StaffRole> for String {
    fn from(value: StaffRole) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StaffStatus {
    Active,
    Busy,
    Away,
    Offline,
    Other(String),
}

impl StaffStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "active" => Self::Active,
            "busy" => Self::Busy,
            "away" => Self::Away,
            "offline" => Self::Offline,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Busy => "busy",
            Self::Away => "away",
            Self::Offline => "offline",
            Self::Other(label) => label.as_str(),
        }
    }

    pub fn badge_classes(&self) -> &'static str {
        match self {
            Self::Active => "bg-green-100 text-green-800",
            Self::Busy => "bg-yellow-100 text-yellow-800",
            Self::Away => "bg-gray-100 text-gray-800",
            Self::Offline => "bg-red-100 text-red-800",
            Self::Other(_) => "bg-slate-100 text-slate-700",
        }
    }
}

impl From<String> for StaffStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<StaffStatus> for String {
    fn from(value: StaffStatus) -> Self {
        value.as_str().to_string()
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub relationship: Option<String>,
}

/// Canonical staff record as held in a roster snapshot.
///
/// Only `id` and the two name parts are always present; everything else is
/// optional and an absent value never matches a filter.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRecord {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub role: Option<StaffRole>,
    /// Free-text job title. Also the role fallback at ingestion.
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub status: Option<StaffStatus>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub reporting_manager: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

impl StaffRecord {
    pub fn blank(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Empty record for the "new staff member" form, with a fresh id.
    pub fn new_draft() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            status: Some(StaffStatus::Active),
            emergency_contact: Some(EmergencyContact::default()),
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .next()
            .into_iter()
            .chain(self.last_name.chars().next())
            .collect()
    }

    pub fn role_label(&self) -> Option<&str> {
        self.role.as_ref().map(StaffRole::as_str)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, Some(StaffStatus::Active))
    }

    pub fn is_lawyer(&self) -> bool {
        self.role.as_ref().is_some_and(StaffRole::is_lawyer)
    }

    /// Street, city, state and ZIP joined with commas, skipping gaps.
    pub fn address_line(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.address, &self.city, &self.state, &self.zip_code]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Builds the canonical record from whatever shape the backend pushed.
    /// Returns `None` when the record has no usable id.
    pub fn from_raw(raw: RawStaffRecord) -> Option<Self> {
        let id = non_blank(raw.id)?;

        let mut first_name = non_blank(raw.first_name);
        let mut last_name = non_blank(raw.last_name);
        if first_name.is_none() && last_name.is_none() {
            if let Some(name) = non_blank(raw.name) {
                let (first, last) = split_legacy_name(&name);
                first_name = Some(first);
                last_name = last;
            }
        }

        let position = non_blank(raw.position);
        let role = non_blank(raw.role)
            .or_else(|| position.clone())
            .map(|value| StaffRole::parse(&value));

        let emergency_contact = raw.emergency_contact.and_then(|contact| {
            let contact = EmergencyContact {
                name: non_blank(contact.name),
                phone: non_blank(contact.phone),
                relationship: non_blank(contact.relationship),
            };
            (contact != EmergencyContact::default()).then_some(contact)
        });

        Some(Self {
            id,
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
            email: non_blank(raw.email),
            phone: non_blank(raw.phone),
            department: non_blank(raw.department),
            role,
            position,
            status: non_blank(raw.status).map(|value| StaffStatus::parse(&value)),
            employee_id: non_blank(raw.employee_id),
            employment_type: non_blank(raw.employment_type),
            reporting_manager: non_blank(raw.reporting_manager),
            start_date: non_blank(raw.start_date),
            salary: non_blank(raw.salary),
            bio: non_blank(raw.bio),
            address: non_blank(raw.address),
            city: non_blank(raw.city),
            state: non_blank(raw.state),
            zip_code: non_blank(raw.zip_code),
            location: non_blank(raw.location),
            profile_image: non_blank(raw.profile_image).or_else(|| non_blank(raw.avatar)),
            emergency_contact,
            skills: raw
                .skills
                .unwrap_or_default()
                .into_iter()
                .filter_map(|skill| non_blank(Some(skill)))
                .collect(),
        })
    }
}

/// Loose wire shape accepted from the roster feed. Both the legacy
/// `name`/`role` records and the `firstName`/`lastName`/`position` records
/// deserialize into this.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStaffRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub reporting_manager: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
}

/// Normalizes one pushed snapshot. Entries that fail to decode, lack an id,
/// or repeat an id already seen are skipped; the rest keep delivery order.
pub fn ingest_snapshot(entries: Vec<Value>) -> Vec<StaffRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let raw = match serde_json::from_value::<RawStaffRecord>(entry) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(index, %err, "skipping malformed staff record");
                continue;
            }
        };

        let Some(record) = StaffRecord::from_raw(raw) else {
            warn!(index, "skipping staff record without id");
            continue;
        };

        if !seen.insert(record.id.clone()) {
            warn!(index, id = %record.id, "skipping duplicate staff id");
            continue;
        }

        records.push(record);
    }

    records
}

/// Decodes a full-collection payload as pushed by the roster stream.
pub fn parse_snapshot(payload: &str) -> Result<Vec<StaffRecord>, serde_json::Error> {
    let entries: Vec<Value> = serde_json::from_str(payload)?;
    Ok(ingest_snapshot(entries))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn split_legacy_name(name: &str) -> (String, Option<String>) {
    match name.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), non_blank(Some(rest.to_string()))),
        None => (name.to_string(), None),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_name_and_role_are_normalized() {
        let records = ingest_snapshot(vec![json!({
            "id": "1",
            "name": "Sarah Johnson",
            "role": "Senior_Lawyer",
            "status": "Active",
            "avatar": "/placeholder.svg"
        })]);

        assert_eq!(records.len(), 1);
        let sarah = &records[0];
        assert_eq!(sarah.first_name, "Sarah");
        assert_eq!(sarah.last_name, "Johnson");
        assert_eq!(sarah.role, Some(StaffRole::SeniorLawyer));
        assert_eq!(sarah.status, Some(StaffStatus::Active));
        assert_eq!(sarah.profile_image.as_deref(), Some("/placeholder.svg"));
    }

    #[test]
    fn position_fills_in_for_missing_role() {
        let raw = RawStaffRecord {
            id: Some("7".into()),
            first_name: Some("Ada".into()),
            position: Some("paralegal".into()),
            ..RawStaffRecord::default()
        };
        let record = StaffRecord::from_raw(raw).unwrap();
        assert_eq!(record.role, Some(StaffRole::Paralegal));
        assert_eq!(record.position.as_deref(), Some("paralegal"));
        assert_eq!(record.last_name, "");
    }

    #[test]
    fn position_is_kept_next_to_an_explicit_role() {
        let records = ingest_snapshot(vec![json!({
            "id": "1",
            "firstName": "Ana",
            "lastName": "Ruiz",
            "role": "Senior_Lawyer",
            "position": "Head of Litigation"
        })]);
        assert_eq!(records[0].role, Some(StaffRole::SeniorLawyer));
        assert_eq!(records[0].position.as_deref(), Some("Head of Litigation"));

        let value = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(value["position"], "Head of Litigation");
        assert_eq!(value["role"], "Senior_Lawyer");
    }

    #[test]
    fn explicit_names_win_over_legacy_name() {
        let records = ingest_snapshot(vec![json!({
            "id": "2",
            "name": "Ignored Person",
            "firstName": "Michael",
            "lastName": "Chen"
        })]);
        assert_eq!(records[0].display_name(), "Michael Chen");
    }

    #[test]
    fn unknown_role_is_kept_verbatim() {
        assert_eq!(
            StaffRole::parse("Of Counsel"),
            StaffRole::Other("Of Counsel".into())
        );
        assert_eq!(StaffRole::parse("senior partner"), StaffRole::SeniorPartner);
    }

    #[test]
    fn bad_entries_are_skipped_without_failing_the_snapshot() {
        let records = ingest_snapshot(vec![
            json!({ "id": "1", "firstName": "A" }),
            json!("not a record"),
            json!({ "firstName": "No id" }),
            json!({ "id": "1", "firstName": "Duplicate" }),
            json!({ "id": 42, "firstName": "Numeric" }),
        ]);

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "42"]);
        assert_eq!(records[0].first_name, "A");
    }

    #[test]
    fn blank_strings_become_absent() {
        let records = ingest_snapshot(vec![json!({
            "id": "3",
            "department": "   ",
            "emergencyContact": { "name": "" }
        })]);
        assert_eq!(records[0].department, None);
        assert_eq!(records[0].emergency_contact, None);
    }

    #[test]
    fn canonical_serialization_omits_absent_fields() {
        let mut record = StaffRecord::blank("9");
        record.first_name = "Dave".into();
        record.role = Some(StaffRole::Manager);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({ "id": "9", "firstName": "Dave", "lastName": "", "role": "Manager" })
        );
    }

    #[test]
    fn address_line_skips_missing_parts() {
        let mut record = StaffRecord::blank("1");
        record.city = Some("Chicago".into());
        record.zip_code = Some("60601".into());
        assert_eq!(record.address_line().as_deref(), Some("Chicago, 60601"));
        assert_eq!(StaffRecord::blank("2").address_line(), None);
    }

    #[test]
    fn new_drafts_get_distinct_ids() {
        let first = StaffRecord::new_draft();
        let second = StaffRecord::new_draft();
        assert_ne!(first.id, second.id);
        assert!(first.is_active());
        assert!(first.emergency_contact.is_some());
    }

    #[test]
    fn parse_snapshot_rejects_non_array_payloads() {
        assert!(parse_snapshot("{\"id\":\"1\"}").is_err());
        assert_eq!(parse_snapshot("[]").unwrap(), Vec::new());
    }
}
