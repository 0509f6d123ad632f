use serde_json::{json, Value};

use crate::models::{ingest_snapshot, StaffRecord};
use crate::session::SessionUser;

/// Demo roster used by the offline preview. The first four entries use the
/// legacy `name`/`role` shape, the rest the `firstName`/`position` shape, so
/// both go through ingestion.
pub fn sample_roster_payload() -> Vec<Value> {
    vec![
        json!({
            "id": "1",
            "name": "Sarah Johnson",
            "email": "sarah.johnson@legalflow.com",
            "phone": "+1 (555) 123-4567",
            "role": "Senior_Lawyer",
            "department": "Corporate Law",
            "status": "active",
            "avatar": "/placeholder.svg",
            "skills": ["Corporate Law", "M&A", "Securities"],
            "location": "New York Office"
        }),
        json!({
            "id": "2",
            "name": "Michael Chen",
            "email": "michael.chen@legalflow.com",
            "phone": "+1 (555) 234-5678",
            "role": "Legal_Secretary",
            "department": "Corporate Law",
            "status": "active",
            "avatar": "/placeholder.svg",
            "skills": ["Document Preparation", "Client Communication", "Spanish"],
            "location": "New York Office"
        }),
        json!({
            "id": "3",
            "name": "Emily Rodriguez",
            "email": "emily.rodriguez@legalflow.com",
            "phone": "+1 (555) 345-6789",
            "role": "Accountant",
            "department": "Finance",
            "status": "active",
            "avatar": "/placeholder.svg",
            "location": "Los Angeles Office"
        }),
        json!({
            "id": "4",
            "name": "David Wilson",
            "email": "david.wilson@legalflow.com",
            "phone": "+1 (555) 456-7890",
            "role": "Paralegal",
            "department": "Litigation",
            "status": "busy",
            "avatar": "/placeholder.svg",
            "skills": ["Legal Research", "Document Review", "Case Management"],
            "location": "Chicago Office"
        }),
        json!({
            "id": "5",
            "firstName": "Olivia",
            "lastName": "Martinez",
            "email": "olivia.martinez@legalflow.com",
            "phone": "+1 (555) 567-8901",
            "position": "Senior_Partner",
            "department": "Litigation",
            "status": "Active",
            "employeeId": "LF-0005",
            "employmentType": "Full-time",
            "startDate": "2012-03-01",
            "address": "200 W Madison St",
            "city": "Chicago",
            "state": "IL",
            "zipCode": "60606",
            "emergencyContact": {
                "name": "Luis Martinez",
                "phone": "+1 (555) 987-6543",
                "relationship": "Spouse"
            }
        }),
    ]
}

pub fn sample_roster() -> Vec<StaffRecord> {
    ingest_snapshot(sample_roster_payload())
}

pub fn sample_session_user() -> SessionUser {
    SessionUser {
        name: "Jordan Avery".to_string(),
        role: Some("Office Manager".to_string()),
        photo_url: None,
    }
}
