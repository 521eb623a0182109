//! Dashboard records as the backend serialises them (camelCase, bilingual names).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type RecordId = i64;

/// Role string of the signed-in user; the UI gates screens by comparing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "Admin", alias = "ADMIN")]
    Admin,
    #[serde(alias = "Employee", alias = "EMPLOYEE")]
    Employee,
    #[serde(alias = "Consultant", alias = "CONSULTANT")]
    Consultant,
}

impl std::str::FromStr for Role {
    type Err = crate::error::ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            "consultant" => Ok(Role::Consultant),
            _ => Err(crate::error::ClientError::Validation(format!("unknown role: {}", s))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name_en: String,
    pub name_ar: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Write-only; the backend never echoes it back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contractor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name_en: String,
    pub name_ar: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub commercial_register: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name_en: String,
    pub name_ar: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planned,
    InProgress,
    OnHold,
    Completed,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name_en: String,
    pub name_ar: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contractor_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultant_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub employee_ids: Vec<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<RecordId>,
    #[serde(default)]
    pub status: RequestStatus,
    /// Relative asset paths returned by the files upload endpoint.
    #[serde(default)]
    pub files: Vec<String>,
}

/// Request body for endpoints that take only an id (get, delete).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRequest {
    pub id: RecordId,
}

impl From<RecordId> for IdRequest {
    fn from(id: RecordId) -> Self {
        IdRequest { id }
    }
}

/// Query for list endpoints: 1-indexed page, optional search and extra filters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub page_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub filters: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn employee_round_trips_camel_case_without_id() {
        let e = Employee {
            name_en: "Omar".into(),
            name_ar: "عمر".into(),
            email: "omar@example.com".into(),
            job_title: "Site engineer".into(),
            ..Default::default()
        };
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["nameEn"], "Omar");
        assert_eq!(v["jobTitle"], "Site engineer");
        assert!(v.get("id").is_none());
        assert!(v.get("password").is_none());
    }

    #[test]
    fn role_accepts_capitalised_values() {
        let u: User = serde_json::from_value(json!({
            "id": 1, "name": "Root", "email": "root@example.com", "role": "Admin"
        }))
        .unwrap();
        assert_eq!(u.role, Role::Admin);
        assert_eq!("CONSULTANT".parse::<Role>().unwrap(), Role::Consultant);
    }

    #[test]
    fn project_dates_parse_iso() {
        let p: Project = serde_json::from_value(json!({
            "id": 4, "nameEn": "Tower", "nameAr": "برج",
            "status": "in_progress", "startDate": "2024-03-01"
        }))
        .unwrap();
        assert_eq!(p.status, ProjectStatus::InProgress);
        assert_eq!(p.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn list_request_flattens_filters() {
        let mut filters = Map::new();
        filters.insert("projectId".into(), json!(9));
        let req = ListRequest {
            page_number: 1,
            search: None,
            filters,
        };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({ "pageNumber": 1, "projectId": 9 }));
    }
}
