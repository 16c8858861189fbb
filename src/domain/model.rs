use crate::utils::error::{Result, SearchError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const PARAM_DISTRICT: &str = "district";
pub const PARAM_METHOD: &str = "method";
pub const PARAM_MIN_EXPERIENCE: &str = "min_experience";

/// 使用者選定的篩選條件；`None` 代表該維度不篩選
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub district: Option<String>,
    pub method: Option<String>,
    pub min_experience: Option<u32>,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        self.district.is_none() && self.method.is_none() && self.min_experience.is_none()
    }

    /// Query parameters for the set fields, in a fixed order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(district) = &self.district {
            pairs.push((PARAM_DISTRICT, district.clone()));
        }
        if let Some(method) = &self.method {
            pairs.push((PARAM_METHOD, method.clone()));
        }
        if let Some(years) = self.min_experience {
            pairs.push((PARAM_MIN_EXPERIENCE, years.to_string()));
        }
        pairs
    }

    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }
}

/// Raw selector values as the user left them. Empty means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub district: String,
    pub method: String,
    pub experience: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    District,
    Method,
    Experience,
}

impl FilterField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "district" => Some(FilterField::District),
            "method" => Some(FilterField::Method),
            "experience" | "min_experience" => Some(FilterField::Experience),
            _ => None,
        }
    }
}

impl FormState {
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FilterField::District => self.district = value,
            FilterField::Method => self.method = value,
            FilterField::Experience => self.experience = value,
        }
    }

    pub fn has_criteria(&self) -> bool {
        [&self.district, &self.method, &self.experience]
            .iter()
            .any(|v| !v.trim().is_empty())
    }

    pub fn reset(&mut self) {
        *self = FormState::default();
    }

    pub fn criteria(&self) -> Result<SearchCriteria> {
        let min_experience = match non_empty(&self.experience) {
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| SearchError::ValidationError {
                message: format!("Minimum experience must be a whole number of years, got '{}'", raw),
            })?),
            None => None,
        };

        Ok(SearchCriteria {
            district: non_empty(&self.district).map(str::to_string),
            method: non_empty(&self.method).map(str::to_string),
            min_experience,
        })
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// 目錄服務回傳的單筆資料，唯讀
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TherapistRecord {
    #[serde(default, deserialize_with = "string_or_null")]
    pub first_name: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub last_name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "methods_to_string")]
    pub therapy_methods: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub postal_code: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub registration_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub email: String,
}

fn string_or_null<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MethodsField {
    One(String),
    Many(Vec<String>),
}

fn methods_to_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<MethodsField>::deserialize(deserializer)? {
        Some(MethodsField::One(method)) => method,
        Some(MethodsField::Many(methods)) => methods.join(", "),
        None => String::new(),
    })
}

// 無法解析的日期視為沒有日期
fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_registration_date))
}

pub fn parse_registration_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 單次搜尋的結果，下一次搜尋時即丟棄
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Vec<TherapistRecord>),
    Failed(String),
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

impl From<Result<Vec<TherapistRecord>>> for SearchOutcome {
    fn from(result: Result<Vec<TherapistRecord>>) -> Self {
        match result {
            Ok(records) => SearchOutcome::Found(records),
            Err(e) => SearchOutcome::Failed(e.display_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_criteria_has_empty_query() {
        let criteria = SearchCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(criteria.query_string(), "");
    }

    #[test]
    fn test_query_contains_only_set_fields() {
        let criteria = SearchCriteria {
            district: None,
            method: Some("Verhaltenstherapie".to_string()),
            min_experience: Some(5),
        };
        assert_eq!(
            criteria.query_string(),
            "method=Verhaltenstherapie&min_experience=5"
        );
    }

    #[test]
    fn test_query_encodes_values() {
        let criteria = SearchCriteria {
            district: Some("1010 Wien".to_string()),
            method: Some("A&B".to_string()),
            min_experience: None,
        };
        assert_eq!(criteria.query_string(), "district=1010+Wien&method=A%26B");
    }

    #[test]
    fn test_form_state_to_criteria() {
        let form = FormState {
            district: " 1010 ".to_string(),
            method: String::new(),
            experience: "3".to_string(),
        };
        let criteria = form.criteria().unwrap();
        assert_eq!(criteria.district.as_deref(), Some("1010"));
        assert_eq!(criteria.method, None);
        assert_eq!(criteria.min_experience, Some(3));
    }

    #[test]
    fn test_form_state_rejects_non_numeric_experience() {
        let form = FormState {
            experience: "ten".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            form.criteria(),
            Err(SearchError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_form_state_has_criteria() {
        let mut form = FormState::default();
        assert!(!form.has_criteria());
        form.set(FilterField::Method, "  ");
        assert!(!form.has_criteria());
        form.set(FilterField::District, "1020");
        assert!(form.has_criteria());
        form.reset();
        assert_eq!(form, FormState::default());
    }

    #[test]
    fn test_record_deserialization_is_lenient() {
        let json = serde_json::json!({
            "id": 7,
            "first_name": "Jane",
            "last_name": null,
            "therapy_methods": ["Systemische Familientherapie", "Gestalttherapie"],
            "postal_code": "1010",
            "state": "Wien",
            "registration_date": "2015-03-01",
            "registration_number": 12345,
            "email": "jane@example.com"
        });
        let record: TherapistRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.first_name, "Jane");
        assert_eq!(record.last_name, "");
        assert_eq!(record.title, None);
        assert_eq!(
            record.therapy_methods,
            "Systemische Familientherapie, Gestalttherapie"
        );
        assert_eq!(
            record.registration_date,
            parse_registration_date("2015-03-01T00:00:00Z")
        );
    }

    #[test]
    fn test_unparseable_registration_date_is_absent() {
        let json = serde_json::json!({ "registration_date": "not a date" });
        let record: TherapistRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.registration_date, None);
    }

    #[test]
    fn test_outcome_from_error_uses_display_message() {
        let outcome = SearchOutcome::from(Err::<Vec<TherapistRecord>, _>(SearchError::Server {
            status: 422,
            message: "Invalid district code".to_string(),
        }));
        assert_eq!(
            outcome,
            SearchOutcome::Failed("Invalid district code".to_string())
        );
    }
}
