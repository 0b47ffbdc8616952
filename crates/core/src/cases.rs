//! Interview case constants, status values and validation.

use crate::error::CoreError;
use crate::text_enum::text_enum;

/// Maximum length of a case name in characters.
pub const MAX_CASE_NAME_LENGTH: usize = 200;

/// Message returned when deleting a case that still has questions.
pub const CASE_HAS_QUESTIONS: &str = "Case has linked questions and cannot be deleted";

text_enum! {
    /// Lifecycle status of an interview case. Transitions are unrestricted.
    CaseStatus ("case status") {
        Active => "active",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl Default for CaseStatus {
    fn default() -> Self {
        CaseStatus::Active
    }
}

text_enum! {
    /// Sort keys accepted by the case listing.
    CaseSortKey ("case sort key") {
        CreatedAt => "created_at",
        Name => "name",
        Company => "company",
        InterviewDate => "interview_date",
    }
}

impl Default for CaseSortKey {
    fn default() -> Self {
        CaseSortKey::CreatedAt
    }
}

impl CaseSortKey {
    /// Resolve a user-supplied sort key, falling back to `created_at`.
    ///
    /// Accepts both `snake_case` and the compact forms (`createdat`,
    /// `casename`, `companyname`, `interviewdate`).
    pub fn resolve(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return CaseSortKey::CreatedAt;
        };
        match raw.trim().to_ascii_lowercase().replace('_', "").as_str() {
            "name" | "casename" => CaseSortKey::Name,
            "company" | "companyname" => CaseSortKey::Company,
            "interviewdate" => CaseSortKey::InterviewDate,
            _ => CaseSortKey::CreatedAt,
        }
    }

    /// Column expression used in `ORDER BY` (aliases from the case listing query).
    pub fn column(self) -> &'static str {
        match self {
            CaseSortKey::CreatedAt => "c.created_at",
            CaseSortKey::Name => "c.name",
            CaseSortKey::Company => "c.company",
            CaseSortKey::InterviewDate => "c.interview_date",
        }
    }
}

/// Validate a case name: non-blank and within the length limit.
pub fn validate_case_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Case name is required".to_string()));
    }
    if name.chars().count() > MAX_CASE_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Case name exceeds maximum length of {MAX_CASE_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn new_cases_default_to_active() {
        assert_eq!(CaseStatus::default(), CaseStatus::Active);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in CaseStatus::ALL {
            assert_eq!(status.as_str().parse::<CaseStatus>().unwrap(), *status);
        }
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        assert_matches!("archived".parse::<CaseStatus>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn sort_key_defaults_to_created_at() {
        assert_eq!(CaseSortKey::resolve(None), CaseSortKey::CreatedAt);
        assert_eq!(CaseSortKey::resolve(Some("bogus")), CaseSortKey::CreatedAt);
    }

    #[test]
    fn sort_key_accepts_compact_and_snake_case_forms() {
        assert_eq!(CaseSortKey::resolve(Some("CaseName")), CaseSortKey::Name);
        assert_eq!(CaseSortKey::resolve(Some("company_name")), CaseSortKey::Company);
        assert_eq!(
            CaseSortKey::resolve(Some("interview_date")),
            CaseSortKey::InterviewDate
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_matches!(validate_case_name("   "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn overlong_name_is_rejected() {
        let name = "x".repeat(MAX_CASE_NAME_LENGTH + 1);
        assert_matches!(validate_case_name(&name), Err(CoreError::Validation(_)));
        assert!(validate_case_name(&"x".repeat(MAX_CASE_NAME_LENGTH)).is_ok());
    }
}
