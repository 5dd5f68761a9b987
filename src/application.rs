//! Application records, drafts, review decisions, and patches.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{ApplicantId, Availability, CourseCode, Rank, ReviewKey, Role};

/// Offered course shown to applicants when they pick what to apply for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Course {
    /// Course code.
    pub code: &'static str,
    /// Human readable course name.
    pub name: &'static str,
}

/// Courses currently open for tutor and lab-assistant applications.
pub const COURSE_CATALOGUE: [Course; 4] = [
    Course { code: "COSC1234", name: "full stack development" },
    Course { code: "COSC2345", name: "machine learning" },
    Course { code: "COSC3456", name: "data structures" },
    Course { code: "COSC4567", name: "cloud computing" },
];

/// Looks up a catalogue course by its code.
pub fn find_course(code: &str) -> Option<&'static Course> {
    COURSE_CATALOGUE.iter().find(|c| c.code == code)
}

/// One submitted tutor or lab-assistant application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    /// Applicant identifier (email).
    #[serde(rename = "email")]
    pub applicant_id: ApplicantId,
    /// Optional display name.
    #[serde(rename = "username", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Course code applied for.
    pub course: CourseCode,
    /// Role applied for.
    pub role: Role,
    /// Declared availability.
    pub availability: Availability,
    /// Free-text previous roles.
    #[serde(default)]
    pub previous_roles: String,
    /// Free-text skills.
    #[serde(default)]
    pub skills: String,
    /// Free-text academic credentials.
    #[serde(default)]
    pub credentials: String,
}

impl ApplicationRecord {
    /// Name shown to lecturers, falling back to the applicant id.
    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.applicant_id)
    }

    /// Review key for this application's course and role.
    pub fn review_key(&self) -> ReviewKey {
        ReviewKey::new(self.applicant_id.clone(), self.course.clone(), self.role)
    }
}

/// Required application field left empty in a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    /// No signed-in applicant id.
    ApplicantId,
    /// No course picked.
    Course,
    /// No role picked.
    Role,
    /// No availability picked.
    Availability,
    /// Previous roles left blank.
    PreviousRoles,
    /// Skills left blank.
    Skills,
    /// Credentials left blank.
    Credentials,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::ApplicantId => "Sign in before applying",
            Self::Course => "Select a course",
            Self::Role => "Select a role",
            Self::Availability => "Select availability",
            Self::PreviousRoles => "Enter previous roles",
            Self::Skills => "Enter skills",
            Self::Credentials => "Enter academic credentials",
        };
        f.write_str(msg)
    }
}

/// Rejection of an incomplete draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// One or more required fields are blank.
    #[error("incomplete application: {}", join_missing(.0))]
    Incomplete(Vec<MissingField>),
}

fn join_missing(fields: &[MissingField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Submission payload collected from the application form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationDraft {
    /// Signed-in applicant id.
    pub applicant_id: ApplicantId,
    /// Optional display name.
    pub display_name: Option<String>,
    /// Course code applied for.
    pub course: CourseCode,
    /// Role applied for.
    pub role: Option<Role>,
    /// Declared availability.
    pub availability: Option<Availability>,
    /// Free-text previous roles.
    pub previous_roles: String,
    /// Free-text skills.
    pub skills: String,
    /// Free-text academic credentials.
    pub credentials: String,
}

impl ApplicationDraft {
    /// Checks every required field and converts the draft into a record.
    ///
    /// All blank fields are reported together, in form order.
    pub fn validate(self) -> Result<ApplicationRecord, DraftError> {
        let mut missing = Vec::new();
        if self.applicant_id.trim().is_empty() {
            missing.push(MissingField::ApplicantId);
        }
        if self.course.trim().is_empty() {
            missing.push(MissingField::Course);
        }
        if self.role.is_none() {
            missing.push(MissingField::Role);
        }
        if self.availability.is_none() {
            missing.push(MissingField::Availability);
        }
        if self.previous_roles.trim().is_empty() {
            missing.push(MissingField::PreviousRoles);
        }
        if self.skills.trim().is_empty() {
            missing.push(MissingField::Skills);
        }
        if self.credentials.trim().is_empty() {
            missing.push(MissingField::Credentials);
        }

        match (self.role, self.availability) {
            (Some(role), Some(availability)) if missing.is_empty() => Ok(ApplicationRecord {
                applicant_id: self.applicant_id,
                display_name: self.display_name,
                course: self.course,
                role,
                availability,
                previous_roles: self.previous_roles,
                skills: self.skills,
                credentials: self.credentials,
            }),
            _ => Err(DraftError::Incomplete(missing)),
        }
    }
}

/// Lecturer decision for one applicant on one course and role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
    /// Reviewed applicant. Older keyed records name it `username`.
    #[serde(rename = "email", alias = "username")]
    pub applicant_id: ApplicantId,
    /// Course under review.
    pub course: CourseCode,
    /// Role under review.
    pub role: Role,
    /// Ordinal rank, 1 is best.
    pub rank: Rank,
    /// Lecturer comment.
    #[serde(default)]
    pub comment: String,
}

impl ReviewEntry {
    /// Composite key of this entry.
    pub fn key(&self) -> ReviewKey {
        ReviewKey::new(self.applicant_id.clone(), self.course.clone(), self.role)
    }

    /// True when this entry belongs to `key`.
    pub fn matches(&self, key: &ReviewKey) -> bool {
        self.applicant_id == key.applicant_id && self.course == key.course && self.role == key.role
    }
}

/// Shortlist decision keyed by applicant alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortlistEntry {
    /// Shortlisted applicant.
    #[serde(rename = "email")]
    pub applicant_id: ApplicantId,
    /// Ordinal rank, 1 is best.
    pub rank: Rank,
    /// Lecturer comment.
    #[serde(default)]
    pub comment: String,
}

/// Sparse patch where each `Some` field overwrites the entry value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReviewPatch {
    /// Optional replacement rank.
    pub rank: Option<Rank>,
    /// Optional replacement comment.
    pub comment: Option<String>,
}

impl ReviewPatch {
    /// Rank assigned to an entry created without an explicit rank.
    pub const DEFAULT_RANK: Rank = 1;

    /// Patch that only sets the rank.
    pub fn rank(rank: Rank) -> Self {
        Self {
            rank: Some(rank),
            comment: None,
        }
    }

    /// Patch that only sets the comment.
    pub fn comment(comment: impl Into<String>) -> Self {
        Self {
            rank: None,
            comment: Some(comment.into()),
        }
    }

    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies this patch in place to a review.
    pub fn apply_to(&self, entry: &mut ReviewEntry) {
        self.apply_to_parts(&mut entry.rank, &mut entry.comment);
    }

    /// Applies this patch in place to a shortlist entry.
    pub fn apply_to_shortlist(&self, entry: &mut ShortlistEntry) {
        self.apply_to_parts(&mut entry.rank, &mut entry.comment);
    }

    fn apply_to_parts(&self, rank: &mut Rank, comment: &mut String) {
        if let Some(v) = self.rank {
            *rank = v;
        }
        if let Some(v) = &self.comment {
            *comment = v.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> ApplicationDraft {
        ApplicationDraft {
            applicant_id: "tutor@example.com".to_string(),
            display_name: None,
            course: "COSC1234".to_string(),
            role: Some(Role::Tutor),
            availability: Some(Availability::PartTime),
            previous_roles: "TA".to_string(),
            skills: "Rust".to_string(),
            credentials: "BSc".to_string(),
        }
    }

    #[test]
    fn complete_draft_becomes_record() {
        let rec = complete_draft().validate().expect("valid");
        assert_eq!(rec.applicant_id, "tutor@example.com");
        assert_eq!(rec.display_name(), "tutor@example.com");
        assert_eq!(rec.review_key().to_string(), "tutor@example.com_COSC1234_tutor");
    }

    #[test]
    fn blank_fields_are_all_reported_in_form_order() {
        let draft = ApplicationDraft {
            role: None,
            skills: "  ".to_string(),
            credentials: String::new(),
            ..complete_draft()
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(
            err,
            DraftError::Incomplete(vec![
                MissingField::Role,
                MissingField::Skills,
                MissingField::Credentials,
            ])
        );
        assert_eq!(
            err.to_string(),
            "incomplete application: Select a role, Enter skills, Enter academic credentials"
        );
    }

    #[test]
    fn record_uses_portal_json_field_names() {
        let json = r#"{
            "email": "a@example.com",
            "username": "Alice",
            "course": "COSC2345",
            "role": "lab-assistant",
            "availability": "full-time",
            "previousRoles": "none",
            "skills": "python",
            "credentials": "MSc"
        }"#;
        let rec: ApplicationRecord = serde_json::from_str(json).expect("decode");
        assert_eq!(rec.role, Role::LabAssistant);
        assert_eq!(rec.availability, Availability::FullTime);
        assert_eq!(rec.display_name(), "Alice");
        assert_eq!(rec.previous_roles, "none");
    }

    #[test]
    fn catalogue_lookup() {
        assert_eq!(find_course("COSC3456").map(|c| c.name), Some("data structures"));
        assert!(find_course("MATH1000").is_none());
    }
}
