//! Shared primitive IDs, enums, and composite keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Applicant identifier, usually the applicant's email address.
pub type ApplicantId = String;
/// Course code, e.g. `COSC1234`.
pub type CourseCode = String;
/// Ordinal rank where 1 is the best.
pub type Rank = u32;
/// Monotonic revision counter for a stored collection.
pub type Revision = u64;

/// Position an applicant is applying for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Tutorial tutor.
    Tutor,
    /// Laboratory assistant.
    LabAssistant,
}

impl Role {
    /// Wire name used in stored JSON and composite keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tutor => "tutor",
            Self::LabAssistant => "lab-assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tutor" => Ok(Self::Tutor),
            "lab-assistant" => Ok(Self::LabAssistant),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Declared working availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    /// Part-time.
    PartTime,
    /// Full-time.
    FullTime,
}

impl Availability {
    /// Wire name used in stored JSON and search text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PartTime => "part-time",
            Self::FullTime => "full-time",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite key identifying one reviewable decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReviewKey {
    /// Applicant under review.
    pub applicant_id: ApplicantId,
    /// Course applied for.
    pub course: CourseCode,
    /// Role applied for.
    pub role: Role,
}

impl ReviewKey {
    /// Builds a key from its parts.
    pub fn new(applicant_id: impl Into<ApplicantId>, course: impl Into<CourseCode>, role: Role) -> Self {
        Self {
            applicant_id: applicant_id.into(),
            course: course.into(),
            role,
        }
    }
}

impl fmt::Display for ReviewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.applicant_id, self.course, self.role)
    }
}

/// Applicant field that a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Course code.
    Course,
    /// Availability.
    Availability,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Applicant field that participates in free-text search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchField {
    /// Applicant id (email).
    ApplicantId,
    /// Display name.
    DisplayName,
    /// Course code.
    Course,
    /// Availability.
    Availability,
    /// Skills text.
    Skills,
}

impl SearchField {
    /// Fields searched by the shared lecturer search box.
    pub const DEFAULT_SET: [SearchField; 5] = [
        SearchField::ApplicantId,
        SearchField::DisplayName,
        SearchField::Course,
        SearchField::Availability,
        SearchField::Skills,
    ];
}
