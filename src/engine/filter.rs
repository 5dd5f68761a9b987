//! Search, course filtering, and sorting for the lecturer listing.

use std::{borrow::Borrow, cmp::Ordering};

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::{
    application::{ApplicationRecord, COURSE_CATALOGUE, find_course},
    types::{CourseCode, SearchField, SortDirection, SortField},
};

fn field_text(app: &ApplicationRecord, field: SearchField) -> &str {
    match field {
        SearchField::ApplicantId => &app.applicant_id,
        SearchField::DisplayName => app.display_name.as_deref().unwrap_or(""),
        SearchField::Course => &app.course,
        SearchField::Availability => app.availability.as_str(),
        SearchField::Skills => &app.skills,
    }
}

/// Lower-cased, space-joined text of `fields` for one applicant.
pub fn search_text(app: &ApplicationRecord, fields: &[SearchField]) -> String {
    fields
        .iter()
        .map(|f| field_text(app, *f))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Applicants whose joined `fields` contain `query`, ignoring case.
///
/// An empty query keeps everything.
pub fn filter_applicants<'a, T: Borrow<ApplicationRecord>>(
    applicants: &'a [T],
    query: &str,
    fields: &[SearchField],
) -> Vec<&'a T> {
    let needle = query.to_lowercase();
    applicants
        .iter()
        .filter(|a| needle.is_empty() || search_text(Borrow::<ApplicationRecord>::borrow(*a), fields).contains(&needle))
        .collect()
}

/// Applicants whose course contains `course`, ignoring case.
///
/// An empty selection keeps everything.
pub fn filter_by_course<'a, T: Borrow<ApplicationRecord>>(applicants: &'a [T], course: &str) -> Vec<&'a T> {
    let needle = course.to_lowercase();
    applicants
        .iter()
        .filter(|a| Borrow::<ApplicationRecord>::borrow(*a).course.to_lowercase().contains(&needle))
        .collect()
}

/// Distinct course codes in order of first appearance.
pub fn distinct_courses(applicants: &[ApplicationRecord]) -> Vec<CourseCode> {
    let mut seen: HashSet<&str> = HashSet::new();
    applicants
        .iter()
        .map(|a| a.course.as_str())
        .filter(|c| seen.insert(*c))
        .map(str::to_string)
        .collect()
}

/// One entry of the course dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseOption {
    /// Course code.
    pub code: CourseCode,
    /// Catalogue name, `None` for codes outside the catalogue.
    pub name: Option<&'static str>,
    /// Application rows for exactly this code.
    pub applications: usize,
}

/// Catalogue courses, then any other code applicants used, with row counts.
pub fn course_options(applicants: &[ApplicationRecord]) -> Vec<CourseOption> {
    let mut out: Vec<CourseOption> = COURSE_CATALOGUE
        .iter()
        .map(|c| CourseOption {
            code: c.code.to_string(),
            name: Some(c.name),
            applications: 0,
        })
        .collect();
    for code in distinct_courses(applicants) {
        if find_course(&code).is_none() {
            out.push(CourseOption {
                code,
                name: None,
                applications: 0,
            });
        }
    }
    for opt in &mut out {
        opt.applications = applicants.iter().filter(|a| a.course == opt.code).count();
    }
    out
}

/// Case-folded comparison with the raw text as tie-breaker.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Stable sort on a text field; `direction` flips the comparator.
pub fn sort_applicants<T: Borrow<ApplicationRecord>>(applicants: &mut [T], field: SortField, direction: SortDirection) {
    applicants.sort_by(|a, b| {
        let a: &ApplicationRecord = a.borrow();
        let b: &ApplicationRecord = b.borrow();
        let ord = match field {
            SortField::Course => locale_compare(&a.course, &b.course),
            SortField::Availability => locale_compare(a.availability.as_str(), b.availability.as_str()),
        };
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Lecturer listing controls: course dropdown, search box, and sort order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantQuery {
    /// Course filter; empty keeps every course.
    #[serde(default)]
    pub course: String,
    /// Free-text search; empty keeps everything.
    #[serde(default)]
    pub search: String,
    /// Fields the search box looks at.
    #[serde(default = "default_search_fields")]
    pub fields: Vec<SearchField>,
    /// Sort field.
    #[serde(default = "default_sort_field")]
    pub sort_by: SortField,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

fn default_search_fields() -> Vec<SearchField> {
    SearchField::DEFAULT_SET.to_vec()
}

fn default_sort_field() -> SortField {
    SortField::Course
}

impl Default for ApplicantQuery {
    fn default() -> Self {
        Self {
            course: String::new(),
            search: String::new(),
            fields: default_search_fields(),
            sort_by: default_sort_field(),
            direction: SortDirection::default(),
        }
    }
}

impl ApplicantQuery {
    /// Applies the course filter, then the search, then the sort.
    pub fn apply<'a>(&self, applicants: &'a [ApplicationRecord]) -> Vec<&'a ApplicationRecord> {
        let by_course = filter_by_course(applicants, &self.course);
        let mut out: Vec<&ApplicationRecord> = filter_applicants(&by_course, &self.search, &self.fields)
            .into_iter()
            .copied()
            .collect();
        sort_applicants(&mut out, self.sort_by, self.direction);
        out
    }
}
