use crate::{
    application::{ReviewEntry, ShortlistEntry},
    types::Rank,
};

/// A lecturer decision that counts as selecting one applicant.
///
/// Implemented by both the per-course [`ReviewEntry`] and the flat
/// [`ShortlistEntry`], so the statistics work over either collection.
pub trait Selection {
    /// Applicant this decision refers to.
    fn applicant_id(&self) -> &str;
    /// Assigned rank, 1 is best.
    fn rank(&self) -> Rank;
}

impl Selection for ReviewEntry {
    fn applicant_id(&self) -> &str {
        &self.applicant_id
    }

    fn rank(&self) -> Rank {
        self.rank
    }
}

impl Selection for ShortlistEntry {
    fn applicant_id(&self) -> &str {
        &self.applicant_id
    }

    fn rank(&self) -> Rank {
        self.rank
    }
}

impl<T: Selection + ?Sized> Selection for &T {
    fn applicant_id(&self) -> &str {
        (**self).applicant_id()
    }

    fn rank(&self) -> Rank {
        (**self).rank()
    }
}
