//! Portal change notifications.

use crate::types::{ApplicantId, ReviewKey};

/// Events emitted once a mutation has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalEvent {
    /// A new application was appended.
    ApplicationSubmitted {
        /// Decision key of the new application.
        key: ReviewKey,
    },
    /// A review was created or edited.
    ReviewUpdated {
        /// Edited review.
        key: ReviewKey,
    },
    /// A review was removed.
    ReviewRemoved {
        /// Removed review.
        key: ReviewKey,
    },
    /// A shortlist entry was created or edited.
    ShortlistUpdated {
        /// Shortlisted applicant.
        applicant_id: ApplicantId,
    },
    /// A shortlist entry was removed.
    ShortlistRemoved {
        /// Applicant taken off the shortlist.
        applicant_id: ApplicantId,
    },
}
