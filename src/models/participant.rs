use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of the uploaded attendee list.
///
/// `registration_id` is the reception number printed on the attendee badge
/// barcode; it is the unique key referenced by mappings and cancels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Participant {
    pub registration_id: String,
    pub username: String,
    pub display_name: String,
    /// Attendance status from the registration site at upload time.
    /// Day-of no-shows are tracked separately in the cancels list.
    pub attending: bool,
}
