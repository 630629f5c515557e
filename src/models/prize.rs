use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One prize record. Several records may share `display_name` + `provider`
/// (identical items donated in bulk); that "prize group" is derived on
/// demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Prize {
    pub id: String,
    pub display_name: String,
    pub provider: String,
}
