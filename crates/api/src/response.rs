//! Success envelope.

use serde::Serialize;

/// `{ "data": T }`, returned by every endpoint that has a body.
///
/// Paged instance listings return [`InstancePage`] instead, which adds a
/// `total` next to `data`.
///
/// [`InstancePage`]: grua_db::models::checklist_instance::InstancePage
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
