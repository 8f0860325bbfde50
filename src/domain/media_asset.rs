use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AssetUrl, DisplayName, MediaAssetId, RemoteId};

/// Gallery image whose binary content lives in the media store.
///
/// A row with a `remote_id` is expected to have a live remote object until
/// the row itself is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaAsset {
    pub id: MediaAssetId,
    pub url: AssetUrl,
    pub display_name: DisplayName,
    pub remote_id: Option<RemoteId>,
    pub created_at: NaiveDateTime,
}

/// Data required to record a freshly uploaded [`MediaAsset`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMediaAsset {
    pub url: AssetUrl,
    pub display_name: DisplayName,
    pub remote_id: Option<RemoteId>,
    pub created_at: NaiveDateTime,
}
