use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::media_asset::{
    MediaAsset as DomainMediaAsset, NewMediaAsset as DomainNewMediaAsset,
};
use crate::domain::types::{AssetUrl, DisplayName, RemoteId, TypeConstraintError, optional_text};

/// Diesel model representing the `media_assets` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::media_assets)]
pub struct MediaAsset {
    pub id: i32,
    pub url: String,
    pub display_name: String,
    pub remote_id: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`MediaAsset`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::media_assets)]
pub struct NewMediaAsset {
    pub url: String,
    pub display_name: String,
    pub remote_id: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<MediaAsset> for DomainMediaAsset {
    type Error = TypeConstraintError;

    fn try_from(asset: MediaAsset) -> Result<Self, Self::Error> {
        Ok(Self {
            id: asset.id.try_into()?,
            url: AssetUrl::new(asset.url)?,
            display_name: DisplayName::new(asset.display_name)?,
            remote_id: optional_text(asset.remote_id, RemoteId::new)?,
            created_at: asset.created_at,
        })
    }
}

impl From<DomainNewMediaAsset> for NewMediaAsset {
    fn from(asset: DomainNewMediaAsset) -> Self {
        Self {
            url: asset.url.into_inner(),
            display_name: asset.display_name.into_inner(),
            remote_id: asset.remote_id.map(RemoteId::into_inner),
            created_at: asset.created_at,
        }
    }
}
