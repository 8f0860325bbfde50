use diesel::prelude::*;

use crate::domain::media_asset::{MediaAsset, NewMediaAsset};
use crate::domain::types::MediaAssetId;
use crate::models::media_asset::{MediaAsset as DbMediaAsset, NewMediaAsset as DbNewMediaAsset};
use crate::repository::{DieselRepository, MediaAssetReader, MediaAssetWriter, RepositoryResult};

impl MediaAssetReader for DieselRepository {
    fn list_media_assets(&self) -> RepositoryResult<Vec<MediaAsset>> {
        use crate::schema::media_assets;

        let mut conn = self.conn()?;

        let items = media_assets::table
            .order((media_assets::created_at.desc(), media_assets::id.desc()))
            .load::<DbMediaAsset>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<MediaAsset>, _>>()?;

        Ok(items)
    }

    fn get_media_asset_by_id(&self, id: MediaAssetId) -> RepositoryResult<Option<MediaAsset>> {
        use crate::schema::media_assets;

        let mut conn = self.conn()?;

        let asset = media_assets::table
            .filter(media_assets::id.eq(id.get()))
            .first::<DbMediaAsset>(&mut conn)
            .optional()?;

        let asset = asset.map(TryInto::try_into).transpose()?;
        Ok(asset)
    }
}

impl MediaAssetWriter for DieselRepository {
    fn create_media_asset(&self, asset: &NewMediaAsset) -> RepositoryResult<MediaAsset> {
        use crate::schema::media_assets;

        let mut conn = self.conn()?;
        let db_asset: DbNewMediaAsset = asset.clone().into();

        let created = diesel::insert_into(media_assets::table)
            .values(db_asset)
            .get_result::<DbMediaAsset>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn delete_media_asset(&self, id: MediaAssetId) -> RepositoryResult<usize> {
        use crate::schema::media_assets;

        let mut conn = self.conn()?;

        let affected = diesel::delete(media_assets::table.filter(media_assets::id.eq(id.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
