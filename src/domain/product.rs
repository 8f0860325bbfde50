use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    AssetUrl, CategoryId, CategoryName, ProductDescription, ProductId, ProductName, RemoteId,
};

/// Image stored in the media store and referenced inline by its owner.
///
/// Products keep the `url`/`remote_id` pair on their own row instead of
/// pointing at a shared gallery asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductImage {
    pub url: AssetUrl,
    /// Absent for legacy images that were never uploaded to the media store.
    pub remote_id: Option<RemoteId>,
}

/// A product listed on the storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub description: Option<ProductDescription>,
    pub category_id: CategoryId,
    /// Name of the owning category, joined at read time.
    pub category_name: Option<CategoryName>,
    pub image: Option<ProductImage>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Information required to create a new [`Product`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: ProductName,
    pub description: Option<ProductDescription>,
    pub category_id: CategoryId,
    pub image: Option<ProductImage>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Full set of mutable product columns written by an update.
///
/// Callers merge the request with the current row before building the
/// patch, so every field is the final value.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPatch {
    pub name: ProductName,
    pub description: Option<ProductDescription>,
    pub category_id: CategoryId,
    pub image: Option<ProductImage>,
    pub is_active: bool,
}
