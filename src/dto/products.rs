use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::product::Product;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category_id: i32,
    pub category_name: Option<String>,
    pub image_url: Option<String>,
    pub image_remote_id: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for ProductDto {
    fn from(value: Product) -> Self {
        let (image_url, image_remote_id) = match value.image {
            Some(image) => (
                Some(image.url.into_inner()),
                image.remote_id.map(|r| r.into_inner()),
            ),
            None => (None, None),
        };
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
            description: value.description.map(|d| d.into_inner()),
            category_id: value.category_id.get(),
            category_name: value.category_name.map(|c| c.into_inner()),
            image_url,
            image_remote_id,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub message: String,
    pub product: ProductDto,
}
