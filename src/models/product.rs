use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductImage, ProductPatch,
};
use crate::domain::types::{
    AssetUrl, CategoryName, ProductDescription, ProductName, RemoteId, TypeConstraintError,
    optional_text,
};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category_id: i32,
    pub image_url: Option<String>,
    pub image_remote_id: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Product`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub category_id: i32,
    pub image_url: Option<String>,
    pub image_remote_id: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset overwriting every mutable column, `None` included.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct ProductChangeset {
    pub name: String,
    pub description: Option<String>,
    pub category_id: i32,
    pub image_url: Option<String>,
    pub image_remote_id: Option<String>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

fn image_from_columns(
    url: Option<String>,
    remote_id: Option<String>,
) -> Result<Option<ProductImage>, TypeConstraintError> {
    let Some(url) = url.filter(|url| !url.trim().is_empty()) else {
        return Ok(None);
    };
    Ok(Some(ProductImage {
        url: AssetUrl::new(url)?,
        remote_id: optional_text(remote_id, RemoteId::new)?,
    }))
}

fn image_into_columns(image: Option<ProductImage>) -> (Option<String>, Option<String>) {
    match image {
        Some(image) => (
            Some(image.url.into_inner()),
            image.remote_id.map(RemoteId::into_inner),
        ),
        None => (None, None),
    }
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.try_into()?,
            name: ProductName::new(product.name)?,
            description: optional_text(product.description, ProductDescription::new)?,
            category_id: product.category_id.try_into()?,
            category_name: None,
            image: image_from_columns(product.image_url, product.image_remote_id)?,
            is_active: product.is_active,
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

impl TryFrom<(Product, String)> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from((product, category_name): (Product, String)) -> Result<Self, Self::Error> {
        let mut product = DomainProduct::try_from(product)?;
        product.category_name = Some(CategoryName::new(category_name)?);
        Ok(product)
    }
}

impl From<DomainNewProduct> for NewProduct {
    fn from(product: DomainNewProduct) -> Self {
        let (image_url, image_remote_id) = image_into_columns(product.image);
        Self {
            name: product.name.into_inner(),
            description: product.description.map(ProductDescription::into_inner),
            category_id: product.category_id.get(),
            image_url,
            image_remote_id,
            is_active: product.is_active,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl ProductChangeset {
    pub fn new(patch: ProductPatch, updated_at: NaiveDateTime) -> Self {
        let (image_url, image_remote_id) = image_into_columns(patch.image);
        Self {
            name: patch.name.into_inner(),
            description: patch.description.map(ProductDescription::into_inner),
            category_id: patch.category_id.get(),
            image_url,
            image_remote_id,
            is_active: patch.is_active,
            updated_at,
        }
    }
}
