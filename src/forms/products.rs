use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{
    CategoryId, ProductDescription, ProductName, TypeConstraintError, optional_text,
};
use crate::forms::{ImageFileError, read_image};
use crate::media::MediaFile;
use crate::repository::ProductListQuery;

/// Multipart body shared by product create and update.
#[derive(MultipartForm)]
pub struct ProductForm {
    pub name: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub category_id: Option<Text<String>>,
    pub is_active: Option<Text<String>>,
    #[multipart(limit = "5MiB")]
    pub image: Option<TempFile>,
}

#[derive(Validate)]
struct ProductFields {
    #[validate(length(
        min = 2,
        max = 255,
        message = "Product name must be between 2 and 255 characters"
    ))]
    name: Option<String>,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    description: Option<String>,
}

#[derive(Debug)]
pub struct CreateProductPayload {
    pub name: ProductName,
    pub description: Option<ProductDescription>,
    pub category_id: CategoryId,
    pub is_active: bool,
    pub image: Option<MediaFile>,
}

/// Fields left as `None` keep their current value. `description` is
/// `Some(None)` when the client sent a blank description to clear it.
#[derive(Debug, Default)]
pub struct UpdateProductPayload {
    pub name: Option<ProductName>,
    pub description: Option<Option<ProductDescription>>,
    pub category_id: Option<CategoryId>,
    pub is_active: Option<bool>,
    pub image: Option<MediaFile>,
}

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("Product name is required")]
    MissingName,
    #[error("Category is required")]
    MissingCategory,
    #[error("Category ID must be a positive integer")]
    InvalidCategory,
    #[error("is_active must be true or false")]
    InvalidFlag,
    #[error("Product form validation failed: {0}")]
    Validation(String),
    #[error("Product form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error(transparent)]
    Image(#[from] ImageFileError),
}

impl From<ValidationErrors> for ProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

fn text(field: Option<Text<String>>) -> Option<String> {
    field.map(|t| t.into_inner().trim().to_string())
}

fn parse_category(value: &str) -> Result<CategoryId, ProductFormError> {
    value
        .parse::<i32>()
        .ok()
        .and_then(|id| CategoryId::new(id).ok())
        .ok_or(ProductFormError::InvalidCategory)
}

/// Accepts the usual checkbox and JSON spellings of a boolean.
pub fn parse_flag(value: &str) -> Result<bool, ProductFormError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => Err(ProductFormError::InvalidFlag),
    }
}

impl TryFrom<ProductForm> for CreateProductPayload {
    type Error = ProductFormError;

    fn try_from(value: ProductForm) -> Result<Self, Self::Error> {
        let name = text(value.name).filter(|n| !n.is_empty());
        let description = text(value.description);
        let category = text(value.category_id).filter(|c| !c.is_empty());
        let is_active = text(value.is_active).filter(|f| !f.is_empty());

        let Some(name) = name else {
            return Err(ProductFormError::MissingName);
        };
        let Some(category) = category else {
            return Err(ProductFormError::MissingCategory);
        };

        let fields = ProductFields {
            name: Some(name),
            description,
        };
        fields.validate()?;

        Ok(Self {
            name: ProductName::new(fields.name.unwrap_or_default())?,
            description: optional_text(fields.description, ProductDescription::new)?,
            category_id: parse_category(&category)?,
            is_active: is_active.as_deref().map(parse_flag).transpose()?.unwrap_or(true),
            image: read_image(value.image)?,
        })
    }
}

impl TryFrom<ProductForm> for UpdateProductPayload {
    type Error = ProductFormError;

    fn try_from(value: ProductForm) -> Result<Self, Self::Error> {
        let fields = ProductFields {
            name: text(value.name).filter(|n| !n.is_empty()),
            description: text(value.description),
        };
        fields.validate()?;

        let category_id = text(value.category_id)
            .filter(|c| !c.is_empty())
            .map(|c| parse_category(&c))
            .transpose()?;
        let is_active = text(value.is_active)
            .filter(|f| !f.is_empty())
            .map(|f| parse_flag(&f))
            .transpose()?;

        Ok(Self {
            name: fields.name.map(ProductName::new).transpose()?,
            description: fields
                .description
                .map(|d| optional_text(Some(d), ProductDescription::new))
                .transpose()?,
            category_id,
            is_active,
            image: read_image(value.image)?,
        })
    }
}

/// Query string accepted by the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    pub category_id: Option<i32>,
    pub is_active: Option<String>,
}

impl TryFrom<ProductListParams> for ProductListQuery {
    type Error = ProductFormError;

    fn try_from(value: ProductListParams) -> Result<Self, Self::Error> {
        let mut query = ProductListQuery::default();
        if let Some(category_id) = value.category_id {
            let category_id =
                CategoryId::new(category_id).map_err(|_| ProductFormError::InvalidCategory)?;
            query = query.category(category_id);
        }
        if let Some(flag) = value.is_active.as_deref() {
            query = query.active(parse_flag(flag)?);
        }
        Ok(query)
    }
}
