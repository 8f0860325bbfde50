use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::NewCategory;
use crate::domain::types::{
    CategoryDescription, CategoryName, TypeConstraintError, optional_text,
};

/// JSON body accepted by category create and update.
#[derive(Deserialize, Validate)]
pub struct CategoryForm {
    #[serde(default)]
    #[validate(length(
        min = 2,
        max = 100,
        message = "Category name must be between 2 and 100 characters"
    ))]
    pub name: String,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFormPayload {
    pub name: CategoryName,
    pub description: Option<CategoryDescription>,
}

impl CategoryFormPayload {
    pub fn into_new_category(self) -> NewCategory {
        let now = Utc::now().naive_utc();
        NewCategory {
            name: self.name,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("Category name is required")]
    MissingName,
    #[error("Category form validation failed: {0}")]
    Validation(String),
    #[error("Category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CategoryForm> for CategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        let form = CategoryForm {
            name: value.name.trim().to_string(),
            description: value.description.map(|d| d.trim().to_string()),
        };
        if form.name.is_empty() {
            return Err(CategoryFormError::MissingName);
        }
        form.validate()?;

        Ok(Self {
            name: CategoryName::new(form.name)?,
            description: optional_text(form.description, CategoryDescription::new)?,
        })
    }
}
