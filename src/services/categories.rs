use crate::domain::category::Category;
use crate::domain::types::{CategoryId, RemoteId};
use crate::forms::categories::CategoryFormPayload;
use crate::media::{Cleanup, MediaStore, remove_best_effort};
use crate::repository::{
    CategoryReader, CategoryWriter, ProductListQuery, ProductReader, RepositoryError,
};

use super::{ServiceError, ServiceResult};

/// Outcome of deleting a category together with its products.
#[derive(Debug)]
pub struct CategoryRemoval {
    pub id: CategoryId,
    pub removed_products: usize,
    /// One entry per product image that had a remote object.
    pub cleanups: Vec<Cleanup>,
}

fn duplicate_name(e: RepositoryError) -> ServiceError {
    match e {
        RepositoryError::ConstraintViolation(_) => {
            ServiceError::Conflict("Category with this name already exists".to_string())
        }
        other => {
            log::error!("Failed to save category: {other}");
            ServiceError::from(other)
        }
    }
}

fn find_category<R>(category_id: i32, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader,
{
    let category_id = CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::from(e))
        }
    }
}

pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader,
{
    repo.list_categories().map_err(|e| {
        log::error!("Failed to list categories: {e}");
        ServiceError::from(e)
    })
}

pub fn create_category<R>(payload: CategoryFormPayload, repo: &R) -> ServiceResult<Category>
where
    R: CategoryWriter,
{
    let category = repo
        .create_category(&payload.into_new_category())
        .map_err(duplicate_name)?;
    log::info!("Created category {}", category.id);
    Ok(category)
}

pub fn update_category<R>(
    category_id: i32,
    payload: CategoryFormPayload,
    repo: &R,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
{
    let category = find_category(category_id, repo)?;

    match repo.update_category(category.id, &payload.name, payload.description.as_ref()) {
        Ok(0) => return Err(ServiceError::NotFound),
        Ok(_) => log::info!("Updated category {}", category.id),
        Err(e) => return Err(duplicate_name(e)),
    }

    find_category(category.id.get(), repo)
}

/// Deletes a category and its products.
///
/// The rows go first, in one transaction; the products' remote images are
/// then removed best-effort.
pub async fn delete_category<R, S>(
    category_id: i32,
    repo: &R,
    store: &S,
) -> ServiceResult<CategoryRemoval>
where
    R: CategoryReader + CategoryWriter + ProductReader,
    S: MediaStore + ?Sized,
{
    let category = find_category(category_id, repo)?;

    let products = match repo.list_products(ProductListQuery::default().category(category.id)) {
        Ok(products) => products,
        Err(e) => {
            log::error!("Failed to list category products: {e}");
            return Err(ServiceError::from(e));
        }
    };
    let remote_ids: Vec<RemoteId> = products
        .iter()
        .filter_map(|p| p.image.as_ref().and_then(|i| i.remote_id.clone()))
        .collect();

    if let Err(e) = repo.delete_category(category.id) {
        log::error!("Failed to delete category: {e}");
        return Err(ServiceError::from(e));
    }
    log::info!(
        "Deleted category {} with {} products",
        category.id,
        products.len()
    );

    let mut cleanups = Vec::with_capacity(remote_ids.len());
    for remote_id in &remote_ids {
        cleanups.push(remove_best_effort(store, Some(remote_id)).await);
    }

    Ok(CategoryRemoval {
        id: category.id,
        removed_products: products.len(),
        cleanups,
    })
}
