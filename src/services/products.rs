use chrono::Utc;

use crate::domain::product::{NewProduct, Product, ProductImage, ProductPatch};
use crate::domain::types::{CategoryId, ProductId, RemoteId};
use crate::forms::products::{CreateProductPayload, UpdateProductPayload};
use crate::media::{Cleanup, MediaFile, MediaStore, StoredMedia, remove_best_effort};
use crate::repository::{CategoryReader, ProductListQuery, ProductReader, ProductWriter};

use super::{ServiceError, ServiceResult, WithCleanup};

pub fn list_products<R>(query: ProductListQuery, repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader,
{
    repo.list_products(query).map_err(|e| {
        log::error!("Failed to list products: {e}");
        ServiceError::from(e)
    })
}

pub fn get_product<R>(product_id: i32, repo: &R) -> ServiceResult<Product>
where
    R: ProductReader,
{
    let product_id = ProductId::new(product_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => Ok(product),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            Err(ServiceError::from(e))
        }
    }
}

fn ensure_category<R>(category_id: CategoryId, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader,
{
    match repo.get_category_by_id(category_id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ServiceError::Form("Category does not exist".to_string())),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::from(e))
        }
    }
}

fn ensure_not_empty(file: &MediaFile) -> ServiceResult<()> {
    if file.is_empty() {
        Err(ServiceError::Form("Uploaded image is empty".to_string()))
    } else {
        Ok(())
    }
}

async fn upload<S>(file: &MediaFile, hint: &str, store: &S) -> ServiceResult<StoredMedia>
where
    S: MediaStore + ?Sized,
{
    store.upload(file, hint).await.map_err(|e| {
        log::error!("Failed to upload product image: {e}");
        ServiceError::from(e)
    })
}

/// Creates a product, uploading its image first when one is supplied.
///
/// Nothing is written when the category is missing or the upload fails.
pub async fn create_product<R, S>(
    payload: CreateProductPayload,
    repo: &R,
    store: &S,
) -> ServiceResult<Product>
where
    R: CategoryReader + ProductWriter,
    S: MediaStore + ?Sized,
{
    ensure_category(payload.category_id, repo)?;
    if let Some(file) = &payload.image {
        ensure_not_empty(file)?;
    }

    let image = match &payload.image {
        Some(file) => {
            let stored = upload(file, payload.name.as_str(), store).await?;
            Some(ProductImage {
                url: stored.url.into(),
                remote_id: Some(stored.remote_id),
            })
        }
        None => None,
    };

    let now = Utc::now().naive_utc();
    let new_product = NewProduct {
        name: payload.name,
        description: payload.description,
        category_id: payload.category_id,
        image,
        is_active: payload.is_active,
        created_at: now,
        updated_at: now,
    };

    match repo.create_product(&new_product) {
        Ok(product) => {
            log::info!("Created product {}", product.id);
            Ok(product)
        }
        Err(e) => {
            log::error!("Failed to create product: {e}");
            let uploaded = new_product.image.as_ref().and_then(|i| i.remote_id.as_ref());
            remove_best_effort(store, uploaded).await;
            Err(ServiceError::from(e))
        }
    }
}

/// Updates a product, merging unspecified fields with the current row.
///
/// With a new image this runs the replace sequence: the old remote object is
/// removed best-effort, then the new file is uploaded. An upload failure
/// aborts before the row is touched. All columns, image included, are then
/// written in one update.
pub async fn update_product<R, S>(
    product_id: i32,
    payload: UpdateProductPayload,
    repo: &R,
    store: &S,
) -> ServiceResult<WithCleanup<Product>>
where
    R: CategoryReader + ProductReader + ProductWriter,
    S: MediaStore + ?Sized,
{
    let current = get_product(product_id, repo)?;

    if let Some(category_id) = payload.category_id.filter(|id| *id != current.category_id) {
        ensure_category(category_id, repo)?;
    }
    if let Some(file) = &payload.image {
        ensure_not_empty(file)?;
    }

    let name = payload.name.unwrap_or_else(|| current.name.clone());

    let (image, cleanup, uploaded): (Option<ProductImage>, Cleanup, Option<RemoteId>) =
        match &payload.image {
            Some(file) => {
                let old_remote_id = current.image.as_ref().and_then(|i| i.remote_id.as_ref());
                let cleanup = remove_best_effort(store, old_remote_id).await;
                let stored = upload(file, name.as_str(), store).await?;
                let image = ProductImage {
                    url: stored.url.into(),
                    remote_id: Some(stored.remote_id.clone()),
                };
                (Some(image), cleanup, Some(stored.remote_id))
            }
            None => (current.image.clone(), Cleanup::NotNeeded, None),
        };

    let patch = ProductPatch {
        name,
        description: payload.description.unwrap_or(current.description),
        category_id: payload.category_id.unwrap_or(current.category_id),
        image,
        is_active: payload.is_active.unwrap_or(current.is_active),
    };

    let result = match repo.update_product(current.id, &patch) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to update product: {e}");
            Err(ServiceError::from(e))
        }
    };
    if let Err(e) = result {
        remove_best_effort(store, uploaded.as_ref()).await;
        return Err(e);
    }

    log::info!("Updated product {}", current.id);
    let product = get_product(current.id.get(), repo)?;
    Ok(WithCleanup::new(product, cleanup))
}

/// Deletes a product and, best-effort, its remote image.
pub async fn delete_product<R, S>(
    product_id: i32,
    repo: &R,
    store: &S,
) -> ServiceResult<WithCleanup<ProductId>>
where
    R: ProductReader + ProductWriter,
    S: MediaStore + ?Sized,
{
    let product = get_product(product_id, repo)?;

    let remote_id = product.image.as_ref().and_then(|i| i.remote_id.as_ref());
    let cleanup = remove_best_effort(store, remote_id).await;

    match repo.delete_product(product.id) {
        Ok(_) => {
            log::info!("Deleted product {}", product.id);
            Ok(WithCleanup::new(product.id, cleanup))
        }
        Err(e) => {
            log::error!("Failed to delete product: {e}");
            Err(ServiceError::from(e))
        }
    }
}
