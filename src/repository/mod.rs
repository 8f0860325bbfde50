use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory};
use crate::domain::media_asset::{MediaAsset, NewMediaAsset};
use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::domain::types::{
    CategoryDescription, CategoryId, CategoryName, MediaAssetId, ProductId,
};

pub mod category;
pub mod errors;
pub mod media_asset;
pub mod product;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    ///
    /// The connection returns to the pool when the guard is dropped, on
    /// success and error paths alike.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Filter by owning category.
    pub category_id: Option<CategoryId>,
    /// Filter by the active flag.
    pub is_active: Option<bool>,
}

impl ProductListQuery {
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List all categories ordered by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category and return the stored row.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Update category name and description.
    fn update_category(
        &self,
        id: CategoryId,
        name: &CategoryName,
        description: Option<&CategoryDescription>,
    ) -> RepositoryResult<usize>;
    /// Delete a category together with its products.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List products matching the supplied query, newest first.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
}

/// Write operations for product entities.
pub trait ProductWriter {
    /// Persist a new product and return the stored row.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    /// Overwrite all mutable columns of a product in a single statement.
    fn update_product(&self, id: ProductId, patch: &ProductPatch) -> RepositoryResult<usize>;
    /// Delete a product by id.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize>;
}

/// Read-only operations for gallery assets.
pub trait MediaAssetReader {
    /// List all gallery assets, newest first.
    fn list_media_assets(&self) -> RepositoryResult<Vec<MediaAsset>>;
    /// Retrieve a gallery asset by its identifier.
    fn get_media_asset_by_id(&self, id: MediaAssetId) -> RepositoryResult<Option<MediaAsset>>;
}

/// Write operations for gallery assets.
pub trait MediaAssetWriter {
    /// Record an uploaded asset and return the stored row.
    fn create_media_asset(&self, asset: &NewMediaAsset) -> RepositoryResult<MediaAsset>;
    /// Delete a gallery asset by id.
    fn delete_media_asset(&self, id: MediaAssetId) -> RepositoryResult<usize>;
}
