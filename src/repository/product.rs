use chrono::Utc;
use diesel::prelude::*;

use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::domain::types::ProductId;
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, ProductChangeset,
};
use crate::repository::{
    DieselRepository, ProductListQuery, ProductReader, ProductWriter, RepositoryResult,
};

impl ProductReader for DieselRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>> {
        use crate::schema::{categories, products};

        let mut conn = self.conn()?;

        let mut items = products::table
            .inner_join(categories::table)
            .select((products::all_columns, categories::name))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(category_id) = query.category_id {
            items = items.filter(products::category_id.eq(category_id.get()));
        }

        if let Some(is_active) = query.is_active {
            items = items.filter(products::is_active.eq(is_active));
        }

        let items = items
            .order((products::created_at.desc(), products::id.desc()))
            .load::<(DbProduct, String)>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;

        Ok(items)
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        use crate::schema::{categories, products};

        let mut conn = self.conn()?;

        let product = products::table
            .inner_join(categories::table)
            .filter(products::id.eq(id.get()))
            .select((products::all_columns, categories::name))
            .first::<(DbProduct, String)>(&mut conn)
            .optional()?;

        let product = product.map(TryInto::try_into).transpose()?;
        Ok(product)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::{categories, products};

        let mut conn = self.conn()?;
        let db_product: DbNewProduct = product.clone().into();

        let created = diesel::insert_into(products::table)
            .values(db_product)
            .get_result::<DbProduct>(&mut conn)?;
        let category_name = categories::table
            .filter(categories::id.eq(created.category_id))
            .select(categories::name)
            .first::<String>(&mut conn)?;

        Ok((created, category_name).try_into()?)
    }

    fn update_product(&self, id: ProductId, patch: &ProductPatch) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let changeset = ProductChangeset::new(patch.clone(), Utc::now().naive_utc());

        let affected = diesel::update(products::table.filter(products::id.eq(id.get())))
            .set(changeset)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let affected = diesel::delete(products::table.filter(products::id.eq(id.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
