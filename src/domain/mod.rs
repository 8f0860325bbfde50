pub mod category;
pub mod media_asset;
pub mod product;
pub mod types;
