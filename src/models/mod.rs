pub mod category;
#[cfg(feature = "server")]
pub mod config;
pub mod media_asset;
pub mod product;
