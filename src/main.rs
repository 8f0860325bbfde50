use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;

use pushkind_storefront::db::{establish_connection_pool, run_migrations};
use pushkind_storefront::media::MediaStore;
use pushkind_storefront::media::cloudinary::CloudinaryClient;
use pushkind_storefront::models::config::ServerConfig;
use pushkind_storefront::repository::DieselRepository;
use pushkind_storefront::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load server config: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run database migrations: {e}");
        std::process::exit(1);
    }

    let media_store: Arc<dyn MediaStore> =
        match CloudinaryClient::new(server_config.media_store.clone()) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                log::error!("Failed to configure media store: {e}");
                std::process::exit(1);
            }
        };
    let media_store = web::Data::from(media_store);

    let repo = web::Data::new(DieselRepository::new(pool));
    let bind_address = server_config.bind_address();
    let server_config = web::Data::new(server_config);

    log::info!(
        "Starting storefront API on {}:{} ({})",
        bind_address.0,
        bind_address.1,
        server_config.environment
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(repo.clone())
            .app_data(media_store.clone())
            .app_data(server_config.clone())
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
