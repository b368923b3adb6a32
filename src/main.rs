use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use bikestores::config::ServerConfig;
use bikestores::db::{build_connection_pool, run_migrations};
use bikestores::repository::DieselRepository;
use bikestores::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = ServerConfig::from_env();

    let pool = match build_connection_pool(&config.database_url, config.pool_size) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    match pool.get() {
        Ok(mut conn) => {
            if let Err(e) = run_migrations(&mut conn) {
                log::error!("Failed to run migrations: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            log::error!("Failed to get a database connection: {e}");
            std::process::exit(1);
        }
    }

    let repo = DieselRepository::new(pool);

    log::info!(
        "Serving {} on {}:{}",
        config.database_url,
        config.address,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
            .app_data(web::Data::new(repo.clone()))
    })
    .bind((config.address, config.port))?
    .run()
    .await
}
