use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::info;

use crate::config::Config;
use crate::errors::ApiError;

mod claims;
mod config;
mod db;
mod errors;
mod helpers;
mod middleware;
mod models;
mod routes;
mod schema;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidstream_api=debug,actix_web=info".into()),
        )
        .init();

    let config = Config::from_env();
    let pool = db::init_pool(&config.database_url);
    let bind_addr = config.bind_addr.clone();

    let config = web::Data::new(config);
    let pool = web::Data::new(pool);

    info!("Listening on {}", bind_addr);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        // Malformed or missing JSON bodies get the same {message} shape as
        // every other validation failure.
        let json_config = web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into());

        App::new()
            .wrap(cors)
            .app_data(config.clone())
            .app_data(pool.clone())
            .app_data(json_config)
            .service(
                web::scope("/auth")
                    .service(routes::auth::register)
                    .service(routes::auth::login),
            )
            .service(
                web::scope("/channels")
                    .service(routes::channels::my_channels)
                    .service(routes::channels::create_channel)
                    .service(routes::channels::get_channel)
                    .service(routes::channels::update_channel),
            )
            .service(
                web::scope("/videos")
                    .service(routes::videos::list_videos)
                    .service(routes::videos::create_video)
                    .service(routes::videos::like_video)
                    .service(routes::videos::dislike_video)
                    .service(routes::videos::get_video)
                    .service(routes::videos::update_video)
                    .service(routes::videos::delete_video),
            )
            .service(
                web::scope("/comments")
                    .service(routes::comments::list_comments)
                    .service(routes::comments::create_comment)
                    .service(routes::comments::update_comment)
                    .service(routes::comments::delete_comment),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
