use std::net::TcpListener;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};
use tokio::sync::Mutex;

use crate::{
    configuration::Settings,
    routes::{default_route, search_route, supplier_route},
    services::{ExtractionCache, OpenaiClient},
};

pub fn run(
    listener: TcpListener,
    settings: Settings,
    openai_client: OpenaiClient,
    extraction_cache: Mutex<ExtractionCache>,
) -> Result<Server, std::io::Error> {
    let settings = web::Data::new(settings);
    let openai_client = web::Data::new(openai_client);
    let extraction_cache = web::Data::new(extraction_cache);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::default)
            .service(web::scope("/search").service(search_route::search_suppliers))
            .service(
                web::scope("/supplier")
                    .service(supplier_route::supplier_details)
                    .service(supplier_route::rank_supplier)
                    .service(supplier_route::chat),
            )
            .app_data(settings.clone())
            .app_data(openai_client.clone())
            .app_data(extraction_cache.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
