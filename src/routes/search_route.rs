use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::{
    configuration::Settings,
    services::{append_suppliers, search_for_suppliers},
};

const SUPPLIERS_CSV_PATH: &str = "suppliers.csv";

fn default_num_results() -> u8 {
    5
}

#[derive(Deserialize)]
pub struct SearchSuppliersQuery {
    industry: String,
    category: String,
    location: String,
    #[serde(default = "default_num_results")]
    num_results: u8,
}

#[get("")]
pub async fn search_suppliers(
    settings: web::Data<Settings>,
    query: web::Query<SearchSuppliersQuery>,
) -> HttpResponse {
    let suppliers = search_for_suppliers(
        &query.industry,
        &query.category,
        &query.location,
        query.num_results,
        &settings.api_keys.serpapi,
    )
    .await;

    if let Err(e) = append_suppliers(SUPPLIERS_CSV_PATH, &suppliers) {
        log::error!("Error saving to CSV: {:?}", e);
    }

    HttpResponse::Ok().json(suppliers)
}
