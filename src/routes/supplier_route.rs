use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::services::{
    deep_scrape_website, fetch_webpage_text, rank_suppliers, ExtractionCache, OpenaiClient,
    DEFAULT_MAX_RETRIES,
};

#[derive(Deserialize)]
pub struct SupplierUrlQuery {
    url: String,
}

#[get("/details")]
pub async fn supplier_details(
    query: web::Query<SupplierUrlQuery>,
    extraction_cache: web::Data<Mutex<ExtractionCache>>,
    openai_client: web::Data<OpenaiClient>,
) -> HttpResponse {
    let record =
        deep_scrape_website(&query.url, extraction_cache.get_ref(), openai_client.get_ref()).await;

    HttpResponse::Ok().json(record)
}

#[get("/rank")]
pub async fn rank_supplier(
    query: web::Query<SupplierUrlQuery>,
    openai_client: web::Data<OpenaiClient>,
) -> HttpResponse {
    let page_text = match fetch_webpage_text(&query.url, DEFAULT_MAX_RETRIES)
        .await
        .into_text()
    {
        Some(page_text) => page_text,
        None => {
            return HttpResponse::Ok()
                .body(format!("No data extracted for {} to rank.", query.url))
        }
    };

    match rank_suppliers(&page_text, openai_client.get_ref()).await {
        Some(ranking) => HttpResponse::Ok().json(ranking),
        None => HttpResponse::Ok().body(format!("Failed to rank {}.", query.url)),
    }
}

#[derive(Deserialize)]
pub struct ChatRequest {
    question: String,
    context: String,
}

#[post("/chat")]
pub async fn chat(
    body: web::Json<ChatRequest>,
    openai_client: web::Data<OpenaiClient>,
) -> HttpResponse {
    match openai_client
        .chat_about_supplier(&body.question, &body.context)
        .await
    {
        Ok(answer) => HttpResponse::Ok().json(serde_json::json!({ "answer": answer })),
        Err(e) => {
            log::error!("OpenAI API error: {:?}", e);
            HttpResponse::Ok()
                .body("Sorry, I couldn't process that request due to an API error.")
        }
    }
}
