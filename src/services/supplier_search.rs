use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::supplier::{
    company_name_from_url, extract_emails, extract_phones, Supplier, CONTENT_PROTECTED, NOT_RANKED,
};

use super::html_to_text;

const SEARCH_API_URL: &str = "https://serpapi.com/search";
const SHALLOW_SCRAPE_TIMEOUT: Duration = Duration::from_secs(10);
const POLITENESS_DELAY: Duration = Duration::from_secs(2);

#[derive(Serialize)]
struct SearchQuery {
    engine: String,
    q: String,
    num: u8,
    api_key: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Deserialize)]
struct OrganicResult {
    link: String,
}

/// Turn an industry/category/location query into supplier rows: search for
/// candidate links, then shallow-scrape each one for contact signals. Links
/// that fail to scrape are logged and skipped.
pub async fn search_for_suppliers(
    industry: &str,
    category: &str,
    location: &str,
    num_results: u8,
    api_key: &str,
) -> Vec<Supplier> {
    let links = match fetch_supplier_links(industry, category, location, num_results, api_key).await
    {
        Ok(links) => links,
        Err(e) => {
            log::error!("Error fetching search results: {:?}", e);
            return vec![];
        }
    };

    if links.is_empty() {
        log::warn!("No results found for {} in {}", category, location);
        return vec![];
    }

    let mut suppliers: Vec<Supplier> = vec![];
    for link in links {
        match scrape_supplier_contact(category, &link).await {
            Ok(supplier) => suppliers.push(supplier),
            Err(e) => log::warn!("Error scraping {}: {:?}", link, e),
        }
        tokio::time::sleep(POLITENESS_DELAY).await;
    }

    suppliers
}

async fn fetch_supplier_links(
    industry: &str,
    category: &str,
    location: &str,
    num_results: u8,
    api_key: &str,
) -> anyhow::Result<Vec<String>> {
    let query = SearchQuery {
        engine: "google".to_string(),
        q: format!("{} {} suppliers in {}", industry, category, location),
        num: num_results,
        api_key: api_key.to_string(),
    };

    let client = reqwest::Client::new();
    let response = client
        .get(SEARCH_API_URL)
        .query(&query)
        .send()
        .await?
        .error_for_status()?;
    let data: SearchResponse = response.json().await?;

    Ok(data
        .organic_results
        .into_iter()
        .take(num_results as usize)
        .map(|result| result.link)
        .collect())
}

async fn scrape_supplier_contact(category: &str, link: &str) -> anyhow::Result<Supplier> {
    let client = reqwest::Client::builder()
        .timeout(SHALLOW_SCRAPE_TIMEOUT)
        .build()?;
    let body = client.get(link).send().await?.text().await?;
    let text = html_to_text(&body);

    let emails = extract_emails(&text);
    let phones = extract_phones(&text);

    Ok(Supplier {
        category: category.to_string(),
        name: company_name_from_url(link),
        website: link.to_string(),
        email: emails
            .into_iter()
            .next()
            .unwrap_or_else(|| CONTENT_PROTECTED.to_string()),
        phone: phones
            .into_iter()
            .next()
            .unwrap_or_else(|| CONTENT_PROTECTED.to_string()),
        ranking: NOT_RANKED.to_string(),
    })
}
