use tokio::sync::Mutex;

use crate::domain::section::format_llm_reply;

use super::{
    fetch_webpage_text, DeepScrapeRecord, ExtractionCache, OpenaiClient, DEFAULT_MAX_RETRIES,
};

/// Page text beyond this many characters is not sent to the model.
pub const PROMPT_TEXT_LIMIT: usize = 5000;

pub const NO_DATA_EXTRACTED: &str = "No data extracted. The website might be blocking requests.";

pub fn truncate_for_prompt(text: &str) -> &str {
    match text.char_indices().nth(PROMPT_TEXT_LIMIT) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn build_extraction_prompt(page_text: &str) -> String {
    format!(
        "Extract and analyze details from this text: {}. \
        If multiple suppliers are mentioned, list each separately with their details. \
        Provide the output in a structured format with the following sections:\n\
        - Phone Number: List any phone numbers found.\n\
        - Email: List any email addresses found.\n\
        - Supplier Details: Include company name, address, or contact person if mentioned; if multiple suppliers, list each separately.\n\
        - Location: Specify the specific location of the supplier if available; if not, state 'Not specified in the text.'\n\
        - Product Pricing: List prices of products mentioned.\n\
        - ISO Certifications: Specify any ISO certifications if present; if none, state 'No ISO certifications mentioned.'\n\
        - Manufacturing Process Summary: Summarize specific manufacturing process details if available; if not, state 'PLEASE CONTACT THE SUPPLIER FOR DETAILS'.",
        page_text
    )
}

pub fn build_summary_prompt(page_text: &str) -> String {
    format!(
        "Summarize the following text in 200 words or less: {}",
        page_text
    )
}

/// Run the deep extraction pipeline for one URL: fetch, prompt the model for
/// labeled sections, fold the reply into canonical text, and summarize.
///
/// Results are memoized per URL. Holding the cache lock across the whole
/// computation keeps concurrent callers for the same uncached URL from each
/// paying for their own model calls; they wait and take the cached record.
/// Failures return a sentinel record and are not cached.
pub async fn deep_scrape_website(
    url: &str,
    extraction_cache: &Mutex<ExtractionCache>,
    openai_client: &OpenaiClient,
) -> DeepScrapeRecord {
    let mut cache = extraction_cache.lock().await;

    let computed = cache
        .get_or_compute(url, || async move {
            let page_text = fetch_webpage_text(url, DEFAULT_MAX_RETRIES).await.into_text()?;
            let truncated = truncate_for_prompt(&page_text);

            let reply = match openai_client
                .chat_about_supplier(&build_extraction_prompt(truncated), truncated)
                .await
            {
                Ok(reply) => reply,
                Err(e) => {
                    log::error!("OpenAI API error extracting {}: {:?}", url, e);
                    return None;
                }
            };
            let formatted_text = format_llm_reply(&reply);

            let summary = match openai_client
                .chat_about_supplier(&build_summary_prompt(truncated), truncated)
                .await
            {
                Ok(summary) => Some(summary),
                Err(e) => {
                    log::error!("OpenAI API error summarizing {}: {:?}", url, e);
                    None
                }
            };

            Some(DeepScrapeRecord {
                formatted_text,
                summary,
            })
        })
        .await;

    match computed {
        Some(record) => record,
        None => DeepScrapeRecord {
            formatted_text: NO_DATA_EXTRACTED.to_string(),
            summary: None,
        },
    }
}
