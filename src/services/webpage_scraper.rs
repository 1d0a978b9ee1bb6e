use std::time::Duration;

use scraper::Html;

pub const DEFAULT_MAX_RETRIES: u8 = 3;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const BLOCKED_BACKOFF: Duration = Duration::from_secs(5);
const TRANSPORT_BACKOFF: Duration = Duration::from_secs(3);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, PartialEq)]
pub enum PageFetchResult {
    Text { text: String, attempts: u8 },
    HardFailure { status: u16 },
    RetriesExhausted { attempts: u8 },
}

impl PageFetchResult {
    pub fn into_text(self) -> Option<String> {
        match self {
            PageFetchResult::Text { text, .. } => Some(text),
            PageFetchResult::HardFailure { .. } => None,
            PageFetchResult::RetriesExhausted { .. } => None,
        }
    }
}

/// Fetch a page and strip its markup. A 403 or 429 counts as a block signal
/// and is retried after a long pause; transport errors are retried after a
/// short one; any other non-200 status fails the fetch outright.
pub async fn fetch_webpage_text(url: &str, max_retries: u8) -> PageFetchResult {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap();

    let mut attempts = 0;

    while attempts < max_retries {
        attempts += 1;

        match client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status().as_u16();
                match status {
                    200 => match response.text().await {
                        Ok(body) => {
                            return PageFetchResult::Text {
                                text: html_to_text(&body),
                                attempts,
                            }
                        }
                        Err(e) => {
                            log::warn!("Failed to read body from {}. Error: {:?}", url, e);
                            tokio::time::sleep(TRANSPORT_BACKOFF).await;
                        }
                    },
                    403 | 429 => {
                        log::warn!(
                            "Access denied for {} with status {}. Retrying... ({}/{})",
                            url,
                            status,
                            attempts,
                            max_retries
                        );
                        tokio::time::sleep(BLOCKED_BACKOFF).await;
                    }
                    _ => {
                        log::error!("Failed with status code {} for {}", status, url);
                        return PageFetchResult::HardFailure { status };
                    }
                }
            }
            Err(e) => {
                log::warn!(
                    "Error: {:?}. Retrying in {} seconds...",
                    e,
                    TRANSPORT_BACKOFF.as_secs()
                );
                tokio::time::sleep(TRANSPORT_BACKOFF).await;
            }
        }
    }

    log::error!("Failed to retrieve {} after {} attempts.", url, max_retries);
    PageFetchResult::RetriesExhausted { attempts }
}

/// Collect the text nodes of an HTML document into one plain string.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .root_element()
        .text()
        .map(|node| node.trim())
        .filter(|node| !node.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{html_to_text, PageFetchResult};

    #[test]
    fn html_markup_is_stripped() {
        let html = "<html><body><h1>Acme Forge</h1><p>Precision <b>castings</b> since 1968</p></body></html>";
        let text = html_to_text(html);

        assert_eq!(text, "Acme Forge Precision castings since 1968");
    }

    #[test]
    fn only_successful_fetches_carry_text() {
        let fetched = PageFetchResult::Text {
            text: "hello".to_string(),
            attempts: 1,
        };
        assert_eq!(fetched.into_text(), Some("hello".to_string()));

        assert_eq!(PageFetchResult::HardFailure { status: 500 }.into_text(), None);
        assert_eq!(PageFetchResult::RetriesExhausted { attempts: 3 }.into_text(), None);
    }
}
