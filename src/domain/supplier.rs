use regex::Regex;
use serde::Serialize;
use url::Url;

/// Marketplaces whose listing pages describe many suppliers at once.
pub const MULTI_SUPPLIER_SITES: [&str; 5] = [
    "alibaba.com",
    "thomasnet.com",
    "indiamart.com",
    "made-in-china.com",
    "globalsources.com",
];

pub const CONTENT_PROTECTED: &str = "[content protected]";
pub const NOT_RANKED: &str = "Not Ranked";

#[derive(Debug, Clone, Serialize)]
pub struct Supplier {
    pub category: String,
    pub name: String,
    pub website: String,
    pub email: String,
    pub phone: String,
    pub ranking: String,
}

/// Derive a display name from a supplier link: the first label of the host,
/// tagged when the link points at a multi-supplier marketplace.
pub fn company_name_from_url(url: &str) -> String {
    let host = match Url::parse(url) {
        Ok(parsed) => parsed.host_str().map(|host| host.to_string()),
        Err(_) => None,
    };
    let host = host.unwrap_or_else(|| {
        url.trim_start_matches("https://")
            .trim_start_matches("http://")
            .to_string()
    });
    let host = match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    };

    let domain = match host.split(['.', '/']).next() {
        Some(label) => label.to_string(),
        None => host,
    };

    let marketplace = MULTI_SUPPLIER_SITES
        .iter()
        .any(|site| url.to_lowercase().contains(site));

    match marketplace {
        true => format!("{} (Multiple Suppliers Found)", domain),
        false => domain,
    }
}

pub fn extract_emails(text: &str) -> Vec<String> {
    let email_regex = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap();
    email_regex
        .find_iter(text)
        .map(|found| found.as_str().to_string())
        .collect()
}

pub fn extract_phones(text: &str) -> Vec<String> {
    let phone_regex = Regex::new(r"\+?\d[\d -]{8,}\d").unwrap();
    phone_regex
        .find_iter(text)
        .map(|found| found.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{company_name_from_url, extract_emails, extract_phones};

    #[test]
    fn company_name_from_plain_supplier_url() {
        let result = company_name_from_url("https://www.acmeforge.com/products/crankshafts");

        assert_eq!(result, "acmeforge");
    }

    #[test]
    fn company_name_tags_marketplace_urls() {
        let result = company_name_from_url("https://dir.indiamart.com/indianexporters/m_automobile.html");

        assert_eq!(result, "dir (Multiple Suppliers Found)");
    }

    #[test]
    fn company_name_without_scheme() {
        let result = company_name_from_url("znaturalfoods.com/products/green-tea");

        assert_eq!(result, "znaturalfoods");
    }

    #[test]
    fn extracts_emails_from_page_text() {
        let text = "Reach sales at sales@acme-forge.com or support.eu@acme-forge.co.uk today";
        let results = extract_emails(text);

        assert_eq!(results, vec!["sales@acme-forge.com", "support.eu@acme-forge.co.uk"]);
    }

    #[test]
    fn extracts_phone_numbers_from_page_text() {
        let text = "Call +86 21 5555 0199 for quotes";
        let results = extract_phones(text);

        assert_eq!(results, vec!["+86 21 5555 0199"]);
    }

    #[test]
    fn no_contacts_found_yields_empty_lists() {
        assert!(extract_emails("nothing to see").is_empty());
        assert!(extract_phones("nothing to see").is_empty());
    }
}
