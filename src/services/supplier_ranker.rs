use crate::domain::ranking::{extract_json_object, normalize_ranking, RankingResult};

use super::{truncate_for_prompt, OpenaiClient};

pub fn build_ranking_prompt(page_text: &str) -> String {
    format!(
        "Based on the following supplier information, rank them numerically from best to worst considering \
        the following criteria: product quality (consistency, durability), certifications (ISO, industry standards), \
        customer reviews (sentiment and volume, if available), price competitiveness (relative to market), \
        manufacturing capabilities (scale, technology), reliability (delivery consistency, uptime), and innovation \
        (R&D, patents, technology adoption). Provide structured JSON output ONLY with supplier names as keys and \
        their respective ranking scores out of 5 for each category. If a criterion cannot be evaluated due to missing \
        data, assign a neutral score of 3. Ensure the response is strictly valid JSON with no additional text.\n\n\
        Supplier Info: {}",
        truncate_for_prompt(page_text)
    )
}

/// Ask the model to score the suppliers described in `raw_text`, then clean
/// its reply into weighted rankings. Any failure along the way (provider
/// error, no JSON in the reply, malformed JSON, no usable entries) is logged
/// and yields None; partial rankings are never returned.
pub async fn rank_suppliers(raw_text: &str, openai_client: &OpenaiClient) -> Option<RankingResult> {
    let reply = match openai_client
        .chat_about_supplier(&build_ranking_prompt(raw_text), "")
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            log::error!("OpenAI API error ranking suppliers: {:?}", e);
            return None;
        }
    };

    let json_text = match extract_json_object(&reply) {
        Some(json_text) => json_text,
        None => {
            log::error!("No valid JSON found in ranking response.");
            return None;
        }
    };

    let parsed: serde_json::Value = match serde_json::from_str(json_text) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::error!("Unable to parse JSON from ranking response: {:?}", e);
            return None;
        }
    };

    let ranking = normalize_ranking(&parsed);
    match ranking.is_empty() {
        true => {
            log::error!("Ranking response contained no supplier entries.");
            None
        }
        false => Some(ranking),
    }
}

#[cfg(test)]
mod tests {
    use super::build_ranking_prompt;
    use crate::services::PROMPT_TEXT_LIMIT;

    #[test]
    fn ranking_prompt_demands_strict_json_and_neutral_fallback() {
        let prompt = build_ranking_prompt("supplier info");

        assert!(prompt.contains("strictly valid JSON"));
        assert!(prompt.contains("assign a neutral score of 3"));
        assert!(prompt.ends_with("Supplier Info: supplier info"));
    }

    #[test]
    fn ranking_prompt_truncates_long_input() {
        let text = "b".repeat(PROMPT_TEXT_LIMIT * 2);
        let prompt = build_ranking_prompt(&text);

        assert!(prompt.len() < text.len());
    }
}
