use std::collections::BTreeMap;

use serde::Serialize;

/// Fixed ranking criteria and their weights. The weights sum to 1.0, so a
/// weighted total always stays inside the 0-5 score range.
pub const CRITERIA_WEIGHTS: [(&str, f64); 7] = [
    ("product_quality", 0.25),
    ("certifications", 0.15),
    ("customer_reviews", 0.20),
    ("price_competitiveness", 0.15),
    ("manufacturing_capabilities", 0.10),
    ("reliability", 0.10),
    ("innovation", 0.05),
];

/// Score assigned to a criterion the model could not evaluate.
pub const NEUTRAL_SCORE: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierRanking {
    pub scores: BTreeMap<String, f64>,
    pub total: f64,
}

pub type RankingResult = BTreeMap<String, SupplierRanking>;

/// Find the first balanced top-level `{...}` object in a model reply.
///
/// Walks brace depth linearly instead of regex-matching a brace span, so
/// nested objects are kept whole and string contents cannot fake a close.
/// An opening brace that never balances yields None.
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in reply[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&reply[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Clean a parsed ranking reply into per-criterion scores and a weighted
/// total. Suppliers whose entry is not an object are skipped; criteria the
/// model skipped or mistyped fall back to the neutral score; criteria it
/// invented are dropped.
pub fn normalize_ranking(raw: &serde_json::Value) -> RankingResult {
    let mut result = RankingResult::new();

    let entries = match raw.as_object() {
        Some(entries) => entries,
        None => return result,
    };

    for (supplier, scores) in entries {
        let scores = match scores.as_object() {
            Some(scores) => scores,
            None => continue,
        };

        let mut cleaned: BTreeMap<String, f64> = BTreeMap::new();
        for (criterion, _) in CRITERIA_WEIGHTS.iter() {
            let score = scores
                .get(*criterion)
                .and_then(|value| value.as_f64())
                .map(|score| score.clamp(0.0, 5.0))
                .unwrap_or(NEUTRAL_SCORE);
            cleaned.insert(criterion.to_string(), score);
        }

        let weighted_total: f64 = CRITERIA_WEIGHTS
            .iter()
            .map(|(criterion, weight)| cleaned[*criterion] * weight)
            .sum();
        let total = (weighted_total * 10.0).round() / 10.0;

        result.insert(
            supplier.clone(),
            SupplierRanking {
                scores: cleaned,
                total,
            },
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{extract_json_object, normalize_ranking, CRITERIA_WEIGHTS};

    #[test]
    fn single_scored_criterion_weights_against_neutral_rest() {
        let raw = json!({ "SupplierA": { "product_quality": 5 } });
        let result = normalize_ranking(&raw);

        let ranking = result.get("SupplierA").unwrap();
        assert_eq!(ranking.scores["product_quality"], 5.0);
        for (criterion, _) in CRITERIA_WEIGHTS.iter() {
            if *criterion != "product_quality" {
                assert_eq!(ranking.scores[*criterion], 3.0);
            }
        }
        assert_eq!(ranking.total, 3.5);
    }

    #[test]
    fn scores_are_clamped_into_range() {
        let raw = json!({
            "Overrated Ltd": { "product_quality": 10, "customer_reviews": 99 },
            "Underrated Ltd": { "reliability": -5 },
        });
        let result = normalize_ranking(&raw);

        let overrated = result.get("Overrated Ltd").unwrap();
        assert_eq!(overrated.scores["product_quality"], 5.0);
        assert_eq!(overrated.scores["customer_reviews"], 5.0);
        assert_eq!(overrated.total, 3.9);

        let underrated = result.get("Underrated Ltd").unwrap();
        assert_eq!(underrated.scores["reliability"], 0.0);
        assert_eq!(underrated.total, 2.7);
    }

    #[test]
    fn non_numeric_scores_fall_back_to_neutral() {
        let raw = json!({ "SupplierA": { "product_quality": "excellent" } });
        let result = normalize_ranking(&raw);

        let ranking = result.get("SupplierA").unwrap();
        assert_eq!(ranking.scores["product_quality"], 3.0);
        assert_eq!(ranking.total, 3.0);
    }

    #[test]
    fn invented_criteria_are_dropped() {
        let raw = json!({ "SupplierA": { "customer_reviews": 4, "brand_power": 5 } });
        let result = normalize_ranking(&raw);

        let ranking = result.get("SupplierA").unwrap();
        assert_eq!(ranking.scores.len(), CRITERIA_WEIGHTS.len());
        assert!(!ranking.scores.contains_key("brand_power"));
        assert_eq!(ranking.total, 3.2);
    }

    #[test]
    fn non_object_supplier_entries_are_skipped() {
        let raw = json!({ "SupplierA": 4, "SupplierB": { "innovation": 2 } });
        let result = normalize_ranking(&raw);

        assert!(!result.contains_key("SupplierA"));
        assert!(result.contains_key("SupplierB"));
    }

    #[test]
    fn totals_stay_within_score_range() {
        let raw = json!({
            "Best": {
                "product_quality": 99, "certifications": 99, "customer_reviews": 99,
                "price_competitiveness": 99, "manufacturing_capabilities": 99,
                "reliability": 99, "innovation": 99,
            },
            "Worst": {
                "product_quality": -99, "certifications": -99, "customer_reviews": -99,
                "price_competitiveness": -99, "manufacturing_capabilities": -99,
                "reliability": -99, "innovation": -99,
            },
        });
        let result = normalize_ranking(&raw);

        assert_eq!(result.get("Best").unwrap().total, 5.0);
        assert_eq!(result.get("Worst").unwrap().total, 0.0);
    }

    #[test]
    fn extracts_object_embedded_in_prose() {
        let reply = r#"Here is the ranking you asked for: {"Acme": {"reliability": 4}} hope it helps"#;

        assert_eq!(
            extract_json_object(reply),
            Some(r#"{"Acme": {"reliability": 4}}"#)
        );
    }

    #[test]
    fn extraction_is_depth_aware_for_nested_objects() {
        let reply = r#"{"Acme": {"scores": {"reliability": 4}}} trailing {unrelated}"#;

        assert_eq!(
            extract_json_object(reply),
            Some(r#"{"Acme": {"scores": {"reliability": 4}}}"#)
        );
    }

    #[test]
    fn braces_inside_strings_do_not_close_the_object() {
        let reply = r#"{"Acme": "has a } in its notes"}"#;

        assert_eq!(extract_json_object(reply), Some(reply));
    }

    #[test]
    fn unbalanced_object_yields_none() {
        assert_eq!(extract_json_object(r#"{"Acme": {"reliability": 4}"#), None);
    }

    #[test]
    fn reply_without_braces_yields_none() {
        assert_eq!(extract_json_object("no structured output here"), None);
    }
}
