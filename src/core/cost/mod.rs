pub mod log;
pub mod pricing;
pub mod tokens;

use crate::core::cost::log::{round_to, CALLS_PER_DAY};
use crate::core::models::cost::TierEstimate;

/// Price one request of `input_text` plus `output_tokens` under every known
/// tier, cheapest first. `monthly_cost` assumes 30 such calls a day.
pub fn compare_tiers(input_text: &str, output_tokens: u64) -> Vec<TierEstimate> {
    let input_tokens = tokens::estimate_tokens(input_text);
    let mut estimates: Vec<TierEstimate> = pricing::all_tiers()
        .iter()
        .map(|tier| {
            let cost = pricing::calculate_cost(input_tokens, output_tokens, tier);
            TierEstimate {
                model: tier.model.to_string(),
                input_tokens,
                output_tokens,
                cost: round_to(cost, 6),
                monthly_cost: round_to(cost * CALLS_PER_DAY * 30.0, 2),
            }
        })
        .collect();
    estimates.sort_by(|a, b| a.cost.total_cmp(&b.cost).then_with(|| a.model.cmp(&b.model)));
    estimates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_covers_every_tier_cheapest_first() {
        let estimates = compare_tiers(&"x".repeat(4000), 2000);
        assert_eq!(estimates.len(), pricing::all_tiers().len());
        assert_eq!(estimates[0].model, "claude-3-haiku");
        assert_eq!(estimates.last().unwrap().model, "claude-opus-4");
        for pair in estimates.windows(2) {
            assert!(pair[0].cost <= pair[1].cost);
        }
    }

    #[test]
    fn compare_reports_token_counts() {
        let estimates = compare_tiers(&"x".repeat(4000), 2000);
        let sonnet = estimates.iter().find(|e| e.model == "claude-sonnet-4").unwrap();
        assert_eq!(sonnet.input_tokens, 1000);
        assert_eq!(sonnet.output_tokens, 2000);
        assert!((sonnet.cost - 0.033).abs() < 1e-12);
        assert!((sonnet.monthly_cost - 29.7).abs() < 1e-9);
    }
}
