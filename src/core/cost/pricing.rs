use serde::Serialize;

/// Per-model token pricing in dollars per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricingTier {
    pub model: &'static str,
    pub input_per_million: f64,
    pub output_per_million: f64,
}

/// Tier every logged call is priced with, whatever model served it.
pub const DEFAULT_TIER: &str = "claude-sonnet-4";

/// All known pricing tiers.
static PRICING_TABLE: &[PricingTier] = &[
    PricingTier {
        model: "claude-sonnet-4",
        input_per_million: 3.0,
        output_per_million: 15.0,
    },
    PricingTier {
        model: "claude-3-5-sonnet",
        input_per_million: 3.0,
        output_per_million: 15.0,
    },
    PricingTier {
        model: "claude-3-sonnet",
        input_per_million: 3.0,
        output_per_million: 15.0,
    },
    PricingTier {
        model: "claude-3-haiku",
        input_per_million: 0.25,
        output_per_million: 1.25,
    },
    PricingTier {
        model: "claude-opus-4",
        input_per_million: 15.0,
        output_per_million: 75.0,
    },
];

/// Normalize a model name by stripping common prefixes and suffixes.
/// Examples:
///   "anthropic.claude-3-haiku-v1:0" -> "claude-3-haiku"
///   "claude-sonnet-4-20250514" -> "claude-sonnet-4"
fn normalize_model(model: &str) -> String {
    let mut name = model.trim().to_lowercase();

    if let Some(stripped) = name.strip_prefix("anthropic.") {
        name = stripped.to_string();
    }

    // Bedrock/Vertex suffixes like ":0" or "@001"
    if let Some(idx) = name.find(':') {
        name.truncate(idx);
    }
    if let Some(idx) = name.find('@') {
        name.truncate(idx);
    }
    if let Some(idx) = name.rfind("-v") {
        let tail = &name[idx + 2..];
        if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) {
            name.truncate(idx);
        }
    }

    // Date suffixes like "-20250514"
    let cut = name.len().saturating_sub(9);
    if cut > 0 {
        if let Some(tail) = name.get(cut..) {
            if tail.starts_with('-') && tail[1..].chars().all(|c| c.is_ascii_digit()) {
                name.truncate(cut);
            }
        }
    }

    name
}

/// Look up the pricing tier for a model name. Returns None if unknown.
pub fn lookup(model: &str) -> Option<&'static PricingTier> {
    let normalized = normalize_model(model);
    PRICING_TABLE.iter().find(|p| p.model == normalized)
}

/// The tier the cost log uses by default.
pub fn default_tier() -> &'static PricingTier {
    PRICING_TABLE
        .iter()
        .find(|p| p.model == DEFAULT_TIER)
        .unwrap_or(&PRICING_TABLE[0])
}

/// Every known tier, in table order.
pub fn all_tiers() -> &'static [PricingTier] {
    PRICING_TABLE
}

/// Cost in dollars for the given token counts. Not rounded.
pub fn calculate_cost(input_tokens: u64, output_tokens: u64, tier: &PricingTier) -> f64 {
    let input_cost = (input_tokens as f64 / 1_000_000.0) * tier.input_per_million;
    let output_cost = (output_tokens as f64 / 1_000_000.0) * tier.output_per_million;
    input_cost + output_cost
}
