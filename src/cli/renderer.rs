use colored::{control, ColoredString, Colorize};

use crate::core::cost::pricing::PricingTier;
use crate::core::formatter::{format_cost, format_tokens};
use crate::core::items::ItemTable;
use crate::core::models::cost::{CostStats, TierEstimate};
use crate::core::models::shopping::{CachedItem, Priority};

/// Number of recent calls shown in the text summary.
const SUMMARY_RECENT_CALLS: usize = 5;

/// Render the cost log summary.
///
/// Layout:
/// ```text
///  Cost Summary
///   Calls     12
///   Total     $0.3960
///   Average   $0.0330
///   Daily     $0.99 (at 30 calls/day)
///   Monthly   $29.70
///   Pricing   claude-sonnet-4 ($3.00 in / $15.00 out per 1M)
///   Recent:
///     2025-01-15T10:30:00 | $0.0330 | 1000→2000 tokens
/// ```
pub fn render_cost_stats(stats: &CostStats, tier: &PricingTier, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    lines.push(" Cost Summary".bold().to_string());
    lines.push(format!("  {}     {}", "Calls".cyan(), stats.total_calls));
    lines.push(format!("  {}     {}", "Total".cyan(), format_cost(stats.total_cost)));
    lines.push(format!(
        "  {}   {}",
        "Average".cyan(),
        format_cost(stats.average_cost)
    ));
    lines.push(format!(
        "  {}     ${:.2} {}",
        "Daily".cyan(),
        stats.daily_estimate,
        "(at 30 calls/day)".dimmed()
    ));
    lines.push(format!(
        "  {}   ${:.2}",
        "Monthly".cyan(),
        stats.monthly_estimate
    ));
    lines.push(format!(
        "  {}   {} {}",
        "Pricing".cyan(),
        tier.model,
        format!(
            "(${:.2} in / ${:.2} out per 1M)",
            tier.input_per_million, tier.output_per_million
        )
        .dimmed()
    ));

    let recent: Vec<_> = stats
        .recent_calls
        .iter()
        .rev()
        .take(SUMMARY_RECENT_CALLS)
        .collect();
    if !recent.is_empty() {
        lines.push(format!("  {}:", "Recent".cyan()));
        for call in recent.into_iter().rev() {
            let stamp: String = call.timestamp.chars().take(19).collect();
            lines.push(format!(
                "    {} | {} | {}→{} tokens",
                stamp.dimmed(),
                format_cost(call.cost),
                call.input_tokens,
                call.output_tokens
            ));
        }
    }

    lines.join("\n")
}

/// Render a per-tier cost table, cheapest first as given.
pub fn render_tier_estimates(estimates: &[TierEstimate], use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    if let Some(first) = estimates.first() {
        lines.push(
            format!(
                " Cost comparison ({} input + {} output tokens)",
                format_tokens(first.input_tokens),
                format_tokens(first.output_tokens)
            )
            .bold()
            .to_string(),
        );
    }
    for (i, estimate) in estimates.iter().enumerate() {
        let model = format!("{:<20}", estimate.model);
        let model = if i == 0 { model.green() } else { model.cyan() };
        lines.push(format!(
            "  {} {}/call  ${:.2}/month",
            model,
            format_cost(estimate.cost),
            estimate.monthly_cost
        ));
    }
    lines.join("\n")
}

fn color_priority(priority: Option<Priority>) -> ColoredString {
    match priority {
        Some(Priority::High) => "high".red(),
        Some(Priority::Medium) => "medium".yellow(),
        Some(Priority::Low) => "low".green(),
        None => "-".dimmed(),
    }
}

fn item_line(name: &str, item: &CachedItem) -> String {
    format!(
        "  {:<16} {:<12} {:<8} {:<8} {}",
        name.bold(),
        item.category.as_deref().unwrap_or("-"),
        color_priority(item.priority),
        item.estimated_cost.as_deref().unwrap_or("-"),
        item.quantity.as_deref().unwrap_or("-")
    )
}

/// Render one cached item found for `query`.
pub fn render_cached_item(query: &str, item: &CachedItem, use_color: bool) -> String {
    control::set_override(use_color);
    format!(" {} {}\n{}", "Cached:".bold(), query, item_line(query, item))
}

pub fn render_item_table(table: &ItemTable, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines = vec![format!(" {} ({})", "Item Cache".bold(), table.len())];
    for (name, item) in table.iter() {
        lines.push(item_line(name, item));
    }
    lines.join("\n")
}
