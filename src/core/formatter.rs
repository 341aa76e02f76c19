use crate::core::models::shopping::{ShoppingItem, ShoppingList};

const DEFAULT_PRIORITY: &str = "medium";
const DEFAULT_CATEGORY: &str = "Other";

/// Capitalize the first letter of each word and lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

fn priority_of(item: &ShoppingItem) -> &str {
    item.priority.map(|p| p.id()).unwrap_or(DEFAULT_PRIORITY)
}

fn cost_of(item: &ShoppingItem) -> &str {
    item.estimated_cost.as_deref().unwrap_or("")
}

fn total_of(list: &ShoppingList) -> &str {
    list.total_estimated_cost.as_deref().unwrap_or("N/A")
}

/// Items grouped by category, groups in order of first appearance.
fn group_by_category(items: &[ShoppingItem]) -> Vec<(&str, Vec<&ShoppingItem>)> {
    let mut groups: Vec<(&str, Vec<&ShoppingItem>)> = Vec::new();
    for item in items {
        let category = item.category.as_deref().unwrap_or(DEFAULT_CATEGORY);
        match groups.iter_mut().find(|(name, _)| *name == category) {
            Some((_, members)) => members.push(item),
            None => groups.push((category, vec![item])),
        }
    }
    groups
}

/// Markdown checklist grouped by category.
///
/// ```text
/// # Shopping List
///
/// ## Dairy
///
/// - **milk** (high priority) - $3.99
///
/// **Total Estimated Cost:** $3.99
/// ```
pub fn format_markdown(list: &ShoppingList) -> String {
    let mut lines: Vec<String> = vec!["# Shopping List\n".to_string()];

    for (category, items) in group_by_category(&list.shopping_list) {
        lines.push(format!("## {}\n", title_case(category)));
        for item in items {
            lines.push(format!(
                "- **{}** ({} priority) - {}",
                item.item,
                priority_of(item),
                cost_of(item)
            ));
        }
        lines.push(String::new());
    }

    lines.push(format!("**Total Estimated Cost:** {}", total_of(list)));
    lines.join("\n")
}

/// Plain checkbox list.
pub fn format_text(list: &ShoppingList) -> String {
    let mut lines: Vec<String> = vec![
        "SHOPPING LIST".to_string(),
        "=".repeat(40),
        String::new(),
    ];

    for item in &list.shopping_list {
        lines.push(format!(
            "[ ] {} ({}) - {}",
            item.item,
            priority_of(item),
            cost_of(item)
        ));
    }

    lines.push(String::new());
    lines.push(format!("Total: {}", total_of(list)));
    lines.join("\n")
}

/// Returns "$0.0330".
pub fn format_cost(cost: f64) -> String {
    format!("${:.4}", cost)
}

/// Returns "1.2K" / "3.4M" style token counts.
pub fn format_tokens(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        format!("{}", count)
    }
}
