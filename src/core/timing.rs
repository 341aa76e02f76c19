use serde::{Deserialize, Serialize};

use crate::core::models::shopping::{Priority, ShoppingItem};

const DEFAULT_SHOPPING_DAY: &str = "Saturday";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseWindow {
    Today,
    ThisWeek,
    NextWeek,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSuggestion {
    pub item: String,
    pub suggested_timing: PurchaseWindow,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingAnalysis {
    pub timing_analysis: Vec<TimingSuggestion>,
    pub optimal_shopping_day: String,
    pub note: String,
}

fn suggest(item: &ShoppingItem) -> TimingSuggestion {
    let (window, reason) = match item.priority {
        Some(Priority::High) => (PurchaseWindow::Today, "High priority item"),
        Some(Priority::Low) => (PurchaseWindow::NextWeek, "Low priority, can wait"),
        _ => (PurchaseWindow::ThisWeek, "Standard timing"),
    };
    TimingSuggestion {
        item: item.item.clone(),
        suggested_timing: window,
        reason: reason.to_string(),
    }
}

/// Priority-based purchase timing for each item.
pub fn analyze_item_timing(items: &[ShoppingItem]) -> TimingAnalysis {
    TimingAnalysis {
        timing_analysis: items.iter().map(suggest).collect(),
        optimal_shopping_day: DEFAULT_SHOPPING_DAY.to_string(),
        note: "Timing is based on item priority only".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, priority: Option<Priority>) -> ShoppingItem {
        ShoppingItem {
            item: name.to_string(),
            priority,
            ..ShoppingItem::default()
        }
    }

    #[test]
    fn timing_follows_priority() {
        let items = vec![
            item("milk", Some(Priority::High)),
            item("snacks", Some(Priority::Low)),
            item("bread", Some(Priority::Medium)),
            item("candles", None),
        ];
        let analysis = analyze_item_timing(&items);
        assert_eq!(analysis.timing_analysis.len(), 4);

        let by_name = |name: &str| {
            analysis
                .timing_analysis
                .iter()
                .find(|s| s.item == name)
                .unwrap()
                .suggested_timing
        };
        assert_eq!(by_name("milk"), PurchaseWindow::Today);
        assert_eq!(by_name("snacks"), PurchaseWindow::NextWeek);
        assert_eq!(by_name("bread"), PurchaseWindow::ThisWeek);
        assert_eq!(by_name("candles"), PurchaseWindow::ThisWeek);
    }

    #[test]
    fn serializes_snake_case_windows() {
        let analysis = analyze_item_timing(&[item("soap", Some(Priority::Low))]);
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["timing_analysis"][0]["suggested_timing"], "next_week");
        assert_eq!(json["timing_analysis"][0]["reason"], "Low priority, can wait");
        assert_eq!(json["optimal_shopping_day"], "Saturday");
    }

    #[test]
    fn empty_items() {
        let analysis = analyze_item_timing(&[]);
        assert!(analysis.timing_analysis.is_empty());
    }
}
