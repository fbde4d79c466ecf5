//! Static question catalog: which operation answers which question, and
//! how its result should be drawn.

use std::fmt;

use serde::Serialize;

use crate::data::filter::{active_value, FilterSet};
use crate::data::col;
use crate::engine::Engine;
use crate::error::CatalogError;

/// How a result is meant to be rendered. The engine never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VizHint {
    Bar,
    Line,
    Pie,
    Metric,
    Heatmap,
    List,
    Scatter,
    DualBar,
    DualHeatmap,
    DualLine,
}

impl fmt::Display for VizHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VizHint::Bar => "bar",
            VizHint::Line => "line",
            VizHint::Pie => "pie",
            VizHint::Metric => "metric",
            VizHint::Heatmap => "heatmap",
            VizHint::List => "list",
            VizHint::Scatter => "scatter",
            VizHint::DualBar => "dual_bar",
            VizHint::DualHeatmap => "dual_heatmap",
            VizHint::DualLine => "dual_line",
        };
        f.write_str(s)
    }
}

/// One catalog question. Serializes as `{id, text, func, viz}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    #[serde(rename = "func")]
    pub operation: &'static str,
    pub viz: VizHint,
}

/// A tab of related questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub questions: &'static [Question],
}

impl Category {
    pub fn question(&self, id: u32) -> Option<&'static Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

const fn q(id: u32, text: &'static str, operation: &'static str, viz: VizHint) -> Question {
    Question {
        id,
        text,
        operation,
        viz,
    }
}

use VizHint::*;

pub const CATEGORIES: &[Category] = &[
    Category {
        name: "sales_trends",
        title: "Sales Trends",
        summary: "Sales & Product Trends Analysis",
        questions: &[
            q(1, "Top 10 products by revenue", "get_top_products_by_revenue", Bar),
            q(2, "Product generating the most revenue", "get_highest_revenue_product", Metric),
            q(3, "Sales variation by month", "get_sales_by_time_period", Line),
            q(4, "Sales by weekday", "get_sales_by_weekday", Bar),
            q(5, "Top products by popularity", "get_products_by_popularity", Bar),
            q(6, "Revenue by season", "get_revenue_by_season", Pie),
            q(7, "Sales distribution by size/color", "get_sales_distribution_size_color", DualBar),
            q(8, "Discount effectiveness", "get_discount_effectiveness", Bar),
        ],
    },
    Category {
        name: "customer_demographics",
        title: "Customer Demographics",
        summary: "Customer Demographics Analysis",
        questions: &[
            q(1, "Revenue by age group", "get_revenue_by_age_group", Bar),
            q(2, "Purchase distribution by gender", "get_purchases_by_gender", Pie),
            q(3, "Top regions by sales", "get_top_regions_by_sales", Bar),
            q(4, "Age group category preferences", "get_age_category_preferences", Heatmap),
            q(5, "Gender category preferences", "get_gender_category_preferences", Heatmap),
            q(6, "Average order value by region", "get_avg_order_value_by_region", Bar),
            q(7, "Subscribed vs. non-subscribed spending", "get_subscribed_vs_non_subscribed", Bar),
        ],
    },
    Category {
        name: "customer_behavior",
        title: "Customer Behavior",
        summary: "Customer Behavior Analysis",
        questions: &[
            q(1, "Average purchase frequency", "get_avg_purchase_frequency", Metric),
            q(2, "Category repurchase rate", "get_category_repurchase_rate", Bar),
            q(3, "Top customers by lifetime value", "get_customer_lifetime_value", Bar),
            q(4, "Discount response analysis", "get_discount_response_analysis", Bar),
            q(5, "Spending with/without promo codes", "get_promo_vs_non_promo_spending", Bar),
            q(6, "Rating vs. purchase frequency correlation", "get_rating_purchase_correlation", Metric),
            q(7, "Weekday vs. weekend behavior", "get_weekday_vs_weekend_behavior", Bar),
            q(8, "Shipping preferences by gender", "get_shipping_preference_by_demo", Heatmap),
        ],
    },
    Category {
        name: "operational_insights",
        title: "Operational Insights",
        summary: "Operational Insights Analysis",
        questions: &[
            q(1, "Stocking recommendations", "get_stocking_recommendations", List),
            q(2, "Seasonal demand spikes", "get_seasonal_demand_spikes", Line),
            q(3, "Shipping preferences for high-value products", "get_shipping_preferences_high_value", Pie),
            q(4, "Shipping impact by size/color", "get_shipping_impact_size_color", DualHeatmap),
            q(5, "Underperforming categories", "get_underperforming_categories", Bar),
            q(6, "Popular payment methods", "get_payment_method_frequency", Pie),
            q(7, "Revenue per payment method", "get_revenue_per_payment_method", Bar),
            q(8, "Multi-category customers", "get_multi_category_customers", Metric),
        ],
    },
    Category {
        name: "advanced_insights",
        title: "Advanced Insights",
        summary: "Advanced Insights Analysis",
        questions: &[
            q(1, "Product size vs. purchase frequency", "get_size_purchase_freq_correlation", Bar),
            q(2, "Revenue by review rating", "get_revenue_by_rating", Scatter),
            q(3, "Discounts vs. ratings correlation", "get_discount_rating_correlation", Metric),
            q(4, "Promo code usage trends", "get_promo_usage_trends", Line),
            q(5, "Young customers' trendy preferences", "get_young_customer_trends", Bar),
            q(6, "Promo usage by region", "get_promo_usage_by_region", Heatmap),
            q(7, "Shipping preferences by product", "get_shipping_preferences_by_product", Heatmap),
            q(8, "Seasonal revenue & category impact", "get_seasonal_impact", DualLine),
        ],
    },
    Category {
        name: "comparative_insights",
        title: "Comparative Insights",
        summary: "Comparative Insights Analysis",
        questions: &[
            q(1, "Purchase frequency by region", "get_purchase_freq_by_region", Bar),
            q(2, "Category popularity: Subscribed vs. Non-Subscribed", "get_category_popularity_subscribed", Heatmap),
            q(3, "Review ratings by gender", "get_gender_rating_differences", Bar),
            q(4, "Average spending: Subscribed vs. Non-Subscribed", "get_avg_spending_subscribed_vs_non", Bar),
            q(5, "Urban vs. Rural category preferences", "get_urban_rural_category_preferences", Heatmap),
        ],
    },
];

/// Look up a category by its URL name.
pub fn category(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.name == name)
}

/// Look up a question by category name and id.
pub fn question(category_name: &str, id: u32) -> Option<&'static Question> {
    category(category_name)?.question(id)
}

/// Fail if any question names an operation the engine does not know.
pub fn validate(engine: &Engine) -> Result<(), CatalogError> {
    let unknown: Vec<String> = CATEGORIES
        .iter()
        .flat_map(|c| c.questions.iter().map(move |q| (c.name, q)))
        .filter(|(_, q)| !engine.contains(q.operation))
        .map(|(c, q)| format!("{c}/{}: {}", q.id, q.operation))
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::UnregisteredOperations(unknown))
    }
}

/// Human-readable context for the active filters, e.g.
/// `" (Category: Clothing, Region: US)"`; empty when unrestricted.
pub fn filter_text(filters: &FilterSet) -> String {
    let mut context = Vec::new();
    if let Some(category) = active_value(filters, col::CATEGORY) {
        context.push(format!("Category: {category}"));
    }
    if let Some(region) = active_value(filters, col::REGION) {
        context.push(format!("Region: {region}"));
    }
    if context.is_empty() {
        String::new()
    } else {
        format!(" ({})", context.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_matches_engine() {
        validate(&Engine::new()).unwrap();
    }

    #[test]
    fn unregistered_operation_is_reported() {
        let engine = Engine::from_operations(
            crate::engine::ops::OPERATIONS
                .iter()
                .copied()
                .filter(|(name, _)| *name != "get_seasonal_impact"),
        );
        let err = validate(&engine).unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnregisteredOperations(vec![
                "advanced_insights/8: get_seasonal_impact".to_string()
            ])
        );
        assert!(err.to_string().contains("get_seasonal_impact"));
    }

    #[test]
    fn ids_are_sequential_per_category() {
        for c in CATEGORIES {
            let ids: Vec<u32> = c.questions.iter().map(|q| q.id).collect();
            let expected: Vec<u32> = (1..=c.questions.len() as u32).collect();
            assert_eq!(ids, expected, "{}", c.name);
        }
    }

    #[test]
    fn every_operation_answers_one_question() {
        let total: usize = CATEGORIES.iter().map(|c| c.questions.len()).sum();
        assert_eq!(total, Engine::new().names().count());
    }

    #[test]
    fn question_serializes_with_func_key() {
        let q = question("sales_trends", 7).unwrap();
        assert_eq!(
            serde_json::to_value(q).unwrap(),
            serde_json::json!({
                "id": 7,
                "text": "Sales distribution by size/color",
                "func": "get_sales_distribution_size_color",
                "viz": "dual_bar"
            })
        );
    }

    #[test]
    fn filter_text_skips_all() {
        let mut filters = FilterSet::new();
        assert_eq!(filter_text(&filters), "");
        filters.insert("region".into(), "All".into());
        filters.insert("category".into(), "Clothing".into());
        assert_eq!(filter_text(&filters), " (Category: Clothing)");
        filters.insert("region".into(), "US".into());
        assert_eq!(filter_text(&filters), " (Category: Clothing, Region: US)");
    }
}
