//! The named operations behind the question catalog.
//!
//! Each operation is a pure function of a filtered view and the request
//! parameters. Two-key operations are all cross-tabulations: absent
//! combinations are gaps (`null`), never zeros.

use std::collections::{BTreeMap, BTreeSet};

use super::group::{
    by_frequency, bottom_n, cross_tab, group_by, mean, natural, numeric_cells, pearson, quantile,
    top_n, Agg,
};
use super::result::{AggregateResult, Scalar};
use super::OperationFn;
use crate::data::{col, Params, Value, View};
use crate::error::{EngineError, EngineResult};

use AggregateResult::{Composite, CrossTab, List, Mapping};

/// Every registered operation, by name.
pub const OPERATIONS: &[(&str, OperationFn)] = &[
    // Sales & product trends
    ("get_top_products_by_revenue", top_products_by_revenue),
    ("get_highest_revenue_product", highest_revenue_product),
    ("get_sales_by_time_period", sales_by_time_period),
    ("get_sales_by_weekday", sales_by_weekday),
    ("get_products_by_popularity", products_by_popularity),
    ("get_revenue_by_season", revenue_by_season),
    ("get_sales_distribution_size_color", sales_distribution_size_color),
    ("get_discount_effectiveness", discount_effectiveness),
    // Customer demographics
    ("get_revenue_by_age_group", revenue_by_age_group),
    ("get_purchases_by_gender", purchases_by_gender),
    ("get_top_regions_by_sales", top_regions_by_sales),
    ("get_age_category_preferences", age_category_preferences),
    ("get_gender_category_preferences", gender_category_preferences),
    ("get_avg_order_value_by_region", avg_order_value_by_region),
    ("get_subscribed_vs_non_subscribed", subscribed_vs_non_subscribed),
    // Customer behavior
    ("get_avg_purchase_frequency", avg_purchase_frequency),
    ("get_category_repurchase_rate", category_repurchase_rate),
    ("get_customer_lifetime_value", customer_lifetime_value),
    ("get_discount_response_analysis", discount_response_analysis),
    ("get_promo_vs_non_promo_spending", promo_vs_non_promo_spending),
    ("get_rating_purchase_correlation", rating_purchase_correlation),
    ("get_weekday_vs_weekend_behavior", weekday_vs_weekend_behavior),
    ("get_shipping_preference_by_demo", shipping_preference_by_demo),
    // Operational insights
    ("get_stocking_recommendations", stocking_recommendations),
    ("get_seasonal_demand_spikes", seasonal_demand_spikes),
    ("get_shipping_preferences_high_value", shipping_preferences_high_value),
    ("get_shipping_impact_size_color", shipping_impact_size_color),
    ("get_underperforming_categories", underperforming_categories),
    ("get_payment_method_frequency", payment_method_frequency),
    ("get_revenue_per_payment_method", revenue_per_payment_method),
    ("get_multi_category_customers", multi_category_customers),
    // Advanced insights
    ("get_size_purchase_freq_correlation", size_purchase_freq_correlation),
    ("get_revenue_by_rating", revenue_by_rating),
    ("get_discount_rating_correlation", discount_rating_correlation),
    ("get_promo_usage_trends", promo_usage_trends),
    ("get_young_customer_trends", young_customer_trends),
    ("get_promo_usage_by_region", promo_usage_by_region),
    ("get_shipping_preferences_by_product", shipping_preferences_by_product),
    ("get_seasonal_impact", seasonal_impact),
    // Comparative insights
    ("get_purchase_freq_by_region", purchase_freq_by_region),
    ("get_category_popularity_subscribed", category_popularity_subscribed),
    ("get_gender_rating_differences", gender_rating_differences),
    ("get_avg_spending_subscribed_vs_non", avg_spending_subscribed_vs_non),
    ("get_urban_rural_category_preferences", urban_rural_category_preferences),
];

/// Quantile above which a row counts as "high" for threshold operations.
const HIGH_QUANTILE: f64 = 0.75;

fn grouped(view: &View<'_>, key: &str, agg: Agg<'_>) -> EngineResult<AggregateResult> {
    Ok(Mapping(natural(group_by(view, key, agg)?)))
}

fn ranked_top(view: &View<'_>, key: &str, agg: Agg<'_>, n: usize) -> EngineResult<AggregateResult> {
    Ok(Mapping(top_n(group_by(view, key, agg)?, n)))
}

fn pivot(view: &View<'_>, row_key: &str, col_key: &str, agg: Agg<'_>) -> EngineResult<AggregateResult> {
    Ok(CrossTab(cross_tab(view, row_key, col_key, agg)?))
}

fn scalar_over(view: &View<'_>, op: &str) -> EngineResult<()> {
    if view.is_empty() {
        Err(EngineError::EmptyResult(op.to_string()))
    } else {
        Ok(())
    }
}

fn correlation(view: &View<'_>, op: &str, x: &str, y: &str) -> EngineResult<AggregateResult> {
    let xs = numeric_cells(view, x)?;
    let ys = numeric_cells(view, y)?;
    scalar_over(view, op)?;
    Ok(AggregateResult::Scalar(
        pearson(&xs, &ys).map_or(Scalar::Null, Scalar::Number),
    ))
}

// ---------------------------------------------------------------------------
// Sales & product trends
// ---------------------------------------------------------------------------

fn top_products_by_revenue(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    ranked_top(view, col::ITEM_PURCHASED, Agg::Sum(col::TOTAL_REVENUE), 10)
}

fn highest_revenue_product(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    let groups = group_by(view, col::ITEM_PURCHASED, Agg::Sum(col::TOTAL_REVENUE))?;
    let best = top_n(groups, 1)
        .into_iter()
        .next()
        .ok_or_else(|| EngineError::EmptyResult("get_highest_revenue_product".to_string()))?;
    Ok(AggregateResult::Scalar(Scalar::Text(best.0.to_string())))
}

fn sales_by_time_period(view: &View<'_>, params: &Params) -> EngineResult<AggregateResult> {
    grouped(view, &params.period, Agg::Sum(col::TOTAL_REVENUE))
}

fn sales_by_weekday(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::DAY_OF_WEEK, Agg::Sum(col::TOTAL_REVENUE))
}

fn products_by_popularity(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    ranked_top(view, col::ITEM_PURCHASED, Agg::Mean(col::POPULARITY_SCORE), 10)
}

fn revenue_by_season(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::SEASON, Agg::Sum(col::TOTAL_REVENUE))
}

fn sales_distribution_size_color(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    Ok(Composite(vec![
        ("size".to_string(), grouped(view, col::PRODUCT_SIZE, Agg::Sum(col::QUANTITY))?),
        ("color".to_string(), grouped(view, col::PRODUCT_COLOR, Agg::Sum(col::QUANTITY))?),
    ]))
}

fn discount_effectiveness(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::PROMO_CODE_USED, Agg::Mean(col::TOTAL_REVENUE))
}

// ---------------------------------------------------------------------------
// Customer demographics
// ---------------------------------------------------------------------------

fn revenue_by_age_group(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::AGE, Agg::Sum(col::TOTAL_REVENUE))
}

fn purchases_by_gender(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::GENDER, Agg::Sum(col::QUANTITY))
}

fn top_regions_by_sales(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    ranked_top(view, col::REGION, Agg::Sum(col::TOTAL_REVENUE), 5)
}

fn age_category_preferences(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    pivot(view, col::AGE, col::CATEGORY_BY_AGE, Agg::Sum(col::QUANTITY))
}

fn gender_category_preferences(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    pivot(view, col::GENDER, col::CATEGORY_BY_GENDER, Agg::Sum(col::QUANTITY))
}

fn avg_order_value_by_region(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::REGION, Agg::Mean(col::TOTAL_REVENUE))
}

fn subscribed_vs_non_subscribed(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::IS_SUBSCRIBED, Agg::Sum(col::TOTAL_REVENUE))
}

// ---------------------------------------------------------------------------
// Customer behavior
// ---------------------------------------------------------------------------

fn avg_purchase_frequency(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    let cells = numeric_cells(view, col::PURCHASE_FREQUENCY)?;
    scalar_over(view, "get_avg_purchase_frequency")?;
    Ok(AggregateResult::Scalar(Scalar::Number(mean(&cells))))
}

/// Average number of purchases a customer makes within each category.
fn category_repurchase_rate(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    let customer = view.column(col::CUSTOMER_ID)?;
    let category = view.column(col::CATEGORY)?;

    let mut per_pair: BTreeMap<(&Value, &Value), usize> = BTreeMap::new();
    for record in view.records() {
        let (c, k) = (record.get(customer), record.get(category));
        if c.is_null() || k.is_null() {
            continue;
        }
        *per_pair.entry((k, c)).or_default() += 1;
    }

    let mut per_category: BTreeMap<&Value, (usize, usize)> = BTreeMap::new();
    for ((k, _), n) in per_pair {
        let entry = per_category.entry(k).or_default();
        entry.0 += n;
        entry.1 += 1;
    }

    Ok(Mapping(
        per_category
            .into_iter()
            .map(|(k, (purchases, customers))| (k.clone(), purchases as f64 / customers as f64))
            .collect(),
    ))
}

fn customer_lifetime_value(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    ranked_top(view, col::CUSTOMER_ID, Agg::Sum(col::TOTAL_REVENUE), 10)
}

fn discount_response_analysis(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::PROMO_CODE_USED, Agg::Sum(col::QUANTITY))
}

fn promo_vs_non_promo_spending(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::PROMO_CODE_USED, Agg::Mean(col::TOTAL_REVENUE))
}

fn rating_purchase_correlation(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    correlation(
        view,
        "get_rating_purchase_correlation",
        col::REVIEW_RATING,
        col::PURCHASE_FREQUENCY,
    )
}

fn weekday_vs_weekend_behavior(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::IS_WEEKEND, Agg::Sum(col::TOTAL_REVENUE))
}

fn shipping_preference_by_demo(view: &View<'_>, params: &Params) -> EngineResult<AggregateResult> {
    pivot(view, &params.demo, col::SHIPPING_TYPE, Agg::Count)
}

// ---------------------------------------------------------------------------
// Operational insights
// ---------------------------------------------------------------------------

/// Items flagged as trending whose popularity is in the view's top quartile.
fn stocking_recommendations(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    let item = view.column(col::ITEM_PURCHASED)?;
    let trend = view.column(col::TREND_FLAG)?;
    let popularity = view.column(col::POPULARITY_SCORE)?;

    let Some(threshold) = quantile(&numeric_cells(view, col::POPULARITY_SCORE)?, HIGH_QUANTILE)
    else {
        return Ok(List(Vec::new()));
    };

    let mut seen = BTreeSet::new();
    let mut items = Vec::new();
    for record in view.records() {
        let high = record.get(trend).matches_text("High");
        let popular = record.get(popularity).as_f64().is_some_and(|p| p > threshold);
        let name = record.get(item);
        if high && popular && !name.is_null() && seen.insert(name) {
            items.push(name.clone());
        }
    }
    Ok(List(items))
}

fn seasonal_demand_spikes(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::SEASON, Agg::Sum(col::QUANTITY))
}

/// Shipping choices for purchases priced above the view's top quartile.
fn shipping_preferences_high_value(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    let price = view.column(col::PRICE)?;
    view.column(col::SHIPPING_TYPE)?;

    let Some(threshold) = quantile(&numeric_cells(view, col::PRICE)?, HIGH_QUANTILE) else {
        return Ok(Mapping(Vec::new()));
    };
    let high_value = view.retain(|r| r.get(price).as_f64().is_some_and(|p| p > threshold));
    grouped(&high_value, col::SHIPPING_TYPE, Agg::Count)
}

fn shipping_impact_size_color(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    Ok(Composite(vec![
        ("size".to_string(), pivot(view, col::PRODUCT_SIZE, col::SHIPPING_TYPE, Agg::Count)?),
        ("color".to_string(), pivot(view, col::PRODUCT_COLOR, col::SHIPPING_TYPE, Agg::Count)?),
    ]))
}

fn underperforming_categories(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    let groups = group_by(view, col::CATEGORY, Agg::Sum(col::TOTAL_REVENUE))?;
    Ok(Mapping(bottom_n(groups, 5)))
}

fn payment_method_frequency(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    Ok(Mapping(by_frequency(group_by(view, col::PAYMENT_METHOD, Agg::Count)?)))
}

fn revenue_per_payment_method(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::PAYMENT_METHOD, Agg::Mean(col::TOTAL_REVENUE))
}

/// Number of customers who bought from more than one category.
fn multi_category_customers(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    let customer = view.column(col::CUSTOMER_ID)?;
    let category = view.column(col::CATEGORY)?;
    scalar_over(view, "get_multi_category_customers")?;

    let mut categories: BTreeMap<&Value, BTreeSet<&Value>> = BTreeMap::new();
    for record in view.records() {
        let (c, k) = (record.get(customer), record.get(category));
        if c.is_null() {
            continue;
        }
        let set = categories.entry(c).or_default();
        if !k.is_null() {
            set.insert(k);
        }
    }
    let count = categories.values().filter(|set| set.len() > 1).count();
    Ok(AggregateResult::Scalar(Scalar::Integer(count as i64)))
}

// ---------------------------------------------------------------------------
// Advanced insights
// ---------------------------------------------------------------------------

fn size_purchase_freq_correlation(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::PRODUCT_SIZE, Agg::Mean(col::PURCHASE_FREQUENCY))
}

fn revenue_by_rating(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::REVIEW_RATING, Agg::Sum(col::TOTAL_REVENUE))
}

fn discount_rating_correlation(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    correlation(
        view,
        "get_discount_rating_correlation",
        col::DISCOUNT_EFFECTIVENESS,
        col::REVIEW_RATING,
    )
}

fn promo_usage_trends(view: &View<'_>, params: &Params) -> EngineResult<AggregateResult> {
    grouped(view, &params.period, Agg::Mean(col::PROMO_CODE_USED))
}

/// Most popular items among customers at or under the age threshold.
fn young_customer_trends(view: &View<'_>, params: &Params) -> EngineResult<AggregateResult> {
    let age = view.column(col::AGE)?;
    let threshold = params.age_threshold;
    let young = view.retain(|r| r.get(age).as_f64().is_some_and(|a| a <= threshold));
    ranked_top(&young, col::ITEM_PURCHASED, Agg::Mean(col::POPULARITY_SCORE), 5)
}

fn promo_usage_by_region(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::REGION, Agg::Mean(col::PROMO_CODE_USED))
}

fn shipping_preferences_by_product(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    pivot(view, col::ITEM_PURCHASED, col::SHIPPING_TYPE, Agg::Count)
}

fn seasonal_impact(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    Ok(Composite(vec![
        ("revenue".to_string(), grouped(view, col::SEASON, Agg::Sum(col::TOTAL_REVENUE))?),
        (
            "category_sales".to_string(),
            pivot(view, col::SEASON, col::CATEGORY, Agg::Sum(col::TOTAL_REVENUE))?,
        ),
    ]))
}

// ---------------------------------------------------------------------------
// Comparative insights
// ---------------------------------------------------------------------------

fn purchase_freq_by_region(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::REGION, Agg::Mean(col::PURCHASE_FREQUENCY))
}

fn category_popularity_subscribed(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    pivot(view, col::IS_SUBSCRIBED, col::CATEGORY, Agg::Sum(col::QUANTITY))
}

fn gender_rating_differences(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::GENDER, Agg::Mean(col::REVIEW_RATING))
}

fn avg_spending_subscribed_vs_non(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    grouped(view, col::IS_SUBSCRIBED, Agg::Mean(col::AVERAGE_SPENDING))
}

fn urban_rural_category_preferences(view: &View<'_>, _: &Params) -> EngineResult<AggregateResult> {
    pivot(view, col::REGION_TYPE, col::CATEGORY, Agg::Sum(col::QUANTITY))
}
