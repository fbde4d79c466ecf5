//! Aggregation engine behaviour over a small hand-built shop.

mod common;

use common::{filters, minimal, shop};
use serde_json::json;
use trendlens::engine::ops::OPERATIONS;
use trendlens::{AggregateResult, Dataset, Engine, EngineError, FilterSet, Scalar, Value};

fn run(name: &str, pairs: &[(&str, &str)]) -> Result<AggregateResult, EngineError> {
    Engine::new().run(&shop(), name, &filters(pairs))
}

fn json_of(name: &str, pairs: &[(&str, &str)]) -> String {
    serde_json::to_string(&run(name, pairs).expect(name)).expect("serialize")
}

#[test]
fn every_operation_answers_the_full_shop() {
    for (name, _) in OPERATIONS {
        run(name, &[]).unwrap_or_else(|e| panic!("{name}: {e}"));
    }
}

#[test]
fn same_input_gives_same_output() {
    let f = filters(&[("region", "Northeast")]);
    let engine = Engine::new();
    let ds = shop();
    for (name, _) in OPERATIONS {
        let first = serde_json::to_string(&engine.run(&ds, name, &f).unwrap()).unwrap();
        let second = serde_json::to_string(&engine.run(&ds, name, &f).unwrap()).unwrap();
        assert_eq!(first, second, "{name}");
    }
}

#[test]
fn all_is_the_same_as_no_filter() {
    let engine = Engine::new();
    let ds = shop();
    let all = filters(&[("region", "All"), ("category", "All"), ("gender", "")]);
    for (name, _) in OPERATIONS {
        let unfiltered = serde_json::to_string(&engine.run(&ds, name, &FilterSet::new()).unwrap());
        let with_all = serde_json::to_string(&engine.run(&ds, name, &all).unwrap());
        assert_eq!(unfiltered.unwrap(), with_all.unwrap(), "{name}");
    }
}

#[test]
fn top_products_are_sorted_and_ties_keep_first_seen() {
    assert_eq!(
        json_of("get_top_products_by_revenue", &[]),
        r#"{"Blouse":30.0,"Jacket":30.0,"Sandals":20.0}"#
    );
    assert_eq!(
        json_of("get_top_products_by_revenue", &[("region", "Northeast")]),
        r#"{"Jacket":30.0,"Blouse":20.0}"#
    );
}

#[test]
fn top_products_sums_repeat_purchases() {
    let result = Engine::new()
        .run(&minimal(), "get_top_products_by_revenue", &FilterSet::new())
        .unwrap();
    assert_eq!(
        result.as_mapping().unwrap(),
        &vec![(Value::from("B"), 20.0), (Value::from("A"), 15.0)]
    );
}

#[test]
fn ranked_results_respect_their_bounds() {
    let regions = run("get_top_regions_by_sales", &[]).unwrap();
    assert!(regions.as_mapping().unwrap().len() <= 5);

    let customers = run("get_customer_lifetime_value", &[]).unwrap();
    let values: Vec<f64> = customers.as_mapping().unwrap().iter().map(|(_, v)| *v).collect();
    assert!(values.len() <= 10);
    assert!(values.windows(2).all(|w| w[0] >= w[1]));

    assert_eq!(
        json_of("get_underperforming_categories", &[]),
        r#"{"Footwear":20.0,"Clothing":30.0,"Outerwear":30.0}"#
    );
}

#[test]
fn highest_revenue_product_is_a_name() {
    assert_eq!(
        run("get_highest_revenue_product", &[]).unwrap(),
        AggregateResult::Scalar(Scalar::Text("Blouse".into()))
    );
}

#[test]
fn grouped_results_use_natural_key_order() {
    assert_eq!(
        json_of("get_sales_by_time_period", &[]),
        r#"{"1":50.0,"3":10.0,"6":15.0,"7":5.0}"#
    );
    assert_eq!(
        json_of("get_promo_usage_by_region", &[]),
        r#"{"Northeast":0.5,"South":0.0,"West":1.0}"#
    );
}

#[test]
fn frequency_table_descends() {
    assert_eq!(
        json_of("get_payment_method_frequency", &[]),
        r#"{"Card":2.0,"Cash":2.0,"PayPal":1.0}"#
    );
}

#[test]
fn cross_tabs_leave_gaps_as_null() {
    let value: serde_json::Value =
        serde_json::from_str(&json_of("get_shipping_preference_by_demo", &[])).unwrap();
    assert_eq!(
        value,
        json!({
            "Express": {"Female": 2.0, "Male": null},
            "Free Shipping": {"Female": null, "Male": 1.0},
            "Standard": {"Female": null, "Male": 2.0},
        })
    );

    let by_season = run("get_shipping_preference_by_demo", &[("demo", "season")]).unwrap();
    let tab = by_season.as_cross_tab().unwrap();
    assert_eq!(tab.get(&"Express".into(), &"Winter".into()), Some(2.0));
    assert_eq!(tab.get(&"Express".into(), &"Summer".into()), None);
}

#[test]
fn correlation_is_bounded_or_null() {
    match run("get_rating_purchase_correlation", &[]).unwrap() {
        AggregateResult::Scalar(Scalar::Number(r)) => assert!((-1.0..=1.0).contains(&r)),
        other => panic!("unexpected {other:?}"),
    }
    // A single row has no variance.
    assert_eq!(
        run("get_discount_rating_correlation", &[("region", "West")]).unwrap(),
        AggregateResult::Scalar(Scalar::Null)
    );
}

#[test]
fn stocking_needs_high_trend_and_top_quartile_popularity() {
    assert_eq!(
        run("get_stocking_recommendations", &[]).unwrap(),
        AggregateResult::List(vec![Value::from("Jacket")])
    );
    assert_eq!(
        json_of("get_stocking_recommendations", &[("region", "South")]),
        "[]"
    );
}

#[test]
fn high_value_shipping_uses_price_quartile() {
    assert_eq!(
        json_of("get_shipping_preferences_high_value", &[]),
        r#"{"Express":1.0}"#
    );
}

#[test]
fn young_customers_follow_the_threshold() {
    assert_eq!(
        json_of("get_young_customer_trends", &[]),
        r#"{"Jacket":95.0,"Blouse":90.0}"#
    );
    let everyone = run("get_young_customer_trends", &[("age_threshold", "40")]).unwrap();
    assert_eq!(everyone.as_mapping().unwrap().len(), 3);

    let err = run("get_young_customer_trends", &[("age_threshold", "young")]).unwrap_err();
    assert!(matches!(err, EngineError::InvalidParameter { .. }));
}

#[test]
fn customer_level_counts() {
    assert_eq!(
        run("get_multi_category_customers", &[]).unwrap(),
        AggregateResult::Scalar(Scalar::Integer(1))
    );
    assert_eq!(
        json_of("get_category_repurchase_rate", &[]),
        r#"{"Clothing":1.0,"Footwear":2.0,"Outerwear":1.0}"#
    );
}

#[test]
fn filters_combine_with_and() {
    assert_eq!(
        json_of(
            "get_revenue_by_season",
            &[("region", "Northeast"), ("category", "Clothing")]
        ),
        r#"{"Winter":20.0}"#
    );
}

#[test]
fn other_keys_never_restrict_rows() {
    let ignored = [("gender", "Male"), ("season", "Winter"), ("region_type", "Rural")];
    assert_eq!(
        json_of("get_revenue_by_season", &ignored),
        json_of("get_revenue_by_season", &[])
    );

    let result = Engine::new()
        .run(&minimal(), "get_top_products_by_revenue", &filters(&ignored))
        .unwrap();
    assert_eq!(
        result.as_mapping().unwrap(),
        &vec![(Value::from("B"), 20.0), (Value::from("A"), 15.0)]
    );
}

#[test]
fn empty_selection_is_empty_or_an_error() {
    let nowhere = [("region", "Atlantis")];
    for (name, _) in OPERATIONS {
        match run(name, &nowhere) {
            Ok(result) => assert!(result.is_empty(), "{name}: {result:?}"),
            Err(EngineError::EmptyResult(op)) => assert_eq!(op, *name),
            Err(e) => panic!("{name}: {e}"),
        }
    }
    assert_eq!(json_of("get_top_products_by_revenue", &nowhere), "{}");
    assert_eq!(
        json_of("get_sales_distribution_size_color", &nowhere),
        r#"{"size":{},"color":{}}"#
    );
    assert!(matches!(
        run("get_avg_purchase_frequency", &nowhere),
        Err(EngineError::EmptyResult(_))
    ));
}

#[test]
fn missing_column_is_reported() {
    let err = Engine::new()
        .run(&minimal(), "get_revenue_by_season", &FilterSet::new())
        .unwrap_err();
    assert_eq!(err, EngineError::MissingColumn("season".into()));

    let items = Dataset::new(
        vec!["item_purchased".into(), "total_revenue".into()],
        vec![vec!["A".into(), Value::Float(10.0)]],
    );
    let err = Engine::new()
        .run(&items, "get_top_products_by_revenue", &filters(&[("region", "US")]))
        .unwrap_err();
    assert_eq!(err, EngineError::MissingColumn("region".into()));
}
