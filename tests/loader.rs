//! Loading datasets from files on disk.

use std::fs;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

use trendlens::data::load_file;
use trendlens::{DataLoadError, Engine, FilterSet, Value};

const CSV: &str = "\
customer_id,item_purchased,category,region,total_revenue,quantity,promo_code_used
1,Blouse,Clothing,Northeast,53.5,1,true
2,Sandals,Footwear,South,20,2,false
1,Jacket,Outerwear,Northeast,,1,True
";

#[test]
fn csv_cells_get_their_types() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("shop.csv");
    fs::write(&path, CSV).unwrap();

    let ds = load_file(&path).unwrap();
    assert_eq!(ds.len(), 3);
    assert_eq!(ds.columns()[1], "item_purchased");

    let first = ds.rows()[0].values();
    assert_eq!(first[0], Value::Integer(1));
    assert_eq!(first[1], Value::from("Blouse"));
    assert_eq!(first[4], Value::Float(53.5));
    assert_eq!(first[6], Value::Bool(true));
    assert_eq!(ds.rows()[2].values()[4], Value::Null);
}

#[test]
fn loaded_csv_answers_questions() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("shop.csv");
    fs::write(&path, CSV).unwrap();
    let ds = load_file(&path).unwrap();

    let result = Engine::new()
        .run(&ds, "get_top_products_by_revenue", &FilterSet::new())
        .unwrap();
    assert_eq!(
        serde_json::to_string(&result).unwrap(),
        r#"{"Blouse":53.5,"Sandals":20.0,"Jacket":0.0}"#
    );
}

#[test]
fn mixed_numeric_column_groups_as_one_type() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("ratings.csv");
    fs::write(
        &path,
        "\
customer_id,item_purchased,category,region,total_revenue,quantity,review_rating
1,Blouse,Clothing,US,10,1,4.5
2,Jeans,Clothing,US,20,1,4
3,Boots,Footwear,US,30,1,3.5
4,Coat,Outerwear,US,40,1,4.0
",
    )
    .unwrap();
    let ds = load_file(&path).unwrap();

    let rating = ds.column_index("review_rating").unwrap();
    assert_eq!(ds.rows()[1].get(rating), &Value::Float(4.0));

    let result = Engine::new()
        .run(&ds, "get_revenue_by_rating", &FilterSet::new())
        .unwrap();
    assert_eq!(
        serde_json::to_string(&result).unwrap(),
        r#"{"3.5":30.0,"4":60.0,"4.5":10.0}"#
    );
}

#[test]
fn csv_text_is_kept_verbatim() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("spaces.csv");
    fs::write(
        &path,
        "\
customer_id,item_purchased,category,region,total_revenue,quantity
1,Blouse,Clothing, US,10,1
2,Jeans,Clothing,US,20,1
",
    )
    .unwrap();
    let ds = load_file(&path).unwrap();

    let regions: Vec<String> = ds.unique_values("region").iter().map(|v| v.to_string()).collect();
    assert_eq!(regions, [" US", "US"]);

    let mut filters = FilterSet::new();
    filters.insert("region".into(), "US".into());
    let result = Engine::new()
        .run(&ds, "get_top_products_by_revenue", &filters)
        .unwrap();
    assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"Jeans":20.0}"#);
}

#[test]
fn json_records_are_loaded() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("shop.json");
    fs::write(
        &path,
        r#"[
            {"customer_id": 7, "item_purchased": "Hat", "category": "Accessories",
             "region": "West", "total_revenue": 12.5, "quantity": 1, "is_subscribed": false},
            {"customer_id": 8, "item_purchased": "Scarf", "category": "Accessories",
             "region": "West", "total_revenue": 9, "quantity": 3}
        ]"#,
    )
    .unwrap();

    let ds = load_file(&path).unwrap();
    assert_eq!(ds.len(), 2);
    assert!(ds.has_column("is_subscribed"));
    let regions: Vec<String> = ds.unique_values("region").iter().map(|v| v.to_string()).collect();
    assert_eq!(regions, ["West"]);

    let subscribed = ds.column_index("is_subscribed").unwrap();
    assert_eq!(ds.rows()[1].get(subscribed), &Value::Null);
}

#[test]
fn json_must_be_an_array_of_objects() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("shop.json");
    fs::write(&path, r#"{"customer_id": 1}"#).unwrap();
    assert!(matches!(
        load_file(&path).unwrap_err(),
        DataLoadError::InvalidRow { row: 0, .. }
    ));
}

#[test]
fn parquet_columns_are_loaded() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("shop.parquet");

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("customer_id", Arc::new(Int64Array::from(vec![1, 2]))),
        ("item_purchased", Arc::new(StringArray::from(vec!["Blouse", "Boots"]))),
        ("category", Arc::new(StringArray::from(vec!["Clothing", "Footwear"]))),
        ("region", Arc::new(StringArray::from(vec!["South", "West"]))),
        ("total_revenue", Arc::new(Float64Array::from(vec![Some(40.0), None]))),
        ("quantity", Arc::new(Int64Array::from(vec![1, 2]))),
        ("is_weekend", Arc::new(BooleanArray::from(vec![true, false]))),
    ];
    let batch = RecordBatch::try_from_iter(columns).unwrap();
    let mut writer = ArrowWriter::try_new(fs::File::create(&path).unwrap(), batch.schema(), None)
        .unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let ds = load_file(&path).unwrap();
    assert_eq!(ds.len(), 2);
    let row = ds.rows()[0].values();
    assert_eq!(row[0], Value::Integer(1));
    assert_eq!(row[1], Value::from("Blouse"));
    assert_eq!(row[4], Value::Float(40.0));
    assert_eq!(row[6], Value::Bool(true));
    assert_eq!(ds.rows()[1].values()[4], Value::Null);
}

#[test]
fn required_columns_are_checked() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("partial.csv");
    fs::write(&path, "customer_id,region\n1,West\n").unwrap();

    match load_file(&path).unwrap_err() {
        DataLoadError::MissingColumns(missing) => {
            assert_eq!(
                missing,
                ["item_purchased", "category", "total_revenue", "quantity"]
            );
        }
        other => panic!("unexpected {other:?}"),
    }
}
