//! Shared fixture: a handful of purchases covering every column the
//! operations read.
#![allow(dead_code)]

use trendlens::data::{col, FilterSet};
use trendlens::{Dataset, Value};

pub const COLUMNS: &[&str] = &[
    col::CUSTOMER_ID,
    col::ITEM_PURCHASED,
    col::CATEGORY,
    col::REGION,
    col::REGION_TYPE,
    col::GENDER,
    col::SEASON,
    col::PRODUCT_SIZE,
    col::PRODUCT_COLOR,
    col::SHIPPING_TYPE,
    col::PAYMENT_METHOD,
    col::PROMO_CODE_USED,
    col::IS_SUBSCRIBED,
    col::IS_WEEKEND,
    col::TREND_FLAG,
    col::CATEGORY_BY_AGE,
    col::CATEGORY_BY_GENDER,
    col::AGE,
    col::TOTAL_REVENUE,
    col::QUANTITY,
    col::PRICE,
    col::POPULARITY_SCORE,
    col::PURCHASE_FREQUENCY,
    col::REVIEW_RATING,
    col::AVERAGE_SPENDING,
    col::DISCOUNT_EFFECTIVENESS,
    col::MONTH,
    col::DAY_OF_WEEK,
];

pub struct Sale {
    pub customer: i64,
    pub item: &'static str,
    pub category: &'static str,
    pub region: &'static str,
    pub region_type: &'static str,
    pub gender: &'static str,
    pub season: &'static str,
    pub size: &'static str,
    pub color: &'static str,
    pub shipping: &'static str,
    pub payment: &'static str,
    pub promo: bool,
    pub subscribed: bool,
    pub weekend: bool,
    pub trend: &'static str,
    pub age: i64,
    pub revenue: f64,
    pub quantity: i64,
    pub price: f64,
    pub popularity: f64,
    pub frequency: i64,
    pub rating: f64,
    pub spending: f64,
    pub discount: f64,
    pub month: i64,
    pub day: &'static str,
}

impl Sale {
    fn into_row(self) -> Vec<Value> {
        vec![
            Value::Integer(self.customer),
            self.item.into(),
            self.category.into(),
            self.region.into(),
            self.region_type.into(),
            self.gender.into(),
            self.season.into(),
            self.size.into(),
            self.color.into(),
            self.shipping.into(),
            self.payment.into(),
            self.promo.into(),
            self.subscribed.into(),
            self.weekend.into(),
            self.trend.into(),
            self.category.into(),
            self.category.into(),
            Value::Integer(self.age),
            self.revenue.into(),
            Value::Integer(self.quantity),
            self.price.into(),
            self.popularity.into(),
            Value::Integer(self.frequency),
            self.rating.into(),
            self.spending.into(),
            self.discount.into(),
            Value::Integer(self.month),
            self.day.into(),
        ]
    }
}

/// Five purchases by three customers in three regions.
pub fn shop() -> Dataset {
    let sales = vec![
        Sale {
            customer: 1,
            item: "Blouse",
            category: "Clothing",
            region: "Northeast",
            region_type: "Urban",
            gender: "Female",
            season: "Winter",
            size: "M",
            color: "Red",
            shipping: "Express",
            payment: "Card",
            promo: true,
            subscribed: true,
            weekend: false,
            trend: "High",
            age: 22,
            revenue: 20.0,
            quantity: 2,
            price: 10.0,
            popularity: 90.0,
            frequency: 5,
            rating: 4.0,
            spending: 50.0,
            discount: 0.3,
            month: 1,
            day: "Monday",
        },
        Sale {
            customer: 2,
            item: "Sandals",
            category: "Footwear",
            region: "South",
            region_type: "Rural",
            gender: "Male",
            season: "Summer",
            size: "L",
            color: "Blue",
            shipping: "Standard",
            payment: "Cash",
            promo: false,
            subscribed: false,
            weekend: true,
            trend: "Low",
            age: 40,
            revenue: 15.0,
            quantity: 1,
            price: 15.0,
            popularity: 40.0,
            frequency: 2,
            rating: 3.0,
            spending: 30.0,
            discount: 0.1,
            month: 6,
            day: "Saturday",
        },
        Sale {
            customer: 1,
            item: "Jacket",
            category: "Outerwear",
            region: "Northeast",
            region_type: "Urban",
            gender: "Female",
            season: "Winter",
            size: "S",
            color: "Red",
            shipping: "Express",
            payment: "Card",
            promo: false,
            subscribed: true,
            weekend: false,
            trend: "High",
            age: 22,
            revenue: 30.0,
            quantity: 1,
            price: 30.0,
            popularity: 95.0,
            frequency: 5,
            rating: 4.5,
            spending: 50.0,
            discount: 0.4,
            month: 1,
            day: "Tuesday",
        },
        Sale {
            customer: 3,
            item: "Blouse",
            category: "Clothing",
            region: "West",
            region_type: "Urban",
            gender: "Male",
            season: "Spring",
            size: "M",
            color: "Green",
            shipping: "Standard",
            payment: "PayPal",
            promo: true,
            subscribed: false,
            weekend: false,
            trend: "Medium",
            age: 30,
            revenue: 10.0,
            quantity: 1,
            price: 10.0,
            popularity: 60.0,
            frequency: 3,
            rating: 3.5,
            spending: 20.0,
            discount: 0.2,
            month: 3,
            day: "Monday",
        },
        Sale {
            customer: 2,
            item: "Sandals",
            category: "Footwear",
            region: "South",
            region_type: "Rural",
            gender: "Male",
            season: "Summer",
            size: "L",
            color: "Blue",
            shipping: "Free Shipping",
            payment: "Cash",
            promo: false,
            subscribed: false,
            weekend: true,
            trend: "Low",
            age: 40,
            revenue: 5.0,
            quantity: 1,
            price: 5.0,
            popularity: 35.0,
            frequency: 2,
            rating: 2.5,
            spending: 30.0,
            discount: 0.05,
            month: 7,
            day: "Sunday",
        },
    ];

    Dataset::new(
        COLUMNS.iter().map(|c| c.to_string()).collect(),
        sales.into_iter().map(Sale::into_row).collect(),
    )
}

/// Only the columns a loaded file must carry, with three sales of two items.
pub fn minimal() -> Dataset {
    let columns = [
        col::CUSTOMER_ID,
        col::ITEM_PURCHASED,
        col::CATEGORY,
        col::REGION,
        col::TOTAL_REVENUE,
        col::QUANTITY,
    ];
    Dataset::new(
        columns.iter().map(|c| c.to_string()).collect(),
        vec![
            vec![Value::Integer(1), "A".into(), "Clothing".into(), "US".into(), Value::Float(10.0), Value::Integer(1)],
            vec![Value::Integer(2), "B".into(), "Clothing".into(), "US".into(), Value::Float(20.0), Value::Integer(2)],
            vec![Value::Integer(1), "A".into(), "Clothing".into(), "US".into(), Value::Float(5.0), Value::Integer(1)],
        ],
    )
}

pub fn filters(pairs: &[(&str, &str)]) -> FilterSet {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
