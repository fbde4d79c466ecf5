use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Write a synthetic retail dataset for trying out the dashboard and server
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Number of transactions
    #[arg(long, default_value_t = 3900)]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output file (.csv or .parquet)
    #[arg(short, long, default_value = "shop_sample.csv")]
    output: PathBuf,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.below(choices.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const ITEMS: &[(&str, &str)] = &[
    ("Blouse", "Clothing"),
    ("Sweater", "Clothing"),
    ("Jeans", "Clothing"),
    ("Shirt", "Clothing"),
    ("Dress", "Clothing"),
    ("Sneakers", "Footwear"),
    ("Boots", "Footwear"),
    ("Sandals", "Footwear"),
    ("Handbag", "Accessories"),
    ("Jewelry", "Accessories"),
    ("Sunglasses", "Accessories"),
    ("Belt", "Accessories"),
    ("Coat", "Outerwear"),
    ("Jacket", "Outerwear"),
];
const REGIONS: &[(&str, &str)] = &[
    ("Northeast", "Urban"),
    ("Midwest", "Rural"),
    ("South", "Suburban"),
    ("West", "Urban"),
    ("Mountain", "Rural"),
];
const GENDERS: &[&str] = &["Female", "Male"];
const SEASONS: &[&str] = &["Winter", "Spring", "Summer", "Fall"];
const SIZES: &[&str] = &["S", "M", "L", "XL"];
const COLORS: &[&str] = &["Black", "White", "Blue", "Red", "Green", "Gray"];
const SHIPPING: &[&str] = &["Standard", "Express", "Free Shipping", "Next Day Air", "Store Pickup"];
const PAYMENTS: &[&str] = &["Credit Card", "PayPal", "Cash", "Debit Card", "Venmo"];
const TRENDS: &[&str] = &["High", "Medium", "Low"];
const DAYS: &[&str] = &["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

/// Attributes fixed per customer.
struct Customer {
    age: i64,
    gender: &'static str,
    region: (&'static str, &'static str),
    subscribed: bool,
    purchase_frequency: f64,
}

#[derive(Debug, Clone, Serialize)]
struct Row {
    customer_id: i64,
    item_purchased: &'static str,
    category: &'static str,
    region: &'static str,
    region_type: &'static str,
    gender: &'static str,
    age: i64,
    season: &'static str,
    month: i64,
    quarter: String,
    day_of_week: &'static str,
    is_weekend: bool,
    product_size: &'static str,
    product_color: &'static str,
    shipping_type: &'static str,
    payment_method: &'static str,
    promo_code_used: bool,
    is_subscribed: bool,
    trend_flag: &'static str,
    quantity: i64,
    price: f64,
    total_revenue: f64,
    popularity_score: f64,
    purchase_frequency: f64,
    review_rating: f64,
    average_spending: f64,
    discount_effectiveness: f64,
    most_purchased_category_by_age: &'static str,
    most_purchased_category_by_gender: &'static str,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<Row> {
    let n_customers = (rows / 3).max(1);
    let customers: Vec<Customer> = (0..n_customers)
        .map(|_| Customer {
            age: 18 + rng.below(53) as i64,
            gender: rng.pick(GENDERS),
            region: REGIONS[rng.below(REGIONS.len())],
            subscribed: rng.chance(0.3),
            purchase_frequency: round2(rng.range(1.0, 52.0)),
        })
        .collect();

    let mut out: Vec<Row> = (0..rows)
        .map(|_| {
            let customer_idx = rng.below(n_customers);
            let c = &customers[customer_idx];
            let (item, category) = ITEMS[rng.below(ITEMS.len())];
            let month = 1 + rng.below(12) as i64;
            let day = rng.below(DAYS.len());
            let quantity = 1 + rng.below(5) as i64;
            let price = round2(rng.range(10.0, 100.0));
            let promo = rng.chance(if c.subscribed { 0.6 } else { 0.3 });
            Row {
                customer_id: customer_idx as i64 + 1,
                item_purchased: item,
                category,
                region: c.region.0,
                region_type: c.region.1,
                gender: c.gender,
                age: c.age,
                season: SEASONS[((month % 12) / 3) as usize],
                month,
                quarter: format!("Q{}", (month - 1) / 3 + 1),
                day_of_week: DAYS[day],
                is_weekend: day >= 5,
                product_size: rng.pick(SIZES),
                product_color: rng.pick(COLORS),
                shipping_type: rng.pick(SHIPPING),
                payment_method: rng.pick(PAYMENTS),
                promo_code_used: promo,
                is_subscribed: c.subscribed,
                trend_flag: rng.pick(TRENDS),
                quantity,
                price,
                total_revenue: round2(price * quantity as f64),
                popularity_score: round2(rng.range(1.0, 10.0)),
                purchase_frequency: c.purchase_frequency,
                review_rating: (rng.range(2.5, 5.0) * 10.0).round() / 10.0,
                average_spending: round2(rng.range(20.0, 120.0)),
                discount_effectiveness: if promo { round2(rng.range(0.0, 1.0)) } else { 0.0 },
                most_purchased_category_by_age: "",
                most_purchased_category_by_gender: "",
            }
        })
        .collect();

    // Fill the per-age and per-gender favourite category by quantity.
    let mut by_age: BTreeMap<i64, BTreeMap<&'static str, i64>> = BTreeMap::new();
    let mut by_gender: BTreeMap<&'static str, BTreeMap<&'static str, i64>> = BTreeMap::new();
    for r in &out {
        *by_age.entry(r.age).or_default().entry(r.category).or_default() += r.quantity;
        *by_gender.entry(r.gender).or_default().entry(r.category).or_default() += r.quantity;
    }
    fn favourite(counts: Option<&BTreeMap<&'static str, i64>>) -> &'static str {
        counts
            .and_then(|m| m.iter().max_by_key(|(_, n)| **n).map(|(c, _)| *c))
            .unwrap_or("")
    }
    for r in &mut out {
        r.most_purchased_category_by_age = favourite(by_age.get(&r.age));
        r.most_purchased_category_by_gender = favourite(by_gender.get(r.gender));
    }
    out
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    fn strings(rows: &[Row], f: impl Fn(&Row) -> &str) -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    }
    fn ints(rows: &[Row], f: impl Fn(&Row) -> i64) -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    }
    fn floats(rows: &[Row], f: impl Fn(&Row) -> f64) -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    }
    fn bools(rows: &[Row], f: impl Fn(&Row) -> bool) -> ArrayRef {
        Arc::new(BooleanArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    }

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("customer_id", ints(rows, |r| r.customer_id)),
        ("item_purchased", strings(rows, |r| r.item_purchased)),
        ("category", strings(rows, |r| r.category)),
        ("region", strings(rows, |r| r.region)),
        ("region_type", strings(rows, |r| r.region_type)),
        ("gender", strings(rows, |r| r.gender)),
        ("age", ints(rows, |r| r.age)),
        ("season", strings(rows, |r| r.season)),
        ("month", ints(rows, |r| r.month)),
        ("quarter", strings(rows, |r| r.quarter.as_str())),
        ("day_of_week", strings(rows, |r| r.day_of_week)),
        ("is_weekend", bools(rows, |r| r.is_weekend)),
        ("product_size", strings(rows, |r| r.product_size)),
        ("product_color", strings(rows, |r| r.product_color)),
        ("shipping_type", strings(rows, |r| r.shipping_type)),
        ("payment_method", strings(rows, |r| r.payment_method)),
        ("promo_code_used", bools(rows, |r| r.promo_code_used)),
        ("is_subscribed", bools(rows, |r| r.is_subscribed)),
        ("trend_flag", strings(rows, |r| r.trend_flag)),
        ("quantity", ints(rows, |r| r.quantity)),
        ("price", floats(rows, |r| r.price)),
        ("total_revenue", floats(rows, |r| r.total_revenue)),
        ("popularity_score", floats(rows, |r| r.popularity_score)),
        ("purchase_frequency", floats(rows, |r| r.purchase_frequency)),
        ("review_rating", floats(rows, |r| r.review_rating)),
        ("average_spending", floats(rows, |r| r.average_spending)),
        ("discount_effectiveness", floats(rows, |r| r.discount_effectiveness)),
        ("most_purchased_category_by_age", strings(rows, |r| r.most_purchased_category_by_age)),
        ("most_purchased_category_by_gender", strings(rows, |r| r.most_purchased_category_by_gender)),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, array)| Field::new(*name, array.data_type().clone(), false))
            .collect::<Vec<_>>(),
    ));

    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, array)| array).collect(),
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = SimpleRng::new(args.seed);
    let rows = generate(args.rows, &mut rng);

    let ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_csv(&args.output, &rows)?,
        "parquet" | "pq" => write_parquet(&args.output, &rows)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    println!(
        "Wrote {} transactions for {} customers to {}",
        rows.len(),
        (args.rows / 3).max(1),
        args.output.display()
    );
    Ok(())
}
