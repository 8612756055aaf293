//! Writes a deterministic sample sales CSV so the app can be demoed without
//! the real dataset. Usage: `cargo run --bin generate_sample [out.csv]`

use anyhow::{Context, Result};
use chrono::NaiveDate;

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

    /// Uniform float in [0, 1).
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const ROWS: usize = 300;

const BRANCHES: [(&str, &str); 3] = [
    ("A", "Yangon"),
    ("B", "Mandalay"),
    ("C", "Naypyitaw"),
];

const PRODUCT_LINES: [&str; 6] = [
    "Health and beauty",
    "Electronic accessories",
    "Home and lifestyle",
    "Sports and travel",
    "Food and beverages",
    "Fashion accessories",
];

const PAYMENTS: [&str; 3] = ["Cash", "Credit card", "Ewallet"];
const CUSTOMER_TYPES: [&str; 2] = ["Member", "Normal"];
const GENDERS: [&str; 2] = ["Male", "Female"];

fn main() -> Result<()> {
    let out = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_sales.csv".to_string());

    let mut rng = SimpleRng::new(39);
    let mut writer = csv::Writer::from_path(&out).with_context(|| format!("creating {out}"))?;

    writer.write_record([
        "Invoice ID",
        "Branch",
        "City",
        "Customer type",
        "Gender",
        "Product line",
        "Unit price",
        "Quantity",
        "Tax 5%",
        "Total",
        "Date",
        "Time",
        "Payment",
        "cogs",
        "gross income",
        "Rating",
    ])?;

    let start = NaiveDate::from_ymd_opt(2019, 1, 1).expect("valid date");

    for i in 0..ROWS {
        let (branch, city) = rng.pick(&BRANCHES);
        let unit_price = rng.uniform(10.0, 100.0);
        let quantity = 1 + (rng.next_u64() % 10) as u32;
        let cogs = unit_price * quantity as f64;
        let tax = cogs * 0.05;
        let total = cogs + tax;

        let date = start + chrono::Days::new(rng.next_u64() % 90);
        let hour = 10 + (rng.next_u64() % 11);
        let minute = rng.next_u64() % 60;

        writer.write_record([
            format!("{:03}-{:02}-{:04}", i / 100, i % 100, rng.next_u64() % 10_000),
            branch.to_string(),
            city.to_string(),
            rng.pick(&CUSTOMER_TYPES).to_string(),
            rng.pick(&GENDERS).to_string(),
            rng.pick(&PRODUCT_LINES).to_string(),
            format!("{unit_price:.2}"),
            quantity.to_string(),
            format!("{tax:.4}"),
            format!("{total:.4}"),
            date.format("%-m/%-d/%Y").to_string(),
            format!("{hour}:{minute:02}"),
            rng.pick(&PAYMENTS).to_string(),
            format!("{cogs:.2}"),
            format!("{tax:.4}"),
            format!("{:.1}", rng.uniform(4.0, 10.0)),
        ])?;
    }

    writer.flush()?;
    println!("Wrote {ROWS} transactions to {out}");
    Ok(())
}
