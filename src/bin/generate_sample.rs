//! Writes a deterministic synthetic `data/ResaleData.csv` for trying out the
//! dashboard without the real dataset.

use anyhow::{Context, Result};

const OUTPUT_PATH: &str = "data/ResaleData.csv";

/// (town, price multiplier relative to the island-wide base)
const TOWNS: [(&str, f64); 16] = [
    ("ANG MO KIO", 1.02),
    ("BEDOK", 0.98),
    ("BISHAN", 1.22),
    ("BUKIT BATOK", 0.92),
    ("BUKIT MERAH", 1.18),
    ("CLEMENTI", 1.15),
    ("HOUGANG", 0.95),
    ("JURONG WEST", 0.88),
    ("PASIR RIS", 0.97),
    ("PUNGGOL", 1.00),
    ("QUEENSTOWN", 1.30),
    ("SENGKANG", 0.96),
    ("TAMPINES", 1.05),
    ("TOA PAYOH", 1.12),
    ("WOODLANDS", 0.85),
    ("YISHUN", 0.87),
];

/// (flat type, base price, base floor area in sqm)
const FLAT_TYPES: [(&str, f64, f64); 5] = [
    ("2 ROOM", 250_000.0, 46.0),
    ("3 ROOM", 330_000.0, 68.0),
    ("4 ROOM", 440_000.0, 93.0),
    ("5 ROOM", 540_000.0, 112.0),
    ("EXECUTIVE", 640_000.0, 135.0),
];

const FLAT_MODELS: [&str; 5] = [
    "Improved",
    "New Generation",
    "Model A",
    "Simplified",
    "Premium Apartment",
];

/// Yearly price drift applied on top of the base.
const ANNUAL_DRIFT: f64 = 0.04;

const FIRST_YEAR: i32 = 2017;
const LAST_YEAR: i32 = 2024;
const ROWS_PER_MONTH: usize = 52;

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

    fn pick(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    std::fs::create_dir_all("data").context("creating data directory")?;
    let mut writer = csv::Writer::from_path(OUTPUT_PATH)
        .with_context(|| format!("creating {OUTPUT_PATH}"))?;

    writer.write_record([
        "month",
        "town",
        "flat_type",
        "block",
        "street_name",
        "storey_range",
        "floor_area_sqm",
        "flat_model",
        "lease_commence_date",
        "resale_price",
    ])?;

    let mut rows = 0usize;
    for year in FIRST_YEAR..=LAST_YEAR {
        for month in 1..=12u32 {
            let drift = (1.0 + ANNUAL_DRIFT).powi(year - FIRST_YEAR);
            for _ in 0..ROWS_PER_MONTH {
                let (town, town_mult) = TOWNS[rng.pick(TOWNS.len())];
                let (flat_type, base_price, base_area) = FLAT_TYPES[rng.pick(FLAT_TYPES.len())];

                let price = base_price * town_mult * drift * rng.gauss(1.0, 0.08);
                let area = (base_area + rng.gauss(0.0, 4.0)).max(30.0);

                let block = format!("{}{}", 100 + rng.pick(800), ["", "A", "B", "C"][rng.pick(4)]);
                let street = format!("{town} AVE {}", 1 + rng.pick(10));
                let storey_low = 1 + 3 * rng.pick(14);
                let storey = format!("{:02} TO {:02}", storey_low, storey_low + 2);
                let model = FLAT_MODELS[rng.pick(FLAT_MODELS.len())];
                let lease_year = 1970 + rng.pick(46) as i32;

                writer.write_record([
                    format!("{year}-{month:02}"),
                    town.to_string(),
                    flat_type.to_string(),
                    block,
                    street,
                    storey,
                    format!("{area:.1}"),
                    model.to_string(),
                    lease_year.to_string(),
                    format!("{:.0}", price.max(1000.0)),
                ])?;
                rows += 1;
            }
        }
    }

    writer.flush().context("flushing CSV")?;
    println!("wrote {rows} rows to {OUTPUT_PATH}");
    Ok(())
}
