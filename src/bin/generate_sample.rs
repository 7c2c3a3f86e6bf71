use std::path::Path;

use anyhow::Result;
use rankings_explorer::data::export::{ExportFormat, export_to_path};
use rankings_explorer::data::model::{Focus, Record, ScoreField, Size, Status};

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const COUNTRIES: &[(&str, &str)] = &[
    ("Americas", "United States"),
    ("Americas", "Canada"),
    ("Americas", "Brazil"),
    ("Europe", "United Kingdom"),
    ("Europe", "Germany"),
    ("Europe", "Switzerland"),
    ("Asia", "Japan"),
    ("Asia", "China (Mainland)"),
    ("Asia", "Singapore"),
    ("Oceania", "Australia"),
    ("Africa", "South Africa"),
];

const NAME_STEMS: &[&str] = &[
    "Institute of Technology",
    "University",
    "State University",
    "College",
    "Polytechnic University",
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let n_rows = 300;

    let records: Vec<Record> = (0..n_rows)
        .map(|i| {
            let &(region, country) = rng.pick(COUNTRIES);
            let stem = rng.pick(NAME_STEMS);

            // rank-shaped overall scores: high at the top, decaying downwards
            let base = 100.0 - (i as f64).sqrt() * 3.5;
            let mut rec = Record {
                name: Some(format!("{country} {stem} {}", i + 1)),
                country: Some(country.to_string()),
                region: Some(region.to_string()),
                size: Some(rng.pick(&Size::ALL).code().to_string()),
                status: Some(rng.pick(&Status::ALL).code().to_string()),
                focus: Some(rng.pick(&Focus::ALL).code().to_string()),
                research: Some((1 + rng.next_u64() % 4) as f64),
                ..Default::default()
            };
            for field in ScoreField::ALL {
                let score = (base + rng.gauss(0.0, 6.0)).clamp(1.0, 100.0);
                // about one in twenty cells is missing, like the published tables
                let value = (rng.next_f64() > 0.05).then_some((score * 10.0).round() / 10.0);
                rec.set_score(field, value);
            }
            rec
        })
        .collect();

    for (path, format) in [
        ("sample_rankings.parquet", ExportFormat::Parquet),
        ("sample_rankings.csv", ExportFormat::Csv),
    ] {
        export_to_path(&records, format, Path::new(path))?;
        println!("Wrote {} universities to {path}", records.len());
    }
    Ok(())
}
