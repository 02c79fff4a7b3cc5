use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use encoding_rs::WINDOWS_1251;

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

    /// Uniform in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// (region, relative size)
const REGIONS: [(&str, f64); 8] = [
    ("Москва", 10.0),
    ("Санкт-Петербург", 5.5),
    ("Московская область", 6.0),
    ("Республика Татарстан", 3.0),
    ("Новосибирская область", 2.2),
    ("Свердловская область", 3.1),
    ("Краснодарский край", 3.4),
    ("Республика Саха (Якутия)", 1.8),
];

/// One generated file: name, year span, base level, yearly growth, rounding.
struct TopicSpec {
    file_name: &'static str,
    years: std::ops::RangeInclusive<i32>,
    base: f64,
    growth: f64,
    decimals: usize,
}

const TOPICS: [TopicSpec; 3] = [
    TopicSpec {
        file_name: "budget.csv",
        years: 2015..=2023,
        base: 1.2e10,
        growth: 0.07,
        decimals: 0,
    },
    TopicSpec {
        file_name: "housing.csv",
        years: 2016..=2023,
        base: 24.0,
        growth: 0.012,
        decimals: 1,
    },
    TopicSpec {
        file_name: "investments.csv",
        years: 2015..=2022,
        base: 4.5e9,
        growth: 0.09,
        decimals: 0,
    },
];

fn render(spec: &TopicSpec, rng: &mut SimpleRng) -> String {
    let mut text = String::from("Name");
    for year in spec.years.clone() {
        let _ = write!(text, ";{year}");
    }
    text.push('\n');

    for (region, size) in REGIONS {
        // Padded names exercise the loader's trimming.
        let _ = write!(text, " {region} ");
        let mut level = spec.base * if spec.decimals == 0 { size } else { 1.0 };
        level *= rng.uniform(0.8, 1.2);
        for _ in spec.years.clone() {
            level *= 1.0 + spec.growth + rng.uniform(-0.04, 0.04);
            let _ = write!(text, ";{:.*}", spec.decimals, level);
        }
        text.push('\n');
    }
    text
}

fn write_cp1251(path: &Path, text: &str) -> Result<()> {
    let (bytes, _, had_errors) = WINDOWS_1251.encode(text);
    if had_errors {
        bail!("{} contains characters outside windows-1251", path.display());
    }
    std::fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    for spec in &TOPICS {
        let path = out_dir.join(spec.file_name);
        write_cp1251(&path, &render(spec, &mut rng))?;
        println!(
            "Wrote {} regions x {} years to {}",
            REGIONS.len(),
            spec.years.clone().count(),
            path.display()
        );
    }
    Ok(())
}
