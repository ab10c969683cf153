use anyhow::{Context, Result};
use chrono::{Duration, TimeZone, Utc};

const N_POINTS: usize = 1000;
const SINE_PERIOD: f64 = 100.0;
const NOISE_STD: f64 = 0.3;
const OUTPUT_PATH: &str = "data/noisy_sine_timeseries.csv";

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

    if let Some(dir) = std::path::Path::new(OUTPUT_PATH).parent() {
        std::fs::create_dir_all(dir).context("creating data directory")?;
    }
    let mut writer = csv::Writer::from_path(OUTPUT_PATH).context("creating output file")?;
    writer.write_record(["timestamp", "noisy_signal"])?;

    let t0 = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    for i in 0..N_POINTS {
        let ts = t0 + Duration::hours(i as i64);
        let clean = (2.0 * std::f64::consts::PI * i as f64 / SINE_PERIOD).sin();
        let noisy = clean + rng.gauss(0.0, NOISE_STD);
        writer.write_record([
            ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{noisy:.6}"),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {N_POINTS} hourly samples to {OUTPUT_PATH}");
    Ok(())
}
