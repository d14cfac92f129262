//! Writes a small synthetic working set: a `syn`-layout catalog, a resonance
//! table, libration lists and a settings file pointing at them.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use resonance_dataset::resonance::librations_file_name;
use resonance_dataset::Settings;

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

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }
}

/// Three-body Jupiter-Saturn resonances: integers, padding, axis.
const RESONANCES: [([i64; 6], f64); 4] = [
    ([2, -5, -2, 0, 0, 5], 2.0010),
    ([4, -2, -1, 0, 0, -1], 2.3931),
    ([3, -1, -1, 0, 0, -1], 2.7520),
    ([5, -2, -2, 0, 0, -1], 3.1730),
];

#[derive(Debug, Parser)]
#[command(name = "generate-sample", about = "Write a synthetic resonance working set")]
struct Args {
    /// Output directory.
    #[arg(default_value = "sample")]
    out: PathBuf,

    /// Number of asteroids in the catalog.
    #[arg(short, long, default_value_t = 20000)]
    asteroids: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let librations = args.out.join("librations");
    std::fs::create_dir_all(&librations)
        .with_context(|| format!("creating {}", librations.display()))?;

    // Catalog: id, H, a, e, sin i (float), four precise elements, one flag.
    let mut catalog = String::from("% synthetic elements\n% id H a e sini g s p q flag\n");
    let mut axes = Vec::with_capacity(args.asteroids);
    for id in 1..=args.asteroids {
        let axis = rng.uniform(1.9, 3.3);
        axes.push((id as i64, axis));
        writeln!(
            catalog,
            "{id}  {:.6}  {axis:.6}  {:.6}  {:.6}  {:.18e}  {:.18e}  {:.18e}  {:.18e}  {}",
            rng.uniform(10.0, 18.0),
            rng.uniform(0.0, 0.3),
            rng.uniform(0.0, 0.3),
            rng.uniform(-50.0, 50.0),
            rng.uniform(-50.0, 0.0),
            rng.uniform(-1.0, 1.0),
            rng.uniform(-1.0, 1.0),
            rng.next_u64() % 2,
        )?;
    }
    write(&args.out.join("catalog.syn"), &catalog)?;

    let mut table = String::new();
    for (integers, axis) in RESONANCES {
        let fields: Vec<String> = integers.iter().map(|i| i.to_string()).collect();
        writeln!(table, "{} {axis:.4} {axis:.4}", fields.join(" "))?;

        // Roughly a third of the nearby asteroids librate.
        let members: Vec<String> = axes
            .iter()
            .filter(|(_, a)| (a - axis).abs() <= 0.01)
            .filter(|_| rng.next_f64() < 0.35)
            .map(|(id, _)| id.to_string())
            .collect();
        let name = librations_file_name(&[integers[0], integers[1], integers[2]]);
        write(&librations.join(&name), &(members.join("\n") + "\n"))?;
        println!("{name}: {} librating asteroids", members.len());
    }
    write(&args.out.join("resonances.txt"), &table)?;

    let settings = Settings {
        syn_catalog: args.out.join("catalog.syn"),
        resonance_table: args.out.join("resonances.txt"),
        librations_folder: librations,
        cache_dir: args.out.join("cache"),
        ..Settings::default()
    };
    let settings_path = args.out.join("settings.json");
    write(&settings_path, &serde_json::to_string_pretty(&settings)?)?;

    println!(
        "Wrote {} asteroids and {} resonances; run with --settings {}",
        args.asteroids,
        RESONANCES.len(),
        settings_path.display()
    );
    Ok(())
}

fn write(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
