//! Generate a deterministic synthetic conflict-event CSV for demos and
//! smoke tests. The layout mirrors a UCDP GED extract: core columns plus a
//! couple of ride-along attributes.

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

    /// Uniform integer in `[lo, hi]`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // (country, lon range, lat range) – rough Horn-of-Africa boxes
    let countries: [(&str, (f64, f64), (f64, f64)); 3] = [
        ("Ethiopia", (34.0, 46.0), (5.0, 14.0)),
        ("Kenya", (34.5, 41.0), (-4.0, 4.0)),
        ("Somalia", (41.0, 50.0), (0.0, 11.0)),
    ];

    let output_path = "sample_events.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record([
            "id",
            "latitude",
            "longitude",
            "best",
            "type_of_violence",
            "country",
            "year",
            "region",
        ])
        .expect("Failed to write header");

    let n_events = 100;
    for id in 0..n_events {
        let (country, lon_range, lat_range) = countries[(id % countries.len() as i64) as usize];
        let lon = lon_range.0 + rng.next_f64() * (lon_range.1 - lon_range.0);
        let lat = lat_range.0 + rng.next_f64() * (lat_range.1 - lat_range.0);
        let best = rng.range(0, 50);
        let type_of_violence = rng.range(1, 3);
        let year = rng.range(1990, 2020);

        writer
            .write_record([
                id.to_string(),
                format!("{lat:.4}"),
                format!("{lon:.4}"),
                best.to_string(),
                type_of_violence.to_string(),
                country.to_string(),
                year.to_string(),
                "Africa".to_string(),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output file");
    println!("Wrote {n_events} synthetic events to {output_path}");
}
