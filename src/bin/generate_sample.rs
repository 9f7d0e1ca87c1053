use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const FIRST_YEAR: i32 = 1995;
const LAST_YEAR: i32 = 2021;

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

/// One wide row: descriptors plus a value per year.
struct PathwayRow {
    model: String,
    scenario: String,
    region: String,
    variable: String,
    unit: String,
    values: Vec<Option<f64>>,
}

fn generate_rows() -> Vec<PathwayRow> {
    let mut rng = SimpleRng::new(42);

    let models = ["IMAGE", "MESSAGE", "REMIND"];
    let scenarios: Vec<(&str, f64)> = vec![
        ("Baseline", 0.015),
        ("Current Policies", 0.005),
        ("Net Zero 2050", -0.045),
    ];
    let regions = ["World", "OECD", "Non-OECD"];
    let variables: Vec<(&str, &str, f64)> = vec![
        ("Emissions|CO2", "Mt CO2/yr", 38000.0),
        ("Primary Energy", "EJ/yr", 560.0),
        ("GDP|PPP", "billion US$2010/yr", 105000.0),
    ];

    let n_years = (LAST_YEAR - FIRST_YEAR + 1) as usize;
    let mut rows = Vec::new();

    for model in &models {
        for (scenario, drift) in &scenarios {
            for region in &regions {
                for (variable, unit, base) in &variables {
                    let scale = match *region {
                        "World" => 1.0,
                        "OECD" => 0.4,
                        _ => 0.6,
                    };
                    let mut level = base * scale * (1.0 + rng.gauss(0.0, 0.05));
                    let mut values = Vec::with_capacity(n_years);
                    for _ in 0..n_years {
                        level *= 1.0 + drift + rng.gauss(0.0, 0.01);
                        // Sparse gaps: roughly 2% of cells are left blank so
                        // the coercion path sees missing data.
                        if rng.next_f64() < 0.02 {
                            values.push(None);
                        } else {
                            values.push(Some((level * 100.0).round() / 100.0));
                        }
                    }
                    rows.push(PathwayRow {
                        model: model.to_string(),
                        scenario: scenario.to_string(),
                        region: region.to_string(),
                        variable: variable.to_string(),
                        unit: unit.to_string(),
                        values,
                    });
                }
            }
        }
    }
    rows
}

fn write_csv(rows: &[PathwayRow], path: &str) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create output file");

    let mut header = vec![
        "Model".to_string(),
        "Scenario".to_string(),
        "Region".to_string(),
        "Variable".to_string(),
        "Unit".to_string(),
    ];
    header.extend((FIRST_YEAR..=LAST_YEAR).map(|y| y.to_string()));
    writer.write_record(&header).expect("Failed to write header");

    for row in rows {
        let mut record = vec![
            row.model.clone(),
            row.scenario.clone(),
            row.region.clone(),
            row.variable.clone(),
            row.unit.clone(),
        ];
        record.extend(
            row.values
                .iter()
                .map(|v| v.map(|x| x.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn write_parquet(rows: &[PathwayRow], path: &str) {
    let mut fields: Vec<Field> = ["Model", "Scenario", "Region", "Variable", "Unit"]
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, false))
        .collect();
    fields.extend(
        (FIRST_YEAR..=LAST_YEAR).map(|y| Field::new(y.to_string(), DataType::Float64, true)),
    );
    let schema = Arc::new(Schema::new(fields));

    let pickers: [fn(&PathwayRow) -> String; 5] = [
        |r| r.model.clone(),
        |r| r.scenario.clone(),
        |r| r.region.clone(),
        |r| r.variable.clone(),
        |r| r.unit.clone(),
    ];
    let mut arrays: Vec<ArrayRef> = Vec::new();
    for pick in pickers {
        let col: Vec<String> = rows.iter().map(pick).collect();
        arrays.push(Arc::new(StringArray::from(col)));
    }
    let n_years = (LAST_YEAR - FIRST_YEAR + 1) as usize;
    for year_idx in 0..n_years {
        let col: Vec<Option<f64>> = rows.iter().map(|r| r.values[year_idx]).collect();
        arrays.push(Arc::new(Float64Array::from(col)));
    }

    let batch =
        RecordBatch::try_new(schema.clone(), arrays).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let as_parquet = std::env::args().any(|a| a == "--parquet");
    let rows = generate_rows();

    let output_path = if as_parquet {
        let path = "sample_pathways.parquet";
        write_parquet(&rows, path);
        path
    } else {
        let path = "sample_pathways.csv";
        write_csv(&rows, path);
        path
    };

    println!(
        "Wrote {} pathway rows ({} year columns each) to {output_path}",
        rows.len(),
        LAST_YEAR - FIRST_YEAR + 1
    );
}
