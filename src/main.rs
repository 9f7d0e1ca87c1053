use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use pathway_explorer::config::Registry;
use pathway_explorer::data::loader::load_file;
use pathway_explorer::export::{CsvEncoder, TableEncoder};
use pathway_explorer::session::Session;

/// Headless driver: load a pathway file, run one dataset's pipeline with no
/// filters applied, and write the export table next to the working
/// directory. The interactive shell sits on top of the same `Session`.
fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        bail!("usage: pathway-explorer <data-file> [dataset-id]");
    };
    let dataset_id = args.next().unwrap_or_else(|| "pathways".to_string());

    let registry = Registry::builtin();
    let config = registry
        .get(&dataset_id)
        .with_context(|| format!("unknown dataset '{dataset_id}'"))?;

    let dataset = load_file(&path)?;
    log::info!(
        "Loaded {} rows with columns {:?}",
        dataset.len(),
        dataset.table.column_names()
    );

    let mut session = Session::new(config.clone());
    session.set_dataset(dataset);

    if let Some(msg) = &session.status_message {
        log::warn!("{msg}");
    }
    let output = session
        .output
        .as_ref()
        .context("pipeline produced no output")?;

    let encoder = CsvEncoder;
    let bytes = encoder.encode(&output.export_table)?;
    let out_path = format!("{dataset_id}_filtered_data.{}", encoder.extension());
    std::fs::write(&out_path, bytes).with_context(|| format!("writing {out_path}"))?;

    println!(
        "Wrote {} rows × {} columns to {out_path} ({} chart rows)",
        output.export_table.n_rows(),
        output.export_table.n_cols(),
        output.chart_rows.len()
    );
    Ok(())
}
