//! End-to-end demo: train on synthetic telemetry, evaluate, and emit a
//! foraging-probability surface.
//!
//! Prints the held-out classification report to stderr (via the logger) and
//! the probability surface as JSON on stdout, in the same shape the heat-map
//! renderer consumes.
//!
//! Run with:
//! ```bash
//! RUST_LOG=info cargo run --bin hotspot_demo
//! ```

use foragecast::data::train_test_split;
use foragecast::features::FeaturePipeline;
use foragecast::model::{ForestConfig, RandomForest};
use foragecast::surface::{predict_surface, GridSpec};
use foragecast::testing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = 42u64;

    let pipeline = FeaturePipeline::new(
        vec!["sst".into(), "chlorophyll".into()],
        testing::fixture_eddies(),
    )
    .with_raster("sst", testing::sst_raster())
    .with_raster("chlorophyll", testing::chlorophyll_raster());

    let observations = testing::synthetic_observations(400, seed);
    let table = pipeline.featurize_observations(&observations)?;
    log::info!(
        "feature table: {} samples x {} features",
        table.n_samples(),
        table.n_features()
    );

    let (train_idx, test_idx) = train_test_split(table.n_samples(), 0.3, seed);
    let train = table.select(&train_idx);
    let held_out = table.select(&test_idx);

    let config = ForestConfig::builder().seed(seed).build();
    let forest = RandomForest::train(&train, config)?;

    let report = forest.evaluate(&held_out)?;
    log::info!("held-out evaluation:\n{report}");

    let grid = GridSpec::new((-120.0, -60.0), 50, (10.0, 50.0), 50);
    let surface = predict_surface(&pipeline, &forest, &grid)?;
    if let Some(hotspot) = surface.hotspot() {
        log::info!(
            "hotspot: ({:.2}, {:.2}) p={:.2}",
            hotspot.lat,
            hotspot.lon,
            hotspot.probability
        );
    }

    serde_json::to_writer(std::io::stdout().lock(), &surface)?;
    println!();
    Ok(())
}
