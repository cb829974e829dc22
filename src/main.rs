//! geogof - point data on a map
//!
//! This is the main entry point for the geogof application.

use anyhow::Context;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use geogof::config::Command;
use geogof::data_loader::load_source;
use geogof::logging::{
    init_tracing, log_error, log_operation_end, log_operation_start, log_timed_operation,
};
use geogof::{server, AppState, Config, Outline, PointDataset};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, command) = Config::load().context("Failed to load configuration")?;

    init_tracing(&config.log_level);
    info!("Starting geogof v{}", env!("CARGO_PKG_VERSION"));

    config.validate().map_err(|e| {
        log_error(&e, "configuration");
        e
    })?;

    match command {
        Command::Render {
            input,
            output,
            outline,
        } => {
            let start = Instant::now();
            log_operation_start("render", Some(&output.display().to_string()));

            let dataset = load_dataset(&config, &input)?;
            let outline = load_outline(outline.as_deref())?;
            let projection = config.render.projection()?;
            let (axes, geo_axes) = log_timed_operation("pointplot", || {
                dataset.pointplot_with(outline.as_ref(), projection, &config.render.plot)
            })
            .context("Failed to render point plot")?;
            axes.save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            info!(
                output = %output.display(),
                projection = geo_axes.projection().name(),
                points = axes.drawn_points(),
                "Plot written"
            );
            log_operation_end("render", start, true);
        }
        Command::Layer { input, output } => {
            let start = Instant::now();
            log_operation_start("layer", Some(&output.display().to_string()));

            let dataset = load_dataset(&config, &input)?;
            let layer = dataset
                .interactive_layer()
                .context("Failed to build interactive layer")?;
            let geojson = serde_json::to_string_pretty(&layer.to_geojson()?)?;
            std::fs::write(&output, geojson)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            info!(
                output = %output.display(),
                features = dataset.len(),
                min = layer.ramp().min(),
                max = layer.ramp().max(),
                "Layer written"
            );
            log_operation_end("layer", start, true);
        }
        Command::Serve { input, outline } => {
            let dataset = load_dataset(&config, &input)?;
            let outline = load_outline(outline.as_deref())?;
            let state = AppState::new_shared(config, dataset, outline, &input);
            server::run(state).await?;
        }
    }

    Ok(())
}

fn load_dataset(config: &Config, input: &Path) -> anyhow::Result<PointDataset> {
    info!("Loading point data: {}", input.display());
    let source = load_source(input, config.dataset.variable.as_deref())
        .with_context(|| format!("Failed to load {}", input.display()))?;
    let dataset = PointDataset::new(source, config.dataset.options.clone())?;
    info!(
        rows = dataset.len(),
        obj = dataset.obj_name(),
        "Dataset ready"
    );
    Ok(dataset)
}

fn load_outline(path: Option<&Path>) -> anyhow::Result<Option<Outline>> {
    path.map(|p| {
        Outline::load(p).with_context(|| format!("Failed to load outline {}", p.display()))
    })
    .transpose()
}
