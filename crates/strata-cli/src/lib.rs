//! CLI logic for the Strata network tool.
//!
//! `strata render` turns one correlation matrix into the static scene, its
//! legend and the interactive document. `strata batch` runs every
//! combination of the `[batch]` configuration section.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, BatchArgs, Command, RenderArgs};

use std::path::{Path, PathBuf};

use log::{info, warn};

use strata::{
    NetworkBuilder, StrataError, batch::BatchReport, export::write_documents, layer::LayerSet,
};

/// How a successful run ended.
#[derive(Debug)]
pub enum RunStatus {
    /// Every requested document was written.
    Completed,
    /// A batch run had failed combinations or was aborted.
    Incomplete(BatchReport),
}

/// Run the Strata CLI application
///
/// # Errors
///
/// Returns `StrataError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Table parsing errors
/// - Graph errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<RunStatus, StrataError> {
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::Render(render_args) => {
            let builder = NetworkBuilder::new(app_config)?;
            render(&builder, render_args)?;
            Ok(RunStatus::Completed)
        }
        Command::Batch(batch_args) => {
            let app_config = match &batch_args.output_dir {
                Some(dir) => {
                    let batch = app_config.batch().clone().with_output_dir(dir);
                    app_config.with_batch(batch)
                }
                None => app_config,
            };
            let builder = NetworkBuilder::new(app_config)?;

            let report = builder.run_batch();
            if report.is_success() {
                info!(summary:% = report; "Batch completed");
                Ok(RunStatus::Completed)
            } else {
                warn!(summary:% = report; "Batch incomplete");
                Ok(RunStatus::Incomplete(report))
            }
        }
    }
}

fn render(builder: &NetworkBuilder, args: &RenderArgs) -> Result<(), StrataError> {
    info!(
        input_path = args.input,
        output_dir = args.output_dir;
        "Processing matrix"
    );

    let layer_set: LayerSet = args.layers.parse()?;
    let value = args
        .threshold
        .unwrap_or(builder.config().threshold().value());

    let matrix = builder.read_matrix(Path::new(&args.input))?;

    let static_graph = builder.build_graph(&matrix, &layer_set, builder.static_threshold(value)?)?;
    let static_layout = builder.layout(&static_graph);
    let (scene, legend) = builder
        .render_static(&static_graph, &static_layout)?
        .into_parts();

    let interactive_graph =
        builder.build_graph(&matrix, &layer_set, builder.interactive_threshold(value)?)?;
    let interactive_layout = builder.layout(&interactive_graph);
    let sizes = match &args.centrality {
        Some(path) => {
            let centrality = builder.read_centrality(Path::new(path))?;
            Some(builder.annotate(&interactive_graph, &centrality))
        }
        None => None,
    };
    let html = builder
        .render_interactive(&interactive_graph, &interactive_layout, sizes.as_ref())?
        .into_html();

    let label = builder.assigner().label_of(&layer_set);
    let output_dir = PathBuf::from(&args.output_dir);
    let documents = [
        (output_dir.join(format!("Correlationplot_{label}.svg")), scene.as_str()),
        (output_dir.join(format!("Correlationlegend_{label}.svg")), legend.as_str()),
        (output_dir.join(format!("interactiveplot_{label}.html")), html.as_str()),
    ];
    write_documents(&documents)?;

    info!(output_dir = args.output_dir, label; "Documents exported successfully");
    Ok(())
}
