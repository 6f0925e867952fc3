//! Strata - Multilayer correlation networks.
//!
//! Reads correlation matrices between clinical variables, keeps the pairs
//! whose correlation passes a threshold, and draws the resulting network with
//! every variable layer (neuropsychological tests, subcortical damage,
//! cortical damage) on its own plane. Output is a static SVG scene with a
//! node legend and an interactive HTML document.

pub mod assign;
pub mod batch;
pub mod centrality;
pub mod config;
pub mod export;
pub mod graph;
pub mod layout;

mod error;

pub use strata_core::{color, geometry, layer, matrix};

pub use error::{GraphError, LayoutError, StrataError};

use std::{fs, io, path::Path};

use log::{debug, info, trace};

use strata_core::{
    layer::LayerSet,
    matrix::{CentralityMap, CorrelationMatrix},
};

use assign::LayerAssigner;
use batch::BatchReport;
use centrality::{CentralityAnnotator, NodeSizeMap};
use config::AppConfig;
use export::{
    InteractiveArtifact, Renderer, Scene, StaticArtifact, html::InteractiveSceneRenderer,
    svg::StaticSceneRenderer,
};
use graph::{Graph, GraphBuilder, ThresholdPolicy};
use layout::{LayeredLayoutEngine, Layout};

/// Builder for turning correlation tables into rendered networks.
///
/// Holds the configuration and the layer assigner derived from it, and
/// exposes every pipeline stage: parsing, graph building, layout, centrality
/// sizing and rendering.
///
/// # Examples
///
/// ```rust
/// use strata::{NetworkBuilder, config::AppConfig, layer::LayerSet};
///
/// let source = "Name;LB;SD_IFOF\nLB;1;0.4\nSD_IFOF;0.4;1\n";
///
/// let builder = NetworkBuilder::new(AppConfig::default()).expect("valid config");
/// let matrix = builder.parse_matrix(source).expect("Failed to parse");
///
/// let threshold = builder.static_threshold(0.175).unwrap();
/// let graph = builder.build_graph(&matrix, &LayerSet::all(), threshold).unwrap();
/// let layout = builder.layout(&graph);
///
/// let artifact = builder.render_static(&graph, &layout).expect("Failed to render");
/// assert!(artifact.scene().contains("<svg"));
/// ```
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    config: AppConfig,
    assigner: LayerAssigner,
}

impl NetworkBuilder {
    /// Create a builder from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Config`] when a configured value is out of
    /// range.
    pub fn new(config: AppConfig) -> Result<Self, StrataError> {
        config.validate()?;
        let assigner = LayerAssigner::from_config(config.assigner(), config.layers());
        Ok(Self { config, assigner })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn assigner(&self) -> &LayerAssigner {
        &self.assigner
    }

    /// Parse a `;`-delimited correlation matrix.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Parse`] carrying the diagnostics and `source`.
    pub fn parse_matrix(&self, source: &str) -> Result<CorrelationMatrix, StrataError> {
        info!("Parsing correlation matrix");

        let matrix = strata_parser::parse_matrix(source)
            .map_err(|err| StrataError::new_parse_error(err, source))?;

        debug!(rows = matrix.rows(), columns = matrix.columns(); "Matrix parsed");
        trace!(names:? = matrix.column_names(); "Matrix columns");
        Ok(matrix)
    }

    /// Parse a `;`-delimited centrality table.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Parse`] carrying the diagnostics and `source`.
    pub fn parse_centrality(&self, source: &str) -> Result<CentralityMap, StrataError> {
        info!("Parsing centrality table");

        let centrality = strata_parser::parse_centrality(source)
            .map_err(|err| StrataError::new_parse_error(err, source))?;

        debug!(entries = centrality.len(); "Centrality parsed");
        Ok(centrality)
    }

    /// Read and parse the matrix at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::MissingInput`] if the file does not exist.
    pub fn read_matrix(&self, path: &Path) -> Result<CorrelationMatrix, StrataError> {
        let source = read_input(path)?;
        self.parse_matrix(&source)
    }

    /// Read and parse the centrality table at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::MissingInput`] if the file does not exist.
    pub fn read_centrality(&self, path: &Path) -> Result<CentralityMap, StrataError> {
        let source = read_input(path)?;
        self.parse_centrality(&source)
    }

    /// Threshold of the static scene, in the configured static mode.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidThreshold`] unless `0 < value <= 1`.
    pub fn static_threshold(&self, value: f64) -> Result<ThresholdPolicy, StrataError> {
        Ok(ThresholdPolicy::new(
            self.config.threshold().static_mode(),
            value,
        )?)
    }

    /// Threshold of the interactive document, in the configured interactive mode.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidThreshold`] unless `0 < value <= 1`.
    pub fn interactive_threshold(&self, value: f64) -> Result<ThresholdPolicy, StrataError> {
        Ok(ThresholdPolicy::new(
            self.config.threshold().interactive_mode(),
            value,
        )?)
    }

    /// Build the graph of the `layer_set` variables of `matrix`.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Graph`] for malformed matrices and, under the
    /// `reject` policy, for variables matching no layer rule.
    pub fn build_graph(
        &self,
        matrix: &CorrelationMatrix,
        layer_set: &LayerSet,
        threshold: ThresholdPolicy,
    ) -> Result<Graph, StrataError> {
        Ok(GraphBuilder::new(&self.assigner).build(matrix, layer_set, threshold)?)
    }

    pub fn layout(&self, graph: &Graph) -> Layout {
        LayeredLayoutEngine::new(self.assigner.palette()).layout(graph)
    }

    /// Node sizes of `graph` from `centrality`, scaled per configuration.
    pub fn annotate(&self, graph: &Graph, centrality: &CentralityMap) -> NodeSizeMap {
        let config = self.config.centrality();
        CentralityAnnotator::new(config.scale(), config.default_value()).annotate(graph, centrality)
    }

    /// Render the static scene and legend SVG documents.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Export`] if rendering fails.
    pub fn render_static(&self, graph: &Graph, layout: &Layout) -> Result<StaticArtifact, StrataError> {
        let renderer = StaticSceneRenderer::new(self.assigner.palette().clone())
            .with_style(self.config.style().static_scene().clone())
            .with_plane_padding(self.config.layout().plane_padding());

        let artifact = renderer.render(&Scene::new(graph, layout))?;
        info!("Static scene rendered successfully");
        Ok(artifact)
    }

    /// Render the interactive HTML document, sized by `sizes` when given.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Export`] if rendering fails.
    pub fn render_interactive(
        &self,
        graph: &Graph,
        layout: &Layout,
        sizes: Option<&NodeSizeMap>,
    ) -> Result<InteractiveArtifact, StrataError> {
        let renderer = InteractiveSceneRenderer::new(self.assigner.palette().clone())
            .with_style(self.config.style().interactive().clone());

        let artifact = renderer.render(&Scene::new(graph, layout).with_sizes(sizes))?;
        info!("Interactive document rendered successfully");
        Ok(artifact)
    }

    /// Run every combination of the configured batch section.
    pub fn run_batch(&self) -> BatchReport {
        batch::run_batch(self, self.config.batch())
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        let config = AppConfig::default();
        let assigner = LayerAssigner::from_config(config.assigner(), config.layers());
        Self { config, assigner }
    }
}

fn read_input(path: &Path) -> Result<String, StrataError> {
    match fs::read_to_string(path) {
        Ok(source) => Ok(source),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(StrataError::MissingInput(path.to_path_buf()))
        }
        Err(err) => Err(StrataError::Io(err)),
    }
}
