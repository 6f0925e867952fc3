//! Configuration types for Strata.
//!
//! This module provides configuration structures that control layer rules,
//! thresholds, styling and batch runs. All types implement
//! [`serde::Deserialize`] and every section falls back to its defaults, so an
//! empty file is a valid configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`AssignerConfig`] and [`LayersConfig`] - Layer rules and palette.
//! - [`ThresholdConfig`] - Threshold value and modes per renderer.
//! - [`LayoutConfig`] - Plane padding.
//! - [`StyleConfig`] - Static and interactive renderer styling.
//! - [`CentralityConfig`] - Node size scaling.
//! - [`BatchConfig`] - Combinations, path templates and missing-input policy.
//!
//! # Example
//!
//! ```
//! # use strata::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.threshold().value(), 0.175);
//! ```

use std::{collections::BTreeMap, path::PathBuf};

use serde::Deserialize;

use strata_core::{
    color::Color,
    geometry::Projection,
    layer::{LayerSet, LayerTag},
};

use crate::{
    assign::UnknownNodePolicy,
    batch::MissingInputPolicy,
    error::StrataError,
    graph::{ThresholdMode, ThresholdPolicy},
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layer rule section.
    #[serde(default)]
    assigner: AssignerConfig,

    /// Per-layer palette overrides.
    #[serde(default)]
    layers: LayersConfig,

    #[serde(default)]
    threshold: ThresholdConfig,

    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    centrality: CentralityConfig,

    #[serde(default)]
    batch: BatchConfig,
}

impl AppConfig {
    pub fn assigner(&self) -> &AssignerConfig {
        &self.assigner
    }

    pub fn layers(&self) -> &LayersConfig {
        &self.layers
    }

    pub fn threshold(&self) -> &ThresholdConfig {
        &self.threshold
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn centrality(&self) -> &CentralityConfig {
        &self.centrality
    }

    pub fn batch(&self) -> &BatchConfig {
        &self.batch
    }

    /// Returns a copy with the batch section replaced.
    pub fn with_batch(mut self, batch: BatchConfig) -> Self {
        self.batch = batch;
        self
    }

    /// Checks value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Config`] naming the first offending key.
    pub fn validate(&self) -> Result<(), StrataError> {
        for layer in LayerTag::ALL {
            let Some(radius) = self.layers.layer(layer).radius() else {
                continue;
            };
            if !(radius.is_finite() && radius > 0.0) {
                return Err(config_error(format!(
                    "layers.{}.radius must be positive, got {radius}",
                    layer.code().to_lowercase()
                )));
            }
        }

        check_threshold("threshold.value", self.threshold.value)?;
        for value in &self.batch.thresholds {
            check_threshold("batch.thresholds", *value)?;
        }

        if !(self.layout.plane_padding.is_finite() && self.layout.plane_padding >= 0.0) {
            return Err(config_error("layout.plane_padding must be zero or positive"));
        }

        let static_style = &self.style.static_scene;
        if !(0.0..=1.0).contains(&static_style.plane_alpha) {
            return Err(config_error("style.static.plane_alpha must be within [0, 1]"));
        }
        if static_style.legend_columns == 0 {
            return Err(config_error("style.static.legend_columns must be at least 1"));
        }

        let interactive = &self.style.interactive;
        if !(interactive.position_scale.is_finite() && interactive.position_scale > 0.0) {
            return Err(config_error("style.interactive.position_scale must be positive"));
        }
        if !interactive.edge_weight_scale.is_finite() {
            return Err(config_error("style.interactive.edge_weight_scale must be finite"));
        }

        let centrality = &self.centrality;
        if !(centrality.scale.is_finite() && centrality.scale >= 0.0) {
            return Err(config_error("centrality.scale must be zero or positive"));
        }
        if !(centrality.default_value.is_finite() && centrality.default_value >= 0.0) {
            return Err(config_error("centrality.default_value must be zero or positive"));
        }

        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> StrataError {
    StrataError::Config(message.into())
}

fn check_threshold(key: &str, value: f64) -> Result<(), StrataError> {
    ThresholdPolicy::dual(value)
        .map(|_| ())
        .map_err(|err| config_error(format!("{key}: {err}")))
}

/// Layer rules.
///
/// ```toml
/// [assigner]
/// unknown_nodes = "exclude"
///
/// [assigner.prefixes]
/// "WM_" = "SD"
///
/// [assigner.exact]
/// "Age" = 1
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssignerConfig {
    unknown_nodes: UnknownNodePolicy,
    use_default_rules: bool,
    exact: BTreeMap<String, LayerTag>,
    prefixes: BTreeMap<String, LayerTag>,
}

impl Default for AssignerConfig {
    fn default() -> Self {
        Self {
            unknown_nodes: UnknownNodePolicy::default(),
            use_default_rules: true,
            exact: BTreeMap::new(),
            prefixes: BTreeMap::new(),
        }
    }
}

impl AssignerConfig {
    pub fn unknown_nodes(&self) -> UnknownNodePolicy {
        self.unknown_nodes
    }

    /// Whether the built-in rules are installed before the configured ones.
    pub fn use_default_rules(&self) -> bool {
        self.use_default_rules
    }

    pub fn exact(&self) -> &BTreeMap<String, LayerTag> {
        &self.exact
    }

    pub fn prefixes(&self) -> &BTreeMap<String, LayerTag> {
        &self.prefixes
    }
}

/// Palette overrides, one table per layer code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LayersConfig {
    nt: LayerStyleConfig,
    sd: LayerStyleConfig,
    cd: LayerStyleConfig,
}

impl LayersConfig {
    pub fn layer(&self, layer: LayerTag) -> &LayerStyleConfig {
        match layer {
            LayerTag::NeuroTests => &self.nt,
            LayerTag::SubcorticalDamage => &self.sd,
            LayerTag::CorticalDamage => &self.cd,
        }
    }
}

/// Optional overrides of one layer's style. Unset fields keep the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LayerStyleConfig {
    color: Option<Color>,
    radius: Option<f32>,
    name: Option<String>,
}

impl LayerStyleConfig {
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn radius(&self) -> Option<f32> {
        self.radius
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Threshold used by `strata render` and the interval mode of each renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    value: f64,
    static_mode: ThresholdMode,
    interactive_mode: ThresholdMode,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            value: 0.175,
            static_mode: ThresholdMode::Dual,
            interactive_mode: ThresholdMode::Single,
        }
    }
}

impl ThresholdConfig {
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Interval mode of the graph drawn by the static renderer.
    pub fn static_mode(&self) -> ThresholdMode {
        self.static_mode
    }

    /// Interval mode of the graph drawn by the interactive renderer.
    pub fn interactive_mode(&self) -> ThresholdMode {
        self.interactive_mode
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Relative padding of layer planes around the node extent.
    plane_padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { plane_padding: 0.1 }
    }
}

impl LayoutConfig {
    pub fn plane_padding(&self) -> f32 {
        self.plane_padding
    }
}

/// Styling of both renderers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    #[serde(rename = "static")]
    static_scene: StaticStyle,
    interactive: InteractiveStyle,
}

impl StyleConfig {
    pub fn static_scene(&self) -> &StaticStyle {
        &self.static_scene
    }

    pub fn interactive(&self) -> &InteractiveStyle {
        &self.interactive
    }
}

/// Styling of the SVG scene and legend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticStyle {
    projection: Projection,
    background_color: Option<Color>,
    plane_alpha: f32,
    edge_color: Color,
    edge_width: f32,
    node_radius: f32,
    node_outline: Color,
    font_family: String,
    label_font_size: f32,
    legend_title: String,
    legend_columns: usize,
    legend_font_size: f32,
}

impl Default for StaticStyle {
    fn default() -> Self {
        Self {
            projection: Projection::default(),
            background_color: None,
            plane_alpha: 0.2,
            edge_color: Color::new("gray").expect("'gray' is a valid CSS color"),
            edge_width: 0.5,
            node_radius: 4.5,
            node_outline: Color::default(),
            font_family: "sans-serif".to_string(),
            label_font_size: 8.0,
            legend_title: "Node Legend".to_string(),
            legend_columns: 2,
            legend_font_size: 12.0,
        }
    }
}

impl StaticStyle {
    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    /// Opacity of the layer planes.
    pub fn plane_alpha(&self) -> f32 {
        self.plane_alpha
    }

    pub fn edge_color(&self) -> Color {
        self.edge_color
    }

    pub fn edge_width(&self) -> f32 {
        self.edge_width
    }

    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    pub fn node_outline(&self) -> Color {
        self.node_outline
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn label_font_size(&self) -> f32 {
        self.label_font_size
    }

    pub fn legend_title(&self) -> &str {
        &self.legend_title
    }

    pub fn legend_columns(&self) -> usize {
        self.legend_columns
    }

    pub fn legend_font_size(&self) -> f32 {
        self.legend_font_size
    }
}

/// Styling of the interactive HTML document.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InteractiveStyle {
    script_url: String,
    title: String,
    width: String,
    height: String,
    font_face: String,
    edge_color: String,
    highlight_color: String,
    /// Page units per layout unit for initial node positions.
    position_scale: f64,
    edge_weight_scale: f64,
    size_min: f64,
    size_max: f64,
    tooltip_delay: u32,
    legend_title: String,
    physics: PhysicsConfig,
}

impl Default for InteractiveStyle {
    fn default() -> Self {
        Self {
            script_url: "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js"
                .to_string(),
            title: "Correlation network".to_string(),
            width: "100%".to_string(),
            height: "750px".to_string(),
            font_face: "Tahoma".to_string(),
            edge_color: "rgba(211,211,211,0.5)".to_string(),
            highlight_color: "black".to_string(),
            position_scale: 100.0,
            edge_weight_scale: 10.0,
            size_min: 10.0,
            size_max: 30.0,
            tooltip_delay: 200,
            legend_title: "Legend".to_string(),
            physics: PhysicsConfig::default(),
        }
    }
}

impl InteractiveStyle {
    /// URL of the vis-network script.
    pub fn script_url(&self) -> &str {
        &self.script_url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn width(&self) -> &str {
        &self.width
    }

    pub fn height(&self) -> &str {
        &self.height
    }

    pub fn font_face(&self) -> &str {
        &self.font_face
    }

    /// CSS color of edges, passed to vis-network unchanged.
    pub fn edge_color(&self) -> &str {
        &self.edge_color
    }

    pub fn highlight_color(&self) -> &str {
        &self.highlight_color
    }

    pub fn position_scale(&self) -> f64 {
        self.position_scale
    }

    /// Factor from correlation to vis-network edge `value`.
    pub fn edge_weight_scale(&self) -> f64 {
        self.edge_weight_scale
    }

    /// Rendered size range when node sizes are given.
    pub fn size_range(&self) -> (f64, f64) {
        (self.size_min, self.size_max)
    }

    pub fn tooltip_delay(&self) -> u32 {
        self.tooltip_delay
    }

    pub fn legend_title(&self) -> &str {
        &self.legend_title
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }
}

/// Barnes-Hut constants of the force-directed simulation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    gravitational_constant: f64,
    central_gravity: f64,
    spring_length: f64,
    spring_constant: f64,
    damping: f64,
    min_velocity: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: -20000.0,
            central_gravity: 0.3,
            spring_length: 250.0,
            spring_constant: 0.04,
            damping: 0.09,
            min_velocity: 0.0,
        }
    }
}

impl PhysicsConfig {
    pub fn gravitational_constant(&self) -> f64 {
        self.gravitational_constant
    }

    pub fn central_gravity(&self) -> f64 {
        self.central_gravity
    }

    pub fn spring_length(&self) -> f64 {
        self.spring_length
    }

    pub fn spring_constant(&self) -> f64 {
        self.spring_constant
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn min_velocity(&self) -> f64 {
        self.min_velocity
    }
}

/// Node size scaling, see [`crate::centrality::CentralityAnnotator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CentralityConfig {
    scale: f64,
    default_value: f64,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            scale: 100.0,
            default_value: 10.0,
        }
    }
}

impl CentralityConfig {
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }
}

/// Batch run description.
///
/// Path templates accept the placeholders `{label}`, `{hemi}`, `{imp}`,
/// `{threshold}`, `{metric}` and `{_imp}`. `{_imp}` expands to `_` followed by
/// the imputation, or to nothing for layer sets listed in `imputation_free`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    layer_sets: Vec<LayerSet>,
    hemispheres: Vec<String>,
    imputations: Vec<String>,
    thresholds: Vec<f64>,
    imputation_free: Vec<LayerSet>,
    metrics: Vec<String>,
    on_missing: MissingInputPolicy,
    matrix: String,
    centrality: Option<String>,
    output_dir: PathBuf,
    outputs: OutputTemplates,
}

impl Default for BatchConfig {
    fn default() -> Self {
        let sets = |values: &[&str]| -> Vec<LayerSet> {
            values.iter().filter_map(|s| s.parse().ok()).collect()
        };
        Self {
            layer_sets: LayerSet::every_combination(),
            hemispheres: vec!["L".to_string(), "R".to_string()],
            imputations: ["1", "2", "3", "4", "5", "mean"].map(String::from).to_vec(),
            thresholds: vec![0.175, 0.229],
            imputation_free: sets(&["2", "2,3", "3"]),
            metrics: Vec::new(),
            on_missing: MissingInputPolicy::default(),
            matrix: "matrices/{label}/Spearman_Corr_Matrix_{hemi}{_imp}.csv".to_string(),
            centrality: None,
            output_dir: PathBuf::from("output"),
            outputs: OutputTemplates::default(),
        }
    }
}

impl BatchConfig {
    pub fn layer_sets(&self) -> &[LayerSet] {
        &self.layer_sets
    }

    pub fn hemispheres(&self) -> &[String] {
        &self.hemispheres
    }

    pub fn imputations(&self) -> &[String] {
        &self.imputations
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Whether the matrix of `layer_set` exists once per hemisphere instead
    /// of once per imputation.
    pub fn is_imputation_free(&self, layer_set: &LayerSet) -> bool {
        self.imputation_free.contains(layer_set)
    }

    /// Centrality metrics rendered as sized interactive documents.
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn on_missing(&self) -> MissingInputPolicy {
        self.on_missing
    }

    /// Template of the correlation matrix path.
    pub fn matrix(&self) -> &str {
        &self.matrix
    }

    /// Template of the centrality table path, if metrics are rendered.
    pub fn centrality(&self) -> Option<&str> {
        self.centrality.as_deref()
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub fn outputs(&self) -> &OutputTemplates {
        &self.outputs
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_matrix(mut self, template: impl Into<String>) -> Self {
        self.matrix = template.into();
        self
    }

    pub fn with_centrality(mut self, template: impl Into<String>) -> Self {
        self.centrality = Some(template.into());
        self
    }

    pub fn with_layer_sets(mut self, layer_sets: Vec<LayerSet>) -> Self {
        self.layer_sets = layer_sets;
        self
    }

    pub fn with_hemispheres(mut self, hemispheres: Vec<String>) -> Self {
        self.hemispheres = hemispheres;
        self
    }

    pub fn with_imputations(mut self, imputations: Vec<String>) -> Self {
        self.imputations = imputations;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_imputation_free(mut self, layer_sets: Vec<LayerSet>) -> Self {
        self.imputation_free = layer_sets;
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<String>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_on_missing(mut self, policy: MissingInputPolicy) -> Self {
        self.on_missing = policy;
        self
    }
}

/// Output file templates, relative to the batch output directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputTemplates {
    scene: String,
    legend: String,
    interactive: String,
    analysis: String,
}

impl Default for OutputTemplates {
    fn default() -> Self {
        Self {
            scene: "{threshold}/{hemi}/{label}/Correlationplot_{label}_{hemi}_{imp}.svg".to_string(),
            legend: "{threshold}/{hemi}/{label}/Correlationlegend_{label}_{hemi}_{imp}.svg"
                .to_string(),
            interactive: "{threshold}/{hemi}/{label}/interactiveplot_{label}_{hemi}_{imp}.html"
                .to_string(),
            analysis:
                "{threshold}/{metric}/{hemi}/{label}/interactiveplot_{label}_{metric}_{hemi}{_imp}.html"
                    .to_string(),
        }
    }
}

impl OutputTemplates {
    pub fn scene(&self) -> &str {
        &self.scene
    }

    pub fn legend(&self) -> &str {
        &self.legend
    }

    pub fn interactive(&self) -> &str {
        &self.interactive
    }

    /// Interactive document sized by one centrality metric.
    pub fn analysis(&self) -> &str {
        &self.analysis
    }
}
