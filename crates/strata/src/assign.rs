//! Layer assignment and the layer palette.
//!
//! A [`LayerAssigner`] decides which layer a matrix variable belongs to and
//! carries the [`Palette`] used to draw each layer. It is built once (from
//! configuration or programmatically) and handed to every stage that needs
//! layer information, so no stage keeps its own copy of the rules.
//!
//! Rules are checked in a fixed order: exact-name rules first, then prefix
//! rules with the longest matching prefix winning. Names matching no rule are
//! handled according to the [`UnknownNodePolicy`].

use std::collections::HashMap;

use log::{debug, warn};
use serde::Deserialize;

use strata_core::{
    color::Color,
    layer::{LayerSet, LayerTag},
};

use crate::{
    config::{AssignerConfig, LayersConfig},
    error::GraphError,
};

/// Neuropsychological test codes of the reference study, matched as prefixes.
const DEFAULT_TEST_PREFIXES: [&str; 19] = [
    "LB", "BELLS", "CODES", "DO80", "DS_F", "DS_B", "FIG_C", "FIG_R", "FLU_A", "FLU_P", "PPTT",
    "RLRI_E", "RLRI_FR", "RLRI_TR", "STROOP_D", "STROOP_R", "STROOP_ID", "TMT_A", "TMT_BA",
];

/// What to do with a variable that matches no layer rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownNodePolicy {
    /// Fail the graph build with [`GraphError::UnknownNode`].
    #[default]
    Reject,
    /// Leave the variable out of the graph and log a warning.
    Exclude,
}

/// Drawing attributes of one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStyle {
    color: Color,
    radius: f32,
    name: String,
}

impl LayerStyle {
    pub fn new(color: Color, radius: f32, name: impl Into<String>) -> Self {
        Self {
            color,
            radius,
            name: name.into(),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Radius of the layer's circle in layout units.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Human-readable layer name used in legends.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Colors, radii and names of every layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    styles: [LayerStyle; 3],
}

impl Palette {
    pub fn style(&self, layer: LayerTag) -> &LayerStyle {
        &self.styles[Self::slot(layer)]
    }

    pub fn color_of(&self, layer: LayerTag) -> Color {
        self.style(layer).color()
    }

    pub fn radius_of(&self, layer: LayerTag) -> f32 {
        self.style(layer).radius()
    }

    pub fn name_of(&self, layer: LayerTag) -> &str {
        self.style(layer).name()
    }

    /// Replaces the style of one layer.
    pub fn set_style(&mut self, layer: LayerTag, style: LayerStyle) {
        self.styles[Self::slot(layer)] = style;
    }

    fn slot(layer: LayerTag) -> usize {
        usize::from(layer.number() - 1)
    }
}

impl Default for Palette {
    fn default() -> Self {
        let style = |hex: &str, radius: f32, layer: LayerTag| {
            let color = Color::new(hex).expect("layer colors are valid hex colors");
            LayerStyle::new(color, radius, layer.description())
        };

        Self {
            styles: [
                style("#00008d", 2.0, LayerTag::NeuroTests),
                style("#006300", 3.0, LayerTag::SubcorticalDamage),
                style("#fb0000", 1.0, LayerTag::CorticalDamage),
            ],
        }
    }
}

/// Maps variable names to layers.
///
/// # Examples
///
/// ```
/// # use strata::assign::{LayerAssigner, UnknownNodePolicy};
/// # use strata::layer::LayerTag;
///
/// let assigner = LayerAssigner::new()
///     .with_prefix("WM_", LayerTag::SubcorticalDamage)
///     .with_exact("Age", LayerTag::NeuroTests)
///     .with_unknown_policy(UnknownNodePolicy::Exclude);
///
/// assert_eq!(assigner.classify("WM_SLF"), Some(LayerTag::SubcorticalDamage));
/// assert_eq!(assigner.classify("Age"), Some(LayerTag::NeuroTests));
/// assert_eq!(assigner.layer_of("Sex"), Ok(None));
/// ```
#[derive(Debug, Clone)]
pub struct LayerAssigner {
    exact: HashMap<String, LayerTag>,
    /// Sorted longest first, ties broken by the prefix text.
    prefixes: Vec<(String, LayerTag)>,
    unknown_policy: UnknownNodePolicy,
    palette: Palette,
}

impl LayerAssigner {
    /// Creates an assigner without rules and with the default palette.
    pub fn new() -> Self {
        Self {
            exact: HashMap::new(),
            prefixes: Vec::new(),
            unknown_policy: UnknownNodePolicy::default(),
            palette: Palette::default(),
        }
    }

    /// Builds an assigner from its configuration sections.
    ///
    /// Default rules are installed first unless disabled, then configured
    /// rules are added on top (a configured prefix replaces a default one).
    pub fn from_config(assigner: &AssignerConfig, layers: &LayersConfig) -> Self {
        let mut result = if assigner.use_default_rules() {
            Self::default()
        } else {
            Self::new()
        };

        for (prefix, layer) in assigner.prefixes() {
            result = result.with_prefix(prefix.as_str(), *layer);
        }
        for (name, layer) in assigner.exact() {
            result = result.with_exact(name.as_str(), *layer);
        }

        for layer in LayerTag::ALL {
            let default = result.palette.style(layer).clone();
            let overrides = layers.layer(layer);
            let style = LayerStyle::new(
                overrides.color().unwrap_or(default.color()),
                overrides.radius().unwrap_or(default.radius()),
                overrides.name().unwrap_or(default.name()),
            );
            result.palette.set_style(layer, style);
        }

        debug!(
            exact_rules = result.exact.len(),
            prefix_rules = result.prefixes.len(),
            unknown_policy:? = assigner.unknown_nodes();
            "Layer assigner configured"
        );

        result.with_unknown_policy(assigner.unknown_nodes())
    }

    /// Adds a rule matching exactly `name`.
    pub fn with_exact(mut self, name: impl Into<String>, layer: LayerTag) -> Self {
        self.exact.insert(name.into(), layer);
        self
    }

    /// Adds a rule matching every name starting with `prefix`.
    ///
    /// Adding the same prefix again replaces its layer.
    pub fn with_prefix(mut self, prefix: impl Into<String>, layer: LayerTag) -> Self {
        let prefix = prefix.into();
        self.prefixes.retain(|(existing, _)| *existing != prefix);
        self.prefixes.push((prefix, layer));
        self.prefixes.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        self
    }

    pub fn with_unknown_policy(mut self, policy: UnknownNodePolicy) -> Self {
        self.unknown_policy = policy;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn unknown_policy(&self) -> UnknownNodePolicy {
        self.unknown_policy
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Looks `name` up in the rules, ignoring the unknown-node policy.
    pub fn classify(&self, name: &str) -> Option<LayerTag> {
        if let Some(layer) = self.exact.get(name) {
            return Some(*layer);
        }
        self.prefixes
            .iter()
            .find(|(prefix, _)| name.starts_with(prefix.as_str()))
            .map(|(_, layer)| *layer)
    }

    /// Returns the layer of `name` under the unknown-node policy.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(layer))` - A rule matched
    /// - `Ok(None)` - No rule matched and the policy excludes such names
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] when no rule matched and the policy
    /// is [`UnknownNodePolicy::Reject`].
    pub fn layer_of(&self, name: &str) -> Result<Option<LayerTag>, GraphError> {
        match (self.classify(name), self.unknown_policy) {
            (Some(layer), _) => Ok(Some(layer)),
            (None, UnknownNodePolicy::Reject) => Err(GraphError::UnknownNode {
                name: name.to_string(),
            }),
            (None, UnknownNodePolicy::Exclude) => {
                warn!(name; "Variable matches no layer rule, excluding it");
                Ok(None)
            }
        }
    }

    /// Short display label of a layer set, such as `NT_SD_CD`.
    ///
    /// Codes are joined in ascending layer order, so distinct sets never
    /// share a label.
    pub fn label_of(&self, layer_set: &LayerSet) -> String {
        layer_set
            .iter()
            .map(LayerTag::code)
            .collect::<Vec<_>>()
            .join("_")
    }

    pub fn color_of(&self, layer: LayerTag) -> Color {
        self.palette.color_of(layer)
    }

    pub fn radius_of(&self, layer: LayerTag) -> f32 {
        self.palette.radius_of(layer)
    }

    pub fn name_of(&self, layer: LayerTag) -> &str {
        self.palette.name_of(layer)
    }
}

impl Default for LayerAssigner {
    /// The reference study's rules: test codes for NT, `SD_` and `CD_` prefixes.
    fn default() -> Self {
        DEFAULT_TEST_PREFIXES
            .into_iter()
            .fold(Self::new(), |assigner, prefix| {
                assigner.with_prefix(prefix, LayerTag::NeuroTests)
            })
            .with_prefix("SD_", LayerTag::SubcorticalDamage)
            .with_prefix("CD_", LayerTag::CorticalDamage)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_default_rules() {
        let assigner = LayerAssigner::default();

        assert_eq!(assigner.classify("TMT_A"), Some(LayerTag::NeuroTests));
        assert_eq!(assigner.classify("STROOP_ID_time"), Some(LayerTag::NeuroTests));
        assert_eq!(assigner.classify("SD_IFOF"), Some(LayerTag::SubcorticalDamage));
        assert_eq!(assigner.classify("CD_Insula"), Some(LayerTag::CorticalDamage));
        assert_eq!(assigner.classify("Age"), None);
    }

    #[test]
    fn test_exact_rule_wins_over_prefix() {
        let assigner = LayerAssigner::default().with_exact("CD_special", LayerTag::NeuroTests);
        assert_eq!(assigner.classify("CD_special"), Some(LayerTag::NeuroTests));
        assert_eq!(assigner.classify("CD_other"), Some(LayerTag::CorticalDamage));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let assigner = LayerAssigner::new()
            .with_prefix("WM", LayerTag::NeuroTests)
            .with_prefix("WM_DEEP", LayerTag::CorticalDamage)
            .with_prefix("WM_", LayerTag::SubcorticalDamage);

        assert_eq!(assigner.classify("WM_DEEP_1"), Some(LayerTag::CorticalDamage));
        assert_eq!(assigner.classify("WM_SLF"), Some(LayerTag::SubcorticalDamage));
        assert_eq!(assigner.classify("WMx"), Some(LayerTag::NeuroTests));
    }

    #[test]
    fn test_prefix_can_be_replaced() {
        let assigner = LayerAssigner::default().with_prefix("SD_", LayerTag::CorticalDamage);
        assert_eq!(assigner.classify("SD_IFOF"), Some(LayerTag::CorticalDamage));
    }

    #[test]
    fn test_unknown_policy() {
        let reject = LayerAssigner::default();
        assert_eq!(
            reject.layer_of("Age"),
            Err(GraphError::UnknownNode {
                name: "Age".to_string()
            })
        );

        let exclude = reject.with_unknown_policy(UnknownNodePolicy::Exclude);
        assert_eq!(exclude.layer_of("Age"), Ok(None));
        assert_eq!(exclude.layer_of("LB"), Ok(Some(LayerTag::NeuroTests)));
    }

    #[test]
    fn test_labels_are_injective() {
        let assigner = LayerAssigner::default();
        let labels: HashSet<String> = LayerSet::every_combination()
            .iter()
            .map(|set| assigner.label_of(set))
            .collect();

        assert_eq!(labels.len(), 7);
        assert!(labels.contains("NT_SD_CD"));
        assert!(labels.contains("SD_CD"));
    }

    #[test]
    fn test_default_palette() {
        let assigner = LayerAssigner::default();

        assert_eq!(
            assigner.color_of(LayerTag::NeuroTests),
            Color::new("#00008d").unwrap()
        );
        assert_eq!(assigner.radius_of(LayerTag::SubcorticalDamage), 3.0);
        assert_eq!(assigner.radius_of(LayerTag::CorticalDamage), 1.0);
        assert_eq!(assigner.name_of(LayerTag::CorticalDamage), "cortical damage");
    }
}
