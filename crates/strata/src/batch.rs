//! Batch rendering over every configured combination.
//!
//! A combination is one (layer set, hemisphere, imputation, threshold)
//! tuple. Combinations are independent: each reads its own matrix, builds
//! its graphs and writes its documents, and a failure is recorded in the
//! [`BatchReport`] without stopping the run. Only a missing input under
//! [`MissingInputPolicy::Abort`] ends the run early.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};
use serde::Deserialize;

use strata_core::layer::LayerSet;

use crate::{
    NetworkBuilder, StrataError,
    config::BatchConfig,
    export::{self, InteractiveArtifact},
    graph::Graph,
    layout::Layout,
};

/// What to do when an input file of a combination does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingInputPolicy {
    /// Record the combination as skipped and continue.
    #[default]
    Skip,
    /// Stop the run at the first missing input.
    Abort,
}

/// One unit of batch work.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    layer_set: LayerSet,
    label: String,
    hemi: String,
    imp: String,
    threshold: f64,
    imputation_free: bool,
}

impl Combination {
    pub fn layer_set(&self) -> &LayerSet {
        &self.layer_set
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn hemi(&self) -> &str {
        &self.hemi
    }

    pub fn imp(&self) -> &str {
        &self.imp
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Substitutes the placeholders of `template`.
    ///
    /// `{metric}` is left untouched when `metric` is `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use strata::{assign::LayerAssigner, batch::combinations, config::BatchConfig};
    /// # use strata::layer::LayerSet;
    /// let config = BatchConfig::default()
    ///     .with_layer_sets(vec!["2".parse::<LayerSet>().unwrap()])
    ///     .with_hemispheres(vec!["L".to_string()])
    ///     .with_imputations(vec!["1".to_string()])
    ///     .with_thresholds(vec![0.175]);
    ///
    /// let combination = &combinations(&config, &LayerAssigner::default())[0];
    /// assert_eq!(combination.expand("{label}_{hemi}{_imp}.csv", None), "SD_L.csv");
    /// assert_eq!(combination.expand("{threshold}/{label}_{imp}", None), "0.175/SD_1");
    /// ```
    pub fn expand(&self, template: &str, metric: Option<&str>) -> String {
        let optional_imp = if self.imputation_free {
            String::new()
        } else {
            format!("_{}", self.imp)
        };

        let expanded = template
            .replace("{label}", &self.label)
            .replace("{hemi}", &self.hemi)
            .replace("{_imp}", &optional_imp)
            .replace("{imp}", &self.imp)
            .replace("{threshold}", &self.threshold.to_string());

        match metric {
            Some(metric) => expanded.replace("{metric}", metric),
            None => expanded,
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}@{}",
            self.label, self.hemi, self.imp, self.threshold
        )
    }
}

/// Enumerates combinations in layer set, hemisphere, imputation, threshold
/// order.
pub fn combinations(
    config: &BatchConfig,
    assigner: &crate::assign::LayerAssigner,
) -> Vec<Combination> {
    let mut result = Vec::new();
    for layer_set in config.layer_sets() {
        let label = assigner.label_of(layer_set);
        let imputation_free = config.is_imputation_free(layer_set);
        for hemi in config.hemispheres() {
            for imp in config.imputations() {
                for threshold in config.thresholds() {
                    result.push(Combination {
                        layer_set: layer_set.clone(),
                        label: label.clone(),
                        hemi: hemi.clone(),
                        imp: imp.clone(),
                        threshold: *threshold,
                        imputation_free,
                    });
                }
            }
        }
    }
    result
}

/// Result of one combination.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Documents written, plus the centrality tables that were missing.
    Rendered {
        files: Vec<PathBuf>,
        missing: Vec<PathBuf>,
    },
    /// The matrix did not exist.
    Skipped { path: PathBuf },
    /// The matrix did not exist and the run stopped here.
    Aborted { path: PathBuf },
    /// The combination failed; nothing of it was written.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    combination: Combination,
    outcome: Outcome,
}

impl BatchEntry {
    pub fn combination(&self) -> &Combination {
        &self.combination
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }
}

/// Per-combination outcomes of a batch run, in run order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn rendered(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Rendered { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Failed { .. }))
    }

    /// The missing input that stopped the run, if any.
    pub fn aborted(&self) -> Option<&Path> {
        self.entries.iter().find_map(|entry| match &entry.outcome {
            Outcome::Aborted { path } => Some(path.as_path()),
            _ => None,
        })
    }

    /// No combination failed and the run was not aborted.
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.aborted().is_none()
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|entry| predicate(&entry.outcome))
            .count()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rendered, {} skipped, {} failed",
            self.rendered(),
            self.skipped(),
            self.failed()
        )?;
        if let Some(path) = self.aborted() {
            write!(f, " (aborted: missing `{}`)", path.display())?;
        }
        Ok(())
    }
}

/// Runs every combination of `config` with `builder`.
pub fn run_batch(builder: &NetworkBuilder, config: &BatchConfig) -> BatchReport {
    let combinations = combinations(config, builder.assigner());
    info!(
        combinations = combinations.len(),
        output_dir:? = config.output_dir();
        "Starting batch run"
    );

    let mut report = BatchReport::default();
    for combination in combinations {
        debug!(combination:% = combination; "Processing combination");

        let outcome = match run_combination(builder, config, &combination) {
            Ok((files, missing)) => {
                info!(combination:% = combination, files = files.len(); "Combination rendered");
                Outcome::Rendered { files, missing }
            }
            Err(StrataError::MissingInput(path)) => match config.on_missing() {
                MissingInputPolicy::Skip => {
                    warn!(combination:% = combination, path:? = path; "Input missing, skipping");
                    Outcome::Skipped { path }
                }
                MissingInputPolicy::Abort => {
                    error!(combination:% = combination, path:? = path; "Input missing, aborting");
                    report.entries.push(BatchEntry {
                        combination,
                        outcome: Outcome::Aborted { path },
                    });
                    break;
                }
            },
            Err(err) => {
                error!(combination:% = combination, err:err; "Combination failed");
                Outcome::Failed {
                    reason: err.to_string(),
                }
            }
        };
        report.entries.push(BatchEntry {
            combination,
            outcome,
        });
    }

    info!(summary:% = report; "Batch run finished");
    report
}

type Written = (Vec<PathBuf>, Vec<PathBuf>);

fn run_combination(
    builder: &NetworkBuilder,
    config: &BatchConfig,
    combination: &Combination,
) -> Result<Written, StrataError> {
    let matrix_path = PathBuf::from(combination.expand(config.matrix(), None));
    let matrix = builder.read_matrix(&matrix_path)?;

    let static_graph = builder.build_graph(
        &matrix,
        combination.layer_set(),
        builder.static_threshold(combination.threshold())?,
    )?;
    let interactive_graph = builder.build_graph(
        &matrix,
        combination.layer_set(),
        builder.interactive_threshold(combination.threshold())?,
    )?;

    let static_layout = builder.layout(&static_graph);
    let interactive_layout = builder.layout(&interactive_graph);

    let (scene, legend) = builder
        .render_static(&static_graph, &static_layout)?
        .into_parts();
    let interactive = builder
        .render_interactive(&interactive_graph, &interactive_layout, None)?
        .into_html();

    let outputs = config.outputs();
    let output = |template: &str, metric: Option<&str>| {
        config
            .output_dir()
            .join(combination.expand(template, metric))
    };

    let mut documents = vec![
        (output(outputs.scene(), None), scene),
        (output(outputs.legend(), None), legend),
        (output(outputs.interactive(), None), interactive),
    ];

    let mut missing = Vec::new();
    if let Some(template) = config.centrality() {
        for metric in config.metrics() {
            let path = PathBuf::from(combination.expand(template, Some(metric)));
            match analysis(builder, &path, &interactive_graph, &interactive_layout) {
                Ok(artifact) => {
                    documents.push((output(outputs.analysis(), Some(metric)), artifact.into_html()))
                }
                Err(StrataError::MissingInput(path))
                    if config.on_missing() == MissingInputPolicy::Skip =>
                {
                    warn!(metric = metric.as_str(), path:? = path; "Centrality table missing");
                    missing.push(path);
                }
                Err(err) => return Err(err),
            }
        }
    } else if !config.metrics().is_empty() {
        warn!("Metrics configured without a centrality template, skipping analysis documents");
    }

    let pending: Vec<(&Path, &str)> = documents
        .iter()
        .map(|(path, contents)| (path.as_path(), contents.as_str()))
        .collect();
    export::write_documents(pending.as_slice())?;

    Ok((documents.into_iter().map(|(path, _)| path).collect(), missing))
}

fn analysis(
    builder: &NetworkBuilder,
    path: &Path,
    graph: &Graph,
    layout: &Layout,
) -> Result<InteractiveArtifact, StrataError> {
    let centrality = builder.read_centrality(path)?;
    let sizes = builder.annotate(graph, &centrality);
    builder.render_interactive(graph, layout, Some(&sizes))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{assign::LayerAssigner, config::AppConfig};

    const MATRIX: &str = "Name;LB;SD_IFOF;CD_Insula\n\
                          LB;1;0.4;-0.3\n\
                          SD_IFOF;0.4;1;0.1\n\
                          CD_Insula;-0.3;0.1;1\n";

    fn set(s: &str) -> LayerSet {
        s.parse().unwrap()
    }

    fn config(root: &Path) -> BatchConfig {
        BatchConfig::default()
            .with_layer_sets(vec![set("1,2,3")])
            .with_hemispheres(vec!["L".to_string()])
            .with_imputations(vec!["1".to_string()])
            .with_thresholds(vec![0.175])
            .with_matrix(format!("{}/in/{{label}}_{{hemi}}{{_imp}}.csv", root.display()))
            .with_output_dir(root.join("out"))
    }

    fn builder() -> NetworkBuilder {
        NetworkBuilder::default()
    }

    #[test]
    fn test_combination_order_and_expansion() {
        let config = BatchConfig::default()
            .with_layer_sets(vec![set("2"), set("1,3")])
            .with_hemispheres(vec!["L".to_string(), "R".to_string()])
            .with_imputations(vec!["1".to_string(), "mean".to_string()])
            .with_thresholds(vec![0.175, 0.229]);

        let combinations = combinations(&config, &LayerAssigner::default());
        assert_eq!(combinations.len(), 16);
        assert_eq!(combinations[0].to_string(), "SD/L/1@0.175");
        assert_eq!(combinations[1].to_string(), "SD/L/1@0.229");
        assert_eq!(combinations[15].to_string(), "NT_CD/R/mean@0.229");

        // Layer set 2 is imputation free by default
        assert_eq!(combinations[0].expand("m_{hemi}{_imp}", None), "m_L");
        assert_eq!(combinations[8].expand("m_{hemi}{_imp}", None), "m_L_1");
        assert_eq!(
            combinations[8].expand("{threshold}/{metric}/{label}", Some("degree")),
            "0.175/degree/NT_CD"
        );
    }

    #[test]
    fn test_run_writes_all_documents() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("in")).unwrap();
        fs::write(dir.path().join("in/NT_SD_CD_L_1.csv"), MATRIX).unwrap();

        let report = run_batch(&builder(), &config(dir.path()));

        assert!(report.is_success());
        assert_eq!(report.rendered(), 1);
        let out = dir.path().join("out/0.175/L/NT_SD_CD");
        for file in [
            "Correlationplot_NT_SD_CD_L_1.svg",
            "Correlationlegend_NT_SD_CD_L_1.svg",
            "interactiveplot_NT_SD_CD_L_1.html",
        ] {
            assert!(out.join(file).is_file(), "{file} missing");
        }

        // The interactive document keeps only positive correlations
        let html = fs::read_to_string(out.join("interactiveplot_NT_SD_CD_L_1.html")).unwrap();
        assert!(html.contains("\"from\":\"LB\",\"to\":\"SD_IFOF\""));
        assert!(!html.contains("\"to\":\"CD_Insula\""));
        let scene = fs::read_to_string(out.join("Correlationplot_NT_SD_CD_L_1.svg")).unwrap();
        assert_eq!(scene.matches("<line").count(), 2);
    }

    #[test]
    fn test_missing_matrix_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path()).with_hemispheres(vec!["L".to_string(), "R".to_string()]);
        fs::create_dir_all(dir.path().join("in")).unwrap();
        fs::write(dir.path().join("in/NT_SD_CD_R_1.csv"), MATRIX).unwrap();

        let report = run_batch(&builder(), &config);

        assert!(report.is_success());
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.rendered(), 1);
        assert!(!dir.path().join("out/0.175/L").exists());
    }

    #[test]
    fn test_missing_matrix_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path())
            .with_hemispheres(vec!["L".to_string(), "R".to_string()])
            .with_on_missing(MissingInputPolicy::Abort);
        fs::create_dir_all(dir.path().join("in")).unwrap();
        fs::write(dir.path().join("in/NT_SD_CD_R_1.csv"), MATRIX).unwrap();

        let report = run_batch(&builder(), &config);

        assert!(!report.is_success());
        assert_eq!(report.entries().len(), 1);
        assert!(report.aborted().is_some());
        assert!(matches!(report.entries()[0].outcome(), Outcome::Aborted { .. }));
        // The stopping input is reported as an abort, not as a skip
        assert_eq!(report.skipped(), 0);
        assert!(
            report
                .to_string()
                .starts_with("0 rendered, 0 skipped, 0 failed (aborted: missing")
        );
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_failed_combination_does_not_stop_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path()).with_hemispheres(vec!["L".to_string(), "R".to_string()]);
        fs::create_dir_all(dir.path().join("in")).unwrap();
        fs::write(dir.path().join("in/NT_SD_CD_L_1.csv"), "Name;A;B\nA;1;0.5\n").unwrap();
        fs::write(dir.path().join("in/NT_SD_CD_R_1.csv"), MATRIX).unwrap();

        let report = run_batch(&builder(), &config);

        assert_eq!(report.failed(), 1);
        assert_eq!(report.rendered(), 1);
        assert!(!report.is_success());
        assert!(matches!(
            report.entries()[0].outcome(),
            Outcome::Failed { .. }
        ));
        assert!(!dir.path().join("out/0.175/L").exists());
    }

    #[test]
    fn test_analysis_documents_per_metric() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path())
            .with_metrics(vec!["degree".to_string(), "closeness".to_string()])
            .with_centrality(format!(
                "{}/centrality/{{metric}}_{{label}}_{{hemi}}{{_imp}}.csv",
                dir.path().display()
            ));
        fs::create_dir_all(dir.path().join("in")).unwrap();
        fs::create_dir_all(dir.path().join("centrality")).unwrap();
        fs::write(dir.path().join("in/NT_SD_CD_L_1.csv"), MATRIX).unwrap();
        fs::write(
            dir.path().join("centrality/degree_NT_SD_CD_L_1.csv"),
            "Name;Value\nLB;0.5\nSD_IFOF;0.25\n",
        )
        .unwrap();

        let report = run_batch(&builder(), &config);

        let Outcome::Rendered { files, missing } = report.entries()[0].outcome() else {
            panic!("combination not rendered");
        };
        assert_eq!(files.len(), 4);
        assert_eq!(missing.len(), 1);

        let analysis = dir
            .path()
            .join("out/0.175/degree/L/NT_SD_CD/interactiveplot_NT_SD_CD_degree_L_1.html");
        let html = fs::read_to_string(analysis).unwrap();
        assert!(html.contains("\"size\":50.0"));
        assert!(html.contains("\"scaling\""));
    }

    #[test]
    fn test_report_display() {
        let report = run_batch(
            &NetworkBuilder::new(AppConfig::default()).unwrap(),
            &BatchConfig::default()
                .with_layer_sets(vec![set("1")])
                .with_hemispheres(vec!["L".to_string()])
                .with_imputations(vec!["1".to_string()])
                .with_matrix("/nonexistent/{label}.csv"),
        );
        assert_eq!(report.to_string(), "0 rendered, 2 skipped, 0 failed");
    }
}
