//! Rendering of graphs into artifacts.
//!
//! This module provides the [`Renderer`] trait that defines the interface for
//! turning a positioned graph into an output document. It is the final stage
//! of the Strata pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Matrix Table
//!     ↓ parse
//! CorrelationMatrix
//!     ↓ build (LayerAssigner, ThresholdPolicy)
//! Graph
//!     ↓ layout
//! Layout (+ NodeSizeMap)
//!     ↓ render (this module)
//! Artifact
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - Static 3D scene and node legend via [`svg::StaticSceneRenderer`]
//! - [`html`] - Interactive force-directed document via
//!   [`html::InteractiveSceneRenderer`]
//!
//! Renderers never write files themselves; [`write_documents`] stores
//! finished artifacts.
//!
//! # Error Handling
//!
//! Render operations return [`Error`]. It converts into
//! [`StrataError::Export`] at the crate boundary.
//!
//! [`StrataError::Export`]: crate::StrataError::Export

pub mod html;
pub mod svg;

use std::{fs, io::Write, path::Path};

use log::{error, info, warn};
use tempfile::{NamedTempFile, TempPath};

use strata_core::geometry::Position3;

use crate::{
    centrality::NodeSizeMap,
    graph::{Graph, Node},
    layout::Layout,
};

/// What a renderer draws: a graph, its layout and optional node sizes.
///
/// Layout entries for names that are not graph nodes are ignored. A node
/// missing from the layout is drawn at the center of its layer plane.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    graph: &'a Graph,
    layout: &'a Layout,
    sizes: Option<&'a NodeSizeMap>,
}

impl<'a> Scene<'a> {
    pub fn new(graph: &'a Graph, layout: &'a Layout) -> Self {
        Self {
            graph,
            layout,
            sizes: None,
        }
    }

    pub fn with_sizes(mut self, sizes: Option<&'a NodeSizeMap>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn sizes(&self) -> Option<&'a NodeSizeMap> {
        self.sizes
    }

    /// Position of `node`, falling back to its plane center.
    pub fn position_of(&self, node: &Node) -> Position3 {
        self.layout
            .get(node.name())
            .unwrap_or_else(|| Position3::new(0.0, 0.0, f32::from(node.layer().plane())))
    }
}

/// Abstraction for rendering backends.
///
/// Implementors must accept any well-formed scene: a graph without edges
/// and a layout with extra entries both render normally.
pub trait Renderer {
    /// The document(s) produced by this backend.
    type Artifact;

    /// Renders `scene`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the scene cannot be converted to the
    /// target format.
    fn render(&self, scene: &Scene<'_>) -> Result<Self::Artifact, Error>;
}

/// The two SVG documents of a static rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticArtifact {
    scene: String,
    legend: String,
}

impl StaticArtifact {
    pub fn scene(&self) -> &str {
        &self.scene
    }

    /// The node index legend.
    pub fn legend(&self) -> &str {
        &self.legend
    }

    pub fn into_parts(self) -> (String, String) {
        (self.scene, self.legend)
    }
}

/// A self-contained HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveArtifact {
    html: String,
}

impl InteractiveArtifact {
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

/// Writes every `(path, contents)` pair, creating parent directories.
///
/// Each document is first written to a temporary file next to its
/// destination. Files are only moved into place once every temporary file
/// was written. If moving one of them fails, the documents already moved are
/// removed again and any files they replaced are restored, so a failure
/// leaves no document of the set behind.
///
/// # Errors
///
/// Returns [`Error::Io`] for the first directory, write or rename failure.
pub fn write_documents<P: AsRef<Path>>(documents: &[(P, &str)]) -> Result<(), Error> {
    let mut staged = Vec::with_capacity(documents.len());
    for (path, contents) in documents {
        let path = path.as_ref();
        let dir = parent_dir(path);
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        if let Err(err) = file.write_all(contents.as_bytes()) {
            error!(file_name:? = path, err:err; "Failed to write document");
            return Err(Error::Io(err));
        }
        staged.push((file, path));
    }

    let mut placed: Vec<(&Path, Option<TempPath>)> = Vec::with_capacity(staged.len());
    for (file, path) in staged {
        let backup = match back_up(path) {
            Ok(backup) => backup,
            Err(err) => {
                error!(file_name:? = path, err:err; "Failed to back up existing document");
                roll_back(placed);
                return Err(Error::Io(err));
            }
        };

        if let Err(err) = file.persist(path) {
            error!(file_name:? = path, err:% = err.error; "Failed to move document into place");
            roll_back(placed);
            return Err(Error::Io(err.error));
        }
        placed.push((path, backup));
    }

    for (path, _) in &placed {
        info!(file_name:? = path; "Document written");
    }
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Copies an existing regular file at `path` aside. The copy is deleted on drop.
fn back_up(path: &Path) -> std::io::Result<Option<TempPath>> {
    if !path.is_file() {
        return Ok(None);
    }
    let backup = NamedTempFile::new_in(parent_dir(path))?.into_temp_path();
    fs::copy(path, &backup)?;
    Ok(Some(backup))
}

/// Undoes the documents moved into place so far, newest first.
fn roll_back(placed: Vec<(&Path, Option<TempPath>)>) {
    for (path, backup) in placed.into_iter().rev() {
        let result = match backup {
            Some(backup) => backup.persist(path).map_err(|err| err.error),
            None => fs::remove_file(path),
        };
        if let Err(err) = result {
            warn!(file_name:? = path, err:err; "Failed to roll back document");
        }
    }
}

/// Errors that can occur while rendering.
///
/// This type is converted into [`StrataError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`StrataError::Export`]: crate::StrataError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
