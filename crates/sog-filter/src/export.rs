//! Rendering of passing graphs to image files.

use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use sog_core::{ErrorInfo, SogError};
use sog_graph::Graph;
use tracing::debug;

use crate::config::{CanvasConfig, ImageFormat};

/// What an export call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// A new image was written.
    Rendered(PathBuf),
    /// An image for this encoding already existed and was left untouched.
    Cached(PathBuf),
}

impl ExportOutcome {
    /// Path of the image on disk.
    pub fn path(&self) -> &Path {
        match self {
            ExportOutcome::Rendered(path) | ExportOutcome::Cached(path) => path,
        }
    }
}

/// Renders an encoded graph into `output_dir`.
///
/// Implementations key the file by the original encoding (see
/// [`image_path`]) and fail with an `invalid-encoding` export error when the
/// encoding does not decode.
pub trait ImageExporter {
    /// Exports one graph.
    fn export(
        &self,
        encoded: &str,
        format: ImageFormat,
        output_dir: &Path,
    ) -> Result<ExportOutcome, SogError>;
}

/// Longest stem [`safe_file_stem`] returns, well below common name limits.
pub const MAX_STEM_BYTES: usize = 200;
const DIGEST_CHARS: usize = 16;

/// File stem derived from an encoding, safe on common filesystems.
///
/// Stems longer than [`MAX_STEM_BYTES`] keep their prefix and end with `-`
/// and a SHA-256 prefix of the full encoding. graph6 never contains `-`, so
/// shortened stems cannot clash with plain ones. Distinct encodings map to
/// distinct stems in practice, though the mapping is not guaranteed injective.
pub fn safe_file_stem(encoded: &str) -> String {
    let stem = encoded
        .replace('?', "_q_")
        .replace('/', "_slash_")
        .replace('\\', "_bslash_");
    if stem.len() <= MAX_STEM_BYTES {
        return stem;
    }
    let digest = format!("{:x}", Sha256::digest(encoded.as_bytes()));
    let mut cut = MAX_STEM_BYTES - DIGEST_CHARS - 1;
    while !stem.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}-{}", &stem[..cut], &digest[..DIGEST_CHARS])
}

/// Path at which the image for `encoded` is stored.
pub fn image_path(encoded: &str, format: ImageFormat, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}.{}", safe_file_stem(encoded), format.extension()))
}

/// Built-in exporter drawing nodes on a circle.
#[derive(Debug, Clone, Default)]
pub struct SvgExporter {
    canvas: CanvasConfig,
}

impl SvgExporter {
    /// Creates an exporter with the given canvas geometry.
    pub fn new(canvas: CanvasConfig) -> Self {
        Self { canvas }
    }

    /// Renders a graph as an SVG document.
    pub fn render(&self, graph: &Graph) -> String {
        let CanvasConfig {
            width,
            height,
            node_radius,
        } = self.canvas;
        let positions = circle_layout(graph.order(), &self.canvas);
        let mut parts = vec![format!(
            "<svg xmlns='http://www.w3.org/2000/svg' width='{width}' height='{height}' viewBox='0 0 {width} {height}'>"
        )];
        for edge in graph.edges() {
            let (u, v) = edge.endpoints();
            let (x1, y1) = positions[u.as_raw() as usize];
            let (x2, y2) = positions[v.as_raw() as usize];
            parts.push(format!(
                "<line x1='{x1:.2}' y1='{y1:.2}' x2='{x2:.2}' y2='{y2:.2}' stroke='gray' stroke-width='1.5' />"
            ));
        }
        for (node, (x, y)) in graph.nodes().zip(&positions) {
            parts.push(format!(
                "<circle cx='{x:.2}' cy='{y:.2}' r='{node_radius:.2}' fill='lightblue' />"
            ));
            parts.push(format!(
                "<text x='{x:.2}' y='{y:.2}' text-anchor='middle' dominant-baseline='central' font-family='sans-serif' font-size='{:.0}'>{node}</text>",
                node_radius
            ));
        }
        parts.push("</svg>".into());
        parts.join("")
    }
}

impl ImageExporter for SvgExporter {
    fn export(
        &self,
        encoded: &str,
        format: ImageFormat,
        output_dir: &Path,
    ) -> Result<ExportOutcome, SogError> {
        let path = image_path(encoded, format, output_dir);
        if path.exists() {
            debug!(path = %path.display(), "image already rendered");
            return Ok(ExportOutcome::Cached(path));
        }
        let graph = sog_graph::decode(encoded).map_err(|err| {
            SogError::Export(
                ErrorInfo::new("invalid-encoding", "cannot render an undecodable graph")
                    .with_context("encoding", encoded)
                    .with_context("cause", err.code()),
            )
        })?;
        let document = match format {
            ImageFormat::Svg => self.render(&graph),
        };
        fs::create_dir_all(output_dir)
            .map_err(|err| export_io("export-mkdir", &err, output_dir))?;
        fs::write(&path, document).map_err(|err| export_io("export-write", &err, &path))?;
        debug!(path = %path.display(), "rendered image");
        Ok(ExportOutcome::Rendered(path))
    }
}

fn circle_layout(order: usize, canvas: &CanvasConfig) -> Vec<(f64, f64)> {
    let cx = f64::from(canvas.width) / 2.0;
    let cy = f64::from(canvas.height) / 2.0;
    if order == 1 {
        return vec![(cx, cy)];
    }
    let radius = (cx.min(cy) - canvas.node_radius * 1.5).max(0.0);
    (0..order)
        .map(|idx| {
            let angle = 2.0 * PI * idx as f64 / order as f64 - PI / 2.0;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

fn export_io(code: &str, err: &std::io::Error, path: &Path) -> SogError {
    SogError::Export(ErrorInfo::new(code, err.to_string()).with_context("path", path.display()))
}
