//! # Job Files
//!
//! A job is a JSON description of one sheet and the images placed on it,
//! consumed by the `plan` and `export` commands.
//!
//! ```json
//! {
//!   "paper": "A4",
//!   "card": "poker",
//!   "margin": 10,
//!   "alignment": "top",
//!   "repeat_first": false,
//!   "images": [
//!     { "cell": 0, "source": "art/front.png" },
//!     { "cell": 4, "source": "https://example.com/back.jpg" }
//!   ]
//! }
//! ```
//!
//! Only `images` entries are required to be well-formed; every other field
//! has a default. Relative file paths resolve against the job file's
//! directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::catalog::{CardSize, PaperSize};
use crate::error::PrintardError;
use crate::fit::Alignment;
use crate::grid::cell_id;
use crate::layout::MIN_MARGIN_MM;
use crate::render::ClipStrategy;
use crate::sheet::Sheet;
use crate::source::ImageSource;

/// One image placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobImage {
    /// Row-major cell index.
    pub cell: usize,
    /// File path, `http(s)://` URL or `data:` URI.
    pub source: String,
}

/// Parsed job file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Paper name, looked up case-insensitively.
    #[serde(default)]
    pub paper: Option<String>,
    /// Card name, looked up case-insensitively.
    #[serde(default)]
    pub card: Option<String>,
    #[serde(default)]
    pub margin: Option<f32>,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub repeat_first: bool,
    #[serde(default)]
    pub strategy: ClipStrategy,
    #[serde(default)]
    pub images: Vec<JobImage>,
    /// Directory relative image paths resolve against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Job {
    /// Read and parse a job file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PrintardError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut job: Job = text.parse()?;
        job.base_dir = path.parent().map(Path::to_path_buf);
        Ok(job)
    }

    pub fn paper_size(&self) -> Result<PaperSize, PrintardError> {
        self.paper
            .as_deref()
            .map_or(Ok(PaperSize::default()), PaperSize::from_str)
    }

    pub fn card_size(&self) -> Result<CardSize, PrintardError> {
        self.card
            .as_deref()
            .map_or(Ok(CardSize::default()), CardSize::from_str)
    }

    /// Resolve one image reference, anchoring relative paths at `base_dir`.
    fn resolve_source(&self, reference: &str) -> Result<ImageSource, PrintardError> {
        match ImageSource::parse(reference)? {
            ImageSource::Path(path) if path.is_relative() => match &self.base_dir {
                Some(dir) => Ok(ImageSource::Path(dir.join(path))),
                None => Ok(ImageSource::Path(path)),
            },
            other => Ok(other),
        }
    }

    /// Build the sheet this job describes.
    ///
    /// Fails on unknown sizes, invalid margins, bad image references, or an
    /// image placed on a cell the layout does not have. A later entry for
    /// the same cell replaces an earlier one.
    pub fn into_sheet(&self) -> Result<Sheet, PrintardError> {
        let paper = self.paper_size()?;
        let card = self.card_size()?;
        let mut sheet = Sheet::with_margin(paper, card, self.margin.unwrap_or(MIN_MARGIN_MM))?;
        sheet.options.alignment = self.alignment;
        sheet.options.repeat_first = self.repeat_first;
        sheet.options.strategy = self.strategy;

        let total = sheet.grid().len();
        for entry in &self.images {
            if entry.cell >= total {
                return Err(PrintardError::Job(format!(
                    "cell {} is out of range: {} {} has {} cells",
                    entry.cell, paper, card, total
                )));
            }
            let source = self.resolve_source(&entry.source)?;
            sheet.set_image(&cell_id(entry.cell), source);
        }
        Ok(sheet)
    }
}

impl FromStr for Job {
    type Err = PrintardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map_err(|e| PrintardError::Job(format!("Invalid job file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minimal_job_uses_defaults() {
        let job: Job = r#"{"images": []}"#.parse().unwrap();
        let sheet = job.into_sheet().unwrap();
        assert_eq!(sheet.paper(), PaperSize::A4);
        assert_eq!(sheet.card(), CardSize::Poker);
        assert_eq!(sheet.margin(), MIN_MARGIN_MM);
        assert_eq!(sheet.options.alignment, Alignment::Center);
    }

    #[test]
    fn test_full_job() {
        let job: Job = r#"{
            "paper": "superA3",
            "card": "MINI",
            "margin": 12.5,
            "alignment": "bottom",
            "repeat_first": true,
            "strategy": "crop_source",
            "images": [{"cell": 3, "source": "https://example.com/a.png"}]
        }"#
        .parse()
        .unwrap();
        let sheet = job.into_sheet().unwrap();
        assert_eq!(sheet.paper(), PaperSize::SuperA3);
        assert_eq!(sheet.card(), CardSize::Mini);
        assert_eq!(sheet.margin(), 12.5);
        assert_eq!(sheet.options.alignment, Alignment::Bottom);
        assert_eq!(sheet.options.strategy, ClipStrategy::CropSource);
        assert!(sheet.options.repeat_first);
        assert_eq!(
            sheet.grid().effective_image(3, false),
            Some(&ImageSource::Url("https://example.com/a.png".to_string()))
        );
    }

    #[test]
    fn test_unknown_paper_rejected() {
        let job: Job = r#"{"paper": "letter"}"#.parse().unwrap();
        assert!(matches!(job.into_sheet(), Err(PrintardError::UnknownSize(_))));
    }

    #[test]
    fn test_out_of_range_cell_rejected() {
        let job: Job = r#"{"images": [{"cell": 9, "source": "x.png"}]}"#.parse().unwrap();
        assert!(matches!(job.into_sheet(), Err(PrintardError::Job(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!("{".parse::<Job>(), Err(PrintardError::Job(_))));
    }

    #[test]
    fn test_relative_paths_resolve_against_job_dir() {
        let mut job: Job = r#"{"images": [
            {"cell": 0, "source": "front.png"},
            {"cell": 1, "source": "/abs/back.png"}
        ]}"#
        .parse()
        .unwrap();
        job.base_dir = Some(PathBuf::from("/jobs/deck"));
        let sheet = job.into_sheet().unwrap();
        assert_eq!(
            sheet.grid().effective_image(0, false),
            Some(&ImageSource::Path(PathBuf::from("/jobs/deck/front.png")))
        );
        assert_eq!(
            sheet.grid().effective_image(1, false),
            Some(&ImageSource::Path(PathBuf::from("/abs/back.png")))
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("printard-job-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("job.json");
        std::fs::write(&path, r#"{"card": "square", "images": [{"cell": 0, "source": "a.png"}]}"#)
            .unwrap();

        let job = Job::load(&path).unwrap();
        assert_eq!(job.base_dir.as_deref(), Some(dir.as_path()));
        let sheet = job.into_sheet().unwrap();
        assert_eq!(sheet.card(), CardSize::Square);
        assert_eq!(
            sheet.grid().effective_image(0, false),
            Some(&ImageSource::Path(dir.join("a.png")))
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Job::load("/definitely/not/here.json"),
            Err(PrintardError::Io(_))
        ));
    }
}
