// ABOUTME: Language detection: tree scanning, signature catalog and detector.
// ABOUTME: Produces a single ecosystem identifier for a project directory.

mod catalog;
mod detector;
pub mod scanner;

pub use catalog::{CatalogError, EcosystemSignature, SignatureCatalog};
pub use detector::{DetectionMethod, DetectionResult, Detector};
pub use scanner::{DEFAULT_MAX_DEPTH, ExtensionProfile, SKIPPED_DIRS, scan};
