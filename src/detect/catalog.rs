// ABOUTME: Signature catalog mapping ecosystems to extensions and marker files.
// ABOUTME: Ordered and immutable; declaration order breaks detection ties.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::EcosystemId;

/// Signals that recognize one ecosystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcosystemSignature {
    #[serde(rename = "id")]
    pub identifier: EcosystemId,

    /// Extensions without the leading dot, compared case-sensitively.
    #[serde(default)]
    pub extensions: BTreeSet<String>,

    /// File names whose presence implies the ecosystem.
    #[serde(default, rename = "markers")]
    pub marker_files: BTreeSet<String>,
}

impl EcosystemSignature {
    pub fn new(identifier: EcosystemId) -> Self {
        Self {
            identifier,
            extensions: BTreeSet::new(),
            marker_files: BTreeSet::new(),
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions
            .extend(extensions.into_iter().map(|e| e.into().trim_start_matches('.').to_string()));
        self
    }

    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.marker_files.extend(markers.into_iter().map(Into::into));
        self
    }
}

/// Error building a catalog from user-supplied signatures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("ecosystem catalog is empty")]
    Empty,

    #[error("ecosystem '{0}' is declared more than once")]
    Duplicate(EcosystemId),

    #[error("ecosystem '{0}' has neither extensions nor marker files")]
    NoSignals(EcosystemId),
}

/// Ordered, immutable set of ecosystem signatures.
///
/// Built once at startup and handed to the detector; iteration always
/// follows declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCatalog {
    entries: Vec<EcosystemSignature>,
}

impl SignatureCatalog {
    pub fn new(entries: Vec<EcosystemSignature>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = BTreeSet::new();
        for entry in &entries {
            if !seen.insert(&entry.identifier) {
                return Err(CatalogError::Duplicate(entry.identifier.clone()));
            }
            if entry.extensions.is_empty() && entry.marker_files.is_empty() {
                return Err(CatalogError::NoSignals(entry.identifier.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// The catalog shipped with boxrun.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(id, extensions, markers)| {
                EcosystemSignature::new(builtin_id(id))
                    .with_extensions(extensions.iter().copied())
                    .with_markers(markers.iter().copied())
            })
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EcosystemSignature> {
        self.entries.iter()
    }

    pub fn get(&self, id: &EcosystemId) -> Option<&EcosystemSignature> {
        self.entries.iter().find(|e| &e.identifier == id)
    }

    pub fn contains(&self, id: &EcosystemId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SignatureCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

type BuiltinEntry = (&'static str, &'static [&'static str], &'static [&'static str]);

const BUILTIN: &[BuiltinEntry] = &[
    (
        "python",
        &["py"],
        &[
            "requirements.txt",
            "pyproject.toml",
            "setup.py",
            "environment.yml",
            "Pipfile",
        ],
    ),
    ("java", &["java"], &["pom.xml", "build.gradle", "mvnw"]),
    (
        "kotlin",
        &["kt", "kts"],
        &["build.gradle.kts", "settings.gradle.kts"],
    ),
    (
        "js",
        &["js", "mjs", "cjs", "jsx", "ts", "tsx"],
        &["package.json", "yarn.lock", "tsconfig.json"],
    ),
    ("go", &["go"], &["go.mod", "Taskfile.yml", "magefile.go"]),
    (
        "cpp",
        &["cpp", "cc", "cxx", "hpp", "hh"],
        &["CMakeLists.txt", "meson.build"],
    ),
];

fn builtin_id(id: &str) -> EcosystemId {
    EcosystemId::new(id).expect("builtin ecosystem identifiers are valid")
}
