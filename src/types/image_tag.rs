// ABOUTME: Image tag parsing, validation and per-run generation.
// ABOUTME: Handles `repository[:tag]` references for locally built images.

use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

const MAX_TAG_LEN: usize = 128;

/// Hex digits of the label digest appended to run repositories.
const LABEL_DIGEST_LEN: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseImageTagError {
    #[error("image tag cannot be empty")]
    Empty,

    #[error("invalid character in image repository: {0}")]
    InvalidRepositoryChar(char),

    #[error("invalid character in image tag: {0}")]
    InvalidTagChar(char),

    #[error("image tag exceeds maximum length of {MAX_TAG_LEN} characters")]
    TagTooLong,
}

/// Reference to an image built on the local engine.
///
/// Repositories are lowercase (`[a-z0-9._/-]`); tags default to `latest`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageTag {
    repository: String,
    tag: String,
}

impl ImageTag {
    pub fn parse(input: &str) -> Result<Self, ParseImageTagError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageTagError::Empty);
        }

        let (repository, tag) = match input.rsplit_once(':') {
            Some((repo, tag)) if !tag.contains('/') => (repo, tag),
            _ => (input, "latest"),
        };

        if repository.is_empty() || tag.is_empty() {
            return Err(ParseImageTagError::Empty);
        }

        for c in repository.chars() {
            if !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-' | '/'))
            {
                return Err(ParseImageTagError::InvalidRepositoryChar(c));
            }
        }

        if tag.len() > MAX_TAG_LEN {
            return Err(ParseImageTagError::TagTooLong);
        }
        for c in tag.chars() {
            if !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')) {
                return Err(ParseImageTagError::InvalidTagChar(c));
            }
        }

        Ok(Self {
            repository: repository.to_string(),
            tag: tag.to_string(),
        })
    }

    /// Build a tag for one pipeline invocation.
    ///
    /// `label` is sanitized into the repository name (`java/maven` becomes
    /// `boxrun-java-maven-<digest>`) and `run_id` becomes the tag. The digest
    /// of the raw label keeps labels that sanitize alike (`go/multi-file`,
    /// `go/multi/file`) apart.
    pub fn for_run(label: &str, run_id: &str) -> Self {
        let mut repository = String::from("boxrun");
        for part in label
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|p| !p.is_empty())
        {
            repository.push('-');
            repository.push_str(&part.to_ascii_lowercase());
        }
        let digest = format!("{:x}", Sha256::digest(label.as_bytes()));
        repository.push('-');
        repository.push_str(&digest[..LABEL_DIGEST_LEN]);

        let mut tag: String = run_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '-'
                }
            })
            .take(MAX_TAG_LEN)
            .collect();
        if tag.is_empty() {
            tag.push_str("latest");
        }

        Self { repository, tag }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Container name derived from this image: engines reject `/` and `:` there.
    pub fn container_name(&self) -> String {
        format!("{}-{}", self.repository.replace('/', "-"), self.tag)
    }
}

/// Identifier shared by every image one invocation builds.
pub fn new_run_id() -> String {
    format!(
        "{}-{}",
        chrono::Utc::now().format("%Y%m%d%H%M%S"),
        std::process::id()
    )
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}
