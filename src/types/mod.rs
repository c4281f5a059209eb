// ABOUTME: Validated domain types shared by the detector, engine and suite.
// ABOUTME: Ecosystem identifiers and locally built image tags.

mod ecosystem_id;
mod image_tag;

pub use ecosystem_id::{EcosystemId, EcosystemIdError};
pub use image_tag::{ImageTag, ParseImageTagError, new_run_id};
