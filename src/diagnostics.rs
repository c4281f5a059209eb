// ABOUTME: Diagnostics accumulator for non-fatal warnings during a run.
// ABOUTME: Collects cleanup problems that shouldn't fail a run but should be shown to users.

/// Collects non-fatal warnings during pipeline and suite operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create an image cleanup warning.
    pub fn image_cleanup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ImageCleanup,
            message: message.into(),
        }
    }

    /// Create a checkout cleanup warning.
    pub fn checkout_cleanup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::CheckoutCleanup,
            message: message.into(),
        }
    }

    /// Create a detection mismatch warning.
    pub fn detection_mismatch(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::DetectionMismatch,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Managed images could not be listed or removed.
    ImageCleanup,
    /// A cloned checkout could not be removed.
    CheckoutCleanup,
    /// The detector disagreed with an explicit `--lang`.
    DetectionMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_starts_empty() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn diagnostics_collects_warnings() {
        let mut diag = Diagnostics::default();

        diag.warn(Warning::image_cleanup("rmi failed"));
        diag.warn(Warning::checkout_cleanup("directory busy"));

        assert!(diag.has_warnings());
        assert_eq!(diag.warnings().len(), 2);
    }

    #[test]
    fn warning_constructors_set_correct_kind() {
        assert_eq!(Warning::image_cleanup("x").kind, WarningKind::ImageCleanup);
        assert_eq!(
            Warning::checkout_cleanup("x").kind,
            WarningKind::CheckoutCleanup
        );
        assert_eq!(
            Warning::detection_mismatch("x").kind,
            WarningKind::DetectionMismatch
        );
    }
}
