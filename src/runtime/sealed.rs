// ABOUTME: Sealed trait pattern for the engine trait.
// ABOUTME: Prevents external implementations, allowing non-breaking evolution.

/// Sealed trait to prevent external implementations.
///
/// Only engine types defined in this crate can implement
/// [`ContainerEngine`](super::ContainerEngine).
pub trait Sealed {}
