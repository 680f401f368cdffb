// ABOUTME: Sealed trait pattern for runtime traits.
// ABOUTME: Only this crate's runtimes (bollard and the test recorder) implement them.

/// Only types inside this crate can implement the runtime traits, so
/// methods can be added to them without breaking downstream code.
pub trait Sealed {}
