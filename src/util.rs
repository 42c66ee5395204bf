/// Numeric conversion helpers.
///
/// Scripts only have `f64` numbers, but the host indexes with `usize`. These
/// helpers convert between the two without silent data loss and format
/// numbers for printing.
///
/// Conversions return a `Result` carrying a caller-supplied error, so each
/// call site decides what a bad value means.
pub mod num;

/// On-demand growth of the host stack for deeply recursive evaluation.
pub mod stack;
