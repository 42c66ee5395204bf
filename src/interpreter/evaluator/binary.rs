/// Dispatch of binary operators.
pub mod core;

/// Number arithmetic and the operator protocol.
///
/// `+ - * /` on two numbers compute directly. A left operand that is not a
/// number delegates to its `opAdd`, `opDiff`, `opMul` or `opDiv` method.
pub mod arithmetic;

/// Relational comparisons.
pub mod comparison;

/// `==` and `!=`.
pub mod equality;
