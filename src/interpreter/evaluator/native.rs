/// Declares a table of native members.
///
/// Each entry provides:
/// - the slot the member is installed in (`Method`, `Getter`, `Static` or
///   `Function` for globals),
/// - a string name,
/// - an arity range,
/// - optionally, keyword parameters with their defaults,
/// - a function pointer implementing the member.
///
/// The macro produces a `static` slice of [`core::NativeDef`] under the
/// given name, consumed by [`core::bootstrap`].
macro_rules! native_methods {
    (
        $table:ident {
            $(
                $slot:ident $name:literal => {
                    arity: $arity:expr,
                    $(keywords: $keywords:expr,)?
                    func: $func:expr $(,)?
                }
            ),* $(,)?
        }
    ) => {
        pub(crate) static $table: &[$crate::interpreter::evaluator::native::core::NativeDef] = &[
            $(
                $crate::interpreter::evaluator::native::core::NativeDef {
                    name:     $name,
                    slot:     $crate::interpreter::evaluator::native::core::Slot::$slot,
                    arity:    $arity,
                    keywords: native_methods!(@keywords $($keywords)?),
                    func:     $func,
                },
            )*
        ];
    };
    (@keywords) => { &[] };
    (@keywords $keywords:expr) => { $keywords };
}

/// The bootstrap classes, the native member table type and the bootstrap
/// sequence.
pub mod core;

/// Members every value answers to: `toString`, `class`, `isA`, `freeze`,
/// `isFrozen`, `ancestors`, `respondsTo` and `send`.
pub mod object;

/// Reflection on classes and modules.
pub mod module;

/// Function values: `name`, `arity` and `call`.
pub mod function;

/// Number methods.
pub mod number;

/// String methods. Only `init` and `push` mutate the receiver.
pub mod string;

/// Array methods, including the iteration helpers that call back into
/// scripts.
pub mod array;

/// Map methods. Maps keep insertion order.
pub mod map;

/// The `Error` hierarchy.
pub mod error;

/// Global functions: `clock`, `typeof`, `assert`, `eval`, `load`,
/// `requireScript` and `trap`.
pub mod global;
