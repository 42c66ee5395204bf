/// The `Value` enum and value-level helpers: truthiness, equality and type
/// names.
pub mod core;

/// Callables: user functions, native functions and classes called as
/// constructors, with their shared arity and binding contract.
pub mod callable;

/// Classes, modules and mixins.
///
/// Holds the member tables and implements the ancestor walk behind method
/// dispatch, `super` lookup, the is-a test and module inclusion.
pub mod class;

/// Instances and their hidden engine storage.
pub mod instance;

/// Hashable keys for map instances.
///
/// Defines the `MapKey` type used to index a `MapTable`. Numbers hash by
/// their bit pattern through `OrderedFloat`, strings by contents and every
/// other object by identity.
pub mod map_key;
