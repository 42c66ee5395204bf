/// Stack space that must remain before a nested evaluation step runs.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, first moving to a fresh stack segment when less than the red
/// zone remains.
///
/// Evaluation recurses on the host stack once per nested call, statement and
/// expression. Growing it on demand lets the call depth bound in `Config`
/// decide when a script recurses too deeply, whatever stack the embedding
/// thread was given.
///
/// # Example
/// ```
/// use kestrel::util::stack::ensure_sufficient_stack;
///
/// fn depth(n: u64) -> u64 {
///     ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
/// }
///
/// assert_eq!(depth(100_000), 100_000);
/// ```
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
