/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Safely converts a `usize` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` if the value exceeds `MAX_SAFE_U64_INT`.
///
/// ## Parameters
/// - `value`: The value to convert.
/// - `error`: The error to return if the conversion would lose precision.
///
/// ## Example
/// ```
/// use kestrel::util::num::{MAX_SAFE_U64_INT, usize_to_f64_checked};
///
/// assert_eq!(usize_to_f64_checked(100, "too big"), Ok(100.0));
///
/// let too_big = (MAX_SAFE_U64_INT + 1) as usize;
/// assert_eq!(usize_to_f64_checked(too_big, "too big"), Err("too big"));
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn usize_to_f64_checked<E>(value: usize, error: E) -> Result<f64, E> {
    match u64::try_from(value) {
        Ok(v) if v <= MAX_SAFE_U64_INT => Ok(v as f64),
        _ => Err(error),
    }
}

/// Converts a collection length to a script number.
///
/// Lengths of in-memory collections never approach `2^53`, so this saturates
/// instead of failing.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn length_to_f64(value: usize) -> f64 {
    usize_to_f64_checked(value, MAX_SAFE_U64_INT as f64).unwrap_or_else(|max| max)
}

/// Safely converts an `f64` to a non-negative index.
///
/// ## Errors
/// Returns `Err(error)` for non-finite, negative, fractional or
/// out-of-range values.
///
/// ## Example
/// ```
/// use kestrel::util::num::f64_to_index_checked;
///
/// assert_eq!(f64_to_index_checked(3.0, ()), Ok(3));
/// assert!(f64_to_index_checked(-1.0, ()).is_err());
/// assert!(f64_to_index_checked(1.5, ()).is_err());
/// assert!(f64_to_index_checked(f64::NAN, ()).is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_sign_loss)]
pub fn f64_to_index_checked<E>(value: f64, error: E) -> Result<usize, E> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(error);
    }
    if value > MAX_SAFE_U64_INT as f64 {
        return Err(error);
    }
    usize::try_from(value as u64).map_err(|_| error)
}

/// Formats a number the way scripts print it: integral values drop the
/// trailing `.0`.
///
/// ## Example
/// ```
/// use kestrel::util::num::format_number;
///
/// assert_eq!(format_number(2.0), "2");
/// assert_eq!(format_number(1.1), "1.1");
/// assert_eq!(format_number(-0.5), "-0.5");
/// assert_eq!(format_number(f64::INFINITY), "inf");
/// ```
#[must_use]
pub fn format_number(value: f64) -> String {
    // `-0` prints as `0`
    if value == 0.0 { "0".to_string() } else { value.to_string() }
}
