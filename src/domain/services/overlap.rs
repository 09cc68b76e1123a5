//! The two interval-conflict predicates. They disagree at boundaries and are
//! kept apart on purpose: stored agenda date ranges are compared with the
//! closed form, wall-clock slots and reservations with the half-open form.

/// Closed-range conflict between `[a, b]` and `[c, d]`.
///
/// True when `a` lies in `[c, d]`, when `b` lies in `[c, d]`, or when `[a, b]`
/// fully contains `[c, d]`. Touching endpoints conflict.
pub fn range_overlaps<T: PartialOrd>(a: &T, b: &T, c: &T, d: &T) -> bool {
    let within = |x: &T| c <= x && x <= d;
    within(a) || within(b) || (a <= c && b >= d)
}

/// Strict half-open overlap between `[a, b)` and `[c, d)`.
pub fn strict_overlaps<T: PartialOrd>(a: &T, b: &T, c: &T, d: &T) -> bool {
    a < d && c < b
}
