//! Seeded minimum scans shared by the selection policies.
//!
//! Every policy in this crate reduces to the same loop: walk the candidate
//! list once, skip ineligible entries, keep the strictly smallest key seen
//! so far. The scan is factored out here so the policies differ only in
//! their eligibility predicates.

/// Maximum physically valid solar/viewing zenith angle in degrees.
///
/// Seeds minimum scans so that any real measurement beats it; a scan that
/// never improves on the seed found no eligible candidate.
pub const MIN_ZENITH_SEED: f32 = 180.0;

/// Linear arg-min over `items`, seeded at `seed`.
///
/// `key` yields the comparison value for an eligible candidate and `None`
/// for one that must be skipped. Comparison is strict `<`, so ties keep
/// the first occurrence. Returns `None` when no candidate ever beats the
/// seed. NaN keys never compare below the running minimum and are skipped.
pub fn arg_min_by<T, I, K>(items: I, mut key: K, seed: f32) -> Option<(usize, f32)>
where
    I: IntoIterator<Item = T>,
    K: FnMut(usize, &T) -> Option<f32>,
{
    let mut best: Option<(usize, f32)> = None;
    let mut running = seed;
    for (i, item) in items.into_iter().enumerate() {
        let Some(value) = key(i, &item) else {
            continue;
        };
        if value < running {
            running = value;
            best = Some((i, value));
        }
    }
    best
}

/// Plain minimum over the values `key` yields; `None` for an empty set.
///
/// Unlike [`arg_min_by`] there is no seed: the first eligible value is
/// taken as the initial minimum, whatever its magnitude.
pub fn min_value_by<T, I, K>(items: I, mut key: K) -> Option<f32>
where
    I: IntoIterator<Item = T>,
    K: FnMut(usize, &T) -> Option<f32>,
{
    let mut min: Option<f32> = None;
    for (i, item) in items.into_iter().enumerate() {
        let Some(value) = key(i, &item) else {
            continue;
        };
        min = match min {
            None => Some(value),
            Some(m) if value < m => Some(value),
            Some(m) => Some(m),
        };
    }
    min
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_min_basic() {
        let values = [40.0f32, 10.0, 55.0];
        let best = arg_min_by(values, |_, v| Some(*v), MIN_ZENITH_SEED);
        assert_eq!(best, Some((1, 10.0)));
    }

    #[test]
    fn test_arg_min_ties_keep_first_occurrence() {
        let values = [30.0f32, 30.0, 30.0];
        let best = arg_min_by(values, |_, v| Some(*v), MIN_ZENITH_SEED);
        assert_eq!(best, Some((0, 30.0)));
    }

    #[test]
    fn test_arg_min_respects_predicate() {
        // The global minimum is filtered out, so the runner-up wins
        let values = [40.0f32, 10.0, 55.0];
        let best = arg_min_by(
            values,
            |i, v| if i == 1 { None } else { Some(*v) },
            MIN_ZENITH_SEED,
        );
        assert_eq!(best, Some((0, 40.0)));
    }

    #[test]
    fn test_arg_min_none_when_nothing_beats_seed() {
        let values = [200.0f32, 350.0];
        assert_eq!(
            arg_min_by(values, |_, v| Some(*v), MIN_ZENITH_SEED),
            None
        );
        assert_eq!(
            arg_min_by(Vec::<f32>::new(), |_, v| Some(*v), MIN_ZENITH_SEED),
            None
        );
    }

    #[test]
    fn test_arg_min_skips_nan() {
        let values = [f32::NAN, 70.0];
        let best = arg_min_by(values, |_, v| Some(*v), MIN_ZENITH_SEED);
        assert_eq!(best, Some((1, 70.0)));
    }

    #[test]
    fn test_min_value_has_no_seed() {
        let values = [200.0f32, 350.0];
        assert_eq!(min_value_by(values, |_, v| Some(*v)), Some(200.0));
        assert_eq!(min_value_by(Vec::<f32>::new(), |_, v| Some(*v)), None);
    }
}
