#![forbid(unsafe_code)]

//! Style-path comparison.

use fdoc_style::StyleId;

/// First index at which two style paths differ, or `None` if they are equal.
///
/// Positions past the end of the shorter path count as differences, so the
/// result is also the number of leading wrappers the two paths share.
/// The comparison is symmetric.
///
/// ```
/// use fdoc_model::path::first_divergence;
/// use fdoc_style::StyleId;
///
/// let (x, y, z) = (StyleId(1), StyleId(2), StyleId(3));
/// assert_eq!(first_divergence(&[], &[x]), Some(0));
/// assert_eq!(first_divergence(&[x], &[x, y]), Some(1));
/// assert_eq!(first_divergence(&[x, y], &[x, y]), None);
/// assert_eq!(first_divergence(&[x, y], &[x, z]), Some(1));
/// assert_eq!(first_divergence(&[x, y], &[y]), Some(0));
/// ```
#[must_use]
pub fn first_divergence(a: &[StyleId], b: &[StyleId]) -> Option<usize> {
    let (longer, shorter) = if b.len() > a.len() { (b, a) } else { (a, b) };
    longer
        .iter()
        .enumerate()
        .position(|(i, id)| shorter.get(i) != Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<StyleId> {
        raw.iter().copied().map(StyleId).collect()
    }

    #[test]
    fn empty_paths_are_equal() {
        assert_eq!(first_divergence(&[], &[]), None);
    }

    #[test]
    fn empty_against_nonempty_diverges_at_zero() {
        assert_eq!(first_divergence(&[], &ids(&[1])), Some(0));
        assert_eq!(first_divergence(&ids(&[1]), &[]), Some(0));
    }

    #[test]
    fn extension_diverges_at_shared_length() {
        assert_eq!(first_divergence(&ids(&[1]), &ids(&[1, 2])), Some(1));
        assert_eq!(first_divergence(&ids(&[1, 2, 3]), &ids(&[1])), Some(1));
    }

    #[test]
    fn equal_paths() {
        assert_eq!(first_divergence(&ids(&[1, 2]), &ids(&[1, 2])), None);
    }

    #[test]
    fn sibling_paths() {
        assert_eq!(first_divergence(&ids(&[1, 2]), &ids(&[1, 3])), Some(1));
        assert_eq!(first_divergence(&ids(&[1, 2]), &ids(&[2])), Some(0));
    }

    #[test]
    fn same_ids_in_different_order_diverge_immediately() {
        assert_eq!(first_divergence(&ids(&[1, 2]), &ids(&[2, 1])), Some(0));
    }
}
