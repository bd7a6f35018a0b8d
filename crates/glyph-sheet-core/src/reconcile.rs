use tracing::debug;

use crate::error::{Result, SheetError};
use crate::model::{AnimationFrame, ReconcilePolicy};

/// Policy that maps `n` source frames onto `target` slots.
pub fn policy_for(n: usize, target: usize) -> ReconcilePolicy {
    if n < target {
        ReconcilePolicy::Pad
    } else if n == target {
        ReconcilePolicy::PassThrough
    } else if n <= target.saturating_mul(2) {
        ReconcilePolicy::Truncate
    } else {
        ReconcilePolicy::Downsample
    }
}

/// Source index feeding each of the `target` output slots.
///
/// - pad: slot `i` takes `i mod n` (cycles from the first frame)
/// - pass-through / truncate: slot `i` takes `i`
/// - downsample (`n > 2 * target`): slot `i` takes `floor(i * n / target)`
///
/// Empty when `n` is 0: there is nothing to draw from.
pub fn source_indices(n: usize, target: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    match policy_for(n, target) {
        ReconcilePolicy::Pad => (0..target).map(|i| i % n).collect(),
        ReconcilePolicy::PassThrough | ReconcilePolicy::Truncate => (0..target).collect(),
        ReconcilePolicy::Downsample => (0..target)
            .map(|i| ((i as u64 * n as u64) / target as u64) as usize)
            .collect(),
    }
}

/// Returns exactly `target` frames drawn from `frames` per [`source_indices`].
///
/// Every output frame is an independent copy. An empty `frames` is a decode error.
pub fn reconcile_frames(
    frames: &[AnimationFrame],
    target: usize,
) -> Result<(Vec<AnimationFrame>, ReconcilePolicy)> {
    if frames.is_empty() {
        return Err(SheetError::decode("<frames>", "animation has no frames"));
    }
    let n = frames.len();
    let policy = policy_for(n, target);
    let out: Vec<AnimationFrame> = source_indices(n, target)
        .into_iter()
        .map(|i| frames[i].clone())
        .collect();
    debug!(source = n, target, ?policy, "reconciled frame count");
    Ok((out, policy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_cyclically_from_first_frame() {
        assert_eq!(source_indices(3, 9), vec![0, 1, 2, 0, 1, 2, 0, 1, 2]);
        assert_eq!(source_indices(10, 16)[10..], [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn single_frame_repeats() {
        assert_eq!(source_indices(1, 4), vec![0, 0, 0, 0]);
    }

    #[test]
    fn truncates_up_to_twice_target() {
        assert_eq!(policy_for(32, 16), ReconcilePolicy::Truncate);
        assert_eq!(source_indices(32, 16), (0..16).collect::<Vec<_>>());
        assert_eq!(policy_for(33, 16), ReconcilePolicy::Downsample);
    }

    #[test]
    fn downsample_spans_the_source() {
        let idx = source_indices(50, 16);
        assert_eq!(idx.len(), 16);
        assert_eq!(idx[0], 0);
        assert_eq!(idx[15], 46);
        assert!(idx.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn empty_source_is_an_error() {
        assert!(source_indices(0, 4).is_empty());
        let err = reconcile_frames(&[], 4).unwrap_err();
        assert!(matches!(err, SheetError::Decode { .. }));
    }

    #[test]
    fn pass_through_is_identity() {
        assert_eq!(policy_for(25, 25), ReconcilePolicy::PassThrough);
        assert_eq!(source_indices(25, 25), (0..25).collect::<Vec<_>>());
    }
}
