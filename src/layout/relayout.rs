/// Split `available` among children proportionally to their shares, keeping every child within
/// its `[min, max]`.
///
/// Children are sized as `clamp(lambda * share, min, max)` with a single `lambda` chosen so the
/// lengths add up to `available`. If the minimums alone don't fit, everyone gets their minimum
/// (the layout overflows). If the maximums don't fill the space, everyone gets their maximum
/// and the remainder stays empty.
pub(crate) fn distribute(available: f32, shares: &[f32], mins: &[f32], maxs: &[f32]) -> Vec<f32> {
    debug_assert!(
        shares.len() == mins.len() && mins.len() == maxs.len(),
        "mismatched distribution inputs"
    );

    let n = shares.len();
    if n == 0 {
        return Vec::new();
    }

    let shares: Vec<f32> = shares
        .iter()
        .map(|&s| if s.is_finite() && s > 0.0 { s } else { 1.0 })
        .collect();
    let maxs: Vec<f32> = mins
        .iter()
        .zip(maxs)
        .map(|(&min, &max)| max.max(min))
        .collect();

    let total_min: f32 = mins.iter().sum();
    if total_min >= available {
        return mins.to_vec();
    }
    let total_max: f32 = maxs.iter().sum();
    if total_max <= available {
        return maxs;
    }

    let sized = |lambda: f32| -> Vec<f32> {
        (0..n)
            .map(|i| (lambda * shares[i]).clamp(mins[i], maxs[i]))
            .collect()
    };

    let mut lo = 0.0_f32;
    let mut hi = (0..n)
        .map(|i| maxs[i].min(available) / shares[i])
        .fold(0.0_f32, f32::max);
    for _ in 0..64 {
        let mid = 0.5 * (lo + hi);
        let total: f32 = sized(mid).iter().sum();
        if total < available {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let mut lengths = sized(hi);

    // Bisection leaves a rounding residue; hand it to the last child that can take it.
    let residue = available - lengths.iter().sum::<f32>();
    if residue != 0.0 {
        if let Some(i) = (0..n).rev().find(|&i| {
            let candidate = lengths[i] + residue;
            candidate >= mins[i] && candidate <= maxs[i]
        }) {
            lengths[i] += residue;
        }
    }

    lengths
}
