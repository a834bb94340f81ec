mod fixtures;

use econ_ta::{Bb, BbConfig, PercentB, StdDev, calculate_bb_percentile};
use fixtures::{assert_points_match, load_ref_values, load_reference_bars};
use std::num::NonZero;

const REF_PATH: &str = "tests/fixtures/data/percent-b-20-2-close.csv";

/// Tolerance: 1e-7 on a percentage scale.
/// %B divides by the band width, which amplifies band noise on quiet
/// stretches.
const TOLERANCE: f64 = 1e-7;

#[test]
fn percent_b_20_2_close_matches_reference() {
    let bars = load_reference_bars();
    let reference = load_ref_values(REF_PATH);

    let points = calculate_bb_percentile(&bars, NonZero::new(20).unwrap(), StdDev::new(2.0));

    assert_points_match(&points, &reference, TOLERANCE, "%B(20, 2)");
}

#[test]
fn percent_b_aligned_with_bands() {
    let bars = load_reference_bars();
    let bands = Bb::new(BbConfig::default_20()).calculate(&bars);
    let percent_b = PercentB::new(BbConfig::default_20()).calculate(&bars);

    assert_eq!(bands.len(), percent_b.len());
    assert!(
        bands
            .iter()
            .zip(&percent_b)
            .all(|(band, point)| band.time() == point.time())
    );
}
