use proptest::prelude::*;
use tensile_rig::core::{Curve, ScaledSample, find_key_points, find_uts_index};

/// Strain walks by signed steps and is floored at zero, so generated curves
/// double back on themselves the way recorded ones can.
fn curve_text(points: &[(i32, u32)]) -> String {
    let mut strain_hundredths = 0i32;
    let mut lines = Vec::with_capacity(points.len());
    for &(strain_step, stress_hundredths) in points {
        strain_hundredths = (strain_hundredths + strain_step).max(0);
        lines.push(format!(
            "{:.2}|{:.2}",
            f64::from(stress_hundredths) / 100.0,
            f64::from(strain_hundredths) / 100.0
        ));
    }
    lines.join("\n")
}

fn to_scaled(curve: &Curve) -> Vec<ScaledSample> {
    curve
        .samples()
        .iter()
        .map(|s| ScaledSample::new(s.strain_percent, s.stress_mpa))
        .collect()
}

proptest! {
    #[test]
    fn parsed_curve_preserves_every_line(
        points in prop::collection::vec((-400i32..500, 0u32..100_000), 2..60)
    ) {
        let curve = Curve::parse(&curve_text(&points)).expect("generated curve parses");
        prop_assert_eq!(curve.len(), points.len());

        let max_stress = points.iter().map(|p| p.1).max().expect("non-empty");
        prop_assert!((curve.raw_max_stress() - f64::from(max_stress) / 100.0).abs() <= 1e-9);

        let mut expected_strain = 0i32;
        for (sample, &(step, _)) in curve.samples().iter().zip(&points) {
            expected_strain = (expected_strain + step).max(0);
            prop_assert!(sample.strain_percent >= 0.0);
            prop_assert!((sample.strain_percent - f64::from(expected_strain) / 100.0).abs() <= 1e-9);
        }
    }

    #[test]
    fn rupture_never_precedes_uts(
        points in prop::collection::vec((-400i32..500, 0u32..100_000), 2..60),
        threshold_hundredths in -1i64..100_000
    ) {
        let curve = Curve::parse(&curve_text(&points)).expect("generated curve parses");
        let samples = to_scaled(&curve);
        let threshold = if threshold_hundredths < 0 {
            -1.0
        } else {
            threshold_hundredths as f64 / 100.0
        };

        let key_points = find_key_points(&samples, threshold, None);
        let uts = key_points.uts_strain_percent.expect("uts for >= 2 samples");
        let rupture = key_points.rupture_strain_percent.expect("rupture for >= 2 samples");
        prop_assert!(rupture >= uts);

        let uts_index = find_uts_index(&samples).expect("uts index");
        let peak = samples[uts_index].force_kn;
        prop_assert!(samples.iter().all(|s| s.force_kn <= peak));
        prop_assert!(samples[..uts_index].iter().all(|s| s.force_kn < peak));
        prop_assert_eq!(uts, samples[uts_index].strain_percent);

        // Same input, same answer.
        prop_assert_eq!(find_key_points(&samples, threshold, None), key_points);
    }
}
