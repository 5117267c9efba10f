use sodyn::{
    DynamicsError, DynamicsParams, InvalidParameter, Scalar, SecondOrderTracker, StepBranch,
    TargetVelocity, Tracker1D, Tracker3D, Vec3,
};
use std::f64::consts::PI;

fn step_tracker(f: f64, z: f64, r: f64) -> Tracker1D<f64> {
    SecondOrderTracker::new(DynamicsParams::fzr(f, z, r), Scalar(0.0)).unwrap()
}

#[test]
fn critically_damped_converges() {
    let mut tracker = step_tracker(2.0, 1.0, 0.0);
    for _ in 0..600 {
        tracker.update(1.0 / 60.0, Scalar(1.0));
    }
    assert!((tracker.position().0 - 1.0).abs() < 1e-3);
}

#[test]
fn damped_at_least_critically_approaches_monotonically() {
    for f in [1.0, 2.0, 4.0] {
        for z in [1.0, 1.5, 2.0] {
            let mut tracker = step_tracker(f, z, 0.0);
            let mut previous = tracker.position().0;
            for _ in 0..600 {
                let y = tracker.update(1.0 / 60.0, Scalar(1.0)).0;
                assert!(y >= previous - 1e-12, "f={f} z={z}: {y} fell below {previous}");
                assert!(y <= 1.0 + 1e-9, "f={f} z={z}: overshoot to {y}");
                previous = y;
            }
        }
    }
}

#[test]
fn underdamped_overshoots_then_settles() {
    let mut tracker = step_tracker(2.0, 0.3, 0.0);
    let mut peak = f64::MIN;
    for _ in 0..600 {
        peak = peak.max(tracker.update(1.0 / 60.0, Scalar(1.0)).0);
    }
    assert!(peak > 1.0, "underdamped tracker should overshoot, peak = {peak}");
    assert!(peak < 1.5);
    assert!((tracker.position().0 - 1.0).abs() < 1e-3);
}

#[test]
fn response_scales_overshoot() {
    let peak_for = |r: f64| {
        let mut tracker = step_tracker(2.0, 0.3, r);
        (0..600)
            .map(|_| tracker.update(1.0 / 60.0, Scalar(1.0)).0)
            .fold(f64::MIN, f64::max)
    };
    assert!(peak_for(1.0) > peak_for(0.0));
}

#[test]
fn negative_response_anticipates() {
    let mut tracker = step_tracker(2.0, 0.5, -1.0);
    tracker.update(1.0 / 60.0, Scalar(1.0));
    let y = tracker.update(1.0 / 60.0, Scalar(1.0)).0;
    assert!(y < 0.0, "negative response should first move away, got {y}");
}

#[test]
fn underdamped_step_matches_analytic_overshoot() {
    let z: f64 = 0.1;
    let mut tracker = step_tracker(1.5, z, 0.0);
    let analytic_peak = 1.0 + (-PI * z / (1.0 - z * z).sqrt()).exp();

    let mut peak = f64::MIN;
    for _ in 0..300 {
        peak = peak.max(tracker.update(0.0069, Scalar(1.0)).0);
    }
    assert!((peak - analytic_peak).abs() < 0.02, "peak {peak} vs analytic {analytic_peak}");

    for _ in 300..1500 {
        let y = tracker.update(0.0069, Scalar(1.0)).0;
        assert!(y <= peak + 1e-9);
    }
    assert!((tracker.position().0 - 1.0).abs() < 0.01);
}

#[test]
fn large_steps_stay_bounded() {
    for z in [0.0, 0.1, 0.5, 1.0, 2.0] {
        for f in [0.5, 1.5, 4.0] {
            for multiple in [4.0, 10.0, 25.0] {
                for r in [-1.0, 0.0, 1.0] {
                    let dt = multiple / f;
                    let mut tracker = step_tracker(f, z, r);
                    assert_eq!(tracker.step_coefficients(dt).branch, StepBranch::Implicit);
                    for _ in 0..200 {
                        let y = tracker.update(dt, Scalar(1.0)).0;
                        assert!(
                            y.is_finite() && y.abs() <= 2.0 + 1e-6,
                            "f={f} z={z} r={r} dt={dt}: position {y}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn naive_discretization_diverges_where_tracker_does_not() {
    let (f, z, dt) = (1.5f64, 0.5f64, 10.0 / 1.5);
    let w = 2.0 * PI * f;
    let (k1, k2) = (z / (PI * f), 1.0 / (w * w));

    let (mut y, mut yd) = (0.0f64, 0.0f64);
    for _ in 0..20 {
        y += dt * yd;
        yd += dt * (1.0 - y - k1 * yd) / k2;
    }
    assert!(y.abs() > 1e6, "explicit Euler should blow up, got {y}");

    let mut tracker = step_tracker(f, z, 0.0);
    for _ in 0..20 {
        tracker.update(dt, Scalar(1.0));
    }
    assert!((tracker.position().0 - 1.0).abs() < 1e-6);
}

#[test]
fn zero_dt_no_change() {
    let mut tracker = step_tracker(3.0, 0.4, 1.0);
    for _ in 0..5 {
        tracker.update(1.0 / 60.0, Scalar(1.0));
    }
    let (position, velocity) = (tracker.position(), tracker.velocity());
    assert_eq!(tracker.update(0.0, Scalar(10.0)), position);
    assert_eq!(tracker.position(), position);
    assert_eq!(tracker.velocity(), velocity);
}

#[test]
fn rejects_non_positive_frequency() {
    for f in [0.0, -2.0] {
        let err = Tracker1D::<f64>::new(DynamicsParams::fzr(f, 1.0, 0.0), Scalar(0.0)).unwrap_err();
        assert_eq!(err, DynamicsError::InvalidParameter(InvalidParameter::Frequency));
    }
}

#[test]
fn accepts_any_damping_and_response() {
    for z in [0.0, 0.5, 1.0, 7.0] {
        for r in [-10.0, 0.0, 3.0] {
            assert!(Tracker1D::<f64>::new(DynamicsParams::fzr(0.01, z, r), Scalar(0.0)).is_ok());
        }
    }
}

#[test]
fn supplied_velocity_replaces_estimate() {
    let params = DynamicsParams::fzr(2.0, 0.5, 2.0);
    let mut estimated = Tracker1D::<f64>::new(params, Scalar(0.0)).unwrap();
    let mut supplied = Tracker1D::<f64>::new(params, Scalar(0.0)).unwrap();

    estimated.update(1.0 / 60.0, Scalar(1.0));
    supplied.update_with_velocity(1.0 / 60.0, Scalar(1.0), TargetVelocity::Supplied(Scalar(0.0)));
    assert!(estimated.velocity().0 > supplied.velocity().0);
}

#[test]
fn tracker_3d_converges_per_axis() {
    let mut tracker: Tracker3D<f64> =
        SecondOrderTracker::new(DynamicsParams::fzr(3.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 0.0)).unwrap();
    let target = Vec3::new(5.0, -2.0, 3.0);
    for _ in 0..600 {
        tracker.update(1.0 / 60.0, target);
    }
    let p = tracker.position();
    assert!((p.x - 5.0).abs() < 1e-3);
    assert!((p.y + 2.0).abs() < 1e-3);
    assert!((p.z - 3.0).abs() < 1e-3);
}

#[test]
fn f32_tracker_converges() {
    let mut tracker: Tracker1D<f32> =
        SecondOrderTracker::new(DynamicsParams::fzr(2.0, 0.6, 0.5), Scalar(10.0)).unwrap();
    for _ in 0..1000 {
        tracker.update(1.0 / 60.0, Scalar(-4.0));
    }
    assert!((tracker.position().0 + 4.0).abs() < 1e-3);
}

#[test]
fn jittery_frame_times_stay_bounded() {
    let mut tracker = step_tracker(5.0, 0.2, 1.0);
    let frames = [1.0 / 60.0, 1.0 / 30.0, 1.0 / 120.0, 1.0 / 45.0, 0.0, 1.0 / 90.0];
    for i in 0..400 {
        let target = if (i / 50) % 2 == 0 { 1.0 } else { -1.0 };
        let y = tracker.update(frames[i % frames.len()], Scalar(target)).0;
        assert!(y.is_finite() && y.abs() < 3.0, "frame {i}: {y}");
    }
}

#[test]
fn single_hitch_at_rest_recovers() {
    let mut tracker = step_tracker(5.0, 0.2, 1.0);
    for _ in 0..60 {
        tracker.update(1.0 / 60.0, Scalar(1.0));
    }
    tracker.update(2.0, Scalar(1.0));
    for _ in 0..120 {
        let y = tracker.update(1.0 / 60.0, Scalar(1.0)).0;
        assert!(y.abs() < 2.0);
    }
    assert!((tracker.position().0 - 1.0).abs() < 1e-3);
}
