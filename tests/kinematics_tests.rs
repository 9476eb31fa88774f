mod support;

use trochograph::{
    Chain, KinematicsError, Stage, compute_pen_and_centers,
    errors::{NonFinite, StageField},
    float_types::{FRAC_PI_2, PI, Real},
    pen_at,
};

fn single(radius: Real, pen_offset: Real, outside: bool, speed: Real, phase: Real) -> Chain {
    Chain::from(vec![
        Stage::new(radius, pen_offset, outside, speed).with_phase(phase),
    ])
}

#[test]
fn inside_stage_at_time_zero() {
    // pen sits at (R - r + d, 0) for a hypotrochoid with zero phase
    let (big_r, r, d) = (200.0, 60.0, 25.0);
    let chain = single(r, d, false, 3.7, 0.0);
    let pen = pen_at(big_r, &chain, 0.0).unwrap();
    assert!(support::approx_point(pen, big_r - r + d, 0.0, 1e-9));
}

#[test]
fn outside_stage_at_time_zero() {
    // outside pen offset points back toward the base: (R + r - d, 0)
    let chain = single(30.0, 10.0, true, 1.0, 0.0);
    let pen = pen_at(100.0, &chain, 0.0).unwrap();
    assert!(support::approx_point(pen, 120.0, 0.0, 1e-9));
}

#[test]
fn quarter_turn_center() {
    // alpha = omega * t reaches pi/2 at t = pi / (2 omega)
    let quarter = FRAC_PI_2 / 4.2;
    let chain = single(70.0, 90.0, false, 4.2, 0.0);
    let m = compute_pen_and_centers(220.0, &chain, quarter).unwrap();
    assert_eq!(m.centers.len(), 1);
    assert!(support::approx_point(m.centers[0], 0.0, 150.0, 1e-9));

    // the center does not depend on the pen offset
    let other = single(70.0, 5.0, false, 4.2, 0.0);
    let m2 = compute_pen_and_centers(220.0, &other, quarter).unwrap();
    assert!(support::approx_point(m2.centers[0], 0.0, 150.0, 1e-9));
    assert!(m.pen != m2.pen);
}

#[test]
fn half_turn_center() {
    let chain = single(70.0, 90.0, false, 4.2, 0.0);
    let m = compute_pen_and_centers(220.0, &chain, PI / 4.2).unwrap();
    assert!(support::approx_point(m.centers[0], -150.0, 0.0, 1e-9));
}

#[test]
fn inside_and_outside_offsets_mirror() {
    // beta = (kappa / r) * alpha; choose values where both branches are easy to check
    let alpha = FRAC_PI_2 / 2.0;
    let d = 10.0;

    let outside = single(50.0, d, true, 0.0, alpha);
    let m = compute_pen_and_centers(100.0, &outside, 0.0).unwrap();
    let beta = (150.0 / 50.0) * alpha;
    let c = m.centers[0];
    assert!(support::approx_point(
        m.pen,
        c.x - d * beta.cos(),
        c.y - d * beta.sin(),
        1e-9
    ));

    let inside = single(50.0, d, false, 0.0, alpha);
    let m = compute_pen_and_centers(100.0, &inside, 0.0).unwrap();
    let beta = (50.0 / 50.0) * alpha;
    let c = m.centers[0];
    assert!(support::approx_point(
        m.pen,
        c.x + d * beta.cos(),
        c.y - d * beta.sin(),
        1e-9
    ));
}

#[test]
fn inside_stage_larger_than_base_is_accepted() {
    // kappa = 40 - 100 < 0: the center orbits on the opposite side
    let chain = single(100.0, 0.0, false, 0.0, 0.0);
    let m = compute_pen_and_centers(40.0, &chain, 0.0).unwrap();
    assert!(support::approx_point(m.centers[0], -60.0, 0.0, 1e-9));
    assert!(m.pen.x.is_finite() && m.pen.y.is_finite());
}

#[test]
fn nested_stages_roll_on_previous_disc() {
    let chain = Chain::from(vec![
        Stage::new(40.0, 0.0, true, 1.0),
        Stage::new(10.0, 0.0, false, 2.0),
        Stage::new(4.0, 3.0, true, -3.0),
    ]);
    let t = 0.7;
    let m = compute_pen_and_centers(100.0, &chain, t).unwrap();
    let k = [140.0, 30.0, 14.0];
    let w = [1.0, 2.0, -3.0];
    let (mut x, mut y) = (0.0, 0.0);
    for i in 0..3 {
        x += k[i] * (w[i] * t).cos();
        y += k[i] * (w[i] * t).sin();
        assert!(support::approx_point(m.centers[i], x, y, 1e-9), "center {}", i);
    }
    let beta: Real = (14.0 / 4.0) * (-3.0 * t);
    assert!(support::approx_point(
        m.pen,
        x - 3.0 * beta.cos(),
        y - 3.0 * beta.sin(),
        1e-9
    ));
}

#[test]
fn pen_offset_on_earlier_stages_is_ignored() {
    let a = Chain::from(vec![
        Stage::new(40.0, 0.0, true, 1.0),
        Stage::new(10.0, 2.0, false, 2.0),
    ]);
    let b = Chain::from(vec![
        Stage::new(40.0, 999.0, true, 1.0),
        Stage::new(10.0, 2.0, false, 2.0),
    ]);
    assert_eq!(pen_at(100.0, &a, 1.3).unwrap(), pen_at(100.0, &b, 1.3).unwrap());
}

#[test]
fn deterministic() {
    let chain = Chain::nested_preset(200.0, 10, 3.0, -4.0);
    for &t in &[0.0, 0.25, -3.5, 1234.5] {
        let a = compute_pen_and_centers(200.0, &chain, t).unwrap();
        let b = compute_pen_and_centers(200.0, &chain, t).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.pen, pen_at(200.0, &chain, t).unwrap());
    }
}

#[test]
fn reversing_speed_keeps_time_zero() {
    let mut chain = Chain::from(vec![
        Stage::new(50.0, 0.0, true, 2.5).with_phase(0.3),
        Stage::new(12.0, 6.0, false, -7.0).with_phase(-1.1),
    ]);
    let before = pen_at(150.0, &chain, 0.0).unwrap();
    let later = pen_at(150.0, &chain, 0.2).unwrap();
    chain.stage_mut(1).unwrap().flip_direction();
    assert_eq!(pen_at(150.0, &chain, 0.0).unwrap(), before);
    assert!(pen_at(150.0, &chain, 0.2).unwrap() != later);
}

#[test]
fn negative_time_is_valid() {
    let chain = single(30.0, 10.0, false, 2.0, 0.0);
    let p = pen_at(100.0, &chain, -5.0).unwrap();
    assert!(p.x.is_finite() && p.y.is_finite());
}

#[test]
fn empty_chain_sits_at_base_center() {
    let m = compute_pen_and_centers(200.0, &Chain::new(), 3.0).unwrap();
    assert!(m.centers.is_empty());
    assert_eq!(m.pen.x, 0.0);
    assert_eq!(m.pen.y, 0.0);
}

#[test]
fn zero_radius_is_degenerate() {
    let chain = single(0.0, 10.0, false, 1.0, 0.0);
    let err = compute_pen_and_centers(100.0, &chain, 1.0).unwrap_err();
    assert_eq!(
        err,
        KinematicsError::DegenerateStage {
            index: 0,
            radius: 0.0
        }
    );
    assert!(!err.is_non_finite());
}

#[test]
fn degenerate_stage_reports_its_index() {
    let chain = Chain::from(vec![
        Stage::new(40.0, 0.0, true, 1.0),
        Stage::new(-2.0, 0.0, true, 1.0),
    ]);
    match pen_at(100.0, &chain, 0.0) {
        Err(KinematicsError::DegenerateStage { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected degenerate stage, got {:?}", other),
    }
}

#[test]
fn non_finite_inputs_are_rejected() {
    let chain = single(30.0, 10.0, false, 1.0, 0.0);
    assert_eq!(
        pen_at(100.0, &chain, Real::NAN).unwrap_err(),
        KinematicsError::NonFiniteInput(NonFinite::Time)
    );
    assert_eq!(
        pen_at(Real::INFINITY, &chain, 0.0).unwrap_err(),
        KinematicsError::NonFiniteInput(NonFinite::BaseRadius)
    );

    let bad = single(30.0, 10.0, false, Real::NAN, 0.0);
    let err = pen_at(100.0, &bad, 0.0).unwrap_err();
    assert_eq!(
        err,
        KinematicsError::NonFiniteInput(NonFinite::Stage {
            index: 0,
            field: StageField::AngularVelocity
        })
    );
    assert!(err.is_non_finite());
}

#[test]
fn preset_matches_classic_mechanism() {
    let chain = Chain::nested_preset(200.0, 10, 3.0, -4.0);
    assert_eq!(chain.len(), 10);
    let first = chain.stage(0).unwrap();
    assert!(support::approx_eq(first.radius, 200.0 / 3.0, 1e-9));
    assert_eq!(first.angular_velocity, 1.0);
    assert_eq!(chain.stage(1).unwrap().angular_velocity, -4.0);
    assert_eq!(chain.stage(9).unwrap().angular_velocity, (-4.0 as Real).powi(9));
    assert!(chain.iter().all(|s| s.rolls_outside));
    assert!(chain.iter().all(|s| support::approx_eq(s.phase, -FRAC_PI_2, 1e-12)));
    let last = chain.last().unwrap();
    assert!(support::approx_eq(last.pen_offset, last.radius * 0.75, 1e-12));
    assert!(chain.validate().is_ok());
}
