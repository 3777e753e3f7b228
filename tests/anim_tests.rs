mod common;

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use common::{desktop_probe, mobile_probe, mount, test_config};
use hero_cube::anim::{AnimationClock, REDUCED_MOTION_ANGLE};
use hero_cube::renderer::FrameOutcome;
use hero_cube::utils::Size;

#[test]
fn first_tick_renders_from_rest() {
    let mut clock = AnimationClock::new(20_000.0, Some(30));
    assert!(clock.advance(1234.0));
    assert_eq!(clock.angle(), 0.0);
}

#[test]
fn thirty_fps_cap_renders_every_other_sixty_hz_tick() {
    let mut clock = AnimationClock::new(25_000.0, Some(30));
    let rendered = (0..10)
        .filter(|i| clock.advance(*i as f64 * 16.0))
        .count();
    assert!(rendered <= 5, "rendered {rendered} of 10 ticks");
    assert!(rendered >= 4);
}

#[test]
fn uncapped_clock_renders_every_tick() {
    let mut clock = AnimationClock::new(20_000.0, None);
    assert!((0..10).all(|i| clock.advance(i as f64 * 16.0)));
    assert!(clock.frame_interval_ms().is_none());
}

#[test]
fn rotation_follows_wall_clock_not_frame_count() {
    let mut clock = AnimationClock::new(20_000.0, Some(30));
    clock.advance(0.0);
    clock.advance(5_000.0);
    assert!((clock.angle() - FRAC_PI_2).abs() < 1e-4);

    // capped ticks still move the cube
    let mut skipped = AnimationClock::new(20_000.0, Some(30));
    skipped.advance(0.0);
    assert!(!skipped.advance(10.0));
    assert!(skipped.angle() > 0.0);
}

#[test]
fn angle_wraps_into_one_turn() {
    let mut clock = AnimationClock::new(1_000.0, None);
    clock.advance(0.0);
    clock.advance(2_250.0);
    let angle = clock.angle();
    assert!((0.0..TAU).contains(&angle));
    assert!((angle - FRAC_PI_2).abs() < 1e-3);
}

#[test]
fn time_going_backwards_is_ignored() {
    let mut clock = AnimationClock::new(20_000.0, None);
    clock.advance(1_000.0);
    clock.advance(500.0);
    assert_eq!(clock.angle(), 0.0);
}

#[test]
fn long_stall_does_not_burst() {
    let mut clock = AnimationClock::new(20_000.0, Some(30));
    clock.advance(0.0);
    assert!(clock.advance(1_010.0));
    // the leftover budget is less than one interval, so the next tick waits
    assert!(!clock.advance(1_011.0));
}

#[test]
fn frozen_clock_holds_the_rest_pose() {
    let mut clock = AnimationClock::frozen(None);
    for i in 0..5 {
        assert!(clock.advance(i as f64 * 100.0));
    }
    assert!(clock.is_frozen());
    assert_eq!(clock.angle(), REDUCED_MOTION_ANGLE);
}

#[test]
fn mobile_tier_caps_renders_at_thirty_fps() {
    let mut m = mount(&mobile_probe(), &test_config(), Size::new(390.0, 844.0));
    let outcomes: Vec<_> = (0..10)
        .map(|i| m.hero.frame(i as f64 * 16.0).unwrap())
        .collect();

    let renders = m.log.borrow().renders;
    assert!(renders <= 5);
    assert_eq!(
        outcomes.iter().filter(|o| **o == FrameOutcome::Rendered).count(),
        renders
    );
    assert!(outcomes.contains(&FrameOutcome::Skipped));
}

#[test]
fn desktop_tier_renders_every_frame() {
    let mut m = mount(&desktop_probe(), &test_config(), Size::new(1440.0, 900.0));
    for i in 0..10 {
        m.hero.frame(i as f64 * 16.0).unwrap();
    }
    assert_eq!(m.log.borrow().renders, 10);
}

#[test]
fn desktop_turns_a_quarter_in_five_seconds() {
    let mut m = mount(&desktop_probe(), &test_config(), Size::new(1440.0, 900.0));
    m.hero.frame(0.0).unwrap();
    m.hero.frame(5_000.0).unwrap();
    assert!((m.hero.renderer().angle() - FRAC_PI_2).abs() < 1e-4);
}

#[test]
fn reduced_motion_freezes_the_cube() {
    let mut config = test_config();
    config.reduced_motion = true;
    let mut m = mount(&desktop_probe(), &config, Size::new(1440.0, 900.0));
    for i in 0..4 {
        m.hero.frame(i as f64 * 1_000.0).unwrap();
    }
    assert_eq!(m.hero.renderer().angle(), FRAC_PI_4);

    let probe = desktop_probe().with_reduced_motion(true);
    let mut m = mount(&probe, &test_config(), Size::new(1440.0, 900.0));
    m.hero.frame(0.0).unwrap();
    m.hero.frame(3_000.0).unwrap();
    assert_eq!(m.hero.renderer().angle(), FRAC_PI_4);
}
