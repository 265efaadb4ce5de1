// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios against the simulated page.

use alloc::vec::Vec;

use kurbo::{Rect, Size};
use unveil_core::config::{GroupOptions, RevealConfig};
use unveil_core::element::{RevealGroup, RevealState};
use unveil_core::host::HostSignals;
use unveil_core::scheduler::{Activation, Event};
use unveil_core::time::{Duration, HostTime};

use crate::{Harness, SimTree};

const VIEWPORT: Size = Size::new(1280.0, 800.0);

fn page() -> SimTree {
    SimTree::new(VIEWPORT)
}

fn harness(tree: SimTree) -> Harness {
    Harness::new(RevealConfig::web(), HostSignals::CAPABLE, tree)
}

fn containers(h: &mut Harness) {
    h.register(&[".about__container"], RevealGroup::Container, GroupOptions::top_level());
}

#[test]
fn five_visible_containers_reveal_in_two_frames() {
    let mut tree = page();
    let ids = tree.add_column(&[".about__container"], 0.0, 100.0, 10.0, 5);
    let mut h = harness(tree);
    containers(&mut h);

    h.advance_ms(200);

    let frames = h.frames();
    assert_eq!(frames.len(), 2, "3 + 2");
    assert_eq!(frames[0].revealed, ids[..3]);
    assert_eq!(frames[1].revealed, ids[3..]);
    assert!(frames[0].now < frames[1].now, "separate frame callbacks");
    assert!(
        frames[1].now.saturating_duration_since(frames[0].now) >= Duration::from_millis(20),
        "batch gap respected"
    );
    assert!(ids.iter().all(|&id| h.host().is_revealed(id)));
}

#[test]
fn in_batch_reveals_are_staggered() {
    let mut tree = page();
    let ids = tree.add_column(&[".about__container"], 0.0, 100.0, 10.0, 3);
    let mut h = harness(tree);
    containers(&mut h);
    h.advance_ms(100);
    let delays: Vec<_> = ids
        .iter()
        .filter_map(|&id| h.host().view(id).map(|v| v.reveal_delay))
        .collect();
    assert_eq!(
        delays,
        [
            Duration::ZERO,
            Duration::from_millis(20),
            Duration::from_millis(40)
        ]
    );
}

#[test]
fn reduced_motion_reveals_nothing_ever() {
    let mut tree = page();
    let ids = tree.add_column(&[".about__container"], 0.0, 300.0, 20.0, 6);
    let signals = HostSignals {
        reduced_motion: true,
        viewport_watching: true,
    };
    let mut h = Harness::new(RevealConfig::web(), signals, tree);
    containers(&mut h);
    h.start();
    for step in 0..20 {
        h.scroll_to(f64::from(step) * 60.0);
        h.advance_ms(50);
    }
    h.advance_ms(1_000);
    assert_eq!(h.scheduler().activation(), Activation::ReducedMotion);
    assert_eq!(h.host().revealed_count(), 0);
    assert!(
        ids.iter().all(|&id| h.host().view(id).is_none()),
        "content stays in its static, visible state"
    );
}

#[test]
fn missing_viewport_watching_reveals_nothing() {
    let mut tree = page();
    let _ = tree.add_column(&[".about__container"], 0.0, 100.0, 10.0, 2);
    let signals = HostSignals {
        reduced_motion: false,
        viewport_watching: false,
    };
    let mut h = Harness::new(RevealConfig::web(), signals, tree);
    containers(&mut h);
    h.start();
    h.advance_ms(500);
    assert_eq!(h.host().revealed_count(), 0);
}

#[test]
fn scroll_before_drain_waits_for_quiet_period() {
    let mut tree = page();
    let id = tree.add(&[".about__title"], None, Rect::new(0.0, 100.0, 600.0, 160.0));
    let mut h = harness(tree);
    h.register(&[".about__title"], RevealGroup::Title, GroupOptions::nested());

    h.advance_ms(20);
    assert_eq!(h.scheduler().state(id), Some(RevealState::Queued), "seen at first vsync");

    h.scroll_to(5.0);
    h.advance_ms(130);
    assert!(!h.host().is_revealed(id), "no reveal while scrolling");
    assert!(h.scheduler().is_deferred());
    assert_eq!(h.scheduler().queue_len(), 1, "deferral never drops elements");

    h.advance_ms(100);
    let revealed_at = h.host().view(id).and_then(|v| v.revealed_at);
    assert!(
        revealed_at.is_some_and(|t| t >= HostTime(170_000)),
        "revealed after the 150 ms quiet period: {revealed_at:?}"
    );
}

#[test]
fn continuous_scrolling_defers_every_reveal() {
    let mut tree = page();
    let ids = tree.add_column(&[".services__row"], 1_000.0, 100.0, 10.0, 6);
    let mut h = harness(tree);
    h.register(&[".services__row"], RevealGroup::Content, GroupOptions::nested());

    let mut offset = 0.0;
    let mut last_scroll = h.now();
    while offset < 1_000.0 {
        offset += 50.0;
        last_scroll = h.now();
        h.scroll_to(offset);
        h.advance_ms(20);
    }
    assert_eq!(h.host().revealed_count(), 0, "still scrolling");
    let queued = h.scheduler().queue_len();
    assert!(queued > 0, "elements were detected while scrolling");

    h.advance_ms(400);
    assert_eq!(h.host().revealed_count(), queued);
    assert!(h.frames().iter().all(|f| f.revealed.len() <= 3), "batch cap");
    let first = h.frames().first().map(|f| f.now);
    assert!(
        first.is_some_and(|t| t >= last_scroll + Duration::from_millis(150)),
        "first reveal waited for the quiet period: {first:?}"
    );
    assert!(ids.iter().any(|&id| h.host().is_revealed(id)));
}

#[test]
fn below_the_margin_waits_until_scrolled_into_view() {
    let mut tree = page();
    let id = tree.add(&[".contact__form-wrapper"], None, Rect::new(0.0, 700.0, 600.0, 780.0));
    let mut h = harness(tree);
    h.register(&[".contact__form-wrapper"], RevealGroup::Content, GroupOptions::nested());

    h.advance_ms(500);
    assert_eq!(
        h.scheduler().state(id),
        Some(RevealState::Pending),
        "inside the viewport but below the -20% margin"
    );

    h.scroll_to(200.0);
    h.advance_ms(400);
    assert!(h.host().is_revealed(id));
}

#[test]
fn nested_content_is_not_double_animated() {
    let mut tree = page();
    let container = tree.add(&[".about__container"], None, Rect::new(0.0, 0.0, 1280.0, 500.0));
    let content = tree.add(&[".about__content"], Some(container), Rect::new(0.0, 50.0, 600.0, 400.0));
    let loose = tree.add(&[".about__content"], None, Rect::new(0.0, 900.0, 600.0, 1000.0));
    let mut h = harness(tree);
    containers(&mut h);
    h.register(&[".about__content"], RevealGroup::Content, GroupOptions::nested());

    assert_eq!(h.scheduler().state(content), None, "inside a registered container");
    assert_eq!(h.scheduler().state(loose), Some(RevealState::Pending));
}

#[test]
fn stagger_delays_follow_match_order() {
    let mut tree = page();
    let cards = tree.add_column(&[".item-services"], 2_000.0, 300.0, 20.0, 3);
    let mut h = harness(tree);
    h.register(
        &[".item-services"],
        RevealGroup::ScaleItem,
        GroupOptions::top_level().with_stagger(Duration::from_millis(200)),
    );
    let delays: Vec<_> = cards
        .iter()
        .map(|&id| h.host().view(id).and_then(|v| v.stagger_delay))
        .collect();
    assert_eq!(
        delays,
        [
            Some(Duration::ZERO),
            Some(Duration::from_millis(200)),
            Some(Duration::from_millis(400))
        ]
    );
}

#[test]
fn initial_check_catches_elements_the_watcher_missed() {
    let mut tree = page();
    let above = tree.add(&[".outro__title"], None, Rect::new(0.0, 50.0, 600.0, 120.0));
    let below = tree.add(&[".outro__title"], None, Rect::new(0.0, 1_200.0, 600.0, 1_300.0));
    let mut h = harness(tree);
    h.disable_watcher();
    h.register(&[".outro__title"], RevealGroup::Title, GroupOptions::nested());
    h.start();

    h.advance_ms(150);
    assert_eq!(h.host().revealed_count(), 0, "check runs at 200 ms");
    h.advance_ms(150);
    assert!(h.host().is_revealed(above));
    assert!(!h.host().is_revealed(below), "outside the viewport");
}

#[test]
fn initial_check_without_geometry_is_a_no_op() {
    let mut tree = page();
    let id = tree.add(&[".outro__title"], None, Rect::new(0.0, 50.0, 600.0, 120.0));
    tree.set_geometry_available(false);
    let mut h = harness(tree);
    h.register(&[".outro__title"], RevealGroup::Title, GroupOptions::nested());
    h.start();
    h.advance_ms(500);
    assert_eq!(h.scheduler().state(id), Some(RevealState::Pending));
}

#[test]
fn redelivered_visibility_after_reveal_is_ignored() {
    let mut tree = page();
    let id = tree.add(&[".about__title"], None, Rect::new(0.0, 0.0, 600.0, 80.0));
    let mut h = harness(tree);
    h.register(&[".about__title"], RevealGroup::Title, GroupOptions::nested());
    h.advance_ms(100);
    assert!(h.host().is_revealed(id));
    let requests = h.host().frame_requests();

    h.dispatch(Event::Visibility { id, visible: true });
    h.advance_ms(100);
    assert_eq!(h.host().revealed_count(), 1, "at most once");
    assert_eq!(h.host().frame_requests(), requests, "no new drain cycle");
}

#[test]
fn wheel_gestures_do_not_gate_draining() {
    let mut tree = page();
    let id = tree.add(&[".about__title"], None, Rect::new(0.0, 0.0, 600.0, 80.0));
    let mut h = harness(tree);
    h.register(&[".about__title"], RevealGroup::Title, GroupOptions::nested());
    h.wheel();
    h.advance_ms(60);
    assert!(h.scheduler().is_wheeling());
    assert!(h.host().is_revealed(id));
    h.advance_ms(200);
    assert!(!h.scheduler().is_wheeling(), "gesture ended after 200 ms");
}

#[test]
fn parallax_tracks_scroll_with_trailing_update() {
    let mut tree = page();
    let layers = tree.add_column(&[".main__container"], 0.0, 800.0, 0.0, 3);
    let mut h = harness(tree);
    assert_eq!(h.register_parallax(&[".main__container"]), 3);

    let y = |h: &Harness, i: usize| h.host().view(layers[i]).map_or(0.0, |v| v.translation.y);
    let close = |a: f64, b: f64| (a - b).abs() < 1e-9;

    h.scroll_to(100.0);
    assert!(close(y(&h, 0), 0.0) && close(y(&h, 1), 10.0) && close(y(&h, 2), 20.0));

    h.advance_ms(5);
    h.scroll_to(300.0);
    assert!(close(y(&h, 2), 20.0), "throttled");
    h.advance_ms(20);
    assert!(close(y(&h, 2), 60.0), "trailing update lands the final offset");
}

#[test]
fn teardown_mid_drain_stops_everything() {
    let mut tree = page();
    let visible = tree.add_column(&[".about__container"], 0.0, 100.0, 10.0, 5);
    let hidden = tree.add(&[".about__container"], None, Rect::new(0.0, 3_000.0, 1280.0, 3_100.0));
    let mut h = harness(tree);
    containers(&mut h);
    h.start();

    h.advance_ms(40);
    assert_eq!(h.host().revealed_count(), 3, "first batch done");
    assert!(!h.host().pending_timers().is_empty(), "batch gap armed");

    h.teardown();
    assert!(h.host().pending_timers().is_empty(), "timers cancelled");
    assert_eq!(h.host().observed().count(), 0, "nothing watched");
    let class = |id| h.host().view(id).and_then(|v| v.pending_class);
    assert_eq!(class(visible[0]), Some("scroll-animate"), "revealed keeps its class");
    assert_eq!(class(visible[4]), None, "queued element restored");
    assert_eq!(class(hidden), None, "pending element restored");

    h.scroll_to(2_500.0);
    h.advance_ms(1_000);
    assert_eq!(h.host().revealed_count(), 3);
    assert!(!h.host().is_revealed(visible[4]));
    assert!(!h.host().is_revealed(hidden));
    assert_eq!(h.scheduler().activation(), Activation::TornDown);
}

#[test]
fn reveal_happens_only_after_detection() {
    let mut tree = page();
    let ids = tree.add_column(&[".testimonial__item"], 5_000.0, 200.0, 10.0, 4);
    let mut h = harness(tree);
    h.register(&[".testimonial__item"], RevealGroup::Content, GroupOptions::nested());
    h.start();
    h.advance_ms(2_000);
    assert_eq!(h.host().revealed_count(), 0, "never visible, never revealed");
    assert!(ids.iter().all(|&id| h.scheduler().state(id) == Some(RevealState::Pending)));
}
