use scrollfx::{
    Effect, EffectKind, EffectOptions, FadeEffect, FadeOptions, ManualScheduler, NodeSpec, Page,
    PageSpec, Position, ScrollEffects, Transform, ValuesOutcome, ViewportSpec,
};

fn demo_page() -> Page {
    Page::from_spec(&PageSpec {
        viewport: ViewportSpec { height: 800.0 },
        body: vec![
            NodeSpec::new("lead", 500.0),
            NodeSpec::new("pin", 100.0)
                .with_class("fr-scroll-effect-sticky")
                .with_data("fr-scroll-effect-zindex", "5")
                .with_data("fr-scroll-effect-extra", "2"),
            NodeSpec::new("hero", 100.0)
                .with_class("fr-scroll-effect-fade")
                .with_data("fr-scroll-effect-to", "0"),
            NodeSpec::new("card", 100.0)
                .with_class("fr-scroll-effect-scale")
                .with_data("fr-scroll-effect-scale", "2"),
            NodeSpec::new("tail", 2000.0),
        ],
    })
    .unwrap()
}

fn settle(fx: &mut ScrollEffects, page: &mut Page, scheduler: &mut ManualScheduler) {
    loop {
        let handles = scheduler.drain();
        if handles.is_empty() {
            return;
        }
        for handle in handles {
            fx.on_frame(page, scheduler, handle);
        }
    }
}

#[test]
fn initial_frame_applies_styles_at_the_load_scroll() {
    let mut page = demo_page();
    let mut scheduler = ManualScheduler::new();
    let mut fx = ScrollEffects::new();

    // the page can come up already scrolled into an activation window
    page.set_scroll(550.0);
    fx.scan(&mut page);
    fx.start(&mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);

    let pin = page.element("pin").unwrap();
    assert_eq!(page.inline_style(pin).unwrap().position, Position::Fixed);
    assert_eq!(page.inline_style(pin).unwrap().z_index, Some(5));
}

#[test]
fn values_pass_defers_until_geometry_is_measured() {
    let mut page = demo_page();
    let hero = page.element("hero").unwrap();
    let mut events = Vec::new();

    let mut fade = FadeEffect::new();
    fade.register(&mut page, hero, FadeOptions::default(), true);
    fade.start();

    page.set_scroll(550.0);
    let writes_before = page.style_write_count();
    assert_eq!(
        fade.compute_values(&mut page, &mut events),
        ValuesOutcome::NeedsGeometry
    );
    assert_eq!(page.style_write_count(), writes_before);
    assert_eq!(page.inline_style(hero).unwrap().opacity, None);
}

#[test]
fn re_register_swaps_parameters_in_place() {
    let mut page = demo_page();
    let hero = page.element("hero").unwrap();
    let mut scheduler = ManualScheduler::new();
    let mut fx = ScrollEffects::new();

    fx.scan(&mut page);
    fx.start(&mut scheduler);
    page.set_scroll(650.0);
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);

    // hero sits at 600: halfway through its window, fading towards 0
    assert_eq!(page.inline_style(hero).unwrap().opacity, Some(0.5));
    let count = fx.item_count();

    // same element, new target; non-silent so it re-applies synchronously
    fx.register_element(
        &mut page,
        hero,
        EffectOptions::Fade(FadeOptions {
            to: 0.5,
            ..FadeOptions::default()
        }),
        false,
    );

    assert_eq!(fx.item_count(), count);
    assert_eq!(page.inline_style(hero).unwrap().opacity, Some(0.75));
}

#[test]
fn unregister_restores_the_stylesheet_state() {
    let mut page = demo_page();
    let hero = page.element("hero").unwrap();
    let mut scheduler = ManualScheduler::new();
    let mut fx = ScrollEffects::new();

    fx.scan(&mut page);
    fx.start(&mut scheduler);
    page.set_scroll(650.0);
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);
    assert_eq!(page.inline_style(hero).unwrap().opacity, Some(0.5));

    let removed = fx.unregister_element(&mut page, hero, Some(EffectKind::Fade), false);

    assert!(removed);
    assert!(!fx.is_registered(hero));
    let style = page.inline_style(hero).unwrap();
    assert_eq!(style.opacity, None);
    assert_eq!(style.transform, Transform::None);

    // a second attempt has nothing left to remove
    assert!(!fx.unregister_element(&mut page, hero, None, false));
}

#[test]
fn stop_restores_styles_and_start_resumes() {
    let mut page = demo_page();
    let pin = page.element("pin").unwrap();
    let hero = page.element("hero").unwrap();
    let card = page.element("card").unwrap();
    let mut scheduler = ManualScheduler::new();
    let mut fx = ScrollEffects::new();

    fx.scan(&mut page);
    fx.start(&mut scheduler);
    page.set_scroll(650.0);
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);

    assert_eq!(page.inline_style(pin).unwrap().position, Position::Fixed);
    assert_eq!(page.inline_style(hero).unwrap().opacity, Some(0.5));

    // further down the card is mid-scale while the pin still holds
    page.set_scroll(750.0);
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);
    assert_eq!(page.inline_style(pin).unwrap().position, Position::Fixed);
    assert_eq!(
        page.inline_style(card).unwrap().transform,
        Transform::Scale(1.5)
    );

    fx.stop(&mut page, &mut scheduler);

    let pin_style = page.inline_style(pin).unwrap();
    assert_eq!(pin_style.position, Position::Static);
    assert_eq!(pin_style.z_index, None);
    assert_eq!(page.inline_style(hero).unwrap().opacity, None);
    // the compositing hint survives; only unregistering clears it
    assert_eq!(page.inline_style(card).unwrap().transform, Transform::AccelHint);
    assert_eq!(fx.item_count(), 3);

    // scrolls while stopped schedule nothing
    page.set_scroll(550.0);
    fx.on_scroll(&page, &mut scheduler);
    assert_eq!(scheduler.pending(), 0);

    fx.start(&mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);
    assert_eq!(page.inline_style(pin).unwrap().position, Position::Fixed);
    assert_eq!(page.inline_style(hero).unwrap().opacity, None); // window not reached at 550
}

#[test]
fn viewport_resize_recomputes_bottom_anchored_windows() {
    let mut page = Page::from_spec(&PageSpec {
        viewport: ViewportSpec { height: 800.0 },
        body: vec![
            NodeSpec::new("lead", 1000.0),
            NodeSpec::new("hero", 100.0)
                .with_class("fr-scroll-effect-fade")
                .with_data("fr-scroll-effect-at", "bottom")
                .with_data("fr-scroll-effect-to", "0"),
            NodeSpec::new("tail", 2000.0),
        ],
    })
    .unwrap();
    let hero = page.element("hero").unwrap();
    let mut scheduler = ManualScheduler::new();
    let mut fx = ScrollEffects::new();

    fx.scan(&mut page);
    fx.start(&mut scheduler);
    page.set_scroll(250.0);
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);

    // pos = 750, window bottom edge at 800: halfway in
    assert_eq!(page.inline_style(hero).unwrap().opacity, Some(0.5));

    // a shorter viewport pushes the window further down the page
    page.set_viewport_height(700.0);
    fx.on_resize(&mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);

    assert_eq!(page.inline_style(hero).unwrap().opacity, None);
}

#[test]
fn demo_page_replays_deterministically() {
    let sweep = |offsets: &[f64]| -> Vec<(f64, Vec<scrollfx::InlineStyle>)> {
        let mut page = Page::from_json_str(include_str!("../demos/page.json")).unwrap();
        let tracked: Vec<_> = ["masthead", "site-nav", "gallery-card", "quote-band"]
            .iter()
            .map(|name| page.element(name).unwrap())
            .collect();
        let mut scheduler = ManualScheduler::new();
        let mut fx = ScrollEffects::new();
        fx.scan(&mut page);
        fx.start(&mut scheduler);
        settle(&mut fx, &mut page, &mut scheduler);

        let mut timeline = Vec::new();
        for &offset in offsets {
            page.set_scroll(offset);
            fx.on_scroll(&page, &mut scheduler);
            settle(&mut fx, &mut page, &mut scheduler);
            let styles = tracked
                .iter()
                .map(|&el| *page.inline_style(el).unwrap())
                .collect();
            timeline.push((page.scroll_y(), styles));
        }
        timeline
    };

    let offsets = [0.0, 380.0, 700.0, 1100.0, 1500.0, 1900.0, 2200.0];
    assert_eq!(sweep(&offsets), sweep(&offsets));
}

#[test]
fn unchanged_values_are_not_rewritten() {
    let mut page = demo_page();
    let mut scheduler = ManualScheduler::new();
    let mut fx = ScrollEffects::new();

    fx.scan(&mut page);
    fx.start(&mut scheduler);
    page.set_scroll(650.0);
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);

    // same offset again: every interpolated value comes out identical
    let writes_before = page.style_write_count();
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);
    assert_eq!(page.style_write_count(), writes_before);
}
