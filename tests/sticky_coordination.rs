use scrollfx::{
    EffectKind, ManualScheduler, NodeSpec, Page, PageSpec, Position, ScrollEffects, Transform,
    ViewportSpec,
};

/// One element carrying both a sticky and a fade registration.
fn pinned_fade_page() -> Page {
    Page::from_spec(&PageSpec {
        viewport: ViewportSpec { height: 800.0 },
        body: vec![
            NodeSpec::new("lead", 500.0),
            NodeSpec::new("bar", 100.0)
                .with_class("fr-scroll-effect-sticky")
                .with_class("fr-scroll-effect-fade")
                .with_data("fr-scroll-effect-to", "0"),
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
fn fade_re_anchors_to_the_spacer_while_pinned() {
    let mut page = pinned_fade_page();
    let bar = page.element("bar").unwrap();
    let mut scheduler = ManualScheduler::new();
    let mut fx = ScrollEffects::new();

    fx.scan(&mut page);
    assert_eq!(fx.item_count(), 2);
    fx.start(&mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);

    page.set_scroll(520.0);
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);
    assert_eq!(page.inline_style(bar).unwrap().position, Position::Fixed);
    assert_eq!(page.inline_style(bar).unwrap().opacity, Some(0.8));

    // the element is fixed at the viewport top now; only the spacer still
    // knows the flow position the fade interpolates against
    page.set_scroll(550.0);
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);
    assert_eq!(page.inline_style(bar).unwrap().opacity, Some(0.5));

    page.set_scroll(620.0);
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);

    let style = page.inline_style(bar).unwrap();
    assert_eq!(style.position, Position::Static);
    assert_eq!(style.opacity, None);
    assert_eq!(page.children(Page::BODY).len(), 3);
}

#[test]
fn resize_while_pinned_measures_through_the_spacer() {
    let mut page = pinned_fade_page();
    let bar = page.element("bar").unwrap();
    let lead = page.element("lead").unwrap();
    let mut scheduler = ManualScheduler::new();
    let mut fx = ScrollEffects::new();

    fx.scan(&mut page);
    fx.start(&mut scheduler);
    page.set_scroll(500.0);
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);
    assert_eq!(page.inline_style(bar).unwrap().position, Position::Fixed);
    assert_eq!(page.inline_style(bar).unwrap().opacity, Some(1.0));

    // content above shrinks while the element is out of flow
    page.set_natural_height(lead, 450.0);
    fx.on_resize(&mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);

    assert_eq!(page.inline_style(bar).unwrap().position, Position::Fixed);
    assert_eq!(page.inline_style(bar).unwrap().opacity, Some(0.5));
}

#[test]
fn restart_repins_without_duplicating_the_spacer() {
    let mut page = pinned_fade_page();
    let bar = page.element("bar").unwrap();
    let mut scheduler = ManualScheduler::new();
    let mut fx = ScrollEffects::new();

    fx.scan(&mut page);
    fx.start(&mut scheduler);
    page.set_scroll(550.0);
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);
    assert_eq!(page.children(Page::BODY).len(), 4);

    fx.stop(&mut page, &mut scheduler);
    assert_eq!(page.children(Page::BODY).len(), 3);
    assert_eq!(fx.item_count(), 2);

    fx.start(&mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);

    assert_eq!(page.children(Page::BODY).len(), 4);
    assert_eq!(page.inline_style(bar).unwrap().position, Position::Fixed);
    assert_eq!(page.inline_style(bar).unwrap().opacity, Some(0.5));
}

#[test]
fn unregistering_sticky_hands_geometry_back_to_the_element() {
    let mut page = pinned_fade_page();
    let bar = page.element("bar").unwrap();
    let mut scheduler = ManualScheduler::new();
    let mut fx = ScrollEffects::new();

    fx.scan(&mut page);
    fx.start(&mut scheduler);
    page.set_scroll(550.0);
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);
    assert_eq!(page.inline_style(bar).unwrap().position, Position::Fixed);

    let removed = fx.unregister_element(&mut page, bar, Some(EffectKind::Sticky), false);
    assert!(removed);

    // the fade keeps running against the element's own flow position
    assert!(fx.is_registered(bar));
    assert_eq!(fx.item_count(), 1);
    assert_eq!(page.inline_style(bar).unwrap().position, Position::Static);
    assert_eq!(page.inline_style(bar).unwrap().opacity, Some(0.5));

    page.set_scroll(620.0);
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);
    assert_eq!(page.inline_style(bar).unwrap().opacity, None);
}

#[test]
fn scale_follows_the_spacer_geometry_while_pinned() {
    let mut page = Page::from_spec(&PageSpec {
        viewport: ViewportSpec { height: 800.0 },
        body: vec![
            NodeSpec::new("lead", 500.0),
            NodeSpec::new("bar", 100.0)
                .with_class("fr-scroll-effect-sticky")
                .with_class("fr-scroll-effect-scale")
                .with_data("fr-scroll-effect-scale", "2"),
            NodeSpec::new("tail", 2000.0),
        ],
    })
    .unwrap();
    let bar = page.element("bar").unwrap();
    let mut scheduler = ManualScheduler::new();
    let mut fx = ScrollEffects::new();

    fx.scan(&mut page);
    fx.start(&mut scheduler);
    page.set_scroll(550.0);
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);

    let style = page.inline_style(bar).unwrap();
    assert_eq!(style.position, Position::Fixed);
    assert_eq!(style.transform, Transform::Scale(1.5));

    // past both windows: unpinned and back to the bare hint
    page.set_scroll(650.0);
    fx.on_scroll(&page, &mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);

    let style = page.inline_style(bar).unwrap();
    assert_eq!(style.position, Position::Static);
    assert_eq!(style.transform, Transform::AccelHint);
}
