use scrollfx::{ManualScheduler, Page, ScrollEffects};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut page = Page::from_json_str(include_str!("page.json"))?;
    let mut scheduler = ManualScheduler::new();
    let mut fx = ScrollEffects::new();

    fx.scan(&mut page);
    fx.start(&mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);

    let Some(nav) = page.element("site-nav") else {
        anyhow::bail!("page has no site-nav");
    };
    let Some(masthead) = page.element("masthead") else {
        anyhow::bail!("page has no masthead");
    };
    let Some(card) = page.element("gallery-card") else {
        anyhow::bail!("page has no gallery-card");
    };

    for y in [0.0, 400.0, 700.0, 1100.0, 1500.0, 1900.0] {
        page.set_scroll(y);
        fx.on_scroll(&page, &mut scheduler);
        settle(&mut fx, &mut page, &mut scheduler);

        let nav_pos = page.inline_style(nav).map(|s| s.position);
        let opacity = page.inline_style(masthead).and_then(|s| s.opacity);
        let transform = page.inline_style(card).map(|s| s.transform);
        println!("scroll {y}: nav {nav_pos:?}, masthead opacity {opacity:?}, card {transform:?}");
    }

    Ok(())
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
