use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollfx::Dom as _;

#[derive(Parser, Debug)]
#[command(name = "scrollfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the effect registrations a page declares.
    Scan(ScanArgs),
    /// Drive a page through a scroll range and dump the style timeline.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct ScanArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// First scroll offset sampled.
    #[arg(long, default_value_t = 0.0)]
    from: f64,

    /// Last scroll offset sampled.
    #[arg(long)]
    to: f64,

    /// Distance between samples.
    #[arg(long, default_value_t = 50.0)]
    step: f64,

    /// Timeline JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Inline styles of one tracked element at one scroll offset.
#[derive(Debug, serde::Serialize)]
struct ElementState {
    opacity: Option<f64>,
    scale: Option<f64>,
    position: scrollfx::Position,
    z_index: Option<i32>,
    pinned: bool,
    has_spacer: bool,
}

#[derive(Debug, serde::Serialize)]
struct TimelineEntry {
    scroll_y: f64,
    elements: BTreeMap<String, ElementState>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Scan(args) => cmd_scan(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn read_page_json(path: &Path) -> anyhow::Result<scrollfx::Page> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("open page '{}'", path.display()))?;
    let page = scrollfx::Page::from_json_str(&json)
        .with_context(|| format!("parse page '{}'", path.display()))?;
    Ok(page)
}

/// Marked elements in document order, first marker wins for duplicates.
fn tracked_elements(page: &scrollfx::Page) -> Vec<(String, scrollfx::ElementId)> {
    let mut tracked: Vec<(String, scrollfx::ElementId)> = Vec::new();
    for kind in scrollfx::EffectKind::ALL {
        for element in page.elements_with_class(kind.marker_class()) {
            if tracked.iter().any(|(_, el)| *el == element) {
                continue;
            }
            let Some(name) = page.name(element) else {
                continue;
            };
            tracked.push((name.to_string(), element));
        }
    }
    tracked
}

fn cmd_scan(args: ScanArgs) -> anyhow::Result<()> {
    let page = read_page_json(&args.in_path)?;

    for kind in scrollfx::EffectKind::ALL {
        for element in page.elements_with_class(kind.marker_class()) {
            let options = match kind {
                scrollfx::EffectKind::Sticky => scrollfx::EffectOptions::Sticky(
                    scrollfx::StickyOptions::from_attrs(&page, element),
                ),
                scrollfx::EffectKind::Fade => scrollfx::EffectOptions::Fade(
                    scrollfx::FadeOptions::from_attrs(&page, element),
                ),
                scrollfx::EffectKind::Scale => scrollfx::EffectOptions::Scale(
                    scrollfx::ScaleOptions::from_attrs(&page, element),
                ),
            };
            let name = page.name(element).unwrap_or("?");
            println!(
                "{}",
                serde_json::json!({ "element": name, "options": options })
            );
        }
    }
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    if !(args.step > 0.0) {
        anyhow::bail!("--step must be > 0");
    }
    if args.to < args.from {
        anyhow::bail!("--to must be >= --from");
    }

    let mut page = read_page_json(&args.in_path)?;
    let tracked = tracked_elements(&page);

    let mut scheduler = scrollfx::ManualScheduler::new();
    let mut fx = scrollfx::ScrollEffects::new();
    fx.scan(&mut page);
    fx.start(&mut scheduler);
    settle(&mut fx, &mut page, &mut scheduler);

    let mut timeline = Vec::new();
    let mut scroll = args.from;
    loop {
        page.set_scroll(scroll);
        fx.on_scroll(&page, &mut scheduler);
        settle(&mut fx, &mut page, &mut scheduler);
        timeline.push(snapshot(&page, &tracked));

        if scroll >= args.to {
            break;
        }
        scroll = (scroll + args.step).min(args.to);
    }

    let json = serde_json::to_string_pretty(&timeline).context("serialize timeline")?;
    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(out, json)
                .with_context(|| format!("write timeline '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn settle(
    fx: &mut scrollfx::ScrollEffects,
    page: &mut scrollfx::Page,
    scheduler: &mut scrollfx::ManualScheduler,
) {
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

fn snapshot(page: &scrollfx::Page, tracked: &[(String, scrollfx::ElementId)]) -> TimelineEntry {
    let mut elements = BTreeMap::new();
    for (name, element) in tracked {
        let Some(style) = page.inline_style(*element) else {
            continue;
        };
        let has_spacer = page
            .prev_sibling(*element)
            .is_some_and(|s| page.is_spacer(s));

        elements.insert(
            name.clone(),
            ElementState {
                opacity: style.opacity,
                scale: match style.transform {
                    scrollfx::Transform::Scale(s) => Some(s),
                    scrollfx::Transform::None | scrollfx::Transform::AccelHint => None,
                },
                position: style.position,
                z_index: style.z_index,
                pinned: style.position == scrollfx::Position::Fixed,
                has_spacer,
            },
        );
    }
    TimelineEntry {
        scroll_y: page.scroll_y(),
        elements,
    }
}
