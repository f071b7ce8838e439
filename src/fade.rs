use crate::{
    core::{AnchorEdge, ElementId, Viewport},
    dom::{Dom, Transform},
    effect::{Effect, EffectKind, SpacerChange, ValuesOutcome},
    options::FadeOptions,
};

#[derive(Clone, Debug)]
struct FadeItem {
    element: ElementId,
    spacer: Option<ElementId>, // geometry target while the element is pinned
    anchor: AnchorEdge,
    from: f64, // computed opacity at registration
    to: f64,
    duration: f64,
    initial_top: f64, // document-absolute, valid while geometry is cached
    height: f64,
    cached_value: Option<f64>, // last written opacity, None = cleared
}

/// Fades elements between their stylesheet opacity and a target while they
/// cross the anchored viewport edge.
#[derive(Debug, Default)]
pub struct FadeEffect {
    items: Vec<FadeItem>,
    running: bool,
    geometry_cached: bool,
}

impl FadeEffect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        dom: &mut dyn Dom,
        element: ElementId,
        options: FadeOptions,
        silent: bool,
    ) {
        let existing = self.items.iter().position(|i| i.element == element);
        if let Some(idx) = existing {
            // clear our own inline opacity so `from` reads the stylesheet value
            Self::clean_item(dom, &mut self.items[idx]);
        }

        dom.set_transform(element, Transform::AccelHint);

        let from = dom.computed_opacity(element);
        let item = FadeItem {
            element,
            spacer: None,
            anchor: options.anchor,
            from: if from.is_finite() { from } else { 1.0 },
            to: options.to,
            duration: options.duration,
            initial_top: 0.0,
            height: 0.0,
            cached_value: None,
        };

        match existing {
            Some(idx) => self.items[idx] = item, // keeps list position
            None => self.items.push(item),
        }

        if !silent && self.geometry_cached {
            self.update_geometry(dom);
        }
    }

    fn measure(dom: &dyn Dom, viewport: Viewport, item: &mut FadeItem) {
        let target = item.spacer.unwrap_or(item.element);
        if let Some(bounds) = dom.bounding_box(target) {
            item.initial_top = bounds.top + viewport.scroll_y;
            item.height = bounds.height;
        }
    }

    fn clean_item(dom: &mut dyn Dom, item: &mut FadeItem) {
        if item.cached_value.is_some() {
            item.cached_value = None;
            dom.set_opacity(item.element, None);
        }
    }

    fn update_values(&mut self, dom: &mut dyn Dom) -> ValuesOutcome {
        if !self.running {
            return ValuesOutcome::Done;
        }
        if !self.geometry_cached {
            return ValuesOutcome::NeedsGeometry;
        }

        let viewport = dom.viewport();
        for item in &mut self.items {
            let pos = item.initial_top - viewport.scroll_y;

            let raw = match item.anchor {
                AnchorEdge::Top if pos <= 0.0 && -pos < item.height => {
                    Some(item.from + (item.to - item.from) * (-pos / (item.height * item.duration)))
                }
                AnchorEdge::Bottom
                    if pos < viewport.height && viewport.height - pos <= item.height =>
                {
                    Some(
                        item.to
                            - (item.to - item.from) * (viewport.height - pos)
                                / (item.height * item.duration),
                    )
                }
                _ => None,
            };

            match raw {
                Some(raw) => {
                    let value = raw.clamp(item.from.min(item.to), item.from.max(item.to));
                    if item.cached_value != Some(value) {
                        item.cached_value = Some(value);
                        dom.set_opacity(item.element, Some(value));
                    }
                }
                None => Self::clean_item(dom, item),
            }
        }

        ValuesOutcome::Done
    }

    fn update_geometry(&mut self, dom: &mut dyn Dom) {
        self.geometry_cached = true;

        let viewport = dom.viewport();
        for item in &mut self.items {
            Self::measure(&*dom, viewport, item);
        }

        self.update_values(dom);
    }
}

impl Effect for FadeEffect {
    fn kind(&self) -> EffectKind {
        EffectKind::Fade
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self, dom: &mut dyn Dom) {
        self.running = false;
        for item in &mut self.items {
            Self::clean_item(dom, item);
            item.spacer = None; // spacers are torn down with sticky stop
        }
    }

    fn unregister(
        &mut self,
        dom: &mut dyn Dom,
        element: ElementId,
        silent: bool,
        _events: &mut Vec<SpacerChange>,
    ) -> bool {
        let Some(idx) = self.items.iter().position(|i| i.element == element) else {
            return false;
        };

        Self::clean_item(dom, &mut self.items[idx]);
        // per-tick cleans keep the compositing hint; unregister clears it
        dom.set_transform(element, Transform::None);
        self.items.remove(idx);

        if !silent {
            self.update_geometry(dom);
        }
        true
    }

    fn compute_values(
        &mut self,
        dom: &mut dyn Dom,
        _events: &mut Vec<SpacerChange>,
    ) -> ValuesOutcome {
        self.update_values(dom)
    }

    fn compute_geometry(&mut self, dom: &mut dyn Dom, _events: &mut Vec<SpacerChange>) {
        self.update_geometry(dom);
    }

    fn on_spacer_change(&mut self, dom: &mut dyn Dom, change: &SpacerChange) {
        if !self.running {
            return;
        }

        let mut hit = false;
        for item in &mut self.items {
            if item.element == change.element {
                item.spacer = change.spacer;
                hit = true;
            }
        }

        if hit {
            self.update_geometry(dom);
        }
    }

    fn is_registered(&self, element: ElementId) -> bool {
        self.items.iter().any(|i| i.element == element)
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }
}
