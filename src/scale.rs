use crate::{
    core::{AnchorEdge, ElementId, Viewport},
    dom::{Dom, Transform},
    effect::{Effect, EffectKind, SpacerChange, ValuesOutcome},
    options::ScaleOptions,
};

#[derive(Clone, Debug)]
struct ScaleItem {
    element: ElementId,
    spacer: Option<ElementId>, // geometry target while the element is pinned
    anchor: AnchorEdge,
    factor: f64,
    current_scale: f64, // mirrors the inline transform, 1.0 = bare hint
    extra_height: f64,  // rendered overhang at full scale, >= 0
    initial_top: f64,
    height: f64, // unscaled height
}

/// Scales elements toward a target factor while they cross the anchored
/// viewport edge. The parent is clipped so the overhang never widens the
/// page.
#[derive(Debug, Default)]
pub struct ScaleEffect {
    items: Vec<ScaleItem>,
    running: bool,
    geometry_cached: bool,
}

impl ScaleEffect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        dom: &mut dyn Dom,
        element: ElementId,
        options: ScaleOptions,
        silent: bool,
    ) {
        let existing = self.items.iter().position(|i| i.element == element);
        if let Some(idx) = existing {
            Self::clean_item(dom, &mut self.items[idx]);
        }

        dom.set_transform(element, Transform::AccelHint);
        if let Some(parent) = dom.parent(element) {
            dom.set_overflow_hidden(parent);
        }

        let item = ScaleItem {
            element,
            spacer: None,
            anchor: options.anchor,
            factor: options.factor,
            current_scale: 1.0,
            extra_height: 0.0,
            initial_top: 0.0,
            height: 0.0,
        };

        match existing {
            Some(idx) => self.items[idx] = item,
            None => self.items.push(item),
        }

        if !silent && self.geometry_cached {
            self.update_geometry(dom);
        }
    }

    fn measure(dom: &dyn Dom, viewport: Viewport, item: &mut ScaleItem) {
        let target = item.spacer.unwrap_or(item.element);
        let Some(bounds) = dom.bounding_box(target) else {
            return;
        };

        // The rect reflects the scale currently applied; divide it back out
        // and re-center the top, assuming the transform origin is the box
        // center.
        item.height = bounds.height / item.current_scale;
        let scale_diff = bounds.height - item.height;
        item.initial_top = bounds.top + scale_diff / 2.0 + viewport.scroll_y;

        item.extra_height = (item.height * item.factor - item.height).max(0.0);
    }

    fn clean_item(dom: &mut dyn Dom, item: &mut ScaleItem) {
        if item.current_scale != 1.0 {
            item.current_scale = 1.0;
            dom.set_transform(item.element, Transform::AccelHint);
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

            // Windows are widened by half the overhang so the element holds
            // full scale while its grown edge is still on screen.
            let t = match item.anchor {
                AnchorEdge::Top if pos <= 0.0 && -pos < item.height + item.extra_height / 2.0 => {
                    Some(-pos / item.height)
                }
                AnchorEdge::Bottom
                    if pos < viewport.height + item.extra_height / 2.0
                        && viewport.height - pos <= item.height =>
                {
                    Some(1.0 - (viewport.height - pos) / item.height)
                }
                _ => None,
            };

            match t {
                Some(t) => {
                    let raw = 1.0 + t * (item.factor - 1.0);
                    let value = if item.factor >= 1.0 {
                        raw.min(item.factor)
                    } else {
                        raw.max(item.factor)
                    };
                    if item.current_scale != value {
                        item.current_scale = value;
                        dom.set_transform(item.element, Transform::Scale(value));
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

impl Effect for ScaleEffect {
    fn kind(&self) -> EffectKind {
        EffectKind::Scale
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self, dom: &mut dyn Dom) {
        self.running = false;
        for item in &mut self.items {
            Self::clean_item(dom, item);
            item.spacer = None;
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
