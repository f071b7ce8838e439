use crate::{
    core::{AnchorEdge, ElementId},
    dom::{Dom, Position, Transform},
    effect::{Effect, EffectKind, SpacerChange, ValuesOutcome},
    options::StickyOptions,
};

#[derive(Clone, Debug)]
struct StickyItem {
    element: ElementId,
    anchor: AnchorEdge,
    extra: f64,
    z_index: i32,
    initial_top: f64,
    height: f64,
    applied: bool,
    spacer: Option<ElementId>, // exists iff applied
    spacer_height: f64,        // last height written to the spacer
}

/// Pins elements to the anchored viewport edge while a multiple of their
/// height scrolls past, keeping the document height stable with a spacer and
/// layering later content above the pinned element.
#[derive(Debug, Default)]
pub struct StickyEffect {
    items: Vec<StickyItem>,
    running: bool,
    geometry_cached: bool,
}

impl StickyEffect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        dom: &mut dyn Dom,
        element: ElementId,
        options: StickyOptions,
        silent: bool,
        events: &mut Vec<SpacerChange>,
    ) {
        let options = options.normalized();

        let existing = self.items.iter().position(|i| i.element == element);
        if let Some(idx) = existing {
            // unpin before swapping parameters so no spacer leaks
            Self::clean_item(dom, &mut self.items[idx], events);
        }

        dom.set_transform(element, Transform::AccelHint);

        let item = StickyItem {
            element,
            anchor: options.anchor,
            extra: options.extra,
            z_index: options.z_index,
            initial_top: 0.0,
            height: 0.0,
            applied: false,
            spacer: None,
            spacer_height: 0.0,
        };

        match existing {
            Some(idx) => self.items[idx] = item,
            None => self.items.push(item),
        }

        if !silent && self.geometry_cached {
            self.update_geometry(dom, events);
        }
    }

    fn clean_item(dom: &mut dyn Dom, item: &mut StickyItem, events: &mut Vec<SpacerChange>) {
        item.applied = false;

        dom.set_position(item.element, Position::Static);
        dom.set_edge_inset(item.element, item.anchor, None);
        dom.set_z_index(item.element, None);

        if let Some(spacer) = item.spacer.take() {
            dom.remove_spacer(spacer);
            events.push(SpacerChange {
                element: item.element,
                spacer: None,
            });
        }
    }

    fn update_values(
        &mut self,
        dom: &mut dyn Dom,
        events: &mut Vec<SpacerChange>,
    ) -> ValuesOutcome {
        if !self.running {
            return ValuesOutcome::Done;
        }
        if !self.geometry_cached {
            return ValuesOutcome::NeedsGeometry;
        }

        let viewport = dom.viewport();
        let mut cleaned = false;

        for item in &mut self.items {
            let pos = item.initial_top - viewport.scroll_y;
            let window = item.height * (1.0 + item.extra);

            let active = match item.anchor {
                AnchorEdge::Top => pos <= 0.0 && -pos < window,
                AnchorEdge::Bottom => {
                    pos < viewport.height && viewport.height - pos <= window
                }
            };

            if active {
                if !item.applied {
                    item.applied = true;

                    dom.set_position(item.element, Position::Fixed);
                    dom.set_edge_inset(item.element, item.anchor, Some(0.0));
                    dom.set_z_index(item.element, Some(item.z_index));

                    if item.spacer.is_none()
                        && let Some(spacer) = dom.insert_spacer_before(item.element, item.height)
                    {
                        item.spacer = Some(spacer);
                        item.spacer_height = item.height;
                        events.push(SpacerChange {
                            element: item.element,
                            spacer: Some(spacer),
                        });
                    }
                }
            } else if item.applied {
                Self::clean_item(dom, item, events);
                cleaned = true;
            }
        }

        if cleaned {
            self.z_pass(dom);
        }

        ValuesOutcome::Done
    }

    fn update_geometry(&mut self, dom: &mut dyn Dom, events: &mut Vec<SpacerChange>) {
        self.geometry_cached = true;

        let viewport = dom.viewport();
        for item in &mut self.items {
            // While pinned the element is out of flow; its spacer holds the
            // slot and is the thing to measure.
            let target = item.spacer.unwrap_or(item.element);
            if let Some(bounds) = dom.bounding_box(target) {
                item.initial_top = bounds.top + viewport.scroll_y;
                item.height = bounds.height;
            }

            if let Some(spacer) = item.spacer
                && item.spacer_height != item.height
            {
                item.spacer_height = item.height;
                dom.set_spacer_height(spacer, item.height);
            }
        }

        self.update_values(dom, events);

        // raise siblings after the values pass so a fresh pin keeps its own
        // z-index
        self.z_pass(dom);
    }

    /// Walk the siblings past each item in scroll direction and raise them
    /// above the pinned element, nearest sibling lowest.
    fn z_pass(&self, dom: &mut dyn Dom) {
        for item in &self.items {
            let mut sibling = match item.anchor {
                AnchorEdge::Bottom => dom.prev_sibling(item.element),
                AnchorEdge::Top => dom.next_sibling(item.element),
            };
            let mut counter = 1;

            while let Some(sib) = sibling {
                // counter still advances across pinned sticky siblings, they
                // just keep their own z-index
                let pinned_sticky = self.items.iter().any(|i| i.element == sib && i.applied);
                if !pinned_sticky {
                    dom.set_position(sib, Position::Relative);

                    let raise = match dom.computed_z_index(sib) {
                        None | Some(0) => true,
                        Some(z) => z < item.z_index + counter,
                    };
                    if raise {
                        dom.set_z_index(sib, Some(item.z_index + counter));
                    }
                }

                sibling = match item.anchor {
                    AnchorEdge::Bottom => dom.prev_sibling(sib),
                    AnchorEdge::Top => dom.next_sibling(sib),
                };
                counter += 1;
            }
        }
    }
}

impl Effect for StickyEffect {
    fn kind(&self) -> EffectKind {
        EffectKind::Sticky
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self, dom: &mut dyn Dom) {
        self.running = false;

        // teardown notifications go nowhere; consumers drop their own spacer
        // references on stop
        let mut dropped = Vec::new();
        for item in &mut self.items {
            Self::clean_item(dom, item, &mut dropped);
        }

        self.z_pass(dom);
    }

    fn unregister(
        &mut self,
        dom: &mut dyn Dom,
        element: ElementId,
        silent: bool,
        events: &mut Vec<SpacerChange>,
    ) -> bool {
        let Some(idx) = self.items.iter().position(|i| i.element == element) else {
            return false;
        };

        Self::clean_item(dom, &mut self.items[idx], events);
        dom.set_transform(element, Transform::None);
        self.items.remove(idx);
        self.z_pass(dom);

        if !silent {
            self.update_geometry(dom, events);
        }
        true
    }

    fn compute_values(
        &mut self,
        dom: &mut dyn Dom,
        events: &mut Vec<SpacerChange>,
    ) -> ValuesOutcome {
        self.update_values(dom, events)
    }

    fn compute_geometry(&mut self, dom: &mut dyn Dom, events: &mut Vec<SpacerChange>) {
        self.update_geometry(dom, events);
    }

    fn is_registered(&self, element: ElementId) -> bool {
        self.items.iter().any(|i| i.element == element)
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }
}
