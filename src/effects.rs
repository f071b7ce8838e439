//! Coordinator that owns the three effect families and drives them from host
//! callbacks.
//!
//! The host forwards scroll, resize and frame events; the coordinator decides
//! how much work each frame needs and fans it out to the effects in a fixed
//! pass order.

use crate::{
    core::ElementId,
    dom::Dom,
    effect::{Effect, EffectKind, SpacerChange, ValuesOutcome},
    fade::FadeEffect,
    options::{EffectOptions, FadeOptions, ScaleOptions, StickyOptions},
    scale::ScaleEffect,
    scheduler::{FrameHandle, FrameScheduler},
    sticky::StickyEffect,
};

/// How much work the next frame has to do.
///
/// A values pass re-derives styles from cached geometry; a geometry pass
/// re-measures the document first. Geometry subsumes values, so a frame never
/// needs both queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameTask {
    Values,
    Geometry,
}

#[derive(Clone, Copy, Debug)]
struct PendingFrame {
    handle: FrameHandle,
    task: FrameTask,
}

/// Entry point for a page's scroll effects.
///
/// Owns one [`StickyEffect`], [`FadeEffect`] and [`ScaleEffect`] and keeps at
/// most one frame in flight: repeated scroll and resize notifications coalesce
/// into the pending frame, upgrading its task from values to geometry when
/// needed. All document access goes through the [`Dom`] the host passes into
/// each call and all timing through its [`FrameScheduler`]; the coordinator
/// holds neither.
#[derive(Debug, Default)]
pub struct ScrollEffects {
    sticky: StickyEffect,
    fade: FadeEffect,
    scale: ScaleEffect,
    running: bool,
    pending: Option<PendingFrame>,
    last_document_height: Option<f64>,
}

impl ScrollEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every element carrying an effect marker class, reading its
    /// parameters from the element's data attributes.
    ///
    /// Registrations are silent; the geometry frame scheduled by
    /// [`start`](Self::start) picks them all up at once.
    pub fn scan(&mut self, dom: &mut dyn Dom) {
        for kind in EffectKind::ALL {
            for element in dom.elements_with_class(kind.marker_class()) {
                let options = match kind {
                    EffectKind::Sticky => {
                        EffectOptions::Sticky(StickyOptions::from_attrs(dom, element))
                    }
                    EffectKind::Fade => EffectOptions::Fade(FadeOptions::from_attrs(dom, element)),
                    EffectKind::Scale => {
                        EffectOptions::Scale(ScaleOptions::from_attrs(dom, element))
                    }
                };
                self.register_element(dom, element, options, true);
            }
        }
        tracing::debug!(items = self.item_count(), "scan complete");
    }

    /// Register one element with the effect family the options name.
    ///
    /// Re-registering an element swaps its parameters in place. A non-silent
    /// registration runs that family's geometry pass immediately; silent ones
    /// wait for the next scheduled frame.
    pub fn register_element(
        &mut self,
        dom: &mut dyn Dom,
        element: ElementId,
        options: EffectOptions,
        silent: bool,
    ) {
        let mut events = Vec::new();
        match options {
            EffectOptions::Sticky(options) => {
                self.sticky.register(dom, element, options, silent, &mut events);
            }
            EffectOptions::Fade(options) => self.fade.register(dom, element, options, silent),
            EffectOptions::Scale(options) => self.scale.register(dom, element, options, silent),
        }
        self.broadcast(dom, events);
    }

    /// Remove an element from one effect family, or from all of them when
    /// `kind` is `None`. Returns whether anything was removed.
    pub fn unregister_element(
        &mut self,
        dom: &mut dyn Dom,
        element: ElementId,
        kind: Option<EffectKind>,
        silent: bool,
    ) -> bool {
        let mut events = Vec::new();
        let mut removed = false;
        for effect in self.effects_mut() {
            if kind.is_some_and(|k| k != effect.kind()) {
                continue;
            }
            removed |= effect.unregister(dom, element, silent, &mut events);
        }
        self.broadcast(dom, events);
        removed
    }

    /// Begin reacting to scroll events and schedule the initial geometry
    /// frame.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        tracing::debug!(items = self.item_count(), "starting");
        self.running = true;
        for effect in self.effects_mut() {
            effect.start();
        }
        self.schedule(scheduler, FrameTask::Geometry);
    }

    /// Restore every touched style and stop reacting to events.
    ///
    /// Registrations survive; [`start`](Self::start) resumes them.
    pub fn stop(&mut self, dom: &mut dyn Dom, scheduler: &mut dyn FrameScheduler) {
        tracing::debug!("stopping");
        self.running = false;
        if let Some(pending) = self.pending.take() {
            scheduler.cancel_frame(pending.handle);
        }
        for effect in self.effects_mut() {
            effect.stop(dom);
        }
    }

    /// Note a scroll position change.
    ///
    /// Schedules a values frame, escalated to geometry when the document
    /// height drifted since the last measurement (content loaded, fonts
    /// swapped in).
    pub fn on_scroll(&mut self, dom: &dyn Dom, scheduler: &mut dyn FrameScheduler) {
        if !self.running {
            return;
        }
        let task = if self.last_document_height == Some(dom.document_height()) {
            FrameTask::Values
        } else {
            FrameTask::Geometry
        };
        self.schedule(scheduler, task);
    }

    /// Note a viewport size change. Always schedules a geometry frame.
    pub fn on_resize(&mut self, scheduler: &mut dyn FrameScheduler) {
        if !self.running {
            return;
        }
        self.schedule(scheduler, FrameTask::Geometry);
    }

    /// Run the pending frame.
    ///
    /// The host calls this when the scheduler fires `handle`. Handles that no
    /// longer match the pending frame are ignored; they belong to frames
    /// cancelled by [`stop`](Self::stop).
    #[tracing::instrument(skip(self, dom, scheduler))]
    pub fn on_frame(
        &mut self,
        dom: &mut dyn Dom,
        scheduler: &mut dyn FrameScheduler,
        handle: FrameHandle,
    ) {
        let Some(pending) = self.pending else {
            return;
        };
        if pending.handle != handle {
            return;
        }
        self.pending = None;

        match pending.task {
            FrameTask::Values => self.run_values(dom, scheduler),
            FrameTask::Geometry => self.run_geometry(dom),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether any effect family has this element registered.
    pub fn is_registered(&self, element: ElementId) -> bool {
        self.effects().iter().any(|e| e.is_registered(element))
    }

    /// Total registrations across all effect families.
    pub fn item_count(&self) -> usize {
        self.effects().iter().map(|e| e.item_count()).sum()
    }

    fn effects(&self) -> [&dyn Effect; 3] {
        [&self.sticky, &self.fade, &self.scale]
    }

    // EffectKind::ALL order
    fn effects_mut(&mut self) -> [&mut dyn Effect; 3] {
        [&mut self.sticky, &mut self.fade, &mut self.scale]
    }

    fn schedule(&mut self, scheduler: &mut dyn FrameScheduler, task: FrameTask) {
        match &mut self.pending {
            Some(pending) => {
                // a queued geometry frame already covers a values request; a
                // geometry request upgrades a values frame in place, keeping
                // its slot
                if pending.task == FrameTask::Values && task == FrameTask::Geometry {
                    pending.task = FrameTask::Geometry;
                }
            }
            None => {
                let handle = scheduler.request_frame();
                self.pending = Some(PendingFrame { handle, task });
            }
        }
    }

    fn run_values(&mut self, dom: &mut dyn Dom, scheduler: &mut dyn FrameScheduler) {
        let mut events = Vec::new();
        let mut needs_geometry = false;
        for effect in self.effects_mut() {
            if effect.compute_values(dom, &mut events) == ValuesOutcome::NeedsGeometry {
                needs_geometry = true;
            }
        }
        self.broadcast(dom, events);

        if needs_geometry {
            self.schedule(scheduler, FrameTask::Geometry);
        }
    }

    fn run_geometry(&mut self, dom: &mut dyn Dom) {
        let mut events = Vec::new();
        for effect in self.effects_mut() {
            effect.compute_geometry(dom, &mut events);
        }
        self.broadcast(dom, events);

        // captured after the pass so spacer churn does not read as drift on
        // the next scroll
        self.last_document_height = Some(dom.document_height());
    }

    fn broadcast(&mut self, dom: &mut dyn Dom, events: Vec<SpacerChange>) {
        for change in events {
            tracing::debug!(?change, "spacer change");
            for effect in self.effects_mut() {
                effect.on_spacer_change(dom, &change);
            }
        }
    }
}
