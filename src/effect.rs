use crate::{core::ElementId, dom::Dom};

/// The three effect families, in coordinator pass order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Sticky,
    Fade,
    Scale,
}

impl EffectKind {
    /// Pass order: sticky runs first so fades and scales on the same element
    /// see its spacer within the tick.
    pub const ALL: [EffectKind; 3] = [Self::Sticky, Self::Fade, Self::Scale];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sticky => "sticky",
            Self::Fade => "fade",
            Self::Scale => "scale",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sticky" => Some(Self::Sticky),
            "fade" => Some(Self::Fade),
            "scale" => Some(Self::Scale),
            _ => None,
        }
    }

    /// Marker class picked up by [`ScrollEffects::scan`](crate::effects::ScrollEffects::scan).
    pub fn marker_class(self) -> &'static str {
        match self {
            Self::Sticky => "fr-scroll-effect-sticky",
            Self::Fade => "fr-scroll-effect-fade",
            Self::Scale => "fr-scroll-effect-scale",
        }
    }
}

/// A sticky spacer appeared (`Some`) or disappeared (`None`) for `element`.
///
/// Broadcast by the coordinator after the pass that produced it; fades and
/// scales registered on the same element switch their geometry reads to the
/// spacer, which keeps the element's flow position while it is pinned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpacerChange {
    pub element: ElementId,
    pub spacer: Option<ElementId>,
}

/// Result of a values pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValuesOutcome {
    /// Styles match the current scroll position.
    Done,
    /// Geometry was never measured; nothing was written. The caller must run
    /// a geometry pass before values mean anything.
    NeedsGeometry,
}

/// Uniform per-effect contract the coordinator drives.
///
/// Registration stays on the concrete types, which take their own typed
/// options; everything the coordinator fans out per tick lives here.
pub trait Effect {
    fn kind(&self) -> EffectKind;

    /// Allow style writes again. Geometry caches survive stop/start.
    fn start(&mut self);

    /// Restore every registered element to its pre-effect style and drop
    /// transient state. Registrations survive.
    fn stop(&mut self, dom: &mut dyn Dom);

    /// Remove one registration and clean its styles. No-op when absent.
    /// Returns whether anything was removed. Unless `silent`, remaining items
    /// are re-measured and re-applied immediately.
    fn unregister(
        &mut self,
        dom: &mut dyn Dom,
        element: ElementId,
        silent: bool,
        events: &mut Vec<SpacerChange>,
    ) -> bool;

    /// Recompute interpolated values from cached geometry and write the
    /// styles that changed.
    fn compute_values(&mut self, dom: &mut dyn Dom, events: &mut Vec<SpacerChange>)
    -> ValuesOutcome;

    /// Re-measure every item, then run a values pass. Runs even while
    /// stopped; the inner values pass is what respects the running flag.
    fn compute_geometry(&mut self, dom: &mut dyn Dom, events: &mut Vec<SpacerChange>);

    /// React to a sticky spacer appearing or disappearing. Default: ignore.
    fn on_spacer_change(&mut self, dom: &mut dyn Dom, change: &SpacerChange) {
        let _ = (dom, change);
    }

    fn is_registered(&self, element: ElementId) -> bool;

    fn item_count(&self) -> usize;
}
