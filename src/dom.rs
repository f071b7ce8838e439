use crate::core::{AnchorEdge, BoundingBox, ElementId, Viewport};

/// Inline `position` value written by effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// No inline position; the element keeps its stylesheet flow position.
    #[default]
    Static,
    Relative,
    Fixed,
}

/// Inline transform value written by effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Transform {
    /// No inline transform.
    #[default]
    None,
    /// Bare compositing hint (`translateZ(0)`), written at registration.
    AccelHint,
    /// Uniform scale about the element center, compositing hint included.
    Scale(f64),
}

impl Transform {
    /// Scale factor applied to the rendered box. `1.0` unless scaling.
    pub fn scale_factor(self) -> f64 {
        match self {
            Self::Scale(s) => s,
            Self::None | Self::AccelHint => 1.0,
        }
    }
}

/// Host document seam.
///
/// Effects never touch a real DOM; they read geometry and write inline styles
/// through this trait. The crate ships [`Page`](crate::page::Page) as an
/// in-memory implementation for tests and the CLI; embedders supply their own
/// binding to whatever document they drive.
///
/// Queries take `&self`, style writes take `&mut self`. All geometry is in px
/// with the y axis growing downward.
pub trait Dom {
    /// Current scroll offset and viewport height.
    fn viewport(&self) -> Viewport;

    /// Total scrollable height of the document, never less than the viewport.
    fn document_height(&self) -> f64;

    /// Viewport-relative box of an element, `None` once it left the document.
    fn bounding_box(&self, element: ElementId) -> Option<BoundingBox>;

    fn parent(&self, element: ElementId) -> Option<ElementId>;
    fn next_sibling(&self, element: ElementId) -> Option<ElementId>;
    fn prev_sibling(&self, element: ElementId) -> Option<ElementId>;

    /// Effective opacity (inline over stylesheet), `1.0` when unset.
    fn computed_opacity(&self, element: ElementId) -> f64;

    /// Effective z-index, `None` for `auto`.
    fn computed_z_index(&self, element: ElementId) -> Option<i32>;

    /// Elements carrying `class`, in document order.
    fn elements_with_class(&self, class: &str) -> Vec<ElementId>;

    /// Declarative `data-*` attribute value, key given without the prefix.
    fn data_attr(&self, element: ElementId, key: &str) -> Option<String>;

    /// Write or clear (`None`) the inline opacity.
    fn set_opacity(&mut self, element: ElementId, value: Option<f64>);

    fn set_transform(&mut self, element: ElementId, transform: Transform);

    fn set_position(&mut self, element: ElementId, position: Position);

    /// Write or clear the inset for one viewport edge (`top:`/`bottom:`).
    fn set_edge_inset(&mut self, element: ElementId, edge: AnchorEdge, px: Option<f64>);

    /// Write or clear the inline z-index.
    fn set_z_index(&mut self, element: ElementId, z: Option<i32>);

    /// Force `overflow: hidden`. Never undone; matches how scaled content is
    /// clipped for the lifetime of the page.
    fn set_overflow_hidden(&mut self, element: ElementId);

    /// Insert a full-width, relative-positioned spacer of `height` px
    /// directly before `element` in its parent. Returns the spacer handle,
    /// or `None` when the element has no parent.
    fn insert_spacer_before(&mut self, element: ElementId, height: f64) -> Option<ElementId>;

    fn set_spacer_height(&mut self, spacer: ElementId, height: f64);

    /// Detach a spacer from the document.
    fn remove_spacer(&mut self, spacer: ElementId);
}
