/// Opaque handle to one element of a [`Dom`](crate::dom::Dom) host.
///
/// Handles stay valid for the lifetime of the host; removed elements keep
/// their id but stop resolving to geometry.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub u32);

/// Viewport edge an effect activates against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorEdge {
    /// Effect runs while the element crosses the top of the viewport.
    #[default]
    Top,
    /// Effect runs while the element crosses the bottom of the viewport.
    Bottom,
}

impl AnchorEdge {
    /// Parse a declarative `at` attribute. Anything other than `"bottom"`
    /// falls back to `Top`.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("bottom") => Self::Bottom,
            _ => Self::Top,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

/// Scroll offset and viewport height, sampled once per pass.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Vertical scroll offset in px.
    pub scroll_y: f64,
    /// Inner viewport height in px.
    pub height: f64,
}

/// Element box in viewport coordinates.
///
/// `top` is relative to the viewport, so it shifts as the page scrolls;
/// effects convert it to a document-absolute position once per geometry pass
/// by adding the scroll offset.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    /// Distance from the viewport top in px.
    pub top: f64,
    /// Rendered height in px, including any active transform.
    pub height: f64,
}
