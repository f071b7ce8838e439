use crate::{
    core::{AnchorEdge, ElementId},
    dom::Dom,
};

const ATTR_AT: &str = "fr-scroll-effect-at";
const ATTR_TO: &str = "fr-scroll-effect-to";
const ATTR_DURATION: &str = "fr-scroll-effect-duration";
const ATTR_SCALE: &str = "fr-scroll-effect-scale";
const ATTR_EXTRA: &str = "fr-scroll-effect-extra";
const ATTR_ZINDEX: &str = "fr-scroll-effect-zindex";

/// Parameters for one fade registration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FadeOptions {
    pub anchor: AnchorEdge,
    /// Opacity faded to across the window, clamped to `[0, 1]`.
    pub to: f64,
    /// Fraction of the element height the fade is spread over, > 0.
    pub duration: f64,
}

impl Default for FadeOptions {
    fn default() -> Self {
        Self {
            anchor: AnchorEdge::Top,
            to: 1.0,
            duration: 1.0,
        }
    }
}

impl FadeOptions {
    /// Read options from the element's declarative attributes, applying the
    /// defaults for anything missing or malformed.
    pub fn from_attrs(dom: &dyn Dom, element: ElementId) -> Self {
        Self {
            anchor: AnchorEdge::from_attr(dom.data_attr(element, ATTR_AT).as_deref()),
            to: parse_float(dom.data_attr(element, ATTR_TO))
                .unwrap_or(1.0)
                .clamp(0.0, 1.0),
            duration: parse_float(dom.data_attr(element, ATTR_DURATION))
                .filter(|d| *d > 0.0)
                .unwrap_or(1.0),
        }
    }
}

/// Parameters for one scale registration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaleOptions {
    pub anchor: AnchorEdge,
    /// Scale reached at the end of the window, > 0.
    pub factor: f64,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            anchor: AnchorEdge::Top,
            factor: 1.5,
        }
    }
}

impl ScaleOptions {
    pub fn from_attrs(dom: &dyn Dom, element: ElementId) -> Self {
        Self {
            anchor: AnchorEdge::from_attr(dom.data_attr(element, ATTR_AT).as_deref()),
            factor: parse_float(dom.data_attr(element, ATTR_SCALE))
                .filter(|s| *s > 0.0)
                .unwrap_or(1.5),
        }
    }
}

/// Parameters for one sticky registration.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StickyOptions {
    pub anchor: AnchorEdge,
    /// Extends the pinned window by `height * extra` px.
    pub extra: f64,
    /// z-index written while pinned, never negative.
    pub z_index: i32,
}

impl StickyOptions {
    pub fn from_attrs(dom: &dyn Dom, element: ElementId) -> Self {
        Self {
            anchor: AnchorEdge::from_attr(dom.data_attr(element, ATTR_AT).as_deref()),
            extra: parse_float(dom.data_attr(element, ATTR_EXTRA)).unwrap_or(0.0),
            z_index: normalize_z_index(
                dom.data_attr(element, ATTR_ZINDEX)
                    .and_then(|raw| raw.trim().parse::<i32>().ok())
                    .unwrap_or(0),
            ),
        }
    }

    /// Clamp and copy field values the same way attribute parsing does.
    pub fn normalized(mut self) -> Self {
        self.z_index = normalize_z_index(self.z_index);
        self
    }
}

/// Options for one registration, tagged by effect family.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectOptions {
    Sticky(StickyOptions),
    Fade(FadeOptions),
    Scale(ScaleOptions),
}

fn parse_float(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn normalize_z_index(z: i32) -> i32 {
    if z < 0 {
        tracing::warn!(
            z_index = z,
            "negative sticky z-index can break stacking on some engines, clamping to 0"
        );
        return 0;
    }
    z
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{NodeSpec, Page, PageSpec, ViewportSpec};

    fn page_with_data(data: &[(&str, &str)]) -> (Page, ElementId) {
        let mut node = NodeSpec::new("el", 100.0);
        for &(k, v) in data {
            node = node.with_data(k, v);
        }
        let page = Page::from_spec(&PageSpec {
            viewport: ViewportSpec { height: 800.0 },
            body: vec![node],
        })
        .unwrap();
        let el = page.element("el").unwrap();
        (page, el)
    }

    #[test]
    fn fade_defaults_when_attrs_missing() {
        let (page, el) = page_with_data(&[]);
        let opts = FadeOptions::from_attrs(&page, el);
        assert_eq!(opts, FadeOptions::default());
    }

    #[test]
    fn fade_to_is_clamped_into_unit_range() {
        let (page, el) = page_with_data(&[("fr-scroll-effect-to", "3.5")]);
        assert_eq!(FadeOptions::from_attrs(&page, el).to, 1.0);

        let (page, el) = page_with_data(&[("fr-scroll-effect-to", "-0.2")]);
        assert_eq!(FadeOptions::from_attrs(&page, el).to, 0.0);

        let (page, el) = page_with_data(&[("fr-scroll-effect-to", "0")]);
        assert_eq!(FadeOptions::from_attrs(&page, el).to, 0.0);
    }

    #[test]
    fn fade_zero_or_negative_duration_falls_back_to_one() {
        let (page, el) = page_with_data(&[("fr-scroll-effect-duration", "0")]);
        assert_eq!(FadeOptions::from_attrs(&page, el).duration, 1.0);

        let (page, el) = page_with_data(&[("fr-scroll-effect-duration", "-2")]);
        assert_eq!(FadeOptions::from_attrs(&page, el).duration, 1.0);

        let (page, el) = page_with_data(&[("fr-scroll-effect-duration", "0.5")]);
        assert_eq!(FadeOptions::from_attrs(&page, el).duration, 0.5);
    }

    #[test]
    fn scale_factor_zero_and_garbage_fall_back() {
        let (page, el) = page_with_data(&[("fr-scroll-effect-scale", "0")]);
        assert_eq!(ScaleOptions::from_attrs(&page, el).factor, 1.5);

        let (page, el) = page_with_data(&[("fr-scroll-effect-scale", "big")]);
        assert_eq!(ScaleOptions::from_attrs(&page, el).factor, 1.5);

        let (page, el) = page_with_data(&[("fr-scroll-effect-scale", "2")]);
        assert_eq!(ScaleOptions::from_attrs(&page, el).factor, 2.0);
    }

    #[test]
    fn sticky_negative_z_index_is_clamped_to_zero() {
        let (page, el) = page_with_data(&[("fr-scroll-effect-zindex", "-3")]);
        assert_eq!(StickyOptions::from_attrs(&page, el).z_index, 0);

        let opts = StickyOptions {
            anchor: AnchorEdge::Top,
            extra: 0.0,
            z_index: -7,
        };
        assert_eq!(opts.normalized().z_index, 0);
    }

    #[test]
    fn sticky_reads_anchor_and_extra() {
        let (page, el) = page_with_data(&[
            ("fr-scroll-effect-at", "bottom"),
            ("fr-scroll-effect-extra", "0.25"),
            ("fr-scroll-effect-zindex", "4"),
        ]);
        let opts = StickyOptions::from_attrs(&page, el);
        assert_eq!(opts.anchor, AnchorEdge::Bottom);
        assert_eq!(opts.extra, 0.25);
        assert_eq!(opts.z_index, 4);
    }
}
