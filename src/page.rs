//! In-memory document host for tests and the CLI.
//!
//! [`Page`] implements [`Dom`] over a deliberately small block layout:
//! children stack vertically inside their parent, fixed elements leave the
//! flow, and a transform scales the rendered box about its center without
//! moving neighbors. Enough to exercise every effect; never a layout engine.

use std::collections::BTreeMap;

use crate::{
    core::{AnchorEdge, BoundingBox, ElementId, Viewport},
    dom::{Dom, Position, Transform},
    error::{ScrollFxError, ScrollFxResult},
};

/// Viewport part of a [`PageSpec`].
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct ViewportSpec {
    /// Inner viewport height in px.
    pub height: f64,
}

/// One element in a [`PageSpec`]: a block of fixed natural height, optionally
/// carrying marker classes, data attributes and stylesheet defaults.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct NodeSpec {
    pub id: String,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
    /// Stylesheet opacity, `None` for the default of 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Stylesheet z-index, `None` for `auto`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>, height: f64) -> Self {
        Self {
            id: id.into(),
            height,
            classes: Vec::new(),
            data: BTreeMap::new(),
            opacity: None,
            z_index: None,
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn with_children(mut self, children: Vec<NodeSpec>) -> Self {
        self.children = children;
        self
    }
}

/// Declarative description of a whole page.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PageSpec {
    pub viewport: ViewportSpec,
    pub body: Vec<NodeSpec>,
}

/// Inline styles the effects write, one slot per property they touch.
/// `None` everywhere means the stylesheet value is in force.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InlineStyle {
    pub opacity: Option<f64>,
    pub transform: Transform,
    pub position: Position,
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub z_index: Option<i32>,
    pub overflow_hidden: bool,
    pub height: Option<f64>,
}

#[derive(Clone, Debug)]
struct Node {
    name: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    natural_height: f64,
    classes: Vec<String>,
    data: BTreeMap<String, String>,
    base_opacity: Option<f64>,  // stylesheet opacity
    base_z_index: Option<i32>,  // stylesheet z-index, None = auto
    style: InlineStyle,
    alive: bool,
    spacer: bool,
}

/// In-memory stand-in for the host document.
#[derive(Clone, Debug)]
pub struct Page {
    nodes: Vec<Node>,
    viewport: Viewport,
    style_writes: u64,
}

impl Page {
    /// Root of the document; every spec node is a descendant.
    pub const BODY: ElementId = ElementId(0);

    pub fn from_spec(spec: &PageSpec) -> ScrollFxResult<Self> {
        if !spec.viewport.height.is_finite() || spec.viewport.height <= 0.0 {
            return Err(ScrollFxError::validation("viewport height must be > 0"));
        }

        let mut page = Self {
            nodes: vec![Node {
                name: "body".to_string(),
                parent: None,
                children: Vec::new(),
                natural_height: 0.0,
                classes: Vec::new(),
                data: BTreeMap::new(),
                base_opacity: None,
                base_z_index: None,
                style: InlineStyle::default(),
                alive: true,
                spacer: false,
            }],
            viewport: Viewport {
                scroll_y: 0.0,
                height: spec.viewport.height,
            },
            style_writes: 0,
        };

        for child in &spec.body {
            page.insert_spec_node(Self::BODY, child)?;
        }
        Ok(page)
    }

    pub fn from_json_str(json: &str) -> ScrollFxResult<Self> {
        let spec: PageSpec =
            serde_json::from_str(json).map_err(|e| ScrollFxError::serde(e.to_string()))?;
        Self::from_spec(&spec)
    }

    fn insert_spec_node(&mut self, parent: ElementId, spec: &NodeSpec) -> ScrollFxResult<()> {
        if spec.id.trim().is_empty() {
            return Err(ScrollFxError::validation("element id must be non-empty"));
        }
        if self.nodes.iter().any(|n| n.name == spec.id) {
            return Err(ScrollFxError::validation(format!(
                "duplicate element id '{}'",
                spec.id
            )));
        }
        if !spec.height.is_finite() || spec.height < 0.0 {
            return Err(ScrollFxError::validation(format!(
                "element '{}' height must be finite and >= 0",
                spec.id
            )));
        }
        if let Some(opacity) = spec.opacity
            && !(0.0..=1.0).contains(&opacity)
        {
            return Err(ScrollFxError::validation(format!(
                "element '{}' opacity must be within [0, 1]",
                spec.id
            )));
        }

        let id = ElementId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name: spec.id.clone(),
            parent: Some(parent),
            children: Vec::new(),
            natural_height: spec.height,
            classes: spec.classes.clone(),
            data: spec.data.clone(),
            base_opacity: spec.opacity,
            base_z_index: spec.z_index,
            style: InlineStyle::default(),
            alive: true,
            spacer: false,
        });
        self.nodes[parent.0 as usize].children.push(id);

        for child in &spec.children {
            self.insert_spec_node(id, child)?;
        }
        Ok(())
    }

    /// Look up a spec element by id. Spacers and detached elements never
    /// match.
    pub fn element(&self, name: &str) -> Option<ElementId> {
        self.nodes
            .iter()
            .position(|n| n.alive && !n.spacer && n.name == name)
            .map(|idx| ElementId(idx as u32))
    }

    pub fn name(&self, element: ElementId) -> Option<&str> {
        self.node(element).map(|n| n.name.as_str())
    }

    pub fn inline_style(&self, element: ElementId) -> Option<&InlineStyle> {
        self.nodes.get(element.0 as usize).map(|n| &n.style)
    }

    pub fn children(&self, element: ElementId) -> &[ElementId] {
        self.node(element).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn is_attached(&self, element: ElementId) -> bool {
        self.node(element).is_some()
    }

    pub fn is_spacer(&self, element: ElementId) -> bool {
        self.node(element).is_some_and(|n| n.spacer)
    }

    /// Scroll to `y`, clamped to the scrollable range.
    pub fn set_scroll(&mut self, y: f64) {
        let max = (self.document_height() - self.viewport.height).max(0.0);
        self.viewport.scroll_y = y.clamp(0.0, max);
    }

    pub fn scroll_y(&self) -> f64 {
        self.viewport.scroll_y
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport.height = height;
        // the document may have gotten shorter than the old scroll offset
        self.set_scroll(self.viewport.scroll_y);
    }

    /// Replace an element's natural height, as loading content would.
    pub fn set_natural_height(&mut self, element: ElementId, height: f64) {
        if let Some(idx) = self.index(element) {
            self.nodes[idx].natural_height = height;
        }
    }

    /// Number of inline style writes since construction, cleared never.
    /// Tests use it to show that unchanged values are not rewritten.
    pub fn style_write_count(&self) -> u64 {
        self.style_writes
    }

    fn index(&self, element: ElementId) -> Option<usize> {
        let idx = element.0 as usize;
        (idx < self.nodes.len() && self.nodes[idx].alive).then_some(idx)
    }

    fn node(&self, element: ElementId) -> Option<&Node> {
        self.index(element).map(|idx| &self.nodes[idx])
    }

    fn node_mut(&mut self, element: ElementId) -> Option<&mut Node> {
        self.index(element).map(|idx| &mut self.nodes[idx])
    }

    /// Height the node occupies in its parent's flow.
    fn flow_height(&self, node: &Node) -> f64 {
        if !node.alive || node.style.position == Position::Fixed {
            return 0.0;
        }
        node.style.height.unwrap_or(node.natural_height)
    }

    /// Document-absolute top of the slot the element occupies in flow.
    fn doc_top(&self, element: ElementId) -> Option<f64> {
        let node = self.node(element)?;
        let Some(parent) = node.parent else {
            return Some(0.0);
        };
        let mut top = self.doc_top(parent)?;
        for &sibling in &self.nodes[parent.0 as usize].children {
            if sibling == element {
                break;
            }
            top += self.flow_height(&self.nodes[sibling.0 as usize]);
        }
        Some(top)
    }

    /// Lowest flow bottom in the subtree; overflowing children count.
    fn extent(&self, element: ElementId, top: f64) -> f64 {
        let node = &self.nodes[element.0 as usize];
        let mut bottom = top + self.flow_height(node);
        let mut child_top = top;
        for &child in &node.children {
            let child_node = &self.nodes[child.0 as usize];
            if !child_node.alive || child_node.style.position == Position::Fixed {
                continue;
            }
            bottom = bottom.max(self.extent(child, child_top));
            child_top += self.flow_height(child_node);
        }
        bottom
    }
}

impl Dom for Page {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn document_height(&self) -> f64 {
        self.extent(Self::BODY, 0.0).max(self.viewport.height)
    }

    fn bounding_box(&self, element: ElementId) -> Option<BoundingBox> {
        let node = self.node(element)?;
        let height = node.style.height.unwrap_or(node.natural_height);

        let viewport_top = if node.style.position == Position::Fixed {
            if let Some(top) = node.style.top {
                top
            } else if let Some(bottom) = node.style.bottom {
                self.viewport.height - height - bottom
            } else {
                self.doc_top(element)? - self.viewport.scroll_y
            }
        } else {
            self.doc_top(element)? - self.viewport.scroll_y
        };

        // scaling grows the box about its center; neighbors stay put
        let rendered = height * node.style.transform.scale_factor();
        Some(BoundingBox {
            top: viewport_top - (rendered - height) / 2.0,
            height: rendered,
        })
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node(element)?.parent
    }

    fn next_sibling(&self, element: ElementId) -> Option<ElementId> {
        let parent = self.node(element)?.parent?;
        let children = &self.nodes[parent.0 as usize].children;
        let idx = children.iter().position(|&c| c == element)?;
        children.get(idx + 1).copied()
    }

    fn prev_sibling(&self, element: ElementId) -> Option<ElementId> {
        let parent = self.node(element)?.parent?;
        let children = &self.nodes[parent.0 as usize].children;
        let idx = children.iter().position(|&c| c == element)?;
        children.get(idx.checked_sub(1)?).copied()
    }

    fn computed_opacity(&self, element: ElementId) -> f64 {
        self.node(element)
            .and_then(|n| n.style.opacity.or(n.base_opacity))
            .unwrap_or(1.0)
    }

    fn computed_z_index(&self, element: ElementId) -> Option<i32> {
        let node = self.node(element)?;
        node.style.z_index.or(node.base_z_index)
    }

    fn elements_with_class(&self, class: &str) -> Vec<ElementId> {
        fn walk(page: &Page, element: ElementId, class: &str, found: &mut Vec<ElementId>) {
            let node = &page.nodes[element.0 as usize];
            if node.classes.iter().any(|c| c == class) {
                found.push(element);
            }
            for &child in &node.children {
                walk(page, child, class, found);
            }
        }

        let mut found = Vec::new();
        walk(self, Self::BODY, class, &mut found);
        found
    }

    fn data_attr(&self, element: ElementId, key: &str) -> Option<String> {
        self.node(element)?.data.get(key).cloned()
    }

    fn set_opacity(&mut self, element: ElementId, value: Option<f64>) {
        self.style_writes += 1;
        if let Some(node) = self.node_mut(element) {
            node.style.opacity = value;
        }
    }

    fn set_transform(&mut self, element: ElementId, transform: Transform) {
        self.style_writes += 1;
        if let Some(node) = self.node_mut(element) {
            node.style.transform = transform;
        }
    }

    fn set_position(&mut self, element: ElementId, position: Position) {
        self.style_writes += 1;
        if let Some(node) = self.node_mut(element) {
            node.style.position = position;
        }
    }

    fn set_edge_inset(&mut self, element: ElementId, edge: AnchorEdge, px: Option<f64>) {
        self.style_writes += 1;
        if let Some(node) = self.node_mut(element) {
            match edge {
                AnchorEdge::Top => node.style.top = px,
                AnchorEdge::Bottom => node.style.bottom = px,
            }
        }
    }

    fn set_z_index(&mut self, element: ElementId, z: Option<i32>) {
        self.style_writes += 1;
        if let Some(node) = self.node_mut(element) {
            node.style.z_index = z;
        }
    }

    fn set_overflow_hidden(&mut self, element: ElementId) {
        self.style_writes += 1;
        if let Some(node) = self.node_mut(element) {
            node.style.overflow_hidden = true;
        }
    }

    fn insert_spacer_before(&mut self, element: ElementId, height: f64) -> Option<ElementId> {
        let node = self.node(element)?;
        let parent = node.parent?;
        let name = format!("{}--spacer", node.name);
        let idx = self.nodes[parent.0 as usize]
            .children
            .iter()
            .position(|&c| c == element)?;

        let spacer = ElementId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name,
            parent: Some(parent),
            children: Vec::new(),
            natural_height: 0.0,
            classes: Vec::new(),
            data: BTreeMap::new(),
            base_opacity: None,
            base_z_index: None,
            style: InlineStyle {
                position: Position::Relative,
                height: Some(height),
                ..InlineStyle::default()
            },
            alive: true,
            spacer: true,
        });
        self.nodes[parent.0 as usize].children.insert(idx, spacer);
        Some(spacer)
    }

    fn set_spacer_height(&mut self, spacer: ElementId, height: f64) {
        self.style_writes += 1;
        if let Some(node) = self.node_mut(spacer).filter(|n| n.spacer) {
            node.style.height = Some(height);
        }
    }

    fn remove_spacer(&mut self, spacer: ElementId) {
        let Some(node) = self.node_mut(spacer).filter(|n| n.spacer) else {
            return;
        };
        node.alive = false;
        if let Some(parent) = node.parent.take() {
            self.nodes[parent.0 as usize].children.retain(|&c| c != spacer);
        }
    }
}
