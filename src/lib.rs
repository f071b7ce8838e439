#![forbid(unsafe_code)]

pub mod core;
pub mod dom;
pub mod effect;
pub mod effects;
pub mod error;
pub mod fade;
pub mod options;
pub mod page;
pub mod scale;
pub mod scheduler;
pub mod sticky;

pub use core::{AnchorEdge, BoundingBox, ElementId, Viewport};
pub use dom::{Dom, Position, Transform};
pub use effect::{Effect, EffectKind, SpacerChange, ValuesOutcome};
pub use effects::ScrollEffects;
pub use error::{ScrollFxError, ScrollFxResult};
pub use fade::FadeEffect;
pub use options::{EffectOptions, FadeOptions, ScaleOptions, StickyOptions};
pub use page::{InlineStyle, NodeSpec, Page, PageSpec, ViewportSpec};
pub use scale::ScaleEffect;
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
pub use sticky::StickyEffect;
