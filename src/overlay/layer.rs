use std::fmt;
use std::time::Duration;

use crate::animation::ease::Ease;
use crate::foundation::core::{Affine, Point, Rect, Vec2};
use crate::overlay::stickers::StickerIcon;

/// Overlay types the factory can build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    /// Opening headline.
    HeroHook,
    /// Closing call-to-action sticker.
    Cta,
    /// One ingredient label.
    IngredientCallout,
    /// Numbered step text.
    StepText,
    /// Time progress bar.
    ProgressBar,
    /// Stat counters that tick up.
    Counters,
    /// Stacked stat badges.
    StickerStack,
    /// Picture-in-picture placeholder circle.
    PipPlaceholder,
    /// Rotated ingredient tags.
    TagCluster,
}

impl OverlayKind {
    /// Stable snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HeroHook => "hero_hook",
            Self::Cta => "cta",
            Self::IngredientCallout => "ingredient_callout",
            Self::StepText => "step_text",
            Self::ProgressBar => "progress_bar",
            Self::Counters => "counters",
            Self::StickerStack => "sticker_stack",
            Self::PipPlaceholder => "pip_placeholder",
            Self::TagCluster => "tag_cluster",
        }
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Font weight class for overlay text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Weight {
    /// Regular face.
    Regular,
    /// Bold face.
    Bold,
}

/// Horizontal alignment of text lines inside their frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    /// Lines start at the frame's left edge.
    Left,
    /// Lines are centered in the frame.
    Center,
}

/// Measured, wrapped text ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    /// Wrapped lines.
    pub lines: Vec<String>,
    /// Font size in canvas pixels.
    pub size_px: f64,
    /// Face weight.
    pub weight: Weight,
    /// Straight RGBA fill.
    pub color: [u8; 4],
    /// Straight RGBA stroke drawn behind the fill.
    pub stroke: Option<[u8; 4]>,
    /// Line alignment.
    pub align: Align,
    /// Measured frame in canvas pixels.
    pub frame: Rect,
    /// Distance between baselines.
    pub line_height: f64,
}

impl TextBlock {
    /// Lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Vector shapes used for plates, pills and rings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Rectangle with rounded corners.
    RoundedRect {
        /// Bounds.
        rect: Rect,
        /// Corner radius.
        radius: f64,
    },
    /// Filled circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
    },
    /// Circle outline.
    Ring {
        /// Center.
        center: Point,
        /// Outer radius.
        radius: f64,
        /// Stroke width, drawn inside the outer radius.
        width: f64,
    },
}

impl Shape {
    /// Axis-aligned bounds.
    pub fn bounds(&self) -> Rect {
        match *self {
            Self::RoundedRect { rect, .. } => rect,
            Self::Circle { center, radius } | Self::Ring { center, radius, .. } => {
                Rect::from_center_size(center, (radius * 2.0, radius * 2.0))
            }
        }
    }
}

/// Drawable content of a node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeContent {
    /// Filled vector shape.
    Shape {
        /// Geometry.
        shape: Shape,
        /// Straight RGBA fill.
        fill: [u8; 4],
    },
    /// Static text.
    Text(TextBlock),
    /// Vector icon.
    Sticker {
        /// Icon to draw.
        icon: StickerIcon,
        /// Target box.
        rect: Rect,
    },
    /// Number that counts up from zero with the node's tween.
    Counter {
        /// Final value.
        value: f64,
        /// Text before the number.
        prefix: String,
        /// Text after the number.
        suffix: String,
        /// Digits after the decimal point.
        decimals: usize,
        /// Layout of the final text; intermediate values reuse its frame.
        block: TextBlock,
    },
    /// Horizontal bar that fills with the node's tween.
    ProgressFill {
        /// Track bounds; the fill grows from its left edge.
        track: Rect,
        /// Straight RGBA fill.
        fill: [u8; 4],
    },
}

impl NodeContent {
    /// Axis-aligned bounds before node transforms.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Shape { shape, .. } => shape.bounds(),
            Self::Text(t) => t.frame,
            Self::Sticker { rect, .. } => *rect,
            Self::Counter { block, .. } => block.frame,
            Self::ProgressFill { track, .. } => *track,
        }
    }
}

/// How a node appears at the start of its overlay window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Appear {
    /// Visible immediately.
    Instant,
    /// Opacity fade.
    Fade,
    /// Spring scale-up from the configured start scale, with a fade.
    Pop,
    /// Slide up by `distance` pixels, with a fade.
    Rise {
        /// Start offset below the resting position.
        distance: f64,
    },
}

/// Value animation driving counters and progress fills.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    /// Time from the end of the node delay to completion.
    pub length: Duration,
    /// Progress curve.
    pub ease: Ease,
}

/// Entrance description for one node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Offset from the overlay start before this node begins.
    pub delay: Duration,
    /// Appearance animation.
    pub appear: Appear,
    /// Optional value tween.
    pub tween: Option<Tween>,
}

impl Motion {
    /// Motion with no delay and no tween.
    pub fn appear(appear: Appear) -> Self {
        Self {
            delay: Duration::ZERO,
            appear,
            tween: None,
        }
    }

    /// Same motion starting `delay` later.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Same motion with a value tween.
    pub fn with_tween(mut self, length: Duration, ease: Ease) -> Self {
        self.tween = Some(Tween { length, ease });
        self
    }
}

/// A drawable node with placement and entrance motion.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Content.
    pub content: NodeContent,
    /// Entrance.
    pub motion: Motion,
    /// Rotation in radians around `pivot`.
    pub rotation_rad: f64,
    /// Rotation and scale pivot; the content center unless set otherwise.
    pub pivot: Point,
}

impl Node {
    /// Node pivoting on its own center.
    pub fn new(content: NodeContent, motion: Motion) -> Self {
        let pivot = content.bounds().center();
        Self {
            content,
            motion,
            rotation_rad: 0.0,
            pivot,
        }
    }

    /// Rotate around `pivot` (degrees).
    pub fn rotated(mut self, degrees: f64, pivot: Point) -> Self {
        self.rotation_rad = degrees.to_radians();
        self.pivot = pivot;
        self
    }

    /// Resting transform.
    pub fn rest_transform(&self) -> Affine {
        let p = self.pivot.to_vec2();
        Affine::translate(p) * Affine::rotate(self.rotation_rad) * Affine::translate(-p)
    }

    /// Bounds covering the resting pose, the entrance start offset and the largest scale a pop
    /// entrance reaches (`pop_peak`).
    pub fn frame(&self, pop_peak: f64) -> Rect {
        let rest = self.rest_transform();
        let bounds = self.content.bounds();
        match self.motion.appear {
            Appear::Rise { distance } => {
                let r = rest.transform_rect_bbox(bounds);
                r.union(r + Vec2::new(0.0, distance))
            }
            Appear::Pop if pop_peak > 1.0 => {
                let p = self.pivot.to_vec2();
                let grown = Affine::translate(p) * Affine::scale(pop_peak) * Affine::translate(-p);
                (grown * rest).transform_rect_bbox(bounds)
            }
            _ => rest.transform_rect_bbox(bounds),
        }
    }
}

/// A built overlay: ordered nodes, drawn back to front.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Overlay type.
    pub kind: OverlayKind,
    /// Nodes, back to front.
    pub nodes: Vec<Node>,
    /// Fade out at the end of the overlay window.
    pub fade_out: bool,
}

impl Layer {
    /// Empty layer.
    pub fn new(kind: OverlayKind) -> Self {
        Self {
            kind,
            nodes: Vec::new(),
            fade_out: true,
        }
    }

    /// Append a node.
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Union of every node frame; `None` for an empty layer.
    pub fn frame(&self, pop_peak: f64) -> Option<Rect> {
        self.nodes
            .iter()
            .map(|n| n.frame(pop_peak))
            .reduce(|a, b| a.union(b))
    }

    /// All text drawn by this layer, in node order.
    pub fn texts(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter_map(|n| match &n.content {
                NodeContent::Text(t) => Some(t.text()),
                NodeContent::Counter {
                    value,
                    prefix,
                    suffix,
                    decimals,
                    ..
                } => Some(format_counter(*value, prefix, suffix, *decimals)),
                _ => None,
            })
            .collect()
    }
}

/// Render a counter value with its affixes.
pub fn format_counter(value: f64, prefix: &str, suffix: &str, decimals: usize) -> String {
    format!("{prefix}{value:.decimals$}{suffix}")
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/layer.rs"]
mod tests;
