use egui::Pos2;
use rand::rngs::StdRng;

use crate::config::ToolStyle;
use crate::element::{Element, ElementId};
use crate::error::RenderError;
use crate::history::ActionKind;
use crate::renderer::SceneRenderer;
use crate::scene::Scene;

mod annotation;
mod arrow;
mod blur;
mod magnifier;
mod shapes;
mod text;

pub use annotation::AnnotationCounter;
pub use arrow::{ArrowTool, MIN_ARROW_LENGTH};
pub use blur::{BlurTool, MIN_BLUR_SIDE};
pub use magnifier::{MagnifierTool, MIN_MAGNIFIER_RADIUS};
pub use shapes::{CircleTool, MIN_CIRCLE_RADIUS, MIN_RECT_SIDE, RECT_CORNER_RADIUS, RectangleTool};
pub use text::TextEditSession;

/// Everything a tool may read while synthesizing an element.
pub struct BuildContext<'a> {
    pub scene: &'a Scene,
    pub renderer: &'a dyn SceneRenderer,
    pub rng: &'a mut StdRng,
    pub style: &'a ToolStyle,
    /// Element to leave out of any capture, normally the tool's own preview.
    pub exclude: Option<ElementId>,
}

/// A drag-to-create tool.
///
/// The same builder produces the translucent preview on every pointer move
/// and the final element on release; the editor owns the gesture itself.
pub trait ShapeTool {
    fn name(&self) -> &'static str;

    /// History action recorded for elements this tool creates.
    fn action(&self) -> ActionKind;

    /// Whether a drag from `anchor` to `current` is big enough to keep.
    fn meets_threshold(&self, anchor: Pos2, current: Pos2) -> bool;

    fn build(
        &self,
        anchor: Pos2,
        current: Pos2,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Element, RenderError>;
}

/// The closed set of drag tools.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawingTool {
    Arrow(ArrowTool),
    Rectangle(RectangleTool),
    Circle(CircleTool),
    Blur(BlurTool),
    Magnifier(MagnifierTool),
}

impl ShapeTool for DrawingTool {
    fn name(&self) -> &'static str {
        match self {
            Self::Arrow(tool) => tool.name(),
            Self::Rectangle(tool) => tool.name(),
            Self::Circle(tool) => tool.name(),
            Self::Blur(tool) => tool.name(),
            Self::Magnifier(tool) => tool.name(),
        }
    }

    fn action(&self) -> ActionKind {
        match self {
            Self::Arrow(tool) => tool.action(),
            Self::Rectangle(tool) => tool.action(),
            Self::Circle(tool) => tool.action(),
            Self::Blur(tool) => tool.action(),
            Self::Magnifier(tool) => tool.action(),
        }
    }

    fn meets_threshold(&self, anchor: Pos2, current: Pos2) -> bool {
        match self {
            Self::Arrow(tool) => tool.meets_threshold(anchor, current),
            Self::Rectangle(tool) => tool.meets_threshold(anchor, current),
            Self::Circle(tool) => tool.meets_threshold(anchor, current),
            Self::Blur(tool) => tool.meets_threshold(anchor, current),
            Self::Magnifier(tool) => tool.meets_threshold(anchor, current),
        }
    }

    fn build(
        &self,
        anchor: Pos2,
        current: Pos2,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Element, RenderError> {
        match self {
            Self::Arrow(tool) => tool.build(anchor, current, ctx),
            Self::Rectangle(tool) => tool.build(anchor, current, ctx),
            Self::Circle(tool) => tool.build(anchor, current, ctx),
            Self::Blur(tool) => tool.build(anchor, current, ctx),
            Self::Magnifier(tool) => tool.build(anchor, current, ctx),
        }
    }
}

/// The single active tool. Arming one replaces whatever was armed before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolMode {
    #[default]
    Idle,
    Arrow,
    Rectangle,
    Circle,
    Blur,
    Magnifier,
    TextPlacement,
}

impl ToolMode {
    pub fn drawing_tool(self) -> Option<DrawingTool> {
        match self {
            ToolMode::Arrow => Some(DrawingTool::Arrow(ArrowTool)),
            ToolMode::Rectangle => Some(DrawingTool::Rectangle(RectangleTool)),
            ToolMode::Circle => Some(DrawingTool::Circle(CircleTool)),
            ToolMode::Blur => Some(DrawingTool::Blur(BlurTool)),
            ToolMode::Magnifier => Some(DrawingTool::Magnifier(MagnifierTool::default())),
            ToolMode::Idle | ToolMode::TextPlacement => None,
        }
    }

    /// History action a tool marks as the "last intended action" when armed.
    pub fn action(self) -> Option<ActionKind> {
        match self {
            ToolMode::TextPlacement => Some(ActionKind::Text),
            mode => mode.drawing_tool().map(|tool| tool.action()),
        }
    }

    pub fn is_armed(self) -> bool {
        self != ToolMode::Idle
    }
}

/// Progress of the pointer gesture for the armed drag tool.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// Waiting for pointer-down.
    #[default]
    Armed,
    Tracking {
        anchor: Pos2,
        /// Current translucent preview in the scene, if one has been built.
        preview: Option<ElementId>,
    },
}
