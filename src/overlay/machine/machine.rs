//! The gesture state machine.
//!
//! Pure state: no ECS access, no rendering. Systems feed it pointer and
//! wheel events in logical coordinates; it tracks the in-flight shape and
//! decides whether the overlay intercepts input at all. In-flight geometry
//! never touches the document or the history until it is finalized.

use bevy::prelude::*;

use crate::constants::{
    HIGHLIGHTER_WIDTH_FACTOR, MIN_FREEHAND_POINT_DISTANCE, WHEEL_PASS_THROUGH_SECS,
};

use super::super::scene::{ShapeKind, ShapeStyle};
use super::super::tools::{ActiveStyle, ReviewTool};

/// A shape under construction, in logical coordinates
#[derive(Debug, Clone)]
pub enum InFlight {
    Path { highlight: bool, points: Vec<Vec2> },
    Arrow { start: Vec2, end: Vec2 },
    Rect { anchor: Vec2, corner: Vec2 },
}

#[derive(Debug, Default)]
enum GesturePhase {
    #[default]
    Idle,
    Drawing {
        shape: InFlight,
        /// Style captured at gesture start; toolbox changes mid-drag take
        /// effect on the next gesture
        style: ShapeStyle,
    },
}

/// What a pointer-down resolved to. Drag-phase tools enter Drawing and
/// produce their mutation on pointer-up; text and eraser act immediately
/// and stay Idle.
#[derive(Debug, PartialEq)]
pub enum DownAction {
    None,
    Began,
    CreateText(Vec2),
    EraseAt(Vec2),
}

#[derive(Resource, Default)]
pub struct ToolMachine {
    phase: GesturePhase,
    /// Wheel pass-through window: until this instant the overlay does not
    /// intercept pointer input, letting the page scroll underneath
    pass_through_until: f64,
}

impl ToolMachine {
    /// Whether the overlay should intercept pointer input right now.
    /// Select is always pass-through; any tool is pass-through inside the
    /// wheel window.
    pub fn intercepts(&self, tool: ReviewTool, now: f64) -> bool {
        tool.is_drawing_tool() && now >= self.pass_through_until
    }

    /// A wheel gesture arrived while a drawing tool is active: open (or
    /// extend) the temporary pass-through window so the user can scroll
    /// the page without switching tools. Ignored mid-drag.
    pub fn notice_wheel(&mut self, now: f64) {
        if matches!(self.phase, GesturePhase::Idle) {
            self.pass_through_until = now + WHEEL_PASS_THROUGH_SECS;
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, GesturePhase::Drawing { .. })
    }

    /// The in-flight shape and its style, for preview rendering
    pub fn in_flight(&self) -> Option<(&InFlight, &ShapeStyle)> {
        match &self.phase {
            GesturePhase::Drawing { shape, style } => Some((shape, style)),
            GesturePhase::Idle => None,
        }
    }

    /// Begin a gesture at a logical position. Callers check
    /// [`intercepts`](Self::intercepts) first.
    pub fn pointer_down(&mut self, tool: ReviewTool, p: Vec2, style: &ActiveStyle) -> DownAction {
        match tool {
            ReviewTool::Select => DownAction::None,
            ReviewTool::Pen | ReviewTool::Highlighter => {
                let highlight = tool == ReviewTool::Highlighter;
                self.phase = GesturePhase::Drawing {
                    shape: InFlight::Path {
                        highlight,
                        points: vec![p],
                    },
                    style: capture_style(style, highlight),
                };
                DownAction::Began
            }
            ReviewTool::Arrow => {
                self.phase = GesturePhase::Drawing {
                    shape: InFlight::Arrow { start: p, end: p },
                    style: capture_style(style, false),
                };
                DownAction::Began
            }
            ReviewTool::Rectangle => {
                self.phase = GesturePhase::Drawing {
                    shape: InFlight::Rect {
                        anchor: p,
                        corner: p,
                    },
                    style: capture_style(style, false),
                };
                DownAction::Began
            }
            // No drag phase: the text box is created immediately and handed
            // to inline editing, the machine stays Idle
            ReviewTool::Text => DownAction::CreateText(p),
            ReviewTool::Eraser => DownAction::EraseAt(p),
        }
    }

    /// Extend the in-flight shape toward a new logical position
    pub fn pointer_move(&mut self, p: Vec2) {
        match &mut self.phase {
            GesturePhase::Drawing { shape, .. } => match shape {
                InFlight::Path { points, .. } => {
                    // Skip points too close to the last one (reduces point count)
                    if let Some(last) = points.last()
                        && p.distance(*last) > MIN_FREEHAND_POINT_DISTANCE
                    {
                        points.push(p);
                    }
                }
                InFlight::Arrow { end, .. } => *end = p,
                InFlight::Rect { corner, .. } => *corner = p,
            },
            GesturePhase::Idle => {}
        }
    }

    /// Finalize the gesture at a logical position. Arrows get their head
    /// geometry computed here; rectangles are normalized on the fly by the
    /// caller-facing geometry constructors. Returns the finished shape, or
    /// None when the gesture degenerated to nothing.
    pub fn pointer_up(&mut self, p: Vec2) -> Option<(ShapeKind, ShapeStyle)> {
        let phase = std::mem::take(&mut self.phase);
        let GesturePhase::Drawing { shape, style } = phase else {
            return None;
        };

        match shape {
            InFlight::Path {
                highlight,
                mut points,
            } => {
                if points.last() != Some(&p) {
                    points.push(p);
                }
                if points.len() < 2 {
                    return None;
                }
                let kind = if highlight {
                    ShapeKind::Highlight { points }
                } else {
                    ShapeKind::Freehand { points }
                };
                Some((kind, style))
            }
            InFlight::Arrow { start, .. } => Some((ShapeKind::arrow(start, p), style)),
            InFlight::Rect { anchor, .. } => {
                let (origin, size) = super::super::scene::normalized_rect(anchor, p);
                Some((ShapeKind::Rectangle { origin, size }, style))
            }
        }
    }

    /// Discard any in-flight shape without committing it (overlay hidden or
    /// torn down mid-drag)
    pub fn cancel(&mut self) {
        self.phase = GesturePhase::Idle;
    }
}

fn capture_style(style: &ActiveStyle, highlight: bool) -> ShapeStyle {
    ShapeStyle {
        stroke: style.stroke.clone(),
        fill: None,
        stroke_width: if highlight {
            style.stroke_width * HIGHLIGHTER_WIDTH_FACTOR
        } else {
            style.stroke_width
        },
    }
}
