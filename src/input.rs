//! Pointer input to orientation mapping.
//!
//! The viewport is split horizontally: the upper part shows the sphere and
//! accepts drag-to-look, the bottom strip is the overlay where a tap or drag
//! jumps straight to the matching orientation.

use crate::camera::Orientation;
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A single pointer event in physical viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self { kind, x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Sphere,
    Overlay,
}

impl Region {
    pub fn of(y: f32, height: f32, split_fraction: f32) -> Self {
        if y < height * (1.0 - split_fraction) {
            Region::Sphere
        } else {
            Region::Overlay
        }
    }
}

pub struct TouchController {
    sensitivity: f32,
    split_fraction: f32,
    previous: Option<Vec2>,
}

impl TouchController {
    pub fn new(sensitivity: f32, split_fraction: f32) -> Self {
        Self { sensitivity, split_fraction, previous: None }
    }

    /// Applies one event to `orientation`. Returns `true` when the angles
    /// changed and a redraw should be scheduled.
    pub fn handle(&mut self, event: PointerEvent, viewport: (u32, u32), orientation: &mut Orientation) -> bool {
        let (width, height) = (viewport.0 as f32, viewport.1 as f32);
        let current = Vec2::new(event.x, event.y);
        let previous = self.previous.replace(current);

        if width <= 0.0 || height <= 0.0 {
            return false;
        }

        let region = Region::of(event.y, height, self.split_fraction);
        match (event.kind, region) {
            (PointerKind::Down, Region::Overlay) => {
                *orientation = self.overlay_orientation(current, width, height);
                true
            }
            (PointerKind::Move, Region::Overlay) if previous.is_some() => {
                *orientation = self.overlay_orientation(current, width, height);
                true
            }
            (PointerKind::Move, Region::Sphere) => match previous {
                Some(previous) => {
                    let delta = (current - previous) * self.sensitivity;
                    orientation.angle_x += delta.x;
                    orientation.angle_y += delta.y;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Absolute mapping of the overlay strip: full width spans 360° of yaw,
    /// strip height spans 180° of pitch from +90 at its top edge.
    pub fn overlay_orientation(&self, point: Vec2, width: f32, height: f32) -> Orientation {
        let strip_top = height * (1.0 - self.split_fraction);
        let strip_height = height * self.split_fraction;
        Orientation {
            angle_x: -point.x / width * 360.0 - 90.0,
            angle_y: 90.0 - 180.0 / strip_height * (point.y - strip_top),
        }
    }
}
