//! Camera that follows a target while staying inside the level.
//!
//! Scrolling is done purely through the render offset: entities keep their
//! world positions, so collision never has to reconcile screen and world
//! coordinates.

use crate::geometry::Body;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub level_width: f32,
    pub level_height: f32,
    pub screen_width: f32,
    pub screen_height: f32,
    /// Added to world coordinates to get screen coordinates.  Always `<= 0`.
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Camera {
    pub fn new(level_width: f32, level_height: f32, screen_width: f32, screen_height: f32) -> Self {
        Camera {
            level_width,
            level_height,
            screen_width,
            screen_height,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Smallest legal offset on an axis.  A level narrower than the screen
    /// pins the offset at zero.
    fn min_offset(level: f32, screen: f32) -> f32 {
        -(level - screen).max(0.0)
    }

    /// Centre the target on screen, clamped to the level edges.
    pub fn follow(&mut self, target: &Body) {
        let (cx, cy) = target.center();
        let x = -cx + self.screen_width / 2.0;
        let y = -cy + self.screen_height / 2.0;

        self.offset_x = x.clamp(Self::min_offset(self.level_width, self.screen_width), 0.0);
        self.offset_y = y.clamp(Self::min_offset(self.level_height, self.screen_height), 0.0);
    }

    pub fn resize(&mut self, screen_width: f32, screen_height: f32) {
        self.screen_width = screen_width;
        self.screen_height = screen_height;
    }

    /// World body to screen body.
    pub fn apply(&self, body: &Body) -> Body {
        body.translated(self.offset_x, self.offset_y)
    }

    /// The visible part of the world, in world coordinates.
    pub fn view(&self) -> Body {
        Body::new(-self.offset_x, -self.offset_y, self.screen_width, self.screen_height)
    }
}
