//! Axis-aligned bodies and the shared collision capability.
//!
//! World units follow screen conventions: `x` grows to the right and `y`
//! grows downward, so a body's `bottom()` is `y + height`.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Axis-aligned rectangle in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Body {
    /// Build a body without checking its size.  Callers that take sizes from
    /// outside the crate should go through [`Body::try_new`].
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Body { x, y, width, height }
    }

    pub fn try_new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, GeometryError> {
        // `!(w > 0)` also rejects NaN
        if !(width > 0.0) || !(height > 0.0) {
            return Err(GeometryError::DegenerateBody { width, height });
        }
        Ok(Body::new(x, y, width, height))
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.width;
    }

    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.height;
    }

    /// A copy moved by `(dx, dy)`.  Used for look-ahead checks so the original body is
    /// never touched.
    pub fn translated(&self, dx: f32, dy: f32) -> Body {
        Body {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Strict overlap: bodies that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Body) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Body) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }
}

/// Anything that occupies a rectangle in the world.
pub trait Collidable {
    fn body(&self) -> &Body;

    fn collides_with<C: Collidable + ?Sized>(&self, other: &C) -> bool {
        self.body().overlaps(other.body())
    }
}

impl Collidable for Body {
    fn body(&self) -> &Body {
        self
    }
}

/// Every item of `others` whose body overlaps `body`.
pub fn overlapping<'a, C: Collidable>(body: &'a Body, others: &'a [C]) -> impl Iterator<Item = &'a C> + 'a {
    others.iter().filter(move |o| body.overlaps(o.body()))
}
