use serde::{Deserialize, Serialize};

/// A location in logical (document) coordinates, or in screen coordinates
/// when it comes straight from the pointer.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in logical space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Region {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// The four equal sub-regions around the centre, in the fixed order
    /// top-left, top-right, bottom-left, bottom-right.
    pub fn quadrants(&self) -> [Region; 4] {
        let w2 = self.w / 2.0;
        let h2 = self.h / 2.0;
        let c = self.center();
        [
            Region::new(self.x, self.y, w2, h2),
            Region::new(c.x, self.y, w2, h2),
            Region::new(self.x, c.y, w2, h2),
            Region::new(c.x, c.y, w2, h2),
        ]
    }
}

/// Size of the drawing surface measured in logical units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stage {
    pub width: f64,
    pub height: f64,
}

impl Stage {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl From<Stage> for Region {
    fn from(stage: Stage) -> Self {
        Region::new(0.0, 0.0, stage.width, stage.height)
    }
}

/// Visual units per logical unit, independently per axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

impl Scale {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_logical(&self, visual: Point) -> Point {
        Point::new(visual.x / self.x, visual.y / self.y)
    }

    pub fn to_visual(&self, logical: Point) -> Point {
        Point::new(logical.x * self.x, logical.y * self.y)
    }
}
