//! Screen coordinates: match locations and search regions

use serde::Serialize;
use std::fmt;

/// A point on screen where a match was anchored (top-left of the matched window)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub x: u32,
    pub y: u32,
}

impl Location {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Shift the location, saturating at the screen origin
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add_signed(dx),
            y: self.y.saturating_add_signed(dy),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Axis-aligned rectangle used to restrict a search or to draw a highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a full-screen region
    pub fn full_screen(screen_width: u32, screen_height: u32) -> Self {
        Self::new(0, 0, screen_width, screen_height)
    }

    /// Region of `width` x `height` anchored at a match location
    pub fn at(location: Location, width: u32, height: u32) -> Self {
        Self::new(location.x, location.y, width, height)
    }

    /// Parse "x,y,width,height" (e.g. "0,0,800,600")
    pub fn parse(value: &str) -> Option<Self> {
        let parts: Vec<&str> = value.split(',').collect();
        if parts.len() == 4
            && let (Ok(x), Ok(y), Ok(width), Ok(height)) = (
                parts[0].trim().parse::<u32>(),
                parts[1].trim().parse::<u32>(),
                parts[2].trim().parse::<u32>(),
                parts[3].trim().parse::<u32>(),
            )
        {
            return Some(Self::new(x, y, width, height));
        }
        None
    }

    /// Clip region to screen boundaries, `None` when nothing of it is on screen
    pub fn clip_to(&self, screen_width: u32, screen_height: u32) -> Option<Self> {
        if self.x >= screen_width || self.y >= screen_height {
            return None;
        }
        let clipped = Self {
            x: self.x,
            y: self.y,
            width: self.width.min(screen_width - self.x),
            height: self.height.min(screen_height - self.y),
        };
        clipped.is_valid().then_some(clipped)
    }

    /// Check if this region contains a point
    pub fn contains(&self, location: Location) -> bool {
        location.x >= self.x
            && location.x - self.x < self.width
            && location.y >= self.y
            && location.y - self.y < self.height
    }

    /// Check if `other` lies completely inside this region
    pub fn contains_region(&self, other: &Region) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x as u64 + other.width as u64 <= self.x as u64 + self.width as u64
            && other.y as u64 + other.height as u64 <= self.y as u64 + self.height as u64
    }

    /// Check if the two regions share at least one pixel
    pub fn overlaps(&self, other: &Region) -> bool {
        let (ax2, ay2) = (
            self.x as u64 + self.width as u64,
            self.y as u64 + self.height as u64,
        );
        let (bx2, by2) = (
            other.x as u64 + other.width as u64,
            other.y as u64 + other.height as u64,
        );
        (self.x as u64) < bx2
            && (other.x as u64) < ax2
            && (self.y as u64) < by2
            && (other.y as u64) < ay2
    }

    /// Get the center point of this region
    pub fn center(&self) -> Location {
        Location::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn top_left(&self) -> Location {
        Location::new(self.x, self.y)
    }

    /// Check if this region is valid (non-zero dimensions)
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{},{}]", self.x, self.y, self.width, self.height)
    }
}
