use serde::{Deserialize, Serialize};

/// English Metric Units per inch. 1 EMU = 1/914400 inch = 1/360000 cm.
pub const EMU_PER_INCH: f64 = 914_400.0;
/// Points per inch.
pub const PT_PER_INCH: f64 = 72.0;

/// Converts inches to whole EMUs, the unit used by OOXML drawing parts.
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// A width and height, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle on a page. `x`/`y` is the top-left corner.
/// All values are in inches, measured from the top-left of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Frame {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Bottom edge of the frame.
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Right edge of the frame.
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Returns the largest frame with the given aspect ratio (width / height)
    /// that fits inside `self`, centred on both axes.
    ///
    /// A non-positive or non-finite ratio leaves the frame unchanged.
    pub fn contain(&self, aspect_ratio: f64) -> Frame {
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 || self.h <= 0.0 {
            return *self;
        }
        let own_ratio = self.w / self.h;
        if aspect_ratio > own_ratio {
            // Wider than the box: full width, reduced height.
            let h = self.w / aspect_ratio;
            Frame::new(self.x, self.y + (self.h - h) / 2.0, self.w, h)
        } else {
            let w = self.h * aspect_ratio;
            Frame::new(self.x + (self.w - w) / 2.0, self.y, w, self.h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contain_keeps_wide_images_full_width() {
        let frame = Frame::new(5.2, 1.8, 4.5, 4.0);
        let fitted = frame.contain(2.0);
        assert_eq!(fitted.w, 4.5);
        assert!((fitted.h - 2.25).abs() < 1e-9);
        assert!((fitted.y - (1.8 + 0.875)).abs() < 1e-9);
    }

    #[test]
    fn contain_centres_tall_images_horizontally() {
        let frame = Frame::new(0.0, 0.0, 4.0, 4.0);
        let fitted = frame.contain(0.5);
        assert_eq!(fitted.h, 4.0);
        assert_eq!(fitted.w, 2.0);
        assert_eq!(fitted.x, 1.0);
    }

    #[test]
    fn contain_ignores_invalid_ratio() {
        let frame = Frame::new(1.0, 1.0, 2.0, 2.0);
        assert_eq!(frame.contain(f64::NAN), frame);
        assert_eq!(frame.contain(0.0), frame);
    }

    #[test]
    fn inches_convert_to_emu() {
        assert_eq!(inches_to_emu(1.0), 914_400);
        assert_eq!(inches_to_emu(10.0), 9_144_000);
    }
}
