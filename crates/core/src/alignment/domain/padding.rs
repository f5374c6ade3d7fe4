/// Smallest padding the rescale sliders allow.
pub const PADDING_MIN: u32 = 128;
/// Largest padding the rescale sliders allow.
pub const PADDING_MAX: u32 = 256;
/// Slider granularity.
pub const PADDING_STEP: u32 = 8;
pub const PADDING_DEFAULT: u32 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaddingSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl PaddingSide {
    pub const ALL: [PaddingSide; 4] = [
        PaddingSide::Top,
        PaddingSide::Bottom,
        PaddingSide::Left,
        PaddingSide::Right,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PaddingSide::Top => "top",
            PaddingSide::Bottom => "bottom",
            PaddingSide::Left => "left",
            PaddingSide::Right => "right",
        }
    }
}

/// Background kept around the face when rescaling, in pixels of the
/// rescaled frame measured from the eye midpoint.
///
/// Every side is always in `[PADDING_MIN, PADDING_MAX]` on the
/// `PADDING_STEP` grid; setters clamp and snap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Padding {
    top: u32,
    bottom: u32,
    left: u32,
    right: u32,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: PADDING_DEFAULT,
            bottom: PADDING_DEFAULT,
            left: PADDING_DEFAULT,
            right: PADDING_DEFAULT,
        }
    }
}

impl Padding {
    pub fn new(top: i64, bottom: i64, left: i64, right: i64) -> Self {
        Self {
            top: snap(top),
            bottom: snap(bottom),
            left: snap(left),
            right: snap(right),
        }
    }

    pub fn top(&self) -> u32 {
        self.top
    }

    pub fn bottom(&self) -> u32 {
        self.bottom
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn right(&self) -> u32 {
        self.right
    }

    pub fn get(&self, side: PaddingSide) -> u32 {
        match side {
            PaddingSide::Top => self.top,
            PaddingSide::Bottom => self.bottom,
            PaddingSide::Left => self.left,
            PaddingSide::Right => self.right,
        }
    }

    pub fn set(&mut self, side: PaddingSide, value: i64) {
        let value = snap(value);
        match side {
            PaddingSide::Top => self.top = value,
            PaddingSide::Bottom => self.bottom = value,
            PaddingSide::Left => self.left = value,
            PaddingSide::Right => self.right = value,
        }
    }
}

/// Clamp into range, then round to the nearest grid point.
pub fn snap(value: i64) -> u32 {
    let min = PADDING_MIN as i64;
    let clamped = value.clamp(min, PADDING_MAX as i64);
    let step = PADDING_STEP as i64;
    let snapped = min + ((clamped - min) + step / 2) / step * step;
    snapped.min(PADDING_MAX as i64) as u32
}
