// Author: Dustin Pilgrim
// License: MIT

/// Geometry knobs shared by hit-testing, resizing, label placement and damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuning {
    /// Half-size of a handle's square box, in px.
    pub handle_half: i32,
    /// Smallest width/height a resize may produce (except at a flip frame).
    pub min_size: i32,
    /// Inflation applied to a selection when invalidating border + handles.
    pub chrome_margin: i32,
    pub label_pad_x: i32,
    pub label_pad_y: i32,
    /// Gap between the selection and a label placed outside of it.
    pub label_outside: i32,
    /// Inset of a label floated inside the selection.
    pub label_inset: i32,
}

impl Tuning {
    pub fn with_handle_half(mut self, half: i32) -> Self {
        self.handle_half = half.max(1);
        self.label_outside = self.handle_half + 6;
        self
    }

    pub fn with_min_size(mut self, min: i32) -> Self {
        self.min_size = min.max(1);
        self
    }

    /// Thickness of the bare-edge grab strips.
    pub fn edge_grab(&self) -> i32 {
        self.handle_half + 2
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            handle_half: 3,
            min_size: 2,
            chrome_margin: 40,
            label_pad_x: 6,
            label_pad_y: 3,
            label_outside: 3 + 6,
            label_inset: 6,
        }
    }
}
