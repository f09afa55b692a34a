use glam::Vec2;

/// Drawable area in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }

    /// Normalized device coordinates to pixels, origin top-left.
    #[inline]
    pub fn ndc_to_pixels(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        )
    }
}

/// Latest pointer position in normalized device coordinates, +Y up.
///
/// Written by the pointer handler, read once per frame. Only the most recent
/// sample is kept. The default is the viewport centre.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Normalize a client-pixel position inside `viewport`.
    ///
    /// An empty viewport, or a position outside it, produces a non-finite
    /// state, which hit-testing treats as a miss.
    pub fn from_client(client_x: f32, client_y: f32, viewport: Viewport) -> Self {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return Self::outside();
        }
        let x = (client_x / viewport.width) * 2.0 - 1.0;
        let y = -(client_y / viewport.height) * 2.0 + 1.0;
        if !(-1.0..=1.0).contains(&x) || !(-1.0..=1.0).contains(&y) {
            return Self::outside();
        }
        Self { x, y }
    }

    /// Pointer that is not over the viewport.
    #[inline]
    pub fn outside() -> Self {
        Self::new(f32::NAN, f32::NAN)
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn ndc(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}
