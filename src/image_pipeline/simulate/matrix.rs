/// Linear map from input RGB to output RGB: `out[c] = sum_k rows[c][k] * in[k]`.
///
/// Rows are not normalised. Rows that do not sum to ~1 shift luminance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTransformMatrix {
    rows: [[f32; 3]; 3],
}

impl ColorTransformMatrix {
    pub const IDENTITY: Self = Self::new([
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ]);

    pub const fn new(rows: [[f32; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Row-major coefficients, as they are usually published.
    pub const fn from_flat(m: [f32; 9]) -> Self {
        Self::new([[m[0], m[1], m[2]], [m[3], m[4], m[5]], [m[6], m[7], m[8]]])
    }

    /// Partial desaturation toward Rec.709 luma, `amount` in 0..=1 (the CSS
    /// `grayscale()` filter matrix).
    pub fn grayscale(amount: f32) -> Self {
        let k = 1.0 - amount.clamp(0.0, 1.0);
        Self::new([
            [0.2126 + 0.7874 * k, 0.7152 - 0.7152 * k, 0.0722 - 0.0722 * k],
            [0.2126 - 0.2126 * k, 0.7152 + 0.2848 * k, 0.0722 - 0.0722 * k],
            [0.2126 - 0.2126 * k, 0.7152 - 0.7152 * k, 0.0722 + 0.9278 * k],
        ])
    }

    pub fn rows(&self) -> &[[f32; 3]; 3] {
        &self.rows
    }

    pub fn row_sums(&self) -> [f32; 3] {
        self.rows.map(|row| row.iter().sum())
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Unrounded projection of one RGB triple.
    #[inline]
    pub fn project(&self, [r, g, b]: [f32; 3]) -> [f32; 3] {
        self.rows.map(|row| row[0] * r + row[1] * g + row[2] * b)
    }

    /// Projects an 8-bit triple, rounding to nearest and clamping to 0..=255.
    #[inline]
    pub fn apply(&self, rgb: [u8; 3]) -> [u8; 3] {
        self.project(rgb.map(f32::from))
            .map(|v| v.round().clamp(0.0, 255.0) as u8)
    }
}

impl Default for ColorTransformMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}
