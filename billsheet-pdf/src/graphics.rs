/// Device RGB color, each channel in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color::gray_const(0.0);
    pub const WHITE: Color = Color::gray_const(1.0);

    const fn gray_const(level: f64) -> Self {
        Color { r: level, g: level, b: level }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color { r, g, b }
    }

    /// Brand colors usually come as 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::rgb(f64::from(r) / 255.0, f64::from(g) / 255.0, f64::from(b) / 255.0)
    }

    pub fn gray(level: f64) -> Self {
        Color::gray_const(level)
    }

    pub(crate) fn channels(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb8_scales_channels() {
        assert_eq!(Color::rgb8(0, 51, 255).channels(), [0.0, 0.2, 1.0]);
        assert_eq!(Color::gray(0.5), Color::rgb(0.5, 0.5, 0.5));
    }
}
