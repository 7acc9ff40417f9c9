/// An RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB` or `#RRGGBB`, with or without the leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let (r, g, b) = match bytes.len() {
            3 => (
                hex_val(bytes[0])? * 17,
                hex_val(bytes[1])? * 17,
                hex_val(bytes[2])? * 17,
            ),
            6 => (
                hex_val(bytes[0])? << 4 | hex_val(bytes[1])?,
                hex_val(bytes[2])? << 4 | hex_val(bytes[3])?,
                hex_val(bytes[4])? << 4 | hex_val(bytes[5])?,
            ),
            _ => return None,
        };
        Some(Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            1.0,
        ))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// The opposite of this color on the black/white axis.
    pub fn inverted(self) -> Self {
        Self::rgba(1.0 - self.r, 1.0 - self.g, 1.0 - self.b, self.a)
    }

    /// CSS `rgba(...)` string for Canvas2D fill/stroke styles.
    pub fn to_css(&self) -> String {
        let r = (self.r.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (self.g.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (self.b.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("rgba({r}, {g}, {b}, {})", self.a.clamp(0.0, 1.0))
    }
}
