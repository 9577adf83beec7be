use std::time::Duration;

use bon::Builder;

/// Color representation for wheel elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);

/// Slice colors, cycled by participant index.
pub const DEFAULT_PALETTE: [Color; 10] = [
    Color::new(0xff, 0xb6, 0xc1),
    Color::new(0x98, 0xfb, 0x98),
    Color::new(0x87, 0xce, 0xfa),
    Color::new(0xdd, 0xa0, 0xdd),
    Color::new(0xf0, 0xe6, 0x8c),
    Color::new(0xe6, 0xe6, 0xfa),
    Color::new(0xff, 0xa0, 0x7a),
    Color::new(0x98, 0xff, 0x98),
    Color::new(0xb0, 0xe0, 0xe6),
    Color::new(0xff, 0xb6, 0xc1),
];

/// Timing and landing parameters of a single spin.
#[derive(Debug, Clone, Builder)]
pub struct SpinSettings {
    #[builder(default = Duration::from_millis(5000))]
    pub duration: Duration,
    #[builder(default = 4)]
    pub extra_rotations: u32,
    /// Landing position inside the winning slice, as fractions of the slice width.
    #[builder(default = (0.2, 0.8))]
    pub offset_range: (f64, f64),
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone, Builder)]
pub struct WheelConfig {
    #[builder(default = "Prize Wheel".to_string())]
    pub title: String,

    // Surface configuration
    #[builder(default = 600)]
    pub surface_size: u32,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    #[builder(default)]
    pub spin: SpinSettings,

    // Wheel geometry
    #[builder(default = 10.0)]
    pub wheel_margin: f64,
    #[builder(default = 20.0)]
    pub hub_radius: f64,
    #[builder(default = 20.0)]
    pub pointer_size: f64,
    #[builder(default = 0.8)]
    pub label_radius_factor: f64,

    // Labels
    #[builder(default = 8.0)]
    pub min_label_font_size: f32,
    #[builder(default = 14.0)]
    pub max_label_font_size: f32,
    #[builder(default = 20.0)]
    pub placeholder_font_size: f32,
    #[builder(default = "Load participants to start".to_string())]
    pub placeholder_text: String,

    // Colors
    #[builder(default = DEFAULT_PALETTE.to_vec())]
    pub palette: Vec<Color>,
    #[builder(default = Color::new(0xf4, 0xf4, 0xf4))]
    pub background_color: Color,
    #[builder(default = Color::new(0xf0, 0xf0, 0xf0))]
    pub placeholder_color: Color,
    #[builder(default = Color::new(0x66, 0x66, 0x66))]
    pub placeholder_text_color: Color,
    #[builder(default = Color::new(0xff, 0x40, 0x81))]
    pub pointer_color: Color,
    #[builder(default = BLACK)]
    pub outline_color: Color,
    #[builder(default = BLACK)]
    pub label_color: Color,
    #[builder(default = WHITE)]
    pub hub_color: Color,

    // Overlays
    #[builder(default = 18.0)]
    pub banner_font_size: f32,
    #[builder(default = 13.0)]
    pub panel_font_size: f32,
    #[builder(default = Duration::from_secs(3))]
    pub notice_duration: Duration,
    #[builder(default = false)]
    pub debug_overlay: bool,

    /// Raw TrueType/OpenType data used for every label. Without it text is skipped.
    pub font_data: Option<Vec<u8>>,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WheelConfig {
    /// Palette entry for a slice, wrapping around the palette.
    pub fn slice_color(&self, index: usize) -> Color {
        if self.palette.is_empty() {
            return DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()];
        }
        self.palette[index % self.palette.len()]
    }

    /// Label size shrinks as the wheel fills up so names stay inside their slices.
    pub fn label_font_size(&self, participants: usize) -> f32 {
        if participants == 0 {
            return self.max_label_font_size;
        }
        let size = self.surface_size as f32 / (participants as f32 * 1.5);
        let low = self.min_label_font_size.min(self.max_label_font_size);
        let high = self.min_label_font_size.max(self.max_label_font_size);
        size.clamp(low, high)
    }
}
