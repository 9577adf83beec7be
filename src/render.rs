use crate::config::{Color, WheelConfig};
use crate::spin::slice_width;

// ============================================================================
// GEOMETRY AND STYLES
// ============================================================================

/// Where the wheel sits on the drawing surface, in surface units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

impl WheelGeometry {
    pub fn for_surface(size: u32, margin: f64) -> Self {
        let center = size as f64 / 2.0;
        Self {
            cx: center,
            cy: center,
            radius: (center - margin).max(1.0),
        }
    }
}

/// One participant's wedge. Angles are in radians, clockwise from three o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub start_angle: f64,
    pub sweep: f64,
    pub color: Color,
}

impl Slice {
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + self.sweep / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliceStyle {
    pub font_size: f32,
    /// Distance of the label center from the hub, as a fraction of the radius.
    pub label_radius_factor: f64,
    pub label_color: Color,
    pub outline_color: Color,
    pub hub_radius: f64,
    pub hub_color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderStyle {
    pub fill: Color,
    pub outline: Color,
    pub text_color: Color,
    pub font_size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerStyle {
    pub size: f64,
    pub fill: Color,
    pub outline: Color,
}

// ============================================================================
// RENDERER CAPABILITY
// ============================================================================

/// Drawing surface the wheel is rendered onto. Wheel logic only talks to this
/// trait, so it runs the same against a window framebuffer or a recording.
pub trait Renderer {
    fn clear(&mut self, color: Color);
    /// Fills every slice, labels it along its mid-angle and covers the middle with the hub.
    fn draw_slices(&mut self, geometry: &WheelGeometry, slices: &[Slice], style: &SliceStyle);
    fn draw_placeholder(&mut self, geometry: &WheelGeometry, message: &str, style: &PlaceholderStyle);
    /// Downward-pointing marker at the top of the wheel.
    fn draw_pointer(&mut self, geometry: &WheelGeometry, style: &PointerStyle);
}

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Slices {
        geometry: WheelGeometry,
        slices: Vec<Slice>,
        style: SliceStyle,
    },
    Placeholder {
        geometry: WheelGeometry,
        message: String,
        style: PlaceholderStyle,
    },
    Pointer {
        geometry: WheelGeometry,
        style: PointerStyle,
    },
}

/// Records draw calls so a frame can be inspected or replayed later.
#[derive(Debug, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn render<R: Renderer + ?Sized>(&self, target: &mut R) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => target.clear(*color),
                DrawCommand::Slices {
                    geometry,
                    slices,
                    style,
                } => target.draw_slices(geometry, slices, style),
                DrawCommand::Placeholder {
                    geometry,
                    message,
                    style,
                } => target.draw_placeholder(geometry, message, style),
                DrawCommand::Pointer { geometry, style } => target.draw_pointer(geometry, style),
            }
        }
    }
}

impl Renderer for Scene {
    fn clear(&mut self, color: Color) {
        self.add_command(DrawCommand::Clear(color));
    }

    fn draw_slices(&mut self, geometry: &WheelGeometry, slices: &[Slice], style: &SliceStyle) {
        self.add_command(DrawCommand::Slices {
            geometry: *geometry,
            slices: slices.to_vec(),
            style: style.clone(),
        });
    }

    fn draw_placeholder(&mut self, geometry: &WheelGeometry, message: &str, style: &PlaceholderStyle) {
        self.add_command(DrawCommand::Placeholder {
            geometry: *geometry,
            message: message.to_string(),
            style: style.clone(),
        });
    }

    fn draw_pointer(&mut self, geometry: &WheelGeometry, style: &PointerStyle) {
        self.add_command(DrawCommand::Pointer {
            geometry: *geometry,
            style: style.clone(),
        });
    }
}

// ============================================================================
// WHEEL LAYOUT
// ============================================================================

/// Partitions the circle into one equal slice per participant, rotated by `angle`.
pub fn layout_slices(participants: &[String], angle: f64, config: &WheelConfig) -> Vec<Slice> {
    let sweep = slice_width(participants.len());
    participants
        .iter()
        .enumerate()
        .map(|(index, name)| Slice {
            label: name.clone(),
            start_angle: index as f64 * sweep + angle,
            sweep,
            color: config.slice_color(index),
        })
        .collect()
}

/// Draws one full frame of the wheel. An empty wheel gets the placeholder disc
/// instead of slices and no pointer.
pub fn render_wheel<R: Renderer + ?Sized>(
    renderer: &mut R,
    participants: &[String],
    angle: f64,
    config: &WheelConfig,
) {
    let geometry = WheelGeometry::for_surface(config.surface_size, config.wheel_margin);
    renderer.clear(config.background_color);

    if participants.is_empty() {
        renderer.draw_placeholder(
            &geometry,
            &config.placeholder_text,
            &PlaceholderStyle {
                fill: config.placeholder_color,
                outline: config.outline_color,
                text_color: config.placeholder_text_color,
                font_size: config.placeholder_font_size,
            },
        );
        return;
    }

    let slices = layout_slices(participants, angle, config);
    renderer.draw_slices(
        &geometry,
        &slices,
        &SliceStyle {
            font_size: config.label_font_size(participants.len()),
            label_radius_factor: config.label_radius_factor,
            label_color: config.label_color,
            outline_color: config.outline_color,
            hub_radius: config.hub_radius,
            hub_color: config.hub_color,
        },
    );
    renderer.draw_pointer(
        &geometry,
        &PointerStyle {
            size: config.pointer_size,
            fill: config.pointer_color,
            outline: config.outline_color,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PALETTE;
    use std::f64::consts::TAU;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("P{i}")).collect()
    }

    #[test]
    fn empty_wheel_draws_placeholder_only() {
        let mut scene = Scene::new();
        render_wheel(&mut scene, &[], 0.0, &WheelConfig::default());
        assert_eq!(scene.commands().len(), 2);
        match &scene.commands()[1] {
            DrawCommand::Placeholder { message, .. } => {
                assert_eq!(message, "Load participants to start")
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn slices_cover_the_full_circle_from_the_current_angle() {
        let slices = layout_slices(&names(12), 0.5, &WheelConfig::default());
        assert_eq!(slices.len(), 12);
        assert_eq!(slices[0].start_angle, 0.5);
        let last = &slices[11];
        assert!((last.start_angle + last.sweep - (0.5 + TAU)).abs() < 1e-9);
        assert_eq!(slices[10].color, DEFAULT_PALETTE[0]);
        assert_eq!(slices[11].color, DEFAULT_PALETTE[1]);
    }

    #[test]
    fn populated_wheel_draws_slices_then_pointer() {
        let mut scene = Scene::new();
        render_wheel(&mut scene, &names(3), 1.0, &WheelConfig::default());
        let commands = scene.commands();
        assert!(matches!(commands[0], DrawCommand::Clear(_)));
        match &commands[1] {
            DrawCommand::Slices { slices, style, geometry } => {
                assert_eq!(slices.len(), 3);
                assert_eq!(style.font_size, 14.0);
                assert_eq!(geometry.radius, 290.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(matches!(commands[2], DrawCommand::Pointer { .. }));
    }

    #[test]
    fn scene_replays_into_another_renderer() {
        let mut scene = Scene::new();
        render_wheel(&mut scene, &names(4), 0.0, &WheelConfig::default());
        let mut copy = Scene::new();
        scene.render(&mut copy);
        assert_eq!(scene.commands(), copy.commands());
    }
}
