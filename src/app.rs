use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use tracing::{debug, error, info, warn};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::canvas::{load_font, Align, Canvas};
use crate::config::{Color, BLACK, WHITE};
use crate::error::WheelError;
use crate::ledger::PendingResult;
use crate::spin::normalize_angle;
use crate::wheel::{Step, Wheel};

/// Everything the user can ask the wheel to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Spin,
    Record,
    Dismiss,
    /// Loads the data file when empty, resets when loaded.
    ToggleLoad,
    Reload,
    LoadFile(PathBuf),
    TogglePanel,
    Quit,
}

impl Control {
    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Named(NamedKey::Space) => Some(Control::Spin),
            Key::Named(NamedKey::Enter) => Some(Control::Record),
            Key::Named(NamedKey::Delete) => Some(Control::Dismiss),
            Key::Named(NamedKey::F5) => Some(Control::Reload),
            Key::Named(NamedKey::Tab) => Some(Control::TogglePanel),
            Key::Named(NamedKey::Escape) => Some(Control::Quit),
            Key::Character(c) => match c.to_ascii_lowercase().as_str() {
                "r" => Some(Control::Record),
                "d" => Some(Control::Dismiss),
                "l" => Some(Control::ToggleLoad),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Notice {
    message: String,
    expires_at: Instant,
}

/// The interactive host around a [`Wheel`]: turns controls into transitions, keeps
/// user-facing notices, and paints overlays on top of the wheel.
pub struct App {
    wheel: Wheel,
    data_path: Option<PathBuf>,
    font: Option<Font<'static>>,
    notice: Option<Notice>,
    show_panel: bool,
}

impl App {
    pub fn new(wheel: Wheel, data_path: Option<PathBuf>) -> Result<Self, WheelError> {
        let font = wheel.config().font_data.clone().map(load_font).transpose()?;
        if font.is_none() {
            warn!("no font configured, labels will not be drawn");
        }
        Ok(Self {
            wheel,
            data_path,
            font,
            notice: None,
            show_panel: true,
        })
    }

    pub fn wheel(&self) -> &Wheel {
        &self.wheel
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.message.as_str())
    }

    pub fn panel_visible(&self) -> bool {
        self.show_panel
    }

    /// Loads the configured data file. A missing file is only reported when
    /// `required` is set, i.e. the user named it. The panel collapses once data is on
    /// the wheel.
    pub fn startup(&mut self, required: bool) {
        let Some(path) = self.data_path.clone() else {
            debug!("no data file configured");
            return;
        };
        if !required && !path.exists() {
            debug!(path = %path.display(), "data file not found");
            return;
        }
        if self.load_path(&path) {
            self.show_panel = false;
        }
    }

    pub fn data_path(&self) -> Option<&Path> {
        self.data_path.as_deref()
    }

    /// Applies one control. Returns `false` when the app should quit.
    pub fn handle(&mut self, control: Control) -> bool {
        let outcome = match control {
            Control::Spin => self.wheel.spin().map(|_| ()),
            Control::Record => self.wheel.record().map(|record| {
                self.notify(format!("Recorded: {} - {}", record.name, record.prize));
            }),
            Control::Dismiss => self.wheel.dismiss().map(|pending| {
                self.notify(format!("Dismissed: {}", pending.name));
            }),
            Control::ToggleLoad => {
                if self.wheel.is_loaded() {
                    self.wheel.reset();
                } else if let Some(path) = self.data_path.clone() {
                    self.load_path(&path);
                } else {
                    self.notify("No data file given; drop one onto the window".to_string());
                }
                Ok(())
            }
            Control::Reload => {
                if let Some(path) = self.data_path.clone() {
                    self.load_path(&path);
                }
                Ok(())
            }
            Control::LoadFile(path) => {
                if self.load_path(&path) {
                    self.data_path = Some(path);
                }
                Ok(())
            }
            Control::TogglePanel => {
                self.show_panel = !self.show_panel;
                Ok(())
            }
            Control::Quit => return false,
        };

        if let Err(err) = outcome {
            if err.is_spin_gate() {
                debug!(%err, "control rejected");
            }
            self.notify(err.to_string());
        }
        true
    }

    /// Returns whether the file made it onto the wheel.
    fn load_path(&mut self, path: &Path) -> bool {
        match self.wheel.load_file(path) {
            Ok(()) => {
                self.notice = None;
                true
            }
            Err(err) => {
                error!(path = %path.display(), %err, "load failed");
                self.notify(err.to_string());
                false
            }
        }
    }

    fn notify(&mut self, message: String) {
        self.notice = Some(Notice {
            message,
            expires_at: Instant::now() + self.wheel.config().notice_duration,
        });
    }

    /// Steps the spin animation and expires old notices.
    pub fn tick(&mut self, dt: Duration) -> Step {
        if self
            .notice
            .as_ref()
            .is_some_and(|n| Instant::now() >= n.expires_at)
        {
            self.notice = None;
        }
        self.wheel.advance(dt)
    }

    // ========================================================================
    // RENDERING
    // ========================================================================

    pub fn draw(&self, frame: &mut [u8], width: usize, height: usize) {
        let mut canvas = Canvas::new(frame, width, height).with_font(self.font.as_ref());
        self.wheel.draw(&mut canvas);
        self.draw_overlays(&mut canvas);
    }

    fn draw_overlays(&self, canvas: &mut Canvas) {
        let config = self.wheel.config();
        let size = canvas.width().min(canvas.height()) as i32;

        if self.show_panel {
            let mut lines = vec!["Winners".to_string()];
            lines.extend(
                self.wheel
                    .history()
                    .take(8)
                    .map(|w| format!("{} - {}", w.name, w.prize)),
            );
            lines.push(String::new());
            lines.push("Prizes left".to_string());
            lines.extend(
                self.wheel
                    .prizes()
                    .iter()
                    .map(|p| format!("{} x{}", p.name, p.quantity)),
            );
            draw_text_block(canvas, 8, 8, &lines, config.panel_font_size);
        }

        let banner = match (self.wheel.pending(), &self.notice) {
            (_, Some(notice)) => Some((notice.message.clone(), Color::new(0xb0, 0x30, 0x30))),
            (Some(pending), None) => Some((
                pending_banner(pending),
                Color::new(0x2e, 0x7d, 0x32),
            )),
            (None, None) => None,
        };
        if let Some((text, fill)) = banner {
            let height = (config.banner_font_size * 2.0) as i32;
            let top = size - height - 8;
            canvas.fill_rect(0, top, canvas.width() as i32, height, fill, 0.85);
            canvas.draw_text(
                canvas.width() as i32 / 2,
                top + height / 2,
                &text,
                config.banner_font_size,
                WHITE,
                Align::Center,
            );
        }

        if config.debug_overlay {
            let degrees = normalize_angle(-self.wheel.current_angle()).to_degrees();
            let slice = self.wheel.participant_under_pointer().unwrap_or("N/A");
            let text = format!("{degrees:.2}° {slice}");
            let x = size - canvas.text_width(&text, config.panel_font_size) - 8;
            canvas.draw_text(x, 12, &text, config.panel_font_size, BLACK, Align::Left);
        }
    }

    // ========================================================================
    // WINDOW LOOP
    // ========================================================================

    pub fn run(mut self) -> Result<(), WheelError> {
        let config = self.wheel.config().clone();
        let surface = config.surface_size;

        let event_loop = EventLoop::new().map_err(|e| WheelError::Window(e.to_string()))?;
        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(surface as f64, surface as f64))
            .with_min_inner_size(LogicalSize::new(200.0, 200.0))
            .build(&event_loop)
            .map_err(|e| WheelError::Window(e.to_string()))?;
        let window = Arc::new(window);
        let window_clone = window.clone();

        // The buffer stays at the logical surface size; pixels scales it to the window.
        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(surface, surface, surface_texture)
            .map_err(|e| WheelError::Surface(e.to_string()))?;

        let frame_duration = Duration::from_secs_f64(1.0 / config.max_framerate.max(1.0));
        let mut last_frame = Instant::now();
        let mut last_tick = Instant::now();
        info!(surface, "window open");

        event_loop
            .run(move |event, window_target| {
                window_target.set_control_flow(ControlFlow::Poll);
                match event {
                    Event::WindowEvent { event, .. } => match event {
                        WindowEvent::CloseRequested => window_target.exit(),
                        WindowEvent::Resized(new_size) => {
                            if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                                warn!(%err, "surface resize failed");
                            }
                        }
                        WindowEvent::KeyboardInput { event, .. }
                            if event.state == ElementState::Pressed && !event.repeat =>
                        {
                            if let Some(control) = Control::from_key(&event.logical_key) {
                                if !self.handle(control) {
                                    window_target.exit();
                                }
                            }
                        }
                        WindowEvent::DroppedFile(path) => {
                            self.handle(Control::LoadFile(path));
                        }
                        WindowEvent::RedrawRequested => {
                            let now = Instant::now();
                            self.tick(now - last_tick);
                            last_tick = now;

                            self.draw(pixels.frame_mut(), surface as usize, surface as usize);
                            if let Err(err) = pixels.render() {
                                error!(%err, "render failed");
                                window_target.exit();
                            }
                        }
                        _ => {}
                    },
                    Event::AboutToWait => {
                        if last_frame.elapsed() >= frame_duration {
                            window_clone.request_redraw();
                            last_frame = Instant::now();
                        }
                    }
                    _ => {}
                }
            })
            .map_err(|e| WheelError::Window(e.to_string()))
    }
}

fn pending_banner(pending: &PendingResult) -> String {
    let mut text = format!("Winner: {} - Prize: {}", pending.name, pending.prize);
    if pending.granted {
        text.push_str(" (granted)");
    }
    text
}

fn draw_text_block(canvas: &mut Canvas, x: i32, y: i32, lines: &[String], font_size: f32) {
    let line_height = (font_size * 1.4) as i32;
    let width = lines
        .iter()
        .map(|line| canvas.text_width(line, font_size))
        .max()
        .unwrap_or(0)
        + 16;
    let height = line_height * lines.len() as i32 + 8;
    canvas.fill_rect(x, y, width, height, WHITE, 0.8);
    for (i, line) in lines.iter().enumerate() {
        let cy = y + 4 + line_height * i as i32 + line_height / 2;
        canvas.draw_text(x + 8, cy, line, font_size, BLACK, Align::Left);
    }
}
