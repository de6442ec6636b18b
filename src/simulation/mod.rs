//! Simulation module for scene management and animation.
//!
//! Ties generation and rendering together: owns the assembled scene state,
//! the per-frame scheduler, and the input/time bookkeeping they share.

pub mod frame;
pub mod scene;

pub use frame::{FramePacing, FrameScheduler};
pub use scene::{Scene, SceneConfig};

use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Arrow keys pan by this many pixels per press.
const KEY_PAN_STEP: f32 = 7.0;

/// Folded window-event state, drained once per tick by the orbit controls.
#[derive(Debug, Default)]
pub struct InputState {
    pub orbiting: bool,
    pub panning: bool,
    pub rotate_delta: (f32, f32),
    pub pan_delta: (f32, f32),
    pub scroll_delta: f32,
    cursor: Option<(f32, f32)>,
    pause_pressed: bool,
}

impl InputState {
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.orbiting = pressed,
                    MouseButton::Right => self.panning = pressed,
                    _ => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let at = (position.x as f32, position.y as f32);
                if let Some(last) = self.cursor {
                    let delta = (at.0 - last.0, at.1 - last.1);
                    if self.orbiting {
                        self.rotate_delta.0 += delta.0;
                        self.rotate_delta.1 += delta.1;
                    } else if self.panning {
                        self.pan_delta.0 += delta.0;
                        self.pan_delta.1 += delta.1;
                    }
                }
                self.cursor = Some(at);
            }
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 120.0,
                };
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_keyboard(event),
            _ => {}
        }
    }

    fn handle_keyboard(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        if let PhysicalKey::Code(keycode) = event.physical_key {
            match keycode {
                KeyCode::ArrowLeft => self.pan_delta.0 -= KEY_PAN_STEP,
                KeyCode::ArrowRight => self.pan_delta.0 += KEY_PAN_STEP,
                KeyCode::ArrowUp => self.pan_delta.1 -= KEY_PAN_STEP,
                KeyCode::ArrowDown => self.pan_delta.1 += KEY_PAN_STEP,
                KeyCode::KeyP => self.pause_pressed = true,
                _ => {}
            }
        }
    }

    /// One-shot pause toggle; reading it clears it.
    pub fn take_pause(&mut self) -> bool {
        std::mem::take(&mut self.pause_pressed)
    }

    pub fn end_frame(&mut self) {
        self.rotate_delta = (0.0, 0.0);
        self.pan_delta = (0.0, 0.0);
        self.scroll_delta = 0.0;
    }
}

/// Time management for animation and FPS sampling.
#[derive(Debug, Clone)]
pub struct TimeState {
    pub delta_time: f32,
    pub last_frame_time: std::time::Instant,
    pub frame_count: u64,
    pub last_fps_instant: std::time::Instant,
}

impl Default for TimeState {
    fn default() -> Self {
        Self {
            delta_time: 0.0,
            last_frame_time: std::time::Instant::now(),
            frame_count: 0,
            last_fps_instant: std::time::Instant::now(),
        }
    }
}

impl TimeState {
    pub fn update(&mut self) {
        let now = std::time::Instant::now();
        self.delta_time = now.duration_since(self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;
        self.frame_count += 1;
    }

    pub fn fps_sample(&mut self) -> Option<f32> {
        let now = std::time::Instant::now();
        let elapsed = now.duration_since(self.last_fps_instant).as_secs_f32();
        if elapsed >= 1.0 {
            let fps = self.frame_count as f32 / elapsed;
            self.frame_count = 0;
            self.last_fps_instant = now;
            Some(fps)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_toggle_is_one_shot() {
        let mut input = InputState {
            pause_pressed: true,
            ..Default::default()
        };
        assert!(input.take_pause());
        assert!(!input.take_pause());
    }

    #[test]
    fn test_end_frame_clears_deltas() {
        let mut input = InputState {
            rotate_delta: (3.0, -2.0),
            pan_delta: (1.0, 1.0),
            scroll_delta: 0.5,
            ..Default::default()
        };
        input.end_frame();
        assert_eq!(input.rotate_delta, (0.0, 0.0));
        assert_eq!(input.pan_delta, (0.0, 0.0));
        assert_eq!(input.scroll_delta, 0.0);
    }
}
