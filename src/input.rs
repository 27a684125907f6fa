//! Keyboard state for the render loop

use glam::Vec2;
use particle_renderer::Camera;
use particle_simulation::SimulationDriver;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// One-shot actions triggered on key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    TogglePause,
}

/// Keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
    pub speed_up: bool,
    pub slow_down: bool,
}

/// Input owned by the application and handed to each frame
#[derive(Debug, Clone)]
pub struct InputState {
    pub held: HeldKeys,
    /// Clear the frame before drawing; off leaves trails
    pub clear_screen: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            held: HeldKeys::default(),
            clear_screen: true,
        }
    }
}

impl InputState {
    /// Record a key event. `repeat` presses never fire toggles.
    pub fn handle_key(
        &mut self,
        key: KeyCode,
        state: ElementState,
        repeat: bool,
    ) -> Option<Command> {
        let pressed = state == ElementState::Pressed;

        match key {
            KeyCode::KeyA => self.held.left = pressed,
            KeyCode::KeyD => self.held.right = pressed,
            KeyCode::KeyW => self.held.up = pressed,
            KeyCode::KeyS => self.held.down = pressed,
            KeyCode::Equal => self.held.zoom_in = pressed,
            KeyCode::Minus => self.held.zoom_out = pressed,
            KeyCode::Digit2 => self.held.speed_up = pressed,
            KeyCode::Digit1 => self.held.slow_down = pressed,

            KeyCode::KeyQ | KeyCode::Escape if pressed => return Some(Command::Quit),
            KeyCode::KeyP if pressed && !repeat => return Some(Command::TogglePause),
            KeyCode::Space if pressed && !repeat => {
                self.clear_screen = !self.clear_screen;
                log::debug!("Screen clearing {}", on_off(self.clear_screen));
            }
            _ => {}
        }

        None
    }

    /// Unit-step pan direction from the held WASD keys
    pub fn pan_direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(
            axis(self.held.left, self.held.right),
            axis(self.held.down, self.held.up),
        )
    }

    pub fn apply_camera(&self, camera: &mut Camera) {
        let direction = self.pan_direction();
        if direction != Vec2::ZERO {
            camera.pan(direction);
        }
        if self.held.zoom_in {
            camera.zoom_in();
        }
        if self.held.zoom_out {
            camera.zoom_out();
        }
    }

    pub fn apply_speed(&self, driver: &mut SimulationDriver) {
        if self.held.speed_up {
            driver.speed_up();
        }
        if self.held.slow_down {
            driver.slow_down();
        }
    }

    /// Forget held keys, e.g. after the window loses focus
    pub fn release_all(&mut self) {
        self.held = HeldKeys::default();
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
