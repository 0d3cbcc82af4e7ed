//! Orbit controls for the window host.
//!
//! Dragging with the left button orbits the camera around the origin; with
//! shift held it orbits the light instead. The wheel moves whichever one is
//! selected closer or further. Space toggles play/stop.
//!
//! All angles are handled in degrees here, the way they are shown to users,
//! and converted back to radians when written into the tunables.

use glam::Vec2;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::config::RenderTunables;
use crate::spherical::Spherical;

/// Limits applied after every orbit or zoom step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitConstraints {
    /// Degrees, kept off the poles so the look-at basis stays defined.
    pub min_polar: f32,
    pub max_polar: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Pixels of drag per degree of rotation.
    pub sensitivity: f32,
    /// Radius change per wheel line.
    pub zoom_step: f32,
}

impl Default for OrbitConstraints {
    fn default() -> Self {
        Self {
            min_polar: 0.01,
            max_polar: 179.99,
            min_radius: 1.0,
            max_radius: 100.0,
            sensitivity: 3.0,
            zoom_step: 1.0,
        }
    }
}

impl OrbitConstraints {
    /// Rotate `position` by a drag of `delta` pixels.
    pub fn orbit(&self, position: Spherical, delta: Vec2) -> Spherical {
        let azimuth = (position.azimuth.to_degrees() - delta.x / self.sensitivity).rem_euclid(360.0);
        let polar = (position.polar.to_degrees() - delta.y / self.sensitivity)
            .clamp(self.min_polar, self.max_polar);
        Spherical {
            azimuth: azimuth.to_radians(),
            polar: polar.to_radians(),
            radius: position.radius,
        }
    }

    /// Move `position` along its radius by `lines` wheel lines. Up is closer.
    pub fn zoom(&self, position: Spherical, lines: f32) -> Spherical {
        let radius = (position.radius() - lines * self.zoom_step).clamp(self.min_radius, self.max_radius);
        position.with_radius(radius)
    }
}

/// What a drag or wheel event moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrbitTarget {
    #[default]
    Camera,
    Light,
}

/// Mouse state for orbiting the camera and light.
#[derive(Debug, Default)]
pub struct OrbitControls {
    constraints: OrbitConstraints,
    dragging: bool,
    shift: bool,
    cursor: Option<Vec2>,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constraints(mut self, constraints: OrbitConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn target(&self) -> OrbitTarget {
        if self.shift {
            OrbitTarget::Light
        } else {
            OrbitTarget::Camera
        }
    }

    pub fn set_shift(&mut self, held: bool) {
        self.shift = held;
    }

    pub fn press(&mut self) {
        self.dragging = true;
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    /// Record the cursor. While dragging, orbit the current target.
    pub fn cursor_moved(&mut self, position: Vec2, render: &mut RenderTunables) -> bool {
        let previous = self.cursor.replace(position);
        match previous {
            Some(previous) if self.dragging => {
                let delta = position - previous;
                let constraints = self.constraints;
                let moved = self.target_mut(render);
                *moved = constraints.orbit(*moved, delta);
                true
            }
            _ => false,
        }
    }

    pub fn scrolled(&mut self, lines: f32, render: &mut RenderTunables) -> bool {
        if lines == 0.0 {
            return false;
        }
        let constraints = self.constraints;
        let moved = self.target_mut(render);
        *moved = constraints.zoom(*moved, lines);
        true
    }

    fn target_mut<'a>(&self, render: &'a mut RenderTunables) -> &'a mut Spherical {
        match self.target() {
            OrbitTarget::Camera => &mut render.camera,
            OrbitTarget::Light => &mut render.light,
        }
    }

    /// Feed a window event. Returns `true` if `render` changed.
    pub fn handle_event(&mut self, event: &WindowEvent, render: &mut RenderTunables) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.set_shift(modifiers.state().shift_key());
                false
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                match state {
                    ElementState::Pressed => self.press(),
                    ElementState::Released => self.release(),
                }
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32), render)
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.scrolled(lines, render)
            }
            _ => false,
        }
    }
}

/// Whether `event` is the initial press of the play/stop key.
pub fn is_play_toggle(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed
        && !event.repeat
        && event.physical_key == PhysicalKey::Code(KeyCode::Space)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn degrees(s: Spherical) -> (f32, f32) {
        (s.azimuth.to_degrees(), s.polar.to_degrees())
    }

    #[test]
    fn test_drag_uses_sensitivity() {
        let constraints = OrbitConstraints::default();
        let start = Spherical::from_degrees(90.0, 90.0, 20.0);
        let (azimuth, polar) = degrees(constraints.orbit(start, Vec2::new(30.0, -15.0)));
        assert!((azimuth - 80.0).abs() < 1e-3);
        assert!((polar - 95.0).abs() < 1e-3);
    }

    #[test]
    fn test_azimuth_wraps() {
        let constraints = OrbitConstraints::default();
        let start = Spherical::from_degrees(2.0, 90.0, 20.0);
        let (azimuth, _) = degrees(constraints.orbit(start, Vec2::new(9.0, 0.0)));
        assert!((azimuth - 359.0).abs() < 1e-3);
    }

    #[test]
    fn test_polar_clamped_off_poles() {
        let constraints = OrbitConstraints::default();
        let start = Spherical::from_degrees(0.0, 10.0, 20.0);
        let (_, up) = degrees(constraints.orbit(start, Vec2::new(0.0, 1000.0)));
        let (_, down) = degrees(constraints.orbit(start, Vec2::new(0.0, -1000.0)));
        assert!((up - 0.01).abs() < 1e-3);
        assert!((down - 179.99).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_clamped() {
        let constraints = OrbitConstraints::default();
        let start = Spherical::from_degrees(0.0, 90.0, 20.0);
        assert_eq!(constraints.zoom(start, 5.0).radius(), 15.0);
        assert_eq!(constraints.zoom(start, 50.0).radius(), 1.0);
        assert_eq!(constraints.zoom(start, -500.0).radius(), 100.0);
    }

    #[test]
    fn test_drag_only_while_pressed() {
        let mut controls = OrbitControls::new();
        let mut render = RenderTunables::default();
        let before = render.camera;

        assert!(!controls.cursor_moved(Vec2::new(10.0, 10.0), &mut render));
        assert!(!controls.cursor_moved(Vec2::new(40.0, 10.0), &mut render));
        assert_eq!(render.camera, before);

        controls.press();
        assert!(controls.cursor_moved(Vec2::new(70.0, 10.0), &mut render));
        assert_ne!(render.camera, before);

        controls.release();
        let after = render.camera;
        assert!(!controls.cursor_moved(Vec2::new(100.0, 10.0), &mut render));
        assert_eq!(render.camera, after);
    }

    #[test]
    fn test_shift_moves_light() {
        let mut controls = OrbitControls::new();
        let mut render = RenderTunables::default();
        let camera = render.camera;
        let light = render.light;

        controls.set_shift(true);
        assert_eq!(controls.target(), OrbitTarget::Light);
        assert!(controls.scrolled(2.0, &mut render));
        assert_eq!(render.camera, camera);
        assert_eq!(render.light.radius(), light.radius() - 2.0);
    }

    #[test]
    fn test_custom_constraints() {
        let mut controls = OrbitControls::new().with_constraints(OrbitConstraints {
            zoom_step: 4.0,
            max_radius: 30.0,
            ..OrbitConstraints::default()
        });
        let mut render = RenderTunables::default();
        let radius = render.camera.radius();

        assert!(controls.scrolled(1.0, &mut render));
        assert_eq!(render.camera.radius(), radius - 4.0);

        assert!(controls.scrolled(-100.0, &mut render));
        assert_eq!(render.camera.radius(), 30.0);
    }
}
