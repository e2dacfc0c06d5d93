//! Per-frame motion: spin around X, a sideways sway, and the breathing
//! perturbation that squeezes the shape toward its vertical center line.

use nalgebra::{Matrix4, Vector3};

use crate::config::DemoConfig;
use crate::geometry::{Bounds, Mesh, POSITION_ITEM_SIZE};

/// Ping-pong counter over `0..=steps`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sway {
    ticks: u32,
    steps: u32,
    step: f32,
    rising: bool,
}

impl Sway {
    pub fn new(steps: u32, step: f32) -> Self {
        Self {
            ticks: 0,
            steps,
            step,
            rising: true,
        }
    }

    pub fn advance(&mut self) {
        if self.steps == 0 {
            return;
        }
        if self.rising && self.ticks == self.steps {
            self.rising = false;
        } else if !self.rising && self.ticks == 0 {
            self.rising = true;
        }
        if self.rising {
            self.ticks += 1;
        } else {
            self.ticks -= 1;
        }
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Horizontal translation, symmetric around zero.
    pub fn offset(&self) -> f32 {
        (self.ticks as f32 - self.steps as f32 * 0.5) * self.step
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    angle_degrees: u32,
    spin_step: u32,
    amplitude: f32,
    fill: f32,
    sway: Sway,
}

impl Animation {
    pub fn new(config: &DemoConfig) -> Self {
        Self {
            angle_degrees: 0,
            spin_step: config.spin_step_degrees % 360,
            amplitude: config.amplitude,
            fill: config.fill,
            sway: Sway::new(config.sway_steps, config.sway_step),
        }
    }

    pub fn advance(&mut self) {
        self.angle_degrees = (self.angle_degrees + self.spin_step) % 360;
        self.sway.advance();
    }

    pub fn angle_degrees(&self) -> u32 {
        self.angle_degrees
    }

    pub fn angle_radians(&self) -> f32 {
        (self.angle_degrees as f32).to_radians()
    }

    pub fn sway(&self) -> &Sway {
        &self.sway
    }

    pub fn breathing_offset(&self) -> f32 {
        self.amplitude * self.angle_radians().cos()
    }

    /// `aspect * Rx(angle) * T(sway) * S(fill / extent) * T(-center)`.
    pub fn model_view(&self, bounds: &Bounds, width: u32, height: u32) -> Matrix4<f32> {
        let [cx, cy] = bounds.center();
        let extent = bounds.extent();
        let fit = if extent > 0.0 { self.fill / extent } else { 1.0 };
        let (ax, ay) = aspect_scale(width, height);

        Matrix4::new_nonuniform_scaling(&Vector3::new(ax, ay, 1.0))
            * Matrix4::from_axis_angle(&Vector3::x_axis(), self.angle_radians())
            * Matrix4::new_translation(&Vector3::new(self.sway.offset(), 0.0, 0.0))
            * Matrix4::new_nonuniform_scaling(&Vector3::repeat(fit))
            * Matrix4::new_translation(&Vector3::new(-cx, -cy, 0.0))
    }
}

/// Scale factors that keep a unit square square on a `width x height` viewport.
pub fn aspect_scale(width: u32, height: u32) -> (f32, f32) {
    if width == 0 || height == 0 {
        return (1.0, 1.0);
    }
    let (w, h) = (width as f32, height as f32);
    let m = w.min(h);
    (m / w, m / h)
}

/// Writes the mesh's positions into `out` with each vertex shifted toward
/// (positive `offset`) or away from the vertical line `x = center_x`.
/// Vertices on the line stay put.
pub fn perturb(mesh: &Mesh, center_x: f32, offset: f32, out: &mut Vec<f32>) {
    let cx = center_x;
    out.clear();
    out.reserve(mesh.vertex_count() * POSITION_ITEM_SIZE);
    for &[x, y, z] in mesh.positions() {
        let side = if x < cx {
            1.0
        } else if x > cx {
            -1.0
        } else {
            0.0
        };
        out.extend([x + side * offset, y, z]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sway_ping_pongs() {
        let mut sway = Sway::new(3, 0.1);
        let mut seen = vec![sway.ticks()];
        for _ in 0..8 {
            sway.advance();
            seen.push(sway.ticks());
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 2, 1, 0, 1, 2]);
    }

    #[test]
    fn sway_offset_is_symmetric() {
        let mut sway = Sway::new(4, 0.5);
        assert_eq!(sway.offset(), -1.0);
        for _ in 0..4 {
            sway.advance();
        }
        assert_eq!(sway.offset(), 1.0);
    }

    #[test]
    fn zero_step_sway_stays_put() {
        let mut sway = Sway::new(0, 0.1);
        sway.advance();
        assert_eq!(sway.ticks(), 0);
        assert_eq!(sway.offset(), 0.0);
    }

    #[test]
    fn angle_wraps() {
        let config = DemoConfig {
            spin_step_degrees: 100,
            ..DemoConfig::default()
        };
        let mut anim = Animation::new(&config);
        for _ in 0..4 {
            anim.advance();
        }
        assert_eq!(anim.angle_degrees(), 40);
    }

    #[test]
    fn perturb_leaves_center_line_alone() {
        let mesh = Mesh::new(
            vec![[0.0, 0.0, 0.0], [0.5, 1.0, 0.0], [1.0, 0.0, 0.0]],
            vec![[1.0; 4]; 3],
        )
        .unwrap();
        let cx = mesh.bounds().center()[0];
        assert_eq!(cx, 0.5);

        let mut out = Vec::new();
        perturb(&mesh, cx, 0.1, &mut out);
        let expected = [0.1, 0.0, 0.0, 0.5, 1.0, 0.0, 0.9, 0.0, 0.0];
        assert_eq!(out.len(), expected.len());
        for (got, want) in out.iter().zip(expected) {
            approx::assert_relative_eq!(*got, want);
        }
        // The apex sits exactly on the center line.
        assert_eq!(out[3], 0.5);
    }

    #[test]
    fn aspect_scale_squares_viewport() {
        assert_eq!(aspect_scale(200, 100), (0.5, 1.0));
        assert_eq!(aspect_scale(100, 400), (1.0, 0.25));
        assert_eq!(aspect_scale(0, 100), (1.0, 1.0));
    }
}
