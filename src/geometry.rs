//! Hardcoded vertex tables for the two shapes the demo can draw.
//!
//! Both shapes live in the box `[0, 0.15] x [0, 0.21]`; framing into clip
//! space happens in the model-view matrix, not here.

use crate::error::{Error, Result};

pub type Position = [f32; 3];
pub type Color = [f32; 4];

pub const POSITION_ITEM_SIZE: usize = 3;
pub const COLOR_ITEM_SIZE: usize = 4;

const ORANGE: Color = [1.0, 0.5, 0.0, 1.0];
const BLUE: Color = [0.0, 0.0, 1.0, 1.0];
const FLAME_RED: Color = [0.9, 0.15, 0.0, 1.0];
const FLAME_YELLOW: Color = [1.0, 0.85, 0.1, 1.0];

// The first six triangles are the orange body, the rest is the blue border.
const LOGO_BODY_VERTICES: usize = 18;

#[rustfmt::skip]
const LOGO_POSITIONS: [Position; 90] = [
    // body: bottom bar
    [0.01, 0.01, 0.0], [0.14, 0.01, 0.0], [0.14, 0.05, 0.0],
    [0.01, 0.01, 0.0], [0.01, 0.05, 0.0], [0.14, 0.05, 0.0],
    // body: column
    [0.05, 0.05, 0.0], [0.10, 0.05, 0.0], [0.10, 0.16, 0.0],
    [0.05, 0.05, 0.0], [0.05, 0.16, 0.0], [0.10, 0.16, 0.0],
    // body: top bar
    [0.01, 0.16, 0.0], [0.14, 0.16, 0.0], [0.14, 0.20, 0.0],
    [0.01, 0.16, 0.0], [0.01, 0.20, 0.0], [0.14, 0.20, 0.0],

    // border: bottom edge
    [0.00, 0.00, 0.0], [0.15, 0.00, 0.0], [0.15, 0.01, 0.0],
    [0.00, 0.00, 0.0], [0.00, 0.01, 0.0], [0.15, 0.01, 0.0],
    // border: lower sides
    [0.00, 0.01, 0.0], [0.01, 0.01, 0.0], [0.01, 0.05, 0.0],
    [0.00, 0.01, 0.0], [0.00, 0.05, 0.0], [0.01, 0.05, 0.0],
    [0.14, 0.01, 0.0], [0.15, 0.01, 0.0], [0.15, 0.05, 0.0],
    [0.14, 0.01, 0.0], [0.14, 0.05, 0.0], [0.15, 0.05, 0.0],
    // border: top of the bottom bar
    [0.00, 0.05, 0.0], [0.05, 0.05, 0.0], [0.05, 0.06, 0.0],
    [0.00, 0.05, 0.0], [0.00, 0.06, 0.0], [0.05, 0.06, 0.0],
    [0.10, 0.05, 0.0], [0.15, 0.05, 0.0], [0.15, 0.06, 0.0],
    [0.10, 0.05, 0.0], [0.10, 0.06, 0.0], [0.15, 0.06, 0.0],
    // border: column sides
    [0.04, 0.06, 0.0], [0.05, 0.06, 0.0], [0.05, 0.15, 0.0],
    [0.04, 0.06, 0.0], [0.04, 0.15, 0.0], [0.05, 0.15, 0.0],
    [0.10, 0.06, 0.0], [0.11, 0.06, 0.0], [0.11, 0.15, 0.0],
    [0.10, 0.06, 0.0], [0.10, 0.15, 0.0], [0.11, 0.15, 0.0],
    // border: bottom of the top bar
    [0.00, 0.15, 0.0], [0.05, 0.15, 0.0], [0.05, 0.16, 0.0],
    [0.00, 0.15, 0.0], [0.00, 0.16, 0.0], [0.05, 0.16, 0.0],
    [0.10, 0.15, 0.0], [0.15, 0.15, 0.0], [0.15, 0.16, 0.0],
    [0.10, 0.15, 0.0], [0.10, 0.16, 0.0], [0.15, 0.16, 0.0],
    // border: upper sides
    [0.00, 0.16, 0.0], [0.01, 0.16, 0.0], [0.01, 0.20, 0.0],
    [0.00, 0.16, 0.0], [0.00, 0.20, 0.0], [0.01, 0.20, 0.0],
    [0.14, 0.16, 0.0], [0.15, 0.16, 0.0], [0.15, 0.20, 0.0],
    [0.14, 0.16, 0.0], [0.14, 0.20, 0.0], [0.15, 0.20, 0.0],
    // border: top edge
    [0.00, 0.20, 0.0], [0.15, 0.20, 0.0], [0.15, 0.21, 0.0],
    [0.00, 0.20, 0.0], [0.00, 0.21, 0.0], [0.15, 0.21, 0.0],
];

const FLAME_OUTER_HUB: [f32; 2] = [0.075, 0.07];

#[rustfmt::skip]
const FLAME_OUTER_RIM: [[f32; 2]; 12] = [
    [0.075, 0.000], [0.125, 0.015], [0.150, 0.055], [0.145, 0.100],
    [0.120, 0.140], [0.105, 0.175], [0.090, 0.210], [0.060, 0.170],
    [0.035, 0.130], [0.010, 0.090], [0.005, 0.050], [0.025, 0.015],
];

const FLAME_INNER_HUB: [f32; 2] = [0.075, 0.05];

#[rustfmt::skip]
const FLAME_INNER_RIM: [[f32; 2]; 8] = [
    [0.075, 0.015], [0.105, 0.030], [0.115, 0.060], [0.105, 0.100],
    [0.085, 0.140], [0.060, 0.105], [0.040, 0.065], [0.050, 0.030],
];

/// Which of the two hardcoded shapes is on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Shape {
    #[default]
    Logo,
    Flame,
}

impl Shape {
    /// Maps the page checkbox state to a shape.
    pub fn from_toggle(checked: bool) -> Self {
        if checked {
            Shape::Flame
        } else {
            Shape::Logo
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Logo => "logo",
            Shape::Flame => "flame",
        }
    }

    pub fn mesh(self) -> Result<Mesh> {
        match self {
            Shape::Logo => {
                let colors = (0..LOGO_POSITIONS.len())
                    .map(|i| if i < LOGO_BODY_VERTICES { ORANGE } else { BLUE })
                    .collect();
                Mesh::new(LOGO_POSITIONS.to_vec(), colors)
            }
            Shape::Flame => {
                let mut positions = Vec::new();
                let mut colors = Vec::new();
                fan(FLAME_OUTER_HUB, &FLAME_OUTER_RIM, FLAME_RED, &mut positions, &mut colors);
                fan(FLAME_INNER_HUB, &FLAME_INNER_RIM, FLAME_YELLOW, &mut positions, &mut colors);
                Mesh::new(positions, colors)
            }
        }
    }
}

/// Triangulates a closed rim as a fan around `hub`.
fn fan(
    hub: [f32; 2],
    rim: &[[f32; 2]],
    color: Color,
    positions: &mut Vec<Position>,
    colors: &mut Vec<Color>,
) {
    for (i, a) in rim.iter().enumerate() {
        let b = rim[(i + 1) % rim.len()];
        positions.extend([[hub[0], hub[1], 0.0], [a[0], a[1], 0.0], [b[0], b[1], 0.0]]);
        colors.extend([color; 3]);
    }
}

/// Axis-aligned 2D box around a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl Bounds {
    pub fn center(&self) -> [f32; 2] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        ]
    }

    /// Length of the longer side.
    pub fn extent(&self) -> f32 {
        (self.max[0] - self.min[0]).max(self.max[1] - self.min[1])
    }
}

/// Index-aligned position and color tables, one entry per triangle vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<Position>,
    colors: Vec<Color>,
}

impl Mesh {
    pub fn new(positions: Vec<Position>, colors: Vec<Color>) -> Result<Self> {
        if positions.len() != colors.len() || positions.len() % 3 != 0 {
            return Err(Error::MisalignedMesh {
                positions: positions.len(),
                colors: colors.len(),
            });
        }
        Ok(Self { positions, colors })
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn flat_positions(&self) -> &[f32] {
        self.positions.as_flattened()
    }

    pub fn flat_colors(&self) -> &[f32] {
        self.colors.as_flattened()
    }

    pub fn bounds(&self) -> Bounds {
        let mut min = [f32::INFINITY; 2];
        let mut max = [f32::NEG_INFINITY; 2];
        for p in &self.positions {
            for axis in 0..2 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        if self.positions.is_empty() {
            min = [0.0; 2];
            max = [0.0; 2];
        }
        Bounds { min, max }
    }
}
