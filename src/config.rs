use crate::error::{Error, Result};

/// Tunables for the demo. Defaults match the page in `static/`; any of the
/// numeric ones can be overridden with `data-*` attributes on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub canvas_id: String,
    pub toggle_id: String,
    pub clear_color: [f32; 4],
    /// Peak horizontal shift applied by the breathing perturbation.
    pub amplitude: f32,
    pub spin_step_degrees: u32,
    pub sway_steps: u32,
    pub sway_step: f32,
    /// Clip-space size of the shape's longer side before aspect correction.
    pub fill: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            canvas_id: "c".into(),
            toggle_id: "flame".into(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            amplitude: 0.02,
            spin_step_degrees: 1,
            sway_steps: 50,
            sway_step: 0.01,
            fill: 1.5,
        }
    }
}

impl DemoConfig {
    /// Dataset keys (camelCase, as `DOMStringMap` exposes them) read from the canvas.
    pub const KEYS: [&'static str; 5] = ["amplitude", "spin", "swaySteps", "swayStep", "fill"];

    /// Accepts both the dataset spelling (`swaySteps`) and the attribute
    /// spelling (`sway-steps`) of each key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || Error::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
        };
        let value = value.trim();
        match key {
            "amplitude" => {
                let v: f32 = value.parse().map_err(|_| invalid())?;
                if !v.is_finite() || v < 0.0 {
                    return Err(invalid());
                }
                self.amplitude = v;
            }
            "spin" => {
                let v: u32 = value.parse().map_err(|_| invalid())?;
                if v >= 360 {
                    return Err(invalid());
                }
                self.spin_step_degrees = v;
            }
            "swaySteps" | "sway-steps" => {
                self.sway_steps = value.parse().map_err(|_| invalid())?;
            }
            "swayStep" | "sway-step" => {
                let v: f32 = value.parse().map_err(|_| invalid())?;
                if !v.is_finite() || v < 0.0 {
                    return Err(invalid());
                }
                self.sway_step = v;
            }
            "fill" => {
                let v: f32 = value.parse().map_err(|_| invalid())?;
                if !v.is_finite() || v <= 0.0 {
                    return Err(invalid());
                }
                self.fill = v;
            }
            _ => return Err(Error::UnknownSetting(key.to_string())),
        }
        Ok(())
    }

    /// Applies every override `lookup` returns a value for, stopping at the first bad one.
    pub fn apply_overrides<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        for key in Self::KEYS {
            if let Some(value) = lookup(key) {
                self.set(key, &value)?;
                log::debug!("config override {key}={value}");
            }
        }
        Ok(())
    }
}
