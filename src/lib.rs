//! WebGL2 logo demo: a hardcoded block "I" (or a flame, via the page
//! checkbox) that spins, sways and breathes.
//!
//! Geometry, animation math and configuration are plain Rust and build on
//! every target; the WebGL wiring only exists on wasm32.

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;

pub use config::DemoConfig;
pub use error::{Error, Result};
pub use geometry::{Mesh, Shape};

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, Window};

    use crate::{DemoConfig, Error, Result};

    mod render;
    mod shaders;

    #[wasm_bindgen(start)]
    pub fn main() -> std::result::Result<(), JsValue> {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::new(log::Level::Info));

        let window = web_sys::window().ok_or(Error::NoWindow)?;
        if let Err(err) = launch(&window) {
            log::error!("startup failed: {err}");
            if let Err(alert_err) = window.alert_with_message(&err.to_string()) {
                log::warn!("alert failed: {}", Error::from(alert_err));
            }
            return Err(err.into());
        }
        Ok(())
    }

    fn launch(window: &Window) -> Result<()> {
        let document = window.document().ok_or(Error::NoDocument)?;
        let mut config = DemoConfig::default();

        let canvas = document
            .get_element_by_id(&config.canvas_id)
            .ok_or_else(|| Error::ElementNotFound(config.canvas_id.clone()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| Error::WrongElementType {
                id: config.canvas_id.clone(),
                expected: "canvas",
            })?;

        let dataset = canvas.dataset();
        config.apply_overrides(|key| dataset.get(key))?;

        let toggle = document
            .get_element_by_id(&config.toggle_id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        if toggle.is_none() {
            log::warn!("no #{} checkbox, showing the logo only", config.toggle_id);
        }

        render::start(canvas, toggle, &config)
    }
}
