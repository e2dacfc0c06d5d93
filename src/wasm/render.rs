use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Float32Array;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    window, HtmlCanvasElement, HtmlInputElement, WebGl2RenderingContext as GL, WebGlBuffer,
    WebGlProgram, WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::shaders;
use crate::animation::{perturb, Animation};
use crate::config::DemoConfig;
use crate::error::{Error, Result};
use crate::geometry::{Bounds, Mesh, Shape, COLOR_ITEM_SIZE, POSITION_ITEM_SIZE};

struct Renderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    position_buffer: WebGlBuffer,
    color_buffer: WebGlBuffer,
    mv_matrix: WebGlUniformLocation,
    shape: Shape,
    mesh: Mesh,
    bounds: Bounds,
    animation: Animation,
    scratch: Vec<f32>,
}

impl Renderer {
    fn new(canvas: HtmlCanvasElement, config: &DemoConfig) -> Result<Self> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or(Error::WebGl2Unsupported)?
            .dyn_into()
            .map_err(|_| Error::WebGl2Unsupported)?;

        let program = shaders::build_program(&gl)?;
        gl.use_program(Some(&program));

        let position_loc = attrib_location(&gl, &program, "aVertexPosition")?;
        let color_loc = attrib_location(&gl, &program, "aVertexColor")?;
        let mv_matrix = gl
            .get_uniform_location(&program, "uMVMatrix")
            .ok_or(Error::MissingUniform("uMVMatrix"))?;

        let vao = gl
            .create_vertex_array()
            .ok_or(Error::Allocation("vertex array"))?;
        gl.bind_vertex_array(Some(&vao));

        let position_buffer = gl.create_buffer().ok_or(Error::Allocation("position buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&position_buffer));
        gl.enable_vertex_attrib_array(position_loc);
        gl.vertex_attrib_pointer_with_i32(position_loc, POSITION_ITEM_SIZE as i32, GL::FLOAT, false, 0, 0);

        let color_buffer = gl.create_buffer().ok_or(Error::Allocation("color buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&color_buffer));
        gl.enable_vertex_attrib_array(color_loc);
        gl.vertex_attrib_pointer_with_i32(color_loc, COLOR_ITEM_SIZE as i32, GL::FLOAT, false, 0, 0);

        let [r, g, b, a] = config.clear_color;
        gl.clear_color(r, g, b, a);

        let mesh = Shape::Logo.mesh()?;
        let mut renderer = Self {
            gl,
            canvas,
            program,
            vao,
            position_buffer,
            color_buffer,
            mv_matrix,
            shape: Shape::Logo,
            bounds: mesh.bounds(),
            mesh,
            animation: Animation::new(config),
            scratch: Vec::new(),
        };
        renderer.upload_mesh();
        Ok(renderer)
    }

    fn set_shape(&mut self, shape: Shape) -> Result<()> {
        if shape == self.shape {
            return Ok(());
        }
        self.mesh = shape.mesh()?;
        self.bounds = self.mesh.bounds();
        self.shape = shape;
        self.upload_mesh();
        log::info!(
            "switched to {} ({} triangles)",
            shape.name(),
            self.mesh.triangle_count()
        );
        Ok(())
    }

    fn upload_mesh(&self) {
        self.upload(&self.color_buffer, self.mesh.flat_colors(), GL::STATIC_DRAW);
        self.upload(&self.position_buffer, self.mesh.flat_positions(), GL::DYNAMIC_DRAW);
    }

    fn upload(&self, buffer: &WebGlBuffer, data: &[f32], usage: u32) {
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
        self.gl
            .buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &Float32Array::from(data), usage);
    }

    fn frame(&mut self) {
        self.animation.advance();
        let [cx, _] = self.bounds.center();
        perturb(&self.mesh, cx, self.animation.breathing_offset(), &mut self.scratch);
        self.upload(&self.position_buffer, &self.scratch, GL::DYNAMIC_DRAW);
        self.draw();
    }

    fn draw(&self) {
        let gl = &self.gl;
        let (w, h) = (self.canvas.width(), self.canvas.height());
        gl.viewport(0, 0, w as i32, h as i32);
        gl.clear(GL::COLOR_BUFFER_BIT);

        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));
        let mv = self.animation.model_view(&self.bounds, w, h);
        gl.uniform_matrix4fv_with_f32_array(Some(&self.mv_matrix), false, mv.as_slice());
        gl.draw_arrays(GL::TRIANGLES, 0, self.mesh.vertex_count() as i32);
    }
}

fn attrib_location(gl: &GL, program: &WebGlProgram, name: &'static str) -> Result<u32> {
    let loc = gl.get_attrib_location(program, name);
    u32::try_from(loc).map_err(|_| Error::MissingAttribute(name))
}

fn fit_to_window(canvas: &HtmlCanvasElement) {
    let Some(win) = window() else { return };
    let size = |v: std::result::Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    canvas.set_width(size(win.inner_width()) as u32);
    canvas.set_height(size(win.inner_height()) as u32);
}

/// Wire up resize, the shape toggle and the animation loop.
pub fn start(canvas: HtmlCanvasElement, toggle: Option<HtmlInputElement>, config: &DemoConfig) -> Result<()> {
    let win = window().ok_or(Error::NoWindow)?;

    // Resize canvas to fit window
    fit_to_window(&canvas);
    let resize_closure = {
        let canvas = canvas.clone();
        Closure::wrap(Box::new(move || fit_to_window(&canvas)) as Box<dyn FnMut()>)
    };
    win.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    let renderer = Rc::new(RefCell::new(Renderer::new(canvas, config)?));

    if let Some(toggle) = toggle {
        renderer
            .borrow_mut()
            .set_shape(Shape::from_toggle(toggle.checked()))?;
        let change_closure = {
            let renderer = renderer.clone();
            let input = toggle.clone();
            Closure::wrap(Box::new(move || {
                let shape = Shape::from_toggle(input.checked());
                if let Err(err) = renderer.borrow_mut().set_shape(shape) {
                    log::error!("failed to switch shape: {err}");
                }
            }) as Box<dyn FnMut()>)
        };
        toggle.add_event_listener_with_callback("change", change_closure.as_ref().unchecked_ref())?;
        change_closure.forget();
    }

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        renderer.borrow_mut().frame();

        // schedule next
        let (Some(win), Some(next)) = (window(), f.borrow().as_ref().map(|c| c.as_ref().clone())) else {
            log::error!("animation loop stopped");
            return;
        };
        if let Err(err) = win.request_animation_frame(next.unchecked_ref()) {
            log::error!("request_animation_frame failed: {}", Error::from(err));
        }
    }) as Box<dyn FnMut()>));

    if let Some(first) = g.borrow().as_ref() {
        win.request_animation_frame(first.as_ref().unchecked_ref())?;
    }

    log::info!("render loop started");
    Ok(())
}

#[cfg(test)]
mod tests {
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn fresh_canvas() -> HtmlCanvasElement {
        let document = window().unwrap().document().unwrap();
        let canvas = document
            .create_element("canvas")
            .unwrap()
            .dyn_into::<HtmlCanvasElement>()
            .unwrap();
        canvas.set_width(64);
        canvas.set_height(48);
        canvas
    }

    fn context(canvas: &HtmlCanvasElement) -> GL {
        canvas
            .get_context("webgl2")
            .unwrap()
            .expect("webgl2 context")
            .dyn_into()
            .unwrap()
    }

    fn buffer_bytes(renderer: &Renderer, buffer: &WebGlBuffer) -> usize {
        renderer.gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
        renderer
            .gl
            .get_buffer_parameter(GL::ARRAY_BUFFER, GL::BUFFER_SIZE)
            .as_f64()
            .unwrap() as usize
    }

    const F32_BYTES: usize = std::mem::size_of::<f32>();

    #[wasm_bindgen_test]
    fn shipped_shaders_link_with_expected_inputs() {
        let gl = context(&fresh_canvas());
        let program = shaders::build_program(&gl).unwrap();

        let position = attrib_location(&gl, &program, "aVertexPosition").unwrap();
        let color = attrib_location(&gl, &program, "aVertexColor").unwrap();
        assert_ne!(position, color);
        assert!(gl.get_uniform_location(&program, "uMVMatrix").is_some());
        assert!(matches!(
            attrib_location(&gl, &program, "aVertexNormal"),
            Err(Error::MissingAttribute("aVertexNormal"))
        ));
    }

    #[wasm_bindgen_test]
    fn broken_shader_reports_info_log() {
        let gl = context(&fresh_canvas());
        let source = "#version 300 es\nvoid main() { gl_Position = undeclared; }\n";
        match shaders::compile_shader(&gl, GL::VERTEX_SHADER, source) {
            Err(Error::ShaderCompile(log)) => assert!(!log.is_empty()),
            other => panic!("expected a compile error, got {other:?}"),
        }
    }

    #[wasm_bindgen_test]
    fn mismatched_stages_fail_to_link() {
        let gl = context(&fresh_canvas());
        let vertex = shaders::compile_shader(&gl, GL::VERTEX_SHADER, shaders::VERTEX_SHADER).unwrap();
        // vColor is a vec4 in the vertex stage.
        let fragment_source = "#version 300 es\nprecision mediump float;\nin vec3 vColor;\nout vec4 fragColor;\nvoid main() { fragColor = vec4(vColor, 1.0); }\n";
        let fragment = shaders::compile_shader(&gl, GL::FRAGMENT_SHADER, fragment_source).unwrap();
        let result = shaders::link_program(&gl, &vertex, &fragment);
        assert!(matches!(result, Err(Error::ProgramLink(_))), "{result:?}");
    }

    #[wasm_bindgen_test]
    fn starts_with_logo_uploaded() {
        let renderer = Renderer::new(fresh_canvas(), &DemoConfig::default()).unwrap();
        assert_eq!(renderer.shape, Shape::Logo);
        assert_eq!(renderer.mesh.vertex_count(), 90);
        assert_eq!(buffer_bytes(&renderer, &renderer.position_buffer), 90 * 3 * F32_BYTES);
        assert_eq!(buffer_bytes(&renderer, &renderer.color_buffer), 90 * 4 * F32_BYTES);
    }

    #[wasm_bindgen_test]
    fn switching_to_flame_reuploads() {
        let mut renderer = Renderer::new(fresh_canvas(), &DemoConfig::default()).unwrap();
        renderer.set_shape(Shape::Flame).unwrap();

        assert_eq!(renderer.shape, Shape::Flame);
        assert_eq!(renderer.mesh.vertex_count(), 60);
        assert_eq!(renderer.bounds, renderer.mesh.bounds());
        assert_eq!(buffer_bytes(&renderer, &renderer.position_buffer), 60 * 3 * F32_BYTES);
        assert_eq!(buffer_bytes(&renderer, &renderer.color_buffer), 60 * 4 * F32_BYTES);

        renderer.set_shape(Shape::Logo).unwrap();
        assert_eq!(renderer.mesh.vertex_count(), 90);
    }

    #[wasm_bindgen_test]
    fn frame_uploads_every_vertex() {
        let mut renderer = Renderer::new(fresh_canvas(), &DemoConfig::default()).unwrap();
        renderer.frame();
        assert_eq!(renderer.animation.angle_degrees(), 1);
        assert_eq!(renderer.scratch.len(), 90 * 3);
        assert_eq!(buffer_bytes(&renderer, &renderer.position_buffer), 90 * 3 * F32_BYTES);

        renderer.set_shape(Shape::Flame).unwrap();
        renderer.frame();
        assert_eq!(renderer.scratch.len(), 60 * 3);
        assert_eq!(renderer.gl.get_error(), GL::NO_ERROR);
    }

    #[wasm_bindgen_test]
    fn js_errors_keep_their_message() {
        let err = Error::from(JsValue::from_str("alert blocked"));
        assert!(matches!(&err, Error::Js(msg) if msg == "alert blocked"));

        let back: JsValue = Error::WebGl2Unsupported.into();
        assert_eq!(back.as_string().as_deref(), Some("WebGL2 not supported"));
    }
}
