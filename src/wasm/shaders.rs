use web_sys::{WebGl2RenderingContext as GL, WebGlProgram, WebGlShader};

use crate::error::{Error, Result};

pub const VERTEX_SHADER: &str = r#"#version 300 es
in vec3 aVertexPosition;
in vec4 aVertexColor;
uniform mat4 uMVMatrix;
out vec4 vColor;

void main() {
    gl_Position = uMVMatrix * vec4(aVertexPosition, 1.0);
    vColor = aVertexColor;
}
"#;

pub const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
in vec4 vColor;
out vec4 fragColor;

void main() {
    fragColor = vColor;
}
"#;

pub fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl.create_shader(kind).ok_or(Error::Allocation("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(Error::ShaderCompile(info))
    }
}

pub fn link_program(gl: &GL, vertex: &WebGlShader, fragment: &WebGlShader) -> Result<WebGlProgram> {
    let program = gl.create_program().ok_or(Error::Allocation("program"))?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    let ok = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(program)
    } else {
        let info = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(Error::ProgramLink(info))
    }
}

/// Compiles both stages and links them into a program.
pub fn build_program(gl: &GL) -> Result<WebGlProgram> {
    let vertex = compile_shader(gl, GL::VERTEX_SHADER, VERTEX_SHADER)?;
    let fragment = compile_shader(gl, GL::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
    let program = link_program(gl, &vertex, &fragment)?;
    // The program keeps the compiled stages alive.
    gl.delete_shader(Some(&vertex));
    gl.delete_shader(Some(&fragment));
    Ok(program)
}
