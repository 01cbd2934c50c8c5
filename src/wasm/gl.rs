//! WebGL2 plumbing: context acquisition, program linking, geometry,
//! the offscreen render target, and the two draw passes.

use glam::{Mat4, Vec2};
use js_sys::{Float32Array, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlFramebuffer, WebGlProgram, WebGlShader,
    WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::shaders;
use crate::post::{FrameUniforms, OFFSCREEN_MOUSE};

/// Acquire a WebGL2 context with an alpha channel so the page shows
/// through wherever no plane is drawn.
pub fn context(canvas: &HtmlCanvasElement) -> Result<GL, JsValue> {
    let options = Object::new();
    Reflect::set(&options, &"alpha".into(), &JsValue::TRUE)?;
    Reflect::set(&options, &"antialias".into(), &JsValue::TRUE)?;
    let gl: GL = canvas
        .get_context_with_context_options("webgl2", &options)?
        .ok_or("WebGL2 not supported")?
        .dyn_into()?;
    Ok(gl)
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl.create_shader(kind).ok_or("failed to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(format!("shader compile failed: {log}").into())
    }
}

fn link_program(gl: &GL, vertex: &str, fragment: &str) -> Result<WebGlProgram, JsValue> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;
    let program = gl.create_program().ok_or("failed to create program")?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(format!("program link failed: {log}").into())
    }
}

/// Upload interleaved vertex data into a fresh VAO. `attrs` lists
/// `(location, components, byte offset)` per attribute.
fn build_vao(
    gl: &GL,
    vertices: &[f32],
    stride: i32,
    attrs: &[(u32, i32, i32)],
) -> Result<WebGlVertexArrayObject, JsValue> {
    let vao = gl.create_vertex_array().ok_or("failed to create VAO")?;
    gl.bind_vertex_array(Some(&vao));

    let buffer = gl.create_buffer().ok_or("failed to create buffer")?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    let data = Float32Array::from(vertices);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &data, GL::STATIC_DRAW);

    for &(location, components, offset) in attrs {
        gl.enable_vertex_attrib_array(location);
        gl.vertex_attrib_pointer_with_i32(location, components, GL::FLOAT, false, stride, offset);
    }
    gl.bind_vertex_array(None);
    Ok(vao)
}

/// Offscreen color buffer the scene pass renders into and the
/// distortion pass samples from.
pub struct RenderTarget {
    framebuffer: WebGlFramebuffer,
    texture: WebGlTexture,
    width: i32,
    height: i32,
}

impl RenderTarget {
    pub fn new(gl: &GL, width: i32, height: i32) -> Result<Self, JsValue> {
        let texture = gl.create_texture().ok_or("failed to create texture")?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        allocate_rgba(gl, width, height)?;
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);

        let framebuffer = gl.create_framebuffer().ok_or("failed to create framebuffer")?;
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&framebuffer));
        gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(&texture),
            0,
        );
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);

        Ok(Self {
            framebuffer,
            texture,
            width,
            height,
        })
    }

    /// Reallocate the color buffer after a canvas resize.
    pub fn resize(&mut self, gl: &GL, width: i32, height: i32) -> Result<(), JsValue> {
        if width == self.width && height == self.height {
            return Ok(());
        }
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.texture));
        allocate_rgba(gl, width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Bind as the draw target and match the viewport to its size.
    pub fn bind(&self, gl: &GL) {
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.framebuffer));
        gl.viewport(0, 0, self.width, self.height);
    }

    pub fn texture(&self) -> &WebGlTexture {
        &self.texture
    }
}

fn allocate_rgba(gl: &GL, width: i32, height: i32) -> Result<(), JsValue> {
    gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        width,
        height,
        0,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        None,
    )
}

/// Scene pass: one textured unit quad per tracked image.
pub struct PlanePass {
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    u_view_projection: Option<WebGlUniformLocation>,
    u_translate: Option<WebGlUniformLocation>,
    u_scale: Option<WebGlUniformLocation>,
    u_cover: Option<WebGlUniformLocation>,
    u_map: Option<WebGlUniformLocation>,
}

impl PlanePass {
    pub fn new(gl: &GL) -> Result<Self, JsValue> {
        let program = link_program(gl, shaders::PLANE_VERTEX, shaders::PLANE_FRAGMENT)?;
        // x, y, u, v per vertex; triangle strip order
        let vertices: [f32; 16] = [
            -0.5, -0.5, 0.0, 0.0, //
            0.5, -0.5, 1.0, 0.0, //
            -0.5, 0.5, 0.0, 1.0, //
            0.5, 0.5, 1.0, 1.0,
        ];
        let vao = build_vao(gl, &vertices, 16, &[(0, 2, 0), (1, 2, 8)])?;

        let u_view_projection = gl.get_uniform_location(&program, "uViewProjection");
        let u_translate = gl.get_uniform_location(&program, "uTranslate");
        let u_scale = gl.get_uniform_location(&program, "uScale");
        let u_cover = gl.get_uniform_location(&program, "uCover");
        let u_map = gl.get_uniform_location(&program, "uMap");

        Ok(Self {
            program,
            vao,
            u_view_projection,
            u_translate,
            u_scale,
            u_cover,
            u_map,
        })
    }

    /// Select the pass and upload the per-frame camera matrix.
    pub fn bind(&self, gl: &GL, view_projection: &Mat4) {
        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));
        gl.uniform_matrix4fv_with_f32_array(
            self.u_view_projection.as_ref(),
            false,
            &view_projection.to_cols_array(),
        );
        gl.uniform1i(self.u_map.as_ref(), 0);
    }

    /// Draw one plane. Call [`PlanePass::bind`] first.
    pub fn draw(&self, gl: &GL, translate: Vec2, scale: Vec2, cover: Vec2, texture: &WebGlTexture) {
        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(texture));
        gl.uniform2f(self.u_translate.as_ref(), translate.x, translate.y);
        gl.uniform2f(self.u_scale.as_ref(), scale.x, scale.y);
        gl.uniform2f(self.u_cover.as_ref(), cover.x, cover.y);
        gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
    }
}

/// Distortion pass: samples the render target onto the screen through
/// the warp shader.
pub struct PostPass {
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    u_diffuse: Option<WebGlUniformLocation>,
    u_time: Option<WebGlUniformLocation>,
    u_velo: Option<WebGlUniformLocation>,
    u_mouse: Option<WebGlUniformLocation>,
    u_resolution: Option<WebGlUniformLocation>,
}

impl PostPass {
    pub fn new(gl: &GL) -> Result<Self, JsValue> {
        let program = link_program(gl, shaders::POST_VERTEX, shaders::POST_FRAGMENT)?;
        // One triangle large enough to cover clip space.
        let vertices: [f32; 6] = [-1.0, -3.0, 3.0, 1.0, -1.0, 1.0];
        let vao = build_vao(gl, &vertices, 8, &[(0, 2, 0)])?;

        let u_diffuse = gl.get_uniform_location(&program, "tDiffuse");
        let u_time = gl.get_uniform_location(&program, "time");
        let u_velo = gl.get_uniform_location(&program, "uVelo");
        let u_mouse = gl.get_uniform_location(&program, "uMouse");
        let u_resolution = gl.get_uniform_location(&program, "resolution");

        // Park the pointer far outside UV space until a frame writes
        // real values, so the mask cannot touch any fragment yet.
        gl.use_program(Some(&program));
        gl.uniform2f(u_mouse.as_ref(), OFFSCREEN_MOUSE.x, OFFSCREEN_MOUSE.y);

        Ok(Self {
            program,
            vao,
            u_diffuse,
            u_time,
            u_velo,
            u_mouse,
            u_resolution,
        })
    }

    /// Draw the full-screen warp into the currently bound framebuffer.
    pub fn draw(&self, gl: &GL, uniforms: &FrameUniforms, source: &WebGlTexture) {
        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));
        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(source));
        gl.uniform1i(self.u_diffuse.as_ref(), 0);
        gl.uniform1f(self.u_time.as_ref(), uniforms.time);
        gl.uniform1f(self.u_velo.as_ref(), uniforms.velocity);
        gl.uniform2f(self.u_mouse.as_ref(), uniforms.mouse.x, uniforms.mouse.y);
        gl.uniform2f(
            self.u_resolution.as_ref(),
            uniforms.resolution.x,
            uniforms.resolution.y,
        );
        gl.draw_arrays(GL::TRIANGLES, 0, 3);
        gl.bind_vertex_array(None);
    }
}
