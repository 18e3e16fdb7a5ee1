//! Background raster layer with a WebGL backend and a 2D canvas fallback.
//!
//! The image covers the world rect `[0, width_m] x [0, height_m]`, with its
//! top pixel row at the northern edge. Each frame only the part of the image
//! inside the visible world rect is drawn: [`placement`] computes the shared
//! source, destination and texture rectangles and both backends consume it.
//!
//! The backend is chosen once by [`select_backend`]. The WebGL backend
//! uploads the texture once per image; pan and zoom only rewrite the quad.

#[cfg(test)]
#[path = "background_test.rs"]
mod background_test;

use log::{info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext as Gl,
    WebGlShader, WebGlTexture,
};

use crate::camera::{Camera, Size, WorldPoint, WorldRect};
use crate::consts::{BACKGROUND_CLEAR_COLOR, BACKGROUND_CLEAR_RGBA};

/// Where the visible part of the image goes this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundPlacement {
    /// Source rect in image pixels: x, y, width, height.
    pub src: [f64; 4],
    /// Destination rect in screen pixels: x, y, width, height.
    pub dst: [f64; 4],
    /// Texture coordinates: u0, v0, u1, v1 (v grows downward).
    pub tex: [f64; 4],
}

/// Visible part of an image of `image_px` pixels covering `world_size` meters.
/// `None` when nothing of it is on screen or any size is degenerate.
#[must_use]
pub fn placement(camera: &Camera, viewport: Size, image_px: Size, world_size: Size) -> Option<BackgroundPlacement> {
    if image_px.width <= 0.0 || image_px.height <= 0.0 || world_size.width <= 0.0 || world_size.height <= 0.0 {
        return None;
    }
    let image_rect = WorldRect { min_x: 0.0, max_x: world_size.width, min_z: 0.0, max_z: world_size.height };
    let draw = camera.visible_world_rect(viewport).intersect(&image_rect)?;

    let u0 = draw.min_x / world_size.width;
    let u1 = draw.max_x / world_size.width;
    let v0 = 1.0 - draw.max_z / world_size.height;
    let v1 = 1.0 - draw.min_z / world_size.height;

    let top_left = camera.world_to_screen(WorldPoint::new(draw.min_x, draw.max_z));
    let bottom_right = camera.world_to_screen(WorldPoint::new(draw.max_x, draw.min_z));

    Some(BackgroundPlacement {
        src: [u0 * image_px.width, v0 * image_px.height, (u1 - u0) * image_px.width, (v1 - v0) * image_px.height],
        dst: [top_left.x, top_left.y, bottom_right.x - top_left.x, bottom_right.y - top_left.y],
        tex: [u0, v0, u1, v1],
    })
}

/// A backend able to draw the background layer.
pub trait BackgroundRenderer {
    /// Backend name for logs and the status bar.
    fn name(&self) -> &'static str;

    /// Take a decoded image as the current background.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the browser rejects the upload.
    fn set_image(&mut self, image: &HtmlImageElement) -> Result<(), JsValue>;

    /// Forget the current image.
    fn clear_image(&mut self);

    /// Pixel dimensions of the current image, if any.
    fn image_size(&self) -> Option<Size>;

    /// Match the backing store size, in device pixels.
    fn resize(&mut self, width_px: u32, height_px: u32);

    /// Clear the layer and draw the image part described by `placement`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a browser drawing call fails.
    fn draw(&self, viewport: Size, placement: Option<&BackgroundPlacement>, opacity: f64) -> Result<(), JsValue>;
}

/// Pick WebGL when the background canvas supports it, otherwise draw the
/// background with 2D calls on `fallback_ctx`.
///
/// # Errors
///
/// Returns `Err` only if neither backend can be created.
pub fn select_backend(
    background_canvas: &HtmlCanvasElement,
    fallback_ctx: &CanvasRenderingContext2d,
) -> Result<Box<dyn BackgroundRenderer>, JsValue> {
    match webgl_context(background_canvas) {
        Ok(Some(gl)) => match WebGlBackground::new(gl) {
            Ok(backend) => {
                info!("background: using WebGL backend");
                return Ok(Box::new(backend));
            }
            Err(e) => warn!("background: WebGL setup failed: {e:?}"),
        },
        Ok(None) => info!("background: WebGL unavailable"),
        Err(e) => warn!("background: WebGL context request failed: {e:?}"),
    }
    info!("background: using 2D canvas backend");
    Ok(Box::new(Canvas2dBackground::new(fallback_ctx.clone())))
}

fn webgl_context(canvas: &HtmlCanvasElement) -> Result<Option<Gl>, JsValue> {
    let Some(ctx) = canvas.get_context("webgl")? else {
        return Ok(None);
    };
    Ok(Some(ctx.dyn_into::<Gl>()?))
}

// =============================================================
// WebGL
// =============================================================

const VERTEX_SHADER: &str = r"
attribute vec2 a_position;
attribute vec2 a_texCoord;
varying vec2 v_texCoord;
uniform vec2 u_resolution;

void main() {
    vec2 clipSpace = ((a_position / u_resolution) * 2.0) - 1.0;
    gl_Position = vec4(clipSpace * vec2(1, -1), 0, 1);
    v_texCoord = a_texCoord;
}
";

const FRAGMENT_SHADER: &str = r"
precision mediump float;
uniform sampler2D u_texture;
uniform float u_opacity;
varying vec2 v_texCoord;

void main() {
    vec4 texColor = texture2D(u_texture, v_texCoord);
    gl_FragColor = vec4(texColor.rgb, texColor.a * u_opacity);
}
";

/// Textured-quad backend. One quad per frame, texture uploaded once per image.
pub struct WebGlBackground {
    gl: Gl,
    program: WebGlProgram,
    texture: WebGlTexture,
    position_buffer: WebGlBuffer,
    tex_coord_buffer: WebGlBuffer,
    image_size: Option<Size>,
}

impl WebGlBackground {
    /// Compile the shaders and allocate the texture and quad buffers.
    ///
    /// # Errors
    ///
    /// Returns `Err` on shader compile or link failure, or if the context
    /// refuses to allocate a resource.
    pub fn new(gl: Gl) -> Result<Self, JsValue> {
        let vertex = compile_shader(&gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
        let fragment = compile_shader(&gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = gl.create_program().ok_or_else(|| JsValue::from_str("create_program failed"))?;
        gl.attach_shader(&program, &vertex);
        gl.attach_shader(&program, &fragment);
        gl.link_program(&program);
        if !gl.get_program_parameter(&program, Gl::LINK_STATUS).as_bool().unwrap_or(false) {
            let log = gl.get_program_info_log(&program).unwrap_or_default();
            return Err(JsValue::from_str(&format!("program link failed: {log}")));
        }

        let texture = gl.create_texture().ok_or_else(|| JsValue::from_str("create_texture failed"))?;
        gl.bind_texture(Gl::TEXTURE_2D, Some(&texture));
        set_texture_params(&gl);
        gl.bind_texture(Gl::TEXTURE_2D, None);

        let position_buffer = gl.create_buffer().ok_or_else(|| JsValue::from_str("create_buffer failed"))?;
        let tex_coord_buffer = gl.create_buffer().ok_or_else(|| JsValue::from_str("create_buffer failed"))?;

        Ok(Self { gl, program, texture, position_buffer, tex_coord_buffer, image_size: None })
    }

    fn clear(&self) {
        let [r, g, b, a] = BACKGROUND_CLEAR_RGBA;
        self.gl.clear_color(r, g, b, a);
        self.gl.clear(Gl::COLOR_BUFFER_BIT);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn upload_quad(&self, buffer: &WebGlBuffer, attribute: &str, data: [f64; 8]) {
        let data = data.map(|v| v as f32);
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
        self.gl
            .buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &js_sys::Float32Array::from(&data[..]), Gl::DYNAMIC_DRAW);
        let Ok(location) = u32::try_from(self.gl.get_attrib_location(&self.program, attribute)) else {
            return;
        };
        self.gl.enable_vertex_attrib_array(location);
        self.gl.vertex_attrib_pointer_with_i32(location, 2, Gl::FLOAT, false, 0, 0);
    }
}

impl BackgroundRenderer for WebGlBackground {
    fn name(&self) -> &'static str {
        "webgl"
    }

    fn set_image(&mut self, image: &HtmlImageElement) -> Result<(), JsValue> {
        let gl = &self.gl;
        gl.bind_texture(Gl::TEXTURE_2D, Some(&self.texture));
        gl.pixel_storei(Gl::UNPACK_FLIP_Y_WEBGL, 0);
        #[allow(clippy::cast_possible_wrap)]
        gl.tex_image_2d_with_u32_and_u32_and_image(
            Gl::TEXTURE_2D,
            0,
            Gl::RGBA as i32,
            Gl::RGBA,
            Gl::UNSIGNED_BYTE,
            image,
        )?;
        set_texture_params(gl);
        gl.bind_texture(Gl::TEXTURE_2D, None);
        self.image_size = Some(Size::new(f64::from(image.natural_width()), f64::from(image.natural_height())));
        Ok(())
    }

    fn clear_image(&mut self) {
        self.image_size = None;
    }

    fn image_size(&self) -> Option<Size> {
        self.image_size
    }

    #[allow(clippy::cast_possible_wrap)]
    fn resize(&mut self, width_px: u32, height_px: u32) {
        self.gl.viewport(0, 0, width_px as i32, height_px as i32);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw(&self, viewport: Size, placement: Option<&BackgroundPlacement>, opacity: f64) -> Result<(), JsValue> {
        self.clear();
        let Some(p) = placement else {
            return Ok(());
        };
        if self.image_size.is_none() {
            return Ok(());
        }
        let gl = &self.gl;
        gl.use_program(Some(&self.program));

        let [x, y, w, h] = p.dst;
        let (x2, y2) = (x + w, y + h);
        self.upload_quad(&self.position_buffer, "a_position", [x, y, x2, y, x, y2, x2, y2]);
        let [u0, v0, u1, v1] = p.tex;
        self.upload_quad(&self.tex_coord_buffer, "a_texCoord", [u0, v0, u1, v0, u0, v1, u1, v1]);

        let resolution = gl.get_uniform_location(&self.program, "u_resolution");
        gl.uniform2f(resolution.as_ref(), viewport.width as f32, viewport.height as f32);

        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_2D, Some(&self.texture));
        let sampler = gl.get_uniform_location(&self.program, "u_texture");
        gl.uniform1i(sampler.as_ref(), 0);
        let opacity_location = gl.get_uniform_location(&self.program, "u_opacity");
        gl.uniform1f(opacity_location.as_ref(), opacity.clamp(0.0, 1.0) as f32);

        gl.enable(Gl::BLEND);
        gl.blend_func(Gl::SRC_ALPHA, Gl::ONE_MINUS_SRC_ALPHA);
        gl.draw_arrays(Gl::TRIANGLE_STRIP, 0, 4);
        Ok(())
    }
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl.create_shader(kind).ok_or_else(|| JsValue::from_str("create_shader failed"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl.get_shader_parameter(&shader, Gl::COMPILE_STATUS).as_bool().unwrap_or(false) {
        return Ok(shader);
    }
    let log = gl.get_shader_info_log(&shader).unwrap_or_default();
    gl.delete_shader(Some(&shader));
    Err(JsValue::from_str(&format!("shader compile failed: {log}")))
}

#[allow(clippy::cast_possible_wrap)]
fn set_texture_params(gl: &Gl) {
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_S, Gl::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_T, Gl::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MIN_FILTER, Gl::LINEAR as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MAG_FILTER, Gl::LINEAR as i32);
}

// =============================================================
// 2D canvas
// =============================================================

/// Fallback backend drawing with `drawImage` and `globalAlpha`.
pub struct Canvas2dBackground {
    ctx: CanvasRenderingContext2d,
    image: Option<HtmlImageElement>,
}

impl Canvas2dBackground {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx, image: None }
    }
}

impl BackgroundRenderer for Canvas2dBackground {
    fn name(&self) -> &'static str {
        "canvas2d"
    }

    fn set_image(&mut self, image: &HtmlImageElement) -> Result<(), JsValue> {
        self.image = Some(image.clone());
        Ok(())
    }

    fn clear_image(&mut self) {
        self.image = None;
    }

    fn image_size(&self) -> Option<Size> {
        self.image
            .as_ref()
            .map(|img| Size::new(f64::from(img.natural_width()), f64::from(img.natural_height())))
    }

    fn resize(&mut self, _width_px: u32, _height_px: u32) {}

    fn draw(&self, viewport: Size, placement: Option<&BackgroundPlacement>, opacity: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(BACKGROUND_CLEAR_COLOR);
        ctx.fill_rect(0.0, 0.0, viewport.width, viewport.height);
        let (Some(image), Some(p)) = (self.image.as_ref(), placement) else {
            return Ok(());
        };
        let [sx, sy, sw, sh] = p.src;
        let [dx, dy, dw, dh] = p.dst;
        ctx.save();
        ctx.set_global_alpha(opacity.clamp(0.0, 1.0));
        let result = ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
            image, sx, sy, sw, sh, dx, dy, dw, dh,
        );
        ctx.restore();
        result
    }
}
