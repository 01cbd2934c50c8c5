//! Per-image GPU textures with asynchronous readiness.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlImageElement, WebGl2RenderingContext as GL, WebGlTexture};

const TRANSPARENT_PIXEL: [u8; 4] = [0, 0, 0, 0];

/// Loading state of a plane's texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureState {
    /// Decode still in flight; the placeholder is bound.
    Pending,
    /// Decoded bitmap uploaded.
    Ready,
    /// Decode or upload rejected; the plane stays invisible.
    Failed,
}

/// Texture for one tracked image.
///
/// Starts as a 1x1 transparent placeholder so its plane can be drawn
/// on the very first frame, then swaps in the decoded bitmap once the
/// browser hands it over.
pub struct PlaneTexture {
    texture: WebGlTexture,
    state: Rc<Cell<TextureState>>,
}

impl PlaneTexture {
    pub fn new(gl: &GL, image: &HtmlImageElement) -> Result<Self, JsValue> {
        let texture = gl.create_texture().ok_or("failed to create texture")?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            GL::RGBA as i32,
            1,
            1,
            0,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            Some(&TRANSPARENT_PIXEL),
        )?;
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);

        let state = Rc::new(Cell::new(TextureState::Pending));

        let gl = gl.clone();
        let image = image.clone();
        let target = texture.clone();
        let slot = state.clone();
        spawn_local(async move {
            match JsFuture::from(image.decode()).await {
                Ok(_) => match upload(&gl, &target, &image) {
                    Ok(()) => slot.set(TextureState::Ready),
                    Err(err) => {
                        log::warn!("texture upload failed: {err:?}");
                        slot.set(TextureState::Failed);
                    }
                },
                Err(err) => {
                    log::warn!(
                        "image decode failed for {}: {err:?}",
                        image.current_src()
                    );
                    slot.set(TextureState::Failed);
                }
            }
        });

        Ok(Self { texture, state })
    }

    pub fn is_ready(&self) -> bool {
        self.state.get() == TextureState::Ready
    }

    pub fn texture(&self) -> &WebGlTexture {
        &self.texture
    }
}

fn upload(gl: &GL, texture: &WebGlTexture, image: &HtmlImageElement) -> Result<(), JsValue> {
    gl.bind_texture(GL::TEXTURE_2D, Some(texture));
    // Image data is top-to-bottom; UV space is bottom-to-top.
    gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 1);
    let result = gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        image,
    );
    gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 0);
    result
}
