//! Scene controller: mirrors page images as textured planes, runs the
//! frame loop, and owns the canvas lifecycle.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlCanvasElement, HtmlImageElement, MouseEvent, WebGl2RenderingContext as GL,
    Window,
};

use crate::camera::ScreenCamera;
use crate::config::{EffectConfig, MAX_PIXEL_RATIO};
use crate::layout::{cover_scale, document_bounds, plane_scale, plane_translation};
use crate::math::{Rect, Viewport};
use crate::pointer::PointerFilter;
use crate::post::PostState;
use crate::scroll::SmoothScroll;

use super::events::Subscriptions;
use super::gl::{self, PlanePass, PostPass, RenderTarget};
use super::texture::PlaneTexture;

/// One tracked `<img>`: its element, document-space box, and texture.
struct Plane {
    element: HtmlImageElement,
    bounds: Rect,
    texture: PlaneTexture,
}

struct Scene {
    config: EffectConfig,
    gl: GL,
    canvas: HtmlCanvasElement,
    viewport: Viewport,
    pixel_ratio: f32,
    camera: ScreenCamera,
    plane_pass: PlanePass,
    post_pass: PostPass,
    target: RenderTarget,
    planes: Vec<Plane>,
    scroll: SmoothScroll,
    pointer: PointerFilter,
    post: PostState,
}

impl Scene {
    fn frame(&mut self) {
        if self.config.track_layout_every_frame {
            if let Some(window) = web_sys::window() {
                let dom_scroll = window.scroll_y().unwrap_or(0.0) as f32;
                self.refresh_bounds(dom_scroll);
            }
        }

        let scroll = self.scroll.advance();
        let uniforms = self.post.advance(&mut self.pointer);

        let gl = &self.gl;
        self.target.bind(gl);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT);

        self.plane_pass.bind(gl, &self.camera.view_projection());
        for plane in &self.planes {
            let translate = plane_translation(&plane.bounds, scroll, self.viewport);
            let scale = plane_scale(&plane.bounds);
            let cover = cover_scale(
                &plane.bounds,
                plane.element.natural_width() as f32,
                plane.element.natural_height() as f32,
            );
            self.plane_pass
                .draw(gl, translate, scale, cover, plane.texture.texture());
        }

        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        gl.viewport(0, 0, self.canvas.width() as i32, self.canvas.height() as i32);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT);
        self.post_pass.draw(gl, &uniforms, self.target.texture());
    }

    fn handle_scroll(&mut self) {
        if let Some(window) = web_sys::window() {
            if let Ok(offset) = window.scroll_y() {
                self.scroll.set_target(offset as f32);
            }
        }
    }

    fn handle_pointer(&mut self, client_x: f32, client_y: f32) {
        let position = PointerFilter::normalize(client_x, client_y, self.viewport);
        self.pointer.on_move(position);
    }

    fn handle_resize(&mut self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        self.viewport = window_viewport(&window)?;
        self.pixel_ratio = (window.device_pixel_ratio() as f32).min(MAX_PIXEL_RATIO);

        let width = (self.viewport.width * self.pixel_ratio) as u32;
        let height = (self.viewport.height * self.pixel_ratio) as u32;
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.target.resize(&self.gl, width as i32, height as i32)?;

        self.camera.resize(self.viewport);
        self.post.set_viewport(self.viewport);

        let dom_scroll = window.scroll_y().unwrap_or(0.0) as f32;
        self.refresh_bounds(dom_scroll);
        Ok(())
    }

    /// Re-read every element's box, folding the live scroll offset
    /// back into document space.
    fn refresh_bounds(&mut self, dom_scroll: f32) {
        for plane in &mut self.planes {
            plane.bounds = document_bounds(&element_rect(&plane.element), dom_scroll);
        }
    }
}

/// Handle exported to the page. Constructing it boots the whole
/// pipeline; dropping it (or calling `free()`) tears everything down
/// again: pending frame canceled, listeners removed, canvas detached.
#[wasm_bindgen]
pub struct Effect {
    scene: Rc<RefCell<Scene>>,
    // Holds the frame closure so it can reschedule itself; the Option
    // lets the closure be created before it grabs a reference to its
    // own slot.
    frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    frame_id: Rc<Cell<i32>>,
    _subscriptions: Subscriptions,
}

#[wasm_bindgen]
impl Effect {
    /// Start with default options.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Effect, JsValue> {
        Self::build(EffectConfig::default())
    }

    /// Start from a JSON options object with camelCase keys, e.g.
    /// `{"containerSelector": ".webgl", "scrollLerp": 0.1}`.
    #[wasm_bindgen(js_name = withOptions)]
    pub fn with_options(json: &str) -> Result<Effect, JsValue> {
        let config = EffectConfig::from_json(json)
            .map_err(|err| JsValue::from_str(&format!("invalid options: {err}")))?;
        Self::build(config)
    }

    /// Number of images mirrored as planes.
    #[wasm_bindgen(js_name = planeCount)]
    pub fn plane_count(&self) -> usize {
        self.scene.borrow().planes.len()
    }

    /// Number of planes whose bitmap finished uploading.
    #[wasm_bindgen(js_name = texturesReady)]
    pub fn textures_ready(&self) -> usize {
        self.scene
            .borrow()
            .planes
            .iter()
            .filter(|plane| plane.texture.is_ready())
            .count()
    }
}

impl Effect {
    fn build(config: EffectConfig) -> Result<Effect, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Start every session from the top of the page.
        window.scroll_to_with_x_and_y(0.0, 0.0);

        let container = document
            .query_selector(&config.container_selector)?
            .ok_or_else(|| {
                JsValue::from_str(&format!(
                    "no element matches container selector {:?}",
                    config.container_selector
                ))
            })?;

        let viewport = window_viewport(&window)?;
        let pixel_ratio = (window.device_pixel_ratio() as f32).min(MAX_PIXEL_RATIO);

        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        canvas.set_width((viewport.width * pixel_ratio) as u32);
        canvas.set_height((viewport.height * pixel_ratio) as u32);
        let style = canvas.style();
        style.set_property("width", "100%")?;
        style.set_property("height", "100%")?;
        style.set_property("display", "block")?;
        container.append_child(&canvas)?;

        let gl = gl::context(&canvas)?;
        let plane_pass = PlanePass::new(&gl)?;
        let post_pass = PostPass::new(&gl)?;
        let target = RenderTarget::new(&gl, canvas.width() as i32, canvas.height() as i32)?;

        let dom_scroll = window.scroll_y().unwrap_or(0.0) as f32;
        let planes = collect_planes(&document, &gl, dom_scroll)?;
        if planes.is_empty() {
            log::warn!("no <img> elements found; running with an empty scene");
        } else {
            log::info!("tracking {} image planes", planes.len());
        }

        let mut scroll = SmoothScroll::new(config.scroll_lerp);
        scroll.jump_to(dom_scroll);

        let camera = ScreenCamera::new(viewport, config.camera_distance);
        let pointer = PointerFilter::new(&config);
        let post = PostState::new(&config, viewport);

        let scene = Rc::new(RefCell::new(Scene {
            config,
            gl,
            canvas,
            viewport,
            pixel_ratio,
            camera,
            plane_pass,
            post_pass,
            target,
            planes,
            scroll,
            pointer,
            post,
        }));

        let mut subscriptions = Subscriptions::new();
        register_events(&window, &scene, &mut subscriptions)?;

        let frame = Rc::new(RefCell::new(None));
        let frame_id = Rc::new(Cell::new(0));
        start_frame_loop(&window, &scene, &frame, &frame_id)?;

        Ok(Effect {
            scene,
            frame,
            frame_id,
            _subscriptions: subscriptions,
        })
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(self.frame_id.get());
        }
        // Break the closure's reference to its own slot so it frees.
        self.frame.borrow_mut().take();
        self.scene.borrow().canvas.remove();
    }
}

fn window_viewport(window: &Window) -> Result<Viewport, JsValue> {
    let width = window
        .inner_width()?
        .as_f64()
        .ok_or("window width is not a number")? as f32;
    let height = window
        .inner_height()?
        .as_f64()
        .ok_or("window height is not a number")? as f32;
    Ok(Viewport::new(width, height))
}

fn element_rect(element: &HtmlImageElement) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

fn collect_planes(document: &Document, gl: &GL, dom_scroll: f32) -> Result<Vec<Plane>, JsValue> {
    let nodes = document.query_selector_all("img")?;
    let mut planes = Vec::with_capacity(nodes.length() as usize);
    for index in 0..nodes.length() {
        let Some(node) = nodes.item(index) else { continue };
        let Ok(element) = node.dyn_into::<HtmlImageElement>() else {
            continue;
        };
        let bounds = document_bounds(&element_rect(&element), dom_scroll);
        let texture = PlaneTexture::new(gl, &element)?;
        planes.push(Plane {
            element,
            bounds,
            texture,
        });
    }
    Ok(planes)
}

fn register_events(
    window: &Window,
    scene: &Rc<RefCell<Scene>>,
    subscriptions: &mut Subscriptions,
) -> Result<(), JsValue> {
    {
        let scene = scene.clone();
        subscriptions.add(window.as_ref(), "resize", move |_| {
            if let Err(err) = scene.borrow_mut().handle_resize() {
                log::warn!("resize handling failed: {err:?}");
            }
        })?;
    }
    {
        let scene = scene.clone();
        subscriptions.add(window.as_ref(), "scroll", move |_| {
            scene.borrow_mut().handle_scroll();
        })?;
    }
    {
        let scene = scene.clone();
        subscriptions.add(window.as_ref(), "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                scene
                    .borrow_mut()
                    .handle_pointer(event.client_x() as f32, event.client_y() as f32);
            }
        })?;
    }
    Ok(())
}

fn start_frame_loop(
    window: &Window,
    scene: &Rc<RefCell<Scene>>,
    frame: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    frame_id: &Rc<Cell<i32>>,
) -> Result<(), JsValue> {
    let scene = scene.clone();
    let slot = frame.clone();
    let id = frame_id.clone();
    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        scene.borrow_mut().frame();

        let Some(window) = web_sys::window() else {
            return;
        };
        let borrowed = slot.borrow();
        if let Some(closure) = borrowed.as_ref() {
            if let Ok(next) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
                id.set(next);
            }
        }
    }) as Box<dyn FnMut()>));

    let borrowed = frame.borrow();
    let closure = borrowed.as_ref().ok_or("frame closure missing")?;
    frame_id.set(window.request_animation_frame(closure.as_ref().unchecked_ref())?);
    Ok(())
}
