//! Warped image gallery: page `<img>` elements mirrored as textured
//! planes in a WebGL2 scene, kept in lockstep with document layout and
//! smoothed scrolling, then drawn through a full-screen pass that
//! smears the picture around the pointer in proportion to how fast it
//! is moving.
//!
//! The geometry, filtering, and uniform math live in plain modules
//! that compile (and test) on any target; everything that touches the
//! DOM or the GPU sits behind `wasm32` and is driven by the exported
//! `Effect` handle.

pub mod camera;
pub mod config;
pub mod layout;
pub mod math;
pub mod pointer;
pub mod post;
pub mod scroll;

#[cfg(target_arch = "wasm32")]
mod wasm {
    mod events;
    mod gl;
    mod scene;
    mod shaders;
    mod texture;

    pub use scene::Effect;

    use wasm_bindgen::prelude::*;

    /// Module entry point: sets up panic reporting and logging. The
    /// page constructs an [`Effect`] itself once its DOM is ready.
    #[wasm_bindgen(start)]
    pub fn main() {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("warp module loaded");
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::Effect;
