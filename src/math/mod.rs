//! Geometry value types shared by the tracking, camera, and filter code.

mod rect;
mod viewport;

pub use rect::Rect;
pub use viewport::Viewport;
