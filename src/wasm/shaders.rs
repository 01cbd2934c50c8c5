//! GLSL ES 3.00 sources for the two render passes.

/// Scene pass vertex shader: places the unit quad at an element's
/// pixel position and size in the camera's screen-matched world.
pub const PLANE_VERTEX: &str = r##"#version 300 es

layout(location = 0) in vec2 position;
layout(location = 1) in vec2 uv;

uniform mat4 uViewProjection;
uniform vec2 uTranslate;
uniform vec2 uScale;

out vec2 vUv;

void main() {
    vUv = uv;
    vec2 world = position * uScale + uTranslate;
    gl_Position = uViewProjection * vec4(world, 0.0, 1.0);
}
"##;

/// Scene pass fragment shader: samples the image texture with a
/// cover-fit crop applied around the UV midpoint.
pub const PLANE_FRAGMENT: &str = r##"#version 300 es
precision highp float;

uniform sampler2D uMap;
uniform vec2 uCover;

in vec2 vUv;
out vec4 fragColor;

void main() {
    vec2 uv = (vUv - 0.5) * uCover + 0.5;
    fragColor = texture(uMap, uv);
}
"##;

/// Distortion pass vertex shader. One oversized triangle covers the
/// whole screen, so there is no diagonal seam to interpolate across.
pub const POST_VERTEX: &str = r##"#version 300 es

layout(location = 0) in vec2 position;

out vec2 vUv;

void main() {
    vUv = position * 0.5 + 0.5;
    gl_Position = vec4(position, 0.0, 1.0);
}
"##;

/// Distortion pass fragment shader.
///
/// A soft circular mask around `uMouse` (aspect-corrected by
/// `resolution`) gates a velocity-scaled UV smear, sampled once per
/// channel at slightly different offsets for a chromatic fringe.
/// Alpha comes from the undistorted sample so the pass stays
/// transparent where the scene is.
pub const POST_FRAGMENT: &str = r##"#version 300 es
precision highp float;

uniform sampler2D tDiffuse;
uniform float time;
uniform float uVelo;
uniform vec2 uMouse;
uniform vec2 resolution;

in vec2 vUv;
out vec4 fragColor;

float circle(vec2 uv, vec2 center, float radius, float border) {
    uv -= center;
    uv *= resolution;
    return smoothstep(radius + border, radius - border, sqrt(dot(uv, uv)));
}

void main() {
    vec2 newUV = vUv;
    float mask = circle(vUv, uMouse, 0.0, 0.2);

    // Offsets accumulate, pushing each channel a little further.
    newUV += mask * (uVelo * 0.50);
    float r = texture(tDiffuse, newUV).r;
    newUV += mask * (uVelo * 0.525);
    float g = texture(tDiffuse, newUV).g;
    newUV += mask * (uVelo * 0.55);
    float b = texture(tDiffuse, newUV).b;

    float a = texture(tDiffuse, vUv).a;
    fragColor = vec4(r, g, b, a);
}
"##;
