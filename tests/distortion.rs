#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

// Mirror of the fragment shader's falloff: UV delta, aspect correction,
// then a descending smoothstep over the distance.
fn falloff(uv: (f64, f64), center: (f64, f64), res: (f64, f64)) -> f64 {
    let dx = (uv.0 - center.0) * res.0;
    let dy = (uv.1 - center.1) * res.1;
    let dist = (dx * dx + dy * dy).sqrt();
    smoothstep(0.2, -0.2, dist)
}

fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn aspect(width: f64, height: f64) -> (f64, f64) {
    (1.0, height / width)
}

#[wasm_bindgen_test]
fn falloff_stays_round_on_any_aspect() {
    let resolutions = [(1920.0, 1080.0), (1080.0, 1920.0), (800.0, 800.0)];
    let center = (0.5, 0.5);
    let pixel_radius = 150.0;

    for &(w, h) in &resolutions {
        let res = aspect(w, h);
        // Sample the same pixel distance in several directions.
        let mut values = Vec::new();
        for step in 0..8 {
            let angle = std::f64::consts::PI * 2.0 * step as f64 / 8.0;
            let uv = (
                center.0 + pixel_radius * angle.cos() / w,
                center.1 + pixel_radius * angle.sin() / h,
            );
            values.push(falloff(uv, center, res));
        }

        let first = values[0];
        assert!(first > 0.0 && first < 1.0, "sample must sit on the slope");
        for (i, value) in values.iter().enumerate() {
            assert!(
                (value - first).abs() < 1e-9,
                "direction {i} at {w}x{h}: {value} != {first}"
            );
        }
    }
}

#[wasm_bindgen_test]
fn falloff_peaks_at_the_pointer_and_dies_off() {
    let res = aspect(1920.0, 1080.0);
    let center = (0.5, 0.5);

    // Zero radius puts the pointer mid-transition: the peak is 0.5.
    assert!((falloff(center, center, res) - 0.5).abs() < 1e-12);
    assert_eq!(falloff((0.95, 0.5), center, res), 0.0);

    // Monotone decay outward.
    let near = falloff((0.52, 0.5), center, res);
    let far = falloff((0.58, 0.5), center, res);
    assert!(near > far && far > 0.0);
}
