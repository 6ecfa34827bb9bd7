// mesh.rs: sphere strip and overlay rectangle geometry

use crate::camera::FrustumBounds;
use std::f64::consts::PI;

/// Fixed UVs of the overlay rectangle, index aligned with `build_rectangle`.
pub const RECTANGLE_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];

#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
}

impl SphereMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Number of strip vertices produced by `build_sphere`. Zero steps in either
/// direction give an empty mesh.
pub fn sphere_vertex_count(tetta_steps: usize, phi_steps: usize) -> usize {
    if tetta_steps == 0 || phi_steps == 0 {
        return 0;
    }
    (phi_steps + 1) * (2 * (tetta_steps + 1) - 2)
}

/// Builds a triangle-strip sphere, one latitude band per outer step.
///
/// Every (tetta, phi) sample emits two vertices, one on the band's upper edge
/// and one on its lower edge, so consecutive pairs form the "ladder" of the
/// strip. Loops run on integer indices so the last band and the seam column
/// (phi = 2π) are always emitted.
pub fn build_sphere(radius: f32, tetta_steps: usize, phi_steps: usize) -> SphereMesh {
    let count = sphere_vertex_count(tetta_steps, phi_steps);
    if count == 0 {
        return SphereMesh { positions: Vec::new(), uvs: Vec::new() };
    }
    let mut positions = Vec::with_capacity(count);
    let mut uvs = Vec::with_capacity(count);

    let r = radius as f64;
    let tetta_step = PI / tetta_steps as f64;
    let phi_step = 2.0 * PI / phi_steps as f64;

    for i in 0..tetta_steps {
        for j in 0..=phi_steps {
            let phi = j as f64 * phi_step;
            let u = j as f64 / phi_steps as f64;

            for band in [i, i + 1] {
                let tetta = band as f64 * tetta_step;
                positions.push([
                    (r * tetta.sin() * phi.cos()) as f32,
                    (r * tetta.cos()) as f32,
                    (r * tetta.sin() * phi.sin()) as f32,
                ]);
                // 视频上下颠倒映射: v = 1 - tetta / PI
                let v = 1.0 - band as f64 / tetta_steps as f64;
                uvs.push([u as f32, v as f32]);
            }
        }
    }

    SphereMesh { positions, uvs }
}

/// Full-width quad over the bottom `split_fraction` of the frustum range.
pub fn build_rectangle(bounds: &FrustumBounds, split_fraction: f32) -> [[f32; 3]; 4] {
    let strip_top = bounds.bottom + (bounds.top - bounds.bottom) * split_fraction;
    [
        [bounds.left, bounds.bottom, 0.0],
        [bounds.left, strip_top, 0.0],
        [bounds.right, bounds.bottom, 0.0],
        [bounds.right, strip_top, 0.0],
    ]
}
