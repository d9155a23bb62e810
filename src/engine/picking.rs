// Pointer picking against the deforming surface.
//
// A world-space ray from the camera is moved into the surface's model space,
// tested against every triangle of the *live* positions with Möller–Trumbore,
// and the nearest positive hit wins. Distances are compared in world space so
// a scaled model transform still orders hits correctly.

use glam::{Mat4, Vec2, Vec3};

use super::camera::OrbitCamera;
use super::mesh::Face;
use super::surface::VertexField;

const EPSILON: f32 = 1e-7;

// ============================================================================
// RAY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Apply an affine transform to both origin and direction.
    /// The direction is not renormalized, so `t` keeps its meaning across spaces.
    pub fn transformed(&self, m: &Mat4) -> Ray {
        Ray {
            origin: m.transform_point3(self.origin),
            dir: m.transform_vector3(self.dir),
        }
    }
}

/// Parametric hit of a ray on one triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Ray parameter; the hit point is `ray.at(t)`.
    pub t: f32,
    /// Barycentric weights of v1 and v2 (v0 weight is 1 − u − v).
    pub uv: Vec2,
}

/// Möller–Trumbore ray/triangle intersection. Both windings count as hits.
/// Returns `None` for parallel rays, misses, and hits at or behind the origin.
pub fn intersect_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriangleHit> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let p = ray.dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin - v0;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = ray.dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(q) * inv_det;
    (t > EPSILON).then_some(TriangleHit { t, uv: Vec2::new(u, v) })
}

// ============================================================================
// PICKER
// ============================================================================

/// The nearest triangle under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    pub face: Face,
    pub face_index: usize,
    /// Intersection point in world space.
    pub point: Vec3,
    /// Barycentric weights of the face's b and c vertices.
    pub barycentric: Vec2,
    /// World-space distance from the ray origin.
    pub distance: f32,
}

/// Cast a world-space ray against the current live positions of `field`.
pub fn cast(ray: &Ray, field: &VertexField) -> Option<HitResult> {
    if field.is_degenerate() {
        return None;
    }

    let local = ray.transformed(&field.model.inverse());
    let live = field.live();
    let mut best: Option<HitResult> = None;

    for (face_index, face) in field.topology().faces.iter().enumerate() {
        let [a, b, c] = face.indices().map(|i| live[i as usize]);
        let Some(hit) = intersect_triangle(&local, a, b, c) else {
            continue;
        };

        let point = field.model.transform_point3(local.at(hit.t));
        let distance = point.distance(ray.origin);
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(HitResult {
                face: *face,
                face_index,
                point,
                barycentric: hit.uv,
                distance,
            });
        }
    }

    best
}

/// Pick the face under a normalized pointer sample. No sample yet means no hit.
pub fn pick(
    pointer: Option<Vec2>,
    camera: &OrbitCamera,
    aspect: f32,
    field: &VertexField,
) -> Option<HitResult> {
    let ndc = pointer?;
    cast(&camera.ray_through(ndc, aspect), field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mesh::{self, Topology};
    use crate::engine::params::CameraParams;

    /// Unit quad on z = 0 spanning [-1, 1]²: faces (0,2,1) top-left, (2,3,1) bottom-right.
    fn quad(model: Mat4) -> VertexField {
        let (rest, topology) = mesh::grid(2.0, 2.0, 1, 1);
        let phases = vec![0.0; rest.len()];
        VertexField::from_parts(topology, rest, phases, model)
    }

    fn down_z(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 10.0), Vec3::NEG_Z)
    }

    #[test]
    fn test_ray_hits_expected_triangle() {
        let field = quad(Mat4::IDENTITY);

        let hit = cast(&down_z(-0.5, 0.5), &field).expect("top-left hit");
        assert_eq!(hit.face, Face::new(0, 2, 1));
        assert!((hit.distance - 10.0).abs() < 1e-5);
        assert!(hit.point.distance(Vec3::new(-0.5, 0.5, 0.0)) < 1e-5);

        let hit = cast(&down_z(0.5, -0.5), &field).expect("bottom-right hit");
        assert_eq!(hit.face, Face::new(2, 3, 1));
        assert_eq!(hit.face_index, 1);
    }

    #[test]
    fn test_ray_outside_bounds_misses() {
        let field = quad(Mat4::IDENTITY);
        assert!(cast(&down_z(1.5, 0.0), &field).is_none());
        assert!(cast(&down_z(0.0, -3.0), &field).is_none());
    }

    #[test]
    fn test_surface_behind_ray_misses() {
        let field = quad(Mat4::IDENTITY);
        let ray = Ray::new(Vec3::new(0.2, 0.2, 10.0), Vec3::Z);
        assert!(cast(&ray, &field).is_none());
    }

    #[test]
    fn test_nearest_of_overlapping_triangles() {
        let rest = vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, -1.0, 3.0),
            Vec3::new(1.0, -1.0, 3.0),
            Vec3::new(0.0, 1.0, 3.0),
        ];
        let topology = Topology {
            faces: vec![Face::new(0, 1, 2), Face::new(3, 4, 5)],
        };
        let field = VertexField::from_parts(topology, rest, vec![0.0; 6], Mat4::IDENTITY);

        let hit = cast(&down_z(0.0, 0.0), &field).expect("hit");
        assert_eq!(hit.face, Face::new(3, 4, 5));
        assert!((hit.distance - 7.0).abs() < 1e-5);

        // From below, the z = 0 triangle is nearer.
        let up = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert_eq!(cast(&up, &field).map(|h| h.face), Some(Face::new(0, 1, 2)));
    }

    #[test]
    fn test_tests_against_live_positions() {
        use crate::engine::params::WaveParams;
        use crate::engine::wave::WaveAnimator;

        let mut field = quad(Mat4::IDENTITY);
        // Large amplitude shifts the whole quad by ~(cos t, sin t, cos t).
        let mut animator = WaveAnimator::new(WaveParams { amplitude: 5.0, time_step: 0.0 });
        animator.advance(&mut field);

        // Rest quad would be hit here, displaced quad sits at x ∈ [4, 6].
        assert!(cast(&down_z(-0.3, 0.5), &field).is_none());
        assert!(cast(&down_z(5.3, 0.5), &field).is_some());
    }

    #[test]
    fn test_model_transform_is_respected() {
        let field = quad(Mat4::from_translation(Vec3::new(0.0, 0.0, 4.0)));
        let hit = cast(&down_z(0.5, 0.5), &field).expect("hit");
        assert!((hit.distance - 6.0).abs() < 1e-5);
        assert!((hit.point.z - 4.0).abs() < 1e-5);

        // Tilted a quarter turn about X, the quad lies in the XZ plane.
        let field = quad(Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2));
        let ray = Ray::new(Vec3::new(0.5, 10.0, 0.5), Vec3::NEG_Y);
        let hit = cast(&ray, &field).expect("hit");
        assert!(hit.point.y.abs() < 1e-5);
        assert!((hit.distance - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let hit = intersect_triangle(
            &Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_degenerate_field_never_hits() {
        let field = VertexField::from_parts(Topology::default(), vec![], vec![], Mat4::IDENTITY);
        assert!(cast(&down_z(0.0, 0.0), &field).is_none());
    }

    #[test]
    fn test_pick_through_camera() {
        let camera = OrbitCamera::new(&CameraParams::default());
        let field = quad(Mat4::IDENTITY);

        assert!(pick(None, &camera, 16.0 / 9.0, &field).is_none());

        let hit = pick(Some(Vec2::new(0.01, 0.01)), &camera, 16.0 / 9.0, &field).expect("hit");
        // Slightly right of center lands below the b–d diagonal.
        assert_eq!(hit.face, Face::new(2, 3, 1));
        assert!((hit.distance - 20.0).abs() < 0.1);

        assert!(pick(Some(Vec2::new(0.9, 0.9)), &camera, 16.0 / 9.0, &field).is_none());
    }
}
