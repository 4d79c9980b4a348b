//! Demo geometry drawn by the terminal viewer
use xform3d_core::Vec3;

/// A mesh vertex; normals are per face.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3, normal: Vec3) -> Self {
        let vertex = |position| Vertex { position, normal };
        Self {
            vertices: [vertex(a), vertex(b), vertex(c)],
        }
    }

    /// Face normal from the winding order.
    pub fn calculate_normal(&self) -> Vec3 {
        let [a, b, c] = self.vertices.map(|v| v.position);
        (b - a).cross(c - a).unit()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    /// Axis-aligned cube centered on the origin, counter-clockwise faces.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        // Each face: outward normal plus two in-plane axes with u × v = normal.
        let faces = [
            (Vec3::Z, Vec3::X, Vec3::Y),
            (-Vec3::Z, Vec3::Y, Vec3::X),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (-Vec3::Y, Vec3::X, Vec3::Z),
            (Vec3::X, Vec3::Y, Vec3::Z),
            (-Vec3::X, Vec3::Z, Vec3::Y),
        ];

        let mut mesh = Self::default();
        for (normal, u, v) in faces {
            let center = normal * h;
            let corner = |su: f32, sv: f32| center + u * (su * h) + v * (sv * h);
            let (c00, c10, c11, c01) = (
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            );
            mesh.triangles.push(Triangle::new(c00, c10, c11, normal));
            mesh.triangles.push(Triangle::new(c00, c11, c01, normal));
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_winding_matches_normals() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.triangles.len(), 12);
        for triangle in &cube.triangles {
            let normal = triangle.vertices[0].normal;
            assert_eq!(triangle.calculate_normal(), normal);
            for vertex in &triangle.vertices {
                assert_eq!(vertex.position.dot(normal), 1.0);
            }
        }
    }
}
