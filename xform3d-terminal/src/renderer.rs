//! ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use xform3d_core::{Mat4, Vec3};

use crate::mesh::{Mesh, Triangle};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Clip-space `w` below which a vertex counts as behind the eye.
const MIN_CLIP_W: f32 = 1e-6;

/// Screen-space triangles thinner than this are skipped.
const MIN_AREA: f32 = 1e-6;

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    light_dir: Vec3,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            light_dir: Vec3::new(0.3, 0.5, 1.0).unit(),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Rasterizes `mesh` with `mvp = projection * view * model`. The model
    /// matrix is passed separately to rotate face normals for shading.
    pub fn render_mesh(&mut self, mesh: &Mesh, model: &Mat4, mvp: &Mat4) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model, mvp);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, model: &Mat4, mvp: &Mat4) {
        let [a, b, c] = triangle.vertices.map(|vertex| self.project(mvp, vertex.position));
        let (Some(a), Some(b), Some(c)) = (a, b, c) else {
            return; // clipped
        };

        let normal = model.transform_vector(triangle.vertices[0].normal).unit();
        let brightness = normal.dot(self.light_dir).max(0.0);
        let top = LUMINOSITY_RAMP.len() - 1;
        let shade = ((brightness * top as f32) as usize).clamp(1, top);
        self.fill(a, b, c, shade);
    }

    /// Clip space to a screen point: cell coordinates in x/y, NDC depth in z.
    fn project(&self, mvp: &Mat4, position: Vec3) -> Option<Vec3> {
        let [x, y, z] = position.to_array();
        let [x, y, z, w] = mvp.transform_homogeneous([x, y, z, 1.0]);
        if w < MIN_CLIP_W {
            return None;
        }
        let ndc = Vec3::new(x, y, z) * (1.0 / w);
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }
        Some(Vec3::new(
            (ndc.x + 1.0) * 0.5 * self.width as f32,
            (1.0 - ndc.y) * 0.5 * self.height as f32,
            ndc.z,
        ))
    }

    /// Depth-tested scan of the cells whose centers lie inside `a b c`.
    fn fill(&mut self, a: Vec3, b: Vec3, c: Vec3, shade: usize) {
        let area = edge(a, b, c);
        if area.abs() < MIN_AREA {
            return;
        }
        let cells = |lo: f32, hi: f32, extent: usize| {
            let first = lo.floor().max(0.0) as usize;
            let last = (hi.ceil().max(0.0) as usize).min(extent);
            first..last
        };
        let rows = cells(a.y.min(b.y).min(c.y), a.y.max(b.y).max(c.y), self.height);
        let columns = cells(a.x.min(b.x).min(c.x), a.x.max(b.x).max(c.x), self.width);

        for row in rows {
            for column in columns.clone() {
                let p = Vec3::new(column as f32 + 0.5, row as f32 + 0.5, 0.0);
                let weights = Vec3::new(edge(b, c, p), edge(c, a, p), edge(a, b, p)) * (1.0 / area);
                if weights.x < 0.0 || weights.y < 0.0 || weights.z < 0.0 {
                    continue;
                }
                let depth = weights.dot(Vec3::new(a.z, b.z, c.z));
                let cell = row * self.width + column;
                if depth < self.depth_buffer[cell] {
                    self.depth_buffer[cell] = depth;
                    self.char_buffer[cell] = LUMINOSITY_RAMP[shade];
                }
            }
        }
    }

    /// Writes the frame, switching color only where the shade band changes.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (index, line) in self.char_buffer.chunks(self.width.max(1)).enumerate() {
            if index > 0 {
                writer.queue(Print("\r\n"))?;
            }
            let mut current = None;
            for &character in line {
                let color = shade_color(character);
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(character))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    #[cfg(test)]
    fn covered_cells(&self) -> usize {
        self.char_buffer.iter().filter(|&&c| c != ' ').count()
    }
}

/// Twice the signed screen-space area of `a b p`; the sign says which side
/// of the edge `a -> b` the point lies on.
fn edge(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    let flat = |v: Vec3| Vec3::new(v.x, v.y, 0.0);
    (flat(b) - flat(a)).cross(flat(p) - flat(a)).z
}

fn shade_color(character: char) -> Color {
    let band = LUMINOSITY_RAMP
        .iter()
        .position(|&c| c == character)
        .unwrap_or(0);
    match band {
        0..=2 => Color::DarkGrey,
        3..=4 => Color::Grey,
        5..=6 => Color::White,
        _ => Color::Cyan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xform3d_core::{Interaction, Settings};

    fn mvp(ui: &Interaction) -> (Mat4, Mat4) {
        let model = *ui.transform().model();
        let view = *ui.camera().view_matrix();
        let projection = *ui.camera().projection_matrix();
        (model, projection.multiply(&view).multiply(&model))
    }

    #[test]
    fn test_cube_in_front_of_camera_is_drawn() {
        let ui = Interaction::new(&Settings::default()).unwrap();
        let (model, mvp) = mvp(&ui);
        let mut renderer = AsciiRenderer::new(60, 30);
        renderer.render_mesh(&Mesh::cube(1.0), &model, &mvp);
        assert!(renderer.covered_cells() > 0);

        renderer.clear();
        assert_eq!(renderer.covered_cells(), 0);
    }

    #[test]
    fn test_geometry_behind_camera_is_clipped() {
        let ui = Interaction::new(&Settings::default()).unwrap();
        let (model, _) = mvp(&ui);
        let behind = ui
            .camera()
            .projection_matrix()
            .multiply(ui.camera().view_matrix())
            .multiply(&Mat4::translation(Vec3::new(0.0, 0.0, 10.0)));
        let mut renderer = AsciiRenderer::new(60, 30);
        renderer.render_mesh(&Mesh::cube(1.0), &model, &behind);
        assert_eq!(renderer.covered_cells(), 0);
    }

    #[test]
    fn test_edge_sign_and_degenerate_fill() {
        let (a, b) = (Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(edge(a, b, Vec3::new(1.0, 2.0, 0.0)), 8.0);
        assert_eq!(edge(a, b, Vec3::new(1.0, -2.0, 0.0)), -8.0);
        assert_eq!(edge(a, b, Vec3::new(9.0, 0.0, 5.0)), 0.0);

        let mut renderer = AsciiRenderer::new(8, 8);
        renderer.fill(a, Vec3::new(2.0, 2.0, 0.0), Vec3::new(4.0, 4.0, 0.0), 5);
        assert_eq!(renderer.covered_cells(), 0);
        renderer.fill(a, Vec3::new(0.0, 4.0, 0.0), b, 5);
        assert!(renderer.covered_cells() > 0);
    }

    #[test]
    fn test_draw_emits_one_line_per_row() {
        let mut renderer = AsciiRenderer::new(3, 2);
        renderer.char_buffer[4] = '@';
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\r\n").count(), 1);
        assert!(text.contains('@'));
        assert_eq!(shade_color('@'), Color::Cyan);
        assert_eq!(shade_color(' '), Color::DarkGrey);
    }
}
