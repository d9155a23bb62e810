// Mesh topology and grid construction.
//
// Topology is fixed once the grid is built: only positions and colors change
// per frame, and they live in separate GPU buffers so each can be re-uploaded
// on its own.
//
//   grid() → (positions, Topology) → VertexField / ColorField → GPU

use glam::Vec3;

// ============================================================================
// GPU LAYOUTS
// ============================================================================

/// Buffer slot 0: one `vec3<f32>` position per vertex.
///   @location(0) position: vec3<f32>
pub fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

/// Buffer slot 1: one `vec3<f32>` RGB color per vertex.
///   @location(1) color: vec3<f32>
pub fn color_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

/// Cast a per-vertex Vec3 slice to raw bytes for wgpu buffer upload.
pub fn vec3_bytes(data: &[Vec3]) -> &[u8] {
    bytemuck::cast_slice(data)
}

// ============================================================================
// TOPOLOGY
// ============================================================================

/// One triangle as three indices into the vertex sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Face {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    pub fn indices(&self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }
}

/// Immutable triangle list of a mesh.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub faces: Vec<Face>,
}

impl Topology {
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Flattened index list ready for an INDEX buffer.
    pub fn index_list(&self) -> Vec<u32> {
        self.faces.iter().flat_map(Face::indices).collect()
    }
}

// ============================================================================
// GRID
// ============================================================================

/// Build a flat `width × height` grid in the model XY plane (z = 0).
///
/// Grid points are laid out row-major starting at the top row (y = +height/2)
/// and the left column (x = -width/2). Each cell (ix, iy) is split into two
/// triangles sharing the b–d diagonal:
///
///   a ── d        a = ix     + cols1 * iy
///   │  ╱ │        b = ix     + cols1 * (iy + 1)
///   b ── c        c = ix + 1 + cols1 * (iy + 1)
///                 d = ix + 1 + cols1 * iy
///
/// `cols × rows` segments give (cols+1)(rows+1) vertices and 2·cols·rows faces.
/// Zero segments on either axis produce an empty mesh.
pub fn grid(width: f32, height: f32, cols: u32, rows: u32) -> (Vec<Vec3>, Topology) {
    if cols == 0 || rows == 0 {
        return (Vec::new(), Topology::default());
    }

    let cols1 = cols + 1;
    let rows1 = rows + 1;
    let seg_w = width / cols as f32;
    let seg_h = height / rows as f32;
    let half_w = width / 2.0;
    let half_h = height / 2.0;

    let mut positions = Vec::with_capacity((cols1 * rows1) as usize);
    for iy in 0..rows1 {
        let y = iy as f32 * seg_h - half_h;
        for ix in 0..cols1 {
            let x = ix as f32 * seg_w - half_w;
            positions.push(Vec3::new(x, -y, 0.0));
        }
    }

    let mut faces = Vec::with_capacity((cols * rows * 2) as usize);
    for iy in 0..rows {
        for ix in 0..cols {
            let a = ix + cols1 * iy;
            let b = ix + cols1 * (iy + 1);
            let c = (ix + 1) + cols1 * (iy + 1);
            let d = (ix + 1) + cols1 * iy;
            faces.push(Face::new(a, b, d));
            faces.push(Face::new(b, c, d));
        }
    }

    (positions, Topology { faces })
}
