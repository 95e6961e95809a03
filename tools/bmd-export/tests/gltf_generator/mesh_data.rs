//! Mesh and skeleton data for the generated test scenes.

/// Joint count for the skinned test skeleton
pub const JOINT_COUNT: usize = 3;
/// Height between stacked joints
pub(crate) const SEGMENT_HEIGHT: f32 = 1.0;

/// Vertex streams of one primitive
pub(crate) struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub joints: Vec<[u8; 4]>,
    pub weights: Vec<[f32; 4]>,
    pub indices: Vec<u16>,
}

/// A ribbon of three quads rising along +Y.
///
/// Vertex rows sit at y = 0..=3. The bottom and top rows are bound fully to
/// the first and last joint; the two inner rows blend half and half between
/// neighbouring joints.
pub(crate) fn create_skinned_ribbon() -> MeshData {
    let mut mesh = MeshData {
        positions: Vec::new(),
        normals: Vec::new(),
        uvs: Vec::new(),
        joints: Vec::new(),
        weights: Vec::new(),
        indices: Vec::new(),
    };

    let rows = JOINT_COUNT + 1;
    for row in 0..rows {
        let y = row as f32 * SEGMENT_HEIGHT;
        let (joints, weights) = match row {
            0 => ([0, 0, 0, 0], [1.0, 0.0, 0.0, 0.0]),
            r if r == rows - 1 => ([JOINT_COUNT as u8 - 1, 0, 0, 0], [1.0, 0.0, 0.0, 0.0]),
            r => ([r as u8 - 1, r as u8, 0, 0], [0.5, 0.5, 0.0, 0.0]),
        };

        for x in [-0.5f32, 0.5] {
            mesh.positions.push([x, y, 0.0]);
            mesh.normals.push([0.0, 0.0, 1.0]);
            mesh.uvs.push([x + 0.5, row as f32 / JOINT_COUNT as f32]);
            mesh.joints.push(joints);
            mesh.weights.push(weights);
        }
    }

    for quad in 0..JOINT_COUNT as u16 {
        let base = quad * 2;
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 3, base, base + 3, base + 2]);
    }

    mesh
}

/// Inverse bind matrices (column-major) for joints stacked along +Y
pub(crate) fn create_inverse_bind_matrices() -> Vec<[[f32; 4]; 4]> {
    (0..JOINT_COUNT)
        .map(|i| {
            let y = i as f32 * SEGMENT_HEIGHT;
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, -y, 0.0, 1.0],
            ]
        })
        .collect()
}

/// Indexed unit quad on the XY plane
pub(crate) fn create_quad() -> (Vec<[f32; 3]>, Vec<[f32; 3]>, Vec<u16>) {
    let positions = vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ];
    let normals = vec![[0.0, 0.0, 1.0]; 4];
    (positions, normals, vec![0, 1, 2, 0, 2, 3])
}

/// Non-indexed triangle sharing the quad's right edge
pub(crate) fn create_side_triangle() -> (Vec<[f32; 3]>, Vec<[f32; 3]>) {
    let positions = vec![[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]];
    let normals = vec![[1.0, 0.0, 0.0]; 3];
    (positions, normals)
}

/// Axis-aligned bounds of a position stream
pub(crate) fn compute_bounds(positions: &[[f32; 3]]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for p in positions {
        for i in 0..3 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
    }
    (min, max)
}
