//! Whole-model compilation
//!
//! Runs every compilation stage over a [`Scene`] so that serialization
//! only has to encode finished tables.

use crate::envelope::EnvelopeData;
use crate::error::{ConvertError, Result};
use crate::scene::{self, Scene};
use crate::shape::{compile_shape, Shape, ShapeInfo};
use crate::skeleton::{HierarchyNode, Skeleton};
use crate::vertex::VertexData;
use tracing::debug;

/// Material assigned to primitives that have none
pub const DEFAULT_MATERIAL_NAME: &str = "default";

/// A scene compiled into J3D tables
#[derive(Debug, Clone)]
pub struct Model {
    pub vertex_data: VertexData,
    pub shapes: Vec<Shape>,
    pub skeleton: Skeleton,
    pub envelopes: EnvelopeData,
    pub texture_names: Vec<String>,
}

impl Model {
    pub fn compile(scene: &Scene) -> Result<Self> {
        let mut skeleton = Skeleton::build(scene)?;
        let mut vertex_data = VertexData::new();
        let mut shapes = Vec::new();

        for node_index in mesh_instances(scene)? {
            let node = scene.node(node_index)?;
            let Some(mesh_index) = node.mesh else {
                continue;
            };
            let mesh = scene
                .meshes
                .get(mesh_index)
                .ok_or(ConvertError::MissingMesh(mesh_index))?;

            // Vertex joint indices address the first skin's joint list
            if let Some(skin) = node.skin.filter(|&s| s != 0) {
                return Err(ConvertError::UnsupportedSkin {
                    node: node_index,
                    skin,
                });
            }

            let owner = skeleton
                .joint_for_node(node_index)
                .unwrap_or(skeleton.root());

            for (material, primitives) in group_by_material(&mesh.primitives) {
                let index = u16::try_from(shapes.len()).map_err(|_| ConvertError::TableOverflow {
                    what: "shape",
                    count: shapes.len() + 1,
                })?;
                let info = ShapeInfo {
                    index,
                    material_name: material_name(scene, material),
                    material_index: material_index(scene, material)?,
                    joint_index: owner,
                };

                debug!(
                    "Shape {}: node '{}', {} primitive(s), material '{}'",
                    index,
                    node.name,
                    primitives.len(),
                    info.material_name
                );
                shapes.push(compile_shape(scene, &mut vertex_data, &primitives, info)?);
            }
        }

        let mut envelopes = EnvelopeData::compile(&mut shapes, skeleton.len())?;
        envelopes.read_inverse_bind_matrices(scene)?;
        skeleton.attach_shapes(&shapes)?;

        let texture_names = scene
            .textures
            .iter()
            .enumerate()
            .map(|(i, t)| {
                if t.name.is_empty() {
                    format!("texture_{}", i)
                } else {
                    t.name.clone()
                }
            })
            .collect();

        Ok(Self {
            vertex_data,
            shapes,
            skeleton,
            envelopes,
            texture_names,
        })
    }

    pub fn hierarchy(&self) -> Vec<HierarchyNode> {
        self.skeleton.hierarchy(&self.shapes)
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_data.vertex_count()
    }
}

/// Nodes with a mesh, depth-first from the scene roots
fn mesh_instances(scene: &Scene) -> Result<Vec<usize>> {
    let mut visited = vec![false; scene.nodes.len()];
    let mut pending: Vec<usize> = scene.effective_roots().into_iter().rev().collect();
    let mut instances = Vec::new();

    while let Some(index) = pending.pop() {
        let node = scene.node(index)?;
        if std::mem::replace(&mut visited[index], true) {
            continue;
        }
        if node.mesh.is_some() {
            instances.push(index);
        }
        pending.extend(node.children.iter().rev());
    }

    Ok(instances)
}

/// Primitives grouped by material, groups in first-appearance order
fn group_by_material(primitives: &[scene::Primitive]) -> Vec<(Option<usize>, Vec<&scene::Primitive>)> {
    let mut groups: Vec<(Option<usize>, Vec<&scene::Primitive>)> = Vec::new();
    for primitive in primitives {
        match groups.iter_mut().find(|(m, _)| *m == primitive.material) {
            Some((_, group)) => group.push(primitive),
            None => groups.push((primitive.material, vec![primitive])),
        }
    }
    groups
}

fn material_name(scene: &Scene, material: Option<usize>) -> String {
    match material.and_then(|m| scene.materials.get(m)) {
        Some(m) if !m.name.is_empty() => m.name.clone(),
        Some(_) => format!("material_{}", material.unwrap_or_default()),
        None => DEFAULT_MATERIAL_NAME.to_string(),
    }
}

/// Source index, or one past the last source material for the default
fn material_index(scene: &Scene, material: Option<usize>) -> Result<u16> {
    let index = match material {
        Some(m) if m < scene.materials.len() => m,
        Some(m) => return Err(ConvertError::MissingMaterial(m)),
        None => scene.materials.len(),
    };
    u16::try_from(index).map_err(|_| ConvertError::TableOverflow {
        what: "material",
        count: index + 1,
    })
}
