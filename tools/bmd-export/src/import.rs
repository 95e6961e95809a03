//! glTF scene import
//!
//! Copies the parts of a glTF document the model compiler needs into a
//! [`Scene`]. Accessor data is decoded eagerly so the compiler never touches
//! glTF buffers.

use crate::scene::{Accessor, Material, Mesh, Node, Primitive, PrimitiveMode, Scene, Skin, Texture};
use anyhow::{Context, Result};
use glam::{Mat4, Quat, Vec3, Vec4};
use gltf::mesh::Mode;
use j3d_common::VertexAttribute;
use std::path::Path;

/// Load a glTF/GLB file into a scene
pub fn load_gltf(input: &Path) -> Result<Scene> {
    let (document, buffers, _images) =
        gltf::import(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;
    scene_from_document(&document, &buffers)
}

/// Build a scene from an already loaded document
pub fn scene_from_document(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Result<Scene> {
    let mut scene = Scene::default();

    scene.nodes = document.nodes().map(read_node).collect();

    let root_scene = document.default_scene().or_else(|| document.scenes().next());
    if let Some(root_scene) = root_scene {
        scene.root_nodes = root_scene.nodes().map(|n| n.index()).collect();
    }

    for mesh in document.meshes() {
        let mut primitives = Vec::new();
        for (index, primitive) in mesh.primitives().enumerate() {
            let converted = read_primitive(&mut scene, &primitive, buffers).with_context(|| {
                format!(
                    "Failed to read primitive {} of mesh '{}'",
                    index,
                    mesh.name().unwrap_or_default()
                )
            })?;
            primitives.push(converted);
        }
        scene.meshes.push(Mesh {
            name: mesh.name().unwrap_or_default().to_string(),
            primitives,
        });
    }

    for skin in document.skins() {
        let reader = skin.reader(|buffer| Some(&buffers[buffer.index()]));
        let inverse_bind_matrices = reader.read_inverse_bind_matrices().map(|iter| {
            let matrices = iter.map(|m| Mat4::from_cols_array_2d(&m)).collect();
            scene.push_accessor(Accessor::Matrices(matrices))
        });

        scene.skins.push(Skin {
            name: skin.name().map(str::to_string),
            joints: skin.joints().map(|j| j.index()).collect(),
            inverse_bind_matrices,
            skeleton: skin.skeleton().map(|n| n.index()),
        });
    }

    scene.materials = document
        .materials()
        .map(|m| Material {
            name: m.name().unwrap_or_default().to_string(),
        })
        .collect();

    // Image name first, texture name second; unnamed ones are numbered later
    scene.textures = document
        .textures()
        .map(|t| Texture {
            name: t
                .source()
                .name()
                .or_else(|| t.name())
                .unwrap_or_default()
                .to_string(),
        })
        .collect();

    Ok(scene)
}

fn read_node(node: gltf::Node) -> Node {
    let (translation, rotation, scale) = node.transform().decomposed();
    Node {
        name: node.name().unwrap_or_default().to_string(),
        translation: Some(Vec3::from_array(translation)),
        rotation: Some(Quat::from_array(rotation)),
        scale: Some(Vec3::from_array(scale)),
        children: node.children().map(|c| c.index()).collect(),
        mesh: node.mesh().map(|m| m.index()),
        skin: node.skin().map(|s| s.index()),
    }
}

fn read_primitive(
    scene: &mut Scene,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> Result<Primitive> {
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
    let mut out = Primitive {
        mode: convert_mode(primitive.mode()),
        material: primitive.material().index(),
        ..Default::default()
    };

    let positions: Vec<Vec4> = reader
        .read_positions()
        .context("No positions in primitive")?
        .map(|p| Vec3::from_array(p).extend(1.0))
        .collect();
    insert(scene, &mut out, VertexAttribute::Position, positions);

    if let Some(normals) = reader.read_normals() {
        let normals = normals.map(|n| Vec3::from_array(n).extend(0.0)).collect();
        insert(scene, &mut out, VertexAttribute::Normal, normals);

        // xyz = tangent direction, w = handedness; needs normals
        if let Some(tangents) = reader.read_tangents() {
            let tangents = tangents.map(Vec4::from_array).collect();
            insert(scene, &mut out, VertexAttribute::Nbt, tangents);
        }
    } else if reader.read_tangents().is_some() {
        tracing::warn!("Primitive has tangents but no normals, ignoring tangents");
    }

    for (set, attribute) in VertexAttribute::COLORS.into_iter().enumerate() {
        if let Some(colors) = reader.read_colors(set as u32) {
            let colors = colors.into_rgba_f32().map(Vec4::from_array).collect();
            insert(scene, &mut out, attribute, colors);
        }
    }

    for (set, attribute) in VertexAttribute::TEX_COORDS.into_iter().enumerate() {
        if let Some(uvs) = reader.read_tex_coords(set as u32) {
            let uvs = uvs
                .into_f32()
                .map(|[u, v]| Vec4::new(u, v, 0.0, 0.0))
                .collect();
            insert(scene, &mut out, attribute, uvs);
        }
    }

    let joints = reader.read_joints(0).map(|iter| {
        iter.into_u16()
            .map(|j| Vec4::new(j[0] as f32, j[1] as f32, j[2] as f32, j[3] as f32))
            .collect::<Vec<_>>()
    });
    let weights = reader
        .read_weights(0)
        .map(|iter| iter.into_f32().map(Vec4::from_array).collect::<Vec<_>>());

    // A lone joint or weight stream is rejected by the shape compiler
    out.joints = joints.map(|j| scene.push_accessor(Accessor::Vectors(j)));
    out.weights = weights.map(|w| scene.push_accessor(Accessor::Vectors(w)));

    if let Some(indices) = reader.read_indices() {
        let indices = indices.into_u32().collect();
        out.indices = Some(scene.push_accessor(Accessor::Scalars(indices)));
    }

    Ok(out)
}

fn insert(scene: &mut Scene, primitive: &mut Primitive, attribute: VertexAttribute, values: Vec<Vec4>) {
    let accessor = scene.push_accessor(Accessor::Vectors(values));
    primitive.attributes.insert(attribute, accessor);
}

fn convert_mode(mode: Mode) -> PrimitiveMode {
    match mode {
        Mode::Points => PrimitiveMode::Points,
        Mode::Lines => PrimitiveMode::Lines,
        Mode::LineLoop => PrimitiveMode::LineLoop,
        Mode::LineStrip => PrimitiveMode::LineStrip,
        Mode::Triangles => PrimitiveMode::Triangles,
        Mode::TriangleStrip => PrimitiveMode::TriangleStrip,
        Mode::TriangleFan => PrimitiveMode::TriangleFan,
    }
}
