//! Programmatic GLB generation for integration tests.
//!
//! Two scenes are available:
//! - a skinned ribbon bound to a 3-joint skeleton (Root → Spine → Head)
//! - a rigid crate node with two materials and no skin

// Each test binary uses a different subset of the generator
#![allow(dead_code)]

mod binary_packing;
mod glb_assembly;
mod gltf_json;
mod mesh_data;

pub use mesh_data::JOINT_COUNT;

use ::gltf_json::mesh::Semantic;
use ::gltf_json::validation::Checked::Valid;
use binary_packing::BufferBuilder;
use self::gltf_json::Attributes;
use mesh_data::{create_inverse_bind_matrices, create_quad, create_side_triangle, create_skinned_ribbon};

/// Generate a skinned GLB.
///
/// Contains:
/// - 3 quads stacked along +Y, 8 vertices
/// - 3-joint skeleton with inverse bind matrices
/// - inner vertex rows blended between neighbouring joints
pub fn generate_skinned_glb() -> Vec<u8> {
    let mesh = create_skinned_ribbon();
    let mut buffer = BufferBuilder::new();

    let mut attributes = Attributes::new();
    attributes.insert(Valid(Semantic::Positions), buffer.positions(&mesh.positions));
    attributes.insert(Valid(Semantic::Normals), buffer.vec3(&mesh.normals));
    attributes.insert(Valid(Semantic::TexCoords(0)), buffer.vec2(&mesh.uvs));
    attributes.insert(Valid(Semantic::Joints(0)), buffer.joints(&mesh.joints));
    attributes.insert(Valid(Semantic::Weights(0)), buffer.vec4(&mesh.weights));
    let indices = buffer.indices(&mesh.indices);
    let inverse_bind_matrices = buffer.matrices(&create_inverse_bind_matrices());

    let primitive = gltf_json::primitive(attributes, Some(indices), None);
    let root = gltf_json::build_skinned_json(
        &buffer.views,
        &buffer.accessors,
        primitive,
        inverse_bind_matrices,
    );

    glb_assembly::assemble_glb(&root, &buffer.data)
}

/// Generate an unskinned GLB.
///
/// Contains:
/// - an indexed quad using material 0 ("wood")
/// - a non-indexed triangle using material 1 ("metal") that shares two
///   positions with the quad
pub fn generate_rigid_glb() -> Vec<u8> {
    let mut buffer = BufferBuilder::new();

    let (quad_positions, quad_normals, quad_indices) = create_quad();
    let mut quad = Attributes::new();
    quad.insert(Valid(Semantic::Positions), buffer.positions(&quad_positions));
    quad.insert(Valid(Semantic::Normals), buffer.vec3(&quad_normals));
    let quad_indices = buffer.indices(&quad_indices);

    let (side_positions, side_normals) = create_side_triangle();
    let mut side = Attributes::new();
    side.insert(Valid(Semantic::Positions), buffer.positions(&side_positions));
    side.insert(Valid(Semantic::Normals), buffer.vec3(&side_normals));

    let primitives = vec![
        gltf_json::primitive(quad, Some(quad_indices), Some(0)),
        gltf_json::primitive(side, None, Some(1)),
    ];
    let root = gltf_json::build_rigid_json(&buffer.views, &buffer.accessors, primitives);

    glb_assembly::assemble_glb(&root, &buffer.data)
}
