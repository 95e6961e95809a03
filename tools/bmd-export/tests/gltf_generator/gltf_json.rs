//! glTF JSON structure building.

use super::mesh_data::SEGMENT_HEIGHT;
use gltf_json as json;
use json::validation::Checked::Valid;
use std::collections::BTreeMap;

pub(crate) type Attributes = BTreeMap<json::validation::Checked<json::mesh::Semantic>, json::Index<json::Accessor>>;

fn node(
    name: &str,
    children: &[u32],
    mesh: Option<u32>,
    skin: Option<u32>,
    translation: Option<[f32; 3]>,
) -> json::Node {
    json::Node {
        camera: None,
        children: (!children.is_empty()).then(|| children.iter().map(|&c| json::Index::new(c)).collect()),
        extensions: Default::default(),
        extras: Default::default(),
        matrix: None,
        mesh: mesh.map(json::Index::new),
        name: Some(name.to_string()),
        rotation: None,
        scale: None,
        translation,
        skin: skin.map(json::Index::new),
        weights: None,
    }
}

pub(crate) fn primitive(
    attributes: Attributes,
    indices: Option<json::Index<json::Accessor>>,
    material: Option<u32>,
) -> json::mesh::Primitive {
    json::mesh::Primitive {
        attributes,
        extensions: Default::default(),
        extras: Default::default(),
        indices,
        material: material.map(json::Index::new),
        mode: Valid(json::mesh::Mode::Triangles),
        targets: None,
    }
}

fn material(name: &str) -> json::Material {
    json::Material {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

fn root(
    buffer_views: &[json::buffer::View],
    accessors: &[json::Accessor],
    nodes: Vec<json::Node>,
    scene_nodes: &[u32],
    meshes: Vec<json::Mesh>,
    skins: Vec<json::Skin>,
    materials: Vec<json::Material>,
) -> json::Root {
    let scenes = vec![json::Scene {
        extensions: Default::default(),
        extras: Default::default(),
        name: Some("TestScene".to_string()),
        nodes: scene_nodes.iter().map(|&n| json::Index::new(n)).collect(),
    }];

    // Byte length is set by assemble_glb
    let buffers = vec![json::Buffer {
        byte_length: 0u64.into(),
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        uri: None,
    }];

    json::Root {
        accessors: accessors.to_vec(),
        animations: Vec::new(),
        asset: json::Asset {
            copyright: None,
            extensions: Default::default(),
            extras: Default::default(),
            generator: Some("bmd-export-test".to_string()),
            min_version: None,
            version: "2.0".to_string(),
        },
        buffers,
        buffer_views: buffer_views.to_vec(),
        cameras: Vec::new(),
        extensions: Default::default(),
        extras: Default::default(),
        extensions_required: Vec::new(),
        extensions_used: Vec::new(),
        images: Vec::new(),
        materials,
        meshes,
        nodes,
        samplers: Vec::new(),
        scene: Some(json::Index::new(0)),
        scenes,
        skins,
        textures: Vec::new(),
    }
}

/// Root → Spine → Head skeleton plus a skinned mesh node.
///
/// The mesh node is a sibling of the skeleton root, not one of its joints.
pub(crate) fn build_skinned_json(
    buffer_views: &[json::buffer::View],
    accessors: &[json::Accessor],
    primitive: json::mesh::Primitive,
    inverse_bind_matrices: json::Index<json::Accessor>,
) -> json::Root {
    const ROOT_NODE: u32 = 0;
    const SPINE_NODE: u32 = 1;
    const HEAD_NODE: u32 = 2;
    const MESH_NODE: u32 = 3;

    let nodes = vec![
        node("Root", &[SPINE_NODE], None, None, Some([0.0, 0.0, 0.0])),
        node("Spine", &[HEAD_NODE], None, None, Some([0.0, SEGMENT_HEIGHT, 0.0])),
        node("Head", &[], None, None, Some([0.0, SEGMENT_HEIGHT, 0.0])),
        node("SkinnedMesh", &[], Some(0), Some(0), None),
    ];

    let meshes = vec![json::Mesh {
        extensions: Default::default(),
        extras: Default::default(),
        name: Some("Ribbon".to_string()),
        primitives: vec![primitive],
        weights: None,
    }];

    let skins = vec![json::Skin {
        extensions: Default::default(),
        extras: Default::default(),
        inverse_bind_matrices: Some(inverse_bind_matrices),
        joints: vec![
            json::Index::new(ROOT_NODE),
            json::Index::new(SPINE_NODE),
            json::Index::new(HEAD_NODE),
        ],
        name: Some("TestSkeleton".to_string()),
        skeleton: Some(json::Index::new(ROOT_NODE)),
    }];

    root(
        buffer_views,
        accessors,
        nodes,
        &[ROOT_NODE, MESH_NODE],
        meshes,
        skins,
        Vec::new(),
    )
}

/// A single unskinned node whose mesh uses two materials
pub(crate) fn build_rigid_json(
    buffer_views: &[json::buffer::View],
    accessors: &[json::Accessor],
    primitives: Vec<json::mesh::Primitive>,
) -> json::Root {
    let nodes = vec![node("Crate", &[], Some(0), None, None)];

    let meshes = vec![json::Mesh {
        extensions: Default::default(),
        extras: Default::default(),
        name: Some("CrateMesh".to_string()),
        primitives,
        weights: None,
    }];

    root(
        buffer_views,
        accessors,
        nodes,
        &[0],
        meshes,
        Vec::new(),
        vec![material("wood"), material("metal")],
    )
}
