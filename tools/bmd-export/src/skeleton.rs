//! Joint hierarchy
//!
//! Builds the joint arena from the scene's first skin (or a single dummy
//! root for rigid models), attaches shapes to joints and flattens the tree
//! into the INF1 instruction stream.

use crate::error::{ConvertError, Result};
use crate::scene::Scene;
use crate::shape::{BoundingVolume, Shape};
use glam::{EulerRot, Quat, Vec3};
use hashbrown::HashMap;
use j3d_common::{angle_to_s16, HierarchyNodeType};
use tracing::{debug, warn};

/// Name of the dummy root when the scene offers nothing better
pub const DEFAULT_ROOT_NAME: &str = "root";

#[derive(Debug, Clone)]
pub struct Joint {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub matrix_type: u16,
    pub no_inherit_scale: bool,
    pub bounds: BoundingVolume,
    pub index: u16,
    /// Source node, `None` for a synthesized root
    pub node: Option<usize>,
    pub parent: Option<u16>,
    pub children: Vec<u16>,
    /// Indices into the model's shape list
    pub shapes: Vec<usize>,
}

impl Joint {
    fn new(name: String, index: u16) -> Self {
        Self {
            name,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            matrix_type: 1,
            no_inherit_scale: true,
            bounds: BoundingVolume::default(),
            index,
            node: None,
            parent: None,
            children: Vec::new(),
            shapes: Vec::new(),
        }
    }

    /// Rotation as (x, y, z) angles for R = Rz * Ry * Rx, in J3D angle units
    pub fn rotation_s16(&self) -> [i16; 3] {
        let (z, y, x) = self.rotation.to_euler(EulerRot::ZYX);
        [angle_to_s16(x), angle_to_s16(y), angle_to_s16(z)]
    }
}

/// One `(type, index)` instruction of the INF1 stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyNode {
    pub kind: HierarchyNodeType,
    pub index: u16,
}

impl HierarchyNode {
    pub const DOWN: Self = Self::new(HierarchyNodeType::Down, 0);
    pub const UP: Self = Self::new(HierarchyNodeType::Up, 0);
    pub const END: Self = Self::new(HierarchyNodeType::End, 0);

    pub const fn new(kind: HierarchyNodeType, index: u16) -> Self {
        Self { kind, index }
    }
}

#[derive(Debug, Clone)]
pub struct Skeleton {
    joints: Vec<Joint>,
    root: u16,
    by_node: HashMap<usize, u16>,
}

impl Skeleton {
    /// Build from the scene's first skin, or a dummy root when it has none
    pub fn build(scene: &Scene) -> Result<Self> {
        match scene.skins.len() {
            0 => Ok(Self::dummy(scene)),
            count => {
                if count > 1 {
                    warn!("Scene has {} skins, only the first is converted", count);
                }
                Self::from_skin(scene, 0)
            }
        }
    }

    fn dummy(scene: &Scene) -> Self {
        let name = scene
            .effective_roots()
            .first()
            .and_then(|&n| scene.nodes.get(n))
            .map(|n| n.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_ROOT_NAME);

        Self {
            joints: vec![Joint::new(name.to_string(), 0)],
            root: 0,
            by_node: HashMap::new(),
        }
    }

    fn from_skin(scene: &Scene, skin_index: usize) -> Result<Self> {
        let skin = &scene.skins[skin_index];
        if skin.joints.is_empty() {
            return Err(ConvertError::EmptySkin);
        }
        if skin.joints.len() > u16::MAX as usize {
            return Err(ConvertError::TooManyJoints(skin.joints.len()));
        }

        // Joint index is the position in the skin's joint list
        let mut joints = Vec::with_capacity(skin.joints.len());
        let mut by_node = HashMap::with_capacity(skin.joints.len());
        for (index, &node_index) in skin.joints.iter().enumerate() {
            let node = scene.node(node_index)?;
            let index = index as u16;

            let mut joint = Joint::new(node.name.clone(), index);
            joint.translation = node.translation();
            joint.rotation = node.rotation();
            joint.scale = node.scale();
            joint.node = Some(node_index);

            joints.push(joint);
            by_node.insert(node_index, index);
        }

        let root = find_root(scene, skin.skeleton, &skin.joints, &by_node)?;

        let mut skeleton = Self {
            joints,
            root,
            by_node,
        };
        skeleton.link(scene)?;
        Ok(skeleton)
    }

    /// Connect joints along the node graph, depth-first from the root
    fn link(&mut self, scene: &Scene) -> Result<()> {
        let mut visited = vec![false; self.joints.len()];
        visited[self.root as usize] = true;
        let mut pending = vec![self.root];

        while let Some(parent) = pending.pop() {
            let Some(node_index) = self.joints[parent as usize].node else {
                continue;
            };

            let mut children = Vec::new();
            for &child_node in &scene.node(node_index)?.children {
                let Some(&child) = self.by_node.get(&child_node) else {
                    debug!(
                        "Skipping node {} under joint '{}': not a joint",
                        child_node, self.joints[parent as usize].name
                    );
                    continue;
                };

                let joint = &mut self.joints[child as usize];
                if std::mem::replace(&mut visited[child as usize], true) {
                    return Err(ConvertError::DuplicateJoint {
                        name: joint.name.clone(),
                        node: child_node,
                    });
                }
                joint.parent = Some(parent);
                children.push(child);
            }

            pending.extend(children.iter().rev());
            self.joints[parent as usize].children = children;
        }

        if let Some(missing) = visited.iter().position(|&v| !v) {
            let joint = &self.joints[missing];
            return Err(ConvertError::UnreachableJoint {
                name: joint.name.clone(),
                node: joint.node.unwrap_or(missing),
            });
        }

        Ok(())
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn root(&self) -> u16 {
        self.root
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Joint created for a scene node, if that node is a joint
    pub fn joint_for_node(&self, node: usize) -> Option<u16> {
        self.by_node.get(&node).copied()
    }

    /// Attach every shape to its owning joint and grow joint bounds to
    /// cover them. Joints without shapes keep zero bounds.
    pub fn attach_shapes(&mut self, shapes: &[Shape]) -> Result<()> {
        for (position, shape) in shapes.iter().enumerate() {
            let joint = self
                .joints
                .get_mut(shape.joint_index as usize)
                .ok_or(ConvertError::MissingJoint {
                    shape: position,
                    joint: shape.joint_index as usize,
                })?;

            joint.bounds = if joint.shapes.is_empty() {
                shape.bounds
            } else {
                joint.bounds.union(&shape.bounds)
            };
            joint.shapes.push(position);
        }
        Ok(())
    }

    /// Flatten the tree into INF1 instructions, terminated by `End`
    pub fn hierarchy(&self, shapes: &[Shape]) -> Vec<HierarchyNode> {
        let mut out = Vec::new();
        self.emit_joint(self.root, shapes, &mut out);
        out.push(HierarchyNode::END);
        out
    }

    fn emit_joint(&self, index: u16, shapes: &[Shape], out: &mut Vec<HierarchyNode>) {
        let joint = &self.joints[index as usize];
        out.push(HierarchyNode::new(HierarchyNodeType::Joint, index));

        // Stable sort keeps attachment order among equal names
        let mut attached: Vec<&Shape> = joint.shapes.iter().map(|&s| &shapes[s]).collect();
        attached.sort_by(|a, b| a.material_name.cmp(&b.material_name));

        for shape in &attached {
            out.push(HierarchyNode::DOWN);
            out.push(HierarchyNode::new(HierarchyNodeType::Material, shape.material_index));
            out.push(HierarchyNode::DOWN);
            out.push(HierarchyNode::new(HierarchyNodeType::Shape, shape.index));
        }

        if !joint.children.is_empty() {
            out.push(HierarchyNode::DOWN);
            for &child in &joint.children {
                self.emit_joint(child, shapes, out);
            }
            out.push(HierarchyNode::UP);
        }

        for _ in 0..attached.len() * 2 {
            out.push(HierarchyNode::UP);
        }
    }
}

fn find_root(
    scene: &Scene,
    declared: Option<usize>,
    skin_joints: &[usize],
    by_node: &HashMap<usize, u16>,
) -> Result<u16> {
    if let Some(&root) = declared.and_then(|node| by_node.get(&node)) {
        return Ok(root);
    }

    let parents = scene.parent_map();
    skin_joints
        .iter()
        .find(|&&node| {
            parents
                .get(node)
                .copied()
                .flatten()
                .map_or(true, |parent| !by_node.contains_key(&parent))
        })
        .and_then(|node| by_node.get(node).copied())
        .ok_or(ConvertError::UnknownSkinRoot)
}
