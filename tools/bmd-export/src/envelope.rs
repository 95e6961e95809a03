//! Skin weight envelopes and draw matrices
//!
//! Every vertex is drawn with one matrix: either a joint's own matrix
//! (unskinned, a single full-weight influence) or a blend of several joints
//! described by an envelope (skinned). The draw matrix table (DRW1) lists
//! the distinct unskinned joints first, followed by the distinct envelopes.

use crate::error::{ConvertError, Result};
use crate::scene::Scene;
use crate::shape::{Shape, MATRIX_TYPE_MULTI};
use crate::vertex::Influences;
use glam::Mat4;
use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::warn;

/// Weighted joint blend
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Envelope {
    pub joints: SmallVec<[u16; 4]>,
    pub weights: SmallVec<[f32; 4]>,
}

impl Envelope {
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Hash key agreeing with `==`, `None` when a weight is NaN
    fn key(&self) -> Option<Vec<(u16, u32)>> {
        self.joints
            .iter()
            .zip(&self.weights)
            .map(|(&j, &w)| (!w.is_nan()).then(|| (j, if w == 0.0 { 0 } else { w.to_bits() })))
            .collect()
    }
}

/// How a single vertex is bound to the skeleton
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Drawn with one joint's matrix
    Unskinned(u16),
    /// Drawn with a blend of joint matrices
    Skinned(Envelope),
}

/// Entry of the draw matrix table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMatrix {
    Joint(u16),
    Envelope(u16),
}

impl DrawMatrix {
    /// DRW1 weighted flag
    pub fn is_weighted(self) -> bool {
        matches!(self, Self::Envelope(_))
    }

    pub fn index(self) -> u16 {
        match self {
            Self::Joint(i) | Self::Envelope(i) => i,
        }
    }
}

/// Classify a vertex's influences.
///
/// `owner` is the shape's joint, used for vertices without skin data.
pub fn classify(
    influences: Option<&Influences>,
    owner: u16,
    shape: usize,
    vertex: usize,
) -> Result<Binding> {
    let Some(influences) = influences else {
        return Ok(Binding::Unskinned(owner));
    };

    match influences.as_slice() {
        [] => Err(ConvertError::ZeroSkinWeights { shape, vertex }),
        [single] if (single.weight - 1.0).abs() <= f32::EPSILON => {
            Ok(Binding::Unskinned(single.joint))
        }
        pairs => Ok(Binding::Skinned(Envelope {
            joints: pairs.iter().map(|p| p.joint).collect(),
            weights: pairs.iter().map(|p| p.weight).collect(),
        })),
    }
}

/// Compiled EVP1 and DRW1 tables
#[derive(Debug, Clone, Default)]
pub struct EnvelopeData {
    envelopes: Vec<Envelope>,
    lookup: HashMap<Vec<(u16, u32)>, u16>,
    inverse_bind_matrices: Vec<Mat4>,
    /// Joint indices of unskinned draw matrices, first-seen order
    unskinned: Vec<u16>,
    /// Envelope indices of skinned draw matrices, first-seen order
    skinned: Vec<u16>,
}

impl EnvelopeData {
    /// Classify every vertex of every shape, build the envelope and draw
    /// matrix tables and store each vertex's draw matrix index.
    ///
    /// Shapes with a blended vertex switch to the multi-matrix type.
    pub fn compile(shapes: &mut [Shape], joint_count: usize) -> Result<Self> {
        let mut data = Self::default();
        let mut unskinned_slots: HashMap<u16, u16> = HashMap::new();
        let mut skinned_slots: HashMap<u16, u16> = HashMap::new();
        let mut slots = Vec::new();

        for (shape_position, shape) in shapes.iter_mut().enumerate() {
            let owner = shape.joint_index;
            let mut blended = false;

            for (vertex_position, vertex) in shape.vertices().enumerate() {
                let binding = classify(
                    vertex.influences.as_ref(),
                    owner,
                    shape_position,
                    vertex_position,
                )?;

                let slot = match binding {
                    Binding::Unskinned(joint) => {
                        check_joint(joint, joint_count, shape_position)?;
                        let next = table_index(data.unskinned.len(), "draw matrix")?;
                        let slot = *unskinned_slots.entry(joint).or_insert_with(|| {
                            data.unskinned.push(joint);
                            next
                        });
                        DrawMatrix::Joint(slot)
                    }
                    Binding::Skinned(envelope) => {
                        for &joint in &envelope.joints {
                            check_joint(joint, joint_count, shape_position)?;
                        }
                        blended = true;
                        let envelope_index = data.add_envelope(envelope)?;
                        let next = table_index(data.skinned.len(), "draw matrix")?;
                        let slot = *skinned_slots.entry(envelope_index).or_insert_with(|| {
                            data.skinned.push(envelope_index);
                            next
                        });
                        DrawMatrix::Envelope(slot)
                    }
                };
                slots.push(slot);
            }

            if blended {
                shape.matrix_type = MATRIX_TYPE_MULTI;
            }
        }

        // Skinned slots follow every unskinned slot
        let partition = data.unskinned.len();
        let mut slots = slots.into_iter();
        for vertex in shapes.iter_mut().flat_map(|s| s.vertices_mut()) {
            let index = match slots.next() {
                Some(DrawMatrix::Joint(slot)) => slot as usize,
                Some(DrawMatrix::Envelope(slot)) => partition + slot as usize,
                None => break,
            };
            vertex.draw_matrix = Some(table_index(index, "draw matrix")?);
        }

        data.inverse_bind_matrices = vec![Mat4::IDENTITY; joint_count];
        Ok(data)
    }

    /// Index of an equal envelope, appending it when new
    fn add_envelope(&mut self, envelope: Envelope) -> Result<u16> {
        let key = envelope.key();
        if let Some(&index) = key.as_ref().and_then(|k| self.lookup.get(k)) {
            return Ok(index);
        }

        let index = table_index(self.envelopes.len(), "envelope")?;
        self.envelopes.push(envelope);
        if let Some(key) = key {
            self.lookup.insert(key, index);
        }
        Ok(index)
    }

    /// Take inverse bind matrices from the skin, one per joint. Joints the
    /// skin gives no matrix for keep the identity.
    pub fn read_inverse_bind_matrices(&mut self, scene: &Scene) -> Result<()> {
        let Some(accessor) = scene.skins.first().and_then(|s| s.inverse_bind_matrices) else {
            return Ok(());
        };

        let matrices = scene.matrices(accessor)?;
        if matrices.len() < self.inverse_bind_matrices.len() {
            warn!(
                "Skin has {} inverse bind matrices for {} joints, using identity for the rest",
                matrices.len(),
                self.inverse_bind_matrices.len()
            );
        }

        for (slot, matrix) in self.inverse_bind_matrices.iter_mut().zip(matrices) {
            *slot = *matrix;
        }
        Ok(())
    }

    pub fn envelopes(&self) -> &[Envelope] {
        &self.envelopes
    }

    pub fn inverse_bind_matrices(&self) -> &[Mat4] {
        &self.inverse_bind_matrices
    }

    /// Number of unskinned draw matrices; skinned entries start here
    pub fn unskinned_count(&self) -> usize {
        self.unskinned.len()
    }

    /// Draw matrix table in DRW1 order
    pub fn draw_matrices(&self) -> impl Iterator<Item = DrawMatrix> + '_ {
        self.unskinned
            .iter()
            .map(|&j| DrawMatrix::Joint(j))
            .chain(self.skinned.iter().map(|&e| DrawMatrix::Envelope(e)))
    }

    pub fn draw_matrix_count(&self) -> usize {
        self.unskinned.len() + self.skinned.len()
    }
}

fn check_joint(joint: u16, joint_count: usize, shape: usize) -> Result<()> {
    if (joint as usize) < joint_count {
        Ok(())
    } else {
        Err(ConvertError::MissingJoint {
            shape,
            joint: joint as usize,
        })
    }
}

fn table_index(len: usize, what: &'static str) -> Result<u16> {
    u16::try_from(len).map_err(|_| ConvertError::TableOverflow { what, count: len })
}
