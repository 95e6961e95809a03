//! Binary data packing for glTF buffers.

use super::mesh_data::compute_bounds;
use gltf_json as json;
use json::accessor::{ComponentType, GenericComponentType, Type};
use json::validation::Checked::Valid;

/// Accumulates one binary buffer with its views and accessors
#[derive(Default)]
pub(crate) struct BufferBuilder {
    pub data: Vec<u8>,
    pub views: Vec<json::buffer::View>,
    pub accessors: Vec<json::Accessor>,
}

impl BufferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_view(&mut self, bytes: &[u8], target: Option<json::buffer::Target>) -> u32 {
        while !self.data.len().is_multiple_of(4) {
            self.data.push(0);
        }
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);

        self.views.push(json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: bytes.len().into(),
            byte_offset: Some(offset.into()),
            byte_stride: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            target: target.map(Valid),
        });
        self.views.len() as u32 - 1
    }

    fn push_accessor(
        &mut self,
        bytes: &[u8],
        count: usize,
        component: ComponentType,
        type_: Type,
        target: Option<json::buffer::Target>,
        bounds: Option<([f32; 3], [f32; 3])>,
    ) -> json::Index<json::Accessor> {
        let view = self.push_view(bytes, target);
        let to_value = |v: [f32; 3]| json::Value::Array(v.into_iter().map(json::Value::from).collect());

        self.accessors.push(json::Accessor {
            buffer_view: Some(json::Index::new(view)),
            byte_offset: Some(0u64.into()),
            count: count.into(),
            component_type: Valid(GenericComponentType(component)),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(type_),
            min: bounds.map(|(min, _)| to_value(min)),
            max: bounds.map(|(_, max)| to_value(max)),
            name: None,
            normalized: false,
            sparse: None,
        });
        json::Index::new(self.accessors.len() as u32 - 1)
    }

    /// Vertex positions; min/max are mandatory for POSITION
    pub fn positions(&mut self, values: &[[f32; 3]]) -> json::Index<json::Accessor> {
        let bounds = compute_bounds(values);
        self.push_accessor(
            bytemuck::cast_slice(values),
            values.len(),
            ComponentType::F32,
            Type::Vec3,
            Some(json::buffer::Target::ArrayBuffer),
            Some(bounds),
        )
    }

    pub fn vec3(&mut self, values: &[[f32; 3]]) -> json::Index<json::Accessor> {
        self.push_accessor(
            bytemuck::cast_slice(values),
            values.len(),
            ComponentType::F32,
            Type::Vec3,
            Some(json::buffer::Target::ArrayBuffer),
            None,
        )
    }

    pub fn vec2(&mut self, values: &[[f32; 2]]) -> json::Index<json::Accessor> {
        self.push_accessor(
            bytemuck::cast_slice(values),
            values.len(),
            ComponentType::F32,
            Type::Vec2,
            Some(json::buffer::Target::ArrayBuffer),
            None,
        )
    }

    pub fn vec4(&mut self, values: &[[f32; 4]]) -> json::Index<json::Accessor> {
        self.push_accessor(
            bytemuck::cast_slice(values),
            values.len(),
            ComponentType::F32,
            Type::Vec4,
            Some(json::buffer::Target::ArrayBuffer),
            None,
        )
    }

    /// JOINTS_0 stored as unsigned bytes
    pub fn joints(&mut self, values: &[[u8; 4]]) -> json::Index<json::Accessor> {
        self.push_accessor(
            bytemuck::cast_slice(values),
            values.len(),
            ComponentType::U8,
            Type::Vec4,
            Some(json::buffer::Target::ArrayBuffer),
            None,
        )
    }

    pub fn indices(&mut self, values: &[u16]) -> json::Index<json::Accessor> {
        self.push_accessor(
            bytemuck::cast_slice(values),
            values.len(),
            ComponentType::U16,
            Type::Scalar,
            Some(json::buffer::Target::ElementArrayBuffer),
            None,
        )
    }

    /// Column-major 4x4 matrices; skin data has no buffer target
    pub fn matrices(&mut self, values: &[[[f32; 4]; 4]]) -> json::Index<json::Accessor> {
        self.push_accessor(
            bytemuck::cast_slice(values),
            values.len(),
            ComponentType::F32,
            Type::Mat4,
            None,
            None,
        )
    }
}
