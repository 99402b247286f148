use crate::core::math::transform::TransformFactory;
use crate::scene::camera::Camera;
use crate::scene::light::DirectionalLight;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use crate::scene::texture::TextureArena;

/// Holds all scene resources required for rendering.
///
/// Textures live in the arena for the lifetime of the scene; materials refer
/// to them by handle and meshes refer to materials by index.
pub struct SceneContext {
    pub camera: Camera,
    pub light: DirectionalLight,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub textures: TextureArena,
}

impl SceneContext {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            light: DirectionalLight::default(),
            meshes: Vec::new(),
            materials: Vec::new(),
            textures: TextureArena::new(),
        }
    }

    /// Returns the index meshes use to refer to the material.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// Spins every mesh about its own Y axis.
    pub fn rotate_meshes(&mut self, angle_rad: f32) {
        let rotation = TransformFactory::rotation_y(angle_rad);
        for mesh in &mut self.meshes {
            mesh.world_matrix *= rotation;
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::face_count).sum()
    }
}
