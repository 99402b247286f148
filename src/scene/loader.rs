use crate::core::math::transform::TransformFactory;
use crate::error::LoadError;
use crate::io::config::{Config, ObjectConfig, Primitive};
use crate::io::obj_loader::load_obj;
use crate::scene::camera::Camera;
use crate::scene::context::SceneContext;
use crate::scene::light::DirectionalLight;
use crate::scene::material::{Material, TextureSlot};
use crate::scene::mesh::Mesh;
use crate::scene::texture::{TextureArena, TextureHandle};
use crate::scene::utils::normalize_and_center_mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;

/// Builds the camera described by the config for the configured viewport.
pub fn build_camera_from_config(config: &Config) -> Camera {
    let aspect_ratio = config.render.width as f32 / config.render.height.max(1) as f32;
    Camera::new_perspective(
        Point3::from(config.camera.position),
        Point3::from(config.camera.target),
        config.camera.fov.to_radians(),
        aspect_ratio,
        config.camera.near,
        config.camera.far,
    )
}

pub fn build_light_from_config(config: &Config) -> DirectionalLight {
    let light = &config.light;
    DirectionalLight {
        intensity: light.intensity,
        shininess: light.shininess,
        ambient: Vector3::from(light.ambient),
        ..DirectionalLight::new(Vector3::from(light.direction))
    }
}

/// Loads textures once per path; repeated paths share a handle.
struct TextureCache<'a> {
    arena: &'a mut TextureArena,
    by_path: HashMap<String, TextureHandle>,
}

impl<'a> TextureCache<'a> {
    fn new(arena: &'a mut TextureArena) -> Self {
        Self {
            arena,
            by_path: HashMap::new(),
        }
    }

    /// A texture that fails to load leaves the slot empty; shaders that need
    /// it refuse the material at render time.
    fn load(&mut self, path: &str, slot: TextureSlot) -> Option<TextureHandle> {
        if let Some(handle) = self.by_path.get(path) {
            return Some(*handle);
        }
        match self.arena.load(path) {
            Ok(handle) => {
                self.by_path.insert(path.to_string(), handle);
                Some(handle)
            }
            Err(e) => {
                warn!("Failed to load {} texture '{}': {}", slot, path, e);
                None
            }
        }
    }
}

fn build_material(obj_conf: &ObjectConfig, textures: &mut TextureCache<'_>) -> Material {
    let slots = [
        (TextureSlot::Diffuse, &obj_conf.diffuse_texture),
        (TextureSlot::Normal, &obj_conf.normal_texture),
        (TextureSlot::Specular, &obj_conf.specular_texture),
        (TextureSlot::Gloss, &obj_conf.gloss_texture),
    ];

    slots
        .into_iter()
        .fold(Material::new(), |material, (slot, path)| {
            match path.as_deref().and_then(|p| textures.load(p, slot)) {
                Some(handle) => material.with_texture(slot, handle),
                None => material,
            }
        })
}

fn build_mesh(index: usize, obj_conf: &ObjectConfig) -> Result<Mesh, LoadError> {
    let mut mesh = match (&obj_conf.path, obj_conf.primitive) {
        (Some(path), _) => load_obj(path)?,
        (None, Some(Primitive::Triangle)) => Mesh::create_test_triangle(),
        (None, Some(Primitive::StripGrid)) => Mesh::create_strip_grid(),
        (None, None) => return Err(LoadError::MissingGeometry(index)),
    };

    if obj_conf.normalize {
        let (center, scale) = normalize_and_center_mesh(&mut mesh);
        info!(
            "Object {} normalized. Center: {:?}, Scale: {:.4}",
            index, center, scale
        );
    }

    // Primitives are authored without tangents.
    if obj_conf.path.is_none() {
        mesh.compute_tangents();
    }

    Ok(mesh.with_world_matrix(TransformFactory::world(
        &Vector3::from(obj_conf.position),
        &Vector3::from(obj_conf.rotation),
        &Vector3::from(obj_conf.scale),
    )))
}

/// Initial resource loading (Heavy I/O). Returns a SceneContext with one
/// material per configured object.
pub fn init_scene_resources(config: &Config) -> Result<SceneContext, LoadError> {
    let mut context = SceneContext::new(build_camera_from_config(config));
    context.light = build_light_from_config(config);

    let mut materials = Vec::with_capacity(config.objects.len());
    {
        let mut textures = TextureCache::new(&mut context.textures);
        for obj_conf in &config.objects {
            materials.push(build_material(obj_conf, &mut textures));
        }
    }

    for (index, (obj_conf, material)) in config.objects.iter().zip(materials).enumerate() {
        let mesh = build_mesh(index, obj_conf)?;
        let material_id = context.add_material(material);
        context.add_mesh(mesh.with_material(material_id));
    }

    info!(
        "Scene initialized with {} objects, {} triangles, {} textures.",
        context.meshes.len(),
        context.triangle_count(),
        context.textures.len()
    );

    Ok(context)
}
