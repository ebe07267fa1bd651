use std::path::{Path, PathBuf};

use glam::Vec3;
use id_arena::Arena;

use thiserror::Error;

use crate::color::Color;
use crate::config::{MaterialSide, MeshOverride, ModelTransformConfig};

#[derive(Error, Debug)]
pub enum AssetLoadError {
    #[error("failed to read asset {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse glTF asset: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("failed to decode texture: {0}")]
    Texture(#[from] image::ImageError),
    #[error("asset contains no scenes")]
    NoScenes,
}

/// Reference to a texture owned by the render backend. The configuration
/// pipeline only tracks where the texels came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureRef {
    /// Embedded in the source glTF, by texture index.
    Embedded(usize),
    /// Fetched from an external URL (remote material image).
    Url(String),
}

/// Physically-based material state for one mesh, mirroring every field the
/// override patches can touch.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalMaterial {
    pub color: Color,
    pub emissive: Color,
    pub metalness: f32,
    pub roughness: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub depth_write: bool,
    pub alpha_test: f32,
    pub side: MaterialSide,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub ior: f32,
    pub transmission: f32,
    pub map: Option<TextureRef>,
}

impl PhysicalMaterial {
    /// The neutral upgrade pass applied to every authored material on load:
    /// base color is forced to white and emissive to black so embedded
    /// textures are not unintentionally tinted, while authored
    /// roughness/metalness and the color map survive.
    pub fn neutral_from_gltf(material: &gltf::Material) -> Self {
        let pbr = material.pbr_metallic_roughness();

        Self {
            color: Color::WHITE,
            emissive: Color::BLACK,
            metalness: pbr.metallic_factor(),
            roughness: pbr.roughness_factor(),
            opacity: pbr.base_color_factor()[3],
            transparent: material.alpha_mode() == gltf::material::AlphaMode::Blend,
            depth_write: true,
            alpha_test: material.alpha_cutoff().unwrap_or(0.0),
            side: if material.double_sided() {
                MaterialSide::Double
            } else {
                MaterialSide::Front
            },
            clearcoat: 1.0,
            clearcoat_roughness: 0.1,
            ior: 1.5,
            transmission: 0.0,
            map: pbr
                .base_color_texture()
                .map(|info| TextureRef::Embedded(info.texture().index())),
        }
    }

    /// Partial update: only the provided fields change. Opacity and
    /// transmission also mark the material transparent.
    pub fn apply_override(&mut self, patch: &MeshOverride) {
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(metalness) = patch.metalness {
            self.metalness = metalness;
        }
        if let Some(roughness) = patch.roughness {
            self.roughness = roughness;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = opacity;
            self.transparent = true;
        }
        if let Some(depth_write) = patch.depth_write {
            self.depth_write = depth_write;
        }
        if let Some(alpha_test) = patch.alpha_test {
            self.alpha_test = alpha_test;
        }
        if let Some(side) = patch.side {
            self.side = side;
        }
        if let Some(clearcoat) = patch.clearcoat {
            self.clearcoat = clearcoat;
        }
        if let Some(clearcoat_roughness) = patch.clearcoat_roughness {
            self.clearcoat_roughness = clearcoat_roughness;
        }
        if let Some(ior) = patch.ior {
            self.ior = ior;
        }
        if let Some(transmission) = patch.transmission {
            self.transmission = transmission;
            self.transparent = true;
        }
    }
}

impl Default for PhysicalMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            emissive: Color::BLACK,
            metalness: 0.0,
            roughness: 0.5,
            opacity: 1.0,
            transparent: false,
            depth_write: true,
            alpha_test: 0.0,
            side: MaterialSide::Front,
            clearcoat: 1.0,
            clearcoat_roughness: 0.1,
            ior: 1.5,
            transmission: 0.0,
            map: None,
        }
    }
}

/// A pointer-interactive mesh collected while walking the model hierarchy.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub material: PhysicalMaterial,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
}

/// Playback state for the model's primary animation clip. The render loop
/// advances it once per frame; scrubbing pauses playback at the given time.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    pub clip: String,
    pub duration: f32,
    pub time: f32,
    pub playing: bool,
}

impl Playback {
    pub fn new(clip: &AnimationClip) -> Self {
        Self {
            clip: clip.name.clone(),
            duration: clip.duration,
            time: 0.0,
            playing: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.playing && self.duration > 0.0 {
            self.time = (self.time + dt) % self.duration;
        }
    }

    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    pub fn scrub(&mut self, time: f32) {
        self.time = time.clamp(0.0, self.duration);
        self.playing = false;
    }
}

/// A loaded GLB model: flat arena of interactive meshes plus the root
/// transform the `model` config section drives.
#[derive(Debug)]
pub struct Model {
    pub name: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    meshes: Arena<Mesh>,
    pub animations: Vec<AnimationClip>,
    pub playback: Option<Playback>,
}

impl Model {
    pub fn from_glb_path(path: impl AsRef<Path>) -> Result<Model, AssetLoadError> {
        let path = path.as_ref();
        let (document, _buffers, _images) = gltf::import(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        Self::from_document(name, &document)
    }

    pub fn from_glb_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Model, AssetLoadError> {
        let (document, _buffers, _images) = gltf::import_slice(bytes)?;
        Self::from_document(name.into(), &document)
    }

    fn from_document(name: String, document: &gltf::Document) -> Result<Model, AssetLoadError> {
        let scene = document.scenes().next().ok_or(AssetLoadError::NoScenes)?;

        let mut model = Model {
            name,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            meshes: Arena::new(),
            animations: Vec::new(),
            playback: None,
        };

        for node in scene.nodes() {
            model.collect_meshes(&node);
        }

        for animation in document.animations() {
            model.animations.push(AnimationClip {
                name: animation
                    .name()
                    .map(String::from)
                    .unwrap_or_else(|| format!("clip-{}", animation.index())),
                duration: animation_duration(&animation),
            });
        }

        // The primary clip starts playing immediately, like the viewer does.
        if let Some(clip) = model.animations.first() {
            model.playback = Some(Playback::new(clip));
        }

        log::info!(
            "loaded model {:?}: {} meshes, {} animation clips",
            model.name,
            model.meshes.len(),
            model.animations.len()
        );

        Ok(model)
    }

    fn collect_meshes(&mut self, node: &gltf::Node) {
        if let Some(mesh) = node.mesh() {
            let mesh_name = node
                .name()
                .or_else(|| mesh.name())
                .map(String::from)
                .unwrap_or_else(|| format!("mesh-{}", mesh.index()));

            // The first primitive's material is the one overrides patch.
            let material = mesh
                .primitives()
                .next()
                .map(|primitive| PhysicalMaterial::neutral_from_gltf(&primitive.material()))
                .unwrap_or_default();

            self.meshes.alloc(Mesh {
                name: mesh_name,
                material,
                cast_shadow: true,
                receive_shadow: true,
            });
        }

        for child in node.children() {
            self.collect_meshes(&child);
        }
    }

    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter().map(|(_, mesh)| mesh)
    }

    pub fn mesh_by_name(&self, name: &str) -> Option<&Mesh> {
        self.meshes.iter().map(|(_, m)| m).find(|m| m.name == name)
    }

    pub fn mesh_by_name_mut(&mut self, name: &str) -> Option<&mut Mesh> {
        self.meshes
            .iter_mut()
            .map(|(_, m)| m)
            .find(|m| m.name == name)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn apply_transform(&mut self, transform: &ModelTransformConfig) {
        self.position = transform.position;
        self.rotation = transform.rotation;
        self.scale = transform.scale;
    }

    pub fn capture_transform(&self) -> ModelTransformConfig {
        ModelTransformConfig {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    /// In-memory model for tests and headless callers; no asset needed.
    pub fn from_mesh_names(name: impl Into<String>, mesh_names: &[&str]) -> Model {
        let mut meshes = Arena::new();
        for mesh_name in mesh_names {
            meshes.alloc(Mesh {
                name: mesh_name.to_string(),
                material: PhysicalMaterial::default(),
                cast_shadow: true,
                receive_shadow: true,
            });
        }

        Model {
            name: name.into(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            meshes,
            animations: Vec::new(),
            playback: None,
        }
    }
}

fn animation_duration(animation: &gltf::Animation) -> f32 {
    animation
        .channels()
        .filter_map(|channel| {
            let input = channel.sampler().input();
            input
                .max()
                .as_ref()
                .and_then(|max| max.as_array()?.first()?.as_f64())
                .map(|max| max as f32)
        })
        .fold(0.0, f32::max)
}
