//! Best-effort remote settings fetched once at startup.
//!
//! The transport is an external collaborator (a REST proxy); this module
//! owns the payload contract and how it lands in the scene. Any failure
//! degrades to defaults and is only logged, never fatal.

use serde::Deserialize;

use crate::color::Color;
use crate::model::TextureRef;
use crate::scene_graph::SceneGraph;

/// Mesh recolored for premium installs.
pub const ACCENT_MESH: &str = "Object_244";
/// Mesh that takes the remote material image.
pub const PLATE_MESH: &str = "Bumper_Plate001_COLOR_1001_0";

/// Wire contract of the settings endpoint. Field names are fixed by the
/// deployed proxy.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSettings {
    #[serde(default)]
    pub premium: bool,
    #[serde(rename = "object244Color", default)]
    pub accent_color: Option<Color>,
    #[serde(rename = "materialImage", default)]
    pub material_image: Option<String>,
}

impl RemoteSettings {
    /// Parses an endpoint response body. Callers treat errors as "keep
    /// defaults"; nothing here is fatal.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Applies remote settings to the loaded model: the accent recolor is gated
/// on `premium`, the material image is applied whenever present. Missing
/// meshes are logged and skipped.
pub fn apply_remote_settings(scene: &mut SceneGraph, settings: &RemoteSettings) {
    if settings.premium {
        if let Some(color) = settings.accent_color {
            if !scene.apply_mesh_override(
                ACCENT_MESH,
                &crate::config::MeshOverride {
                    color: Some(color),
                    ..Default::default()
                },
            ) {
                log::warn!("accent mesh {ACCENT_MESH:?} not found, skipping recolor");
            }
        }
    }

    if let Some(url) = &settings.material_image {
        apply_texture_to_mesh(scene, PLATE_MESH, url);
    }
}

/// Assigns an external texture to a named mesh and neutralizes the tint so
/// the texture shows true colors.
pub fn apply_texture_to_mesh(scene: &mut SceneGraph, mesh_name: &str, url: &str) {
    let Some(mesh) = scene
        .model_mut()
        .and_then(|model| model.mesh_by_name_mut(mesh_name))
    else {
        log::warn!("mesh {mesh_name:?} not found to apply texture");
        return;
    };

    mesh.material.map = Some(TextureRef::Url(url.to_string()));
    mesh.material.color = Color::WHITE;
    mesh.material.emissive = Color::BLACK;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;

    fn scene_with(meshes: &[&str]) -> SceneGraph {
        let mut scene = SceneGraph::new();
        let ticket = scene.begin_model_load();
        scene.finish_model_load(ticket, Model::from_mesh_names("m", meshes));
        scene
    }

    #[test]
    fn parses_the_wire_contract() {
        let settings = RemoteSettings::from_json(
            r##"{ "premium": true, "object244Color": "#0b3b7a", "materialImage": null }"##,
        )
        .unwrap();

        assert!(settings.premium);
        assert_eq!(settings.accent_color, Some(Color::new(0x0b, 0x3b, 0x7a)));
        assert!(settings.material_image.is_none());
    }

    #[test]
    fn accent_recolor_requires_premium() {
        let mut scene = scene_with(&[ACCENT_MESH]);
        let settings = RemoteSettings {
            premium: false,
            accent_color: Some(Color::new(0x0b, 0x3b, 0x7a)),
            material_image: None,
        };

        apply_remote_settings(&mut scene, &settings);

        let mesh = scene.model().unwrap().mesh_by_name(ACCENT_MESH).unwrap();
        assert_eq!(mesh.material.color, Color::WHITE);
    }

    #[test]
    fn premium_recolor_applies() {
        let mut scene = scene_with(&[ACCENT_MESH]);
        let settings = RemoteSettings {
            premium: true,
            accent_color: Some(Color::new(0x0b, 0x3b, 0x7a)),
            material_image: None,
        };

        apply_remote_settings(&mut scene, &settings);

        let mesh = scene.model().unwrap().mesh_by_name(ACCENT_MESH).unwrap();
        assert_eq!(mesh.material.color, Color::new(0x0b, 0x3b, 0x7a));
    }

    #[test]
    fn material_image_neutralizes_tint() {
        let mut scene = scene_with(&[PLATE_MESH]);
        scene
            .model_mut()
            .unwrap()
            .mesh_by_name_mut(PLATE_MESH)
            .unwrap()
            .material
            .color = Color::new(0x10, 0x20, 0x30);

        let settings = RemoteSettings {
            premium: false,
            accent_color: None,
            material_image: Some("https://cdn.example/plate.png".to_string()),
        };
        apply_remote_settings(&mut scene, &settings);

        let mesh = scene.model().unwrap().mesh_by_name(PLATE_MESH).unwrap();
        assert_eq!(
            mesh.material.map,
            Some(TextureRef::Url("https://cdn.example/plate.png".to_string()))
        );
        assert_eq!(mesh.material.color, Color::WHITE);
    }

    #[test]
    fn missing_meshes_are_skipped() {
        let mut scene = scene_with(&["something-else"]);
        let settings = RemoteSettings {
            premium: true,
            accent_color: Some(Color::WHITE),
            material_image: Some("x".to_string()),
        };

        // Must not panic or mutate anything.
        apply_remote_settings(&mut scene, &settings);
    }
}
