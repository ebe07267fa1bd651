use std::path::PathBuf;

use anyhow::{Context, Result};

use vitrine::remote::{self, RemoteSettings};
use vitrine::Viewer;

/// Headless demo: load a GLB (and optionally a settings snapshot and a
/// remote-settings payload), run a few frames, and print the exported
/// settings JSON.
///
/// Usage: vitrine <model.glb> [settings.json] [remote.json]
fn main() -> Result<()> {
    pretty_env_logger::init();

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let model_path = args.next().context("usage: vitrine <model.glb> [settings.json] [remote.json]")?;
    let settings_path = args.next();
    let remote_path = args.next();

    let mut viewer = Viewer::new();

    viewer
        .scene
        .load_model(&model_path)
        .with_context(|| format!("loading {}", model_path.display()))?;

    if let Some(path) = settings_path {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        viewer
            .import_settings(&text)
            .context("importing settings")?;
    }

    // Best-effort, like the startup fetch: failures keep defaults.
    if let Some(path) = remote_path {
        match std::fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|text| RemoteSettings::from_json(&text).map_err(Into::into))
        {
            Ok(settings) => remote::apply_remote_settings(&mut viewer.scene, &settings),
            Err(err) => log::error!("remote settings unavailable, keeping defaults: {err}"),
        }
    }

    for _ in 0..3 {
        viewer.update(1.0 / 60.0);
    }
    viewer.log_camera_pose();

    println!("{}", viewer.export_settings());

    Ok(())
}
