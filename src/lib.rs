pub mod applier;
pub mod camera;
pub mod codec;
pub mod color;
pub mod config;
pub mod engine;
pub mod model;
pub mod remote;
pub mod scene_graph;

pub use codec::MalformedConfigError;
pub use config::{ConfigStore, SceneConfig, Subsystem};
pub use engine::Viewer;
pub use model::AssetLoadError;
pub use scene_graph::SceneGraph;
