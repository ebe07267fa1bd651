pub mod background;
pub mod ground;
pub mod lights;
pub mod scene;

pub use scene::{LoadTicket, SceneGraph};
