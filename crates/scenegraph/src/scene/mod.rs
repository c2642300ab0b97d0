mod appearance;
mod camera;
mod format;
mod graph;
mod node;
mod visitor;

pub mod test_scenes;

pub use appearance::{Appearance, Material, repeat_to_length};
pub use camera::{Camera, CameraLightVisitor};
pub use format::SceneDescription;
pub use graph::SceneGraph;
pub use node::{AABoxNode, CameraNode, GroupNode, LightNode, Node, NodeId, PyramidNode, SphereNode};
pub use visitor::{Visitor, walk_group};
