mod matrix4x4;
mod vec4;

pub use matrix4x4::Matrix4x4;
pub use vec4::Vec4;
