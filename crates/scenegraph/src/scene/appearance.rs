use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};
use crate::geometry::Vec4;

/// Phong coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,
}

impl Material {
    pub fn new(ambient: f64, diffuse: f64, specular: f64, shininess: f64) -> Self {
        Material {
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::new(0.3, 0.6, 1.5, 4.0)
    }
}

// packed as (ambient, diffuse, specular, shininess)
impl From<Vec4> for Material {
    fn from(value: Vec4) -> Self {
        Material::new(value.0, value.1, value.2, value.3)
    }
}

impl From<Material> for Vec4 {
    fn from(value: Material) -> Self {
        Vec4(value.ambient, value.diffuse, value.specular, value.shininess)
    }
}

/// Surface description of a geometric leaf.
///
/// `colors` and `materials` are never empty; a single entry covers the whole
/// shape, longer lists are consumed per face and repeated when short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub colors: Vec<Vec4>,
    pub materials: Vec<Material>,
    /// opaque handle, resolved by whoever owns textures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_map: Option<String>,
}

impl Appearance {
    pub fn new(colors: Vec<Vec4>, materials: Vec<Material>) -> Result<Self> {
        let appearance = Appearance {
            colors,
            materials,
            texture: None,
            normal_map: None,
        };
        appearance.validate()?;
        Ok(appearance)
    }

    pub fn solid(color: Vec4, material: Material) -> Self {
        Appearance {
            colors: vec![color],
            materials: vec![material],
            texture: None,
            normal_map: None,
        }
    }

    pub fn with_texture(mut self, texture: impl Into<String>, normal_map: Option<String>) -> Self {
        self.texture = Some(texture.into());
        self.normal_map = normal_map;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.colors.is_empty() {
            return Err(SceneError::EmptyAppearance("color"));
        }
        if self.materials.is_empty() {
            return Err(SceneError::EmptyAppearance("material"));
        }
        Ok(())
    }

    pub fn colors_for(&self, count: usize) -> Vec<Vec4> {
        repeat_to_length(&self.colors, count)
    }

    pub fn materials_for(&self, count: usize) -> Vec<Material> {
        repeat_to_length(&self.materials, count)
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Appearance::solid(Vec4(1.0, 1.0, 1.0, 1.0), Material::default())
    }
}

/// Cycles `items` until it covers `len` entries. Lists that are already long
/// enough are returned unchanged, and an empty list stays empty.
pub fn repeat_to_length<T: Clone>(items: &[T], len: usize) -> Vec<T> {
    if items.len() >= len || items.is_empty() {
        return items.to_vec();
    }
    items.iter().cycle().take(len).cloned().collect()
}
