use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::graph::SceneGraph;
use crate::animation::{AnimationKind, AnimationNode};
use crate::error::{Result, SceneError};

/// A scene graph together with the animations driving it, as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub scene: SceneGraph,
    #[serde(default)]
    pub animations: Vec<AnimationNode>,
}

impl SceneDescription {
    pub fn new(scene: SceneGraph, animations: Vec<AnimationNode>) -> Self {
        SceneDescription { scene, animations }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let description: SceneDescription = serde_json::from_str(json)?;
        description.validate()?;
        Ok(description)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let description = Self::from_json_str(&json)?;
        info!(
            "loaded {} nodes and {} animations from {}",
            description.scene.len(),
            description.animations.len(),
            path.display()
        );
        Ok(description)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Tree invariants plus animation wiring: targets and references must be groups.
    pub fn validate(&self) -> Result<()> {
        self.scene.validate()?;

        for (i, animation) in self.animations.iter().enumerate() {
            let mut wired = vec![animation.target];
            if let AnimationKind::RelativeMovement { reference } = animation.kind {
                wired.push(reference);
            }
            if let AnimationKind::BackAndForth { limit, .. } = animation.kind {
                if limit.is_nan() || limit <= 0.0 {
                    return Err(SceneError::InvalidScene(format!(
                        "animation {} has non-positive limit {}",
                        i, limit
                    )));
                }
            }
            for id in wired {
                if let Err(e) = self.scene.group(id) {
                    return Err(SceneError::InvalidScene(format!("animation {}: {}", i, e)));
                }
            }
        }
        Ok(())
    }
}
