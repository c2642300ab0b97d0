//! Per-frame drivers that mutate the local matrix of a group node.
//!
//! Every tick of an active [`AnimationNode`] right-multiplies its target's
//! matrix by a freshly generated delta transform, so motion accumulates.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, SceneError};
use crate::geometry::{Matrix4x4, Vec4};
use crate::scene::{NodeId, SceneGraph};

/// Which matrix factory turns the scaled axis into a delta transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformKind {
    Translation,
    Rotation,
    Scaling,
    Shear,
}

impl TransformKind {
    pub fn matrix(&self, v: Vec4) -> Matrix4x4 {
        match self {
            TransformKind::Translation => Matrix4x4::translation(v),
            TransformKind::Rotation => Matrix4x4::rotation(v),
            TransformKind::Scaling => Matrix4x4::scaling(v),
            TransformKind::Shear => Matrix4x4::shear(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnimationKind {
    /// Moves by the full scaled time delta every tick.
    Direct,
    /// Oscillates `position` between `0` and `limit`.
    BackAndForth {
        limit: f64,
        position: f64,
        invert: bool,
    },
    /// Like `Direct`, with the delta expressed in the frame of `reference`.
    RelativeMovement { reference: NodeId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationNode {
    pub target: NodeId,
    pub speed: f64,
    pub active: bool,
    pub axis: Vec4,
    pub transform: TransformKind,
    pub kind: AnimationKind,
}

impl AnimationNode {
    pub fn direct(target: NodeId, speed: f64, active: bool, axis: Vec4, transform: TransformKind) -> Self {
        AnimationNode {
            target,
            speed,
            active,
            axis,
            transform,
            kind: AnimationKind::Direct,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn back_and_forth(
        target: NodeId,
        speed: f64,
        active: bool,
        axis: Vec4,
        transform: TransformKind,
        limit: f64,
        start_position: f64,
    ) -> Result<Self> {
        if limit.is_nan() || limit <= 0.0 {
            return Err(SceneError::InvalidScene(format!(
                "back-and-forth limit must be positive, got {}",
                limit
            )));
        }
        Ok(AnimationNode {
            target,
            speed,
            active,
            axis,
            transform,
            kind: AnimationKind::BackAndForth {
                limit,
                position: start_position,
                invert: false,
            },
        })
    }

    pub fn relative(
        target: NodeId,
        reference: NodeId,
        speed: f64,
        active: bool,
        axis: Vec4,
        transform: TransformKind,
    ) -> Self {
        AnimationNode {
            target,
            speed,
            active,
            axis,
            transform,
            kind: AnimationKind::RelativeMovement { reference },
        }
    }

    pub fn toggle_active(&mut self) {
        self.active = !self.active;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Turns a scaled time delta into the movement actually applied this tick.
    fn calculate_movement(&mut self, delta: f64) -> f64 {
        match &mut self.kind {
            AnimationKind::Direct | AnimationKind::RelativeMovement { .. } => delta,
            AnimationKind::BackAndForth {
                limit,
                position,
                invert,
            } => {
                let sign = if *invert { -1.0 } else { 1.0 };
                let mut new_position = *position + (delta % *limit) * sign;
                if new_position > *limit {
                    *invert = true;
                    new_position = 2.0 * *limit - new_position;
                } else if new_position < 0.0 {
                    *invert = false;
                    new_position = -new_position;
                }
                let movement = new_position - *position;
                *position = new_position;
                movement
            }
        }
    }

    /// Advances the animation by `delta_millis` and updates the target group's matrix.
    pub fn simulate(&mut self, scene: &mut SceneGraph, delta_millis: f64) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        let movement = self.calculate_movement(delta_millis / 1000.0 * self.speed);
        let mut delta = self.transform.matrix(self.axis * movement);
        if let AnimationKind::RelativeMovement { reference } = self.kind {
            delta = delta * scene.group(reference)?.matrix;
        }

        let group = scene.group_mut(self.target)?;
        group.matrix = group.matrix * delta;

        trace!(
            "animation on node {}: movement {:.4}, kind {:?}",
            self.target, movement, self.kind
        );
        Ok(())
    }
}

/// Runs one tick of every animation, in order.
pub fn simulate_all(animations: &mut [AnimationNode], scene: &mut SceneGraph, delta_millis: f64) -> Result<()> {
    for animation in animations.iter_mut() {
        animation.simulate(scene, delta_millis)?;
    }
    Ok(())
}
