//! Model-space to view-space transforms for item rendering.
//!
//! A [`Pose`] pairs the position matrix with the matrix used for normals.
//! The normal matrix is maintained incrementally by [`PoseStack`] rather than
//! recomputed as an inverse transpose, so uniform scales leave it untouched
//! and negative uniform scales only flip it.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pose {
    pub position: Mat4,
    pub normal: Mat3,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Mat4::IDENTITY,
        normal: Mat3::IDENTITY,
    };

    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.position.transform_point3(p)
    }

    /// Transforms and renormalizes a normal. Zero stays zero.
    #[inline]
    pub fn transform_normal(&self, n: Vec3) -> Vec3 {
        (self.normal * n).normalize_or_zero()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Stack of poses. Never empty; the bottom entry is the identity.
#[derive(Debug, Clone)]
pub struct PoseStack {
    stack: Vec<Pose>,
}

impl Default for PoseStack {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseStack {
    pub fn new() -> Self {
        Self { stack: vec![Pose::IDENTITY] }
    }

    /// Starts from `pose` instead of the identity.
    pub fn from_pose(pose: Pose) -> Self {
        Self { stack: vec![pose] }
    }

    #[inline]
    pub fn top(&self) -> &Pose {
        // The stack is never empty: `pop` refuses to remove the last entry.
        &self.stack[self.stack.len() - 1]
    }

    #[inline]
    fn top_mut(&mut self) -> &mut Pose {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self) {
        let top = *self.top();
        self.stack.push(top);
    }

    /// # Panics
    /// Panics when popping the bottom entry.
    pub fn pop(&mut self) {
        assert!(self.stack.len() > 1, "pose stack underflow");
        self.stack.pop();
    }

    pub fn translate(&mut self, offset: Vec3) {
        let top = self.top_mut();
        top.position *= Mat4::from_translation(offset);
    }

    pub fn rotate(&mut self, rotation: Quat) {
        let top = self.top_mut();
        top.position *= Mat4::from_quat(rotation);
        top.normal *= Mat3::from_quat(rotation);
    }

    pub fn scale(&mut self, s: Vec3) {
        let top = self.top_mut();
        top.position *= Mat4::from_scale(s);

        if s.x == s.y && s.y == s.z {
            if s.x < 0.0 {
                top.normal = top.normal.mul_scalar(-1.0);
            }
            return;
        }

        let inv = s.recip();
        let k = (inv.x * inv.y * inv.z).cbrt().recip();
        top.normal *= Mat3::from_diagonal(inv * k);
    }
}

/// Translation, rotation and scale of one display context.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transformation {
    /// Euler angles in degrees, applied X then Y then Z.
    pub rotation: Vec3,
    pub translation: Vec3,
    pub scale: Vec3,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transformation {
    pub const IDENTITY: Transformation = Transformation {
        rotation: Vec3::ZERO,
        translation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn new(rotation: Vec3, translation: Vec3, scale: Vec3) -> Self {
        Self { rotation, translation, scale }
    }

    /// Applies this transformation to the top of `stack`.
    ///
    /// Left-handed display mirrors across X: the Y and Z rotations and the X
    /// translation change sign.
    pub fn apply(&self, left_handed: bool, stack: &mut PoseStack) {
        if *self == Self::IDENTITY {
            return;
        }

        let (mut rot, mut tr) = (self.rotation, self.translation);
        if left_handed {
            rot.y = -rot.y;
            rot.z = -rot.z;
            tr.x = -tr.x;
        }

        stack.translate(tr);
        stack.rotate(Quat::from_euler(
            EulerRot::XYZ,
            rot.x.to_radians(),
            rot.y.to_radians(),
            rot.z.to_radians(),
        ));
        stack.scale(self.scale);
    }
}

/// Display context an item is rendered in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum TransformMode {
    #[default]
    None,
    ThirdPersonLeftHand,
    ThirdPersonRightHand,
    FirstPersonLeftHand,
    FirstPersonRightHand,
    Head,
    Gui,
    Ground,
    Fixed,
}

impl TransformMode {
    pub fn is_first_person(self) -> bool {
        matches!(self, Self::FirstPersonLeftHand | Self::FirstPersonRightHand)
    }
}

/// Per-mode transformations of a model.
///
/// Left-hand modes fall back to their right-hand counterpart when unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelTransformation {
    pub third_person_left: Option<Transformation>,
    pub third_person_right: Transformation,
    pub first_person_left: Option<Transformation>,
    pub first_person_right: Transformation,
    pub head: Transformation,
    pub gui: Transformation,
    pub ground: Transformation,
    pub fixed: Transformation,
}

impl ModelTransformation {
    pub const NONE: ModelTransformation = ModelTransformation {
        third_person_left: None,
        third_person_right: Transformation::IDENTITY,
        first_person_left: None,
        first_person_right: Transformation::IDENTITY,
        head: Transformation::IDENTITY,
        gui: Transformation::IDENTITY,
        ground: Transformation::IDENTITY,
        fixed: Transformation::IDENTITY,
    };

    pub fn get(&self, mode: TransformMode) -> Transformation {
        match mode {
            TransformMode::None => Transformation::IDENTITY,
            TransformMode::ThirdPersonLeftHand => {
                self.third_person_left.unwrap_or(self.third_person_right)
            }
            TransformMode::ThirdPersonRightHand => self.third_person_right,
            TransformMode::FirstPersonLeftHand => {
                self.first_person_left.unwrap_or(self.first_person_right)
            }
            TransformMode::FirstPersonRightHand => self.first_person_right,
            TransformMode::Head => self.head,
            TransformMode::Gui => self.gui,
            TransformMode::Ground => self.ground,
            TransformMode::Fixed => self.fixed,
        }
    }
}
