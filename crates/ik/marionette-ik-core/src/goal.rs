use nalgebra::Vector3;

/// A 3D reaching goal against the rigid skeleton: move a point fixed in the
/// source bone's local space to a world-space position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IkGoal {
    pub source_bone: usize,
    pub unposed_source_position: Vector3<f32>,
    pub target_position: Vector3<f32>,
}

impl IkGoal {
    pub fn new(
        source_bone: usize,
        unposed_source_position: Vector3<f32>,
        target_position: Vector3<f32>,
    ) -> IkGoal {
        IkGoal {
            source_bone,
            unposed_source_position,
            target_position,
        }
    }
}
