use nalgebra::Vector2;

use crate::chain::{ChainInputs, FlatChain};
use crate::solver::IkSolver;
use marionette_math::angle_between;

/// Forward-And-Backward Reaching IK working state.
///
/// The chain is treated as rigid segments of fixed length in position space.
/// `positions[0]` is the effector, `positions[i + 1]` is the center of the
/// i-th chain bone walking toward the root. The backward pass drags joints
/// toward the target from the effector end; the forward pass re-plants the
/// root and walks back out; both preserve segment lengths exactly. The final
/// positions are converted back into per-bone local rotations.
pub struct FabrikChain {
    bones: Vec<usize>,
    unposed_positions: Vec<Vector2<f32>>,
    positions: Vec<Vector2<f32>>,
    /// target for the effector
    start_target: Vector2<f32>,
    /// target for the root, which must not move
    end_target: Vector2<f32>,
}

impl FabrikChain {
    pub fn make(
        chain: &FlatChain,
        inputs: &ChainInputs,
        source_bone: usize,
        unposed_source: Vector2<f32>,
        target: Vector2<f32>,
    ) -> FabrikChain {
        let posed_source = chain.transform_point(inputs, source_bone, unposed_source);

        let mut bones = Vec::new();
        let mut unposed_positions = vec![unposed_source];
        let mut positions = vec![posed_source];

        for bone_idx in chain.chain_to_root(source_bone) {
            bones.push(bone_idx);

            let unposed_center = chain.bones()[bone_idx].center;
            unposed_positions.push(unposed_center);
            positions.push(chain.transform_point(inputs, bone_idx, unposed_center));
        }

        let end_target = positions[bones.len()];
        FabrikChain {
            bones,
            unposed_positions,
            positions,
            start_target: target,
            end_target,
        }
    }

    pub fn positions(&self) -> &[Vector2<f32>] {
        &self.positions
    }

    pub fn segment_lengths(&self) -> Vec<f32> {
        self.positions
            .windows(2)
            .map(|pair| (pair[0] - pair[1]).norm())
            .collect()
    }

    /// From the effector toward the root: place the effector on the target,
    /// then re-place each joint at its original distance from its successor.
    pub fn backward_pass(&mut self) {
        let mut target = self.start_target;

        for i in 0..self.bones.len() {
            let end = self.positions[i];
            let center = self.positions[i + 1];
            let length = (center - end).norm();

            let new_end = target;
            let new_center = new_end + length * (center - new_end).normalize();

            self.positions[i] = new_end;
            target = new_center;
        }

        self.positions[self.bones.len()] = target;
    }

    /// From the fixed root back toward the effector.
    pub fn forward_pass(&mut self) {
        let mut target = self.end_target;

        for i in (0..self.bones.len()).rev() {
            let end = self.positions[i];
            let center = self.positions[i + 1];
            let length = (center - end).norm();

            let new_center = target;
            let new_end = new_center + length * (end - new_center).normalize();

            self.positions[i + 1] = new_center;
            target = new_end;
        }

        self.positions[0] = target;
    }

    /// Measure how far each segment turned relative to its parent's
    /// accumulated world rotation and write the local angles back.
    pub fn apply_to_bones(&self, inputs: &mut ChainInputs) {
        let mut parent_rotation = 0.0;

        for i in (0..self.bones.len()).rev() {
            let world_rotation = angle_between(
                self.unposed_positions[i] - self.unposed_positions[i + 1],
                self.positions[i] - self.positions[i + 1],
            );
            let local_rotation = world_rotation - parent_rotation;

            inputs.set_rotation(self.bones[i], local_rotation);
            parent_rotation = world_rotation;
        }
    }
}

/// Purely positional; ignores rotation limits and assumes inextensible bones
/// with shape fixed during the solve.
pub struct FabrikSolver;

impl IkSolver for FabrikSolver {
    fn do_iteration(
        &self,
        chain: &FlatChain,
        inputs: &mut ChainInputs,
        source_bone: usize,
        unposed_source: Vector2<f32>,
        target: Vector2<f32>,
    ) {
        let mut fabrik_chain = FabrikChain::make(chain, inputs, source_bone, unposed_source, target);

        fabrik_chain.backward_pass();
        fabrik_chain.forward_pass();

        fabrik_chain.apply_to_bones(inputs);
    }
}
