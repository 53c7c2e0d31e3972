use nalgebra::{DMatrix, DVector, Vector2};

use crate::chain::{ChainInputs, FlatChain};
use crate::numeric::pseudo_inverse;
use crate::settings::SolverSettings;
use crate::solver::IkSolver;

/// Weighted Gauss-Newton with bone-center anchors.
///
/// On top of the effector residual, every chain bone contributes a residual
/// penalizing its center's drift from the unposed position. The anchor
/// weight is far below the target weight, so the chain reaches the target
/// while its intermediate joints stay close to home instead of swinging
/// freely. Rows for joints on the root side of a bone are structurally zero:
/// a bone's rotation cannot move joints above it.
pub struct OverdeterminedGaussNewtonSolver {
    bone_center_weight: f32,
    ik_target_weight: f32,
    epsilon: f32,
}

impl OverdeterminedGaussNewtonSolver {
    pub fn new(settings: &SolverSettings) -> OverdeterminedGaussNewtonSolver {
        OverdeterminedGaussNewtonSolver {
            bone_center_weight: settings.bone_center_weight,
            ik_target_weight: settings.ik_target_weight,
            epsilon: settings.pseudo_inverse_epsilon,
        }
    }
}

impl IkSolver for OverdeterminedGaussNewtonSolver {
    fn do_iteration(
        &self,
        chain: &FlatChain,
        inputs: &mut ChainInputs,
        source_bone: usize,
        unposed_source: Vector2<f32>,
        target: Vector2<f32>,
    ) {
        let source = chain.transform_point(inputs, source_bone, unposed_source);

        // bones[0] is the source bone, walking toward the root
        let bones = chain.chain_to_root(source_bone);
        let bone_count = bones.len();

        let mut residuals = DVector::zeros(bone_count * 2 + 2);
        for (row, &bone_idx) in bones.iter().enumerate() {
            let unposed_center = chain.bones()[bone_idx].center;
            let posed_center = chain.transform_point(inputs, bone_idx, unposed_center);

            let residual = unposed_center - posed_center;
            residuals[row * 2] = self.bone_center_weight * residual.x;
            residuals[row * 2 + 1] = self.bone_center_weight * residual.y;
        }
        residuals[bone_count * 2] = self.ik_target_weight * (target.x - source.x);
        residuals[bone_count * 2 + 1] = self.ik_target_weight * (target.y - source.y);

        let mut jacobian = DMatrix::zeros(2 * bone_count + 2, bone_count);
        for (column, &bone_idx) in bones.iter().enumerate() {
            for target_idx in 0..=bone_count {
                let bone_gradient = if target_idx > column && target_idx != bone_count {
                    // this joint is on the root side of the bone; unaffected
                    Vector2::zeros()
                } else {
                    let (target_source, weight) = if target_idx < bone_count {
                        let anchor_bone = bones[target_idx];
                        let posed_center = chain.transform_point(
                            inputs,
                            anchor_bone,
                            chain.bones()[anchor_bone].center,
                        );
                        (posed_center, self.bone_center_weight)
                    } else {
                        (source, self.ik_target_weight)
                    };
                    weight * chain.gradient_of_transformed_point(inputs, bone_idx, target_source)
                };

                jacobian[(target_idx * 2, column)] = bone_gradient.x;
                jacobian[(target_idx * 2 + 1, column)] = bone_gradient.y;
            }
        }

        let step = pseudo_inverse(&jacobian, self.epsilon) * residuals;

        for (column, &bone_idx) in bones.iter().enumerate() {
            inputs.increment_rotation(bone_idx, step[column]);
        }
    }
}
