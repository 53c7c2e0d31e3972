use serde::{Deserialize, Serialize};

/// Tuning knobs shared by the solver strategies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Per-ancestor weight falloff for the simple decay solver.
    pub decay: f32,
    /// Weight of the bone-center anchor residuals in the overdetermined
    /// solver.
    pub bone_center_weight: f32,
    /// Weight of the end-effector residual in the overdetermined solver;
    /// set well above `bone_center_weight` so reaching the target wins over
    /// preserving shape.
    pub ik_target_weight: f32,
    /// Singular-value cutoff for pseudo-inversion.
    pub pseudo_inverse_epsilon: f32,
}

impl Default for SolverSettings {
    fn default() -> SolverSettings {
        SolverSettings {
            decay: 0.9,
            bone_center_weight: 1.0,
            ik_target_weight: 10.0,
            pseudo_inverse_epsilon: 1e-6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: SolverSettings = serde_json::from_str("{\"decay\": 0.8}").unwrap();
        assert_eq!(settings.decay, 0.8);
        assert_eq!(settings.ik_target_weight, 10.0);
    }
}
