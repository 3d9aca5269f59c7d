//! Enumeration-based reachable-set bounding.
//!
//! For the set `E` of parameters with nonzero error, every subset `S ⊆ E` is
//! evaluated twice: once with `S` at `nominal - error` and once with `S` at
//! `nominal`, the rest of `E` at `nominal + error` in both cases. The box
//! around all `2 · 2^|E|` poses is the region. With no uncertain parameter
//! the region is the single nominal pose.

use crate::core::Pose2D;
use crate::error::Result;

use super::bounds::{BoundingRegion, MotionInputs, PoseEstimate};
use super::model::{ArcModel, KinematicModel};
use super::primitive::MotionPrimitive;

/// Evaluates a kinematic model at nominal and extreme parameter values.
#[derive(Clone, Debug, Default)]
pub struct MotionEvaluator<M = ArcModel> {
    model: M,
}

impl MotionEvaluator<ArcModel> {
    /// Evaluator over the constant-curvature arc model
    pub fn new() -> Self {
        Self { model: ArcModel }
    }
}

impl<M: KinematicModel> MotionEvaluator<M> {
    /// Evaluator over a custom model
    pub fn with_model(model: M) -> Self {
        Self { model }
    }

    /// The underlying model
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Pose at nominal parameter values
    pub fn evaluate(&self, inputs: &MotionInputs) -> Pose2D {
        self.model.step(&inputs.nominal_state())
    }

    /// Box around every pose reachable under the input errors.
    pub fn bounding_region(&self, inputs: &MotionInputs) -> BoundingRegion {
        let params = inputs.parameters();
        let uncertain: Vec<usize> = (0..params.len())
            .filter(|&i| params[i].is_uncertain())
            .collect();

        let mut region = BoundingRegion::point(self.evaluate(inputs));
        if uncertain.is_empty() {
            return region;
        }

        for mask in 0u32..(1 << uncertain.len()) {
            let mut low = params.map(|p| p.upper());
            let mut mid = low;
            for (bit, &i) in uncertain.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    low[i] = params[i].lower();
                    mid[i] = params[i].nominal;
                }
            }
            // Parameters outside E have zero error, so upper() == nominal
            region.include(self.model.step(&inputs.state_from(low)));
            region.include(self.model.step(&inputs.state_from(mid)));
        }

        region
    }

    /// Region reached by executing `primitive` from `start`.
    pub fn primitive_region(
        &self,
        primitive: &MotionPrimitive,
        start: &PoseEstimate,
    ) -> Result<BoundingRegion> {
        let inputs = MotionInputs::for_primitive(primitive, start)?;
        Ok(self.bounding_region(&inputs))
    }
}
