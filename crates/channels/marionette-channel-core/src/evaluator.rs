use std::collections::VecDeque;
use std::sync::Arc;

use crate::channel::{clamp_value, Channel};
use crate::error::BakeError;
use crate::formula::Formula;
use crate::inputs::ChannelInputs;
use crate::outputs::ChannelOutputs;

/// The formulas attached to one channel, split by stage.
#[derive(Clone, Debug, Default)]
pub struct ChannelFormulas {
    pub sum: Vec<Formula>,
    pub multiply: Vec<Formula>,
}

impl ChannelFormulas {
    fn dependencies(&self) -> impl Iterator<Item = usize> + '_ {
        self.sum
            .iter()
            .chain(&self.multiply)
            .flat_map(|formula| formula.dependencies())
    }
}

struct CompiledChannel {
    index: usize,
    parent_channel: Option<usize>,
    clamped: bool,
    min: f64,
    max: f64,
    formulas: ChannelFormulas,
}

/// Ahead-of-time compiled evaluation plan.
///
/// Channels are ordered so that every channel referenced by a formula is
/// computed before the channel owning that formula; the per-frame work is a
/// single replay of the plan through a small stack interpreter.
pub struct ChannelEvaluator {
    channel_count: usize,
    plan: Vec<CompiledChannel>,
}

impl ChannelEvaluator {
    pub fn compile(
        channels: &[Channel],
        formulas: Vec<ChannelFormulas>,
    ) -> Result<ChannelEvaluator, BakeError> {
        if channels.len() != formulas.len() {
            return Err(BakeError::FormulaSlotMismatch {
                channels: channels.len(),
                formulas: formulas.len(),
            });
        }

        let order = topological_order(channels, &formulas)?;
        log::debug!(
            "compiled channel plan: {} channels, {} with formulas",
            channels.len(),
            formulas
                .iter()
                .filter(|f| !f.sum.is_empty() || !f.multiply.is_empty())
                .count()
        );

        let mut slots: Vec<Option<ChannelFormulas>> = formulas.into_iter().map(Some).collect();
        let plan = order
            .into_iter()
            .map(|index| {
                let channel = &channels[index];
                CompiledChannel {
                    index,
                    parent_channel: channel.parent_channel(),
                    clamped: channel.is_clamped(),
                    min: channel.min(),
                    max: channel.max(),
                    formulas: slots[index].take().unwrap_or_default(),
                }
            })
            .collect();

        Ok(ChannelEvaluator {
            channel_count: channels.len(),
            plan,
        })
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Evaluate raw inputs into an output snapshot.
    ///
    /// Pure: the same inputs (and parent outputs) always produce bit-identical
    /// results.
    pub fn evaluate(
        &self,
        parent_outputs: Option<Arc<ChannelOutputs>>,
        inputs: &ChannelInputs,
    ) -> ChannelOutputs {
        assert_eq!(
            inputs.raw_values.len(),
            self.channel_count,
            "channel input length mismatch"
        );

        let mut values = vec![0.0; self.channel_count];
        let mut stack = Vec::new();

        for compiled in &self.plan {
            let mut value = inputs.raw_values[compiled.index];

            if let (Some(parent), Some(parent_index)) = (&parent_outputs, compiled.parent_channel) {
                value += parent.values()[parent_index];
            }

            for formula in &compiled.formulas.sum {
                value += formula.eval(&values, &mut stack);
            }
            for formula in &compiled.formulas.multiply {
                value *= formula.eval(&values, &mut stack);
            }

            if compiled.clamped {
                value = clamp_value(value, compiled.min, compiled.max);
            }

            values[compiled.index] = value;
        }

        ChannelOutputs::new(parent_outputs, values)
    }
}

/// Kahn's algorithm over the formula dependency edges. A cycle is a bake
/// error naming one of the channels still blocked.
fn topological_order(
    channels: &[Channel],
    formulas: &[ChannelFormulas],
) -> Result<Vec<usize>, BakeError> {
    let count = channels.len();
    let mut indegree = vec![0usize; count];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];

    for (index, slot) in formulas.iter().enumerate() {
        for dependency in slot.dependencies() {
            dependents[dependency].push(index);
            indegree[index] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..count).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(count);

    while let Some(index) = queue.pop_front() {
        order.push(index);
        for &dependent in &dependents[index] {
            indegree[dependent] -= 1;
            if indegree[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if order.len() != count {
        let blocked = indegree
            .iter()
            .position(|&d| d > 0)
            .map(|i| channels[i].name().to_string())
            .unwrap_or_default();
        return Err(BakeError::CyclicDependency(blocked));
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Operation;
    use approx::assert_relative_eq;
    use marionette_math::{Knot, Spline};

    const ACC: f64 = 1e-4;

    fn plain_channel(name: &str, index: usize) -> Channel {
        Channel::new(name, index, None, 0.0, 0.0, 0.0, false, false, false, None)
    }

    fn assert_formula_equals(expected: f64, formula: Formula) {
        let channels = vec![plain_channel("foo", 0)];
        let formulas = vec![ChannelFormulas {
            sum: vec![formula],
            multiply: vec![],
        }];
        let evaluator = ChannelEvaluator::compile(&channels, formulas).unwrap();
        let inputs = ChannelInputs::new(vec![0.0]);
        let outputs = evaluator.evaluate(None, &inputs);
        assert_relative_eq!(outputs.values()[0], expected, epsilon = ACC);
    }

    #[test]
    fn add() {
        let formula = Formula::new(vec![
            Operation::PushValue(2.0),
            Operation::PushValue(3.0),
            Operation::Add,
        ])
        .unwrap();
        assert_formula_equals(5.0, formula);
    }

    #[test]
    fn sub() {
        let formula = Formula::new(vec![
            Operation::PushValue(2.0),
            Operation::PushValue(3.0),
            Operation::Sub,
        ])
        .unwrap();
        assert_formula_equals(-1.0, formula);
    }

    #[test]
    fn mul() {
        let formula = Formula::new(vec![
            Operation::PushValue(2.0),
            Operation::PushValue(3.0),
            Operation::Mul,
        ])
        .unwrap();
        assert_formula_equals(6.0, formula);
    }

    #[test]
    fn div() {
        let formula = Formula::new(vec![
            Operation::PushValue(2.0),
            Operation::PushValue(3.0),
            Operation::Div,
        ])
        .unwrap();
        assert_formula_equals(2.0 / 3.0, formula);
    }

    #[test]
    fn spline() {
        let spline = Spline::new(vec![
            Knot::new(0.0, 0.0),
            Knot::new(70.0, 1.0),
            Knot::new(110.0, 1.0),
            Knot::new(155.5, 0.0),
        ]);
        let formula = Formula::new(vec![
            Operation::PushValue(90.0),
            Operation::EvalSpline(spline),
        ])
        .unwrap();
        assert_formula_equals(1.1039, formula);
    }

    #[test]
    fn raw_value_passes_through() {
        let channels = vec![plain_channel("foo", 0)];
        let evaluator =
            ChannelEvaluator::compile(&channels, vec![ChannelFormulas::default()]).unwrap();
        let outputs = evaluator.evaluate(None, &ChannelInputs::new(vec![42.0]));
        assert_relative_eq!(outputs.values()[0], 42.0, epsilon = ACC);
    }

    #[test]
    fn push_channel_reads_evaluated_value() {
        let channels = vec![plain_channel("foo", 0), plain_channel("bar", 1)];
        let formulas = vec![
            ChannelFormulas {
                sum: vec![Formula::new(vec![Operation::PushChannel(1)]).unwrap()],
                multiply: vec![],
            },
            ChannelFormulas::default(),
        ];
        let evaluator = ChannelEvaluator::compile(&channels, formulas).unwrap();
        let outputs = evaluator.evaluate(None, &ChannelInputs::new(vec![0.0, 42.0]));
        assert_relative_eq!(outputs.values()[0], 42.0, epsilon = ACC);
    }

    #[test]
    fn dependency_is_evaluated_first_even_when_declared_later() {
        // channel 0 depends on channel 2, which itself has a formula
        let channels = vec![
            plain_channel("a", 0),
            plain_channel("b", 1),
            plain_channel("c", 2),
        ];
        let formulas = vec![
            ChannelFormulas {
                sum: vec![Formula::new(vec![
                    Operation::PushChannel(2),
                    Operation::PushValue(2.0),
                    Operation::Mul,
                ])
                .unwrap()],
                multiply: vec![],
            },
            ChannelFormulas::default(),
            ChannelFormulas {
                sum: vec![Formula::new(vec![Operation::PushChannel(1)]).unwrap()],
                multiply: vec![],
            },
        ];
        let evaluator = ChannelEvaluator::compile(&channels, formulas).unwrap();
        let outputs = evaluator.evaluate(None, &ChannelInputs::new(vec![0.0, 5.0, 1.0]));
        // c = 1 + 5 = 6, a = 2 * 6 = 12
        assert_relative_eq!(outputs.values()[2], 6.0, epsilon = ACC);
        assert_relative_eq!(outputs.values()[0], 12.0, epsilon = ACC);
    }

    #[test]
    fn multiply_stage_applies_after_sums() {
        let channels = vec![plain_channel("foo", 0)];
        let formulas = vec![ChannelFormulas {
            sum: vec![Formula::new(vec![Operation::PushValue(3.0)]).unwrap()],
            multiply: vec![
                Formula::new(vec![Operation::PushValue(2.0)]).unwrap(),
                Formula::new(vec![Operation::PushValue(10.0)]).unwrap(),
            ],
        }];
        let evaluator = ChannelEvaluator::compile(&channels, formulas).unwrap();
        let outputs = evaluator.evaluate(None, &ChannelInputs::new(vec![1.0]));
        // (1 + 3) * 2 * 10
        assert_relative_eq!(outputs.values()[0], 80.0, epsilon = ACC);
    }

    #[test]
    fn clamped_channel_clamps_evaluated_value() {
        let channels = vec![Channel::new(
            "foo", 0, None, 0.0, -1.0, 1.0, true, true, false, None,
        )];
        let formulas = vec![ChannelFormulas {
            sum: vec![Formula::new(vec![Operation::PushValue(5.0)]).unwrap()],
            multiply: vec![],
        }];
        let evaluator = ChannelEvaluator::compile(&channels, formulas).unwrap();
        let outputs = evaluator.evaluate(None, &ChannelInputs::new(vec![0.0]));
        assert_relative_eq!(outputs.values()[0], 1.0, epsilon = ACC);
    }

    #[test]
    fn parent_channel_value_is_added_before_formulas() {
        let parent_outputs = Arc::new(ChannelOutputs::new(None, vec![7.0]));
        let channels = vec![Channel::new(
            "foo",
            0,
            Some(0),
            0.0,
            0.0,
            0.0,
            false,
            false,
            false,
            None,
        )];
        let formulas = vec![ChannelFormulas {
            multiply: vec![Formula::new(vec![Operation::PushValue(2.0)]).unwrap()],
            sum: vec![],
        }];
        let evaluator = ChannelEvaluator::compile(&channels, formulas).unwrap();
        let outputs = evaluator.evaluate(Some(parent_outputs), &ChannelInputs::new(vec![1.0]));
        // (1 + 7) * 2
        assert_relative_eq!(outputs.values()[0], 16.0, epsilon = ACC);
    }

    #[test]
    fn cyclic_dependency_fails_at_compile_time() {
        let channels = vec![plain_channel("a", 0), plain_channel("b", 1)];
        let formulas = vec![
            ChannelFormulas {
                sum: vec![Formula::new(vec![Operation::PushChannel(1)]).unwrap()],
                multiply: vec![],
            },
            ChannelFormulas {
                sum: vec![Formula::new(vec![Operation::PushChannel(0)]).unwrap()],
                multiply: vec![],
            },
        ];
        let result = ChannelEvaluator::compile(&channels, formulas);
        assert!(matches!(result, Err(BakeError::CyclicDependency(_))));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let channels = vec![plain_channel("a", 0), plain_channel("b", 1)];
        let formulas = vec![
            ChannelFormulas {
                sum: vec![Formula::new(vec![
                    Operation::PushChannel(1),
                    Operation::PushValue(0.1),
                    Operation::Mul,
                ])
                .unwrap()],
                multiply: vec![],
            },
            ChannelFormulas::default(),
        ];
        let evaluator = ChannelEvaluator::compile(&channels, formulas).unwrap();
        let inputs = ChannelInputs::new(vec![0.3, 0.7]);

        let first = evaluator.evaluate(None, &inputs);
        for _ in 0..10 {
            let again = evaluator.evaluate(None, &inputs);
            assert_eq!(first.values(), again.values());
        }
    }
}
