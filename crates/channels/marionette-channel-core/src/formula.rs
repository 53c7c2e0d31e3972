use marionette_math::Spline;
use serde::{Deserialize, Serialize};

use crate::error::FormulaError;

/// One postfix stack-machine operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Push another channel's *evaluated* value.
    PushChannel(usize),
    PushValue(f64),
    Add,
    Sub,
    Mul,
    Div,
    /// Pop x, push spline(x).
    EvalSpline(Spline),
}

/// Which accumulation stage a formula participates in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormulaStage {
    /// Added to the channel's base value.
    Sum,
    /// Multiplies the accumulating value.
    Multiply,
}

/// A validated postfix program that produces exactly one value.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    operations: Vec<Operation>,
}

impl Formula {
    /// Validate the stack discipline: no pop from an empty stack, exactly one
    /// value left at the end. Malformed programs are a bake error, never a
    /// runtime one.
    pub fn new(operations: Vec<Operation>) -> Result<Formula, FormulaError> {
        let mut depth: usize = 0;
        for operation in &operations {
            match operation {
                Operation::PushChannel(_) | Operation::PushValue(_) => depth += 1,
                Operation::Add | Operation::Sub | Operation::Mul | Operation::Div => {
                    if depth < 2 {
                        return Err(FormulaError::StackUnderflow);
                    }
                    depth -= 1;
                }
                Operation::EvalSpline(spline) => {
                    if depth < 1 {
                        return Err(FormulaError::StackUnderflow);
                    }
                    if spline.is_empty() {
                        return Err(FormulaError::EmptySpline);
                    }
                }
            }
        }
        if depth != 1 {
            return Err(FormulaError::UnbalancedStack { remaining: depth });
        }
        Ok(Formula { operations })
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Indices of the channels this formula reads.
    pub fn dependencies(&self) -> impl Iterator<Item = usize> + '_ {
        self.operations.iter().filter_map(|op| match op {
            Operation::PushChannel(index) => Some(*index),
            _ => None,
        })
    }

    /// Execute against the evaluated values computed so far. The scratch
    /// stack is caller-provided so one allocation serves a whole evaluation
    /// pass.
    pub(crate) fn eval(&self, values: &[f64], stack: &mut Vec<f64>) -> f64 {
        stack.clear();
        for operation in &self.operations {
            match operation {
                Operation::PushChannel(index) => stack.push(values[*index]),
                Operation::PushValue(value) => stack.push(*value),
                Operation::Add => {
                    let b = stack.pop().unwrap_or(0.0);
                    let a = stack.pop().unwrap_or(0.0);
                    stack.push(a + b);
                }
                Operation::Sub => {
                    let b = stack.pop().unwrap_or(0.0);
                    let a = stack.pop().unwrap_or(0.0);
                    stack.push(a - b);
                }
                Operation::Mul => {
                    let b = stack.pop().unwrap_or(0.0);
                    let a = stack.pop().unwrap_or(0.0);
                    stack.push(a * b);
                }
                Operation::Div => {
                    let b = stack.pop().unwrap_or(0.0);
                    let a = stack.pop().unwrap_or(0.0);
                    stack.push(a / b);
                }
                Operation::EvalSpline(spline) => {
                    let x = stack.pop().unwrap_or(0.0);
                    stack.push(spline.eval(x));
                }
            }
        }
        stack.pop().unwrap_or(0.0)
    }
}
