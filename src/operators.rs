//! Mutation operator catalog
//!
//! The operators the model is asked to apply. Order matters: it is the order in
//! which they are listed in every prompt.

use std::fmt;

/// A category of code change used to generate mutants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOperator {
    ConditionalsBoundary,
    Increments,
    InvertNegatives,
    Math,
    NegateConditionals,
    ReturnValues,
    VoidMethodCalls,
    EmptyReturns,
    FalseReturns,
    TrueReturns,
    NullReturns,
    PrimitiveReturns,
}

impl MutationOperator {
    /// Every operator, in declaration order
    pub const ALL: [MutationOperator; 12] = [
        MutationOperator::ConditionalsBoundary,
        MutationOperator::Increments,
        MutationOperator::InvertNegatives,
        MutationOperator::Math,
        MutationOperator::NegateConditionals,
        MutationOperator::ReturnValues,
        MutationOperator::VoidMethodCalls,
        MutationOperator::EmptyReturns,
        MutationOperator::FalseReturns,
        MutationOperator::TrueReturns,
        MutationOperator::NullReturns,
        MutationOperator::PrimitiveReturns,
    ];

    /// Human-readable name as shown to the model
    pub fn readable_name(&self) -> &'static str {
        match self {
            MutationOperator::ConditionalsBoundary => "Conditionals Boundary",
            MutationOperator::Increments => "Increments",
            MutationOperator::InvertNegatives => "Invert Negatives",
            MutationOperator::Math => "Math",
            MutationOperator::NegateConditionals => "Negate Conditionals",
            MutationOperator::ReturnValues => "Return Values",
            MutationOperator::VoidMethodCalls => "Void Method Calls",
            MutationOperator::EmptyReturns => "Empty Returns",
            MutationOperator::FalseReturns => "False Returns",
            MutationOperator::TrueReturns => "True Returns",
            MutationOperator::NullReturns => "Null Returns",
            MutationOperator::PrimitiveReturns => "Primitive Returns",
        }
    }
}

impl fmt::Display for MutationOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.readable_name())
    }
}
