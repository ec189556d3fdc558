//! Workspace model - criteria, alternatives and stored problems.

mod criterion;
mod keyed;
mod performance;
mod problem;

pub use criterion::{Alternative, Criterion, DataSource};
pub use keyed::Keyed;
pub use performance::{
    BoundValue, NormalParameters, Performance, PerformanceInput, RangeParameters, ShapeParameters,
    StudentsTParameters, SurvivalParameters, NOT_ESTIMABLE,
};
pub use problem::{
    AbsoluteEntry, PerformanceRecord, PerformanceTableEntry, Problem, ProblemAlternative,
    ProblemCriterion, ProblemDataSource, RelativeEntry, SplitPerformance, UnitField, ValueTree,
    ValueTreeNode, FAVOURABLE_EFFECTS, UNFAVOURABLE_EFFECTS,
};
