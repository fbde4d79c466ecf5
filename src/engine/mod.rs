//! Aggregation engine: a registry of named, pure aggregate operations.
//!
//! ```text
//!   FilterSet ──► Predicate ──► View ─┐
//!        │                            ├──► operation ──► AggregateResult
//!        └──────► Params ─────────────┘
//! ```
//!
//! The engine holds no data and no cache. The same dataset, operation and
//! filters always produce the same result, so callers may run it from any
//! number of threads against one shared `Dataset`.

pub mod group;
pub mod ops;
pub mod result;

use std::collections::BTreeMap;

use crate::data::{Dataset, FilterSet, Params, Predicate, View};
use crate::error::{EngineError, EngineResult};

pub use result::{AggregateResult, CrossTab, Scalar, Series};

/// Signature shared by every registered operation.
pub type OperationFn = fn(&View<'_>, &Params) -> EngineResult<AggregateResult>;

/// Operation name → function lookup.
#[derive(Clone)]
pub struct Engine {
    operations: BTreeMap<&'static str, OperationFn>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("operations", &self.operations.len())
            .finish()
    }
}

impl Engine {
    /// An engine with every built-in operation registered.
    pub fn new() -> Self {
        Self::from_operations(ops::OPERATIONS.iter().copied())
    }

    /// An engine with exactly the given operations registered.
    pub fn from_operations(
        operations: impl IntoIterator<Item = (&'static str, OperationFn)>,
    ) -> Self {
        Engine {
            operations: operations.into_iter().collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Registered operation names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.operations.keys().copied()
    }

    /// Compute operation `name` over an already filtered view.
    pub fn compute(
        &self,
        name: &str,
        view: &View<'_>,
        params: &Params,
    ) -> EngineResult<AggregateResult> {
        let op = self
            .operations
            .get(name)
            .ok_or_else(|| EngineError::UnknownOperation(name.to_string()))?;
        log::debug!("computing {name} over {} rows", view.len());
        op(view, params)
    }

    /// Filter `dataset` with `filters`, extract the parameters they carry,
    /// and compute operation `name`.
    pub fn run(
        &self,
        dataset: &Dataset,
        name: &str,
        filters: &FilterSet,
    ) -> EngineResult<AggregateResult> {
        if !self.contains(name) {
            return Err(EngineError::UnknownOperation(name.to_string()));
        }
        let predicate = Predicate::build(dataset, filters)?;
        let params = Params::from_filters(filters)?;
        let view = View::new(dataset, &predicate);
        self.compute(name, &view, &params)
    }
}
