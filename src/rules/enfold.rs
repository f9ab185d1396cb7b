//! Enfold: wrap any node in an inversion shell.

use super::{graft_ids, Rule, RuleMatch, RewriteStrategy, ENFOLD_RULE_ID};
use crate::core::{Boundary, Form, IdGenerator};
use crate::error::{RuleError, SearchError};
use crate::path::{visit, FormPath};
use crate::search::{AxiomSearch, ENFOLD};

/// Wraps a node as `boundary(complement(boundary)(node))`.
///
/// Applies everywhere. Through the axiom search only round and square
/// shells exist, so an angle enfold fails there with `NoAnswer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnfoldRule {
    /// Boundary of the outer shell.
    pub boundary: Boundary,
    /// How the shell is built.
    pub strategy: RewriteStrategy,
}

impl EnfoldRule {
    /// Direct enfold with the given outer boundary.
    pub fn new(boundary: Boundary) -> Self {
        Self {
            boundary,
            strategy: RewriteStrategy::Direct,
        }
    }

    /// Enfold computed by `search`.
    pub fn with_search(boundary: Boundary, search: AxiomSearch) -> Self {
        Self {
            boundary,
            strategy: RewriteStrategy::AxiomSearch(search),
        }
    }
}

impl Rule for EnfoldRule {
    fn id(&self) -> &str {
        ENFOLD_RULE_ID
    }

    fn name(&self) -> &str {
        "Enfold"
    }

    fn matches(&self, forest: &[Form]) -> Vec<RuleMatch> {
        visit(forest)
            .map(|v| RuleMatch {
                rule_id: ENFOLD_RULE_ID.to_string(),
                description: format!(
                    "enfold {} at {} into a {} shell",
                    v.node.kind().describe(),
                    v.path,
                    self.boundary
                ),
                path: v.path,
            })
            .collect()
    }

    fn rewrite_node(&self, node: &Form, _path: &FormPath, ids: &mut IdGenerator) -> Result<Form, RuleError> {
        match &self.strategy {
            RewriteStrategy::Direct => {
                let inner = ids.container(self.boundary.complement(), vec![node.clone()]);
                Ok(ids.container(self.boundary, vec![inner]))
            }
            RewriteStrategy::AxiomSearch(search) => {
                let shell = search
                    .transform_all(ENFOLD, node, ids)?
                    .into_iter()
                    .find(|candidate| candidate.is_container_of(self.boundary))
                    .ok_or_else(|| SearchError::NoAnswer {
                        goal: format!("{} with outer boundary {}.", AxiomSearch::goal(ENFOLD, node), self.boundary),
                    })?;
                Ok(graft_ids(shell, node))
            }
        }
    }
}
