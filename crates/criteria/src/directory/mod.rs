//! Directory backend.
//!
//! Compiles criteria into an LDAP-style search filter plus the search base
//! and scope to run it with. Only equality, inequality and greater-or-equal
//! assertions are expressible; ordering is not.

mod filter;
mod mapping;

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::accumulator::Accumulator;
use crate::criterion::{
    ComparisonOperator, Criterion, EnclosureOperator, LogicalOperator, Role,
};
use crate::error::{CriteriaError, CriteriaResult};

use filter::{Assertion, Connective, FilterNode};

pub use mapping::{DirectoryMapping, SearchScope};

/// Compiled directory search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryQuery {
    pub filter: String,
    pub search_base: String,
    pub search_scope: SearchScope,
}

/// One level of grouping. The root frame holds the object-class seed.
#[derive(Debug, Clone)]
struct Frame {
    /// Connective attaching this group to its parent.
    logical: LogicalOperator,
    node: Option<FilterNode>,
    /// Still holding only the object-class seed.
    seeded: bool,
}

impl Frame {
    /// Wrap `node` into this frame's filter. The first node of a group has
    /// nothing to connect to and must not carry a logical operator.
    fn attach(&mut self, logical: LogicalOperator, node: FilterNode) -> CriteriaResult<()> {
        let connective = match (&self.node, self.seeded, logical) {
            (None, _, LogicalOperator::Undefined) => None,
            (None, _, _) => {
                return Err(CriteriaError::invalid(format!(
                    "{logical:?} directly after an opening enclosure has nothing to connect"
                )));
            }
            (Some(_), true, _) | (Some(_), false, LogicalOperator::And) => Some(Connective::And),
            (Some(_), false, LogicalOperator::Or) => Some(Connective::Or),
            (Some(_), false, LogicalOperator::Undefined) => {
                return Err(CriteriaError::invalid(
                    "restriction follows another restriction but has no logical operator",
                ));
            }
        };
        self.node = Some(match (self.node.take(), connective) {
            (Some(current), Some(connective)) => current.wrap(connective, node),
            _ => node,
        });
        self.seeded = false;
        Ok(())
    }
}

/// Accumulates criteria for one directory search.
#[derive(Debug, Clone)]
pub struct DirectoryCriteria {
    attributes: IndexMap<String, String>,
    search_base: String,
    search_scope: SearchScope,
    frames: Vec<Frame>,
    restriction_criteria: Vec<Criterion>,
}

impl DirectoryCriteria {
    /// Create criteria from a mapping.
    ///
    /// Fails with `InvalidArgument` when the object classes, attribute map or
    /// search base are empty, or no search scope is set.
    pub fn new(mapping: &DirectoryMapping) -> CriteriaResult<Self> {
        let classes: BTreeSet<String> = mapping
            .object_classes
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if classes.is_empty() {
            return Err(CriteriaError::invalid("at least one object class is required"));
        }
        if mapping.attributes.is_empty() {
            return Err(CriteriaError::invalid(
                "a property to attribute mapping is required",
            ));
        }
        if mapping.search_base.trim().is_empty() {
            return Err(CriteriaError::invalid("search base is required"));
        }
        let Some(search_scope) = mapping.search_scope else {
            return Err(CriteriaError::invalid("search scope is required"));
        };

        Ok(Self {
            attributes: mapping.attributes.clone(),
            search_base: mapping.search_base.clone(),
            search_scope,
            frames: vec![Frame {
                logical: LogicalOperator::Undefined,
                node: Some(FilterNode::ObjectClasses(classes.into_iter().collect())),
                seeded: true,
            }],
            restriction_criteria: Vec::new(),
        })
    }

    pub fn search_base(&self) -> &str {
        &self.search_base
    }

    pub fn search_scope(&self) -> SearchScope {
        self.search_scope
    }

    /// Render the filter as accumulated so far. Open groups are not included.
    pub fn filter(&self) -> String {
        let mut out = String::new();
        if let Some(node) = self.frames.first().and_then(|f| f.node.as_ref()) {
            node.render(&mut out);
        }
        out
    }

    fn assertion(&self, criterion: &Criterion) -> CriteriaResult<FilterNode> {
        let comparison = criterion.comparison();
        let assertion = match comparison {
            ComparisonOperator::Equal => Assertion::Equal,
            ComparisonOperator::NotEqual => Assertion::NotEqual,
            ComparisonOperator::GreaterThanOrEqual => Assertion::GreaterOrEqual,
            ComparisonOperator::LessThanOrEqual => {
                // No less-or-equal assertion in the supported filter subset;
                // rendered as >= for compatibility with existing callers.
                tracing::warn!(
                    operand = criterion.operand().unwrap_or_default(),
                    "less-than-or-equal rendered as >= in directory filter"
                );
                Assertion::GreaterOrEqual
            }
            ComparisonOperator::GreaterThan
            | ComparisonOperator::LessThan
            | ComparisonOperator::Like
            | ComparisonOperator::NotLike
            | ComparisonOperator::IsNull
            | ComparisonOperator::IsNotNull
            | ComparisonOperator::IsEmpty
            | ComparisonOperator::IsNotEmpty
            | ComparisonOperator::MemberOf
            | ComparisonOperator::NotMemberOf
            | ComparisonOperator::Undefined => {
                return Err(CriteriaError::unsupported(format!(
                    "{comparison:?} is not supported by the directory backend"
                )));
            }
        };

        let operand = criterion.require_operand("restriction")?;
        let Some(attribute) = self.attributes.get(operand) else {
            return Err(CriteriaError::invalid(format!(
                "no directory attribute mapped for property {operand:?}"
            )));
        };
        let Some(value) = criterion.value() else {
            return Err(CriteriaError::invalid(format!(
                "{comparison:?} on {operand:?} requires a value"
            )));
        };
        let Some(value) = value.as_directory_literal() else {
            return Err(CriteriaError::invalid(format!(
                "collection value for {operand:?} cannot be rendered in a directory filter"
            )));
        };

        Ok(FilterNode::Compare {
            attribute: attribute.clone(),
            assertion,
            value,
        })
    }

    /// Apply one criterion to `frames`, leaving `self` untouched.
    fn apply(&self, frames: &mut Vec<Frame>, criterion: &Criterion) -> CriteriaResult<()> {
        let node = match criterion.role()? {
            Role::Restriction => Some(self.assertion(criterion)?),
            Role::Enclosure => None,
            Role::Join => {
                return Err(CriteriaError::unsupported(
                    "joins are not supported by the directory backend",
                ));
            }
            Role::Order => {
                return Err(CriteriaError::unsupported(
                    "ordering is not supported by the directory backend",
                ));
            }
        };

        match (criterion.enclosure(), node) {
            (EnclosureOperator::Begin, node) => {
                check_attachable(frames, criterion.logical())?;
                frames.push(Frame {
                    logical: criterion.logical(),
                    node,
                    seeded: false,
                });
            }
            (EnclosureOperator::End, node) => {
                if let Some(node) = node {
                    current(frames)?.attach(criterion.logical(), node)?;
                }
                close(frames)?;
            }
            (EnclosureOperator::Undefined, Some(node)) => {
                current(frames)?.attach(criterion.logical(), node)?;
            }
            (EnclosureOperator::Undefined, None) => {
                return Err(CriteriaError::invalid("enclosure marker without a direction"));
            }
        }
        Ok(())
    }
}

fn current(frames: &mut [Frame]) -> CriteriaResult<&mut Frame> {
    frames
        .last_mut()
        .ok_or_else(|| CriteriaError::invalid("directory filter has no root group"))
}

/// Reject a group whose eventual attachment would be invalid.
fn check_attachable(frames: &[Frame], logical: LogicalOperator) -> CriteriaResult<()> {
    match frames.last() {
        Some(frame) if frame.node.is_some() && !frame.seeded && !logical.is_defined() => {
            Err(CriteriaError::invalid(
                "group follows another restriction but has no logical operator",
            ))
        }
        Some(frame) if frame.node.is_none() && logical.is_defined() => {
            Err(CriteriaError::invalid(format!(
                "{logical:?} directly after an opening enclosure has nothing to connect"
            )))
        }
        _ => Ok(()),
    }
}

fn close(frames: &mut Vec<Frame>) -> CriteriaResult<()> {
    if frames.len() < 2 {
        return Err(CriteriaError::invalid(
            "enclosure end without a matching begin",
        ));
    }
    let Some(Frame {
        logical,
        node: Some(node),
        ..
    }) = frames.pop()
    else {
        return Err(CriteriaError::invalid("enclosure closes an empty group"));
    };
    current(frames)?.attach(logical, node)
}

impl Accumulator for DirectoryCriteria {
    type Output = DirectoryQuery;

    fn add(&mut self, criterion: Criterion) -> CriteriaResult<&mut Self> {
        let mut frames = self.frames.clone();
        self.apply(&mut frames, &criterion)?;
        self.frames = frames;
        self.restriction_criteria.push(criterion);
        Ok(self)
    }

    fn add_order(&mut self, _criterion: Criterion) -> CriteriaResult<&mut Self> {
        Err(CriteriaError::unsupported(
            "ordering is not supported by the directory backend",
        ))
    }

    fn add_orders(
        &mut self,
        _criteria: impl IntoIterator<Item = Criterion>,
    ) -> CriteriaResult<&mut Self> {
        Err(CriteriaError::unsupported(
            "ordering is not supported by the directory backend",
        ))
    }

    fn restriction_exists(&self) -> bool {
        !self.restriction_criteria.is_empty()
    }

    fn order_exists(&self) -> bool {
        false
    }

    fn compile(&self) -> CriteriaResult<DirectoryQuery> {
        if self.frames.len() > 1 {
            return Err(CriteriaError::invalid(format!(
                "{} enclosure group(s) left open",
                self.frames.len() - 1
            )));
        }
        Ok(DirectoryQuery {
            filter: self.filter(),
            search_base: self.search_base.clone(),
            search_scope: self.search_scope,
        })
    }
}
