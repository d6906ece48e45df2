//! Relational backend.
//!
//! Compiles criteria into an entity-query-language string of the form
//!
//! ```text
//! select [distinct] <alias> from <Entity> <alias> [<joins>]
//!     [where <predicates>] [order by <fields>]
//! ```
//!
//! with values bound as `:param1`, `:param2`, … in first-use order. Relations
//! of the queried entity are fetched automatically according to the
//! configured [`FetchStrategy`].

mod fetch;
mod query;

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::accumulator::Accumulator;
use crate::config::CompilerConfig;
use crate::criterion::{
    ComparisonOperator, ComparisonShape, Criterion, EnclosureOperator, JoinOperator,
    LogicalOperator, OrderDirection, Role, Value,
};
use crate::error::{CriteriaError, CriteriaResult};
use crate::metadata::Schema;

pub use fetch::{FetchHint, FetchStrategy, PlannedFetch, plan_fetches};
pub use query::{Parameters, RelationalQuery};

/// Restriction text, kept as tokens until serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Fragment {
    Where,
    And,
    Or,
    Open,
    Close,
    Predicate(String),
}

impl Fragment {
    fn as_str(&self) -> &str {
        match self {
            Fragment::Where => " where ",
            Fragment::And => " and ",
            Fragment::Or => " or ",
            Fragment::Open => "(",
            Fragment::Close => ")",
            Fragment::Predicate(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct JoinClause {
    operator: JoinOperator,
    /// Alias the path is navigated from; `None` means the root alias.
    owner: Option<String>,
    operand: String,
    alias: Option<String>,
}

impl JoinClause {
    /// Same association joined the same way, whatever it is aliased as.
    fn same_target(&self, other: &JoinClause) -> bool {
        self.operator == other.operator
            && self.owner == other.owner
            && self.operand == other.operand
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OrderClause {
    operand: String,
    direction: OrderDirection,
}

/// Accumulates criteria for one relational query.
#[derive(Debug, Clone)]
pub struct RelationalCriteria {
    entity: String,
    alias: String,
    joins: Vec<JoinClause>,
    restrictions: Vec<Fragment>,
    orders: Vec<OrderClause>,
    parameters: Parameters,
    hints: IndexMap<String, FetchHint>,
    open_groups: usize,
    restriction_criteria: Vec<Criterion>,
    order_criteria: Vec<Criterion>,
    join_criteria: Vec<Criterion>,
}

impl RelationalCriteria {
    /// Create criteria for `entity` with the default configuration.
    pub fn new(entity: &str, schema: &Schema) -> CriteriaResult<Self> {
        Self::with_config(entity, schema, &CompilerConfig::default())
    }

    /// Create criteria for `entity`, running the fetch optimizer chosen by
    /// `config`.
    ///
    /// Fails with `InvalidArgument` when `entity` is empty or not registered
    /// in `schema`.
    pub fn with_config(
        entity: &str,
        schema: &Schema,
        config: &CompilerConfig,
    ) -> CriteriaResult<Self> {
        if entity.trim().is_empty() {
            return Err(CriteriaError::invalid("entity name is required"));
        }
        let Some(meta) = schema.entity(entity) else {
            return Err(CriteriaError::invalid(format!(
                "entity {entity:?} is not registered in the schema"
            )));
        };

        let mut criteria = Self {
            entity: meta.simple_name().to_string(),
            alias: meta.alias(),
            joins: Vec::new(),
            restrictions: Vec::new(),
            orders: Vec::new(),
            parameters: Parameters::default(),
            hints: IndexMap::new(),
            open_groups: 0,
            restriction_criteria: Vec::new(),
            order_criteria: Vec::new(),
            join_criteria: Vec::new(),
        };

        if config.fetch_strategy != FetchStrategy::Disabled {
            let planned = plan_fetches(schema, meta, config.max_fetch_depth);
            tracing::debug!(
                entity = %criteria.entity,
                strategy = %config.fetch_strategy,
                relations = planned.len(),
                "planned automatic fetches"
            );
            match config.fetch_strategy {
                FetchStrategy::JoinFetch => criteria.push_fetch_joins(&planned),
                FetchStrategy::FetchHints => {
                    for fetch in &planned {
                        let key = format!("{}.{}", criteria.alias, fetch.path);
                        criteria.hints.insert(key, fetch.cardinality.into());
                    }
                }
                FetchStrategy::Disabled => {}
            }
        }

        Ok(criteria)
    }

    /// Simple name of the queried entity.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn hints(&self) -> &IndexMap<String, FetchHint> {
        &self.hints
    }

    pub fn join_exists(&self) -> bool {
        !self.join_criteria.is_empty()
    }

    /// Whether the projection is `distinct`: any join may multiply rows.
    pub fn is_distinct(&self) -> bool {
        !self.joins.is_empty()
    }

    /// Append a join clause. A join identical to one already present is
    /// skipped.
    pub fn add_join(&mut self, criterion: Criterion) -> CriteriaResult<&mut Self> {
        if criterion.role()? != Role::Join {
            return Err(CriteriaError::invalid(
                "add_join requires a criterion built by a join operation",
            ));
        }
        criterion.require_operand("join")?;
        self.push_join(criterion);
        Ok(self)
    }

    /// Append every join, all or nothing.
    pub fn add_joins(
        &mut self,
        criteria: impl IntoIterator<Item = Criterion>,
    ) -> CriteriaResult<&mut Self> {
        let mut staged = self.clone();
        for criterion in criteria {
            staged.add_join(criterion)?;
        }
        *self = staged;
        Ok(self)
    }

    /// Render the query string as accumulated so far.
    pub fn ql_string(&self) -> String {
        let mut ql = String::from("select ");
        if self.is_distinct() {
            ql.push_str("distinct ");
        }
        ql.push_str(&self.alias);
        ql.push_str(" from ");
        ql.push_str(&self.entity);
        ql.push(' ');
        ql.push_str(&self.alias);

        for join in &self.joins {
            if let Some(keyword) = join.operator.keyword() {
                let owner = join.owner.as_deref().unwrap_or(&self.alias);
                ql.push_str(&format!(" {keyword} {owner}.{}", join.operand));
                if let Some(alias) = &join.alias {
                    ql.push(' ');
                    ql.push_str(alias);
                }
            }
        }

        for fragment in &self.restrictions {
            ql.push_str(fragment.as_str());
        }

        for (i, order) in self.orders.iter().enumerate() {
            ql.push_str(if i == 0 { " order by " } else { ", " });
            ql.push_str(&format!("{}.{}", self.alias, order.operand));
            if let Some(keyword) = order.direction.keyword() {
                ql.push(' ');
                ql.push_str(keyword);
            }
        }

        ql
    }

    fn push_join(&mut self, criterion: Criterion) {
        let clause = JoinClause {
            operator: criterion.join_operator(),
            owner: None,
            operand: criterion.operand().unwrap_or_default().to_string(),
            alias: None,
        };
        self.push_clause(clause, criterion);
    }

    /// Fetch every planned path. A path with planned children is joined
    /// under its own alias and the children are fetched from that alias, so
    /// no fetch navigates through a collection.
    fn push_fetch_joins(&mut self, planned: &[PlannedFetch]) {
        let parents: HashSet<&str> = planned
            .iter()
            .filter_map(|fetch| fetch.path.rsplit_once('.').map(|(parent, _)| parent))
            .collect();
        let mut aliases: HashMap<&str, String> = HashMap::new();

        for fetch in planned {
            let (owner, relation) = match fetch.path.rsplit_once('.') {
                Some((parent, relation)) => match aliases.get(parent) {
                    Some(owner) => (Some(owner.clone()), relation),
                    None => (None, fetch.path.as_str()),
                },
                None => (None, fetch.path.as_str()),
            };
            let alias = parents
                .contains(fetch.path.as_str())
                .then(|| format!("{relation}{}", aliases.len() + 1));
            if let Some(alias) = &alias {
                aliases.insert(&fetch.path, alias.clone());
            }

            let clause = JoinClause {
                operator: JoinOperator::LeftJoinFetch,
                owner,
                operand: relation.to_string(),
                alias,
            };
            self.push_clause(
                clause,
                Criterion::join(fetch.path.clone(), JoinOperator::LeftJoinFetch),
            );
        }
    }

    fn push_clause(&mut self, clause: JoinClause, criterion: Criterion) {
        if self.joins.iter().any(|join| join.same_target(&clause)) {
            tracing::debug!(
                entity = %self.entity,
                operand = %clause.operand,
                "skipping duplicate join"
            );
            return;
        }
        self.joins.push(clause);
        self.join_criteria.push(criterion);
    }

    /// Connective to emit in front of the next restriction, if any.
    ///
    /// The first restriction inside a group has nothing to connect to, so a
    /// logical operator there is rejected.
    fn connective(&self, criterion: &Criterion) -> CriteriaResult<Option<Fragment>> {
        match self.restrictions.last() {
            None => return Ok(Some(Fragment::Where)),
            Some(Fragment::Open) if criterion.logical().is_defined() => {
                return Err(CriteriaError::invalid(format!(
                    "{:?} directly after an opening enclosure has nothing to connect",
                    criterion.logical()
                )));
            }
            Some(Fragment::Open) => return Ok(None),
            Some(_) => {}
        }
        match criterion.logical() {
            LogicalOperator::And => Ok(Some(Fragment::And)),
            LogicalOperator::Or => Ok(Some(Fragment::Or)),
            LogicalOperator::Undefined => Err(CriteriaError::invalid(format!(
                "restriction on {:?} follows another restriction but has no logical operator",
                criterion.operand().unwrap_or("(")
            ))),
        }
    }

    /// Render a comparison, returning its text and the value it binds.
    fn predicate(&self, criterion: &Criterion) -> CriteriaResult<(String, Option<Value>)> {
        let operand = criterion.require_operand("restriction")?;
        let path = format!("{}.{operand}", self.alias);
        let comparison = criterion.comparison();

        match comparison.shape() {
            ComparisonShape::Binary => {
                let value = require_value(criterion, operand)?;
                let param = self.parameters.next_name();
                let symbol = binary_symbol(comparison);
                Ok((format!("{path} {symbol} :{param}"), Some(value)))
            }
            ComparisonShape::Membership => {
                let value = require_value(criterion, operand)?;
                let param = self.parameters.next_name();
                let keyword = if comparison == ComparisonOperator::MemberOf {
                    "member of"
                } else {
                    "not member of"
                };
                Ok((format!(":{param} {keyword} {path}"), Some(value)))
            }
            ComparisonShape::Unary => {
                if criterion.value().is_some() {
                    return Err(CriteriaError::invalid(format!(
                        "{comparison:?} on {operand:?} takes no value"
                    )));
                }
                let suffix = match comparison {
                    ComparisonOperator::IsNull => "is null",
                    ComparisonOperator::IsNotNull => "is not null",
                    ComparisonOperator::IsEmpty => "is empty",
                    _ => "is not empty",
                };
                Ok((format!("{path} {suffix}"), None))
            }
            ComparisonShape::None => Err(CriteriaError::invalid(format!(
                "restriction on {operand:?} has no comparison"
            ))),
        }
    }

    fn add_marker(&mut self, criterion: &Criterion) -> CriteriaResult<()> {
        match criterion.enclosure() {
            EnclosureOperator::Begin => {
                let connective = self.connective(criterion)?;
                self.restrictions.extend(connective);
                self.restrictions.push(Fragment::Open);
                self.open_groups += 1;
            }
            EnclosureOperator::End => {
                self.check_close()?;
                if matches!(self.restrictions.last(), Some(Fragment::Open)) {
                    return Err(CriteriaError::invalid("enclosure closes an empty group"));
                }
                self.restrictions.push(Fragment::Close);
                self.open_groups -= 1;
            }
            EnclosureOperator::Undefined => {
                return Err(CriteriaError::invalid("enclosure marker without a direction"));
            }
        }
        Ok(())
    }

    fn add_restriction(&mut self, criterion: &Criterion) -> CriteriaResult<()> {
        let enclosure = criterion.enclosure();
        if enclosure == EnclosureOperator::End {
            self.check_close()?;
        }
        let connective = self.connective(criterion)?;
        let (text, value) = self.predicate(criterion)?;

        self.restrictions.extend(connective);
        if enclosure == EnclosureOperator::Begin {
            self.restrictions.push(Fragment::Open);
            self.open_groups += 1;
        }
        self.restrictions.push(Fragment::Predicate(text));
        if let Some(value) = value {
            self.parameters.bind(value);
        }
        if enclosure == EnclosureOperator::End {
            self.restrictions.push(Fragment::Close);
            self.open_groups -= 1;
        }
        Ok(())
    }

    fn check_close(&self) -> CriteriaResult<()> {
        if self.open_groups == 0 {
            return Err(CriteriaError::invalid(
                "enclosure end without a matching begin",
            ));
        }
        Ok(())
    }
}

fn require_value(criterion: &Criterion, operand: &str) -> CriteriaResult<Value> {
    criterion.value().cloned().ok_or_else(|| {
        CriteriaError::invalid(format!(
            "{:?} on {operand:?} requires a value",
            criterion.comparison()
        ))
    })
}

fn binary_symbol(comparison: ComparisonOperator) -> &'static str {
    match comparison {
        ComparisonOperator::Equal => "=",
        ComparisonOperator::NotEqual => "<>",
        ComparisonOperator::GreaterThan => ">",
        ComparisonOperator::GreaterThanOrEqual => ">=",
        ComparisonOperator::LessThan => "<",
        ComparisonOperator::LessThanOrEqual => "<=",
        ComparisonOperator::Like => "like",
        ComparisonOperator::NotLike => "not like",
        ComparisonOperator::IsNull
        | ComparisonOperator::IsNotNull
        | ComparisonOperator::IsEmpty
        | ComparisonOperator::IsNotEmpty
        | ComparisonOperator::MemberOf
        | ComparisonOperator::NotMemberOf
        | ComparisonOperator::Undefined => "",
    }
}

impl Accumulator for RelationalCriteria {
    type Output = RelationalQuery;

    fn add(&mut self, criterion: Criterion) -> CriteriaResult<&mut Self> {
        match criterion.role()? {
            Role::Restriction => self.add_restriction(&criterion)?,
            Role::Enclosure => self.add_marker(&criterion)?,
            Role::Join => {
                return Err(CriteriaError::invalid("joins are added with add_join"));
            }
            Role::Order => {
                return Err(CriteriaError::invalid("orders are added with add_order"));
            }
        }
        self.restriction_criteria.push(criterion);
        Ok(self)
    }

    fn add_order(&mut self, criterion: Criterion) -> CriteriaResult<&mut Self> {
        if criterion.role()? != Role::Order {
            return Err(CriteriaError::invalid(
                "add_order requires a criterion built by an order operation",
            ));
        }
        let operand = criterion.require_operand("order")?.to_string();
        self.orders.push(OrderClause {
            operand,
            direction: criterion.order_direction(),
        });
        self.order_criteria.push(criterion);
        Ok(self)
    }

    fn restriction_exists(&self) -> bool {
        !self.restriction_criteria.is_empty()
    }

    fn order_exists(&self) -> bool {
        !self.order_criteria.is_empty()
    }

    fn compile(&self) -> CriteriaResult<RelationalQuery> {
        if self.open_groups > 0 {
            return Err(CriteriaError::invalid(format!(
                "{} enclosure group(s) left open",
                self.open_groups
            )));
        }
        let query = RelationalQuery {
            ql: self.ql_string(),
            parameters: self.parameters.clone(),
            hints: self.hints.clone(),
        };
        tracing::debug!(
            entity = %self.entity,
            parameters = query.parameters.len(),
            "compiled relational query"
        );
        Ok(query)
    }
}
