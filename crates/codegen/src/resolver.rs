//! # Relationship Resolver
//!
//! Decides, for every many-to-many pair of supplied models, which table
//! realizes it. A pair is resolved by the first [`JoinTableStrategy`] that
//! produces an answer:
//!
//! 1. [`ExplicitOverride`]: join models named in the (deprecated) loader
//!    configuration.
//! 2. [`AutoDetect`]: supplied models shaped like a join table, i.e. holding
//!    `BelongsTo` relations to exactly the two sides and nothing else.
//!
//! Pairs are keyed by their sorted model names so the outcome never depends
//! on the order in which the models were supplied.

use schemaloader_core::{EngineError, EngineResult};
use schemaloader_ir::ModelDescriptor;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

// ============================================================================
// Resolution output
// ============================================================================

/// Where the table realizing a many-to-many pair comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinSource {
    /// A supplied descriptor, by supply index
    Descriptor(usize),
    /// No descriptor was supplied; the table is generated from the
    /// `through` reference of the relation
    Synthesized { table: String },
}

/// The resolved join table of one many-to-many pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedJoin {
    /// Supply index of the side whose model name sorts first
    pub left: usize,

    /// Supply index of the other side
    pub right: usize,

    /// The table realizing the pair
    pub source: JoinSource,

    /// Name of the strategy that resolved the pair
    pub strategy: &'static str,
}

/// Every resolved pair, in pair order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub joins: Vec<ResolvedJoin>,
}

impl Resolution {
    /// Check if a supplied descriptor was adopted as a join table
    pub fn is_adopted(&self, index: usize) -> bool {
        self.joins
            .iter()
            .any(|j| j.source == JoinSource::Descriptor(index))
    }

    /// The join that adopted a supplied descriptor, if any
    pub fn adopting(&self, index: usize) -> Option<&ResolvedJoin> {
        self.joins
            .iter()
            .find(|j| j.source == JoinSource::Descriptor(index))
    }

    /// Joins that have no supplied descriptor
    pub fn synthesized(&self) -> impl Iterator<Item = (&ResolvedJoin, &str)> {
        self.joins.iter().filter_map(|j| match &j.source {
            JoinSource::Synthesized { table } => Some((j, table.as_str())),
            JoinSource::Descriptor(_) => None,
        })
    }
}

// ============================================================================
// Pair context
// ============================================================================

/// A many-to-many pair as seen by the strategies
#[derive(Debug, Clone)]
pub struct PairContext<'a> {
    /// All supplied descriptors
    pub models: &'a [ModelDescriptor],

    /// Supply index of the side whose model name sorts first
    pub left: usize,

    /// Supply index of the other side
    pub right: usize,

    /// Join-shaped descriptors connecting exactly `left` and `right`
    pub candidates: Vec<usize>,

    /// Distinct `through` references declared on either side
    pub through: BTreeSet<String>,
}

impl PairContext<'_> {
    fn left_name(&self) -> &str {
        &self.models[self.left].name
    }

    fn right_name(&self) -> &str {
        &self.models[self.right].name
    }

    fn names(&self, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .map(|&i| self.models[i].name.clone())
            .collect()
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// One way of deciding the join table of a many-to-many pair
pub trait JoinTableStrategy {
    /// Strategy name used in logs
    fn name(&self) -> &'static str;

    /// Resolve the pair, or return `None` to defer to the next strategy
    fn resolve(&self, pair: &PairContext<'_>) -> EngineResult<Option<JoinSource>>;
}

/// Join models named explicitly in the loader configuration
#[derive(Debug, Default)]
pub struct ExplicitOverride {
    by_pair: BTreeMap<(usize, usize), usize>,
}

impl ExplicitOverride {
    /// Validate the override names against the supplied models
    ///
    /// Every override must name a supplied, join-shaped model connecting a
    /// declared many-to-many pair, and no pair may be overridden twice.
    pub fn new(
        models: &[ModelDescriptor],
        overrides: &[String],
        pairs: &BTreeMap<(usize, usize), PairDecl>,
    ) -> EngineResult<Self> {
        let mut by_pair = BTreeMap::new();

        for name in overrides {
            let index = find_model(models, name).ok_or_else(|| {
                EngineError::invalid_override(name, "no such model was supplied")
            })?;

            let key = join_shape(models, index)?.ok_or_else(|| {
                EngineError::invalid_override(
                    name,
                    "model must hold foreign keys to exactly two other models and nothing else",
                )
            })?;

            if !pairs.contains_key(&key) {
                return Err(EngineError::invalid_override(
                    name,
                    format!(
                        "no many-to-many relation is declared between '{}' and '{}'",
                        models[key.0].name, models[key.1].name
                    ),
                ));
            }

            if let Some(previous) = by_pair.insert(key, index) {
                if previous != index {
                    return Err(EngineError::invalid_override(
                        name,
                        format!(
                            "'{}' already overrides the join table between '{}' and '{}'",
                            models[previous].name, models[key.0].name, models[key.1].name
                        ),
                    ));
                }
            }

            warn!(
                model = %name,
                "explicit join table overrides are deprecated; the join table is detected automatically"
            );
        }

        Ok(Self { by_pair })
    }

    /// Supply indices of every override model
    pub fn models(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_pair.values().copied()
    }
}

impl JoinTableStrategy for ExplicitOverride {
    fn name(&self) -> &'static str {
        "explicit-override"
    }

    fn resolve(&self, pair: &PairContext<'_>) -> EngineResult<Option<JoinSource>> {
        Ok(self
            .by_pair
            .get(&(pair.left, pair.right))
            .map(|&index| JoinSource::Descriptor(index)))
    }
}

/// Pick the single join-shaped model connecting the pair
#[derive(Debug, Default)]
pub struct AutoDetect;

impl JoinTableStrategy for AutoDetect {
    fn name(&self) -> &'static str {
        "auto-detect"
    }

    fn resolve(&self, pair: &PairContext<'_>) -> EngineResult<Option<JoinSource>> {
        if pair.through.len() > 1 {
            return Err(EngineError::AmbiguousJoinTable {
                left: pair.left_name().to_string(),
                right: pair.right_name().to_string(),
                candidates: pair.through.iter().cloned().collect(),
            });
        }

        let through = pair.through.iter().next();

        let candidates: Vec<usize> = match through {
            Some(name) => match find_model(pair.models, name) {
                Some(index) if pair.candidates.contains(&index) => vec![index],
                Some(_) => {
                    return Err(EngineError::unresolved(
                        pair.left_name(),
                        pair.right_name(),
                        format!(
                            "'{name}' does not hold foreign keys to exactly '{}' and '{}'",
                            pair.left_name(),
                            pair.right_name()
                        ),
                    ));
                }
                None => Vec::new(),
            },
            None => pair.candidates.clone(),
        };

        match candidates.as_slice() {
            [index] => Ok(Some(JoinSource::Descriptor(*index))),
            [] => match through {
                Some(table) => Ok(Some(JoinSource::Synthesized {
                    table: table.clone(),
                })),
                None => Ok(None),
            },
            _ => Err(EngineError::AmbiguousJoinTable {
                left: pair.left_name().to_string(),
                right: pair.right_name().to_string(),
                candidates: pair.names(&candidates),
            }),
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// A declared many-to-many pair
#[derive(Debug, Clone, Default)]
pub struct PairDecl {
    /// `through` references from either side
    pub through: BTreeSet<String>,
}

/// Resolve every many-to-many pair of the supplied models
pub fn resolve(models: &[ModelDescriptor], overrides: &[String]) -> EngineResult<Resolution> {
    check_targets(models)?;

    let mut candidates: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
    for index in 0..models.len() {
        if let Some(key) = join_shape(models, index)? {
            candidates.entry(key).or_default().push(index);
        }
    }
    debug!(
        models = models.len(),
        candidates = candidates.values().map(Vec::len).sum::<usize>(),
        "partitioned models"
    );

    let pairs = declared_pairs(models)?;
    debug!(pairs = pairs.len(), "collected many-to-many pairs");

    let explicit = ExplicitOverride::new(models, overrides, &pairs)?;
    let strategies: [&dyn JoinTableStrategy; 2] = [&explicit, &AutoDetect];

    let mut joins = Vec::with_capacity(pairs.len());
    for (&(left, right), decl) in &pairs {
        let pair = PairContext {
            models,
            left,
            right,
            candidates: candidates.get(&(left, right)).cloned().unwrap_or_default(),
            through: decl.through.clone(),
        };

        let mut resolved = None;
        for strategy in strategies {
            if let Some(source) = strategy.resolve(&pair)? {
                resolved = Some((strategy.name(), source));
                break;
            }
        }

        let Some((strategy, source)) = resolved else {
            return Err(EngineError::unresolved(
                pair.left_name(),
                pair.right_name(),
                "no join table connects the pair and no 'through' table is named",
            ));
        };

        debug!(
            left = pair.left_name(),
            right = pair.right_name(),
            strategy,
            source = ?source,
            "resolved join table"
        );

        joins.push(ResolvedJoin {
            left,
            right,
            source,
            strategy,
        });
    }

    let resolution = Resolution { joins };

    if let Some(unused) = explicit.models().find(|&i| !resolution.is_adopted(i)) {
        return Err(EngineError::invalid_override(
            &models[unused].name,
            "override was not used by any many-to-many pair",
        ));
    }

    Ok(resolution)
}

/// Find a supplied model by model name, then by table name
pub fn find_model(models: &[ModelDescriptor], name: &str) -> Option<usize> {
    models
        .iter()
        .position(|m| m.name == name)
        .or_else(|| models.iter().position(|m| m.answers_to(name)))
}

/// Order two supply indices by model name
fn pair_key(models: &[ModelDescriptor], a: usize, b: usize) -> (usize, usize) {
    if models[a].name <= models[b].name {
        (a, b)
    } else {
        (b, a)
    }
}

/// Every relation must target a supplied model
fn check_targets(models: &[ModelDescriptor]) -> EngineResult<()> {
    for model in models {
        for relation in &model.relations {
            if find_model(models, &relation.target).is_none() {
                return Err(EngineError::unresolved(
                    &model.name,
                    &relation.target,
                    format!(
                        "relation '{}' targets a model that was not supplied",
                        relation.name
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// The pair a model connects if it is shaped like a join table
fn join_shape(models: &[ModelDescriptor], index: usize) -> EngineResult<Option<(usize, usize)>> {
    let model = &models[index];
    if model.relations.is_empty() || model.relations.iter().any(|r| !r.is_belongs_to()) {
        return Ok(None);
    }

    let mut targets = BTreeSet::new();
    for target in model.belongs_to_targets() {
        let target_index = find_model(models, target)
            .ok_or_else(|| EngineError::unresolved(&model.name, target, "model was not supplied"))?;
        if target_index == index {
            return Ok(None);
        }
        targets.insert(target_index);
    }

    let targets: Vec<usize> = targets.into_iter().collect();
    match targets.as_slice() {
        [a, b] => Ok(Some(pair_key(models, *a, *b))),
        _ => Ok(None),
    }
}

/// Collect every unordered many-to-many pair
fn declared_pairs(models: &[ModelDescriptor]) -> EngineResult<BTreeMap<(usize, usize), PairDecl>> {
    let mut pairs: BTreeMap<(usize, usize), PairDecl> = BTreeMap::new();

    for (index, model) in models.iter().enumerate() {
        for relation in model.relations.iter().filter(|r| r.is_many_to_many()) {
            let target = find_model(models, &relation.target).ok_or_else(|| {
                EngineError::unresolved(&model.name, &relation.target, "model was not supplied")
            })?;

            if target == index {
                return Err(EngineError::unresolved(
                    &model.name,
                    &relation.target,
                    format!(
                        "many-to-many relation '{}' refers back to its own model",
                        relation.name
                    ),
                ));
            }

            let decl = pairs.entry(pair_key(models, index, target)).or_default();
            if let Some(through) = &relation.through {
                // a model name and its table name are the same reference
                let canonical = find_model(models, through)
                    .map(|i| models[i].name.clone())
                    .unwrap_or_else(|| through.clone());
                decl.through.insert(canonical);
            }
        }
    }

    Ok(pairs)
}

// ============================================================================
// Tests
// ============================================================================
