//! # Schema Assembler
//!
//! Turns descriptors plus a [`Resolution`] into a [`DerivedSchema`]:
//! one table per descriptor, one per synthesized join table, ordered so
//! that every referenced table comes first.

use crate::config::TableOrdering;
use crate::resolver::{Resolution, ResolvedJoin};
use crate::schema::{DerivedSchema, ForeignKey, Table, UniqueConstraint};
use schemaloader_core::{EngineError, EngineResult};
use schemaloader_ir::{Column, ModelDescriptor, Relation, naming};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Assemble and order the tables of the schema
pub fn assemble(
    models: &[ModelDescriptor],
    resolution: &Resolution,
    ordering: TableOrdering,
) -> EngineResult<DerivedSchema> {
    let mut tables = Vec::with_capacity(models.len() + resolution.joins.len());

    for (index, model) in models.iter().enumerate() {
        let mut table = entity_table(models, model)?;
        if let Some(join) = resolution.adopting(index) {
            adopt_join(&mut table, models, model, join)?;
        }
        tables.push(table);
    }

    for (join, name) in resolution.synthesized() {
        tables.push(synthesized_table(models, join, name)?);
    }

    let mut seen = HashSet::new();
    for table in &tables {
        if !seen.insert(table.name.as_str()) {
            return Err(EngineError::DuplicateTable(table.name.clone()));
        }
    }

    let tables = order_tables(tables, ordering)?;
    debug!(
        ordering = ?ordering,
        tables = ?tables.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        "ordered tables"
    );

    DerivedSchema::new(tables)
}

// ============================================================================
// Table construction
// ============================================================================

fn entity_table(models: &[ModelDescriptor], model: &ModelDescriptor) -> EngineResult<Table> {
    let mut foreign_keys = Vec::new();
    for relation in model.relations.iter().filter(|r| r.is_belongs_to()) {
        foreign_keys.push(foreign_key(models, model, relation)?);
    }

    let mut uniques: Vec<UniqueConstraint> = model
        .columns
        .iter()
        .filter(|c| c.unique && !c.primary_key)
        .map(|c| UniqueConstraint {
            columns: vec![c.name.clone()],
        })
        .collect();
    uniques.extend(model.unique_groups.iter().map(|group| UniqueConstraint {
        columns: group.clone(),
    }));

    Ok(Table {
        name: model.table_name.clone(),
        model: model.name.clone(),
        columns: model.columns.clone(),
        primary_key: model.primary_key(),
        foreign_keys,
        uniques,
        joins: None,
        source: model.source.clone(),
    })
}

fn foreign_key(
    models: &[ModelDescriptor],
    model: &ModelDescriptor,
    relation: &Relation,
) -> EngineResult<ForeignKey> {
    let target = lookup(models, model, &relation.target)?;

    let columns = relation.local_columns();
    if let Some(missing) = columns.iter().find(|c| !model.has_column(c)) {
        return Err(EngineError::extraction(
            &model.name,
            format!(
                "relation '{}' uses column '{missing}' which the model does not declare",
                relation.name
            ),
        ));
    }

    let ref_columns = if relation.references.is_empty() {
        target.primary_key()
    } else {
        relation.references.clone()
    };

    if ref_columns.is_empty() {
        return Err(EngineError::unresolved(
            &model.name,
            &target.name,
            "target has no primary key to reference",
        ));
    }

    if let Some(missing) = ref_columns.iter().find(|c| !target.has_column(c)) {
        return Err(EngineError::extraction(
            &model.name,
            format!(
                "relation '{}' references '{}.{missing}' which does not exist",
                relation.name, target.name
            ),
        ));
    }

    if ref_columns.len() != columns.len() {
        return Err(EngineError::unresolved(
            &model.name,
            &target.name,
            format!(
                "relation '{}' maps {} columns onto {} referenced columns",
                relation.name,
                columns.len(),
                ref_columns.len()
            ),
        ));
    }

    Ok(ForeignKey {
        columns,
        ref_table: target.table_name.clone(),
        ref_columns,
        on_delete: relation.on_delete,
        on_update: relation.on_update,
    })
}

/// Mark an adopted descriptor as a join table; give it a composite primary
/// key over its foreign key columns when it declares none
fn adopt_join(
    table: &mut Table,
    models: &[ModelDescriptor],
    model: &ModelDescriptor,
    join: &ResolvedJoin,
) -> EngineResult<()> {
    let left = &models[join.left];
    let right = &models[join.right];
    table.joins = Some((left.table_name.clone(), right.table_name.clone()));

    if !table.primary_key.is_empty() {
        return Ok(());
    }

    let mut key: Vec<String> = Vec::new();
    for relation in model.relations.iter().filter(|r| r.is_belongs_to()) {
        for column in relation.local_columns() {
            if !key.contains(&column) {
                key.push(column);
            }
        }
    }

    for column in table.columns.iter_mut().filter(|c| key.contains(&c.name)) {
        column.nullable = false;
        column.primary_key = true;
    }

    // primary key follows column order
    table.primary_key = table
        .columns
        .iter()
        .filter(|c| c.primary_key)
        .map(|c| c.name.clone())
        .collect();

    Ok(())
}

fn synthesized_table(
    models: &[ModelDescriptor],
    join: &ResolvedJoin,
    name: &str,
) -> EngineResult<Table> {
    let mut columns = Vec::with_capacity(2);
    let mut foreign_keys = Vec::with_capacity(2);

    for side in [&models[join.left], &models[join.right]] {
        let pk = side.primary_key();
        let [pk_name] = pk.as_slice() else {
            return Err(EngineError::unresolved(
                name,
                &side.name,
                "a generated join table needs a single-column primary key on both sides",
            ));
        };

        let pk_type = side
            .column(pk_name)
            .map(|c| c.data_type.clone())
            .ok_or_else(|| EngineError::internal(format!("primary key '{pk_name}' vanished")))?;

        let column = naming::fk_column_name(&side.name);
        if columns.iter().any(|c: &Column| c.name == column) {
            return Err(EngineError::unresolved(
                name,
                &side.name,
                format!("both sides of the generated join table map to column '{column}'"),
            ));
        }
        columns.push(Column::new(column.clone(), pk_type).primary_key());
        foreign_keys.push(ForeignKey {
            columns: vec![column],
            ref_table: side.table_name.clone(),
            ref_columns: vec![pk_name.clone()],
            on_delete: None,
            on_update: None,
        });
    }

    Ok(Table {
        name: name.to_string(),
        model: name.to_string(),
        primary_key: columns.iter().map(|c| c.name.clone()).collect(),
        columns,
        foreign_keys,
        uniques: Vec::new(),
        joins: Some((
            models[join.left].table_name.clone(),
            models[join.right].table_name.clone(),
        )),
        source: None,
    })
}

fn lookup<'a>(
    models: &'a [ModelDescriptor],
    model: &ModelDescriptor,
    target: &str,
) -> EngineResult<&'a ModelDescriptor> {
    crate::resolver::find_model(models, target)
        .map(|i| &models[i])
        .ok_or_else(|| EngineError::unresolved(&model.name, target, "model was not supplied"))
}

// ============================================================================
// Ordering
// ============================================================================

/// Kahn's algorithm; among ready tables the lowest tie-break rank goes first
fn order_tables(tables: Vec<Table>, ordering: TableOrdering) -> EngineResult<Vec<Table>> {
    let n = tables.len();

    // Supply order is the construction order: descriptors, then synthesized
    let mut rank: Vec<usize> = (0..n).collect();
    if ordering == TableOrdering::Name {
        let mut by_name: Vec<usize> = (0..n).collect();
        by_name.sort_by(|&a, &b| tables[a].name.cmp(&tables[b].name));
        for (position, index) in by_name.into_iter().enumerate() {
            rank[index] = position;
        }
    }

    let index_of: HashMap<&str, usize> = tables
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, table) in tables.iter().enumerate() {
        let deps: BTreeSet<usize> = table
            .dependencies()
            .filter_map(|name| index_of.get(name).copied())
            .collect();
        for dep in deps {
            dependents[dep].push(i);
            in_degree[i] += 1;
        }
    }

    let mut ready: BTreeSet<(usize, usize)> = (0..n)
        .filter(|&i| in_degree[i] == 0)
        .map(|i| (rank[i], i))
        .collect();
    let mut sorted: Vec<usize> = Vec::with_capacity(n);

    while let Some((_, node)) = ready.pop_first() {
        sorted.push(node);
        for &next in &dependents[node] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.insert((rank[next], next));
            }
        }
    }

    if sorted.len() < n {
        let placed: HashSet<usize> = sorted.iter().copied().collect();
        let mut leftover: Vec<String> = (0..n)
            .filter(|i| !placed.contains(i))
            .map(|i| tables[i].name.clone())
            .collect();
        leftover.sort();
        return Err(EngineError::CyclicSchema { tables: leftover });
    }

    let mut slots: Vec<Option<Table>> = tables.into_iter().map(Some).collect();
    Ok(sorted
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect())
}

// ============================================================================
// Tests
// ============================================================================
