//! Eager loading of a parent and two child lists in one query.
//!
//! The query joins the parent to both child tables with `LEFT JOIN`, aliasing
//! every column by table prefix so identically named columns (`id`) do not
//! collide:
//!
//! ```text
//! SELECT p.id AS p_id, ..., c.id AS c_id, ..., pr.id AS pr_id, ...
//! FROM patients p
//! LEFT JOIN checkups c ON c.patient_id = p.id
//! LEFT JOIN prescriptions pr ON pr.patient_id = p.id
//! WHERE p.id = 4;
//! ```
//!
//! Two independent one-to-many joins fan out: a parent with 2 checkups and
//! 3 prescriptions yields 6 rows. [`fold_joined_rows`] collapses them again,
//! keeping each child once by primary key.

use super::Related;
use crate::error::BuoyError;
use crate::executor::Executor;
use crate::mapper::{alias, map_aliased};
use crate::model::Entity;
use crate::query::format_value;
use crate::schema::{table_of, TableDescriptor};
use crate::value::{Row, Value};

pub const PARENT_ALIAS: &str = "p";
pub const FIRST_CHILD_ALIAS: &str = "c";
pub const SECOND_CHILD_ALIAS: &str = "pr";

/// Build the aliased three-table join for parent key `id`.
///
/// `fk1` / `fk2` are the foreign-key columns on the first and second child
/// tables referencing the parent's primary key.
pub fn eager_join_sql<P, C1, C2>(id: &Value, fk1: &str, fk2: &str) -> Result<String, BuoyError>
where
    P: Entity,
    C1: Entity,
    C2: Entity,
{
    let parent = table_of::<P>()?;
    let first = table_of::<C1>()?;
    let second = table_of::<C2>()?;
    let pk = parent.require_primary_key()?;
    require_column(&first, fk1)?;
    require_column(&second, fk2)?;

    let projection: Vec<String> = [
        (&parent, PARENT_ALIAS),
        (&first, FIRST_CHILD_ALIAS),
        (&second, SECOND_CHILD_ALIAS),
    ]
    .iter()
    .flat_map(|(table, prefix)| {
        table
            .columns()
            .iter()
            .map(move |column| {
                format!("{prefix}.{0} AS {1}", column.name(), alias(prefix, column.name()))
            })
    })
    .collect();

    Ok(format!(
        "SELECT {projection} FROM {parent} {p} \
         LEFT JOIN {first} {c} ON {c}.{fk1} = {p}.{pk} \
         LEFT JOIN {second} {pr} ON {pr}.{fk2} = {p}.{pk} \
         WHERE {p}.{pk} = {id};",
        projection = projection.join(", "),
        parent = parent.name(),
        first = first.name(),
        second = second.name(),
        p = PARENT_ALIAS,
        c = FIRST_CHILD_ALIAS,
        pr = SECOND_CHILD_ALIAS,
        pk = pk.name(),
        id = format_value(id),
    ))
}

/// Rebuild the parent tree from joined rows, in the order returned.
///
/// The parent comes from the first row only. A child whose prefixed key is
/// null in a row is absent on that row. Children are appended only when no
/// entry with an equal key is already in the list. No rows → `None`.
pub fn fold_joined_rows<P, C1, C2>(rows: &[Row]) -> Result<Option<P>, BuoyError>
where
    P: Related<C1> + Related<C2>,
    C1: Entity,
    C2: Entity,
{
    let Some(first_row) = rows.first() else {
        return Ok(None);
    };
    let Some(mut parent) = map_aliased::<P>(first_row, PARENT_ALIAS)? else {
        return Ok(None);
    };

    let first_pk = table_of::<C1>()?.require_primary_key()?.name().to_string();
    let second_pk = table_of::<C2>()?.require_primary_key()?.name().to_string();

    for row in rows {
        if let Some(child) = map_aliased::<C1>(row, FIRST_CHILD_ALIAS)? {
            push_distinct(<P as Related<C1>>::related_mut(&mut parent), child, &first_pk);
        }
        if let Some(child) = map_aliased::<C2>(row, SECOND_CHILD_ALIAS)? {
            push_distinct(<P as Related<C2>>::related_mut(&mut parent), child, &second_pk);
        }
    }

    Ok(Some(parent))
}

/// Run [`eager_join_sql`] on `executor` and fold the result
pub fn load_eager_joined<P, C1, C2>(
    executor: &impl Executor,
    id: &Value,
    fk1: &str,
    fk2: &str,
) -> Result<Option<P>, BuoyError>
where
    P: Related<C1> + Related<C2>,
    C1: Entity,
    C2: Entity,
{
    let sql = eager_join_sql::<P, C1, C2>(id, fk1, fk2)?;
    log::debug!("Eager join: {sql}");
    let rows = executor.query_all(&sql)?;
    fold_joined_rows::<P, C1, C2>(&rows)
}

fn push_distinct<C: Entity>(list: &mut Vec<C>, child: C, pk: &str) {
    let key = child.get(pk);
    if !list.iter().any(|existing| existing.get(pk) == key) {
        list.push(child);
    }
}

fn require_column(table: &TableDescriptor, column: &str) -> Result<(), BuoyError> {
    match table.column(column) {
        Some(_) => Ok(()),
        None => Err(BuoyError::unknown_column(table.name(), column)),
    }
}
