//! Navigational loading: parent by key, then its children by foreign key.
//!
//! Two plain queries instead of one join, so no fan-out handling is needed.

use super::Related;
use crate::error::BuoyError;
use crate::executor::Executor;
use crate::mapper::map_rows;
use crate::model::Entity;
use crate::query::{select_by_column_sql, select_by_key_sql};
use crate::value::Value;

/// Load parent `id` and fill its `C` list from rows where `fk` equals `id`.
///
/// Returns `None` (and skips the child query) when the parent does not exist.
pub fn load_with_details<P, C>(
    executor: &impl Executor,
    id: &Value,
    fk: &str,
) -> Result<Option<P>, BuoyError>
where
    P: Related<C>,
    C: Entity,
{
    let parent_sql = select_by_key_sql::<P>(id)?;
    log::debug!("Loading parent: {parent_sql}");
    let rows = executor.query_all(&parent_sql)?;
    let Some(mut parent) = map_rows::<P>(&rows)?.into_iter().next() else {
        return Ok(None);
    };

    let child_sql = select_by_column_sql::<C>(fk, id)?;
    log::debug!("Loading details: {child_sql}");
    *parent.related_mut() = map_rows::<C>(&executor.query_all(&child_sql)?)?;

    Ok(Some(parent))
}
