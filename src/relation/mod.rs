//! Navigational relationships between entities
//!
//! A parent exposes each child list through [`Related`]. Child lists are not
//! columns; they are filled by one of two loaders:
//!
//! - [`lazy`]: parent by key, then one filtered query per child type
//! - [`eager`]: a single three-table `LEFT JOIN` folded back into a tree

pub mod eager;
pub mod lazy;

#[doc(inline)]
pub use eager::{eager_join_sql, fold_joined_rows, load_eager_joined};
#[doc(inline)]
pub use lazy::load_with_details;

use crate::model::Entity;

/// Parent-side access to the list of `C` children
pub trait Related<C: Entity>: Entity {
    fn related(&self) -> &[C];

    fn related_mut(&mut self) -> &mut Vec<C>;
}
