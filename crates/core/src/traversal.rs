//! Sequential navigation over media items.
//!
//! Both lookups are keyed purely on id order and do not depend on the order
//! of the input slice. Neither holds a cursor: calling them again on
//! unchanged data returns the same item.

use crate::annotation::{Annotated, AnnotationStatus};
use crate::types::DbId;

/// First pending item with an id strictly greater than `current_id`.
///
/// A `current_id` of zero (or below) starts from the beginning.
pub fn next_unannotated<'a, T, I>(items: I, current_id: DbId) -> Option<&'a T>
where
    T: Annotated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let floor = current_id.max(0);
    items
        .into_iter()
        .filter(|item| item.id() > floor && item.status() == AnnotationStatus::Pending)
        .min_by_key(|item| item.id())
}

/// Item with the largest id strictly less than `current_id`, regardless of
/// its annotation status.
pub fn previous<'a, T, I>(items: I, current_id: DbId) -> Option<&'a T>
where
    T: Annotated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .filter(|item| item.id() < current_id)
        .max_by_key(|item| item.id())
}
