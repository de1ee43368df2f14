//! # Action Merge
//!
//! Folds the speculative actions of a drag into one equivalent action.
//!
//! The first action fixes the source (component type for an insert, source
//! zone and index for a move); every later move only updates the running
//! destination. Applying the merged action yields the same document as
//! replaying the whole sequence.

use crate::actions::Action;
use thiserror::Error;
use tracing::warn;
use zonecraft_document::PLACEHOLDER_PROP;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("Insert at position {position} must be the first speculative action")]
    InsertNotFirst { position: usize },
}

/// Collapse `actions` into one; `Ok(None)` when there is nothing to merge
pub fn merge_actions(actions: &[Action]) -> Result<Option<Action>, MergeError> {
    let mut merged: Option<Action> = None;

    for (position, action) in actions.iter().enumerate() {
        match action {
            Action::Insert { .. } => {
                if merged.is_some() || position > 0 {
                    return Err(MergeError::InsertNotFirst { position });
                }
                merged = Some(strip_placeholder(action.clone()));
            }

            Action::Move {
                destination_zone,
                destination_index,
                ..
            } => {
                merged = Some(match merged.take() {
                    Some(acc) => acc.with_destination(destination_zone.clone(), *destination_index),
                    None => action.clone(),
                });
            }

            other => {
                warn!(action = other.kind(), position, "Skipping action that cannot be merged");
            }
        }
    }

    Ok(merged)
}

fn strip_placeholder(action: Action) -> Action {
    match action {
        Action::Insert {
            component_type,
            destination_zone,
            destination_index,
            props,
            id,
        } => Action::Insert {
            component_type,
            destination_zone,
            destination_index,
            props: props.map(|mut props| {
                props.remove(PLACEHOLDER_PROP);
                props
            }),
            id,
        },
        other => other,
    }
}
