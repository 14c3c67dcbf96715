//! Display order of authorized users.
//!
//! The order is a list of user ids stored next to the credentials in the
//! whole-document backends. Users missing from it are listed after the ordered ones.

use std::collections::BTreeMap;

use crate::model::credential::CredentialRecord;

/// Document key holding the roster order.
pub const ROSTER_ORDER_KEY: &str = "_roster_order";

/// Moves `user_id` to the 1-based `position`, adding it if absent.
///
/// A position past the end places the user last.
pub fn move_to_position(order: &mut Vec<String>, user_id: &str, position: usize) {
    order.retain(|id| id != user_id);
    let index = position.saturating_sub(1).min(order.len());
    order.insert(index, user_id.to_string());
}

/// Records in roster order, followed by unordered users by id.
///
/// Ids in `order` without a record are skipped.
pub fn arrange(
    order: &[String],
    mut records: BTreeMap<String, CredentialRecord>,
) -> Vec<CredentialRecord> {
    let mut arranged: Vec<CredentialRecord> =
        order.iter().filter_map(|id| records.remove(id)).collect();
    arranged.extend(records.into_values());
    arranged
}
