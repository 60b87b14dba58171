use serde_json::Value;

use super::types::{
    AlertChange,
    ChangeKind,
};

fn unread(row: Option<&Value>) -> Option<bool> {
    row?.get("is_read")?.as_bool().map(|is_read| !is_read)
}

/// New unread count after `change`.
///
/// Rows whose read state is not carried in the payload leave the count
/// untouched; the next reseed from the database corrects it.
pub fn apply_change(count: usize, change: &AlertChange) -> usize {
    let now = unread(change.record.as_ref());
    let before = unread(change.old_record.as_ref());

    match change.kind {
        ChangeKind::Insert if now == Some(true) => count + 1,
        ChangeKind::Update => match (before, now) {
            (Some(true), Some(false)) => count.saturating_sub(1),
            (Some(false), Some(true)) => count + 1,
            _ => count,
        },
        ChangeKind::Delete if before == Some(true) => count.saturating_sub(1),
        _ => count,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn change(kind: ChangeKind, record: Option<Value>, old_record: Option<Value>) -> AlertChange {
        AlertChange { kind, record, old_record }
    }

    #[test]
    fn test_insert() {
        let unread = change(ChangeKind::Insert, Some(json!({ "is_read": false })), None);
        let read = change(ChangeKind::Insert, Some(json!({ "is_read": true })), None);

        assert_eq!(apply_change(2, &unread), 3);
        assert_eq!(apply_change(2, &read), 2);
    }

    #[test]
    fn test_update_transitions() {
        let mark_read = change(
            ChangeKind::Update,
            Some(json!({ "is_read": true })),
            Some(json!({ "is_read": false })),
        );
        let mark_unread = change(
            ChangeKind::Update,
            Some(json!({ "is_read": false })),
            Some(json!({ "is_read": true })),
        );
        let edit_title = change(
            ChangeKind::Update,
            Some(json!({ "is_read": false, "title": "new" })),
            Some(json!({ "is_read": false })),
        );

        assert_eq!(apply_change(2, &mark_read), 1);
        assert_eq!(apply_change(2, &mark_unread), 3);
        assert_eq!(apply_change(2, &edit_title), 2);
    }

    #[test]
    fn test_delete_saturates() {
        let delete_unread = change(ChangeKind::Delete, None, Some(json!({ "is_read": false })));
        let delete_read = change(ChangeKind::Delete, None, Some(json!({ "is_read": true })));

        assert_eq!(apply_change(1, &delete_unread), 0);
        assert_eq!(apply_change(0, &delete_unread), 0);
        assert_eq!(apply_change(1, &delete_read), 1);
    }

    #[test]
    fn test_missing_old_state_keeps_count() {
        let update = change(ChangeKind::Update, Some(json!({ "is_read": true })), Some(json!({ "id": "a1" })));
        let delete = change(ChangeKind::Delete, None, Some(json!({ "id": "a1" })));

        assert_eq!(apply_change(4, &update), 4);
        assert_eq!(apply_change(4, &delete), 4);
    }
}
