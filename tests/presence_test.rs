use voice_relay::core::presence::PresenceTable;

#[tokio::test]
async fn test_membership_reflects_net_effect() {
    let table = PresenceTable::new();

    table.join("c1", "s1").await;
    table.leave("c1", "s1").await;
    table.join("c1", "s1").await;
    assert_eq!(table.members_of("c1").await, vec!["s1".to_string()]);

    table.join("c1", "s1").await;
    table.leave("c1", "s1").await;
    assert!(table.members_of("c1").await.is_empty());
}

#[tokio::test]
async fn test_members_of_unknown_channel_is_empty_not_error() {
    let table = PresenceTable::new();
    assert!(table.members_of("never-created").await.is_empty());
}

#[tokio::test]
async fn test_empty_channel_entries_are_deleted() {
    let table = PresenceTable::new();

    table.join("c1", "s1").await;
    table.join("c2", "s1").await;
    assert_eq!(table.channel_count().await, 2);

    table.leave("c1", "s1").await;
    assert_eq!(table.channel_count().await, 1);

    table.remove_connection_everywhere("s1").await;
    assert_eq!(table.channel_count().await, 0);
}

#[tokio::test]
async fn test_remove_everywhere_returns_affected_channels_once() {
    let table = PresenceTable::new();
    table.join("c1", "s1").await;
    table.join("c2", "s1").await;
    table.join("c3", "s2").await;

    let mut affected = table.remove_connection_everywhere("s1").await;
    affected.sort();
    assert_eq!(affected, vec!["c1".to_string(), "c2".to_string()]);

    // Idempotent: a second call finds nothing to remove
    assert!(table.remove_connection_everywhere("s1").await.is_empty());

    // Unrelated channel untouched
    assert_eq!(table.members_of("c3").await, vec!["s2".to_string()]);
}

#[tokio::test]
async fn test_leave_for_absent_member_reports_no_removal() {
    let table = PresenceTable::new();
    table.join("c1", "s1").await;

    assert!(!table.leave("c1", "s2").await);
    assert!(!table.leave("c9", "s1").await);
    assert_eq!(table.members_of("c1").await, vec!["s1".to_string()]);
}
