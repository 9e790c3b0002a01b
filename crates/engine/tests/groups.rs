use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, EngineError, MembershipRole};
use migration::MigratorTrait;

async fn engine_with_users() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for (username, email) in [
        ("alice", "alice@example.com"),
        ("bob", "bob@example.com"),
        ("carol", "carol@example.com"),
    ] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password, email) VALUES (?, ?, ?)",
            vec![username.into(), "password".into(), email.into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

#[tokio::test]
async fn new_group_creates_exactly_one_admin_membership() {
    let (engine, _db) = engine_with_users().await;

    let group_id = engine
        .new_group("Nightshift", "ns@example.com", "alice")
        .await
        .unwrap();

    let members = engine.list_group_members(&group_id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].0.username, "alice");
    assert_eq!(members[0].1, MembershipRole::Admin);

    let role = engine.membership_role(&group_id, "alice").await.unwrap();
    assert_eq!(role, Some(MembershipRole::Admin));
}

#[tokio::test]
async fn new_group_rejects_blank_fields() {
    let (engine, _db) = engine_with_users().await;

    let err = engine
        .new_group("   ", "ns@example.com", "alice")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidName("group name must not be empty".to_string())
    );

    let err = engine.new_group("Nightshift", "", "alice").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidName("group email must not be empty".to_string())
    );
}

#[tokio::test]
async fn new_group_requires_known_creator() {
    let (engine, _db) = engine_with_users().await;

    let err = engine
        .new_group("Nightshift", "ns@example.com", "mallory")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("user not exists".to_string()));
}

#[tokio::test]
async fn membership_roles_follow_who_added_whom() {
    let (engine, _db) = engine_with_users().await;

    let group_id = engine
        .new_group("Nightshift", "ns@example.com", "alice")
        .await
        .unwrap();
    assert_eq!(
        engine.membership_role(&group_id, "alice").await.unwrap(),
        Some(MembershipRole::Admin)
    );

    engine.add_member(&group_id, "bob", "alice").await.unwrap();
    assert_eq!(
        engine.membership_role(&group_id, "bob").await.unwrap(),
        Some(MembershipRole::User)
    );

    // Plain members must not be able to add members.
    let err = engine
        .add_member(&group_id, "carol", "bob")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Forbidden("admin role required".to_string())
    );
    assert_eq!(engine.membership_role(&group_id, "carol").await.unwrap(), None);
}

#[tokio::test]
async fn duplicate_membership_is_a_conflict() {
    let (engine, _db) = engine_with_users().await;

    let group_id = engine
        .new_group("Nightshift", "ns@example.com", "alice")
        .await
        .unwrap();
    engine.add_member(&group_id, "bob", "alice").await.unwrap();

    let err = engine.add_member(&group_id, "bob", "alice").await.unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("bob".to_string()));

    let members = engine.list_group_members(&group_id).await.unwrap();
    assert_eq!(members.len(), 2);
}

#[tokio::test]
async fn add_member_checks_group_and_user_existence() {
    let (engine, _db) = engine_with_users().await;

    let err = engine
        .add_member("no-such-group", "bob", "alice")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("group not exists".to_string()));

    let group_id = engine
        .new_group("Nightshift", "ns@example.com", "alice")
        .await
        .unwrap();
    let err = engine
        .add_member(&group_id, "mallory", "alice")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("user not exists".to_string()));
}

#[tokio::test]
async fn list_groups_for_user_includes_role() {
    let (engine, _db) = engine_with_users().await;

    let first = engine
        .new_group("Nightshift", "ns@example.com", "alice")
        .await
        .unwrap();
    engine
        .new_group("Dayshift", "ds@example.com", "alice")
        .await
        .unwrap();
    engine.add_member(&first, "bob", "alice").await.unwrap();

    let groups = engine.list_groups_for_user("alice").await.unwrap();
    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|(_, role)| *role == MembershipRole::Admin));

    let groups = engine.list_groups_for_user("bob").await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].0.id, first);
    assert_eq!(groups[0].1, MembershipRole::User);
}

#[tokio::test]
async fn user_lookup_by_email_treats_absence_as_none() {
    let (engine, _db) = engine_with_users().await;

    let user = engine.user_by_email("bob@example.com").await.unwrap();
    assert_eq!(user.unwrap().username, "bob");

    let user = engine.user_by_email("nobody@example.com").await.unwrap();
    assert!(user.is_none());
}

#[tokio::test]
async fn update_user_changes_profile_and_rejects_taken_email() {
    let (engine, _db) = engine_with_users().await;

    engine
        .update_user("alice", Some("Alice A."), "alice.a@example.com")
        .await
        .unwrap();

    let user = engine
        .user_by_email("alice.a@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.name.as_deref(), Some("Alice A."));

    let err = engine
        .update_user("alice", None, "bob@example.com")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("bob@example.com".to_string()));
}
