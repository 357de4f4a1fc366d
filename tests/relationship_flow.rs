use ensemble::application_impl::RealRelationshipService;
use ensemble::application_port::{RelationError, RelationshipService, RespondOutcome};
use ensemble::domain_model::{
    Relationship, RelationshipStatus, RequestDirection, UserId, UserPair,
};
use ensemble::domain_port::{RelationshipRepo, TxManager, UserRepo};
use ensemble::infra_memory::{MemoryDb, MemoryRelationshipRepo, MemoryTxManager, MemoryUserRepo};
use futures_util::future::join_all;
use std::sync::Arc;

async fn seed_user(db: &Arc<MemoryDb>, username: &str) -> UserId {
    let repo = MemoryUserRepo::new(db.clone());
    let tx_manager = MemoryTxManager;
    let mut tx = tx_manager.begin().await.unwrap();
    let id = repo.create_in_tx(tx.as_mut(), username).await.unwrap();
    tx.commit().await.unwrap();
    id
}

fn service(db: &Arc<MemoryDb>) -> RealRelationshipService {
    RealRelationshipService::new(
        Arc::new(MemoryUserRepo::new(db.clone())),
        Arc::new(MemoryRelationshipRepo::new(db.clone())),
    )
}

fn transitioned(outcome: RespondOutcome) -> Relationship {
    match outcome {
        RespondOutcome::Transitioned(rel) => rel,
        RespondOutcome::Removed => panic!("expected a surviving relationship row"),
    }
}

#[tokio::test]
async fn duplicate_request_is_rejected_in_either_order() {
    let db = Arc::new(MemoryDb::new());
    let ariadne = seed_user(&db, "ariadne").await;
    let benedict = seed_user(&db, "benedict").await;
    let svc = service(&db);

    let rel = svc.send_request(ariadne, benedict).await.unwrap();
    assert_eq!(rel.status, RelationshipStatus::Pending);
    assert_eq!(rel.action_user_id, ariadne);

    assert!(matches!(
        svc.send_request(ariadne, benedict).await,
        Err(RelationError::DuplicateRelationship)
    ));
    assert!(matches!(
        svc.send_request(benedict, ariadne).await,
        Err(RelationError::DuplicateRelationship)
    ));
}

#[tokio::test]
async fn accept_makes_friends_on_both_sides() {
    let db = Arc::new(MemoryDb::new());
    let ariadne = seed_user(&db, "ariadne").await;
    let benedict = seed_user(&db, "benedict").await;
    let svc = service(&db);

    svc.send_request(ariadne, benedict).await.unwrap();
    let rel = transitioned(svc.respond(benedict, ariadne, "accept").await.unwrap());
    assert_eq!(rel.status, RelationshipStatus::Friend);
    assert_eq!(rel.action_user_id, benedict, "accepting side is recorded");

    let ariadne_friends = svc.list_friends(ariadne).await.unwrap();
    assert_eq!(ariadne_friends.len(), 1);
    assert_eq!(ariadne_friends[0].user_id, benedict);
    assert_eq!(ariadne_friends[0].username, "benedict");

    let benedict_friends = svc.list_friends(benedict).await.unwrap();
    assert_eq!(benedict_friends.len(), 1);
    assert_eq!(benedict_friends[0].user_id, ariadne);
    assert_eq!(benedict_friends[0].username, "ariadne");
}

#[tokio::test]
async fn friendless_user_gets_an_empty_list_not_an_error() {
    let db = Arc::new(MemoryDb::new());
    let cordelia = seed_user(&db, "cordelia").await;
    let svc = service(&db);

    assert!(svc.list_friends(cordelia).await.unwrap().is_empty());
    assert!(svc.list_pending(cordelia).await.unwrap().is_empty());
}

#[tokio::test]
async fn responding_without_a_row_is_not_found_for_every_action() {
    let db = Arc::new(MemoryDb::new());
    let ariadne = seed_user(&db, "ariadne").await;
    let benedict = seed_user(&db, "benedict").await;
    let svc = service(&db);

    for action in ["accept", "reject", "cancel", "block"] {
        assert!(
            matches!(
                svc.respond(benedict, ariadne, action).await,
                Err(RelationError::RelationshipNotFound)
            ),
            "action {action} should report a missing relationship"
        );
    }
}

#[tokio::test]
async fn reject_can_be_repeated_without_error() {
    let db = Arc::new(MemoryDb::new());
    let ariadne = seed_user(&db, "ariadne").await;
    let benedict = seed_user(&db, "benedict").await;
    let svc = service(&db);

    svc.send_request(ariadne, benedict).await.unwrap();

    let first = transitioned(svc.respond(benedict, ariadne, "reject").await.unwrap());
    assert_eq!(first.status, RelationshipStatus::Rejected);

    let second = transitioned(svc.respond(benedict, ariadne, "reject").await.unwrap());
    assert_eq!(second.status, RelationshipStatus::Rejected);
    assert_eq!(second.action_user_id, benedict);
}

#[tokio::test]
async fn users_one_and_two_walk_the_request_flow() {
    let db = Arc::new(MemoryDb::new());
    let first = seed_user(&db, "first_user").await;
    let second = seed_user(&db, "second_user").await;
    assert_eq!(first, UserId(1));
    assert_eq!(second, UserId(2));
    let svc = service(&db);

    let rel = svc.send_request(UserId(1), UserId(2)).await.unwrap();
    assert_eq!(rel.user_min, UserId(1));
    assert_eq!(rel.user_max, UserId(2));
    assert_eq!(rel.action_user_id, UserId(1));
    assert_eq!(rel.status, RelationshipStatus::Pending);

    let incoming = svc.list_pending(UserId(2)).await.unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].user_id, UserId(1));
    assert_eq!(incoming[0].direction, RequestDirection::Incoming);

    let outgoing = svc.list_pending(UserId(1)).await.unwrap();
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].user_id, UserId(2));
    assert_eq!(outgoing[0].direction, RequestDirection::Outgoing);

    let rel = transitioned(svc.respond(UserId(2), UserId(1), "accept").await.unwrap());
    assert_eq!(rel.status, RelationshipStatus::Friend);
    assert_eq!(rel.action_user_id, UserId(2));

    assert!(svc.list_pending(UserId(1)).await.unwrap().is_empty());
    assert_eq!(svc.list_friends(UserId(1)).await.unwrap().len(), 1);
    assert_eq!(svc.list_friends(UserId(2)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn sender_cannot_answer_their_own_request() {
    let db = Arc::new(MemoryDb::new());
    let ariadne = seed_user(&db, "ariadne").await;
    let benedict = seed_user(&db, "benedict").await;
    let svc = service(&db);

    svc.send_request(ariadne, benedict).await.unwrap();

    assert!(matches!(
        svc.respond(ariadne, benedict, "accept").await,
        Err(RelationError::Unauthorized)
    ));
    assert!(matches!(
        svc.respond(ariadne, benedict, "reject").await,
        Err(RelationError::Unauthorized)
    ));

    // The sender may still withdraw the request.
    assert!(matches!(
        svc.respond(ariadne, benedict, "cancel").await,
        Ok(RespondOutcome::Removed)
    ));
}

#[tokio::test]
async fn blocked_row_answers_only_to_the_blocker() {
    let db = Arc::new(MemoryDb::new());
    let ariadne = seed_user(&db, "ariadne").await;
    let benedict = seed_user(&db, "benedict").await;
    let svc = service(&db);

    svc.send_request(ariadne, benedict).await.unwrap();
    let rel = transitioned(svc.respond(ariadne, benedict, "block").await.unwrap());
    assert_eq!(rel.status, RelationshipStatus::Blocked);
    assert_eq!(rel.action_user_id, ariadne);

    for action in ["accept", "reject", "cancel", "block"] {
        assert!(
            matches!(
                svc.respond(benedict, ariadne, action).await,
                Err(RelationError::Unauthorized)
            ),
            "blocked side must not be able to {action}"
        );
    }

    // Unblock by removing the row, after which a fresh request works.
    assert!(matches!(
        svc.respond(ariadne, benedict, "cancel").await,
        Ok(RespondOutcome::Removed)
    ));
    let rel = svc.send_request(benedict, ariadne).await.unwrap();
    assert_eq!(rel.status, RelationshipStatus::Pending);
    assert_eq!(rel.action_user_id, benedict);
}

#[tokio::test]
async fn cancel_by_either_side_frees_the_pair() {
    let db = Arc::new(MemoryDb::new());
    let ariadne = seed_user(&db, "ariadne").await;
    let benedict = seed_user(&db, "benedict").await;
    let svc = service(&db);

    svc.send_request(ariadne, benedict).await.unwrap();
    assert!(matches!(
        svc.respond(benedict, ariadne, "cancel").await,
        Ok(RespondOutcome::Removed)
    ));

    assert!(svc.list_pending(ariadne).await.unwrap().is_empty());
    let rel = svc.send_request(benedict, ariadne).await.unwrap();
    assert_eq!(rel.action_user_id, benedict);
}

#[tokio::test]
async fn unknown_verbs_and_unknown_users_are_rejected() {
    let db = Arc::new(MemoryDb::new());
    let ariadne = seed_user(&db, "ariadne").await;
    let benedict = seed_user(&db, "benedict").await;
    let svc = service(&db);

    assert!(matches!(
        svc.respond(ariadne, benedict, "befriend").await,
        Err(RelationError::InvalidAction(_))
    ));
    assert!(matches!(
        svc.send_request(ariadne, UserId(999)).await,
        Err(RelationError::UnknownUser)
    ));
    assert!(matches!(
        svc.send_request(ariadne, ariadne).await,
        Err(RelationError::Unauthorized)
    ));
}

#[tokio::test]
async fn racing_requests_produce_exactly_one_row() {
    let db = Arc::new(MemoryDb::new());
    let ariadne = seed_user(&db, "ariadne").await;
    let benedict = seed_user(&db, "benedict").await;
    let svc = Arc::new(service(&db));

    let tasks = vec![
        tokio::spawn({
            let svc = svc.clone();
            async move { svc.send_request(ariadne, benedict).await }
        }),
        tokio::spawn({
            let svc = svc.clone();
            async move { svc.send_request(benedict, ariadne).await }
        }),
    ];
    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one request may claim the pair");
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(RelationError::DuplicateRelationship))));

    let repo = MemoryRelationshipRepo::new(db.clone());
    let rel = repo
        .get_by_pair(UserPair::new(ariadne, benedict))
        .await
        .unwrap()
        .expect("the winning request left a row");
    assert_eq!(rel.status, RelationshipStatus::Pending);
}

#[tokio::test]
async fn racing_transitions_settle_on_a_participant_authored_state() {
    let db = Arc::new(MemoryDb::new());
    let ariadne = seed_user(&db, "ariadne").await;
    let benedict = seed_user(&db, "benedict").await;
    let svc = Arc::new(service(&db));

    svc.send_request(ariadne, benedict).await.unwrap();

    let accept = tokio::spawn({
        let svc = svc.clone();
        async move { svc.respond(benedict, ariadne, "accept").await }
    });
    let block = tokio::spawn({
        let svc = svc.clone();
        async move { svc.respond(ariadne, benedict, "block").await }
    });
    let accept = accept.await.unwrap();
    let block = block.await.unwrap();

    // The accept may lose to the block outright; the block always lands.
    assert!(block.is_ok());
    if let Err(e) = accept {
        assert!(matches!(e, RelationError::Unauthorized));
    }

    let repo = MemoryRelationshipRepo::new(db.clone());
    let rel = repo
        .get_by_pair(UserPair::new(ariadne, benedict))
        .await
        .unwrap()
        .expect("the pair row survives conflicting transitions");
    assert!(rel.involves(ariadne) && rel.involves(benedict));
    match rel.status {
        RelationshipStatus::Friend => assert_eq!(rel.action_user_id, benedict),
        RelationshipStatus::Blocked => assert_eq!(rel.action_user_id, ariadne),
        other => panic!("unexpected final status: {other:?}"),
    }
}
