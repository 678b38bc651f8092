//! Integration test: role grants and revokes flowing through the full
//! dispatch pipeline, including sponsorship side effects and association
//! gating.

use lto_index_core::{AssociationIndexMode, TX_ASSOCIATION, TX_REVOKE_ASSOCIATION};
use lto_index_integration_tests::{
    association_tx, build_stack, make_address, ISSUES_AUTHORITY, ISSUES_GRADUATE,
};

#[tokio::test]
async fn test_grant_chain_builds_roles_and_sponsors_party() {
    let node_wallet = make_address("node", b'T');
    let university = make_address("university", b'T');
    let student = make_address("student", b'T');
    let stack = build_stack(&node_wallet, AssociationIndexMode::All);

    // The node wallet (implicit root) appoints the university as authority.
    stack
        .dispatcher
        .index(&association_tx(
            "tx-1",
            TX_ASSOCIATION,
            &node_wallet,
            &university,
            ISSUES_AUTHORITY,
            100,
        ))
        .await
        .unwrap();

    let university_roles = stack.trust.get_roles_for(&university).await.unwrap();
    assert_eq!(university_roles.roles, vec!["authority"]);
    assert_eq!(university_roles.issues_authorization, vec!["issue_diploma"]);
    // Authority is not a sponsored role.
    assert!(stack.node.sponsor_calls().is_empty());

    // The university grants the sponsored graduate role.
    stack
        .dispatcher
        .index(&association_tx(
            "tx-2",
            TX_ASSOCIATION,
            &university,
            &student,
            ISSUES_GRADUATE,
            200,
        ))
        .await
        .unwrap();

    let student_roles = stack.trust.get_roles_for(&student).await.unwrap();
    assert_eq!(student_roles.roles, vec!["graduate"]);
    assert_eq!(stack.node.sponsor_calls(), vec![student.clone()]);

    // A second graduate grant must not sponsor again.
    stack
        .dispatcher
        .index(&association_tx(
            "tx-3",
            TX_ASSOCIATION,
            &university,
            &student,
            ISSUES_GRADUATE,
            300,
        ))
        .await
        .unwrap();
    assert_eq!(stack.node.sponsor_calls().len(), 1);
}

#[tokio::test]
async fn test_revoke_chain_removes_roles_and_cancels_sponsorship() {
    let node_wallet = make_address("node", b'T');
    let university = make_address("university", b'T');
    let student = make_address("student", b'T');
    let stack = build_stack(&node_wallet, AssociationIndexMode::All);

    stack
        .dispatcher
        .index(&association_tx(
            "tx-1",
            TX_ASSOCIATION,
            &node_wallet,
            &university,
            ISSUES_AUTHORITY,
            100,
        ))
        .await
        .unwrap();
    stack
        .dispatcher
        .index(&association_tx(
            "tx-2",
            TX_ASSOCIATION,
            &university,
            &student,
            ISSUES_GRADUATE,
            200,
        ))
        .await
        .unwrap();

    stack
        .dispatcher
        .index(&association_tx(
            "tx-3",
            TX_REVOKE_ASSOCIATION,
            &university,
            &student,
            ISSUES_GRADUATE,
            300,
        ))
        .await
        .unwrap();

    let student_roles = stack.trust.get_roles_for(&student).await.unwrap();
    assert!(student_roles.roles.is_empty());
    assert_eq!(stack.node.cancel_calls(), vec![student.clone()]);
    // Grant then matching revoke leaves no residual record on the student,
    // while the university keeps its own role.
    assert!(stack.storage.get_roles_for(&student).await.unwrap().is_empty());
    assert!(stack
        .storage
        .get_roles_for(&university)
        .await
        .unwrap()
        .contains_key("authority"));
}

#[tokio::test]
async fn test_node_wallet_keeps_root_with_empty_storage() {
    let node_wallet = make_address("node", b'T');
    let stack = build_stack(&node_wallet, AssociationIndexMode::All);

    let roles = stack.trust.get_roles_for(&node_wallet).await.unwrap();
    assert_eq!(roles.roles, vec!["root"]);
}

#[tokio::test]
async fn test_associations_follow_grants_and_revokes() {
    let node_wallet = make_address("node", b'T');
    let sender = make_address("sender", b'T');
    let recipient = make_address("recipient", b'T');
    let stack = build_stack(&node_wallet, AssociationIndexMode::All);

    stack
        .dispatcher
        .index(&association_tx(
            "tx-1",
            TX_ASSOCIATION,
            &sender,
            &recipient,
            0x0100,
            100,
        ))
        .await
        .unwrap();

    let edges = stack.associations.get_associations(&sender).await.unwrap();
    assert_eq!(edges.children, vec![recipient.clone()]);
    let reverse = stack.associations.get_associations(&recipient).await.unwrap();
    assert_eq!(reverse.parents, vec![sender.clone()]);

    stack
        .dispatcher
        .index(&association_tx(
            "tx-2",
            TX_REVOKE_ASSOCIATION,
            &sender,
            &recipient,
            0x0100,
            200,
        ))
        .await
        .unwrap();

    let edges = stack.associations.get_associations(&sender).await.unwrap();
    assert!(edges.children.is_empty());
}

#[tokio::test]
async fn test_trust_gated_mode_drops_untrusted_grants() {
    let node_wallet = make_address("node", b'T');
    let stranger = make_address("stranger", b'T');
    let recipient = make_address("recipient", b'T');
    let stack = build_stack(&node_wallet, AssociationIndexMode::Trust);

    stack
        .dispatcher
        .index(&association_tx(
            "tx-1",
            TX_ASSOCIATION,
            &stranger,
            &recipient,
            0x0100,
            100,
        ))
        .await
        .unwrap();
    let edges = stack.associations.get_associations(&stranger).await.unwrap();
    assert!(edges.children.is_empty());

    // The node wallet is trusted through its implicit root role.
    stack
        .dispatcher
        .index(&association_tx(
            "tx-2",
            TX_ASSOCIATION,
            &node_wallet,
            &recipient,
            0x0100,
            200,
        ))
        .await
        .unwrap();
    let edges = stack.associations.get_associations(&node_wallet).await.unwrap();
    assert_eq!(edges.children, vec![recipient]);
}

#[tokio::test]
async fn test_history_is_queryable_per_address() {
    let node_wallet = make_address("node", b'T');
    let sender = make_address("sender", b'T');
    let recipient = make_address("recipient", b'T');
    let stack = build_stack(&node_wallet, AssociationIndexMode::All);

    for (id, timestamp) in [("tx-1", 100), ("tx-2", 200), ("tx-3", 300)] {
        stack
            .dispatcher
            .index(&association_tx(
                id,
                TX_ASSOCIATION,
                &sender,
                &recipient,
                0x0100,
                timestamp,
            ))
            .await
            .unwrap();
    }

    assert_eq!(stack.storage.count_tx("association", &sender).await.unwrap(), 3);
    assert_eq!(
        stack.storage.get_tx("association", &sender, 2, 1).await.unwrap(),
        vec!["tx-2", "tx-3"]
    );
    assert_eq!(stack.storage.count_tx("all", &recipient).await.unwrap(), 3);
}
