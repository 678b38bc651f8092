//! Integration test: document resolution over transactions indexed through
//! the full dispatch pipeline.

use lto_index_core::{AssociationIndexMode, Transaction, TX_ASSOCIATION};
use lto_index_crypto::convert_ed25519_to_x25519;
use lto_index_integration_tests::{build_stack, make_address, make_public_key};

const AUTHENTICATION: u32 = 0x0101;
const KEY_AGREEMENT: u32 = 0x0104;

fn signed_tx(
    id: &str,
    sender: &str,
    sender_public_key: &str,
    recipient: Option<&str>,
    association_type: Option<u32>,
    timestamp: u64,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        tx_type: TX_ASSOCIATION,
        sender: sender.to_string(),
        sender_public_key: Some(sender_public_key.to_string()),
        recipient: recipient.map(str::to_string),
        party: recipient.map(str::to_string),
        association_type,
        timestamp,
        block_height: 1,
        position: 0,
    }
}

#[tokio::test]
async fn test_resolution_after_indexing() {
    let node_wallet = make_address("node", b'T');
    let subject = make_address("subject", b'T');
    let agent = make_address("agent", b'T');
    let subject_key = make_public_key();
    let agent_key = make_public_key();
    let stack = build_stack(&node_wallet, AssociationIndexMode::All);

    // The agent's own transaction indexes its public key; the subject's
    // association makes the agent an authentication method.
    stack
        .dispatcher
        .index(&signed_tx("tx-1", &agent, &agent_key, None, None, 100))
        .await
        .unwrap();
    stack
        .dispatcher
        .index(&signed_tx(
            "tx-2",
            &subject,
            &subject_key,
            Some(&agent),
            Some(AUTHENTICATION),
            200,
        ))
        .await
        .unwrap();

    let document = stack
        .resolver
        .resolve(&format!("did:lto:{subject}"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(document.id, format!("did:lto:{subject}"));
    assert_eq!(document.verification_method.len(), 2);
    assert_eq!(document.verification_method[0].public_key_base58, subject_key);
    assert_eq!(document.verification_method[1].public_key_base58, agent_key);
    assert_eq!(
        document.authentication,
        Some(vec![format!("did:lto:{agent}#sign")])
    );
}

#[tokio::test]
async fn test_key_agreement_resolution() {
    let node_wallet = make_address("node", b'T');
    let subject = make_address("subject", b'T');
    let agent = make_address("agent", b'T');
    let subject_key = make_public_key();
    let agent_key = make_public_key();
    let stack = build_stack(&node_wallet, AssociationIndexMode::All);

    stack
        .dispatcher
        .index(&signed_tx("tx-1", &agent, &agent_key, None, None, 100))
        .await
        .unwrap();
    stack
        .dispatcher
        .index(&signed_tx(
            "tx-2",
            &subject,
            &subject_key,
            Some(&agent),
            Some(KEY_AGREEMENT),
            200,
        ))
        .await
        .unwrap();

    let document = stack
        .resolver
        .resolve(&format!("did:lto:{subject}"))
        .await
        .unwrap()
        .unwrap();

    let key_agreement = document.key_agreement.expect("key agreement entries");
    assert_eq!(key_agreement.len(), 1);
    assert_eq!(
        key_agreement[0].public_key_base58,
        convert_ed25519_to_x25519(&agent_key).unwrap()
    );
}

#[tokio::test]
async fn test_unresolved_counterpart_key_makes_document_absent() {
    let node_wallet = make_address("node", b'T');
    let subject = make_address("subject", b'T');
    let ghost = make_address("ghost", b'T');
    let subject_key = make_public_key();
    let stack = build_stack(&node_wallet, AssociationIndexMode::All);

    // The ghost never sent a transaction, so it has no indexed key.
    stack
        .dispatcher
        .index(&signed_tx(
            "tx-1",
            &subject,
            &subject_key,
            Some(&ghost),
            Some(AUTHENTICATION),
            100,
        ))
        .await
        .unwrap();

    let document = stack
        .resolver
        .resolve(&format!("did:lto:{subject}"))
        .await
        .unwrap();
    assert!(document.is_none());
}

#[tokio::test]
async fn test_later_sighting_overwrites_public_key() {
    let node_wallet = make_address("node", b'T');
    let subject = make_address("subject", b'T');
    let old_key = make_public_key();
    let new_key = make_public_key();
    let stack = build_stack(&node_wallet, AssociationIndexMode::All);

    stack
        .dispatcher
        .index(&signed_tx("tx-1", &subject, &old_key, None, None, 100))
        .await
        .unwrap();
    stack
        .dispatcher
        .index(&signed_tx("tx-2", &subject, &new_key, None, None, 200))
        .await
        .unwrap();

    let document = stack.resolver.resolve(&subject).await.unwrap().unwrap();
    assert_eq!(document.verification_method[0].public_key_base58, new_key);
}

#[tokio::test]
async fn test_derived_identity_flow() {
    let node_wallet = make_address("node", b'T');
    let subject = make_address("subject", b'T');
    let subject_key = make_public_key();
    let stack = build_stack(&node_wallet, AssociationIndexMode::All);

    stack
        .dispatcher
        .index(&signed_tx("tx-1", &subject, &subject_key, None, None, 100))
        .await
        .unwrap();

    let document = stack
        .resolver
        .get_derived_identity(&subject, "tenant1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(document.id, format!("did:lto:{subject}:derived:tenant1"));

    let derived_address = stack
        .resolver
        .get_address(&format!("did:lto:{subject}:derived:tenant1"))
        .await
        .unwrap();
    assert_ne!(derived_address, subject);
    // The derived address lives on the subject's chain.
    assert_eq!(
        lto_index_crypto::chain_id_of(&derived_address).unwrap(),
        b'T'
    );
}
