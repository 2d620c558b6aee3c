// End-to-end: issuance, publication on a mock ledger, resolution and
// presentation.

use std::collections::HashMap;

use ledgercert::cert::builder::{ApprovalBuilder, RequestBuilder};
use ledgercert::cert::serializer::serialize;
use ledgercert::cert::validator;
use ledgercert::presentation::add_months_to_block_time;
use ledgercert::{
    resolve_transaction, Certificate, CertificateLedger, CertificateOp, CertificateView,
    EmbeddedPayload, Hash256, IdentityKeyPair, LedgerCertError, LinkageState,
};

struct MockTx {
    txid: Hash256,
    op: &'static str,
    payload: Option<EmbeddedPayload>,
}

struct MockLedger;

impl CertificateLedger for MockLedger {
    type Transaction = MockTx;

    fn transaction_hash(&self, tx: &MockTx) -> Hash256 {
        tx.txid
    }

    fn extract_payload(&self, tx: &MockTx) -> Option<EmbeddedPayload> {
        tx.payload.clone()
    }

    fn classify_operation(&self, tx: &MockTx) -> CertificateOp {
        tx.op.parse().unwrap()
    }
}

fn publish(cert: &Certificate, txid: u8, op: &'static str) -> MockTx {
    MockTx {
        txid: Hash256::from_bytes([txid; 32]),
        op,
        payload: Some(EmbeddedPayload {
            data: serialize(cert),
            hash: cert.full_hash().to_hex().into_bytes(),
            output_index: 1,
        }),
    }
}

struct Chain(HashMap<u32, i64>);

impl ledgercert::ChainClock for Chain {
    fn block_time(&self, height: u32) -> Option<i64> {
        self.0.get(&height).copied()
    }
}

const REQUEST_TIME: i64 = 1_704_067_200; // 2024-01-01T00:00:00Z
const APPROVE_TIME: i64 = 1_706_745_600; // 2024-02-01T00:00:00Z

#[test]
fn alice_requests_ca1_approves() {
    let alice = IdentityKeyPair::generate();
    let ca1 = IdentityKeyPair::generate();

    let request = RequestBuilder::new(&alice)
        .subject("alice@public.bdap.io")
        .months_valid(12)
        .add_extension(ledgercert::ExtensionKind::KeyUsage, "digitalSignature")
        .build()
        .unwrap();

    // Request confirmed at height 100.
    let request_tx = publish(&request, 0x11, "bdap_new_certificate");
    let resolved_request = resolve_transaction(&MockLedger, &request_tx, 100).unwrap();
    assert_eq!(resolved_request.linkage_state(), LinkageState::Requested);
    assert_eq!(resolved_request.height_request, 100);
    assert_eq!(resolved_request.tx_hash_request, Hash256::from_bytes([0x11; 32]));
    assert!(!resolved_request.is_approved());

    // ca1 counter-signs the resolved request; approval confirmed at 150.
    let approved = ApprovalBuilder::new(&ca1, resolved_request)
        .issuer("ca1@public.bdap.io")
        .build()
        .unwrap();
    let approve_tx = publish(&approved, 0x22, "bdap_approve_certificate");
    let resolved = resolve_transaction(&MockLedger, &approve_tx, 150).unwrap();
    assert!(resolved.is_approved());
    assert_eq!(resolved.height_request, 100);
    assert_eq!(resolved.height_approve, 150);

    let check = validator::verify(&resolved, &ca1.public_key_bytes()).unwrap();
    assert!(check.subject_signature_valid && check.issuer_signature_valid && check.approved);

    let chain = Chain(HashMap::from([(100, REQUEST_TIME), (150, APPROVE_TIME)]));
    let view = CertificateView::build(&resolved, &chain);
    assert_eq!(view.request_time, REQUEST_TIME);
    assert_eq!(view.valid_from, Some(APPROVE_TIME));
    assert_eq!(view.valid_until, add_months_to_block_time(APPROVE_TIME, 12));
    // 2024-02-01 + 12 months = 2025-02-01, crossing Feb 29
    assert_eq!(view.valid_until, Some(APPROVE_TIME + 366 * 86_400));

    let json = view.to_json();
    assert_eq!(json["subject"], "alice@public.bdap.io");
    assert_eq!(json["issuer"], "ca1@public.bdap.io");
    assert_eq!(json["key_usage"]["key_usage1"], "digitalSignature");
    assert_eq!(json["approve_height"], 150);
    assert_eq!(json["txid_approve"], Hash256::from_bytes([0x22; 32]).to_hex());
}

#[test]
fn transaction_without_payload_is_not_found() {
    let tx = MockTx {
        txid: Hash256::from_bytes([1; 32]),
        op: "bdap_new_certificate",
        payload: None,
    };
    assert!(matches!(resolve_transaction(&MockLedger, &tx, 5), Err(LedgerCertError::NotFound)));
}

#[test]
fn corrupted_payload_fails_integrity() {
    let alice = IdentityKeyPair::generate();
    let cert = RequestBuilder::new(&alice).subject("alice").build().unwrap();
    let mut tx = publish(&cert, 3, "bdap_new_certificate");
    if let Some(payload) = tx.payload.as_mut() {
        let last = payload.data.len() - 1;
        payload.data[last] ^= 0x80;
    }
    assert!(matches!(
        resolve_transaction(&MockLedger, &tx, 5),
        Err(LedgerCertError::Integrity { .. })
    ));
}

#[test]
fn unrecognized_operation_leaves_record_unlinked() {
    let alice = IdentityKeyPair::generate();
    let cert = RequestBuilder::new(&alice).subject("alice").build().unwrap();
    let tx = publish(&cert, 4, "bdap_update_account");
    let resolved = resolve_transaction(&MockLedger, &tx, 9).unwrap();
    assert_eq!(resolved.linkage_state(), LinkageState::Unlinked);
    assert_eq!(resolved, cert);
}
