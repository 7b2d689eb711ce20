use std::sync::atomic::{AtomicUsize, Ordering};

use mockito::Matcher;
use yookassa::{
    Amount, ApiRequest, ApiResponse, BankCard, CancellationToken, Client, Config, Payout,
    PayoutDestination, PayoutStatus, RequestContext, Transport, YooKassaError,
};

const AUTH: &str = "Basic MTAwNTAwOnRlc3Rfc2VjcmV0";

fn client_for(server: &mockito::Server) -> Client {
    let config = Config::new("100500", "test_secret")
        .with_api_url(format!("{}/v3", server.url()))
        .unwrap();
    Client::new(config).unwrap()
}

/// Counts calls and always answers with an empty object.
#[derive(Default)]
struct CountingTransport {
    calls: AtomicUsize,
}

impl Transport for CountingTransport {
    async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, YooKassaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ApiResponse {
            status: 200,
            body: b"{}".to_vec(),
        })
    }
}

#[tokio::test]
async fn test_get_sbp_banks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v3/sbp_banks")
        .match_header("authorization", AUTH)
        .match_header("idempotence-key", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"type":"list","items":[
                {"bank_id":"100000000111","name":"Сбербанк","bic":"044525225"},
                {"bank_id":"100000000004","name":"Т-Банк","bic":"044525974"}
            ]}"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let banks = client
        .payouts()
        .get_sbp_banks(&RequestContext::background())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(banks.len(), 2);
    assert_eq!(banks[0].bank_id, "100000000111");
    assert_eq!(banks[1].bic, "044525974");
}

#[tokio::test]
async fn test_create_sbp_payout() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v3/payouts")
        .match_header("authorization", AUTH)
        .match_header("idempotence-key", "withdrawal-42")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "amount": {"value": "320.00", "currency": "RUB"},
            "payout_destination_data": {
                "type": "sbp",
                "phone": "79000000000",
                "bank_id": "100000000111"
            },
            "description": "Withdrawal #42"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": "po-28559c6e-0003-5000-9000-0b2bcb2de4c4",
                "amount": {"value": "320.00", "currency": "RUB"},
                "status": "pending",
                "payout_destination": {"type": "sbp", "phone": "79000000000", "bank_id": "100000000111", "recipient_checked": false},
                "description": "Withdrawal #42",
                "created_at": "2021-06-21T14:28:45.132Z",
                "test": true
            }"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let payout = Payout::sbp(Amount::rub("320.00"), "79000000000", "100000000111")
        .with_description("Withdrawal #42");

    let created = client
        .payouts()
        .with_idempotency_key("withdrawal-42")
        .create_payout(&RequestContext::background(), &payout)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        created.id.as_deref(),
        Some("po-28559c6e-0003-5000-9000-0b2bcb2de4c4")
    );
    assert_eq!(created.status, Some(PayoutStatus::Pending));
    assert!(matches!(
        created.payout_destination,
        Some(PayoutDestination::Sbp {
            recipient_checked: Some(false),
            ..
        })
    ));
}

#[tokio::test]
async fn test_create_payout_generates_idempotency_key_when_unset() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v3/payouts")
        .match_header(
            "idempotence-key",
            Matcher::Regex("^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[0-9a-f]{4}-[0-9a-f]{12}$".into()),
        )
        .with_status(200)
        .with_body(r#"{"id":"po-1","amount":{"value":"1.00","currency":"RUB"},"status":"pending"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let payout = Payout::sbp(Amount::rub("1.00"), "79000000000", "100000000111");
    client
        .payouts()
        .create_payout(&RequestContext::background(), &payout)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unsupported_payout_type_never_reaches_transport() {
    let client = Client::with_transport(CountingTransport::default());

    let mut payout = Payout::sbp(Amount::rub("1.00"), "79000000000", "100000000111");
    payout.payout_destination_data = Some(PayoutDestination::BankCard {
        card: BankCard {
            number: Some("5555555555554477".into()),
            ..BankCard::default()
        },
    });

    let err = client
        .payouts()
        .create_payout(&RequestContext::background(), &payout)
        .await
        .unwrap_err();
    assert!(matches!(err, YooKassaError::UnsupportedPayoutType(ref t) if t == "bank_card"));

    payout.payout_destination_data = Some(PayoutDestination::YooMoney {
        account_number: "41001614575714".into(),
    });
    let err = client
        .payouts()
        .create_payout(&RequestContext::background(), &payout)
        .await
        .unwrap_err();
    assert!(matches!(err, YooKassaError::UnsupportedPayoutType(ref t) if t == "yoo_money"));

    assert_eq!(client.transport().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_get_payout_not_found() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v3/payouts/po-missing")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"type":"error","id":"0b8f0a3a-1f2b-4c1e-9c3a-6d1f1e2a3b4c","code":"not_found","description":"Payout doesn't exist or access denied"}"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .payouts()
        .get_payout(&RequestContext::background(), "po-missing")
        .await
        .unwrap_err();

    mock.assert_async().await;
    match err {
        YooKassaError::Api { status, error } => {
            assert_eq!(status, 404);
            assert_eq!(error.code, "not_found");
            assert_eq!(error.description, "Payout doesn't exist or access denied");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_payout_unreadable_error_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v3/payouts/po-1")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .payouts()
        .get_payout(&RequestContext::background(), "po-1")
        .await
        .unwrap_err();
    assert!(matches!(err, YooKassaError::Decode(_)));
}

#[tokio::test]
async fn test_cancelled_context_sends_nothing() {
    let client = Client::with_transport(CountingTransport::default());
    let token = CancellationToken::new();
    token.cancel();
    let ctx = RequestContext::with_cancellation(token);

    let err = client.payouts().get_sbp_banks(&ctx).await.unwrap_err();
    assert!(err.is_cancelled());

    let payout = Payout::sbp(Amount::rub("1.00"), "79000000000", "100000000111");
    let err = client.payouts().create_payout(&ctx, &payout).await.unwrap_err();
    assert!(err.is_cancelled());

    assert_eq!(client.transport().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_payout_id_is_rejected_locally() {
    let client = Client::with_transport(CountingTransport::default());
    let err = client
        .payouts()
        .get_payout(&RequestContext::background(), "")
        .await
        .unwrap_err();
    assert!(matches!(err, YooKassaError::Validation(_)));
    assert_eq!(client.transport().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_dot_segment_ids_never_reach_the_api_root() {
    let mut server = mockito::Server::new_async().await;
    let root = server
        .mock("GET", "/v3/")
        .with_status(200)
        .with_body(r#"{"id":"x","amount":{"value":"1.00","currency":"RUB"}}"#)
        .expect(0)
        .create_async()
        .await;
    let client = client_for(&server);
    let ctx = RequestContext::background();

    for id in ["..", "."] {
        let err = client.payouts().get_payout(&ctx, id).await.unwrap_err();
        assert!(matches!(err, YooKassaError::Validation(_)), "{id}: {err:?}");

        let err = client.refunds().find_refund(&ctx, id).await.unwrap_err();
        assert!(matches!(err, YooKassaError::Validation(_)), "{id}: {err:?}");
    }

    root.assert_async().await;
}
