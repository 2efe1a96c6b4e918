//! Claim flow against a mocked rewards API and an in-memory wallet

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use merkl_claim::{
    parse_address, Address, ClaimCall, ClaimError, ClaimSession, ClaimTarget, ClaimTransaction,
    RewardsClient, SessionStatus, TransactionSubmitter, TxOutcome, B256, U256,
};

const USER: &str = "0x1111111111111111111111111111111111111111";
const TOKEN: &str = "0xAB067d0832D40619EF445B7fAE510f5Da606Ab0A";
const DISTRIBUTOR: &str = "0x3Ef3D8bA38EBe18DB133cEc108f4D14CE00Dd9Ae";

struct MockWallet {
    account: Address,
    chain_id: u64,
    fail_with: Option<String>,
    sent: Mutex<Vec<ClaimTransaction>>,
}

impl MockWallet {
    fn new(chain_id: u64) -> Self {
        Self {
            account: parse_address(USER).unwrap(),
            chain_id,
            fail_with: None,
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TransactionSubmitter for MockWallet {
    fn account(&self) -> Address {
        self.account
    }

    async fn chain_id(&self) -> merkl_claim::Result<u64> {
        Ok(self.chain_id)
    }

    async fn submit(&self, tx: &ClaimTransaction) -> merkl_claim::Result<TxOutcome> {
        if let Some(msg) = &self.fail_with {
            return Err(ClaimError::Transaction(msg.clone()));
        }
        self.sent.lock().unwrap().push(tx.clone());
        Ok(TxOutcome {
            tx_hash: B256::repeat_byte(0x42),
            block_number: Some(7),
            gas_used: 90_000,
        })
    }
}

fn target() -> ClaimTarget {
    ClaimTarget {
        chain_id: 988,
        distributor: parse_address(DISTRIBUTOR).unwrap(),
        token: parse_address(TOKEN).unwrap(),
    }
}

fn rewards_body(unclaimed: &str) -> String {
    let mut tokens = serde_json::Map::new();
    tokens.insert(
        TOKEN.to_string(),
        serde_json::json!({
            "accumulated": unclaimed,
            "unclaimed": unclaimed,
            "pending": "0",
            "decimals": 6,
            "symbol": "USDT",
            "proof": [
                format!("0x{}", "aa".repeat(32)),
                format!("0x{}", "bb".repeat(32))
            ]
        }),
    );

    serde_json::json!({
        "988": {
            "campaignData": {"id": "ignored"},
            "tokenData": tokens
        }
    })
    .to_string()
}

async fn rewards_server(status: usize, body: String) -> (mockito::ServerGuard, mockito::Mock) {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v3/rewards")
        .match_query(mockito::Matcher::UrlEncoded(
            "user".into(),
            parse_address(USER).unwrap().to_checksum(None),
        ))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;
    (server, mock)
}

fn client_for(server: &mockito::ServerGuard) -> RewardsClient {
    RewardsClient::new(format!("{}/v3/rewards", server.url()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_full_claim_flow() {
    let (server, mock) = rewards_server(200, rewards_body("1500000")).await;
    let client = client_for(&server);
    let wallet = MockWallet::new(988);
    let mut session = ClaimSession::new(target());

    let account = session.connect(&wallet).await.unwrap();
    assert_eq!(account, wallet.account);
    assert!(session.on_target_chain());

    let reward = session.refresh(&client).await.unwrap();
    assert_eq!(reward.amount, U256::from(1_500_000u64));
    assert_eq!(reward.display_amount(), "1.500000 USDT");
    mock.assert_async().await;

    let outcome = session.claim(&wallet).await.unwrap();
    assert_eq!(outcome.tx_hash, B256::repeat_byte(0x42));
    assert!(session.reward().is_none());
    assert!(matches!(session.status(), SessionStatus::Success(_)));

    let sent = wallet.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, target().distributor);
    assert_eq!(sent[0].value, U256::ZERO);

    let call = ClaimCall::decode(&sent[0].data).unwrap();
    assert_eq!(call.user, wallet.account);
    assert_eq!(call.token, target().token);
    assert_eq!(call.amount, U256::from(1_500_000u64));
    assert_eq!(call.proof, vec![B256::repeat_byte(0xaa), B256::repeat_byte(0xbb)]);
}

#[tokio::test]
async fn test_wrong_network_blocks_claim() {
    let (server, _mock) = rewards_server(200, rewards_body("10")).await;
    let client = client_for(&server);
    let wallet = MockWallet::new(1);
    let mut session = ClaimSession::new(target());

    session.connect(&wallet).await.unwrap();
    assert!(!session.on_target_chain());
    assert!(matches!(session.status(), SessionStatus::Notice(_)));

    session.refresh(&client).await.unwrap();
    let err = session.claim(&wallet).await.unwrap_err();
    assert!(matches!(err, ClaimError::WrongNetwork { expected: 988, actual: 1 }));
    assert!(wallet.sent.lock().unwrap().is_empty());
    assert!(session.reward().is_some());
}

#[tokio::test]
async fn test_nothing_unclaimed() {
    let (server, _mock) = rewards_server(200, rewards_body("0")).await;
    let client = client_for(&server);
    let wallet = MockWallet::new(988);
    let mut session = ClaimSession::new(target());

    session.connect(&wallet).await.unwrap();
    let err = session.refresh(&client).await.unwrap_err();
    assert!(matches!(err, ClaimError::NoRewards(_)));
    assert!(matches!(session.status(), SessionStatus::Failed(_)));
    assert!(matches!(session.prepare_claim(), Err(ClaimError::NoRewards(_))));
}

#[tokio::test]
async fn test_http_error_is_reported() {
    let (server, _mock) = rewards_server(500, "{}".to_string()).await;
    let client = client_for(&server);

    let err = client
        .fetch_rewards(parse_address(USER).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ClaimError::Rewards(_)));
}

#[tokio::test]
async fn test_refresh_requires_connection() {
    let (server, _mock) = rewards_server(200, rewards_body("10")).await;
    let client = client_for(&server);
    let mut session = ClaimSession::new(target());

    assert!(matches!(
        session.refresh(&client).await,
        Err(ClaimError::NotConnected(_))
    ));
}

#[tokio::test]
async fn test_failed_submission_keeps_reward() {
    let (server, _mock) = rewards_server(200, rewards_body("10")).await;
    let client = client_for(&server);
    let mut wallet = MockWallet::new(988);
    wallet.fail_with = Some("user rejected".to_string());
    let mut session = ClaimSession::new(target());

    session.connect(&wallet).await.unwrap();
    session.refresh(&client).await.unwrap();

    let err = session.claim(&wallet).await.unwrap_err();
    assert!(matches!(err, ClaimError::Transaction(_)));
    assert!(session.reward().is_some());
    assert_eq!(
        session.status(),
        &SessionStatus::Failed("Transaction error: user rejected".to_string())
    );
}

#[tokio::test]
async fn test_claim_without_reward_records_failure() {
    let wallet = MockWallet::new(988);
    let mut session = ClaimSession::new(target());

    let err = session.claim(&wallet).await.unwrap_err();
    assert!(matches!(err, ClaimError::NotConnected(_)));
    assert_eq!(
        session.status(),
        &SessionStatus::Failed("Wallet not connected".to_string())
    );

    session.connect(&wallet).await.unwrap();
    assert_eq!(session.status(), &SessionStatus::Idle);

    let err = session.claim(&wallet).await.unwrap_err();
    assert!(matches!(err, ClaimError::NoRewards(_)));
    assert_eq!(
        session.status(),
        &SessionStatus::Failed("No claimable reward loaded".to_string())
    );
    assert!(wallet.sent.lock().unwrap().is_empty());
}
