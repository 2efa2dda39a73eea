//! Transaction construction, signing and submission seam

use super::endpoint::RelayEndpoint;
use super::rpc::RpcReader;
use super::submit::{SubmissionOutcome, SubmissionResult};
use crate::client::HttpClient;
use crate::error::{AppError, Result};
use crate::types::SubmitEncoding;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::json;
use solana_sdk::{
    hash::Hash,
    message::Message,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_instruction,
    transaction::Transaction,
};
use std::sync::Arc;
use std::time::Instant;

/// Where the transaction's blockhash comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashSource {
    /// Latest blockhash from the read RPC
    RecentBlockhash,
    /// Blockhash stored in a durable nonce account; the payer is its authority
    DurableNonce { account: Pubkey },
}

/// Main transfer plus tip transfer, both paid by `payer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPlan {
    pub payer: Pubkey,
    pub destination: Pubkey,
    pub lamports: u64,
    pub tip_receiver: Pubkey,
    pub tip_lamports: u64,
}

/// Capabilities the submitter needs from a blockchain SDK
#[async_trait]
pub trait TransactionSdk: Send + Sync {
    async fn fetch_recent_blockhash_or_nonce(&self, source: &HashSource) -> Result<Hash>;

    /// Build the unsigned message: main transfer, then tip
    fn build_transfer_set(&self, plan: &TransferPlan, source: &HashSource) -> Result<Message>;

    fn sign(&self, message: Message, signer: &Keypair, blockhash: Hash) -> Result<Transaction>;

    /// Send a signed transaction; failures are reported in the result
    async fn submit(
        &self,
        endpoint: &RelayEndpoint,
        transaction: &Transaction,
        encoding: SubmitEncoding,
    ) -> SubmissionResult;
}

/// solana-sdk backed implementation talking JSON-RPC over the shared client
pub struct SolanaSdk {
    client: Arc<dyn HttpClient>,
    rpc: RpcReader,
}

impl SolanaSdk {
    pub fn new(client: Arc<dyn HttpClient>, rpc_url: impl Into<String>) -> Self {
        let rpc = RpcReader::new(client.clone(), rpc_url);
        Self { client, rpc }
    }

    async fn send(
        &self,
        endpoint: &RelayEndpoint,
        transaction: &Transaction,
        encoding: SubmitEncoding,
    ) -> Result<String> {
        let url = endpoint.submit_url(encoding)?;
        let wire = bincode::serialize(transaction)?;

        match encoding {
            SubmitEncoding::JsonRpc => {
                let request = json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "method": "sendTransaction",
                    "params": [
                        STANDARD.encode(wire),
                        { "encoding": "base64", "skipPreflight": true }
                    ]
                });
                let response = self.client.post_json(&url, &request).await?;
                if !response.is_success() {
                    return Err(AppError::relay(format!(
                        "HTTP {}: {}",
                        response.status_code,
                        response.body.trim()
                    )));
                }

                let body = response.json()?;
                if let Some(result) = body.get("result") {
                    Ok(result.as_str().map(str::to_string).unwrap_or_else(|| result.to_string()))
                } else if let Some(error) = body.get("error") {
                    Err(AppError::relay(error.to_string()))
                } else {
                    Err(AppError::relay(format!("Unexpected response: {}", body)))
                }
            }
            SubmitEncoding::Binary => {
                let response = self.client.post_bytes(&url, wire).await?;
                if response.is_success() {
                    Ok(response.body.trim().to_string())
                } else {
                    Err(AppError::relay(format!(
                        "HTTP {}: {}",
                        response.status_code,
                        response.body.trim()
                    )))
                }
            }
        }
    }
}

#[async_trait]
impl TransactionSdk for SolanaSdk {
    async fn fetch_recent_blockhash_or_nonce(&self, source: &HashSource) -> Result<Hash> {
        match source {
            HashSource::RecentBlockhash => self.rpc.latest_blockhash().await,
            HashSource::DurableNonce { account } => self.rpc.nonce_blockhash(account).await,
        }
    }

    fn build_transfer_set(&self, plan: &TransferPlan, source: &HashSource) -> Result<Message> {
        let instructions = vec![
            system_instruction::transfer(&plan.payer, &plan.destination, plan.lamports),
            system_instruction::transfer(&plan.payer, &plan.tip_receiver, plan.tip_lamports),
        ];

        Ok(match source {
            HashSource::RecentBlockhash => Message::new(&instructions, Some(&plan.payer)),
            HashSource::DurableNonce { account } => {
                Message::new_with_nonce(instructions, Some(&plan.payer), account, &plan.payer)
            }
        })
    }

    fn sign(&self, message: Message, signer: &Keypair, blockhash: Hash) -> Result<Transaction> {
        if message.account_keys.first() != Some(&signer.pubkey()) {
            return Err(AppError::key(format!(
                "Signer {} is not the fee payer of the message",
                signer.pubkey()
            )));
        }

        let mut transaction = Transaction::new_unsigned(message);
        transaction
            .try_sign(&[signer], blockhash)
            .map_err(|e| AppError::key(format!("Failed to sign transaction: {}", e)))?;
        Ok(transaction)
    }

    async fn submit(
        &self,
        endpoint: &RelayEndpoint,
        transaction: &Transaction,
        encoding: SubmitEncoding,
    ) -> SubmissionResult {
        let start = Instant::now();
        let outcome = match self.send(endpoint, transaction, encoding).await {
            Ok(response) => SubmissionOutcome::Accepted { response },
            Err(e) => SubmissionOutcome::Rejected {
                reason: e.to_string(),
            },
        };

        SubmissionResult {
            label: endpoint.label.clone(),
            encoding,
            elapsed: start.elapsed(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NetworkClient;
    use solana_sdk::system_instruction::SystemInstruction;
    use solana_sdk::system_program;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sdk(rpc_url: &str) -> SolanaSdk {
        SolanaSdk::new(Arc::new(NetworkClient::new().unwrap()), rpc_url)
    }

    fn plan_for(payer: &Keypair) -> TransferPlan {
        TransferPlan {
            payer: payer.pubkey(),
            destination: Pubkey::new_unique(),
            lamports: 1,
            tip_receiver: Pubkey::new_unique(),
            tip_lamports: 100_000,
        }
    }

    fn signed_transaction(sdk: &SolanaSdk) -> Transaction {
        let payer = Keypair::new();
        let message = sdk
            .build_transfer_set(&plan_for(&payer), &HashSource::RecentBlockhash)
            .unwrap();
        sdk.sign(message, &payer, Hash::new_unique()).unwrap()
    }

    #[test]
    fn test_recent_blockhash_transfer_set() {
        let sdk = sdk("http://127.0.0.1:1");
        let payer = Keypair::new();
        let plan = plan_for(&payer);
        let message = sdk.build_transfer_set(&plan, &HashSource::RecentBlockhash).unwrap();

        assert_eq!(message.instructions.len(), 2);
        assert_eq!(message.account_keys[0], payer.pubkey());
        assert!(message.account_keys.contains(&plan.destination));
        assert!(message.account_keys.contains(&plan.tip_receiver));
    }

    #[test]
    fn test_nonce_transfer_set_advances_nonce_first() {
        let sdk = sdk("http://127.0.0.1:1");
        let payer = Keypair::new();
        let nonce = Pubkey::new_unique();
        let message = sdk
            .build_transfer_set(&plan_for(&payer), &HashSource::DurableNonce { account: nonce })
            .unwrap();

        assert_eq!(message.instructions.len(), 3);
        let first = &message.instructions[0];
        assert_eq!(
            message.account_keys[first.program_id_index as usize],
            system_program::id()
        );
        let decoded: SystemInstruction = bincode::deserialize(&first.data).unwrap();
        assert_eq!(decoded, SystemInstruction::AdvanceNonceAccount);
        assert!(message.account_keys.contains(&nonce));
    }

    #[test]
    fn test_sign_produces_verifiable_transaction() {
        let sdk = sdk("http://127.0.0.1:1");
        let payer = Keypair::new();
        let blockhash = Hash::new_unique();
        let message = sdk
            .build_transfer_set(&plan_for(&payer), &HashSource::RecentBlockhash)
            .unwrap();
        let transaction = sdk.sign(message, &payer, blockhash).unwrap();

        assert_eq!(transaction.signatures.len(), 1);
        assert_eq!(transaction.message.recent_blockhash, blockhash);
        assert!(transaction.verify().is_ok());
    }

    #[test]
    fn test_sign_with_wrong_payer_fails() {
        let sdk = sdk("http://127.0.0.1:1");
        let message = sdk
            .build_transfer_set(&plan_for(&Keypair::new()), &HashSource::RecentBlockhash)
            .unwrap();
        let result = sdk.sign(message, &Keypair::new(), Hash::new_unique());
        assert!(matches!(result, Err(AppError::Key(_))));
    }

    #[tokio::test]
    async fn test_json_rpc_submission_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(query_param("api-key", "k"))
            .and(body_partial_json(json!({ "method": "sendTransaction" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 1, "result": "5sig"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sdk = sdk(&server.uri());
        let endpoint = RelayEndpoint::new("DE", server.uri(), "k");
        let result = sdk
            .submit(&endpoint, &signed_transaction(&sdk), SubmitEncoding::JsonRpc)
            .await;

        assert_eq!(result.label, "DE");
        assert_eq!(
            result.outcome,
            SubmissionOutcome::Accepted {
                response: "5sig".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_json_rpc_error_is_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 1, "error": { "code": -32002, "message": "insufficient tip" }
            })))
            .mount(&server)
            .await;

        let sdk = sdk(&server.uri());
        let endpoint = RelayEndpoint::new("NY", server.uri(), "k");
        let result = sdk
            .submit(&endpoint, &signed_transaction(&sdk), SubmitEncoding::JsonRpc)
            .await;

        match result.outcome {
            SubmissionOutcome::Rejected { reason } => assert!(reason.contains("insufficient tip")),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_binary_submission() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/txb"))
            .and(query_param("api-key", "k"))
            .respond_with(ResponseTemplate::new(200).set_body_string("5sig\n"))
            .expect(1)
            .mount(&server)
            .await;

        let sdk = sdk(&server.uri());
        let endpoint = RelayEndpoint::new("AMS", server.uri(), "k");
        let result = sdk
            .submit(&endpoint, &signed_transaction(&sdk), SubmitEncoding::Binary)
            .await;

        assert!(result.is_accepted());
        assert_eq!(result.encoding, SubmitEncoding::Binary);
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_rejection() {
        let sdk = sdk("http://127.0.0.1:1");
        let endpoint = RelayEndpoint::new("DE", "http://127.0.0.1:1", "k");
        let result = sdk
            .submit(&endpoint, &signed_transaction(&sdk), SubmitEncoding::Binary)
            .await;
        assert!(!result.is_accepted());
    }
}
