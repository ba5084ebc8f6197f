//! DON gateway client for `secrets_set` messages.
//!
//! # Responsibilities
//! - Build and sign the JSON-RPC gateway message
//! - POST it to the gateways in order, moving on only when a gateway is
//!   unreachable or answers with something other than a gateway response
//! - Aggregate per-node responses into an [`UploadResult`]

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::blockchain::Wallet;
use crate::functions::types::{FunctionsError, FunctionsResult, UploadResult};

pub const SECRETS_SET_METHOD: &str = "secrets_set";

const MESSAGE_ID_MAX_LEN: usize = 128;
const METHOD_MAX_LEN: usize = 64;
const DON_ID_MAX_LEN: usize = 64;
const RECEIVER_LEN: usize = 42;

/// Payload stored by each node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretsSetPayload {
    pub slot_id: u32,
    pub version: u64,
    /// Base64 of the ciphertext bytes.
    pub payload: String,
    /// Expiration as unix milliseconds.
    pub expiration: u64,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    pub message_id: String,
    pub method: String,
    pub don_id: String,
    pub receiver: String,
    pub payload: SecretsSetPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayParams {
    pub body: MessageBody,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRequest {
    pub id: String,
    pub jsonrpc: String,
    pub method: String,
    pub params: GatewayParams,
}

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    result: Option<ResponseEnvelope>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    body: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    payload: ResponsePayload,
}

#[derive(Debug, Deserialize)]
struct ResponsePayload {
    success: bool,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    node_responses: Vec<NodeResponse>,
}

#[derive(Debug, Deserialize)]
struct NodeResponse {
    body: NodeBody,
}

#[derive(Debug, Deserialize)]
struct NodeBody {
    #[serde(default)]
    sender: Option<String>,
    payload: NodePayload,
}

#[derive(Debug, Deserialize)]
struct NodePayload {
    success: bool,
    #[serde(default)]
    error_message: Option<String>,
}

/// Slot, version and expiry of one upload.
#[derive(Debug, Clone, Copy)]
pub struct SecretsSetArgs {
    pub slot_id: u32,
    pub version: u64,
    pub expiration_ms: u64,
}

/// HTTP client for the DON gateways.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    wallet: Wallet,
    don_id: String,
}

fn pad_right(value: &str, len: usize) -> Vec<u8> {
    let mut bytes = value.as_bytes().to_vec();
    if bytes.len() < len {
        bytes.resize(len, 0);
    }
    bytes
}

impl GatewayClient {
    pub fn new(wallet: Wallet, don_id: &str, request_timeout: Duration) -> FunctionsResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| FunctionsError::Gateway(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            wallet,
            don_id: don_id.to_string(),
        })
    }

    /// Build the signed `secrets_set` request for `ciphertext`.
    pub async fn build_request(
        &self,
        ciphertext: &[u8],
        args: SecretsSetArgs,
    ) -> FunctionsResult<GatewayRequest> {
        let payload = BASE64.encode(ciphertext);

        let storage_message = serde_json::json!({
            "address": self.wallet.address().to_string().to_lowercase(),
            "slot_id": args.slot_id,
            "payload": payload,
            "version": args.version,
            "expiration": args.expiration_ms,
        });
        let payload_signature = self
            .wallet
            .sign_message_hex(serde_json::to_string(&storage_message)?.as_bytes())
            .await?;

        let body = MessageBody {
            message_id: uuid::Uuid::new_v4().simple().to_string(),
            method: SECRETS_SET_METHOD.to_string(),
            don_id: self.don_id.clone(),
            receiver: String::new(),
            payload: SecretsSetPayload {
                slot_id: args.slot_id,
                version: args.version,
                payload,
                expiration: args.expiration_ms,
                signature: payload_signature,
            },
        };
        let body_signature = self.wallet.sign_message_hex(&Self::signing_bytes(&body)?).await?;

        Ok(GatewayRequest {
            id: uuid::Uuid::new_v4().to_string(),
            jsonrpc: "2.0".to_string(),
            method: SECRETS_SET_METHOD.to_string(),
            params: GatewayParams {
                body,
                signature: body_signature,
            },
        })
    }

    /// Bytes covered by the message signature: fixed-width header fields
    /// followed by the payload JSON.
    pub fn signing_bytes(body: &MessageBody) -> FunctionsResult<Vec<u8>> {
        let mut bytes = Vec::new();
        bytes.extend(pad_right(&body.message_id, MESSAGE_ID_MAX_LEN));
        bytes.extend(pad_right(&body.method, METHOD_MAX_LEN));
        bytes.extend(pad_right(&body.don_id, DON_ID_MAX_LEN));
        bytes.extend(pad_right(&body.receiver, RECEIVER_LEN));
        bytes.extend(serde_json::to_vec(&body.payload)?);
        Ok(bytes)
    }

    /// Send `request` to the gateways in order and report the first answer.
    pub async fn send(
        &self,
        request: &GatewayRequest,
        gateway_urls: &[String],
    ) -> FunctionsResult<UploadResult> {
        let mut failures = Vec::new();
        for url in gateway_urls {
            match self.post(url, request).await {
                Ok(response) => {
                    let mut result = Self::summarize(response);
                    result.version = Some(request.params.body.payload.version.to_string());
                    result.gateway_url = Some(url.clone());
                    tracing::info!(
                        gateway = %url,
                        success = result.success,
                        nodes_total = result.nodes_total,
                        nodes_succeeded = result.nodes_succeeded,
                        "Gateway responded"
                    );
                    return Ok(result);
                }
                Err(e) => {
                    tracing::warn!(gateway = %url, error = %e, "Gateway request failed, trying next gateway");
                    failures.push(format!("{}: {}", url, e));
                }
            }
        }
        Err(FunctionsError::Gateway(format!(
            "all {} gateway(s) failed: {}",
            gateway_urls.len(),
            failures.join("; ")
        )))
    }

    async fn post(&self, url: &str, request: &GatewayRequest) -> FunctionsResult<GatewayResponse> {
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| FunctionsError::Gateway(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FunctionsError::Gateway(e.to_string()))?;

        if !status.is_success() {
            return Err(FunctionsError::Gateway(format!(
                "gateway returned status {}: {}",
                status, text
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| FunctionsError::Gateway(format!("unexpected gateway response: {}", e)))
    }

    fn summarize(response: GatewayResponse) -> UploadResult {
        if let Some(error) = response.error {
            return UploadResult {
                success: false,
                error_message: Some(format!("{} (code {})", error.message, error.code)),
                ..Default::default()
            };
        }
        let Some(envelope) = response.result else {
            return UploadResult {
                success: false,
                error_message: Some("gateway response has no result".to_string()),
                ..Default::default()
            };
        };

        let payload = envelope.body.payload;
        let nodes_total = payload.node_responses.len();
        let mut failures = Vec::new();
        for (i, node) in payload.node_responses.iter().enumerate() {
            if !node.body.payload.success {
                let sender = node.body.sender.clone().unwrap_or_else(|| format!("node {}", i));
                let reason = node
                    .body
                    .payload
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string());
                failures.push(format!("{}: {}", sender, reason));
            }
        }
        let nodes_succeeded = nodes_total - failures.len();

        let success = payload.success && nodes_total > 0 && failures.is_empty();
        let error_message = if success {
            None
        } else if let Some(message) = payload.error_message {
            Some(message)
        } else if nodes_total == 0 {
            Some("no node responses".to_string())
        } else {
            Some(failures.join("; "))
        };

        UploadResult {
            success,
            error_message,
            version: None,
            gateway_url: None,
            nodes_total,
            nodes_succeeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn client() -> GatewayClient {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        GatewayClient::new(wallet, "fun-ethereum-sepolia-1", Duration::from_secs(2)).unwrap()
    }

    fn parse(json: &str) -> UploadResult {
        GatewayClient::summarize(serde_json::from_str(json).unwrap())
    }

    #[tokio::test]
    async fn test_build_request_fields() {
        let args = SecretsSetArgs {
            slot_id: 0,
            version: 1_700_000_000,
            expiration_ms: 1_700_086_400_000,
        };
        let request = client().build_request(&[0xde, 0xad], args).await.unwrap();

        assert_eq!(request.method, "secrets_set");
        let body = &request.params.body;
        assert_eq!(body.don_id, "fun-ethereum-sepolia-1");
        assert_eq!(body.receiver, "");
        assert_eq!(body.payload.payload, "3q0=");
        assert_eq!(body.payload.version, 1_700_000_000);
        assert!(request.params.signature.starts_with("0x"));
    }

    #[tokio::test]
    async fn test_body_signature_covers_payload() {
        let args = SecretsSetArgs {
            slot_id: 0,
            version: 1,
            expiration_ms: 2,
        };
        let request = client().build_request(b"x", args).await.unwrap();
        let signed = GatewayClient::signing_bytes(&request.params.body).unwrap();

        let raw = alloy::hex::decode(&request.params.signature).unwrap();
        let signature = alloy::signers::Signature::try_from(raw.as_slice()).unwrap();
        let recovered = signature.recover_address_from_msg(&signed[..]).unwrap();
        assert_eq!(recovered, client().wallet.address());
    }

    #[test]
    fn test_signing_bytes_layout() {
        let body = MessageBody {
            message_id: "abc".to_string(),
            method: "secrets_set".to_string(),
            don_id: "don".to_string(),
            receiver: String::new(),
            payload: SecretsSetPayload {
                slot_id: 0,
                version: 1,
                payload: String::new(),
                expiration: 2,
                signature: String::new(),
            },
        };
        let bytes = GatewayClient::signing_bytes(&body).unwrap();
        let header = MESSAGE_ID_MAX_LEN + METHOD_MAX_LEN + DON_ID_MAX_LEN + RECEIVER_LEN;
        assert_eq!(&bytes[..3], b"abc");
        assert_eq!(&bytes[MESSAGE_ID_MAX_LEN..MESSAGE_ID_MAX_LEN + 11], b"secrets_set");
        assert!(bytes[header..].starts_with(b"{\"slot_id\":0"));
    }

    #[test]
    fn test_all_nodes_succeeded() {
        let result = parse(
            r#"{"jsonrpc":"2.0","id":"1","result":{"body":{"payload":{"success":true,
                "node_responses":[{"body":{"payload":{"success":true}}},{"body":{"payload":{"success":true}}}]}}}}"#,
        );
        assert!(result.success);
        assert_eq!(result.nodes_total, 2);
        assert_eq!(result.nodes_succeeded, 2);
        assert!(result.error_message.is_none());
    }

    #[test]
    fn test_node_failure_is_reported() {
        let result = parse(
            r#"{"result":{"body":{"payload":{"success":true,"node_responses":[
                {"body":{"sender":"0xnode1","payload":{"success":true}}},
                {"body":{"sender":"0xnode2","payload":{"success":false,"error_message":"slot version too old"}}}]}}}}"#,
        );
        assert!(!result.success);
        assert_eq!(result.nodes_succeeded, 1);
        assert_eq!(
            result.error_message.as_deref(),
            Some("0xnode2: slot version too old")
        );
    }

    #[test]
    fn test_rpc_error_is_failure() {
        let result = parse(r#"{"error":{"code":-32600,"message":"invalid signature"}}"#);
        assert!(!result.success);
        assert!(result.error_message.unwrap().contains("invalid signature"));
    }

    #[test]
    fn test_no_node_responses_is_failure() {
        let result = parse(r#"{"result":{"body":{"payload":{"success":true}}}}"#);
        assert!(!result.success);
        assert_eq!(result.error_message.as_deref(), Some("no node responses"));
    }
}
