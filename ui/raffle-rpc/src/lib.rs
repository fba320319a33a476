//! Blocking JSON-RPC client for an EVM node.
//!
//! Only the handful of `eth_*` methods the raffle front-end needs are
//! wrapped. Every call is a single HTTP POST; there is no batching and no
//! retry. The client is blocking, so callers on an async runtime must run it
//! inside `spawn_blocking`.

use std::time::Duration;

use ethers_core::types::{Address, Bytes, H256, U256, U64};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// JSON-RPC "method not found".
pub const METHOD_NOT_FOUND: i64 = -32601;
/// JSON-RPC "invalid request".
pub const INVALID_REQUEST: i64 = -32600;
/// Generic server error used by geth-style nodes.
pub const SERVER_ERROR: i64 = -32000;

const UNSUPPORTED_HINTS: [&str; 4] = ["does not exist", "not found", "not supported", "not available"];

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl RpcError {
    /// The node does not implement the requested method. Besides the
    /// standard code, some nodes answer with -32600 or -32000 and say so in
    /// the message.
    pub fn is_method_unsupported(&self) -> bool {
        let Self::Rpc { code, message } = self else {
            return false;
        };
        match *code {
            METHOD_NOT_FOUND => true,
            INVALID_REQUEST | SERVER_ERROR => {
                let message = message.to_ascii_lowercase();
                UNSUPPORTED_HINTS.iter().any(|hint| message.contains(hint))
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Parameters for `eth_call` and `eth_sendTransaction`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
}

/// Outcome of a mined transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxStatus {
    Success,
    Reverted,
}

#[derive(Deserialize)]
struct ReceiptFields {
    status: Option<U64>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct RpcClient {
    http: reqwest::blocking::Client,
    url: reqwest::Url,
    next_id: u64,
}

impl RpcClient {
    pub fn new(url: &str) -> Result<Self, RpcError> {
        let url = reqwest::Url::parse(url).map_err(|e| RpcError::InvalidUrl(e.to_string()))?;
        let http = reqwest::blocking::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            url,
            next_id: 1,
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Send one request and return its `result` member.
    pub fn request(&mut self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id;
        self.next_id += 1;

        tracing::trace!(method, id, "rpc request");
        let body = request_body(id, method, params);
        let response: Value = self
            .http
            .post(self.url.clone())
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        parse_response(response)
    }

    pub fn chain_id(&mut self) -> Result<u64, RpcError> {
        let id: U64 = decode(self.request("eth_chainId", json!([]))?)?;
        Ok(id.as_u64())
    }

    pub fn get_code(&mut self, address: Address) -> Result<Bytes, RpcError> {
        decode(self.request("eth_getCode", json!([address, "latest"]))?)
    }

    pub fn call(&mut self, call: &CallRequest) -> Result<Bytes, RpcError> {
        decode(self.request("eth_call", json!([call, "latest"]))?)
    }

    /// Accounts the endpoint will sign for. Tries `eth_requestAccounts`
    /// first and falls back to `eth_accounts` on nodes that lack it.
    pub fn accounts(&mut self) -> Result<Vec<Address>, RpcError> {
        match self.request("eth_requestAccounts", json!([])) {
            Ok(v) => decode(v),
            Err(e) if e.is_method_unsupported() => decode(self.request("eth_accounts", json!([]))?),
            Err(e) => Err(e),
        }
    }

    pub fn send_transaction(&mut self, tx: &CallRequest) -> Result<H256, RpcError> {
        decode(self.request("eth_sendTransaction", json!([tx]))?)
    }

    /// `None` while the transaction is still pending.
    pub fn transaction_status(&mut self, hash: H256) -> Result<Option<TxStatus>, RpcError> {
        parse_receipt(self.request("eth_getTransactionReceipt", json!([hash]))?)
    }
}

// ---------------------------------------------------------------------------
// Internal JSON helpers
// ---------------------------------------------------------------------------

fn request_body(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

fn parse_response(mut response: Value) -> Result<Value, RpcError> {
    if let Some(err) = response.get("error") {
        let code = err["code"].as_i64().unwrap_or_default();
        let message = err["message"]
            .as_str()
            .unwrap_or("unknown RPC error")
            .to_string();
        return Err(RpcError::Rpc { code, message });
    }
    match response.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(RpcError::Malformed("missing result".into())),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, RpcError> {
    Ok(serde_json::from_value(value)?)
}

fn parse_receipt(result: Value) -> Result<Option<TxStatus>, RpcError> {
    if result.is_null() {
        return Ok(None);
    }
    let receipt: ReceiptFields = decode(result)?;
    match receipt.status.map(|s| s.as_u64()) {
        Some(1) => Ok(Some(TxStatus::Success)),
        Some(0) => Ok(Some(TxStatus::Reverted)),
        Some(other) => Err(RpcError::Malformed(format!("receipt status {other}"))),
        None => Err(RpcError::Malformed("receipt without status".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = request_body(7, "eth_chainId", json!([]));
        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["id"], 7);
        assert_eq!(body["method"], "eth_chainId");
        assert_eq!(body["params"], json!([]));
    }

    #[test]
    fn test_parse_response_result() {
        let v = parse_response(json!({"jsonrpc": "2.0", "id": 1, "result": "0xa869"})).unwrap();
        assert_eq!(v, json!("0xa869"));
    }

    #[test]
    fn test_parse_response_error_object() {
        let err = parse_response(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32000, "message": "execution reverted"}
        }))
        .unwrap_err();
        match err {
            RpcError::Rpc { code, message } => {
                assert_eq!(code, -32000);
                assert_eq!(message, "execution reverted");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_response_missing_result() {
        let err = parse_response(json!({"jsonrpc": "2.0", "id": 1})).unwrap_err();
        assert!(matches!(err, RpcError::Malformed(_)));
    }

    #[test]
    fn test_method_not_found() {
        let err = parse_response(json!({
            "id": 1,
            "error": {"code": -32601, "message": "the method eth_requestAccounts does not exist"}
        }))
        .unwrap_err();
        assert!(err.is_method_unsupported());
    }

    #[test]
    fn test_method_unsupported_by_message() {
        let unsupported = |code: i64, message: &str| {
            RpcError::Rpc {
                code,
                message: message.to_string(),
            }
            .is_method_unsupported()
        };
        assert!(unsupported(-32000, "the method eth_requestAccounts does not exist/is not available"));
        assert!(unsupported(-32600, "Method not supported"));
        assert!(!unsupported(-32000, "execution reverted"));
        assert!(!unsupported(-32602, "method not found"));
        assert!(!RpcError::Malformed("missing result".into()).is_method_unsupported());
    }

    #[test]
    fn test_receipt_status() {
        assert_eq!(parse_receipt(Value::Null).unwrap(), None);
        assert_eq!(
            parse_receipt(json!({"status": "0x1", "blockNumber": "0x10"})).unwrap(),
            Some(TxStatus::Success)
        );
        assert_eq!(
            parse_receipt(json!({"status": "0x0"})).unwrap(),
            Some(TxStatus::Reverted)
        );
        assert!(parse_receipt(json!({"root": "0x00"})).is_err());
    }

    #[test]
    fn test_call_request_serialization() {
        let to: Address = "0x5fbdb2315678afecb367f032d93f642f64180aa3".parse().unwrap();
        let call = CallRequest {
            to,
            data: Bytes::from(vec![0x12, 0x34]),
            ..Default::default()
        };
        let v = serde_json::to_value(&call).unwrap();
        assert_eq!(v["to"], "0x5fbdb2315678afecb367f032d93f642f64180aa3");
        assert_eq!(v["data"], "0x1234");
        assert!(v.get("from").is_none());
        assert!(v.get("value").is_none());

        let paid = CallRequest {
            value: Some(U256::exp10(18)),
            ..call
        };
        let v = serde_json::to_value(&paid).unwrap();
        assert_eq!(v["value"], "0xde0b6b3a7640000");
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            RpcClient::new("not a url"),
            Err(RpcError::InvalidUrl(_))
        ));
    }
}
