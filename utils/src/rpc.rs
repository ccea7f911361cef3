use crate::error::{PollStatus, RpcError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GET_BLOCK: &str = "eth_blockNumber";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'a str,
    method: &'a str,
    params: &'a [serde_json::Value],
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<String>,
    error: Option<JsonRpcErrorObject>,
}

/// Outcome of one poll. Failures never escape as errors past this point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollResult {
    Success(u64),
    Failure { reason: String, status: PollStatus },
}

impl From<Result<u64, RpcError>> for PollResult {
    fn from(value: Result<u64, RpcError>) -> Self {
        match value {
            Ok(height) => PollResult::Success(height),
            Err(err) => PollResult::Failure {
                reason: err.to_string(),
                status: err.status(),
            },
        }
    }
}

/// Decodes a quantity such as `0x1b4`. The prefix is optional.
pub fn parse_block_number(value: &str) -> Result<u64, RpcError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    u64::from_str_radix(digits, 16).map_err(|source| RpcError::InvalidHex {
        value: value.to_string(),
        source,
    })
}

pub struct RpcClient {
    client: reqwest::Client,
    url: String,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Result<Self, RpcError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(RpcError::Transport)?;

        Ok(RpcClient {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn get_block_number(&self) -> Result<u64, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: GET_BLOCK,
            params: &[],
            id: 1,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RpcError::from_reqwest(&self.url, e))?;

        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::from_reqwest(&self.url, e))?;

        if let Some(err) = body.error {
            return Err(RpcError::Node {
                code: err.code,
                message: err.message,
            });
        }

        let result = body.result.ok_or(RpcError::MissingResult)?;
        parse_block_number(&result)
    }

    pub async fn poll(&self) -> PollResult {
        self.get_block_number().await.into()
    }
}
