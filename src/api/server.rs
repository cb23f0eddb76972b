//! API Server Module
//!
//! This module implements a JSON-RPC server exposing the account's entry points.
//! Every request names its caller explicitly; the account decides whether that
//! caller may use the entry point.

use crate::{
    account::Account,
    config::Config,
    error::GatewayError,
    Call, Operation, ValidationResult,
};
use axum::{Router, routing::post, Json, extract::State};
use ethers::types::{Address, H256, U256};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn, error};

/// Shared application state that is accessible across all request handlers
/// 
/// Holds the handle of the account served by this process. The handle is
/// cheap to clone and serializes all entry points internally.
#[derive(Clone)]
pub struct AppState {
    /// The account every request is routed to
    account: Account,
}

/// The main API server struct
/// 
/// Encapsulates the server configuration and application state.
pub struct Server {
    /// Full gateway configuration (only the `api` section is read here)
    config: Config,
    /// State shared with every request handler
    state: AppState,
}

impl Server {
    /// Creates a new API server instance
    /// 
    /// # Arguments
    /// * `config` - Gateway configuration (host, port, etc.)
    /// * `account` - The account handle requests are served from
    pub fn new(config: Config, account: Account) -> Self {
        // Bundle the account into the state handed to every handler
        Self {
            config,
            state: AppState { account },
        }
    }

    /// Router with the single JSON-RPC endpoint at "/"
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Starts the API server and begins listening for incoming requests
    ///
    /// This method:
    /// 1. Creates an Axum router with a single POST endpoint at "/"
    /// 2. Binds the router to the configured host and port
    /// 3. Starts serving requests asynchronously
    ///
    /// # Returns
    /// `Ok(())` if the server shuts down cleanly, or an error if binding fails
    pub async fn start(self) -> anyhow::Result<()> {
        // Create the router with the JSON-RPC endpoint
        let app = self.router();

        // Format the listening address from config
        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);
        info!("API server listening on {}", addr);

        // Bind to the TCP address and start serving
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handle_rpc))
        .with_state(state)
}

/// JSON-RPC 2.0 request structure
/// 
/// - `jsonrpc`: Protocol version (should be "2.0")
/// - `method`: The RPC method to call (e.g., "account_validateOperation")
/// - `params`: Method parameters, an object per method
/// - `id`: Request identifier for matching responses
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Value,
    id: Value,
}

/// JSON-RPC 2.0 response structure
///
/// Either `result` or `error` will be populated, but not both:
/// - `jsonrpc`: Protocol version ("2.0")
/// - `result`: Successful result of the method
/// - `error`: Error information if the request failed
/// - `id`: Request identifier matching the original request
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
    id: Value,
}

/// JSON-RPC error object
///
/// Codes used:
/// - `-32601` method not found, `-32602` invalid params, `-32603` storage failure
/// - `-32001` unauthorized caller, `-32002` external call failed (`data` holds the raw result)
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcResponse {
    fn ok(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    fn err(id: Value, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError { code, message, data }),
            id,
        }
    }
}

impl From<&GatewayError> for JsonRpcError {
    fn from(e: &GatewayError) -> Self {
        let (code, data) = match e {
            GatewayError::UnauthorizedCaller { .. } => (-32001, None),
            GatewayError::ExternalCallFailed(raw) => (-32002, Some(json!(raw))),
            GatewayError::ZeroIdentity(_) | GatewayError::Storage(_) => (-32603, None),
        };
        Self { code, message: e.to_string(), data }
    }
}

/// Parameters of `account_validateOperation`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateParams {
    /// Identity making the request; must be the coordinator
    caller: Address,
    operation: Operation,
    /// Digest computed by the coordinator, before any signing prefix
    digest: H256,
    /// Prefund owed to the coordinator, zero when omitted
    #[serde(default)]
    missing_funds: U256,
}

/// Parameters of `account_execute`: the caller plus the call fields inline
#[derive(Debug, Deserialize)]
struct ExecuteParams {
    caller: Address,
    #[serde(flatten)]
    call: Call,
}

/// Parameters of `account_executeBatch`
#[derive(Debug, Deserialize)]
struct ExecuteBatchParams {
    caller: Address,
    /// Calls forwarded in order, all or nothing
    calls: Vec<Call>,
}

/// Parameters of `account_getNonce`; omitted fields default to the account's own stream
#[derive(Debug, Default, Deserialize)]
struct NonceParams {
    account: Option<Address>,
    key: Option<U256>,
}

/// Parameters of `account_balance`; defaults to the account itself
#[derive(Debug, Default, Deserialize)]
struct BalanceParams {
    address: Option<Address>,
}

/// Parameters of `account_receive`
#[derive(Debug, Deserialize)]
struct ReceiveParams {
    /// Sender, informational only
    from: Address,
    value: U256,
}

/// Validation outcome returned to the coordinator
/// 
/// - `status`: "success" or "failed"
/// - `validationData`: packed word, 0 on success and 1 on failure
/// - `timestamp`: Unix seconds at which the result was produced
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationReceipt {
    status: ValidationResult,
    validation_data: U256,
    timestamp: i64,
}

type RpcResult = Result<Value, JsonRpcError>;

/// Main RPC request handler
///
/// Routes the request to the handler for its method name.
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    info!("Received RPC request: {}", request.method);

    let account = &state.account;
    let params = request.params;
    let outcome = match request.method.as_str() {
        "account_validateOperation" => validate_operation(account, params).await,
        "account_execute" => execute(account, params).await,
        "account_executeBatch" => execute_batch(account, params).await,
        "account_getNonce" => get_nonce(account, params).await,
        "account_coordinator" => Ok(json!(account.coordinator_address().await)),
        "account_owner" => Ok(json!(account.owner().await)),
        "account_balance" => balance(account, params).await,
        "account_receive" => receive(account, params).await,
        _ => Err(JsonRpcError {
            code: -32601,
            message: "Method not found".to_string(),
            data: None,
        }),
    };

    Json(match outcome {
        Ok(result) => JsonRpcResponse::ok(request.id, result),
        Err(e) => JsonRpcResponse::err(request.id, e.code, e.message, e.data),
    })
}

/// Deserialize method parameters; `null` reads as the type's empty form
fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, JsonRpcError> {
    let params = if params.is_null() { json!({}) } else { params };
    serde_json::from_value(params).map_err(|e| {
        error!("Failed to deserialize params: {}", e);
        JsonRpcError {
            code: -32602,
            message: format!("Invalid params: {}", e),
            data: None,
        }
    })
}

fn gateway_error(e: GatewayError) -> JsonRpcError {
    warn!("Request failed: {}", e);
    JsonRpcError::from(&e)
}

async fn validate_operation(account: &Account, params: Value) -> RpcResult {
    let params: ValidateParams = parse_params(params)?;

    let status = account
        .validate(params.caller, &params.operation, params.digest, params.missing_funds)
        .await
        .map_err(gateway_error)?;

    let receipt = ValidationReceipt {
        status,
        validation_data: status.code(),
        timestamp: chrono::Utc::now().timestamp(),
    };
    Ok(json!(receipt))
}

async fn execute(account: &Account, params: Value) -> RpcResult {
    let params: ExecuteParams = parse_params(params)?;
    account.execute(params.caller, &params.call).await.map_err(gateway_error)?;
    Ok(Value::Null)
}

async fn execute_batch(account: &Account, params: Value) -> RpcResult {
    let params: ExecuteBatchParams = parse_params(params)?;
    account.execute_batch(params.caller, &params.calls).await.map_err(gateway_error)?;
    Ok(Value::Null)
}

async fn get_nonce(account: &Account, params: Value) -> RpcResult {
    let params: NonceParams = parse_params(params)?;

    let nonce = match (params.account, params.key) {
        (None, None) => account.nonce().await,
        (target, key) => {
            let target = match target {
                Some(target) => target,
                None => account.address().await,
            };
            let key = match key {
                Some(key) => key,
                None => account.nonce_key().await,
            };
            account.current_nonce(target, key).await
        }
    };
    Ok(json!(nonce))
}

async fn balance(account: &Account, params: Value) -> RpcResult {
    let params: BalanceParams = parse_params(params)?;
    let address = match params.address {
        Some(address) => address,
        None => account.address().await,
    };
    Ok(json!(account.balance_of(address).await))
}

async fn receive(account: &Account, params: Value) -> RpcResult {
    let params: ReceiveParams = parse_params(params)?;
    account.receive(params.from, params.value).await;
    Ok(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountEngine;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use ethers::signers::{LocalWallet, Signer};
    use ethers::types::Bytes;
    use tower::ServiceExt;

    const OWNER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const CONFIG: &str = r#"
        [account]
        address = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
        owner = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        coordinator = "0xcccccccccccccccccccccccccccccccccccccccc"
        chain_id = 31337
        initial_balance = "0x3e8"

        [execution]
        reverting_destinations = ["0xdfdfdfdfdfdfdfdfdfdfdfdfdfdfdfdfdfdfdfdf"]

        [api]
        host = "127.0.0.1"
        port = 0

        [database]
        url = "sqlite::memory:"
    "#;

    fn app() -> (Router, Config) {
        let config = Config::parse(CONFIG).unwrap();
        let account = Account::new(AccountEngine::from_config(&config).unwrap());
        (Server::new(config.clone(), account).router(), config)
    }

    async fn call(app: &Router, method: &str, params: Value) -> Value {
        let body = json!({ "jsonrpc": "2.0", "method": method, "params": params, "id": 1 });
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validate_then_replay() {
        let (app, config) = app();
        let owner: LocalWallet = OWNER_KEY.parse().unwrap();
        let coordinator = config.account.coordinator;

        let mut operation = Operation {
            sender: config.account.address,
            ..Default::default()
        };
        let digest = operation.hash(coordinator, config.account.chain_id);
        let signature = owner.sign_hash(config.signature.scheme.apply(digest)).unwrap();
        operation.signature = Bytes::from(signature.to_vec());

        let params = json!({
            "caller": coordinator,
            "operation": operation,
            "digest": digest,
            "missingFunds": "0x64",
        });

        let first = call(&app, "account_validateOperation", params.clone()).await;
        assert_eq!(first["result"]["status"], "success");
        assert_eq!(first["result"]["validationData"], "0x0");

        let replay = call(&app, "account_validateOperation", params).await;
        assert_eq!(replay["result"]["status"], "failed");
        assert_eq!(replay["result"]["validationData"], "0x1");

        let nonce = call(&app, "account_getNonce", Value::Null).await;
        assert_eq!(nonce["result"], "0x1");

        let paid = call(&app, "account_balance", json!({ "address": coordinator })).await;
        assert_eq!(paid["result"], "0x64");
    }

    #[tokio::test]
    async fn test_execute_by_stranger_is_unauthorized() {
        let (app, _) = app();

        let response = call(&app, "account_execute", json!({
            "caller": Address::repeat_byte(0x0b),
            "destination": Address::repeat_byte(0xd0),
            "value": "0x1",
            "payload": "0x",
        })).await;

        assert_eq!(response["error"]["code"], -32001);
    }

    #[tokio::test]
    async fn test_execute_failure_carries_raw_data() {
        let (app, config) = app();

        let response = call(&app, "account_execute", json!({
            "caller": config.account.owner,
            "destination": Address::repeat_byte(0xdf),
            "value": "0x1",
        })).await;

        assert_eq!(response["error"]["code"], -32002);
        assert_eq!(response["error"]["data"], "0x");

        let balance = call(&app, "account_balance", Value::Null).await;
        assert_eq!(balance["result"], "0x3e8");
    }

    #[tokio::test]
    async fn test_execute_batch() {
        let (app, config) = app();
        let dest = Address::repeat_byte(0xd0);

        let ok = call(&app, "account_executeBatch", json!({
            "caller": config.account.coordinator,
            "calls": [
                { "destination": dest, "value": "0x64", "payload": "0x01" },
                { "destination": dest, "value": "0x32" },
            ],
        })).await;
        assert!(ok["error"].is_null());
        assert_eq!(ok["result"], Value::Null);

        let delivered = call(&app, "account_balance", json!({ "address": dest })).await;
        assert_eq!(delivered["result"], "0x96");

        let reverted = call(&app, "account_executeBatch", json!({
            "caller": config.account.owner,
            "calls": [
                { "destination": dest, "value": "0x1" },
                { "destination": Address::repeat_byte(0xdf), "value": "0x0" },
            ],
        })).await;
        assert_eq!(reverted["error"]["code"], -32002);

        let unchanged = call(&app, "account_balance", json!({ "address": dest })).await;
        assert_eq!(unchanged["result"], "0x96");
        let remaining = call(&app, "account_balance", Value::Null).await;
        assert_eq!(remaining["result"], "0x352");
    }

    #[tokio::test]
    async fn test_read_only_methods() {
        let (app, config) = app();

        let coordinator = call(&app, "account_coordinator", Value::Null).await;
        assert_eq!(coordinator["result"], json!(config.account.coordinator));

        let owner = call(&app, "account_owner", Value::Null).await;
        assert_eq!(owner["result"], json!(config.account.owner));

        let nonce = call(&app, "account_getNonce", json!({ "account": Address::repeat_byte(1), "key": "0x0" })).await;
        assert_eq!(nonce["result"], "0x0");
    }

    #[tokio::test]
    async fn test_receive_and_unknown_method() {
        let (app, _) = app();

        let received = call(&app, "account_receive", json!({ "from": Address::repeat_byte(2), "value": "0xa" })).await;
        assert!(received["error"].is_null());

        let balance = call(&app, "account_balance", Value::Null).await;
        assert_eq!(balance["result"], "0x3f2");

        let unknown = call(&app, "eth_chainId", Value::Null).await;
        assert_eq!(unknown["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_invalid_params() {
        let (app, _) = app();
        let response = call(&app, "account_execute", json!({ "caller": "not-an-address" })).await;
        assert_eq!(response["error"]["code"], -32602);
    }
}
