//! Movement Gateway
//!
//! Wraps one remote account-movement call (debit or credit) behind a typed
//! result. The bearer token is a per-call parameter; the underlying client is
//! never mutated, so caller-specific credentials cannot leak across requests.
//! The gateway performs no retries of its own.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::codes;

/// Leg suffixes appended to the caller's requisicao id, so the remote side
/// can deduplicate each leg independently.
const DEBIT_SUFFIX: &str = "-DEBITO";
const CREDIT_SUFFIX: &str = "-CREDITO";
const REVERSAL_SUFFIX: &str = "-ESTORNO";

/// Direction of a movement on the remote account API wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementDirection {
    #[serde(rename = "C")]
    Credit,
    #[serde(rename = "D")]
    Debit,
}

/// One outbound movement leg, serialized to the remote wire contract
/// `{requisicaoId, numeroConta, valor, tipo}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRequest {
    pub requisicao_id: String,
    pub numero_conta: i64,
    pub valor: Decimal,
    pub tipo: MovementDirection,
}

impl MovementRequest {
    /// Debit leg against the source account.
    pub fn debit(requisicao_id: &str, numero_conta: i64, valor: Decimal) -> Self {
        Self {
            requisicao_id: format!("{requisicao_id}{DEBIT_SUFFIX}"),
            numero_conta,
            valor,
            tipo: MovementDirection::Debit,
        }
    }

    /// Credit leg against the destination account.
    pub fn credit(requisicao_id: &str, numero_conta: i64, valor: Decimal) -> Self {
        Self {
            requisicao_id: format!("{requisicao_id}{CREDIT_SUFFIX}"),
            numero_conta,
            valor,
            tipo: MovementDirection::Credit,
        }
    }

    /// Compensating credit back to the source account, issued when the
    /// credit leg fails after a successful debit.
    pub fn reversal(requisicao_id: &str, numero_conta: i64, valor: Decimal) -> Self {
        Self {
            requisicao_id: format!("{requisicao_id}{REVERSAL_SUFFIX}"),
            numero_conta,
            valor,
            tipo: MovementDirection::Credit,
        }
    }

    pub fn is_debit_leg(&self) -> bool {
        self.requisicao_id.ends_with(DEBIT_SUFFIX)
    }

    pub fn is_credit_leg(&self) -> bool {
        self.requisicao_id.ends_with(CREDIT_SUFFIX)
    }

    pub fn is_reversal_leg(&self) -> bool {
        self.requisicao_id.ends_with(REVERSAL_SUFFIX)
    }
}

/// Outcome of one remote movement leg. Purely a return value; the gateway
/// keeps no side-channel state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementResult {
    pub is_success: bool,
    pub error: Option<String>,
    pub error_code: Option<String>,
}

impl MovementResult {
    pub fn success() -> Self {
        Self {
            is_success: true,
            error: None,
            error_code: None,
        }
    }

    pub fn failure(error: impl Into<String>, error_code: impl Into<String>) -> Self {
        Self {
            is_success: false,
            error: Some(error.into()),
            error_code: Some(error_code.into()),
        }
    }
}

/// Seam between the saga and the remote account service. Implementations
/// must be safe to share across request tasks.
#[async_trait]
pub trait MovementGateway: Send + Sync {
    async fn execute(&self, token: &str, request: &MovementRequest) -> MovementResult;
}

/// Structured error body returned by the account API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    #[serde(default)]
    mensagem: String,
    #[serde(default)]
    tipo: String,
}

/// Gateway backed by the account service's HTTP movement endpoint.
pub struct HttpMovementGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMovementGateway {
    /// Build a gateway with its own client and per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Build a gateway over an existing client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/conta/movimentar", self.base_url)
    }
}

#[async_trait]
impl MovementGateway for HttpMovementGateway {
    async fn execute(&self, token: &str, request: &MovementRequest) -> MovementResult {
        let endpoint = self.endpoint();
        tracing::info!(
            endpoint = %endpoint,
            requisicao_id = %request.requisicao_id,
            numero_conta = request.numero_conta,
            "issuing account movement"
        );

        let response = match self
            .client
            .post(&endpoint)
            .bearer_auth(token)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::error!(requisicao_id = %request.requisicao_id, error = %e, "movement timed out");
                return MovementResult::failure(
                    "timeout while calling the account movement API",
                    codes::TIMEOUT_ERROR,
                );
            }
            Err(e) if e.is_builder() => {
                tracing::error!(requisicao_id = %request.requisicao_id, error = %e, "movement request could not be built");
                return MovementResult::failure(
                    "internal error while calling the account movement API",
                    codes::INTERNAL_ERROR,
                );
            }
            Err(e) => {
                tracing::error!(requisicao_id = %request.requisicao_id, error = %e, "movement transport failure");
                return MovementResult::failure(
                    "communication failure with the account movement API",
                    codes::NETWORK_ERROR,
                );
            }
        };

        if response.status().is_success() {
            tracing::info!(requisicao_id = %request.requisicao_id, "movement accepted");
            return MovementResult::success();
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            requisicao_id = %request.requisicao_id,
            status = %status,
            body = %body,
            "movement rejected by account API"
        );

        match serde_json::from_str::<RemoteErrorBody>(&body) {
            Ok(remote) if !remote.tipo.trim().is_empty() => {
                let mensagem = if remote.mensagem.trim().is_empty() {
                    "movement rejected by the account API".to_string()
                } else {
                    remote.mensagem
                };
                MovementResult::failure(mensagem, remote.tipo)
            }
            Ok(remote) if !remote.mensagem.trim().is_empty() => {
                MovementResult::failure(remote.mensagem, codes::MOVEMENT_ERROR)
            }
            _ => MovementResult::failure(
                "account movement API returned an unreadable error",
                codes::API_ERROR,
            ),
        }
    }
}

/// Scripted gateway for saga and router tests.
#[cfg(test)]
pub mod mock {
    use std::sync::Mutex;

    use super::*;

    pub struct MockGateway {
        calls: Mutex<Vec<MovementRequest>>,
        debit: Mutex<MovementResult>,
        credit: Mutex<MovementResult>,
        reversal: Mutex<MovementResult>,
    }

    impl MockGateway {
        /// All legs succeed until told otherwise.
        pub fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                debit: Mutex::new(MovementResult::success()),
                credit: Mutex::new(MovementResult::success()),
                reversal: Mutex::new(MovementResult::success()),
            }
        }

        pub fn fail_debit(&self, error: &str, code: &str) {
            *self.debit.lock().unwrap() = MovementResult::failure(error, code);
        }

        pub fn fail_credit(&self, error: &str, code: &str) {
            *self.credit.lock().unwrap() = MovementResult::failure(error, code);
        }

        pub fn fail_reversal(&self, error: &str, code: &str) {
            *self.reversal.lock().unwrap() = MovementResult::failure(error, code);
        }

        pub fn calls(&self) -> Vec<MovementRequest> {
            self.calls.lock().unwrap().clone()
        }

        pub fn reversal_calls(&self) -> Vec<MovementRequest> {
            self.calls().into_iter().filter(MovementRequest::is_reversal_leg).collect()
        }
    }

    #[async_trait]
    impl MovementGateway for MockGateway {
        async fn execute(&self, _token: &str, request: &MovementRequest) -> MovementResult {
            self.calls.lock().unwrap().push(request.clone());
            if request.is_debit_leg() {
                self.debit.lock().unwrap().clone()
            } else if request.is_credit_leg() {
                self.credit.lock().unwrap().clone()
            } else {
                self.reversal.lock().unwrap().clone()
            }
        }
    }
}
