//! Transfer validation
//!
//! Pure pre-flight checks on a transfer command. All checks are evaluated so
//! the caller sees every violation at once; nothing here performs I/O.

use rust_decimal::Decimal;

use crate::domain::{codes, TransferCommand};

/// Maximum value accepted for a single transfer.
const MAX_TRANSFER_VALUE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Maximum length of the optional description.
const MAX_DESCRIPTION_LEN: usize = 200;

/// A rejected transfer command. `message` lists every violation joined with
/// `"; "`; `code` is the violation's specific code when exactly one check
/// failed, otherwise the umbrella `VALIDATION_ERROR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub message: String,
    pub code: &'static str,
}

/// Validate a transfer command. Deterministic, no side effects.
pub fn validate(command: &TransferCommand) -> Result<(), ValidationFailure> {
    let mut violations: Vec<(&'static str, &'static str)> = Vec::new();

    if command.requisicao_id.trim().is_empty() {
        violations.push(("requisicaoId is required", codes::MISSING_REQUEST_ID));
    }

    if command.conta_origem <= 0 {
        violations.push(("source account must be a valid account number", codes::INVALID_ACCOUNT));
    }

    if command.conta_destino <= 0 {
        violations.push(("destination account must be a valid account number", codes::INVALID_ACCOUNT));
    }

    if command.conta_origem > 0 && command.conta_origem == command.conta_destino {
        violations.push(("source and destination accounts must differ", codes::SAME_ACCOUNT));
    }

    if command.valor <= Decimal::ZERO {
        violations.push(("value must be positive", codes::INVALID_VALUE));
    } else if command.valor > MAX_TRANSFER_VALUE {
        violations.push(("value exceeds the maximum allowed per transfer", codes::VALUE_LIMIT_EXCEEDED));
    }

    if let Some(descricao) = &command.descricao {
        if descricao.chars().count() > MAX_DESCRIPTION_LEN {
            violations.push(("description must be at most 200 characters", codes::INVALID_DESCRIPTION));
        }
    }

    match violations.as_slice() {
        [] => Ok(()),
        [(message, code)] => Err(ValidationFailure {
            message: (*message).to_string(),
            code,
        }),
        many => Err(ValidationFailure {
            message: many
                .iter()
                .map(|(message, _)| *message)
                .collect::<Vec<_>>()
                .join("; "),
            code: codes::VALIDATION_ERROR,
        }),
    }
}
