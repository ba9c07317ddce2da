//! Appointment lifecycle state machine.
//!
//! # Design
//! The backend is authoritative for status transitions, but the client keeps
//! a closed enum and a transition function anyway so an impossible decision
//! (responding to an already-answered request) is rejected locally instead of
//! producing a request that can only fail. `Confirmed` and `Cancelled` are
//! terminal — no operation transitions out of them.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Where an appointment is in its lifecycle. A newly created request starts
/// in `Requested` (the server's "PENDENTE").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Requested,
    Confirmed,
    Cancelled,
}

/// The volunteer's answer to a pending request, with the wire values the
/// `responder` endpoint expects in `novo_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "CONFIRMADO")]
    Confirmado,
    #[serde(rename = "CANCELADO")]
    Cancelado,
}

/// Body of `PATCH /agendamentos/{id}/responder`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondRequest {
    pub novo_status: Decision,
}

impl AppointmentStatus {
    /// Apply a volunteer decision. Only `Requested` appointments accept one;
    /// any other source state is rejected without building a request.
    pub fn respond(self, decision: Decision) -> Result<AppointmentStatus, ApiError> {
        match self {
            AppointmentStatus::Requested => Ok(match decision {
                Decision::Confirmado => AppointmentStatus::Confirmed,
                Decision::Cancelado => AppointmentStatus::Cancelled,
            }),
            other => Err(ApiError::Validation(format!(
                "agendamento já está {other} e não aceita resposta"
            ))),
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, AppointmentStatus::Requested)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AppointmentStatus::Requested => "PENDENTE",
            AppointmentStatus::Confirmed => "CONFIRMADO",
            AppointmentStatus::Cancelled => "CANCELADO",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_accepts_both_decisions() {
        assert_eq!(
            AppointmentStatus::Requested.respond(Decision::Confirmado).unwrap(),
            AppointmentStatus::Confirmed
        );
        assert_eq!(
            AppointmentStatus::Requested.respond(Decision::Cancelado).unwrap(),
            AppointmentStatus::Cancelled
        );
    }

    #[test]
    fn terminal_states_reject_decisions() {
        let err = AppointmentStatus::Confirmed
            .respond(Decision::Confirmado)
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = AppointmentStatus::Cancelled
            .respond(Decision::Confirmado)
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn terminal_flags() {
        assert!(!AppointmentStatus::Requested.is_terminal());
        assert!(AppointmentStatus::Confirmed.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
    }

    #[test]
    fn decision_uses_wire_values() {
        assert_eq!(
            serde_json::to_string(&Decision::Confirmado).unwrap(),
            r#""CONFIRMADO""#
        );
        assert_eq!(
            serde_json::to_string(&Decision::Cancelado).unwrap(),
            r#""CANCELADO""#
        );
    }
}
