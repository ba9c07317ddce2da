//! Domain DTOs for the tutoring API.
//!
//! # Design
//! Field names follow the backend's wire format (Portuguese, snake_case), so
//! the structs serialize without rename ceremony except for the role and
//! status enums, whose wire values are uppercase. The DTOs are defined
//! independently from the mock-server crate; integration tests catch any
//! schema drift between the two.

use serde::{Deserialize, Serialize};

/// Profile kind fixed at registration. Determines which workflow branch the
/// client exposes: learners search and request lessons, volunteers manage
/// offers and answer requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "ALUNO")]
    Aluno,
    #[serde(rename = "VOLUNTARIO")]
    Voluntario,
    #[serde(rename = "GESTOR")]
    Gestor,
}

/// The authenticated user's profile as returned by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub nome: String,
    pub tipo_perfil: Role,
}

/// Credentials for `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

/// Successful login payload: the bearer token plus the profile to mirror in
/// the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub usuario: User,
}

/// Request payload for `POST /usuarios/registro`.
///
/// `id_escola` is serialized even when `None` — the backend expects an
/// explicit `null` for users not linked to a school.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub nome: String,
    pub email: String,
    pub senha: String,
    pub telefone: String,
    pub tipo_perfil: Role,
    pub id_escola: Option<i64>,
}

/// A volunteer's standing teaching availability.
///
/// `nome_voluntario` is present in search results (learners need to see who
/// teaches) and absent in the owner's own listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offer {
    pub id: i64,
    pub disciplina: String,
    pub dias_disponiveis: String,
    pub horario_inicio: String,
    pub horario_fim: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome_voluntario: Option<String>,
}

/// Request payload for `POST /ofertas`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOffer {
    pub disciplina: String,
    pub dias_disponiveis: String,
    pub horario_inicio: String,
    pub horario_fim: String,
}

/// A confirmed lesson as listed by `GET /agendamentos/agenda`.
///
/// The backend fills in the counterpart's name for the requesting user:
/// `nome_aluno` when a volunteer asks, `nome_voluntario` when a learner does.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub id_agendamento: i64,
    pub data_aula: String,
    pub horario_inicio: String,
    pub horario_fim: String,
    pub disciplina: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome_aluno: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome_voluntario: Option<String>,
}

impl Appointment {
    /// Name of the other participant from the viewer's perspective: a
    /// volunteer sees the learner, everyone else sees the volunteer.
    pub fn counterpart(&self, viewer: Role) -> Option<&str> {
        match viewer {
            Role::Voluntario => self.nome_aluno.as_deref(),
            _ => self.nome_voluntario.as_deref(),
        }
    }
}

/// A request awaiting the volunteer's decision, as listed by
/// `GET /agendamentos/pendentes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingRequest {
    pub id_agendamento: i64,
    pub data_aula: String,
    pub nome_aluno: String,
    pub disciplina: String,
}

/// Request payload for `POST /agendamentos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointment {
    pub id_oferta: i64,
    pub data_aula: String,
}
