//! Authenticated request builder and response parser for the tutoring API.
//!
//! # Design
//! `ApiClient` owns the `SessionStore` and is the only component that reads
//! it. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`; the
//! caller executes the actual round-trip in between. Every `build_*` samples
//! the token fresh from the store, so a logout between two calls is always
//! respected by the next request.
//!
//! Input validation runs inside `build_*`: a request that fails it is never
//! constructed. Mutating operations return `()` from their `parse_*` — the
//! client holds no optimistic copy of server state, callers re-fetch the
//! affected list after a successful write.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::session::SessionStore;
use crate::status::{Decision, RespondRequest};
use crate::types::{
    Appointment, CreateAppointment, CreateOffer, LoginRequest, LoginResponse, Offer,
    PendingRequest, RegisterRequest,
};
use crate::validate;

/// Gateway to the tutoring backend: builds authenticated `HttpRequest`
/// values and parses `HttpResponse` values without touching the network.
#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// `session` is owned by the client from here on; use [`ApiClient::session`]
    /// to inspect it and [`ApiClient::logout`] to invalidate it.
    pub fn new(base_url: &str, session: SessionStore) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Drop the persisted session. Requests built afterwards carry no
    /// `Authorization` header.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session.clear()
    }

    /// Headers for one request, with the token sampled fresh from the store.
    fn headers(&self, has_body: bool) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if has_body {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = self.session.token() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        headers
    }

    fn get(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{path}", self.base_url),
            headers: self.headers(false),
            body: None,
        }
    }

    fn post(&self, path: &str, payload: &impl serde::Serialize) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{path}", self.base_url),
            headers: self.headers(true),
            body: Some(body),
        })
    }

    // --- session ---

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, ApiError> {
        validate::require_filled("email", &input.email)?;
        validate::require_filled("senha", &input.senha)?;
        self.post("/login", input)
    }

    /// On success the token/profile pair is persisted before returning, so
    /// the very next `build_*` call is already authenticated.
    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginResponse, ApiError> {
        check_status(&response, 200)?;
        let out: LoginResponse = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        self.session.set(&out.token, &out.usuario)?;
        Ok(out)
    }

    pub fn build_register(&self, input: &RegisterRequest) -> Result<HttpRequest, ApiError> {
        validate::require_filled("nome", &input.nome)?;
        validate::require_filled("email", &input.email)?;
        validate::require_filled("senha", &input.senha)?;
        validate::require_filled("telefone", &input.telefone)?;
        self.post("/usuarios/registro", input)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 201)
    }

    // --- offers ---

    pub fn build_create_offer(&self, input: &CreateOffer) -> Result<HttpRequest, ApiError> {
        validate::require_filled("disciplina", &input.disciplina)?;
        validate::require_filled("dias_disponiveis", &input.dias_disponiveis)?;
        validate::require_time("horario_inicio", &input.horario_inicio)?;
        validate::require_time("horario_fim", &input.horario_fim)?;
        self.post("/ofertas", input)
    }

    pub fn parse_create_offer(&self, response: HttpResponse) -> Result<Offer, ApiError> {
        check_status(&response, 201)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn build_search_offers(&self, disciplina: &str) -> Result<HttpRequest, ApiError> {
        validate::require_filled("disciplina", disciplina)?;
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("disciplina", disciplina.trim())
            .finish();
        Ok(self.get(&format!("/ofertas/busca?{query}")))
    }

    /// An empty list is a valid outcome (nothing offered for that subject),
    /// distinct from a transport or backend failure.
    pub fn parse_search_offers(&self, response: HttpResponse) -> Result<Vec<Offer>, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn build_list_my_offers(&self) -> HttpRequest {
        self.get("/ofertas/meus-registros")
    }

    pub fn parse_list_my_offers(&self, response: HttpResponse) -> Result<Vec<Offer>, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    // --- appointments ---

    pub fn build_create_appointment(
        &self,
        input: &CreateAppointment,
    ) -> Result<HttpRequest, ApiError> {
        validate::require_date("data_aula", &input.data_aula)?;
        self.post("/agendamentos", input)
    }

    /// The created appointment is not held client-side; the pending and
    /// agenda views are re-fetched when next shown.
    pub fn parse_create_appointment(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 201)
    }

    pub fn build_list_agenda(&self) -> HttpRequest {
        self.get("/agendamentos/agenda")
    }

    /// Confirmed lessons in the backend's order (date ascending); the client
    /// does not re-sort.
    pub fn parse_list_agenda(&self, response: HttpResponse) -> Result<Vec<Appointment>, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn build_list_pending(&self) -> HttpRequest {
        self.get("/agendamentos/pendentes")
    }

    pub fn parse_list_pending(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<PendingRequest>, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn build_respond(&self, id: i64, decision: Decision) -> Result<HttpRequest, ApiError> {
        let payload = RespondRequest {
            novo_status: decision,
        };
        let body =
            serde_json::to_string(&payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Patch,
            path: format!("{}/agendamentos/{id}/responder", self.base_url),
            headers: self.headers(true),
            body: Some(body),
        })
    }

    /// On failure nothing is applied locally: the caller re-fetches the
    /// pending list, which still holds its last-known-good rows.
    pub fn parse_respond(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 401 {
        return Err(ApiError::Unauthorized);
    }
    Err(ApiError::Backend {
        status: response.status,
        message: backend_message(&response.body),
    })
}

/// Human-readable message from an error body's `erro` field, with a generic
/// fallback when the body carries none.
fn backend_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("erro")?.as_str().map(str::to_string))
        .unwrap_or_else(|| "não foi possível completar a operação".to_string())
}
