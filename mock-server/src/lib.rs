//! In-memory double of the Conecta Saber backend.
//!
//! Implements the REST surface the client core consumes (registration,
//! login with bearer tokens, offers, the appointment lifecycle) over a
//! shared in-memory store. Error bodies carry the same `{"erro": ...}` shape
//! as the real backend so the core's message extraction is exercised.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Perfil {
    #[serde(rename = "ALUNO")]
    Aluno,
    #[serde(rename = "VOLUNTARIO")]
    Voluntario,
    #[serde(rename = "GESTOR")]
    Gestor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "PENDENTE")]
    Pendente,
    #[serde(rename = "CONFIRMADO")]
    Confirmado,
    #[serde(rename = "CANCELADO")]
    Cancelado,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Usuario {
    pub nome: String,
    pub tipo_perfil: Perfil,
}

#[derive(Deserialize)]
pub struct Registro {
    pub nome: String,
    pub email: String,
    pub senha: String,
    pub tipo_perfil: Perfil,
}

#[derive(Deserialize)]
pub struct Credenciais {
    pub email: String,
    pub senha: String,
}

#[derive(Serialize, Deserialize)]
pub struct LoginOk {
    pub token: String,
    pub usuario: Usuario,
}

#[derive(Deserialize)]
pub struct NovaOferta {
    pub disciplina: String,
    pub dias_disponiveis: String,
    pub horario_inicio: String,
    pub horario_fim: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Oferta {
    pub id: i64,
    pub disciplina: String,
    pub dias_disponiveis: String,
    pub horario_inicio: String,
    pub horario_fim: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome_voluntario: Option<String>,
}

#[derive(Deserialize)]
pub struct Busca {
    pub disciplina: String,
}

#[derive(Deserialize)]
pub struct NovoAgendamento {
    pub id_oferta: i64,
    pub data_aula: String,
}

#[derive(Deserialize)]
pub struct Resposta {
    pub novo_status: Status,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgendaItem {
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

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Solicitacao {
    pub id_agendamento: i64,
    pub data_aula: String,
    pub nome_aluno: String,
    pub disciplina: String,
}

#[derive(Clone, Debug)]
struct UserRecord {
    id: i64,
    nome: String,
    email: String,
    senha: String,
    tipo_perfil: Perfil,
}

#[derive(Clone, Debug)]
struct OfertaRecord {
    id: i64,
    id_voluntario: i64,
    disciplina: String,
    dias_disponiveis: String,
    horario_inicio: String,
    horario_fim: String,
}

#[derive(Clone, Debug)]
struct AgendamentoRecord {
    id: i64,
    id_oferta: i64,
    id_aluno: i64,
    data_aula: String,
    status: Status,
}

#[derive(Default)]
pub struct Db {
    users: HashMap<i64, UserRecord>,
    tokens: HashMap<String, i64>,
    ofertas: HashMap<i64, OfertaRecord>,
    agendamentos: HashMap<i64, AgendamentoRecord>,
    last_id: i64,
}

impl Db {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

pub type SharedDb = Arc<RwLock<Db>>;

type Erro = (StatusCode, Json<serde_json::Value>);

fn erro(status: StatusCode, mensagem: &str) -> Erro {
    (status, Json(json!({ "erro": mensagem })))
}

pub fn app() -> Router {
    let db: SharedDb = Arc::new(RwLock::new(Db::default()));
    Router::new()
        .route("/login", post(login))
        .route("/usuarios/registro", post(register))
        .route("/ofertas", post(create_offer))
        .route("/ofertas/busca", get(search_offers))
        .route("/ofertas/meus-registros", get(my_offers))
        .route("/agendamentos", post(create_appointment))
        .route("/agendamentos/agenda", get(agenda))
        .route("/agendamentos/pendentes", get(pending))
        .route("/agendamentos/{id}/responder", patch(respond))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn authed_user(db: &Db, headers: &HeaderMap) -> Result<UserRecord, Erro> {
    let token =
        bearer_token(headers).ok_or_else(|| erro(StatusCode::UNAUTHORIZED, "Token ausente"))?;
    let id = db
        .tokens
        .get(token)
        .ok_or_else(|| erro(StatusCode::UNAUTHORIZED, "Token inválido"))?;
    db.users
        .get(id)
        .cloned()
        .ok_or_else(|| erro(StatusCode::UNAUTHORIZED, "Token inválido"))
}

fn oferta_out(record: &OfertaRecord, nome_voluntario: Option<String>) -> Oferta {
    Oferta {
        id: record.id,
        disciplina: record.disciplina.clone(),
        dias_disponiveis: record.dias_disponiveis.clone(),
        horario_inicio: record.horario_inicio.clone(),
        horario_fim: record.horario_fim.clone(),
        nome_voluntario,
    }
}

async fn register(
    State(db): State<SharedDb>,
    Json(input): Json<Registro>,
) -> Result<(StatusCode, Json<Usuario>), Erro> {
    let mut db = db.write().await;
    if db.users.values().any(|u| u.email == input.email) {
        return Err(erro(StatusCode::CONFLICT, "E-mail já cadastrado"));
    }
    let id = db.next_id();
    let user = UserRecord {
        id,
        nome: input.nome,
        email: input.email,
        senha: input.senha,
        tipo_perfil: input.tipo_perfil,
    };
    let out = Usuario {
        nome: user.nome.clone(),
        tipo_perfil: user.tipo_perfil,
    };
    db.users.insert(id, user);
    Ok((StatusCode::CREATED, Json(out)))
}

async fn login(
    State(db): State<SharedDb>,
    Json(input): Json<Credenciais>,
) -> Result<Json<LoginOk>, Erro> {
    let mut db = db.write().await;
    let user = db
        .users
        .values()
        .find(|u| u.email == input.email && u.senha == input.senha)
        .cloned()
        .ok_or_else(|| erro(StatusCode::UNAUTHORIZED, "Credenciais inválidas"))?;
    let token = Uuid::new_v4().to_string();
    db.tokens.insert(token.clone(), user.id);
    tracing::debug!(email = %user.email, "sessão emitida");
    Ok(Json(LoginOk {
        token,
        usuario: Usuario {
            nome: user.nome,
            tipo_perfil: user.tipo_perfil,
        },
    }))
}

async fn create_offer(
    State(db): State<SharedDb>,
    headers: HeaderMap,
    Json(input): Json<NovaOferta>,
) -> Result<(StatusCode, Json<Oferta>), Erro> {
    let mut db = db.write().await;
    let user = authed_user(&db, &headers)?;
    if user.tipo_perfil != Perfil::Voluntario {
        return Err(erro(
            StatusCode::FORBIDDEN,
            "Apenas voluntários podem cadastrar ofertas",
        ));
    }
    let id = db.next_id();
    let record = OfertaRecord {
        id,
        id_voluntario: user.id,
        disciplina: input.disciplina,
        dias_disponiveis: input.dias_disponiveis,
        horario_inicio: input.horario_inicio,
        horario_fim: input.horario_fim,
    };
    let out = oferta_out(&record, None);
    db.ofertas.insert(id, record);
    Ok((StatusCode::CREATED, Json(out)))
}

async fn search_offers(
    State(db): State<SharedDb>,
    headers: HeaderMap,
    Query(params): Query<Busca>,
) -> Result<Json<Vec<Oferta>>, Erro> {
    let db = db.read().await;
    authed_user(&db, &headers)?;
    let term = params.disciplina.to_lowercase();
    let mut results: Vec<Oferta> = db
        .ofertas
        .values()
        .filter(|o| o.disciplina.to_lowercase().contains(&term))
        .map(|o| {
            let dono = db.users.get(&o.id_voluntario).map(|u| u.nome.clone());
            oferta_out(o, dono)
        })
        .collect();
    results.sort_by_key(|o| o.id);
    Ok(Json(results))
}

async fn my_offers(
    State(db): State<SharedDb>,
    headers: HeaderMap,
) -> Result<Json<Vec<Oferta>>, Erro> {
    let db = db.read().await;
    let user = authed_user(&db, &headers)?;
    let mut results: Vec<Oferta> = db
        .ofertas
        .values()
        .filter(|o| o.id_voluntario == user.id)
        .map(|o| oferta_out(o, None))
        .collect();
    results.sort_by_key(|o| o.id);
    Ok(Json(results))
}

async fn create_appointment(
    State(db): State<SharedDb>,
    headers: HeaderMap,
    Json(input): Json<NovoAgendamento>,
) -> Result<(StatusCode, Json<serde_json::Value>), Erro> {
    let mut db = db.write().await;
    let user = authed_user(&db, &headers)?;
    if user.tipo_perfil != Perfil::Aluno {
        return Err(erro(
            StatusCode::FORBIDDEN,
            "Apenas alunos podem solicitar aulas",
        ));
    }
    if !db.ofertas.contains_key(&input.id_oferta) {
        return Err(erro(StatusCode::NOT_FOUND, "Oferta não encontrada"));
    }
    let id = db.next_id();
    db.agendamentos.insert(
        id,
        AgendamentoRecord {
            id,
            id_oferta: input.id_oferta,
            id_aluno: user.id,
            data_aula: input.data_aula,
            status: Status::Pendente,
        },
    );
    Ok((StatusCode::CREATED, Json(json!({ "id_agendamento": id }))))
}

async fn agenda(
    State(db): State<SharedDb>,
    headers: HeaderMap,
) -> Result<Json<Vec<AgendaItem>>, Erro> {
    let db = db.read().await;
    let user = authed_user(&db, &headers)?;
    let mut items: Vec<AgendaItem> = db
        .agendamentos
        .values()
        .filter(|a| a.status == Status::Confirmado)
        .filter_map(|a| {
            let oferta = db.ofertas.get(&a.id_oferta)?;
            let as_volunteer =
                user.tipo_perfil == Perfil::Voluntario && oferta.id_voluntario == user.id;
            let as_learner = a.id_aluno == user.id;
            if !as_volunteer && !as_learner {
                return None;
            }
            let (nome_aluno, nome_voluntario) = if as_volunteer {
                (db.users.get(&a.id_aluno).map(|u| u.nome.clone()), None)
            } else {
                (
                    None,
                    db.users.get(&oferta.id_voluntario).map(|u| u.nome.clone()),
                )
            };
            Some(AgendaItem {
                id_agendamento: a.id,
                data_aula: a.data_aula.clone(),
                horario_inicio: oferta.horario_inicio.clone(),
                horario_fim: oferta.horario_fim.clone(),
                disciplina: oferta.disciplina.clone(),
                nome_aluno,
                nome_voluntario,
            })
        })
        .collect();
    items.sort_by(|a, b| {
        a.data_aula
            .cmp(&b.data_aula)
            .then(a.id_agendamento.cmp(&b.id_agendamento))
    });
    Ok(Json(items))
}

async fn pending(
    State(db): State<SharedDb>,
    headers: HeaderMap,
) -> Result<Json<Vec<Solicitacao>>, Erro> {
    let db = db.read().await;
    let user = authed_user(&db, &headers)?;
    if user.tipo_perfil != Perfil::Voluntario {
        return Err(erro(
            StatusCode::FORBIDDEN,
            "Apenas voluntários recebem solicitações",
        ));
    }
    let mut items: Vec<Solicitacao> = db
        .agendamentos
        .values()
        .filter(|a| a.status == Status::Pendente)
        .filter_map(|a| {
            let oferta = db.ofertas.get(&a.id_oferta)?;
            if oferta.id_voluntario != user.id {
                return None;
            }
            Some(Solicitacao {
                id_agendamento: a.id,
                data_aula: a.data_aula.clone(),
                nome_aluno: db
                    .users
                    .get(&a.id_aluno)
                    .map(|u| u.nome.clone())
                    .unwrap_or_default(),
                disciplina: oferta.disciplina.clone(),
            })
        })
        .collect();
    items.sort_by_key(|s| s.id_agendamento);
    Ok(Json(items))
}

async fn respond(
    State(db): State<SharedDb>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(input): Json<Resposta>,
) -> Result<Json<serde_json::Value>, Erro> {
    let mut db = db.write().await;
    let user = authed_user(&db, &headers)?;
    if input.novo_status == Status::Pendente {
        return Err(erro(StatusCode::UNPROCESSABLE_ENTITY, "Status inválido"));
    }
    let (id_oferta, status) = {
        let a = db
            .agendamentos
            .get(&id)
            .ok_or_else(|| erro(StatusCode::NOT_FOUND, "Agendamento não encontrado"))?;
        (a.id_oferta, a.status)
    };
    let dono = db.ofertas.get(&id_oferta).map(|o| o.id_voluntario);
    if dono != Some(user.id) {
        return Err(erro(
            StatusCode::FORBIDDEN,
            "Agendamento de outro voluntário",
        ));
    }
    if status != Status::Pendente {
        return Err(erro(StatusCode::CONFLICT, "Agendamento já respondido"));
    }
    if let Some(a) = db.agendamentos.get_mut(&id) {
        a.status = input.novo_status;
    }
    Ok(Json(json!({ "id_agendamento": id, "status": input.novo_status })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfil_uses_uppercase_wire_values() {
        assert_eq!(serde_json::to_string(&Perfil::Voluntario).unwrap(), r#""VOLUNTARIO""#);
        let p: Perfil = serde_json::from_str(r#""ALUNO""#).unwrap();
        assert_eq!(p, Perfil::Aluno);
    }

    #[test]
    fn status_roundtrips_through_wire_values() {
        for (status, wire) in [
            (Status::Pendente, r#""PENDENTE""#),
            (Status::Confirmado, r#""CONFIRMADO""#),
            (Status::Cancelado, r#""CANCELADO""#),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), wire);
            let back: Status = serde_json::from_str(wire).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn oferta_omits_missing_volunteer_name() {
        let oferta = Oferta {
            id: 1,
            disciplina: "Matemática".to_string(),
            dias_disponiveis: "Segunda".to_string(),
            horario_inicio: "14:00".to_string(),
            horario_fim: "16:00".to_string(),
            nome_voluntario: None,
        };
        let json = serde_json::to_value(&oferta).unwrap();
        assert!(json.get("nome_voluntario").is_none());
    }

    #[test]
    fn registro_ignores_unknown_fields() {
        let input: Registro = serde_json::from_str(
            r#"{"nome":"Ana","email":"ana@email.com","senha":"s","telefone":"11",
                "tipo_perfil":"VOLUNTARIO","id_escola":null}"#,
        )
        .unwrap();
        assert_eq!(input.tipo_perfil, Perfil::Voluntario);
    }

    #[test]
    fn erro_body_has_the_expected_shape() {
        let (status, Json(body)) = erro(StatusCode::CONFLICT, "E-mail já cadastrado");
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["erro"], "E-mail já cadastrado");
    }
}
