//! Full scheduling workflow against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives both roles through
//! the core client over real HTTP using ureq: a volunteer registers and
//! publishes an offer, a learner finds it and requests a lesson, and the
//! volunteer answers the request. Validates that request building (token
//! attachment included) and response parsing work end-to-end against the
//! actual server.

use conecta_core::{
    ApiClient, ApiError, CreateAppointment, CreateOffer, Decision, HttpMethod, HttpRequest,
    HttpResponse, ListView, LoginRequest, RegisterRequest, Role, SessionStore,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let headers = req.headers;
    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => {
            let mut r = agent.get(&req.path);
            for (k, v) in &headers {
                r = r.header(k.as_str(), v.as_str());
            }
            r.call()
        }
        (HttpMethod::Post, Some(body)) => {
            let mut r = agent.post(&req.path);
            for (k, v) in &headers {
                r = r.header(k.as_str(), v.as_str());
            }
            r.send(body.as_bytes())
        }
        (HttpMethod::Post, None) => {
            let mut r = agent.post(&req.path);
            for (k, v) in &headers {
                r = r.header(k.as_str(), v.as_str());
            }
            r.send_empty()
        }
        (HttpMethod::Patch, Some(body)) => {
            let mut r = agent.patch(&req.path);
            for (k, v) in &headers {
                r = r.header(k.as_str(), v.as_str());
            }
            r.send(body.as_bytes())
        }
        (HttpMethod::Patch, None) => {
            let mut r = agent.patch(&req.path);
            for (k, v) in &headers {
                r = r.header(k.as_str(), v.as_str());
            }
            r.send_empty()
        }
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn client(base_url: &str, dir: &tempfile::TempDir, file: &str) -> ApiClient {
    ApiClient::new(base_url, SessionStore::new(dir.path().join(file)))
}

fn register(client: &ApiClient, nome: &str, email: &str, tipo_perfil: Role) {
    let input = RegisterRequest {
        nome: nome.to_string(),
        email: email.to_string(),
        senha: "senha123".to_string(),
        telefone: "11999990000".to_string(),
        tipo_perfil,
        id_escola: None,
    };
    let req = client.build_register(&input).unwrap();
    client.parse_register(execute(req)).unwrap();
}

fn login(client: &ApiClient, email: &str) {
    let input = LoginRequest {
        email: email.to_string(),
        senha: "senha123".to_string(),
    };
    let req = client.build_login(&input).unwrap();
    client.parse_login(execute(req)).unwrap();
}

#[test]
fn scheduling_workflow() {
    let base_url = start_server();
    let dir = tempfile::tempdir().unwrap();

    // Step 1: the volunteer registers, logs in, and the session is mirrored
    // locally.
    let volunteer = client(&base_url, &dir, "volunteer.json");
    register(&volunteer, "Ana Souza", "ana@email.com", Role::Voluntario);
    login(&volunteer, "ana@email.com");
    let session = volunteer.session().get().unwrap();
    assert_eq!(session.usuario.nome, "Ana Souza");
    assert_eq!(session.usuario.tipo_perfil, Role::Voluntario);

    // Step 2: the volunteer publishes an offer.
    let input = CreateOffer {
        disciplina: "Matemática".to_string(),
        dias_disponiveis: "Segunda e Quarta".to_string(),
        horario_inicio: "14:00".to_string(),
        horario_fim: "16:00".to_string(),
    };
    let req = volunteer.build_create_offer(&input).unwrap();
    let oferta = volunteer.parse_create_offer(execute(req)).unwrap();
    assert_eq!(oferta.disciplina, "Matemática");

    let req = volunteer.build_list_my_offers();
    let minhas = volunteer.parse_list_my_offers(execute(req)).unwrap();
    assert_eq!(minhas.len(), 1);
    assert_eq!(minhas[0].id, oferta.id);

    // Step 3: the learner registers, logs in, and finds the offer by a
    // substring of its subject.
    let learner = client(&base_url, &dir, "learner.json");
    register(&learner, "João Lima", "joao@email.com", Role::Aluno);
    login(&learner, "joao@email.com");

    let req = learner.build_search_offers("Mat").unwrap();
    let results = learner.parse_search_offers(execute(req)).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, oferta.id);
    assert_eq!(results[0].nome_voluntario.as_deref(), Some("Ana Souza"));

    // A subject nobody teaches is an empty result, not an error.
    let req = learner.build_search_offers("Química").unwrap();
    let results = learner.parse_search_offers(execute(req)).unwrap();
    assert!(results.is_empty());

    // Step 4: the learner requests two lessons against the offer.
    for data_aula in ["2026-09-01", "2026-09-08"] {
        let input = CreateAppointment {
            id_oferta: oferta.id,
            data_aula: data_aula.to_string(),
        };
        let req = learner.build_create_appointment(&input).unwrap();
        learner.parse_create_appointment(execute(req)).unwrap();
    }

    // Step 5: the volunteer's pending inbox shows both, applied as a full
    // replace through the view.
    let mut pending = ListView::new();
    let ticket = pending.begin();
    let req = volunteer.build_list_pending();
    let items = volunteer.parse_list_pending(execute(req)).unwrap();
    assert!(pending.complete(ticket, items));
    assert_eq!(pending.items().len(), 2);
    assert_eq!(pending.items()[0].nome_aluno, "João Lima");
    let first_id = pending.items()[0].id_agendamento;
    let second_id = pending.items()[1].id_agendamento;

    // Step 6: confirm the first request, then re-fetch — it left the inbox.
    let req = volunteer.build_respond(first_id, Decision::Confirmado).unwrap();
    volunteer.parse_respond(execute(req)).unwrap();

    let ticket = pending.begin();
    let req = volunteer.build_list_pending();
    let items = volunteer.parse_list_pending(execute(req)).unwrap();
    assert!(pending.complete(ticket, items));
    assert_eq!(pending.items().len(), 1);
    assert_eq!(pending.items()[0].id_agendamento, second_id);

    // Step 7: responding to the already-confirmed request is rejected by the
    // backend, and the pending view keeps its last-known-good rows.
    let req = volunteer.build_respond(first_id, Decision::Confirmado).unwrap();
    let err = volunteer.parse_respond(execute(req)).unwrap_err();
    match err {
        ApiError::Backend { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "Agendamento já respondido");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(pending.items().len(), 1);
    assert_eq!(pending.items()[0].id_agendamento, second_id);

    // Step 8: decline the second request; the inbox empties.
    let req = volunteer.build_respond(second_id, Decision::Cancelado).unwrap();
    volunteer.parse_respond(execute(req)).unwrap();

    let ticket = pending.begin();
    let req = volunteer.build_list_pending();
    let items = volunteer.parse_list_pending(execute(req)).unwrap();
    assert!(pending.complete(ticket, items));
    assert!(pending.items().is_empty());

    // Step 9: only the confirmed lesson is on the agenda, each side seeing
    // the counterpart's name.
    let req = volunteer.build_list_agenda();
    let agenda = volunteer.parse_list_agenda(execute(req)).unwrap();
    assert_eq!(agenda.len(), 1);
    assert_eq!(agenda[0].id_agendamento, first_id);
    assert_eq!(agenda[0].counterpart(Role::Voluntario), Some("João Lima"));

    let req = learner.build_list_agenda();
    let agenda = learner.parse_list_agenda(execute(req)).unwrap();
    assert_eq!(agenda.len(), 1);
    assert_eq!(agenda[0].counterpart(Role::Aluno), Some("Ana Souza"));

    // Step 10: logout drops the session; the next request goes out without
    // an Authorization header and the backend rejects it.
    learner.logout().unwrap();
    assert!(learner.session().get().is_none());

    let req = learner.build_list_agenda();
    assert!(req.header("authorization").is_none());
    let err = learner.parse_list_agenda(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}
