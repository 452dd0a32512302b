// Integration tests for userdesk against a mock backend

use mockito::Matcher;
use serde_json::json;

use userdesk::api::{ApiClient, Role, UserId, UserRecord};
use userdesk::app::auth::{self, LoginForm, RegisterForm};
use userdesk::app::directory::{Confirmation, PageDirection, UserDirectory};
use userdesk::app::form::{Field, RequestStatus, REGISTER_FIELDS};
use userdesk::app::keymap::Keymap;
use userdesk::app::nav::Route;
use userdesk::app::record_form::{self, RecordForm};
use userdesk::app::update::{execute, Command};
use userdesk::app::{AppState, ModalState, Screen, Theme};
use userdesk::error::{ClientError, CONNECTION_MESSAGE};

const USERS_JSON: &str = r#"[
    {"id_usuario":1,"nombre":"Ana","app":"Ruiz","apm":"Paz","fn":"1990-01-02","telefono":"555-1","email":"ana@x.com"},
    {"id_usuario":2,"nombre":"Luis","app":"Mora","apm":"Gil","fn":"1985-03-04","telefono":"555-2","email":"luis@x.com"}
]"#;

fn app_at(base_url: &str, route: Route) -> AppState {
    let mut app = AppState::new(Theme::mocha(), Keymap::default(), base_url);
    app.navigate(route);
    app
}

fn seeded(n: i64) -> Vec<UserRecord> {
    (1..=n)
        .map(|i| UserRecord {
            id: UserId(i),
            name: format!("user{i}"),
            ..Default::default()
        })
        .collect()
}

fn fill_registration(reg: &mut RegisterForm) {
    reg.form.set(Field::Name, "Ana");
    reg.form.set(Field::PaternalSurname, "Ruiz");
    reg.form.set(Field::MaternalSurname, "Paz");
    reg.form.set(Field::BirthDate, "1990-01-02");
    reg.form.set(Field::Phone, "555");
    reg.form.set(Field::Email, "ana@x.com");
    reg.form.set(Field::Password, "secret");
    reg.form.set(Field::ConfirmPassword, "secret");
}

// 1) Admin login rejected: server message shown, no navigation, form shakes
#[tokio::test]
async fn admin_login_shows_server_error_and_stays() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("POST", "/login")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"email": "a@x.com", "password": "bad"})))
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"Credenciales incorrectas"}"#)
        .expect(1)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let mut app = app_at(&server.url(), Route::AdminLogin);
    if let Screen::Login(login) = &mut app.screen {
        login.form.set(Field::Email, "a@x.com");
        login.form.set(Field::Password, "bad");
    }

    let next = execute(&mut app, &api, Command::Login).await;

    assert_eq!(next, None);
    assert_eq!(app.route(), Route::AdminLogin);
    assert!(app.shake.is_some());
    match &app.screen {
        Screen::Login(login) => assert_eq!(login.form.status.error(), Some("Credenciales incorrectas")),
        other => panic!("unexpected screen {other:?}"),
    }
    m.assert_async().await;
}

// 2) Successful logins land on the role's dashboard
#[tokio::test]
async fn login_success_navigates_to_dashboard() {
    let mut server = mockito::Server::new_async().await;
    let admin = server
        .mock("POST", "/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token":"tok-admin-123"}"#)
        .expect(1)
        .create_async()
        .await;
    let user = server
        .mock("POST", "/users/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token":"tok-user-456"}"#)
        .expect(1)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());

    let token = auth::login(&api, Role::Admin, "a@x.com", "good").await.unwrap();
    assert_eq!(token.as_str(), "tok-admin-123");

    let mut app = app_at(&server.url(), Route::UserLogin);
    if let Screen::Login(login) = &mut app.screen {
        login.form.set(Field::Email, "u@x.com");
        login.form.set(Field::Password, "pw");
    }
    execute(&mut app, &api, Command::Login).await;
    assert_eq!(app.route(), Route::UserDashboard);
    assert!(app.shake.is_none());

    admin.assert_async().await;
    user.assert_async().await;
}

// 3) Missing error text falls back to the call site's message
#[tokio::test]
async fn user_login_without_error_body_uses_fallback() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("POST", "/users/login")
        .with_status(500)
        .with_body("internal")
        .expect(1)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let mut login = LoginForm::new(Role::User);
    login.form.set(Field::Email, "u@x.com");
    login.form.set(Field::Password, "pw");
    let err = login.submit(&api).await.unwrap_err();

    assert_eq!(err, ClientError::Server { status: 500, message: "Could not sign in".into() });
    assert_eq!(login.form.status, RequestStatus::Failed("Could not sign in".into()));
    m.assert_async().await;
}

// 4) Empty credentials never reach the server
#[tokio::test]
async fn login_with_empty_field_makes_no_request() {
    let mut server = mockito::Server::new_async().await;
    let m = server.mock("POST", Matcher::Any).expect(0).create_async().await;

    let api = ApiClient::new(server.url());
    let err = auth::login(&api, Role::Admin, "", "pw").await.unwrap_err();
    assert!(err.is_validation());
    m.assert_async().await;
}

// 5) Registration: every incomplete or mismatched form fails locally
#[tokio::test]
async fn registration_validation_makes_no_request() {
    let mut server = mockito::Server::new_async().await;
    let m = server.mock("POST", Matcher::Any).expect(0).create_async().await;
    let api = ApiClient::new(server.url());

    for field in REGISTER_FIELDS {
        let mut reg = RegisterForm::new();
        fill_registration(&mut reg);
        reg.form.set(*field, "");
        let err = reg.submit(&api).await.unwrap_err();
        assert_eq!(err, ClientError::Validation(auth::MISSING_FIELDS.into()));
    }

    let mut reg = RegisterForm::new();
    fill_registration(&mut reg);
    reg.form.set(Field::ConfirmPassword, "other");
    let err = reg.submit(&api).await.unwrap_err();
    assert_eq!(err, ClientError::Validation(auth::PASSWORD_MISMATCH.into()));
    assert_eq!(reg.form.get(Field::Name), "Ana");

    m.assert_async().await;
}

// 6) Registration success clears the form and lands on the user dashboard
#[tokio::test]
async fn registration_success_clears_and_navigates() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("POST", "/users/register")
        .match_body(Matcher::Json(json!({
            "nombre": "Ana", "app": "Ruiz", "apm": "Paz", "fn": "1990-01-02",
            "telefono": "555", "email": "ana@x.com", "password": "secret"
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"ok"}"#)
        .expect(1)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let mut app = app_at(&server.url(), Route::Register);
    if let Screen::Register(reg) = &mut app.screen {
        fill_registration(reg);
    }

    execute(&mut app, &api, Command::Register).await;

    assert_eq!(app.route(), Route::UserDashboard);
    assert!(matches!(app.modal, Some(ModalState::Info { .. })));
    m.assert_async().await;

    let mut reg = RegisterForm::new();
    fill_registration(&mut reg);
    let mut server2 = mockito::Server::new_async().await;
    let _ok = server2
        .mock("POST", "/users/register")
        .with_status(200)
        .create_async()
        .await;
    reg.submit(&ApiClient::new(server2.url())).await.unwrap();
    assert_eq!(reg.form.get(Field::Email), "");
    assert_eq!(reg.form.get(Field::Password), "");
}

// 7) Registration rejected by the server keeps what was typed
#[tokio::test]
async fn registration_failure_keeps_fields() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/users/register")
        .with_status(409)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"El email ya existe"}"#)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let mut app = app_at(&server.url(), Route::Register);
    if let Screen::Register(reg) = &mut app.screen {
        fill_registration(reg);
    }
    execute(&mut app, &api, Command::Register).await;

    assert_eq!(app.route(), Route::Register);
    assert!(app.shake.is_some());
    let Screen::Register(reg) = &app.screen else { panic!("left register screen") };
    assert_eq!(reg.form.get(Field::Email), "ana@x.com");
    assert_eq!(reg.form.status.error(), Some("El email ya existe"));
}

// 8) Fetch reverses server order and repeated fetches replace the list
#[tokio::test]
async fn fetch_all_reverses_and_replaces() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/admin/users")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(USERS_JSON)
        .expect(2)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let mut dir = UserDirectory::new();
    dir.fetch_all(&api).await.unwrap();
    dir.fetch_all(&api).await.unwrap();

    assert_eq!(dir.users().len(), 2);
    assert_eq!(dir.page(), 1);
    assert_eq!(dir.total_pages(), 1);
    let ids: Vec<_> = dir.visible().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![UserId(2), UserId(1)]);
    assert_eq!(dir.visible()[0].full_name(), "Luis Mora Gil");
    m.assert_async().await;
}

// 9) A failed fetch keeps the previous list and surfaces the error
#[tokio::test]
async fn fetch_failure_keeps_previous_list() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/admin/users")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"No autorizado"}"#)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let mut dir = UserDirectory::new();
    dir.replace(seeded(3));
    let err = dir.fetch_all(&api).await.unwrap_err();

    assert_eq!(err.message(), "No autorizado");
    assert_eq!(dir.users().len(), 3);
    assert_eq!(dir.error.as_deref(), Some("No autorizado"));
}

// 10) Confirmed delete: exactly one DELETE then exactly one refetch
#[tokio::test]
async fn confirmed_delete_refetches_once() {
    let mut server = mockito::Server::new_async().await;
    let del = server
        .mock("DELETE", "/admin/users/2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"deleted"}"#)
        .expect(1)
        .create_async()
        .await;
    let list = server
        .mock("GET", "/admin/users")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id_usuario":1,"nombre":"Ana","app":"Ruiz","apm":"Paz","fn":"","telefono":"","email":""}]"#)
        .expect(1)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let mut app = app_at(&server.url(), Route::Directory);
    if let Screen::Directory(dir) = &mut app.screen {
        dir.replace(seeded(2));
        dir.toggle_expand(UserId(1));
    }

    let cmd = Command::ResolveDelete {
        id: UserId(2),
        display_name: "user2".into(),
        confirmation: Confirmation::Confirm,
    };
    execute(&mut app, &api, cmd).await;

    let Screen::Directory(dir) = &app.screen else { panic!("left directory") };
    assert_eq!(dir.users().len(), 1);
    assert_eq!(dir.expanded(), None);
    assert!(matches!(app.modal, Some(ModalState::Info { .. })));
    del.assert_async().await;
    list.assert_async().await;
}

// 11) Declined delete issues no request at all
#[tokio::test]
async fn declined_delete_makes_no_request() {
    let mut server = mockito::Server::new_async().await;
    let del = server.mock("DELETE", Matcher::Any).expect(0).create_async().await;
    let get = server.mock("GET", Matcher::Any).expect(0).create_async().await;

    let api = ApiClient::new(server.url());
    let mut dir = UserDirectory::new();
    dir.replace(seeded(2));
    let removed = dir.remove(&api, UserId(1), "user1", Confirmation::Cancel).await.unwrap();

    assert!(!removed);
    assert_eq!(dir.users().len(), 2);
    del.assert_async().await;
    get.assert_async().await;
}

// 12) A failed delete leaves local state untouched
#[tokio::test]
async fn failed_delete_keeps_state() {
    let mut server = mockito::Server::new_async().await;
    let _del = server
        .mock("DELETE", "/admin/users/1")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"No se pudo eliminar"}"#)
        .create_async()
        .await;
    let get = server.mock("GET", "/admin/users").expect(0).create_async().await;

    let api = ApiClient::new(server.url());
    let mut dir = UserDirectory::new();
    dir.replace(seeded(8));
    dir.paginate(PageDirection::Next);
    dir.toggle_expand(UserId(1));

    let err = dir.remove(&api, UserId(1), "user1", Confirmation::Confirm).await.unwrap_err();

    assert_eq!(err.message(), "No se pudo eliminar");
    assert_eq!(dir.users().len(), 8);
    assert_eq!(dir.page(), 2);
    assert_eq!(dir.expanded(), Some(UserId(1)));
    get.assert_async().await;
}

// 13) Edit load: linear search over the collection, password left empty
#[tokio::test]
async fn load_for_edit_finds_record_or_reports_not_found() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/admin/users")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(USERS_JSON)
        .expect(2)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let form = record_form::load_for_edit(&api, UserId(2)).await.unwrap();
    assert_eq!(form.get(Field::Name), "Luis");
    assert_eq!(form.get(Field::BirthDate), "1985-03-04");
    assert_eq!(form.get(Field::Password), "");

    let err = record_form::load_for_edit(&api, UserId(99)).await.unwrap_err();
    assert_eq!(err, ClientError::NotFound("User not found".into()));
    m.assert_async().await;
}

// 14) Edit load driven by the app after entering the edit route
#[tokio::test]
async fn entering_edit_route_loads_record() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/admin/users")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(USERS_JSON)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let mut app = AppState::new(Theme::mocha(), Keymap::default(), server.url());
    let cmd = app.navigate(Route::EditUser(UserId(1))).expect("edit route loads");
    execute(&mut app, &api, cmd).await;

    let Screen::Record(rec) = &app.screen else { panic!("not on edit form") };
    assert!(!rec.loading);
    assert_eq!(rec.form.get(Field::Email), "ana@x.com");
}

// 15) Create posts fields as entered and returns to the directory
#[tokio::test]
async fn create_posts_as_is_and_returns_to_directory() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("POST", "/admin/users")
        .match_body(Matcher::Json(json!({
            "nombre": "Eva", "app": "", "apm": "", "fn": "",
            "telefono": "", "email": "eva@x.com", "password": ""
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id_usuario":3}"#)
        .expect(1)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let mut app = AppState::new(Theme::mocha(), Keymap::default(), server.url());
    app.navigate(Route::AdminDashboard);
    app.navigate(Route::Directory);
    app.navigate(Route::CreateUser);
    if let Screen::Record(rec) = &mut app.screen {
        rec.form.set(Field::Name, "Eva");
        rec.form.set(Field::Email, "eva@x.com");
    }

    let next = execute(&mut app, &api, Command::SubmitRecord).await;

    assert_eq!(next, Some(Command::FetchUsers));
    assert_eq!(app.route(), Route::Directory);
    assert_eq!(app.nav.depth(), 3);
    assert_eq!(
        app.modal,
        Some(ModalState::Info { message: "User created successfully".into() })
    );
    m.assert_async().await;
}

// 16) Create failure keeps entered values and shows the server message
#[tokio::test]
async fn create_failure_keeps_values() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/admin/users")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"Email requerido"}"#)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let mut rec = RecordForm::create();
    rec.form.set(Field::Name, "Eva");
    assert!(rec.submit_create(&api).await.is_err());
    assert_eq!(rec.form.get(Field::Name), "Eva");
    assert_eq!(rec.form.status.error(), Some("Email requerido"));
}

// 17) Edit sends the full record with an empty password verbatim
#[tokio::test]
async fn edit_puts_full_record_with_empty_password() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("PUT", "/admin/users/5")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({"nombre": "Ana", "password": ""})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let mut rec = RecordForm::edit(UserId(5));
    rec.form.set(Field::Name, "Ana");
    rec.submit_edit(&api).await.unwrap();
    assert_eq!(rec.form.status, RequestStatus::Succeeded);
    m.assert_async().await;
}

// 18) Rejected edit shows the server text inline and keeps what was typed
#[tokio::test]
async fn edit_rejected_keeps_values_and_shows_error() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("PUT", "/admin/users/5")
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"Telefono invalido"}"#)
        .expect(1)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let mut rec = RecordForm::edit(UserId(5));
    rec.form.set(Field::Name, "Ana");
    rec.form.set(Field::Phone, "abc");
    let err = rec.submit_edit(&api).await.unwrap_err();

    assert_eq!(err, ClientError::Server { status: 422, message: "Telefono invalido".into() });
    assert_eq!(rec.form.status.error(), Some("Telefono invalido"));
    assert_eq!(rec.form.get(Field::Name), "Ana");
    assert_eq!(rec.form.get(Field::Phone), "abc");
    m.assert_async().await;
}

// 19) Rejected edit without error text falls back to the update message
#[tokio::test]
async fn edit_rejected_without_error_uses_fallback() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("PUT", "/admin/users/5")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"bad"}"#)
        .expect(1)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let mut rec = RecordForm::edit(UserId(5));
    rec.form.set(Field::Email, "ana@x.com");
    assert!(rec.submit_edit(&api).await.is_err());

    assert_eq!(rec.form.status.error(), Some("Could not update user"));
    assert_eq!(rec.form.get(Field::Email), "ana@x.com");
    m.assert_async().await;
}

// 20) Unreachable backend maps to a network error with the connection message
#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let api = ApiClient::new("http://127.0.0.1:1");
    let err = auth::login(&api, Role::Admin, "a@x.com", "pw").await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(err.message(), CONNECTION_MESSAGE);

    let mut dir = UserDirectory::new();
    assert!(dir.fetch_all(&api).await.is_err());
    assert_eq!(dir.error.as_deref(), Some(CONNECTION_MESSAGE));
}
