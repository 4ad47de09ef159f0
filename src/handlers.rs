use crate::app::Page;
use crate::errors::{AppError, PortalError};
use crate::models::{
    Complaint, Dashboard, LoginRequest, LookupRequest, SessionResponse, Status,
    StatusUpdateRequest, SubmitRequest,
};
use crate::portal;
use crate::session::SESSION_COOKIE;
use crate::state::AppState;
use crate::ui::{
    Notice, render_admin_unavailable, render_dashboard, render_login, render_status, render_submit,
};
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{error, info, warn};

pub async fn index() -> Redirect {
    Redirect::to(Page::Submit.path())
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn submit_page() -> Html<String> {
    Html(render_submit("", &[]))
}

pub async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<SubmitRequest>,
) -> Html<String> {
    match portal::submit(&state.store, &form.text).await {
        Ok(complaint) => Html(render_submit(
            "",
            &[
                Notice::success(format!(
                    "Complaint submitted successfully! Your Complaint ID is {}",
                    complaint.id
                )),
                Notice::info("Please save this ID to check your complaint status later."),
            ],
        )),
        Err(err) => Html(render_submit(&form.text, &[notice_for(&err)])),
    }
}

pub async fn status_page(
    State(state): State<AppState>,
    Query(query): Query<LookupRequest>,
) -> Html<String> {
    if query.id.trim().is_empty() {
        return Html(render_status("", None, &[]));
    }
    Html(lookup_view(&state, &query.id).await)
}

pub async fn status_form(
    State(state): State<AppState>,
    Form(form): Form<LookupRequest>,
) -> Html<String> {
    Html(lookup_view(&state, &form.id).await)
}

async fn lookup_view(state: &AppState, id: &str) -> String {
    match portal::lookup(&state.store, id).await {
        Ok(complaint) => render_status(id, Some(&complaint), &[Notice::success("Complaint found!")]),
        Err(err) => render_status(id, None, &[notice_for(&err)]),
    }
}

pub async fn admin_page(State(state): State<AppState>, jar: CookieJar) -> Html<String> {
    if is_admin(&state, &jar).await {
        Html(dashboard_view(&state, Vec::new()).await)
    } else {
        Html(render_login(&[]))
    }
}

pub async fn admin_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginRequest>,
) -> (CookieJar, Html<String>) {
    match start_session(&state, &form.password).await {
        Ok(token) => (
            jar.add(session_cookie(token)),
            Html(dashboard_view(&state, vec![Notice::success("Login successful")]).await),
        ),
        Err(err) => (jar, Html(render_login(&[notice_for(&err)]))),
    }
}

pub async fn admin_logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = end_session(&state, jar).await;
    (jar, Redirect::to(Page::Admin.path()))
}

pub async fn admin_update_status(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Form(form): Form<StatusUpdateRequest>,
) -> Html<String> {
    if !is_admin(&state, &jar).await {
        return Html(render_login(&[Notice::error("Please log in first.")]));
    }

    let notice = match form.status.parse::<Status>() {
        Ok(status) => match portal::update_status(&state.store, &id, status).await {
            Ok(complaint) => Notice::success(format!("Status updated for Complaint {}", complaint.id)),
            Err(err) => notice_for(&err),
        },
        Err(message) => Notice::error(message),
    };
    Html(dashboard_view(&state, vec![notice]).await)
}

async fn dashboard_view(state: &AppState, mut notices: Vec<Notice>) -> String {
    match portal::dashboard(&state.store).await {
        Ok(dashboard) => render_dashboard(&dashboard, &notices),
        Err(err) => {
            notices.push(notice_for(&err));
            render_admin_unavailable(&notices)
        }
    }
}

pub async fn api_submit(
    State(state): State<AppState>,
    Json(payload): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<Complaint>), AppError> {
    let complaint = portal::submit(&state.store, &payload.text).await?;
    Ok((StatusCode::CREATED, Json(complaint)))
}

pub async fn api_lookup(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Complaint>, AppError> {
    Ok(Json(portal::lookup(&state.store, &id).await?))
}

pub async fn api_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), AppError> {
    let token = start_session(&state, &payload.password).await?;
    Ok((
        jar.add(session_cookie(token)),
        Json(SessionResponse { logged_in: true }),
    ))
}

pub async fn api_logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    (end_session(&state, jar).await, StatusCode::NO_CONTENT)
}

pub async fn api_dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Dashboard>, AppError> {
    require_admin(&state, &jar).await?;
    Ok(Json(portal::dashboard(&state.store).await?))
}

pub async fn api_update_status(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<Json<Complaint>, AppError> {
    require_admin(&state, &jar).await?;
    let status = payload
        .status
        .parse::<Status>()
        .map_err(AppError::bad_request)?;
    Ok(Json(portal::update_status(&state.store, &id, status).await?))
}

async fn start_session(state: &AppState, password: &str) -> Result<String, PortalError> {
    match state.sessions.login(&state.admin_password, password).await {
        Ok(token) => {
            info!("admin logged in");
            Ok(token)
        }
        Err(err) => {
            warn!("admin login rejected");
            Err(err)
        }
    }
}

async fn end_session(state: &AppState, jar: CookieJar) -> CookieJar {
    let token = session_token(&jar);
    state.sessions.logout(token.as_deref()).await;
    if token.is_some() {
        info!("admin logged out");
    }
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

async fn is_admin(state: &AppState, jar: &CookieJar) -> bool {
    let token = session_token(jar);
    state.sessions.get(token.as_deref()).await.is_logged_in()
}

async fn require_admin(state: &AppState, jar: &CookieJar) -> Result<(), AppError> {
    if is_admin(state, jar).await {
        Ok(())
    } else {
        Err(AppError::unauthorized("admin login required"))
    }
}

fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string())
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn notice_for(err: &PortalError) -> Notice {
    match err {
        PortalError::Validation(message) => Notice::warning(message.clone()),
        PortalError::NotFound(_) => {
            Notice::error("Complaint ID not found. Please check and try again.")
        }
        PortalError::Auth => Notice::error("Incorrect password"),
        PortalError::Storage(_) => {
            error!("{err}");
            Notice::error("The complaint store is unavailable, please try again.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ComplaintStore;

    async fn scratch_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let store = ComplaintStore::open(dir.path().join("complaints.xlsx"))
            .await
            .unwrap();
        (dir, AppState::new(store, "pw"))
    }

    #[tokio::test]
    async fn status_form_without_session_shows_login_in_place() {
        let (_dir, state) = scratch_state().await;
        let Html(page) = admin_update_status(
            State(state),
            CookieJar::new(),
            Path("2601051234".to_string()),
            Form(StatusUpdateRequest {
                status: "Resolved".to_string(),
            }),
        )
        .await;
        assert!(page.contains("Please log in first."));
        assert!(page.contains("Enter Admin Password"));
    }

    #[tokio::test]
    async fn unreadable_store_keeps_admin_view() {
        let (dir, state) = scratch_state().await;
        let path = dir.path().join("complaints.xlsx");
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let page = dashboard_view(&state, Vec::new()).await;
        assert!(page.contains("action=\"/admin/logout\""));
        assert!(page.contains("The complaint store is unavailable"));
        assert!(!page.contains("Enter Admin Password"));
    }
}
