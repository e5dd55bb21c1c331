use std::sync::Arc;

use rust_embed::RustEmbed;
use warp::{http::StatusCode, reply, Filter, Rejection, Reply};

use super::ApiError;
use crate::error_handling::types::SessionError;
use crate::network::types::{ConnectionContext, SessionRequest};
use crate::session_management::session::SessionUpdate;
use crate::session_management::session_manager::SessionManager;
use crate::web_interface::types::{
    LoginRequest, LoginResponse, LogoutRequest, MessageResponse, PurgeResponse,
    SessionListResponse, SessionResponse, SessionView, StatusQuery, UpdateRequest,
};

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

/// Captures the connection-level context warp exposes for a request: the
/// proxy forwarding header (if any) and the kernel-reported peer address.
fn connection_context() -> impl Filter<Extract = (ConnectionContext,), Error = Rejection> + Clone {
    warp::header::optional::<String>("x-forwarded-for")
        .and(warp::addr::remote())
        .map(|forwarded_for, remote_addr| ConnectionContext {
            forwarded_for,
            remote_addr,
        })
}

fn error_response(e: &SessionError) -> warp::reply::Response {
    let status = match e {
        SessionError::MissingField(_) => StatusCode::BAD_REQUEST,
        SessionError::NotFound => StatusCode::NOT_FOUND,
        SessionError::InvalidTransition { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    reply::with_status(reply::json(&ApiError { message: e.to_string() }), status).into_response()
}

/// GET / -> embedded dashboard
pub fn dashboard_route() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path::end().and(warp::get()).and_then(|| async move {
        let res = match Assets::get("index.html") {
            Some(asset) => {
                let mime = mime_guess::from_path("index.html").first_or_octet_stream();
                reply::with_header(
                    asset.data.into_owned(),
                    "Content-Type",
                    mime.as_ref().to_string(),
                )
                .into_response()
            }
            None => reply::with_status(
                reply::json(&ApiError {
                    message: "Dashboard asset missing".to_string(),
                }),
                StatusCode::NOT_FOUND,
            )
            .into_response(),
        };
        Ok::<_, Rejection>(res)
    })
}

/// POST /login -> create a session record
pub fn login_route(
    manager: Arc<SessionManager>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("login")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(connection_context())
        .and_then(move |body: LoginRequest, ctx: ConnectionContext| {
            let manager = manager.clone();
            async move {
                let request = SessionRequest {
                    email: body.email,
                    nickname: body.nickname,
                    client_mac: body.mac_address,
                };
                let res = match manager.create_session(request, &ctx).await {
                    Ok(session) => reply::with_status(
                        reply::json(&LoginResponse {
                            message: "Login successful.".to_string(),
                            session_id: session.id,
                            client_addr: session.client_addr,
                            client_mac: session.client_mac,
                            host_addr: session.host_addr,
                            host_mac: session.host_mac,
                        }),
                        StatusCode::OK,
                    )
                    .into_response(),
                    Err(e) => error_response(&e),
                };
                Ok::<_, Rejection>(res)
            }
        })
}

/// POST /logout -> terminate a session record
///
/// The response also expires the transport cookie; that artifact carries no
/// state of its own, so a client ignoring the header loses nothing but a
/// stale cookie.
pub fn logout_route(
    manager: Arc<SessionManager>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("logout")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and_then(move |body: LogoutRequest| {
            let manager = manager.clone();
            async move {
                let res = match manager.terminate_session(&body.session_id).await {
                    Ok(_) => reply::with_header(
                        reply::with_status(
                            reply::json(&MessageResponse {
                                message: "Logout successful.".to_string(),
                            }),
                            StatusCode::OK,
                        ),
                        "Set-Cookie",
                        "ruche.sid=; Max-Age=0; HttpOnly",
                    )
                    .into_response(),
                    Err(e) => error_response(&e),
                };
                Ok::<_, Rejection>(res)
            }
        })
}

/// PUT /update -> partial update of a session record
pub fn update_route(
    manager: Arc<SessionManager>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("update")
        .and(warp::path::end())
        .and(warp::put())
        .and(warp::body::json())
        .and_then(move |body: UpdateRequest| {
            let manager = manager.clone();
            async move {
                let update = SessionUpdate {
                    email: body.email,
                    nickname: body.nickname,
                    status: body.status,
                };
                let res = match manager.update_session(&body.session_id, update).await {
                    Ok(session) => reply::with_status(
                        reply::json(&SessionResponse {
                            message: "Session updated.".to_string(),
                            session: SessionView::from(session),
                        }),
                        StatusCode::OK,
                    )
                    .into_response(),
                    Err(e) => error_response(&e),
                };
                Ok::<_, Rejection>(res)
            }
        })
}

/// GET /status?sessionId=... -> read-only view of one session record
pub fn status_route(
    manager: Arc<SessionManager>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("status")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<StatusQuery>())
        .and_then(move |query: StatusQuery| {
            let manager = manager.clone();
            async move {
                let res = match manager.query_session(&query.session_id).await {
                    Ok(session) => reply::with_status(
                        reply::json(&SessionResponse {
                            message: "Session found.".to_string(),
                            session: SessionView::from(session),
                        }),
                        StatusCode::OK,
                    )
                    .into_response(),
                    Err(e) => error_response(&e),
                };
                Ok::<_, Rejection>(res)
            }
        })
}

/// GET /sessions -> every session record; an empty directory is an empty
/// list, not an error
pub fn list_sessions_route(
    manager: Arc<SessionManager>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("sessions")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(move || {
            let manager = manager.clone();
            async move {
                let res = match manager.list_sessions().await {
                    Ok(sessions) => reply::with_status(
                        reply::json(&SessionListResponse {
                            message: "All sessions.".to_string(),
                            sessions: sessions.into_iter().map(SessionView::from).collect(),
                        }),
                        StatusCode::OK,
                    )
                    .into_response(),
                    Err(e) => error_response(&e),
                };
                Ok::<_, Rejection>(res)
            }
        })
}

/// GET /sessions/active -> the Active subset
pub fn list_active_sessions_route(
    manager: Arc<SessionManager>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("sessions" / "active")
        .and(warp::get())
        .and_then(move || {
            let manager = manager.clone();
            async move {
                let res = match manager.list_active_sessions().await {
                    Ok(sessions) => reply::with_status(
                        reply::json(&SessionListResponse {
                            message: "Active sessions.".to_string(),
                            sessions: sessions.into_iter().map(SessionView::from).collect(),
                        }),
                        StatusCode::OK,
                    )
                    .into_response(),
                    Err(e) => error_response(&e),
                };
                Ok::<_, Rejection>(res)
            }
        })
}

/// DELETE /sessions -> unconditional purge of the directory
pub fn purge_sessions_route(
    manager: Arc<SessionManager>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("sessions")
        .and(warp::path::end())
        .and(warp::delete())
        .and_then(move || {
            let manager = manager.clone();
            async move {
                let res = match manager.purge_sessions().await {
                    Ok(removed) => reply::with_status(
                        reply::json(&PurgeResponse {
                            message: "All sessions removed.".to_string(),
                            removed,
                        }),
                        StatusCode::OK,
                    )
                    .into_response(),
                    Err(e) => error_response(&e),
                };
                Ok::<_, Rejection>(res)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::types::StorageError;
    use crate::session_management::SessionStatus;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_response(&SessionError::MissingField("email")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(&SessionError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(&SessionError::InvalidTransition {
                from: SessionStatus::FinishedByUser,
                to: SessionStatus::Active,
            })
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_response(&SessionError::StorageError(StorageError::WriteFailed)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
