use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, header},
    response::{IntoResponseParts, ResponseParts},
};
use uuid::Uuid;

use crate::{
    AppState,
    session::{SESSION_COOKIE, Session},
};

/// The caller's browser session, started on first contact.
#[derive(Clone)]
pub struct ClientSession {
    pub id: Uuid,
    pub session: Arc<Session>,
    is_new: bool,
}

impl ClientSession {
    /// `Set-Cookie` for sessions started by this request.
    pub fn cookie(&self) -> SessionCookie {
        SessionCookie(
            self.is_new
                .then(|| format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id)),
        )
    }
}

impl std::ops::Deref for ClientSession {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl FromRequestParts<AppState> for ClientSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let existing = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| Uuid::parse_str(value).ok())
            .and_then(|id| state.sessions.get(&id).map(|session| (id, session)));

        let client = match existing {
            Some((id, session)) => ClientSession {
                id,
                session,
                is_new: false,
            },
            None => {
                let (id, session) = state.sessions.create();
                ClientSession {
                    id,
                    session,
                    is_new: true,
                }
            }
        };
        Ok(client)
    }
}

pub struct SessionCookie(Option<String>);

impl IntoResponseParts for SessionCookie {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if let Some(value) = self.0.and_then(|v| HeaderValue::from_str(&v).ok()) {
            res.headers_mut().append(header::SET_COOKIE, value);
        }
        Ok(res)
    }
}
