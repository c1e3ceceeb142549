use std::sync::Arc;

use poem::Request;
use poem_ext::{add_response_schemas, custom_auth};
use poem_openapi::{auth::Bearer, payload::Json, ApiResponse, Object};
use tracing::error;
use uuid::Uuid;

use crate::{
    jwt::{verify_jwt, UserAccessToken},
    SharedState,
};

#[derive(Debug)]
pub struct User {
    pub id: Uuid,
    pub email_verified: bool,
    pub admin: bool,
    pub trainer: bool,
}

impl User {
    /// Whether the user may manage exercises and grade submissions.
    pub fn is_trainer(&self) -> bool {
        self.admin || self.trainer
    }
}

#[derive(Debug)]
pub struct VerifiedUserAuth(pub User);

#[derive(Debug)]
pub struct TrainerAuth(pub User);

async fn user_auth_check(req: &Request, token: Option<Bearer>) -> Result<User, Response> {
    let Bearer { token } =
        token.ok_or_else(|| Response::unauthorized("No bearer token in Authorization header"))?;
    let state = req
        .data::<Arc<SharedState>>()
        .expect("request does not have SharedState data");
    let user = verify_jwt::<UserAccessToken>(token.as_str(), &state.jwt_secret)
        .map_err(|_| Response::unauthorized("Invalid bearer token"))?;
    match user.is_revoked(&mut state.auth_redis.clone()).await {
        Ok(false) => {}
        Ok(true) => return Err(Response::unauthorized("Session has been revoked")),
        Err(err) => {
            error!("could not check session revocation: {err}");
            return Err(Response::unauthorized("Could not verify session"));
        }
    }
    Ok(User {
        id: user.uid,
        email_verified: user.data.email_verified,
        admin: user.data.admin,
        trainer: user.data.trainer,
    })
}

async fn verified_user_auth_check(req: &Request, token: Option<Bearer>) -> Result<User, Response> {
    let user = user_auth_check(req, token).await?;
    match user.email_verified {
        true => Ok(user),
        false => Err(Response::forbidden("Unverified user email")),
    }
}

async fn trainer_auth_check(req: &Request, token: Option<Bearer>) -> Result<User, Response> {
    let user = verified_user_auth_check(req, token).await?;
    match user.is_trainer() {
        true => Ok(user),
        false => Err(Response::forbidden("User is not a trainer")),
    }
}

custom_auth!(VerifiedUserAuth, verified_user_auth_check);
custom_auth!(TrainerAuth, trainer_auth_check);

add_response_schemas!(VerifiedUserAuth, Response);
add_response_schemas!(TrainerAuth, Response);

#[derive(Object)]
struct Error {
    error: String,
    reason: String,
}

#[derive(ApiResponse)]
enum Response {
    /// The user is unauthenticated.
    #[oai(status = 401)]
    Unauthorized(Json<Error>),
    /// The authenticated user is not allowed to perform this action.
    #[oai(status = 403)]
    Forbidden(Json<Error>),
}

impl Response {
    fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized(Json(Error {
            error: "unauthorized".into(),
            reason: reason.into(),
        }))
    }

    fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(Json(Error {
            error: "forbidden".into(),
            reason: reason.into(),
        }))
    }
}
