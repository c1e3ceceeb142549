use std::{sync::Arc, time::Duration};

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use thiserror::Error;
use url::Url;

use self::courses::CoursesService;
use crate::jwt::{sign_jwt, InternalAuthToken, JwtError, JwtSecret};

pub mod courses;

#[derive(Debug, Clone)]
pub struct Services {
    pub courses: CoursesService,
}

impl Services {
    pub fn from_config(
        jwt_secret: JwtSecret,
        jwt_ttl: Duration,
        conf: &crate::config::Services,
    ) -> Self {
        let jwt_config = Arc::new(JwtConfig {
            secret: jwt_secret,
            ttl: jwt_ttl,
        });
        Self {
            courses: CoursesService::new(Service::new("courses", conf.courses.clone(), jwt_config)),
        }
    }
}

#[derive(Debug, Clone)]
struct JwtConfig {
    secret: JwtSecret,
    ttl: Duration,
}

#[derive(Debug, Clone)]
struct Service {
    name: &'static str,
    base_url: Url,
    jwt_config: Arc<JwtConfig>,
    client: Client,
}

impl Service {
    fn new(name: &'static str, base_url: Url, jwt_config: Arc<JwtConfig>) -> Self {
        Self {
            name,
            base_url,
            jwt_config,
            client: Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> ServiceResult<RequestBuilder> {
        let token = sign_jwt(
            InternalAuthToken {
                aud: self.name.into(),
            },
            &self.jwt_config.secret,
            self.jwt_config.ttl,
        )?;
        let url = self
            .base_url
            .join(&format!("_internal/{}", path.trim_start_matches('/')))?;
        Ok(self.client.request(method, url).bearer_auth(token))
    }
}

macro_rules! methods {
    ($($method:ident),*) => {
        paste::paste! {
            $(
                #[allow(dead_code)]
                fn $method(&self, path: &str) -> ServiceResult<RequestBuilder> {
                    self.request(Method::[< $method:upper >], path)
                }
            )*
        }
    };
}

impl Service {
    methods!(get, post, put, patch, delete, head);
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("could not sign internal auth token: {0}")]
    JwtError(#[from] JwtError),
    #[error("could not build url: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("unexpected response status code: {0}")]
    UnexpectedStatusCode(StatusCode),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
