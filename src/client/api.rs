//! Access to the record store from the client side.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::http::{Envelope, ErrorBody};
use crate::model::{NewStudent, StudentRecord};
use crate::store::StudentStore;

/// The five CRUD calls the client cache is built on.
#[async_trait]
pub trait StudentsApi: Send + Sync {
    async fn list(&self) -> Result<Vec<StudentRecord>>;
    async fn get(&self, id: &str) -> Result<StudentRecord>;
    async fn create(&self, input: &NewStudent) -> Result<StudentRecord>;
    async fn update(&self, id: &str, input: &NewStudent) -> Result<StudentRecord>;
    async fn delete(&self, id: &str) -> Result<StudentRecord>;
}

/// Talks to a running server over `/api/students`.
#[derive(Debug, Clone)]
pub struct HttpStudentsApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpStudentsApi {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:5000/api`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| Error::ConfigValidation {
            message: format!("invalid api base url {base_url:?}: {e}"),
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::ConfigValidation {
                message: format!("api base url {base_url:?} cannot carry a path"),
            });
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    fn url(&self, id: Option<&str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("students");
            if let Some(id) = id {
                path.push(id);
            }
        }
        url
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response, id: Option<&str>) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        let envelope: Envelope<T> = resp.json().await?;
        return Ok(envelope.data);
    }
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(Error::not_found(id));
        }
    }
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
    };
    if status == StatusCode::BAD_REQUEST {
        return Err(Error::validation(message));
    }
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl StudentsApi for HttpStudentsApi {
    async fn list(&self) -> Result<Vec<StudentRecord>> {
        let resp = self.client.get(self.url(None)).send().await?;
        decode(resp, None).await
    }

    async fn get(&self, id: &str) -> Result<StudentRecord> {
        let resp = self.client.get(self.url(Some(id))).send().await?;
        decode(resp, Some(id)).await
    }

    async fn create(&self, input: &NewStudent) -> Result<StudentRecord> {
        let resp = self.client.post(self.url(None)).json(input).send().await?;
        decode(resp, None).await
    }

    async fn update(&self, id: &str, input: &NewStudent) -> Result<StudentRecord> {
        let resp = self
            .client
            .put(self.url(Some(id)))
            .json(input)
            .send()
            .await?;
        decode(resp, Some(id)).await
    }

    async fn delete(&self, id: &str) -> Result<StudentRecord> {
        let resp = self.client.delete(self.url(Some(id))).send().await?;
        decode(resp, Some(id)).await
    }
}

/// Goes straight to a store in this process, for offline use.
#[derive(Debug, Clone)]
pub struct LocalStudentsApi {
    store: Arc<StudentStore>,
}

impl LocalStudentsApi {
    pub fn new(store: Arc<StudentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StudentsApi for LocalStudentsApi {
    async fn list(&self) -> Result<Vec<StudentRecord>> {
        self.store.list()
    }

    async fn get(&self, id: &str) -> Result<StudentRecord> {
        self.store.get(id)
    }

    async fn create(&self, input: &NewStudent) -> Result<StudentRecord> {
        self.store.create(input)
    }

    async fn update(&self, id: &str, input: &NewStudent) -> Result<StudentRecord> {
        self.store.update(id, input)
    }

    async fn delete(&self, id: &str) -> Result<StudentRecord> {
        self.store.delete(id)
    }
}

#[async_trait]
impl<T: StudentsApi + ?Sized> StudentsApi for Box<T> {
    async fn list(&self) -> Result<Vec<StudentRecord>> {
        (**self).list().await
    }

    async fn get(&self, id: &str) -> Result<StudentRecord> {
        (**self).get(id).await
    }

    async fn create(&self, input: &NewStudent) -> Result<StudentRecord> {
        (**self).create(input).await
    }

    async fn update(&self, id: &str, input: &NewStudent) -> Result<StudentRecord> {
        (**self).update(id, input).await
    }

    async fn delete(&self, id: &str) -> Result<StudentRecord> {
        (**self).delete(id).await
    }
}
