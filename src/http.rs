//! Translation of facade calls into HTTP requests.
use crate::client::{Auth, Client};
use crate::params::{self, UrlParameter};
use crate::{error, Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

enum Body {
    Empty,
    Json(Vec<u8>),
    Multipart(Form),
}

/// A single call against the REST API, built up from path, query and body.
pub(crate) struct Request {
    client: Client,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Body,
}

impl Client {
    pub(crate) fn request<P: Into<String>>(&self, method: Method, path: P) -> Request {
        Request {
            client: self.clone(),
            method,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
        }
    }

    pub(crate) fn get<P: Into<String>>(&self, path: P) -> Request {
        self.request(Method::GET, path)
    }

    pub(crate) fn post<P: Into<String>>(&self, path: P) -> Request {
        self.request(Method::POST, path)
    }

    pub(crate) fn put<P: Into<String>>(&self, path: P) -> Request {
        self.request(Method::PUT, path)
    }

    pub(crate) fn delete<P: Into<String>>(&self, path: P) -> Request {
        self.request(Method::DELETE, path)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let url = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&url).map_err(|err| Error::InvalidHostUrl {
            message: err.to_string(),
            url,
        })
    }
}

impl Request {
    /// Append all set fields of a query struct as URL parameters.
    pub(crate) fn query<Q: Serialize + ?Sized>(mut self, query: &Q) -> Result<Self> {
        self.query.extend(params::query_pairs(query)?);
        Ok(self)
    }

    /// Append a single URL parameter.
    pub(crate) fn param<V: UrlParameter>(mut self, name: &str, value: V) -> Self {
        self.query.push((name.to_owned(), value.to_url_parameter()));
        self
    }

    /// Append a URL parameter if it is set.
    pub(crate) fn param_opt<V: UrlParameter>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    pub(crate) fn params(mut self, params: &[(String, String)]) -> Self {
        self.query.extend_from_slice(params);
        self
    }

    /// Send a JSON body.
    pub(crate) fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let body = serde_json::to_vec(body)?;
        trace!(body = %String::from_utf8_lossy(&body), "request body");
        self.body = Body::Json(body);
        Ok(self)
    }

    /// Send a multipart form body.
    pub(crate) fn multipart(mut self, form: Form) -> Self {
        self.body = Body::Multipart(form);
        self
    }

    async fn execute(self) -> Result<reqwest::Response> {
        let Request {
            client,
            method,
            path,
            query,
            body,
        } = self;

        let mut url = client.endpoint(&path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }

        debug!(%method, %url, "sending request");

        let request = client.http_client.request(method, url);
        let request = match &client.auth {
            Auth::None => request,
            Auth::Basic(basic) => request.basic_auth(&basic.username, basic.password.as_ref()),
            Auth::OAuth(provider) => request.bearer_auth(provider.access_token().await?),
        };
        let request = match body {
            Body::Empty => request,
            Body::Json(body) => request.header(CONTENT_TYPE, "application/json").body(body),
            Body::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await?;
        trace!(status = %response.status(), "received response");

        let response = client.handler.handle(response).await?;
        error::check_status(response).await
    }

    /// Send the request and decode the JSON response.
    pub(crate) async fn send<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.execute().await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| {
            debug!(%err, body = %String::from_utf8_lossy(&body), "unexpected response body");
            Error::from(err)
        })
    }

    /// Send the request and discard any response body.
    pub(crate) async fn send_empty(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }

    /// Send the request and return the response body as text.
    pub(crate) async fn send_text(self) -> Result<String> {
        Ok(self.execute().await?.text().await?)
    }

    /// Send the request and return the raw response body.
    pub(crate) async fn send_bytes(self) -> Result<Vec<u8>> {
        Ok(self.execute().await?.bytes().await?.to_vec())
    }
}
