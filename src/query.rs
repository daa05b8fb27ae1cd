//! Paged list and count queries shared by all resource facades.
use crate::{params::query_pairs, Client, Error, Result, UrlParameter};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Sort direction of a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// ascending
    Asc,
    /// descending
    Desc,
}

/// One sorting criterion of a query sent as JSON body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortingInfo<S> {
    /// The property to sort by.
    pub sort_by: S,
    /// The sort direction.
    pub sort_order: SortOrder,
}

impl<S> SortingInfo<S> {
    /// Sort ascending by the given property.
    pub fn asc(sort_by: S) -> Self {
        SortingInfo {
            sort_by,
            sort_order: SortOrder::Asc,
        }
    }

    /// Sort descending by the given property.
    pub fn desc(sort_by: S) -> Self {
        SortingInfo {
            sort_by,
            sort_order: SortOrder::Desc,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountResult {
    pub(crate) count: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum QueryMethod {
    /// Query fields are sent as URL parameters.
    Get,
    /// Query fields are sent as JSON body, paging stays in the URL.
    Post,
}

/// A query against a list endpoint, e.g. `GET /process-definition`.
///
/// Obtained from the `query` method of a facade; finish with [`list`],
/// [`list_page`] or [`count`].
///
/// [`list`]: QueryResource::list
/// [`list_page`]: QueryResource::list_page
/// [`count`]: QueryResource::count
pub struct QueryResource<Q, T> {
    client: Client,
    path: &'static str,
    method: QueryMethod,
    query: Q,
    params: Vec<(String, String)>,
    invalid_params: Option<Error>,
    first_result: Option<u64>,
    max_results: Option<u64>,
    _result: PhantomData<fn() -> T>,
}

impl<Q: fmt::Debug, T> fmt::Debug for QueryResource<Q, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryResource")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("query", &self.query)
            .field("params", &self.params)
            .field("first_result", &self.first_result)
            .field("max_results", &self.max_results)
            .finish()
    }
}

impl<Q, T> QueryResource<Q, T>
where
    Q: Serialize + fmt::Debug,
    T: DeserializeOwned,
{
    pub(crate) fn new(client: Client, path: &'static str, method: QueryMethod, query: Q) -> Self {
        QueryResource {
            client,
            path,
            method,
            query,
            params: Vec::new(),
            invalid_params: None,
            first_result: None,
            max_results: None,
            _result: PhantomData,
        }
    }

    /// Add a URL parameter which is sent with both list and count requests.
    pub(crate) fn with_param<V: UrlParameter>(mut self, name: &str, value: V) -> Self {
        self.params.push((name.to_owned(), value.to_url_parameter()));
        self
    }

    /// Add all fields of a serializable options struct as URL parameters.
    ///
    /// A struct which cannot be flattened fails the query once it is sent.
    pub(crate) fn with_params<P: Serialize>(mut self, params: &P) -> Self {
        match query_pairs(params) {
            Ok(pairs) => self.params.extend(pairs),
            Err(err) => self.invalid_params = Some(err),
        }
        self
    }

    /// Skip the first `first_result` results.
    pub fn first_result(self, first_result: u64) -> Self {
        QueryResource {
            first_result: Some(first_result),
            ..self
        }
    }

    /// Return at most `max_results` results.
    pub fn max_results(self, max_results: u64) -> Self {
        QueryResource {
            max_results: Some(max_results),
            ..self
        }
    }

    /// Fetch all matching results, honouring any configured paging.
    #[tracing::instrument(skip(self), fields(path = self.path), err)]
    pub async fn list(self) -> Result<Vec<T>> {
        debug!(query = ?self.query, first_result = ?self.first_result, max_results = ?self.max_results, "listing");
        if let Some(err) = self.invalid_params {
            return Err(err);
        }

        let request = match self.method {
            QueryMethod::Get => self.client.get(self.path).query(&self.query)?,
            QueryMethod::Post => self.client.post(self.path).json(&self.query)?,
        };

        request
            .params(&self.params)
            .param_opt("firstResult", self.first_result)
            .param_opt("maxResults", self.max_results)
            .send()
            .await
    }

    /// Fetch one page of matching results.
    pub async fn list_page(self, first_result: u64, max_results: u64) -> Result<Vec<T>> {
        self.first_result(first_result)
            .max_results(max_results)
            .list()
            .await
    }

    /// Count the matching results.
    #[tracing::instrument(skip(self), fields(path = self.path), err)]
    pub async fn count(self) -> Result<u64> {
        debug!(query = ?self.query, "counting");
        if let Some(err) = self.invalid_params {
            return Err(err);
        }

        let path = format!("{}/count", self.path);
        let request = match self.method {
            QueryMethod::Get => self.client.get(path).query(&self.query)?,
            QueryMethod::Post => self.client.post(path).json(&self.query)?,
        };

        let result: CountResult = request.params(&self.params).send().await?;
        Ok(result.count)
    }
}
