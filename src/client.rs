use crate::{
    case_definition::CaseDefinitionService,
    case_execution::CaseExecutionService,
    decision_definition::DecisionDefinitionService,
    deployment::DeploymentService,
    engine::EngineService,
    error::{Error, Result},
    execution::ExecutionService,
    external_task::ExternalTaskService,
    group::GroupService,
    handler::{ErrorHandler, ResponseHandler},
    history::HistoryService,
    incident::IncidentService,
    job::JobService,
    job_definition::JobDefinitionService,
    message::MessageService,
    oauth::{OAuthConfig, TokenProvider},
    process_definition::ProcessDefinitionService,
    process_instance::ProcessInstanceService,
    signal::SignalService,
    tenant::TenantService,
    user::UserService,
    user_task::UserTaskService,
    variable_instance::VariableInstanceService,
};
use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const REST_URL_VAR: &str = "CAMUNDA_REST_URL";
const USERNAME_VAR: &str = "CAMUNDA_USERNAME";
const PASSWORD_VAR: &str = "CAMUNDA_PASSWORD";
const REQUEST_TIMEOUT_VAR: &str = "CAMUNDA_REQUEST_TIMEOUT";

/// The REST endpoint of a default local engine distribution.
pub const DEFAULT_HOST_URL: &str = "http://localhost:8080/engine-rest";

/// Client used to communicate with the Camunda REST API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct Client {
    pub(crate) http_client: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) handler: Arc<dyn ResponseHandler>,
    pub(crate) auth: Auth,
}

#[derive(Clone, Debug)]
pub(crate) enum Auth {
    None,
    Basic(BasicAuth),
    OAuth(TokenProvider),
}

impl Client {
    /// Create a client bound to the given REST endpoint, e.g.
    /// `http://localhost:8080/engine-rest`.
    pub fn new<T: Into<String>>(host_url: T) -> Result<Self> {
        Client::from_config(ClientConfig::with_host_url(host_url))
    }

    /// Create a client which passes every response through `handler` instead
    /// of the default [`ErrorHandler`].
    pub fn with_handler<T, H>(host_url: T, handler: H) -> Result<Self>
    where
        T: Into<String>,
        H: ResponseHandler + 'static,
    {
        Client::from_config(ClientConfig::with_host_url(host_url).with_handler(handler))
    }

    /// Create a client on top of an existing HTTP client.
    pub fn from_http_client<T: Into<String>>(
        http_client: reqwest::Client,
        host_url: T,
    ) -> Result<Self> {
        Client::from_config(ClientConfig::with_host_url(host_url).with_http_client(http_client))
    }

    /// Build a new client from a given configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let ClientConfig {
            host_url,
            timeout,
            basic_auth,
            oauth,
            handler,
            http_client,
        } = config;

        let base_url = parse_host_url(host_url)?;

        let http_client = match http_client {
            Some(http_client) => http_client,
            None => {
                let builder = reqwest::Client::builder();
                let builder = match timeout {
                    Some(timeout) => builder.timeout(timeout),
                    None => builder,
                };
                builder.build()?
            }
        };

        let auth = match (oauth, basic_auth) {
            (Some(oauth), _) => Auth::OAuth(TokenProvider::new(oauth)?),
            (None, Some(basic)) => Auth::Basic(basic),
            (None, None) => Auth::None,
        };

        Ok(Client {
            http_client,
            base_url,
            handler: handler.unwrap_or_else(|| Arc::new(ErrorHandler) as Arc<dyn ResponseHandler>),
            auth,
        })
    }

    /// Build a new client from environment variables.
    ///
    /// Reads `CAMUNDA_REST_URL` (defaults to [`DEFAULT_HOST_URL`]),
    /// `CAMUNDA_REQUEST_TIMEOUT` in milliseconds, `CAMUNDA_USERNAME` and
    /// `CAMUNDA_PASSWORD` for basic auth, and the OAuth variables described on
    /// [`OAuthConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        let host_url = env::var(REST_URL_VAR).unwrap_or_else(|_| DEFAULT_HOST_URL.to_owned());
        let mut config = ClientConfig::with_host_url(host_url);

        if let Some(timeout) = env::var(REQUEST_TIMEOUT_VAR)
            .ok()
            .and_then(|timeout| timeout.parse().ok())
        {
            config = config.with_timeout(Duration::from_millis(timeout));
        }

        if let Ok(username) = env::var(USERNAME_VAR) {
            config = config.with_basic_auth(username, env::var(PASSWORD_VAR).ok());
        }

        if OAuthConfig::should_use_env_config() {
            config = config.with_oauth(OAuthConfig::from_env()?);
        }

        Client::from_config(config)
    }

    /// The base URL every request path is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Case definitions.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/case-definition/>
    pub fn case_definitions(&self) -> CaseDefinitionService {
        CaseDefinitionService::new(self.clone())
    }

    /// Case executions.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/case-execution/>
    pub fn case_executions(&self) -> CaseExecutionService {
        CaseExecutionService::new(self.clone())
    }

    /// Decision definitions.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/decision-definition/>
    pub fn decision_definitions(&self) -> DecisionDefinitionService {
        DecisionDefinitionService::new(self.clone())
    }

    /// Deployments.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/deployment/>
    pub fn deployments(&self) -> DeploymentService {
        DeploymentService::new(self.clone())
    }

    /// Engine metadata, such as the REST API version.
    pub fn engine(&self) -> EngineService {
        EngineService::new(self.clone())
    }

    /// Executions.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/execution/>
    pub fn executions(&self) -> ExecutionService {
        ExecutionService::new(self.clone())
    }

    /// External tasks.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/external-task/>
    pub fn external_tasks(&self) -> ExternalTaskService {
        ExternalTaskService::new(self.clone())
    }

    /// Groups.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/group/>
    pub fn groups(&self) -> GroupService {
        GroupService::new(self.clone())
    }

    /// Historic data.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/history/>
    pub fn history(&self) -> HistoryService {
        HistoryService::new(self.clone())
    }

    /// Incidents.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/incident/>
    pub fn incidents(&self) -> IncidentService {
        IncidentService::new(self.clone())
    }

    /// Job definitions.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/job-definition/>
    pub fn job_definitions(&self) -> JobDefinitionService {
        JobDefinitionService::new(self.clone())
    }

    /// Jobs.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/job/>
    pub fn jobs(&self) -> JobService {
        JobService::new(self.clone())
    }

    /// Message correlation.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/message/>
    pub fn messages(&self) -> MessageService {
        MessageService::new(self.clone())
    }

    /// Process definitions.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/process-definition/>
    pub fn process_definitions(&self) -> ProcessDefinitionService {
        ProcessDefinitionService::new(self.clone())
    }

    /// Process instances.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/process-instance/>
    pub fn process_instances(&self) -> ProcessInstanceService {
        ProcessInstanceService::new(self.clone())
    }

    /// Signals.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/signal/>
    pub fn signals(&self) -> SignalService {
        SignalService::new(self.clone())
    }

    /// Tenants.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/tenant/>
    pub fn tenants(&self) -> TenantService {
        TenantService::new(self.clone())
    }

    /// Users.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/user/>
    pub fn users(&self) -> UserService {
        UserService::new(self.clone())
    }

    /// User tasks.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/task/>
    pub fn user_tasks(&self) -> UserTaskService {
        UserTaskService::new(self.clone())
    }

    /// Variable instances.
    ///
    /// <https://docs.camunda.org/manual/7.9/reference/rest/variable-instance/>
    pub fn variable_instances(&self) -> VariableInstanceService {
        VariableInstanceService::new(self.clone())
    }
}

fn parse_host_url(host_url: String) -> Result<Url> {
    let url = Url::parse(&host_url).map_err(|err| Error::InvalidHostUrl {
        message: err.to_string(),
        url: host_url.clone(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(Error::InvalidHostUrl {
            message: "expected an http or https url".to_owned(),
            url: host_url,
        });
    }

    Ok(url)
}

/// Credentials for HTTP basic authentication.
#[derive(Clone)]
pub struct BasicAuth {
    /// The user name.
    pub username: String,
    /// The password, if any.
    pub password: Option<String>,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .finish()
    }
}

/// Config for establishing a camunda client.
#[derive(Debug)]
pub struct ClientConfig {
    /// The REST endpoint of the engine
    pub host_url: String,
    /// Total timeout per request; ignored when an http client is supplied
    pub timeout: Option<Duration>,
    /// HTTP basic authentication
    pub basic_auth: Option<BasicAuth>,
    /// OAuth client credentials; takes precedence over basic auth
    pub oauth: Option<OAuthConfig>,
    /// Response handler replacing the default [`ErrorHandler`]
    pub handler: Option<Arc<dyn ResponseHandler>>,
    /// HTTP client to use instead of a newly built one
    pub http_client: Option<reqwest::Client>,
}

impl ClientConfig {
    /// Set the REST endpoint the client should connect to.
    pub fn with_host_url<T: Into<String>>(host_url: T) -> Self {
        ClientConfig {
            host_url: host_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        ClientConfig {
            timeout: Some(timeout),
            ..self
        }
    }

    /// Use HTTP basic authentication.
    pub fn with_basic_auth<T: Into<String>>(self, username: T, password: Option<String>) -> Self {
        ClientConfig {
            basic_auth: Some(BasicAuth {
                username: username.into(),
                password,
            }),
            ..self
        }
    }

    /// Use OAuth client credentials.
    pub fn with_oauth(self, oauth: OAuthConfig) -> Self {
        ClientConfig {
            oauth: Some(oauth),
            ..self
        }
    }

    /// Replace the default response handler.
    pub fn with_handler<H: ResponseHandler + 'static>(self, handler: H) -> Self {
        ClientConfig {
            handler: Some(Arc::new(handler)),
            ..self
        }
    }

    /// Use an existing HTTP client as transport.
    pub fn with_http_client(self, http_client: reqwest::Client) -> Self {
        ClientConfig {
            http_client: Some(http_client),
            ..self
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            host_url: DEFAULT_HOST_URL.to_owned(),
            timeout: None,
            basic_auth: None,
            oauth: None,
            handler: None,
            http_client: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_host() {
        let err = Client::new("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidHostUrl { .. }));

        let err = Client::new("ftp://localhost/engine-rest").unwrap_err();
        assert!(matches!(err, Error::InvalidHostUrl { .. }));
    }

    #[test]
    fn keeps_base_path() {
        let client = Client::new("http://localhost:8080/engine-rest").unwrap();
        assert_eq!(client.base_url().path(), "/engine-rest");
    }

    #[test]
    fn basic_auth_debug_hides_password() {
        let config = ClientConfig::default().with_basic_auth("demo", Some("secret".into()));
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("demo"));
        assert!(!rendered.contains("secret"));
    }
}
