use crate::{
    params::segment,
    query::{QueryMethod, QueryResource, SortOrder},
    Client, Result,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The profile of a user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// The id of the user.
    pub id: String,
    /// The first name of the user.
    pub first_name: Option<String>,
    /// The last name of the user.
    pub last_name: Option<String>,
    /// The email of the user.
    pub email: Option<String>,
}

/// Properties users can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserSorting {
    /// by id
    UserId,
    /// by first name
    FirstName,
    /// by last name
    LastName,
    /// by email
    Email,
}

/// Filter for users.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    /// Filter by user id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Filter by a list of user ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub id_in: Vec<String>,
    /// Filter by first name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Filter by first names that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name_like: Option<String>,
    /// Filter by last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Filter by last names that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name_like: Option<String>,
    /// Filter by email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Filter by emails that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_like: Option<String>,
    /// Only include members of the group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_of_group: Option<String>,
    /// Only include members of the tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_of_tenant: Option<String>,
    /// Only include users who may start the process definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_starter: Option<String>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<UserSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// The password of a user.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct UserCredentials {
    /// The password.
    pub password: String,
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials").finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct NewUser<'a> {
    profile: &'a UserProfile,
    credentials: &'a UserCredentials,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsUpdate<'a> {
    password: &'a str,
    authenticated_user_password: &'a str,
}

/// Users.
#[derive(Clone, Debug)]
pub struct UserService {
    client: Client,
}

impl UserService {
    pub(crate) fn new(client: Client) -> Self {
        UserService { client }
    }

    /// Query users.
    pub fn query(&self, query: UserQuery) -> QueryResource<UserQuery, UserProfile> {
        QueryResource::new(self.client.clone(), "/user", QueryMethod::Get, query)
    }

    /// Create a user.
    #[tracing::instrument(skip(self), fields(user_id = %profile.id), name = "create_user", err)]
    pub async fn create(&self, profile: &UserProfile, credentials: &UserCredentials) -> Result<()> {
        self.client
            .post("/user/create")
            .json(&NewUser {
                profile,
                credentials,
            })?
            .send_empty()
            .await
    }

    /// A user by id.
    pub fn by_id(&self, user_id: &str) -> UserResource {
        UserResource {
            client: self.client.clone(),
            path: format!("/user/{}", segment(user_id)),
        }
    }
}

/// A single user.
#[derive(Clone, Debug)]
pub struct UserResource {
    client: Client,
    path: String,
}

impl UserResource {
    /// Retrieve the profile of the user.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_user_profile", err)]
    pub async fn profile(&self) -> Result<UserProfile> {
        self.client
            .get(format!("{}/profile", self.path))
            .send()
            .await
    }

    /// Update the profile of the user.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "update_user_profile", err)]
    pub async fn update_profile(&self, profile: &UserProfile) -> Result<()> {
        self.client
            .put(format!("{}/profile", self.path))
            .json(profile)?
            .send_empty()
            .await
    }

    /// Change the password of the user. The password of the authenticated
    /// user is required to confirm the change.
    #[tracing::instrument(skip_all, fields(path = %self.path), name = "update_user_credentials", err)]
    pub async fn update_credentials(
        &self,
        password: &str,
        authenticated_user_password: &str,
    ) -> Result<()> {
        self.client
            .put(format!("{}/credentials", self.path))
            .json(&CredentialsUpdate {
                password,
                authenticated_user_password,
            })?
            .send_empty()
            .await
    }

    /// Delete the user.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "delete_user", err)]
    pub async fn delete(&self) -> Result<()> {
        self.client.delete(self.path.as_str()).send_empty().await
    }
}
