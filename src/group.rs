use crate::{
    params::segment,
    query::{QueryMethod, QueryResource, SortOrder},
    Client, Result,
};
use serde::{Deserialize, Serialize};

/// A group of users.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    /// The id of the group.
    pub id: String,
    /// The name of the group.
    pub name: Option<String>,
    /// The type of the group, e.g. `WORKFLOW`.
    #[serde(rename = "type")]
    pub group_type: Option<String>,
}

/// Properties groups can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupSorting {
    /// by id
    Id,
    /// by name
    Name,
    /// by type
    Type,
}

/// Filter for groups.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupQuery {
    /// Filter by group id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Filter by a list of group ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub id_in: Vec<String>,
    /// Filter by group name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Filter by group names that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_like: Option<String>,
    /// Filter by group type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub group_type: Option<String>,
    /// Only include groups the user is a member of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    /// Only include groups which are members of the tenant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_of_tenant: Option<String>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<GroupSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Groups.
#[derive(Clone, Debug)]
pub struct GroupService {
    client: Client,
}

impl GroupService {
    pub(crate) fn new(client: Client) -> Self {
        GroupService { client }
    }

    /// Query groups.
    pub fn query(&self, query: GroupQuery) -> QueryResource<GroupQuery, GroupInfo> {
        QueryResource::new(self.client.clone(), "/group", QueryMethod::Get, query)
    }

    /// Create a group.
    #[tracing::instrument(skip(self), name = "create_group", err)]
    pub async fn create(&self, group: &GroupInfo) -> Result<()> {
        self.client
            .post("/group/create")
            .json(group)?
            .send_empty()
            .await
    }

    /// A group by id.
    pub fn by_id(&self, group_id: &str) -> GroupResource {
        GroupResource {
            client: self.client.clone(),
            path: format!("/group/{}", segment(group_id)),
        }
    }
}

/// A single group.
#[derive(Clone, Debug)]
pub struct GroupResource {
    client: Client,
    path: String,
}

impl GroupResource {
    /// Retrieve the group.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_group", err)]
    pub async fn get(&self) -> Result<GroupInfo> {
        self.client.get(self.path.as_str()).send().await
    }

    /// Update name and type of the group.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "update_group", err)]
    pub async fn update(&self, group: &GroupInfo) -> Result<()> {
        self.client
            .put(self.path.as_str())
            .json(group)?
            .send_empty()
            .await
    }

    /// Delete the group.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "delete_group", err)]
    pub async fn delete(&self) -> Result<()> {
        self.client.delete(self.path.as_str()).send_empty().await
    }

    /// Add a user to the group.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "add_group_member", err)]
    pub async fn add_member(&self, user_id: &str) -> Result<()> {
        self.client
            .put(format!("{}/members/{}", self.path, segment(user_id)))
            .send_empty()
            .await
    }

    /// Remove a user from the group.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "remove_group_member", err)]
    pub async fn remove_member(&self, user_id: &str) -> Result<()> {
        self.client
            .delete(format!("{}/members/{}", self.path, segment(user_id)))
            .send_empty()
            .await
    }
}
