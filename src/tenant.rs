use crate::{
    params::segment,
    query::{QueryMethod, QueryResource, SortOrder},
    Client, Result,
};
use serde::{Deserialize, Serialize};

/// A tenant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantInfo {
    /// The id of the tenant.
    pub id: String,
    /// The name of the tenant.
    pub name: Option<String>,
}

/// Properties tenants can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TenantSorting {
    /// by id
    Id,
    /// by name
    Name,
}

/// Filter for tenants.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantQuery {
    /// Filter by tenant id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Filter by tenant name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Filter by tenant names that the parameter is a substring of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_like: Option<String>,
    /// Only include tenants the user is a member of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_member: Option<String>,
    /// Only include tenants the group is a member of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_member: Option<String>,
    /// With `user_member`, also include tenants of the user's groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub including_groups_of_user: Option<bool>,
    /// Sort the results by a given criterion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<TenantSorting>,
    /// Sort the results in a given order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Tenants.
#[derive(Clone, Debug)]
pub struct TenantService {
    client: Client,
}

impl TenantService {
    pub(crate) fn new(client: Client) -> Self {
        TenantService { client }
    }

    /// Query tenants.
    pub fn query(&self, query: TenantQuery) -> QueryResource<TenantQuery, TenantInfo> {
        QueryResource::new(self.client.clone(), "/tenant", QueryMethod::Get, query)
    }

    /// Create a tenant.
    #[tracing::instrument(skip(self), name = "create_tenant", err)]
    pub async fn create(&self, tenant: &TenantInfo) -> Result<()> {
        self.client
            .post("/tenant/create")
            .json(tenant)?
            .send_empty()
            .await
    }

    /// A tenant by id.
    pub fn by_id(&self, tenant_id: &str) -> TenantResource {
        TenantResource {
            client: self.client.clone(),
            path: format!("/tenant/{}", segment(tenant_id)),
        }
    }
}

/// A single tenant.
#[derive(Clone, Debug)]
pub struct TenantResource {
    client: Client,
    path: String,
}

impl TenantResource {
    /// Retrieve the tenant.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "get_tenant", err)]
    pub async fn get(&self) -> Result<TenantInfo> {
        self.client.get(self.path.as_str()).send().await
    }

    /// Update the name of the tenant.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "update_tenant", err)]
    pub async fn update(&self, tenant: &TenantInfo) -> Result<()> {
        self.client
            .put(self.path.as_str())
            .json(tenant)?
            .send_empty()
            .await
    }

    /// Delete the tenant.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "delete_tenant", err)]
    pub async fn delete(&self) -> Result<()> {
        self.client.delete(self.path.as_str()).send_empty().await
    }

    /// Make a user a member of the tenant.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "add_tenant_user", err)]
    pub async fn add_user(&self, user_id: &str) -> Result<()> {
        self.client
            .put(format!("{}/user-members/{}", self.path, segment(user_id)))
            .send_empty()
            .await
    }

    /// Remove a user from the tenant.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "remove_tenant_user", err)]
    pub async fn remove_user(&self, user_id: &str) -> Result<()> {
        self.client
            .delete(format!("{}/user-members/{}", self.path, segment(user_id)))
            .send_empty()
            .await
    }

    /// Make a group a member of the tenant.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "add_tenant_group", err)]
    pub async fn add_group(&self, group_id: &str) -> Result<()> {
        self.client
            .put(format!("{}/group-members/{}", self.path, segment(group_id)))
            .send_empty()
            .await
    }

    /// Remove a group from the tenant.
    #[tracing::instrument(skip(self), fields(path = %self.path), name = "remove_tenant_group", err)]
    pub async fn remove_group(&self, group_id: &str) -> Result<()> {
        self.client
            .delete(format!("{}/group-members/{}", self.path, segment(group_id)))
            .send_empty()
            .await
    }
}
