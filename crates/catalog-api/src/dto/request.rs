//! Request DTOs with validation.
//!
//! These carry shape rules only. Configured size limits and uniqueness are
//! checked by the services.

use serde::{Deserialize, Serialize};
use validator::Validate;

use catalog_core::types::id::{PluginId, TeamId};
use catalog_entity::project::AttachmentInput;
use catalog_entity::user::UserRole;
use catalog_service::{
    CreatePluginRequest, CreateProjectRequest, CreateTeamRequest, CreateUserRequest,
    UpdatePluginRequest, UpdateProjectRequest, UpdateTeamRequest, UpdateUserRequest,
};

/// One plugin attachment in a project body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AttachmentBody {
    /// Global plugin id.
    pub plugin_id: PluginId,
    /// Project-specific URL.
    #[validate(length(min = 1, message = "Plugin URL is required"))]
    pub url: String,
    /// Project-specific label.
    #[serde(default)]
    pub display_name: String,
}

impl From<AttachmentBody> for AttachmentInput {
    fn from(body: AttachmentBody) -> Self {
        Self {
            plugin_id: body.plugin_id,
            url: body.url,
            display_name: body.display_name,
        }
    }
}

/// Create project request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProjectBody {
    /// Project name.
    #[validate(length(min = 1, message = "Project name is required"))]
    pub name: String,
    /// Client name.
    #[serde(default)]
    pub client_name: String,
    /// Offer reference.
    #[serde(default)]
    pub offer_id: String,
    /// Notes.
    pub notes: Option<String>,
    /// Owning team.
    pub team_id: Option<TeamId>,
    /// Attachments.
    #[serde(default)]
    #[validate(nested)]
    pub plugins: Vec<AttachmentBody>,
}

impl From<CreateProjectBody> for CreateProjectRequest {
    fn from(body: CreateProjectBody) -> Self {
        Self {
            name: body.name,
            client_name: body.client_name,
            offer_id: body.offer_id,
            notes: body.notes,
            team_id: body.team_id,
            plugins: body.plugins.into_iter().map(Into::into).collect(),
        }
    }
}

/// Update project request body. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProjectBody {
    /// New name.
    #[validate(length(min = 1, message = "Project name must not be empty"))]
    pub name: Option<String>,
    /// New client name.
    pub client_name: Option<String>,
    /// New offer reference.
    pub offer_id: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// New owning team.
    pub team_id: Option<TeamId>,
    /// New archive state.
    pub is_archived: Option<bool>,
    /// Full replacement attachment list.
    #[validate(nested)]
    pub plugins: Option<Vec<AttachmentBody>>,
}

impl From<UpdateProjectBody> for UpdateProjectRequest {
    fn from(body: UpdateProjectBody) -> Self {
        Self {
            name: body.name,
            client_name: body.client_name,
            offer_id: body.offer_id,
            notes: body.notes,
            team_id: body.team_id,
            is_archived: body.is_archived,
            plugins: body
                .plugins
                .map(|list| list.into_iter().map(Into::into).collect()),
        }
    }
}

/// Create team request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTeamBody {
    /// Team name.
    #[validate(length(min = 1, message = "Team name is required"))]
    pub name: String,
    /// Description.
    pub description: Option<String>,
}

impl From<CreateTeamBody> for CreateTeamRequest {
    fn from(body: CreateTeamBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
        }
    }
}

/// Update team request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTeamBody {
    /// New name.
    #[validate(length(min = 1, message = "Team name must not be empty"))]
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
}

impl From<UpdateTeamBody> for UpdateTeamRequest {
    fn from(body: UpdateTeamBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
        }
    }
}

/// Create plugin request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePluginBody {
    /// Plugin name.
    #[validate(length(min = 1, message = "Plugin name is required"))]
    pub name: String,
    /// Description.
    pub description: Option<String>,
}

impl From<CreatePluginBody> for CreatePluginRequest {
    fn from(body: CreatePluginBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
        }
    }
}

/// Update plugin request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePluginBody {
    /// New name.
    #[validate(length(min = 1, message = "Plugin name must not be empty"))]
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New archive state.
    pub is_archived: Option<bool>,
}

impl From<UpdatePluginBody> for UpdatePluginRequest {
    fn from(body: UpdatePluginBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            is_archived: body.is_archived,
        }
    }
}

/// Create user request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserBody {
    /// Email.
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    /// Full name.
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    /// Role; defaults to member.
    #[serde(default = "default_role")]
    pub role: UserRole,
    /// Initial password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

fn default_role() -> UserRole {
    UserRole::Member
}

impl From<CreateUserBody> for CreateUserRequest {
    fn from(body: CreateUserBody) -> Self {
        Self {
            email: body.email,
            full_name: body.full_name,
            role: body.role,
            password: body.password,
        }
    }
}

/// Update user request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserBody {
    /// New email.
    #[validate(email(message = "Email is not valid"))]
    pub email: Option<String>,
    /// New full name.
    #[validate(length(min = 1, message = "Full name must not be empty"))]
    pub full_name: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
    /// Enable or disable the account.
    pub is_active: Option<bool>,
    /// New password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

impl From<UpdateUserBody> for UpdateUserRequest {
    fn from(body: UpdateUserBody) -> Self {
        Self {
            email: body.email,
            full_name: body.full_name,
            role: body.role,
            is_active: body.is_active,
            password: body.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::validated;

    #[test]
    fn test_blank_project_name_fails_shape_rules() {
        let body: CreateProjectBody = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert!(validated(body).is_err());
    }

    #[test]
    fn test_nested_attachment_rules_apply() {
        let body: UpdateProjectBody =
            serde_json::from_str(r#"{"plugins": [{"plugin_id": 1, "url": ""}]}"#).unwrap();
        assert!(validated(body).is_err());
    }

    #[test]
    fn test_user_email_is_checked() {
        let body: CreateUserBody =
            serde_json::from_str(r#"{"email": "nope", "full_name": "Ada"}"#).unwrap();
        assert!(validated(body).is_err());

        let body: CreateUserBody =
            serde_json::from_str(r#"{"email": "ada@example.com", "full_name": "Ada"}"#).unwrap();
        let body = validated(body).unwrap();
        assert_eq!(body.role, UserRole::Member);
    }
}
