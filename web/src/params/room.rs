use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = params::room::CreateParams)]
pub(crate) struct CreateParams {
    /// What the room is about
    pub(crate) theme: String,
}
