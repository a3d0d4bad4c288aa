use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = params::message::CreateParams)]
pub(crate) struct CreateParams {
    /// The question to post to the room
    pub(crate) message: String,
}
