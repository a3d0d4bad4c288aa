use serde::Serialize;
use utoipa::ToSchema;

/// A message's reaction total after a reaction was added or removed.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(as = response::message::ReactionCount)]
pub(crate) struct ReactionCount {
    pub(crate) count: i64,
}
