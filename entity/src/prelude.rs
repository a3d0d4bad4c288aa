pub use super::messages::Entity as Messages;
pub use super::rooms::Entity as Rooms;
