//! Domain models.

pub mod comment;
pub mod group;
pub mod invitation;
pub mod like;
pub mod suggestion;
pub mod user;

pub use comment::*;
pub use group::*;
pub use invitation::*;
pub use like::*;
pub use suggestion::*;
pub use user::*;
