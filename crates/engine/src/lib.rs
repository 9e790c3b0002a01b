pub use error::EngineError;
pub use groups::Group;
pub use memberships::MembershipRole;
pub use ops::{Engine, EngineBuilder};
pub use shifts::Shift;
pub use users::User;

pub mod calendar;
mod error;
mod groups;
mod memberships;
mod ops;
mod shift_assignments;
mod shifts;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
