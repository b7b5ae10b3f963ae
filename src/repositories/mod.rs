pub use self::{user::UserRepository, visitor::VisitorRepository};

mod user;
mod visitor;
