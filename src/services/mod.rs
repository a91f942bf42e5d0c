// Services module - Business logic

pub mod pickup;
pub mod roster;
pub mod scope;
