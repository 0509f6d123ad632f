pub mod roster;
pub mod session;
