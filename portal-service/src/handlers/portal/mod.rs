pub mod lookup;
pub mod magic_link;
pub mod members;
pub mod password;
pub mod session;
