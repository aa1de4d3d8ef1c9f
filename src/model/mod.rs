pub mod attendance;
pub mod format;
pub mod role;
pub mod staff;
