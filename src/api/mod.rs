pub mod attendance;
pub mod staff;
