pub mod attendance;
pub mod core;
pub mod dashboard;
pub mod nav;
pub mod reports;
pub mod students;
pub mod view;
