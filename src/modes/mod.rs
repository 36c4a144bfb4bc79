pub mod controller;
pub mod human;
pub mod scheduler;

pub use controller::InputContext;
pub use human::{HumanMode, exit_report};
pub use scheduler::{Report, Scheduler, SharedGame};
