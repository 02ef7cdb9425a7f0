pub mod analytics;
pub mod appointment;
pub mod billing;
pub mod enums;
pub mod patient;
pub mod staff;

pub use analytics::*;
pub use appointment::*;
pub use billing::*;
pub use enums::*;
pub use patient::*;
pub use staff::*;
