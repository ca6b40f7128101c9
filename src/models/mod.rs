pub mod activity;
pub mod company;
pub mod contact;
pub mod deal;
pub mod entity;
pub mod patient;
pub mod record;

pub use activity::*;
pub use company::*;
pub use contact::*;
pub use deal::*;
pub use entity::*;
pub use patient::*;
pub use record::*;
