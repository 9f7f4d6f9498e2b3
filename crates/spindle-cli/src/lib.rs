pub mod console;
pub mod driver;
pub mod events;
pub mod script;
pub mod sys;
