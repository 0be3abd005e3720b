pub mod file;
pub mod health;
pub mod meetings;
