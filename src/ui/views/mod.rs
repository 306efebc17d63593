pub mod class_detail;
pub mod home;
pub mod login;
pub mod material;
pub mod quiz;
pub mod register;
pub mod result;
