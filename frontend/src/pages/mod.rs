pub mod carrier;
pub mod dashboard;
pub mod forgot_password;
pub mod login;
pub mod register;
pub mod status;
