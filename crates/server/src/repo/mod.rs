pub mod case;
pub mod case_request;
pub mod hearing;
pub mod notification;
pub mod user;
