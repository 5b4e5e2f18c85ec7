pub mod case_requests;
pub mod cases;
pub mod hearings;
