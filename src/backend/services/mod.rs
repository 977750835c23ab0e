pub mod lifecycle;
pub mod media_service;
pub mod media_validator;
pub mod scheduler;
pub mod session;
pub mod wizard;
