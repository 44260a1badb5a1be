pub mod changes;
pub mod dispatch;
pub mod patients;
