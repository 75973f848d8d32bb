pub mod lots;
pub mod report;
