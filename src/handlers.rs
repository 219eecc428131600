pub mod agencies;
pub mod consultants;
pub mod visits;
