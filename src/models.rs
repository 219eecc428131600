pub mod agency;
pub mod consultant;
pub mod statistics;
pub mod visit;
