pub mod match_status;
pub mod positions;
pub mod standings;
