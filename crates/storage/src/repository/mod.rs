pub mod competition;
pub mod overview;
pub mod sport;
pub mod stage;
