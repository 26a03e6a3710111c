pub mod competition;
pub mod competition_sport;
pub mod period;
pub mod sport;
pub mod stage;

pub use competition::Competition;
pub use competition_sport::CompetitionSport;
pub use period::CompetitionPeriod;
pub use sport::Sport;
pub use stage::Stage;
