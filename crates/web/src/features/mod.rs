pub mod competitions;
pub mod overview;
pub mod sports;
pub mod stages;
