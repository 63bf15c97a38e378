mod detail;
mod movie;

pub use detail::{MovieDetail, ProductionCompany, ProductionCountry, SpokenLanguage};
pub use movie::{Genre, Movie, MovieSearchResult};
