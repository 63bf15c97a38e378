mod api_types;
mod normalize;
mod provider;

pub use provider::OmdbProvider;
