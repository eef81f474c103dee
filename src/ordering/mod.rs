mod favorites;

pub use favorites::{Direction, Favoritable, OrderedFavoriteList};
