pub mod favorites;
pub mod favorites_store;

pub use favorites::{toggle, FavoritesDocument, FavoritesList};
pub use favorites_store::{
    DocumentFavoritesStore, FavoritesStore, FileFavoritesStore, MemoryFavoritesStore, StoreError,
    StoreResult,
};
