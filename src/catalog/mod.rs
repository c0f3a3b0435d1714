//! Static lookup data: the sticker template library, mood and style tables, caption
//! translations and author nicknames.

pub mod library;
pub mod moods;
pub mod nickname;
pub mod styles;
pub mod translate;
