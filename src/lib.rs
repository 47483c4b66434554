//! Release-title parsing library - heuristic metadata extraction from
//! download-search results and file/directory names.

pub mod cleanup;
pub mod models;
pub mod normalize;
pub mod parser;
pub mod patterns;
pub mod release_group;
pub mod validate;

pub use models::{
    ArtistTitleInfo, AudioCodec, AudioTagReader, AudioTags, Language, LanguageClassifier,
    ParsedAlbumInfo, ParsedTrackInfo, Quality, QualityClassifier,
};
pub use parser::ReleaseParser;
pub use release_group::resolve_release_group;
