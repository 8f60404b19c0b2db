//! Core math shared by the globe and the geography loader.

pub mod coordinates;
