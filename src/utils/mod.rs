//! Text helpers shared by the builder.

pub mod lucene;
