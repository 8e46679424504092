pub mod chroma_config;

pub use chroma_config::ChromaConfig;
