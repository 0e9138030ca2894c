//! Request-independent logic: authorized writes and public reads

mod mutator;
mod reader;

pub use mutator::ResourceMutator;
pub use reader::ResourceReader;
