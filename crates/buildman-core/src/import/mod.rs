//! Reading the live account: page extractors and the reader that drives them.

pub mod extract;
pub mod reader;

pub use reader::RemoteStateReader;
