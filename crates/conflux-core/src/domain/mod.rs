//! Domain model: identities, metadata, dictionaries, sources and commands.

pub mod command;
pub mod dictionary;
pub mod identity;
pub mod metadata;
pub mod source;

pub use command::Command;
pub use dictionary::ConfigDictionary;
pub use identity::{Identity, IdentityKind};
pub use metadata::Metadata;
pub use source::ConfigurationSource;
