//! Pinecone access for the Orda knowledge index.
//!
//! The index has one namespace per kind of reference record. A
//! [`PineconeVectorStore`] is bound to a single namespace on the index's
//! data-plane host; [`PineconeIndexAdmin`] talks to the control plane to
//! find or create the index itself.

mod builder;
mod error;
mod index;
mod record;
mod store;
mod transport;
pub mod wire;

pub use builder::NamespaceStoreBuilder;
pub use error::PineconeStoreError;
pub use index::{IndexSpec, PineconeIndexAdmin, PINECONE_CONTROL_URL};
pub use store::PineconeVectorStore;
pub use wire::{IndexStats, NamespaceSummary};
