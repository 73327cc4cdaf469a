//! Cards: definitions, instances, the definition library and the instance
//! repository.
//!
//! ## Key Types
//!
//! - `DefinitionId` / `CardDefinition`: static card data (cost, effects, tags)
//! - `CardLibrary`: every definition a battle may reference
//! - `CardId` / `Card`: one instance in a battle, with runtime cost
//! - `CardRepository`: arena owning every instance, allocating ids

pub mod definition;
pub mod instance;
pub mod library;
pub mod repository;

pub use definition::{
    CardCategory, CardDefinition, CardEffect, CardTag, DefinitionId, EffectTarget, SelectionZone,
    TargetShape,
};
pub use instance::{Card, CardId};
pub use library::CardLibrary;
pub use repository::CardRepository;
