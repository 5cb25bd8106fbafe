use std::fmt::Debug;

use schemars::JsonSchema;
use serde::Serialize;
pub use serde_with;
use utility::id::{HasId, Id};

pub mod coordinate;
pub mod dashboard;
pub mod device;
pub mod fix;
pub mod message;
pub mod record;

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }
}
