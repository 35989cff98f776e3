mod ids;
mod member;
mod meta;
mod relation;
mod tags;
mod way;
mod way_buffer;

pub use ids::{NodeId, ObjectId, RelationId, WayId};
pub use member::Member;
pub use meta::ObjectMeta;
pub use relation::Relation;
pub use tags::{Tag, TagList};
pub use way::Way;
pub use way_buffer::WayBuffer;
