mod area;
mod area_buffer;
mod area_id;

pub use area::{Area, InnerRing, OuterRing};
pub use area_buffer::{AreaBuffer, AreaBuilder};
pub use area_id::AreaId;
