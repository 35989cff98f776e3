use super::{Area, AreaId, OuterRing};
use crate::model::osm::{ObjectMeta, TagList};

/// append-only buffer receiving assembled areas
#[derive(Debug, Default)]
pub struct AreaBuffer {
    areas: Vec<Area>,
}

impl AreaBuffer {
    pub fn new() -> AreaBuffer {
        AreaBuffer::default()
    }

    pub fn push(&mut self, area: Area) -> usize {
        self.areas.push(area);
        self.areas.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Area> {
        self.areas.get(index)
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn into_areas(self) -> Vec<Area> {
        self.areas
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut Area> {
        self.areas.get_mut(index)
    }
}

/// builds one area in place inside an [`AreaBuffer`].
///
/// construction immediately commits an attribute-only shell. areas without
/// rings are defined to be invalid, so if assembly is aborted before any
/// rings are added, consumers of the buffer see the invalid shell. on
/// success, tags and rings are added through the builder and the shell
/// becomes a valid area.
#[derive(Debug)]
pub struct AreaBuilder<'b> {
    buffer: &'b mut AreaBuffer,
    index: usize,
}

impl<'b> AreaBuilder<'b> {
    pub fn from_object(buffer: &'b mut AreaBuffer, id: AreaId, meta: ObjectMeta) -> AreaBuilder<'b> {
        let index = buffer.push(Area {
            id,
            meta,
            tags: TagList::new(),
            outer_rings: Vec::new(),
        });
        AreaBuilder { buffer, index }
    }

    /// position of the area under construction in the buffer
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn area(&self) -> &Area {
        &self.buffer.areas[self.index]
    }

    pub fn set_tags(&mut self, tags: TagList) {
        if let Some(area) = self.buffer.get_mut(self.index) {
            area.tags = tags;
        }
    }

    pub fn add_outer_ring(&mut self, ring: OuterRing) {
        if let Some(area) = self.buffer.get_mut(self.index) {
            area.outer_rings.push(ring);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AreaBuffer, AreaBuilder};
    use crate::model::area::{AreaId, OuterRing};
    use crate::model::osm::ObjectMeta;

    #[test]
    fn shell_is_committed_before_rings_arrive() {
        let mut buffer = AreaBuffer::new();
        let builder = AreaBuilder::from_object(&mut buffer, AreaId(42), ObjectMeta::default());
        let index = builder.index();
        drop(builder);
        // aborted assembly: the invalid shell remains visible
        let shell = buffer.get(index).unwrap();
        assert_eq!(shell.id, AreaId(42));
        assert!(!shell.is_valid());
    }

    #[test]
    fn rings_added_through_the_builder_make_the_area_valid() {
        let mut buffer = AreaBuffer::new();
        let mut builder = AreaBuilder::from_object(&mut buffer, AreaId(42), ObjectMeta::default());
        builder.add_outer_ring(OuterRing::default());
        let index = builder.index();
        assert!(buffer.get(index).unwrap().is_valid());
    }
}
