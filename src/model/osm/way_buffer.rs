use super::Way;
use crate::model::AssemblyError;

/// append-only storage for the member ways of a relation. `push` hands back a
/// non-zero offset that later retrieves the way; offset
/// [`WayBuffer::ABSENT_MEMBER`] marks a member that could not be resolved and
/// must be skipped.
#[derive(Debug, Default)]
pub struct WayBuffer {
    ways: Vec<Way>,
}

impl WayBuffer {
    pub const ABSENT_MEMBER: usize = 0;

    pub fn new() -> WayBuffer {
        WayBuffer::default()
    }

    pub fn push(&mut self, way: Way) -> usize {
        self.ways.push(way);
        self.ways.len()
    }

    pub fn get(&self, offset: usize) -> Result<&Way, AssemblyError> {
        if offset == Self::ABSENT_MEMBER || offset > self.ways.len() {
            return Err(AssemblyError::InvalidMemberOffset(offset, self.ways.len()));
        }
        Ok(&self.ways[offset - 1])
    }

    pub fn len(&self) -> usize {
        self.ways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ways.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::WayBuffer;
    use crate::model::osm::{Way, WayId};

    #[test]
    fn offsets_are_non_zero_handles() {
        let mut buffer = WayBuffer::new();
        let a = buffer.push(Way {
            id: WayId(10),
            ..Default::default()
        });
        let b = buffer.push(Way {
            id: WayId(11),
            ..Default::default()
        });
        assert_ne!(a, WayBuffer::ABSENT_MEMBER);
        assert_ne!(b, WayBuffer::ABSENT_MEMBER);
        assert_eq!(buffer.get(a).unwrap().id, WayId(10));
        assert_eq!(buffer.get(b).unwrap().id, WayId(11));
        assert!(buffer.get(WayBuffer::ABSENT_MEMBER).is_err());
        assert!(buffer.get(3).is_err());
    }
}
