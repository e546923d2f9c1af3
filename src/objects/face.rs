use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One corner of a face: resolved, 0-based indices into the store's sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceVertex {
    pub position: usize,
    pub texture: Option<usize>,
    pub normal: Option<usize>,
}

impl FaceVertex {
    pub fn new(position: usize, texture: Option<usize>, normal: Option<usize>) -> Self {
        return FaceVertex {
            position,
            texture,
            normal,
        };
    }

    pub fn position(position: usize) -> Self {
        return FaceVertex::new(position, None, None);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Face {
    vertices: Vec<FaceVertex>,
}

impl Face {
    pub fn new() -> Self {
        return Face {
            vertices: Vec::new(),
        };
    }

    pub fn with_capacity(capacity: usize) -> Self {
        return Face {
            vertices: Vec::with_capacity(capacity),
        };
    }

    pub fn add_vertex(&mut self, vertex: FaceVertex) {
        self.vertices.push(vertex);
    }

    pub fn len(&self) -> usize {
        return self.vertices.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.vertices.is_empty();
    }

    /// A face needs at least three corners to enclose an area.
    pub fn is_polygon(&self) -> bool {
        return self.vertices.len() >= 3;
    }

    pub fn get(&self, index: usize) -> Option<&FaceVertex> {
        return self.vertices.get(index);
    }

    pub fn vertices(&self) -> &[FaceVertex] {
        return &self.vertices;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FaceVertex> {
        return self.vertices.iter();
    }
}

impl Index<usize> for Face {
    type Output = FaceVertex;

    fn index(&self, index: usize) -> &Self::Output {
        return &self.vertices[index];
    }
}

impl<'a> IntoIterator for &'a Face {
    type Item = &'a FaceVertex;
    type IntoIter = std::slice::Iter<'a, FaceVertex>;

    fn into_iter(self) -> Self::IntoIter {
        return self.vertices.iter();
    }
}

impl FromIterator<FaceVertex> for Face {
    fn from_iter<I: IntoIterator<Item = FaceVertex>>(iter: I) -> Self {
        return Face {
            vertices: iter.into_iter().collect(),
        };
    }
}
