use crate::objects::face::Face;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Group {
    pub name: String,
    pub faces: Vec<Face>,
    /// Material bound with `usemtl` while this group was current.
    pub material: Option<String>,
}

impl Group {
    pub fn new(name: &str) -> Self {
        return Group {
            name: name.to_string(),
            faces: Vec::new(),
            material: None,
        };
    }

    pub fn is_empty(&self) -> bool {
        return self.faces.is_empty();
    }

    pub fn len(&self) -> usize {
        return self.faces.len();
    }
}
