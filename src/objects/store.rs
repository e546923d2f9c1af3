//! Accumulated mesh data for one parse session.
//!
//! The store only ever grows: vertices, groups and faces are appended in
//! source order and never removed or reordered. Face references must already
//! be resolved when they reach the store, see [`DataStore::resolve_position`].

use crate::objects::error::{Attribute, FormatError};
use crate::objects::face::Face;
use crate::objects::group::Group;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_GROUP: &str = "default";

pub type Position = [f32; 3];
pub type TexCoord = [f32; 2];
pub type Normal = [f32; 3];

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataStore {
    positions: Vec<Position>,
    texcoords: Vec<TexCoord>,
    normals: Vec<Normal>,
    groups: Vec<Group>,
    material_libraries: Vec<String>,

    /// Index into `groups` that faces are appended to. `None` until the first
    /// group is pushed, explicitly or by the first face.
    #[cfg_attr(feature = "serde", serde(skip))]
    current: Option<usize>,
    #[cfg_attr(feature = "serde", serde(skip, default = "default_group_name"))]
    default_group: String,
}

#[cfg(feature = "serde")]
fn default_group_name() -> String {
    return DEFAULT_GROUP.to_string();
}

impl Default for DataStore {
    fn default() -> Self {
        return DataStore::new();
    }
}

impl DataStore {
    pub fn new() -> Self {
        return DataStore::with_default_group(DEFAULT_GROUP);
    }

    /// Store whose implicit group, created by a face with no group before it, is `name`.
    pub fn with_default_group(name: &str) -> Self {
        return DataStore {
            positions: Vec::new(),
            texcoords: Vec::new(),
            normals: Vec::new(),
            groups: Vec::new(),
            material_libraries: Vec::new(),
            current: None,
            default_group: name.to_string(),
        };
    }

    pub fn add_vertex(&mut self, position: Position) {
        self.positions.push(position);
    }

    pub fn add_texture(&mut self, uv: TexCoord) {
        self.texcoords.push(uv);
    }

    pub fn add_normal(&mut self, normal: Normal) {
        self.normals.push(normal);
    }

    /// Appends a new group and makes it current. Same-named groups are never merged.
    pub fn push_group(&mut self, name: &str) {
        self.groups.push(Group::new(name));
        self.current = Some(self.groups.len() - 1);
    }

    pub fn add_face(&mut self, face: Face) {
        let current = self.current_index();
        self.groups[current].faces.push(face);
    }

    /// Binds a material to the current group.
    ///
    /// When the current group already holds faces drawn with a different
    /// material, a group with the same name is pushed so that every group
    /// carries a single material.
    pub fn set_material(&mut self, name: &str) {
        let current = self.current_index();
        let group = &self.groups[current];

        if !group.is_empty() && group.material.as_deref() != Some(name) {
            let group_name = group.name.clone();
            self.push_group(&group_name);
        }

        let current = self.current_index();
        self.groups[current].material = Some(name.to_string());
    }

    pub fn add_material_library(&mut self, name: &str) {
        self.material_libraries.push(name.to_string());
    }

    fn current_index(&mut self) -> usize {
        if let Some(current) = self.current {
            return current;
        }

        let name = self.default_group.clone();
        self.push_group(&name);

        return self.groups.len() - 1;
    }

    pub fn resolve_position(&self, index: i64) -> Result<usize, FormatError> {
        return resolve(Attribute::Position, index, self.positions.len());
    }

    pub fn resolve_texture(&self, index: i64) -> Result<usize, FormatError> {
        return resolve(Attribute::Texture, index, self.texcoords.len());
    }

    pub fn resolve_normal(&self, index: i64) -> Result<usize, FormatError> {
        return resolve(Attribute::Normal, index, self.normals.len());
    }

    pub fn positions(&self) -> &[Position] {
        return &self.positions;
    }

    pub fn texcoords(&self) -> &[TexCoord] {
        return &self.texcoords;
    }

    pub fn normals(&self) -> &[Normal] {
        return &self.normals;
    }

    pub fn groups(&self) -> &[Group] {
        return &self.groups;
    }

    pub fn material_libraries(&self) -> &[String] {
        return &self.material_libraries;
    }

    pub fn current_group(&self) -> Option<&Group> {
        return self.current.map(|current| &self.groups[current]);
    }

    pub fn default_group(&self) -> &str {
        return &self.default_group;
    }

    pub fn face_count(&self) -> usize {
        return self.groups.iter().map(Group::len).sum();
    }

    pub fn is_empty(&self) -> bool {
        return self.positions.is_empty()
            && self.texcoords.is_empty()
            && self.normals.is_empty()
            && self.groups.is_empty();
    }
}

/// Turns a 1-based (or negative, counted from the end) index into a 0-based
/// one, against the sequence length at the time of the call.
fn resolve(attribute: Attribute, index: i64, len: usize) -> Result<usize, FormatError> {
    let invalid = || FormatError::InvalidIndex {
        attribute,
        index,
        len,
    };

    let resolved = match index {
        0 => return Err(invalid()),
        i if i > 0 => usize::try_from(i - 1).map_err(|_| invalid())?,
        i => {
            let back = usize::try_from(i.unsigned_abs()).map_err(|_| invalid())?;
            len.checked_sub(back).ok_or_else(invalid)?
        }
    };

    if resolved >= len {
        return Err(invalid());
    }

    return Ok(resolved);
}
