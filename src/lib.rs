//! Streaming Wavefront OBJ loader.
//!
//! Source lines are decoded one at a time into a [`DataStore`]: flat lists of
//! positions, texture coordinates and normals, plus named groups of faces whose
//! corners are resolved, 0-based indices into those lists. Triangulation and
//! GPU upload are left to the consumer of the finished store.
//!
//! ```
//! let store = scop_obj::parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\ng tri\nf 1 2 3").unwrap();
//!
//! assert_eq!(store.positions().len(), 3);
//! assert_eq!(store.groups()[0].name, "tri");
//! assert_eq!(store.groups()[0].faces[0][2].position, 2);
//! ```

pub mod objects;

pub use objects::*;
