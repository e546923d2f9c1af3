pub mod error;
pub mod face;
pub mod group;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod store;

pub use error::{Attribute, FormatError, ObjError, ObjResult};
pub use face::{Face, FaceVertex};
pub use group::Group;
pub use options::ParseOptions;
pub use parser::{load_obj, load_obj_with, parse_lines, parse_reader, parse_str, parse_str_with, Parser};
pub use store::{DataStore, Normal, Position, TexCoord, DEFAULT_GROUP};
