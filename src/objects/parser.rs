//! Line dispatcher turning OBJ source text into a [`DataStore`].
//!
//! Lines are consumed strictly in order: a face resolves its indices against
//! the sequence lengths reached so far, so a later `v` line can never change
//! what an earlier face refers to.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, trace, warn};

use crate::objects::error::{FormatError, ObjError, ObjResult};
use crate::objects::face::{Face, FaceVertex};
use crate::objects::lexer::{parse_float, parse_index, strip_comment, Directive, Lexer, Token};
use crate::objects::options::ParseOptions;
use crate::objects::store::{DataStore, Normal, Position, TexCoord};

/// A fully decoded line, ready to be applied to the store.
#[derive(Debug)]
enum Line {
    Vertex(Position),
    Texture(TexCoord),
    Normal(Normal),
    Face(Face),
    Group(String),
    Material(String),
    Libraries(Vec<String>),
    Skip,
}

/// A parse session.
///
/// Feed it lines with [`Parser::parse_line`] and collect the result with
/// [`Parser::finish`]. When a line fails, the store still holds everything
/// decoded before it and can be recovered with [`Parser::into_store`].
#[derive(Debug)]
pub struct Parser {
    options: ParseOptions,
    store: DataStore,
    line_number: usize,

    /// Text of a line ending in `\`, with the line number it started on.
    pending: Option<(usize, String)>,
}

impl Default for Parser {
    fn default() -> Self {
        return Parser::new(ParseOptions::default());
    }
}

impl Parser {
    pub fn new(options: ParseOptions) -> Self {
        let store = DataStore::with_default_group(&options.default_group);

        return Parser {
            options,
            store,
            line_number: 0,
            pending: None,
        };
    }

    pub fn options(&self) -> &ParseOptions {
        return &self.options;
    }

    /// Number of physical lines consumed so far.
    pub fn line_number(&self) -> usize {
        return self.line_number;
    }

    pub fn store(&self) -> &DataStore {
        return &self.store;
    }

    /// Gives up the session and returns what has been stored so far.
    pub fn into_store(self) -> DataStore {
        return self.store;
    }

    /// Decodes one physical line and applies it to the store.
    ///
    /// Nothing is stored for a line that fails to decode.
    pub fn parse_line(&mut self, line: &str) -> ObjResult<()> {
        self.line_number += 1;

        let line = line.strip_suffix('\r').unwrap_or(line);

        // A `\` inside a comment does not continue the line.
        if let Some(head) = strip_comment(line).trim_end().strip_suffix('\\') {
            match &mut self.pending {
                Some((_, text)) => {
                    text.push(' ');
                    text.push_str(head);
                }
                None => self.pending = Some((self.line_number, head.to_string())),
            }

            return Ok(());
        }

        return match self.pending.take() {
            Some((start, mut text)) => {
                text.push(' ');
                text.push_str(line);
                self.dispatch(start, &text)
            }
            None => self.dispatch(self.line_number, line),
        };
    }

    /// Ends the session, flushing a dangling continued line.
    pub fn finish(mut self) -> ObjResult<DataStore> {
        if let Some((start, text)) = self.pending.take() {
            self.dispatch(start, &text)?;
        }

        info!(
            lines = self.line_number,
            positions = self.store.positions().len(),
            texcoords = self.store.texcoords().len(),
            normals = self.store.normals().len(),
            groups = self.store.groups().len(),
            faces = self.store.face_count(),
            "Parsed OBJ source"
        );

        return Ok(self.store);
    }

    fn dispatch(&mut self, line: usize, text: &str) -> ObjResult<()> {
        let mut lexer = Lexer::new(text);
        let Some(keyword) = lexer.next_token() else {
            return Ok(());
        };

        match self.decode(line, keyword, &mut lexer)? {
            Line::Vertex(position) => self.store.add_vertex(position),
            Line::Texture(uv) => self.store.add_texture(uv),
            Line::Normal(normal) => self.store.add_normal(normal),
            Line::Face(face) => self.store.add_face(face),
            Line::Group(name) => {
                debug!(line, name = %name, "Pushing group");
                self.store.push_group(&name);
            }
            Line::Material(name) => self.store.set_material(&name),
            Line::Libraries(libraries) => {
                for library in &libraries {
                    self.store.add_material_library(library);
                }
            }
            Line::Skip => {}
        }

        return Ok(());
    }

    fn decode<'t>(&self, line: usize, keyword: Token<'t>, lexer: &mut Lexer<'t>) -> ObjResult<Line> {
        let directive = Directive::classify(keyword.text);

        return match directive {
            Directive::Vertex => {
                let values = decode_floats(line, lexer)?;
                if !(3..=4).contains(&values.len()) {
                    return Err(component_count(line, keyword, "v", "3 or 4", values.len()));
                }

                Ok(Line::Vertex([values[0], values[1], values[2]]))
            }

            Directive::Texture => {
                let values = decode_floats(line, lexer)?;
                if !(1..=3).contains(&values.len()) {
                    return Err(component_count(line, keyword, "vt", "1 to 3", values.len()));
                }

                Ok(Line::Texture([values[0], values.get(1).copied().unwrap_or(0.0)]))
            }

            Directive::Normal => {
                let values = decode_floats(line, lexer)?;
                if values.len() != 3 {
                    return Err(component_count(line, keyword, "vn", "3", values.len()));
                }

                Ok(Line::Normal([values[0], values[1], values[2]]))
            }

            Directive::Face => self.decode_face(line, keyword, lexer).map(Line::Face),

            Directive::Group | Directive::Object => {
                let name = match lexer.rest() {
                    "" => self.options.default_group.clone(),
                    name => name.to_string(),
                };

                Ok(Line::Group(name))
            }

            Directive::UseMaterial => match lexer.rest() {
                "" => Err(component_count(line, keyword, "usemtl", "1", 0)),
                name => Ok(Line::Material(name.to_string())),
            },

            Directive::MaterialLibrary => {
                let libraries: Vec<String> = lexer.map(|token| token.text.to_string()).collect();
                if libraries.is_empty() {
                    return Err(component_count(line, keyword, "mtllib", "at least 1", 0));
                }

                Ok(Line::Libraries(libraries))
            }

            Directive::Ignored => {
                trace!(line, directive = keyword.text, "Ignoring directive");
                Ok(Line::Skip)
            }

            Directive::Unknown => {
                if self.options.strict {
                    return Err(ObjError::UnsupportedDirective {
                        line,
                        directive: keyword.text.to_string(),
                    });
                }

                debug!(line, directive = keyword.text, "Skipping unknown directive");
                Ok(Line::Skip)
            }
        };
    }

    fn decode_face<'t>(&self, line: usize, keyword: Token<'t>, lexer: &mut Lexer<'t>) -> ObjResult<Face> {
        let mut face = Face::new();

        for token in lexer {
            let vertex = self
                .decode_reference(token.text)
                .map_err(|source| located(line, token.column, source))?;
            face.add_vertex(vertex);
        }

        if face.is_empty() {
            return Err(located(line, keyword.column, FormatError::EmptyFace));
        }

        if !face.is_polygon() {
            if self.options.strict {
                return Err(located(
                    line,
                    keyword.column,
                    FormatError::TooFewVertices { got: face.len() },
                ));
            }

            warn!(line, vertices = face.len(), "Face has fewer than 3 vertices");
        }

        return Ok(face);
    }

    /// Decodes `v`, `v/t`, `v//n`, `v/t/n` (and `v/t/`) into resolved indices.
    fn decode_reference(&self, token: &str) -> Result<FaceVertex, FormatError> {
        let malformed = || FormatError::MalformedReference {
            token: token.to_string(),
        };

        let mut parts = token.split('/');
        let position = parts.next().filter(|p| !p.is_empty()).ok_or_else(malformed)?;
        let texture = parts.next().filter(|p| !p.is_empty());
        let normal = parts.next().filter(|p| !p.is_empty());

        if parts.next().is_some() {
            return Err(malformed());
        }

        let position = self.store.resolve_position(parse_index(position)?)?;
        let texture = texture
            .map(|t| parse_index(t).and_then(|i| self.store.resolve_texture(i)))
            .transpose()?;
        let normal = normal
            .map(|n| parse_index(n).and_then(|i| self.store.resolve_normal(i)))
            .transpose()?;

        return Ok(FaceVertex::new(position, texture, normal));
    }
}

fn decode_floats(line: usize, lexer: &mut Lexer<'_>) -> ObjResult<Vec<f32>> {
    return lexer
        .map(|token| parse_float(token.text).map_err(|source| located(line, token.column, source)))
        .collect();
}

fn located(line: usize, column: usize, source: FormatError) -> ObjError {
    return ObjError::Format {
        line,
        column,
        source,
    };
}

fn component_count(
    line: usize,
    keyword: Token<'_>,
    directive: &'static str,
    expected: &'static str,
    got: usize,
) -> ObjError {
    return located(
        line,
        keyword.column,
        FormatError::ComponentCount {
            directive,
            expected,
            got,
        },
    );
}

/// Parses every line yielded by `lines`, stopping at the first error.
pub fn parse_lines<I, S>(lines: I, options: ParseOptions) -> ObjResult<DataStore>
where
    I: IntoIterator<Item = io::Result<S>>,
    S: AsRef<str>,
{
    let mut parser = Parser::new(options);

    for line in lines {
        parser.parse_line(line?.as_ref())?;
    }

    return parser.finish();
}

pub fn parse_reader<R: BufRead>(reader: R, options: ParseOptions) -> ObjResult<DataStore> {
    return parse_lines(reader.lines(), options);
}

pub fn parse_str(source: &str) -> ObjResult<DataStore> {
    return parse_str_with(source, ParseOptions::default());
}

pub fn parse_str_with(source: &str, options: ParseOptions) -> ObjResult<DataStore> {
    return parse_lines(source.lines().map(Ok::<_, io::Error>), options);
}

pub fn load_obj<P: AsRef<Path>>(path: P) -> ObjResult<DataStore> {
    return load_obj_with(path, ParseOptions::default());
}

pub fn load_obj_with<P: AsRef<Path>>(path: P, options: ParseOptions) -> ObjResult<DataStore> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ObjError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ObjError::Io(e)
        }
    })?;

    debug!(path = %path.display(), "Loading OBJ file");

    return parse_reader(BufReader::new(file), options);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::error::Attribute;
    use approx::assert_relative_eq;

    fn format_error(result: ObjResult<DataStore>) -> (usize, usize, FormatError) {
        match result {
            Err(ObjError::Format {
                line,
                column,
                source,
            }) => (line, column, source),
            other => panic!("expected a format error, got {other:?}"),
        }
    }

    #[test]
    fn decodes_vertex_attributes() {
        let store = parse_str("v 1 2 3\nv 4 5 6 1.0\nvt 0.5\nvt 0.25 0.75 0\nvn 0 0 1").unwrap();

        assert_eq!(store.positions(), &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(store.texcoords(), &[[0.5, 0.0], [0.25, 0.75]]);
        assert_eq!(store.normals(), &[[0.0, 0.0, 1.0]]);
    }

    #[test]
    fn decodes_all_reference_forms() {
        let source = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vn 0 0 1
f 1 2 3
f 1/1 2/2 3/1
f 1//1 2//1 3//1
f 1/1/1 2/2/1 3/
";
        let store = parse_str(source).unwrap();
        let faces = &store.groups()[0].faces;

        assert_eq!(faces[0][0], FaceVertex::new(0, None, None));
        assert_eq!(faces[1][1], FaceVertex::new(1, Some(1), None));
        assert_eq!(faces[2][2], FaceVertex::new(2, None, Some(0)));
        assert_eq!(faces[3][0], FaceVertex::new(0, Some(0), Some(0)));
        assert_eq!(faces[3][2], FaceVertex::new(2, None, None));
    }

    #[test]
    fn rejects_malformed_references() {
        for reference in ["/1", "1/2/3/4", "a", "1/x", "//1"] {
            let source = format!("v 0 0 0\nvt 0 0\nvt 0 0\nvn 0 0 1\nf 1 1 {reference}");
            let (line, column, error) = format_error(parse_str(&source));

            assert_eq!(line, 5);
            assert_eq!(column, 7);
            assert!(
                matches!(
                    error,
                    FormatError::MalformedReference { .. } | FormatError::InvalidNumber { .. }
                ),
                "{reference}: {error:?}"
            );
        }
    }

    #[test]
    fn reports_out_of_range_texture_index() {
        let (line, _, error) = format_error(parse_str("v 0 0 0\nvt 0 0\nf 1/2 1/1 1/1"));

        assert_eq!(line, 3);
        assert_eq!(
            error,
            FormatError::InvalidIndex {
                attribute: Attribute::Texture,
                index: 2,
                len: 1,
            }
        );
    }

    #[test]
    fn rejects_wrong_component_counts() {
        let cases = [
            ("v 1 2", "v"),
            ("v 1 2 3 4 5", "v"),
            ("vt", "vt"),
            ("vt 1 2 3 4", "vt"),
            ("vn 1 2", "vn"),
        ];

        for (source, expected) in cases {
            let (_, column, error) = format_error(parse_str(source));

            assert_eq!(column, 1);
            assert!(
                matches!(error, FormatError::ComponentCount { directive, .. } if directive == expected),
                "{source}: {error:?}"
            );
        }
    }

    #[test]
    fn face_without_references_is_rejected() {
        let (_, _, error) = format_error(parse_str("f"));
        assert_eq!(error, FormatError::EmptyFace);
    }

    #[test]
    fn short_faces_depend_on_strictness() {
        let source = "v 0 0 0\nv 1 0 0\nf 1 2";

        let store = parse_str(source).unwrap();
        assert_eq!(store.groups()[0].faces[0].len(), 2);

        let (_, _, error) = format_error(parse_str_with(source, ParseOptions::strict()));
        assert_eq!(error, FormatError::TooFewVertices { got: 2 });
    }

    #[test]
    fn unknown_directives_depend_on_strictness() {
        let source = "v 0 0 0\nfoo bar\ns 1";

        let store = parse_str(source).unwrap();
        assert_eq!(store.positions().len(), 1);

        match parse_str_with(source, ParseOptions::strict()) {
            Err(ObjError::UnsupportedDirective { line, directive }) => {
                assert_eq!(line, 2);
                assert_eq!(directive, "foo");
            }
            other => panic!("expected unsupported directive, got {other:?}"),
        }
    }

    #[test]
    fn group_and_object_names() {
        let store = parse_str("g left arm\no body\ng\nG upper").unwrap();
        let names: Vec<&str> = store.groups().iter().map(|g| g.name.as_str()).collect();

        assert_eq!(names, vec!["left arm", "body", "default", "upper"]);
    }

    #[test]
    fn materials_and_libraries() {
        let source = "\
mtllib a.mtl b.mtl
v 0 0 0
g hull
usemtl Steel Grey
f 1 1 1
";
        let store = parse_str(source).unwrap();

        assert_eq!(store.material_libraries(), &["a.mtl", "b.mtl"]);
        assert_eq!(store.groups()[0].material.as_deref(), Some("Steel Grey"));
    }

    #[test]
    fn comments_blank_lines_and_crlf() {
        let source = "# header\r\n\r\n   \r\nv 1 2 3 # inline\r\nv 4 5 6\r\n";
        let store = parse_str(source).unwrap();

        assert_eq!(store.positions().len(), 2);
        assert!(store.groups().is_empty());
    }

    #[test]
    fn joins_continued_lines() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 \\\n  2 \\\n  3\nv a";
        let mut parser = Parser::default();
        let mut failure = None;

        for line in source.lines() {
            if let Err(error) = parser.parse_line(line) {
                failure = Some(error);
                break;
            }
        }

        assert_eq!(failure.and_then(|e| e.line()), Some(7));
        assert_eq!(parser.store().groups()[0].faces[0].len(), 3);
    }

    #[test]
    fn backslash_in_comment_does_not_continue() {
        let source = "# exported from C:\\models\\\nv 1 2 3\nv 4 5 6 # end \\\nv 7 8 9\n";
        let store = parse_str(source).unwrap();

        assert_eq!(
            store.positions(),
            &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]
        );
    }

    #[test]
    fn continuation_before_comment_still_joins() {
        let store = parse_str("v 1 2 \\ # split\n3").unwrap();
        assert_eq!(store.positions(), &[[1.0, 2.0, 3.0]]);
    }

    #[test]
    fn hash_inside_group_name_is_kept() {
        let store = parse_str("g part#1 # first part").unwrap();
        assert_eq!(store.groups()[0].name, "part#1");
    }

    #[test]
    fn continued_line_errors_report_first_line() {
        let (line, _, _) = format_error(parse_str("v 0 0 \\\n x"));
        assert_eq!(line, 1);
    }

    #[test]
    fn finish_flushes_dangling_continuation() {
        let mut parser = Parser::default();
        parser.parse_line("v 1 2 \\").unwrap();
        assert!(parser.store().positions().is_empty());

        parser.parse_line("3 \\").unwrap();
        let store = parser.finish().unwrap();

        assert_eq!(store.positions(), &[[1.0, 2.0, 3.0]]);
    }

    #[test]
    fn failing_line_leaves_prefix_untouched() {
        let mut parser = Parser::default();
        parser.parse_line("v 1 2 3").unwrap();
        parser.parse_line("g part").unwrap();
        parser.parse_line("f 1 1 1").unwrap();

        assert!(parser.parse_line("f 1 1 9").is_err());
        assert!(parser.parse_line("v 1 2 x").is_err());
        assert_eq!(parser.line_number(), 5);

        let store = parser.into_store();
        assert_eq!(store.positions().len(), 1);
        assert_eq!(store.groups().len(), 1);
        assert_eq!(store.face_count(), 1);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let store = parse_str("V 1 2 3\nVN 0 1 0\nF 1//1 1//1 1//1").unwrap();

        assert_relative_eq!(store.normals()[0][1], 1.0);
        assert_eq!(store.face_count(), 1);
    }

    #[test]
    fn custom_default_group() {
        let options = ParseOptions::default().with_default_group("mesh");
        let store = parse_str_with("v 0 0 0\nf 1 1 1", options).unwrap();

        assert_eq!(store.groups()[0].name, "mesh");
    }

    #[test]
    fn missing_file_is_reported() {
        match load_obj("/definitely/not/here.obj") {
            Err(ObjError::FileNotFound { path }) => {
                assert!(path.ends_with("here.obj"));
            }
            other => panic!("expected file not found, got {other:?}"),
        }
    }
}
