use std::fmt;

/// Scalar component type of a uniform kind. Every component is 4 bytes wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Int,
    Float,
}

/// The closed set of uniform kinds a canvas can declare.
///
/// Matrices follow GLSL naming and are column-major: `MatCxR` has `C` columns of `R` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat2x3,
    Mat2x4,
    Mat3,
    Mat3x2,
    Mat3x4,
    Mat4,
    Mat4x2,
    Mat4x3,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 14] = [
        AttributeKind::Int,
        AttributeKind::Float,
        AttributeKind::Vec2,
        AttributeKind::Vec3,
        AttributeKind::Vec4,
        AttributeKind::Mat2,
        AttributeKind::Mat2x3,
        AttributeKind::Mat2x4,
        AttributeKind::Mat3,
        AttributeKind::Mat3x2,
        AttributeKind::Mat3x4,
        AttributeKind::Mat4,
        AttributeKind::Mat4x2,
        AttributeKind::Mat4x3,
    ];

    /// `(columns, rows)`. Scalars and vectors are a single column.
    pub fn shape(self) -> (usize, usize) {
        use AttributeKind::*;
        match self {
            Int | Float => (1, 1),
            Vec2 => (1, 2),
            Vec3 => (1, 3),
            Vec4 => (1, 4),
            Mat2 => (2, 2),
            Mat2x3 => (2, 3),
            Mat2x4 => (2, 4),
            Mat3 => (3, 3),
            Mat3x2 => (3, 2),
            Mat3x4 => (3, 4),
            Mat4 => (4, 4),
            Mat4x2 => (4, 2),
            Mat4x3 => (4, 3),
        }
    }

    pub fn columns(self) -> usize {
        self.shape().0
    }

    pub fn rows(self) -> usize {
        self.shape().1
    }

    pub fn components(self) -> usize {
        let (c, r) = self.shape();
        c * r
    }

    pub fn byte_size(self) -> usize {
        self.components() * 4
    }

    pub fn scalar(self) -> Scalar {
        match self {
            AttributeKind::Int => Scalar::Int,
            _ => Scalar::Float,
        }
    }

    pub fn is_matrix(self) -> bool {
        self.columns() > 1
    }

    pub fn glsl_name(self) -> &'static str {
        use AttributeKind::*;
        match self {
            Int => "int",
            Float => "float",
            Vec2 => "vec2",
            Vec3 => "vec3",
            Vec4 => "vec4",
            Mat2 => "mat2",
            Mat2x3 => "mat2x3",
            Mat2x4 => "mat2x4",
            Mat3 => "mat3",
            Mat3x2 => "mat3x2",
            Mat3x4 => "mat3x4",
            Mat4 => "mat4",
            Mat4x2 => "mat4x2",
            Mat4x3 => "mat4x3",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glsl_name())
    }
}

/// One `(name, kind)` entry of an attribute format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attr {
    pub name: String,
    pub kind: AttributeKind,
}

impl Attr {
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered list of `(name, kind)` pairs a program is linked against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AttributeFormat(pub Vec<Attr>);

impl AttributeFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|a| a.name == name)
    }

    /// Total packed size of one element laid out in this format.
    pub fn stride(&self) -> usize {
        self.0.iter().map(|a| a.kind.byte_size()).sum()
    }
}

impl FromIterator<Attr> for AttributeFormat {
    fn from_iter<I: IntoIterator<Item = Attr>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Vertex inputs every canvas shader receives, in binding order.
pub fn default_vertex_format() -> AttributeFormat {
    AttributeFormat(vec![
        Attr::new("position", AttributeKind::Vec2),
        Attr::new("color", AttributeKind::Vec4),
        Attr::new("texCoords", AttributeKind::Vec2),
        Attr::new("intensity", AttributeKind::Float),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_shapes_are_column_major() {
        assert_eq!(AttributeKind::Mat2x3.shape(), (2, 3));
        assert_eq!(AttributeKind::Mat4x2.columns(), 4);
        assert_eq!(AttributeKind::Mat4x2.rows(), 2);
        assert_eq!(AttributeKind::Mat3.byte_size(), 36);
        assert!(!AttributeKind::Vec4.is_matrix());
    }

    #[test]
    fn only_int_has_integer_components() {
        for kind in AttributeKind::ALL {
            let expected = if kind == AttributeKind::Int {
                Scalar::Int
            } else {
                Scalar::Float
            };
            assert_eq!(kind.scalar(), expected, "{kind}");
        }
    }

    #[test]
    fn vertex_format_stride() {
        // vec2 + vec4 + vec2 + float
        assert_eq!(default_vertex_format().stride(), (2 + 4 + 2 + 1) * 4);
        assert_eq!(default_vertex_format().position("intensity"), Some(3));
    }
}
