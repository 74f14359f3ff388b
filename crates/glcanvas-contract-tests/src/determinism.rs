use glam::Vec4;
use glcanvas_uniform::{Live, UniformTable};

/// Determinism contract:
/// deriving the attribute format twice with no declaration in between yields the same sequence.
#[test]
fn attribute_format_is_stable_between_declarations() {
    let time = Live::new(0.0f32);
    let mut t = UniformTable::new();
    t.declare("uTime", &time);
    t.declare("uAmount", 0.2f32);
    t.declare("u_tint", Vec4::ONE);

    let f1 = t.attribute_format();
    time.set(12.0);
    let f2 = t.attribute_format();

    assert_eq!(f1, f2, "format must not depend on live values");
    assert_eq!(t.format_revision(), t.format_revision());
}

/// Determinism contract:
/// the same declaration sequence always yields the same format, in declaration order.
#[test]
fn same_declarations_same_format() {
    let build = || {
        let mut t = UniformTable::new();
        t.declare("b", 1i32);
        t.declare("a", 1.0f32);
        t.declare("b", glam::Mat2::IDENTITY);
        t.attribute_format()
    };
    let (f1, f2) = (build(), build());
    assert_eq!(f1, f2);

    let names: Vec<&str> = f1.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["b", "a"], "declaration order, not name order");
}
