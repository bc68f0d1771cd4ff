use crate::document::{Literal, Socket, ValueShape};
use crate::parser::parse_str;
use crate::resource_limits::ResourceLimits;

fn shape_of(source: &str) -> ValueShape {
    let doc = parse_str(source, &ResourceLimits::default())
        .unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", source, e));
    doc.bindings()[0].value.shape
}

fn known(source: &str) -> Socket {
    match shape_of(source) {
        ValueShape::Known(socket) => socket,
        other => panic!("Expected a known shape for {:?}, got {:?}", source, other),
    }
}

#[test]
fn test_operator_shapes() {
    assert_eq!(known("r ≜ a ⇒ b"), Socket::Relation);
    assert_eq!(known("r ≜ a -> b"), Socket::Relation);
    assert_eq!(known("r ≜ ∀x:S→P(x)"), Socket::Relation);
    assert_eq!(known("r ≜ λx.f(x)"), Socket::Relation);
    assert_eq!(known("t ≜ a ∧ b"), Socket::Truth);
    assert_eq!(known("t ≜ a /\\ b"), Socket::Truth);
    assert_eq!(known("t ≜ x ≥ 0"), Socket::Truth);
    assert_eq!(known("t ≜ x ∈ S"), Socket::Truth);
    assert_eq!(known("s ≜ A ∪ B"), Socket::Set);
    assert_eq!(known("q ≜ a + b"), Socket::Quantity);
    assert_eq!(known("q ≜ 2 × 3"), Socket::Quantity);
}

#[test]
fn test_strongest_operator_wins() {
    assert_eq!(known("m ≜ a ∧ b ⇒ c"), Socket::Relation);
    assert_eq!(known("m ≜ a + 1 ≤ b"), Socket::Truth);
    assert_eq!(known("m ≜ A ∩ B ∪ C"), Socket::Set);
}

#[test]
fn test_nested_operators_do_not_leak() {
    // The implication lives in the child context; the value is a tuple
    assert_eq!(known("p ≜ ⟨a ⇒ b⟩"), Socket::Tuple);
    assert_eq!(known("p ≜ (a ⇒ b) ∧ c"), Socket::Truth);
}

#[test]
fn test_atom_shapes() {
    assert_eq!(known("n ≜ 42"), Socket::Quantity);
    assert_eq!(known("n ≜ 0.5"), Socket::Quantity);
    assert_eq!(known("b ≜ ⊥"), Socket::Truth);
    assert_eq!(known("s ≜ {1, 2}"), Socket::Set);
    assert_eq!(known("s ≜ ∅"), Socket::Set);
    assert_eq!(known("s ≜ ℕ"), Socket::Set);
    assert_eq!(known("u ≜ ⟨1, 2⟩"), Socket::Tuple);
    assert_eq!(known("u ≜ [1, 2]"), Socket::Tuple);
    assert_eq!(known("e ≜ f x"), Socket::Entity);
    assert_eq!(known("e ≜ ◊⁺"), Socket::Entity);
}

#[test]
fn test_reference_and_absent() {
    let doc = parse_str("v ≜ w", &ResourceLimits::default()).unwrap();
    let w = doc.term_id("w").unwrap();
    assert_eq!(doc.bindings()[0].value.shape, ValueShape::Reference(w));

    assert_eq!(shape_of("z ≜"), ValueShape::Absent);
    assert_eq!(shape_of("z ≜ ;"), ValueShape::Absent);
}

#[test]
fn test_literals() {
    let doc = parse_str("a ≜ 2.5\nb ≜ ⊤\nc ≜ -1\nd ≜ 5.1.2", &ResourceLimits::default())
        .unwrap();
    let literals: Vec<_> = doc.bindings().iter().map(|b| b.value.literal).collect();
    assert_eq!(
        literals,
        vec![
            Some(Literal::Number(2.5)),
            Some(Literal::Truth(true)),
            None,
            None,
        ]
    );
}

#[test]
fn test_value_span() {
    let source = "x ≜ a ∧ {b}";
    let doc = parse_str(source, &ResourceLimits::default()).unwrap();
    let span = doc.bindings()[0].value.span;
    assert_eq!(&source[span.start..span.end], "a ∧ {b}");

    let doc = parse_str("y ≔", &ResourceLimits::default()).unwrap();
    let span = doc.bindings()[0].value.span;
    assert!(span.is_empty());
    assert_eq!(span.start, "y ≔".len());
}
