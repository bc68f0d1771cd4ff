use aisp::*;

const GAME_LOGIC: &str = r#"𝔸5.1.test@2026-01-25
⟦Ω:Meta⟧{
  domain≜test
}
⟦Σ:Types⟧{
  State≜{A,B}
}
⟦Γ:Rules⟧{
  ∀x:State→Next(x)
}
⟦Λ:Funcs⟧{
  next≜λx.Next(x)
}
⟦Ε⟧⟨δ≜0.8⟩"#;

#[test]
fn test_end_to_end_full_document() {
    let mut registry = Registry::new();
    let handle = registry.parse(GAME_LOGIC.as_bytes()).unwrap();

    registry.validate(handle).unwrap();

    let density = registry.density(handle).unwrap();
    let tier = registry.tier(handle).unwrap();
    assert!(density > 0.40 && density < 0.75, "density {}", density);
    assert_eq!(tier, Tier::from_density(density));
    assert!(matches!(tier, Tier::Silver | Tier::Gold));
    assert_eq!(registry.ambiguity(handle).unwrap(), 0.0);

    let document = registry.get(handle).unwrap();
    assert_eq!(document.header().map(|h| h.name.as_str()), Some("test"));
    assert_eq!(document.completeness(), 80);
    assert_eq!(document.status(), Status::Valid);
}

#[test]
fn test_end_to_end_report() {
    let mut registry = Registry::new();
    let handle = registry.parse(GAME_LOGIC.as_bytes()).unwrap();
    let report = registry.report(handle).unwrap();

    assert!(report.is_valid());
    assert_eq!(report.bytes, GAME_LOGIC.len());
    assert_eq!(report.bindings.total, 4);
    assert_eq!(report.bindings.zero, 4);
    assert_eq!(report.completeness, 80);
    assert!(report.error.is_none());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"]["state"], "valid");
    assert_eq!(json["header"]["version"], "5.1");
    assert_eq!(json["tier"]["ordinal"], report.tier.ordinal);
}

#[test]
fn test_end_to_end_conflict_is_reported() {
    let source = "x : ℕ ≜ 1\nx : 𝔹 ≜ ⊤";
    let second = source.rfind('x').unwrap();

    let mut registry = Registry::new();
    let handle = registry.parse(source.as_bytes()).unwrap();

    let error = registry.validate(handle).unwrap_err();
    assert_eq!(error.code(), ErrorCode::Type);
    assert_eq!(error.offset(), second);
    assert_eq!(registry.error().code(), ErrorCode::Type);
    assert_eq!(registry.error().offset(), second);

    // An invalid document never earns a tier
    assert_eq!(registry.tier(handle).unwrap(), Tier::Reject);

    let report = registry.report(handle).unwrap();
    assert!(!report.is_valid());
    let error = report.error.unwrap();
    assert_eq!(error.kind, "type");
    assert_eq!(error.offset, second);
    assert_eq!(report.bindings.crash, 1);
}

#[test]
fn test_end_to_end_kernel_surface() {
    let mut kernel = Kernel::new();
    assert_eq!(kernel.init(), aisp::kernel::AISP_OK);

    let handle = kernel.parse("x : ℕ ≜ 3\ny ≔ x".as_bytes());
    assert!(handle >= 0);
    assert_eq!(kernel.validate(handle), aisp::kernel::AISP_OK);
    assert_eq!(kernel.tier(handle), aisp::kernel::AISP_TIER_GOLD);
    assert_eq!(kernel.check_ambiguity(handle, 0.02), aisp::kernel::AISP_OK);
    assert_eq!(kernel.error_code(), aisp::kernel::AISP_OK);

    assert_eq!(kernel.parse(b"x \xff"), aisp::kernel::AISP_ERR_PARSE);
    assert_eq!(kernel.error_code(), aisp::kernel::AISP_ERR_PARSE);
    assert_eq!(kernel.error_offset(), 2);

    assert_eq!(kernel.release(handle), aisp::kernel::AISP_OK);
    assert_eq!(kernel.validate(handle), aisp::kernel::AISP_ERR_PARSE);
    assert_eq!(kernel.error_offset(), 0);
}

#[test]
fn test_end_to_end_tier_requires_validation() {
    let mut registry = Registry::new();
    let handle = registry.parse("x : ℕ ≜ 3\ny ≔ x".as_bytes()).unwrap();

    // Metrics are available before validation, the tier is not
    assert!(registry.density(handle).unwrap() >= 0.60);
    assert_eq!(registry.tier(handle).unwrap(), Tier::Reject);
    assert_eq!(registry.get(handle).unwrap().status(), Status::Unvalidated);

    registry.validate(handle).unwrap();
    assert_eq!(registry.tier(handle).unwrap(), Tier::Gold);
}

#[test]
fn test_end_to_end_glyph_padding_does_not_promote() {
    let mut registry = Registry::new();
    let base = registry.parse(b"x := 3").unwrap();
    let padded = registry
        .parse("x := 3\n∎ ∎ ∎ ∎ ∎ ∎ ∎ ∎ ∎ ∎ ∎ ∎".as_bytes())
        .unwrap();
    registry.validate(base).unwrap();
    registry.validate(padded).unwrap();

    assert_eq!(registry.density(base).unwrap(), 0.40);
    assert_eq!(registry.density(padded).unwrap(), 0.40);
    assert_eq!(registry.tier(base).unwrap(), Tier::Silver);
    assert_eq!(registry.tier(padded).unwrap(), Tier::Silver);

    let symbolic = registry.parse("x ≜ 3".as_bytes()).unwrap();
    let padded = registry
        .parse("x ≜ 3\n∎ ∎ ∎ ∎ ∎ ∎ ∎ ∎ ∎ ∎ ∎ ∎".as_bytes())
        .unwrap();
    assert!(registry.density(padded).unwrap() < registry.density(symbolic).unwrap());
}

#[test]
fn test_end_to_end_conflicting_declarations_fail_to_parse() {
    let source = "⟦Σ⟧{ x : ℕ }\n⟦Γ⟧{ x : 𝔹 }\nx ≔ ⊤";

    let mut registry = Registry::new();
    let error = registry.parse(source.as_bytes()).unwrap_err();
    assert_eq!(error.code(), ErrorCode::Type);
    assert_eq!(error.offset(), source.find("x : 𝔹").unwrap());
    assert_eq!(registry.error().code(), ErrorCode::Type);
    assert!(registry.is_empty());

    let mut kernel = Kernel::new();
    kernel.init();
    assert_eq!(kernel.parse(source.as_bytes()), aisp::kernel::AISP_ERR_TYPE);
}

#[test]
fn test_end_to_end_binding_in_tagged_block() {
    let mut registry = Registry::new();
    let handle = registry.parse("⟦Ω x ≔ 1 ⟧".as_bytes()).unwrap();
    registry.validate(handle).unwrap();

    assert!(registry.density(handle).unwrap() > 0.0);
    assert_eq!(registry.ambiguity(handle).unwrap(), 0.0);

    let document = registry.get(handle).unwrap();
    assert_eq!(document.bindings().len(), 1);
    assert_eq!(document.block_tags().collect::<Vec<_>>(), vec![BlockTag::Meta]);
}
