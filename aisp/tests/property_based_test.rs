use aisp::*;
use proptest::prelude::*;

fn statement() -> impl Strategy<Value = String> {
    let name = "[a-f]";
    let declaration = prop_oneof![
        Just(""),
        Just(" : ℕ"),
        Just(" : 𝔹"),
        Just(" : 𝕊"),
        Just(" : 𝒫(ℕ)"),
    ];
    let op = prop_oneof![Just("≜"), Just("≔")];
    let value = prop_oneof![
        Just("1".to_string()),
        Just("2.5".to_string()),
        Just("⊤".to_string()),
        Just("⊥".to_string()),
        Just("{1, 2}".to_string()),
        Just("⟨a, b⟩".to_string()),
        Just("a ∧ b".to_string()),
        Just("a ⇒ b".to_string()),
        Just("c + 1".to_string()),
        Just(String::new()),
        "[a-f]".prop_map(String::from),
    ];

    (name, declaration, op, value)
        .prop_map(|(name, declaration, op, value)| format!("{}{} {} {}", name, declaration, op, value))
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(statement(), 0..30).prop_map(|lines| lines.join("\n"))
}

fn padding() -> impl Strategy<Value = String> {
    let glyph = prop_oneof![
        Just("∎"),
        Just("∧"),
        Just("⇒"),
        Just("≡"),
        Just("⊤"),
        Just("∀"),
        Just("ℕ"),
        Just("◊⁺⁺"),
    ];
    prop::collection::vec(glyph, 1..24).prop_map(|glyphs| glyphs.join(" "))
}

fn scores(registry: &mut Registry, handle: Handle) -> (f32, f32, Tier) {
    let density = registry.density(handle).unwrap();
    let ambiguity = registry.ambiguity(handle).unwrap();
    let tier = registry.tier(handle).unwrap();
    (density, ambiguity, tier)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_generated_documents_parse(source in document()) {
        let mut registry = Registry::new();
        prop_assert!(registry.parse(source.as_bytes()).is_ok());
    }

    #[test]
    fn prop_metrics_are_bounded(source in document()) {
        let mut registry = Registry::new();
        let handle = registry.parse(source.as_bytes()).unwrap();
        let _ = registry.validate(handle);

        let (density, ambiguity, tier) = scores(&mut registry, handle);
        prop_assert!((0.0..=1.0).contains(&density));
        prop_assert!((0.0..=1.0).contains(&ambiguity));
        prop_assert!((0..=4).contains(&tier.ordinal()));
    }

    #[test]
    fn prop_scoring_is_deterministic(source in document()) {
        let mut first = Registry::new();
        let mut second = Registry::new();
        let a = first.parse(source.as_bytes()).unwrap();
        let b = second.parse(source.as_bytes()).unwrap();

        let validated_a = first.validate(a).is_ok();
        let validated_b = second.validate(b).is_ok();
        prop_assert_eq!(validated_a, validated_b);
        prop_assert_eq!(scores(&mut first, a), scores(&mut second, b));
    }

    #[test]
    fn prop_query_order_does_not_matter(source in document()) {
        let mut forward = Registry::new();
        let handle = forward.parse(source.as_bytes()).unwrap();
        let _ = forward.validate(handle);
        let density = forward.density(handle).unwrap();
        let ambiguity = forward.ambiguity(handle).unwrap();
        let tier = forward.tier(handle).unwrap();

        let mut backward = Registry::new();
        let handle = backward.parse(source.as_bytes()).unwrap();
        let _ = backward.validate(handle);
        prop_assert_eq!(backward.tier(handle).unwrap(), tier);
        prop_assert_eq!(backward.ambiguity(handle).unwrap(), ambiguity);
        prop_assert_eq!(backward.density(handle).unwrap(), density);
    }

    #[test]
    fn prop_glyph_padding_never_raises_density(source in document(), padding in padding()) {
        let padded = format!("{}\n{}", source, padding);
        prop_assume!(padded.len() <= AISP_MAX_DOC_SIZE);

        let mut registry = Registry::new();
        let base = registry.parse(source.as_bytes()).unwrap();
        let padded = registry.parse(padded.as_bytes()).unwrap();
        let base_valid = registry.validate(base).is_ok();
        let padded_valid = registry.validate(padded).is_ok();
        prop_assert_eq!(base_valid, padded_valid);

        let (base_density, _, base_tier) = scores(&mut registry, base);
        let (padded_density, _, padded_tier) = scores(&mut registry, padded);
        prop_assert!(padded_density <= base_density);
        prop_assert!(padded_tier <= base_tier);
    }

    #[test]
    fn prop_validation_fails_exactly_on_crash(source in document()) {
        let mut document = parse_str(&source, &ResourceLimits::default()).unwrap();
        let verdict = document.classify();

        match document.validate() {
            Ok(()) => prop_assert_eq!(verdict.crash, 0),
            Err(error) => {
                prop_assert_eq!(error.code(), ErrorCode::Type);
                prop_assert_eq!(Some(error.offset()), verdict.first_crash);
                prop_assert_eq!(document.tier(), Tier::Reject);
            }
        }
        prop_assert_eq!(verdict.total(), document.bindings().len());
    }

    #[test]
    fn prop_ambiguity_ceiling(source in document()) {
        let mut registry = Registry::new();
        let handle = registry.parse(source.as_bytes()).unwrap();
        let ambiguity = registry.ambiguity(handle).unwrap();

        prop_assert!(registry.check_ambiguity(handle, ambiguity).is_ok());
        prop_assert!(registry.check_ambiguity(handle, 1.0).is_ok());
        if ambiguity > 0.0 {
            let error = registry.check_ambiguity(handle, 0.0).unwrap_err();
            prop_assert_eq!(error.code(), ErrorCode::Ambiguity);
            prop_assert_eq!(registry.error().code(), ErrorCode::Ambiguity);
        }
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..1100)) {
        let mut kernel = Kernel::new();
        kernel.init();

        let handle = kernel.parse(&bytes);
        if handle >= 0 {
            prop_assert_eq!(kernel.error_code(), 0);
            let _ = kernel.validate(handle);
            prop_assert!((0..=4).contains(&kernel.tier(handle)));
        } else {
            prop_assert_eq!(kernel.error_code(), handle);
            prop_assert!(kernel.error_offset() as usize <= bytes.len());
        }
    }

    #[test]
    fn prop_arbitrary_text_never_panics(source in "\\PC{0,200}") {
        let mut registry = Registry::new();
        if let Ok(handle) = registry.parse(source.as_bytes()) {
            let _ = registry.validate(handle);
            let density = registry.density(handle).unwrap();
            prop_assert!((0.0..=1.0).contains(&density));
        } else {
            prop_assert!(registry.error().is_error());
        }
    }

    #[test]
    fn prop_tier_thresholds(density in 0.0f32..=1.0) {
        let tier = Tier::from_density(density);
        let expected = if density >= 0.75 {
            Tier::Platinum
        } else if density >= 0.60 {
            Tier::Gold
        } else if density >= 0.40 {
            Tier::Silver
        } else if density >= 0.20 {
            Tier::Bronze
        } else {
            Tier::Reject
        };
        prop_assert_eq!(tier, expected);
    }

    #[test]
    fn prop_tier_is_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(Tier::from_density(low) <= Tier::from_density(high));
    }

    #[test]
    fn prop_reused_names_stay_within_term_limit(indices in prop::collection::vec(0usize..AISP_MAX_TERMS, 1..200)) {
        let source = indices
            .iter()
            .map(|i| format!("x{}", i))
            .collect::<Vec<_>>()
            .join(" ");

        let mut registry = Registry::new();
        let handle = registry.parse(source.as_bytes()).unwrap();
        let document = registry.get(handle).unwrap();

        let mut distinct = indices.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(document.terms().len(), distinct.len());
        prop_assert_eq!(document.stats().references, indices.len());
    }
}
