use super::*;

#[test]
fn builtin_library_parses_with_defaults() {
    let lib = builtin_library().unwrap();
    assert!(lib.len() >= 100);
    assert!(lib.iter().all(|i| i.settings == GenerationParams::default()));
    let dead = lib.iter().find(|i| i.id == "react_001").unwrap();
    assert_eq!(dead.text, "I'm dead");
    assert!(dead.visual.contains("Photorealistic style only."));
}

#[test]
fn settings_accept_short_guidance_key() {
    let lib = parse_library(
        r#"[{"id":"a","text":"Hi","visual":"v","settings":{"strength":0.6,"guidance":7.5},"tags":["x"]}]"#,
    )
    .unwrap();
    assert_eq!(lib[0].settings.strength, 0.6);
    assert_eq!(lib[0].settings.guidance_scale, 7.5);
}

#[test]
fn duplicate_or_blank_ids_are_rejected() {
    let dup = r#"[{"id":"a","text":"1","visual":"v"},{"id":"a","text":"2","visual":"v"}]"#;
    assert!(matches!(parse_library(dup), Err(ForgeError::Validation(_))));
    let blank = r#"[{"id":" ","text":"1","visual":"v"}]"#;
    assert!(parse_library(blank).is_err());
}

#[test]
fn tag_matching_ignores_case() {
    let item = TemplateItem {
        id: "x".into(),
        text: "t".into(),
        visual: "v".into(),
        settings: GenerationParams::default(),
        tags: vec!["Roast".into()],
    };
    assert!(item.has_any_tag(&["roast".to_string()]));
    assert!(!item.has_any_tag(&["cute".to_string()]));
}

#[test]
fn every_mood_chip_has_a_full_candidate_pool() {
    use crate::catalog::moods::{MOOD_TABLE, expand_mood};

    let lib = builtin_library().unwrap();
    for (mood, _) in MOOD_TABLE.iter().filter(|(m, _)| *m != "random") {
        let tags = expand_mood(mood);
        let pool = lib.iter().filter(|i| i.has_any_tag(&tags)).count();
        assert!(pool >= 10, "{mood}: {pool} candidates");
    }
}
