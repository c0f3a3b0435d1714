use super::*;
use crate::catalog::library::builtin_library;
use crate::catalog::styles::DEFAULT_NEGATIVE_PROFILE;
use crate::provider::GenerationParams;

fn template(id: &str, text: &str, tags: &[&str]) -> TemplateItem {
    TemplateItem {
        id: id.into(),
        text: text.into(),
        visual: format!("Sticker {id}. Photorealistic style only."),
        settings: GenerationParams::default(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn cfg(mood: &str, style: &str, language: Option<&str>) -> GenerationConfig {
    GenerationConfig::new(mood, style, language)
}

#[test]
fn dedups_ids_and_captions_case_insensitively() {
    let lib = vec![
        template("a", "Same", &[]),
        template("b", "SAME", &[]),
        template("c", "same", &[]),
        template("d", "Other", &[]),
        template("d", "Dup id", &[]),
        template("e", "Third", &[]),
    ];
    for seed in 0..50 {
        let plan = build_plan(&lib, &cfg("random", "random", Some("en")), 6, 10, &mut rng(seed))
            .unwrap();
        let ids: HashSet<&str> = plan.iter().map(|w| w.id.as_str()).collect();
        let caps: HashSet<String> = plan.iter().map(|w| w.caption_text.to_lowercase()).collect();
        assert_eq!(ids.len(), plan.len());
        assert_eq!(caps.len(), plan.len());
        assert!(plan.len() <= 4);
    }
}

#[test]
fn large_tag_pool_is_used_exclusively() {
    let mut lib: Vec<TemplateItem> = (0..12)
        .map(|i| template(&format!("cute_{i}"), &format!("Cute {i}"), &["cute"]))
        .collect();
    lib.extend((0..20).map(|i| template(&format!("other_{i}"), &format!("Other {i}"), &["gym"])));
    let plan = build_plan(&lib, &cfg("cute", "random", Some("en")), 6, 10, &mut rng(3)).unwrap();
    assert_eq!(plan.len(), 6);
    assert!(plan.iter().all(|w| w.id.starts_with("cute_")));
}

#[test]
fn styles_rotate_round_robin_and_relax_negatives() {
    let lib = builtin_library().unwrap();
    let plan = build_plan(&lib, &cfg("random", "anime, real", Some("en")), 6, 10, &mut rng(9))
        .unwrap();
    assert_eq!(plan.len(), 6);
    for (i, item) in plan.iter().enumerate() {
        let expected = if i % 2 == 0 { "anime" } else { "real" };
        assert_eq!(item.theme, expected);
        if expected == "anime" {
            assert!(!item.visual_prompt.contains("Photorealistic"));
            assert!(item.visual_prompt.ends_with(Style::Anime.descriptor()));
            assert_ne!(item.negative_prompt, DEFAULT_NEGATIVE_PROFILE);
        } else {
            assert_eq!(item.negative_prompt, DEFAULT_NEGATIVE_PROFILE);
        }
    }
}

#[test]
fn no_style_keeps_template_prompt() {
    let lib = vec![template("a", "Hi", &[])];
    let plan = build_plan(&lib, &cfg("", "", Some("en")), 6, 10, &mut rng(0)).unwrap();
    assert_eq!(plan[0].visual_prompt, lib[0].visual);
    assert_eq!(plan[0].theme, "random");
    assert_eq!(plan[0].negative_prompt, DEFAULT_NEGATIVE_PROFILE);
}

#[test]
fn captions_follow_language() {
    let lib = vec![template("react_001", "I'm dead", &[])];
    let tr = build_plan(&lib, &cfg("random", "random", Some("tr")), 1, 10, &mut rng(0)).unwrap();
    assert_eq!(tr[0].caption_text, "Öldüm");
    let off = build_plan(&lib, &cfg("random", "random", None), 1, 10, &mut rng(0)).unwrap();
    assert_eq!(off[0].caption_text, "");
}

#[test]
fn fixed_seed_is_reproducible() {
    let builder = PlanBuilder::new(builtin_library().unwrap()).with_seed(Some(77));
    let c = cfg("roast", "cartoon,3d", Some("es"));
    assert_eq!(builder.build_plan(&c).unwrap(), builder.build_plan(&c).unwrap());
}

#[test]
fn empty_library_or_zero_count_is_a_plan_error() {
    assert!(matches!(
        build_plan(&[], &GenerationConfig::default(), 6, 10, &mut rng(0)),
        Err(ForgeError::Plan(_))
    ));
    let lib = vec![template("a", "Hi", &[])];
    assert!(build_plan(&lib, &GenerationConfig::default(), 0, 10, &mut rng(0)).is_err());
}

#[test]
fn captions_sharing_a_translation_are_deduped() {
    let lib = vec![
        template("a", "Based", &["cool"]),
        template("b", "Respect", &["cool"]),
        template("c", "Slay", &["cool"]),
    ];
    for seed in 0..50 {
        let plan = build_plan(&lib, &cfg("cool", "random", Some("fr")), 6, 10, &mut rng(seed))
            .unwrap();
        let respect = plan.iter().filter(|w| w.caption_text == "Respect").count();
        assert_eq!(respect, 1, "seed {seed}");
        assert_eq!(plan.len(), 2);
    }
    let english = build_plan(&lib, &cfg("cool", "random", Some("en")), 6, 10, &mut rng(1)).unwrap();
    assert_eq!(english.len(), 3);
}
