use super::*;

#[test]
fn nickname_is_stable_and_well_formed() {
    let a = nickname_for("user-42");
    assert_eq!(a, nickname_for("user-42"));
    let (adj, animal) = a.split_once(' ').unwrap();
    assert!(ADJECTIVES.contains(&adj));
    assert!(ANIMALS.contains(&animal));
}

#[test]
fn different_ids_spread_over_names() {
    let names: std::collections::HashSet<String> =
        (0..200).map(|i| nickname_for(&format!("u{i}"))).collect();
    assert!(names.len() > 50);
}
