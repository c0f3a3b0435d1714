use super::*;

#[test]
fn title_case_capitalizes_words() {
    assert_eq!(title_case("guy in   suit"), "Guy In Suit");
    assert_eq!(title_case("HAPPY gamer"), "Happy Gamer");
    assert_eq!(title_case("çay time"), "Çay Time");
}

#[test]
fn blank_title_uses_default() {
    assert_eq!(title_case("   "), DEFAULT_PACK_TITLE);
    assert_eq!(title_case(""), "New Sticker Pack");
}

#[test]
fn combined_progress_counts_across_batches() {
    let combined = CombinedProgress::new(6);
    assert_eq!(combined.snapshot(), Progress { completed: 0, total: 6 });
    combined.tick();
    combined.set_total(4);
    combined.tick();
    combined.tick();
    assert_eq!(combined.tick(), Progress { completed: 4, total: 4 });
    assert_eq!(combined.tick(), Progress { completed: 5, total: 5 });
}
