use mp_scores::accuracy::{HitCounts, accuracy};
use mp_scores::domain::{MatchId, RetentionMode, compare_slots};

#[test]
fn accuracy_of_empty_play_is_zero() {
    assert_eq!(accuracy(HitCounts::new(0, 0, 0, 0)), 0.0);
}

#[test]
fn accuracy_weights_hits() {
    // (50 * 2 + 100 * 3 + 300 * 95) / (100 * 300) * 100
    assert_eq!(accuracy(HitCounts::new(2, 3, 95, 0)), 96.33);
    assert_eq!(accuracy(HitCounts::new(0, 0, 299, 1)), 99.67);
    assert_eq!(accuracy(HitCounts::new(4, 0, 0, 0)), 16.67);
}

#[test]
fn match_links_in_common_shapes() {
    for (link, expected) in [
        ("https://osu.ppy.sh/community/matches/111534249", Some(111534249)),
        ("https://osu.ppy.sh/mp/59427418", Some(59427418)),
        ("59427418", Some(59427418)),
        ("https://osu.ppy.sh/community/matches/111534249#events", None),
        ("", None),
    ] {
        assert_eq!(MatchId::from_link(link).map(MatchId::get), expected, "{link}");
    }
}

#[test]
fn retention_defaults_to_best() {
    assert_eq!(RetentionMode::default(), RetentionMode::Best);
    assert_eq!(RetentionMode::History.to_string(), "history");
}

#[test]
fn tiebreaker_sorts_last_among_known_groups() {
    assert!(compare_slots("FM3", "TB").is_lt());
    assert!(compare_slots("TB", "XX1").is_lt());
    assert!(compare_slots("HR1", "HR1").is_eq());
}
