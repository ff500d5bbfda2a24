use camino::Utf8PathBuf;

use mp_scores::dataset::{Dataset, PlayerEntry};
use mp_scores::domain::{Beatmap, BeatmapId, MatchId, PlayerIdentity, ScoreRecord, UserId};
use mp_scores::output::write_dataset;

fn dataset() -> Dataset {
    Dataset {
        users: vec![PlayerIdentity {
            user_id: UserId::new(124493),
            username: "Cookiezi".to_string(),
        }],
        maps: vec![Beatmap {
            beatmap_id: BeatmapId::new(129891),
            slot: "NM1".to_string(),
            artist: "xi".to_string(),
            title: "FREEDOM DiVE".to_string(),
            difficulty: "FOUR DIMENSIONS".to_string(),
        }],
        players: vec![PlayerEntry {
            user_id: UserId::new(124493),
            username: "Cookiezi".to_string(),
            scores: vec![ScoreRecord {
                match_id: MatchId::new(111534249),
                game_id: 0,
                beatmap_id: BeatmapId::new(129891),
                score: 1_000_000,
                accuracy: 100.0,
                mods: 0,
            }],
        }],
    }
}

#[test]
fn write_creates_parent_directories() {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("data").join("osu_scores.json")).unwrap();

    write_dataset(&path, &dataset()).unwrap();

    let text = std::fs::read_to_string(path.as_std_path()).unwrap();
    assert!(text.starts_with("{\n    \"users\": {\n        \"124493\": {"));
    assert!(text.ends_with("}\n"));
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["players"]["124493"]["scores"][0]["accuracy"], 100.0);
    assert_eq!(value["maps"]["129891"]["difficulty"], "FOUR DIMENSIONS");
}

#[test]
fn write_replaces_existing_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("osu_scores.json")).unwrap();
    std::fs::write(path.as_std_path(), "stale").unwrap();

    write_dataset(&path, &Dataset::default()).unwrap();

    let text = std::fs::read_to_string(path.as_std_path()).unwrap();
    assert_eq!(text, "{\n    \"users\": {},\n    \"maps\": {},\n    \"players\": {}\n}\n");
    let leftovers = std::fs::read_dir(temp.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}
