//! Catalog loading and view integration tests
//!
//! Reads a realistic, hand-edited catalog document from disk and checks the
//! views the library screens are built from.

use std::sync::Once;

use rand::rngs::StdRng;
use rand::SeedableRng;
use vibe_core::{Catalog, CatalogSource, FileSource, ItemId, MediaKind};

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

const DOCUMENT: &str = r#"{
  "music": [
    { "id": "m1", "title": "Northern Lights", "artist": "Aurora Band", "album": "Skies",
      "genre": "Ambient", "audioFile": "audio/m1.mp3", "addedDate": "2024-01-10", "playCount": 4 },
    { "id": "m2", "title": "Harbour", "artist": "Aurora Band", "album": "Skies",
      "genre": "Folk", "audioFile": "audio/m2.mp3", "addedDate": "2024-03-01T08:00:00Z", "playCount": 9 },
    { "id": "m3", "title": "Static", "artist": "Wires", "audioFile": "audio/m3.mp3",
      "addedDate": "not a date", "playCount": null }
  ],
  "podcasts": [
    { "id": "p1", "title": "Pilot", "show": "Deep Dive", "description": "How it started",
      "audioFile": "audio/p1.mp3", "addedDate": "2024-02-01", "duration": 600,
      "progress": 120, "percentComplete": 20, "lastListened": "2024-02-03T10:00:00Z" },
    { "id": "p2", "title": "Finale", "show": "Deep Dive", "audioFile": "audio/p2.mp3",
      "addedDate": "2024-02-08", "percentComplete": 100, "completed": true },
    { "id": "p3", "title": "Weekly Roundup", "show": "News Hour", "audioFile": "audio/p3.mp3",
      "progress": 30, "percentComplete": 5, "lastListened": "2024-02-04T10:00:00Z" }
  ]
}"#;

fn load() -> Catalog {
    init_tracing();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("library.json");
    std::fs::write(&path, DOCUMENT).expect("Failed to write catalog");

    Catalog::try_load(&FileSource::new(&path)).expect("Catalog should parse")
}

fn ids<T>(items: &[T], id: impl Fn(&T) -> &ItemId) -> Vec<String> {
    items.iter().map(|i| id(i).to_string()).collect()
}

#[test]
fn test_document_loads_from_disk() {
    let catalog = load();
    assert_eq!(catalog.tracks().len(), 3);
    assert_eq!(catalog.episodes().len(), 3);

    let static_track = catalog.track(&ItemId::new("m3")).unwrap();
    assert_eq!(static_track.stats.play_count, 0);
    assert!(static_track.added_date.is_none());
}

#[test]
fn test_missing_file_degrades_to_empty() {
    init_tracing();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let source = FileSource::new(dir.path().join("missing.json"));

    assert!(Catalog::try_load(&source).is_err());
    assert!(Catalog::load_all(&source).is_empty());
    assert!(source.describe().ends_with("missing.json"));
}

#[test]
fn test_track_views() {
    let catalog = load();

    assert_eq!(ids(&catalog.popular_tracks(2), |t| &t.id), vec!["m2", "m1"]);
    assert_eq!(ids(&catalog.new_tracks(3), |t| &t.id), vec!["m2", "m1", "m3"]);
    assert_eq!(ids(&catalog.tracks_by_artist("Aurora Band"), |t| &t.id), vec!["m1", "m2"]);
    assert_eq!(ids(&catalog.tracks_by_album("Skies"), |t| &t.id), vec!["m1", "m2"]);
    assert_eq!(ids(&catalog.tracks_by_genre("Folk"), |t| &t.id), vec!["m2"]);
    assert_eq!(ids(&catalog.search_tracks("WIRES"), |t| &t.id), vec!["m3"]);

    let mut rng = StdRng::seed_from_u64(3);
    let picks = catalog.recommended_tracks(5, &mut rng);
    assert_eq!(picks.len(), 3);
}

#[test]
fn test_episode_views() {
    let catalog = load();

    assert_eq!(ids(&catalog.episodes_by_show("Deep Dive"), |e| &e.id), vec!["p1", "p2"]);
    assert_eq!(ids(&catalog.search_episodes("how it"), |e| &e.id), vec!["p1"]);
    assert_eq!(ids(&catalog.in_progress_episodes(), |e| &e.id), vec!["p3", "p1"]);
    assert_eq!(ids(&catalog.new_episodes(5), |e| &e.id), vec!["p1", "p3"]);
    assert_eq!(ids(&catalog.recently_listened(1), |e| &e.id), vec!["p3"]);
    assert_eq!(catalog.all_shows(), vec!["Deep Dive", "News Hour"]);

    let pilot = catalog.episode(&ItemId::new("p1")).unwrap();
    assert_eq!(pilot.progress.position_secs, 120.0);
    assert!(!pilot.progress.completed);
    assert!(catalog.episode(&ItemId::new("p2")).unwrap().progress.completed);
}

#[test]
fn test_queue_follows_document_order() {
    let catalog = load();
    let queue = catalog.queue_for(MediaKind::Podcast);

    assert_eq!(queue.len(), 3);
    assert_eq!(catalog.position_in(MediaKind::Podcast, &ItemId::new("p3")), Some(2));
    assert!(queue.iter().all(|item| item.kind() == MediaKind::Podcast));
    assert!(catalog.item(&ItemId::new("p1"), MediaKind::Music).is_none());
}
