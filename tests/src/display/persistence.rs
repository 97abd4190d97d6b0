#![cfg(test)]
use std::fs;
use std::sync::Arc;

use chanman_common::config::{Config, LayoutStrategy};
use chanman_common::geometry::Position;
use chanman_common::topology::{ContainerKind, EntityData, TopologyModel};
use chanman_core::host::{DisplayHost, RedrawOutcome};
use chanman_core::scanner::ScanMailbox;
use chanman_core::store::PositionStore;

/*************************************************************
                    Settings file contract
**************************************************************/

#[test]
fn saved_mapping_reloads_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ChannelManager").join("settings.txt");

    let mut store = PositionStore::new(&path);
    store.remember("A", Position::new(1.0, 2.0)).unwrap();
    store.remember("B", Position::new(3.5, -1.25)).unwrap();
    assert_eq!(store.save().unwrap(), 2);

    let mut reloaded = PositionStore::new(&path);
    assert_eq!(reloaded.load().unwrap(), 2);
    for (name, expected) in [("A", Position::new(1.0, 2.0)), ("B", Position::new(3.5, -1.25))] {
        let actual = reloaded.get(name).unwrap();
        assert!(actual.distance_to(expected) < 1e-6, "{name}: {actual}");
    }
}

#[test]
fn short_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.txt");
    fs::write(&path, "good\t4\t5\nbad\t6\n").unwrap();

    let mut store = PositionStore::new(&path);
    assert_eq!(store.load().unwrap(), 1);
    assert_eq!(store.get("good"), Some(Position::new(4.0, 5.0)));
    assert!(!store.contains("bad"));
}

/*************************************************************
                   Positions across sessions
**************************************************************/

#[test]
fn dragged_position_is_used_by_the_next_session() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config {
        settings_path: Some(dir.path().join("settings.txt")),
        layout: LayoutStrategy::Random,
        seed: Some(5),
        ..Config::default()
    };

    let mut first = session(&cfg);
    assert!(first.reposition("lonely", Position::new(321.5, 123.25)));
    assert_eq!(first.save_positions(), 1);

    let second = session(&cfg);
    assert_eq!(
        second.panel().find_known_entity("lonely").unwrap().position(),
        Position::new(321.5, 123.25)
    );
}

#[test]
fn unwritable_settings_do_not_break_the_host() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-directory");
    fs::write(&blocker, "").unwrap();
    let cfg = Config {
        settings_path: Some(blocker.join("settings.txt")),
        seed: Some(1),
        ..Config::default()
    };

    let mut host = session(&cfg);
    assert!(host.reposition("lonely", Position::new(1.0, 1.0)));
    assert_eq!(host.save_positions(), 0);
}

/*************************************************************
                          Helpers
**************************************************************/

/// A host that recalled its positions and displayed one scan with a single entity.
fn session(cfg: &Config) -> DisplayHost {
    let mut model = TopologyModel::new();
    model
        .add_entity(EntityData::new(ContainerKind::Plain, "lonely", "", ""))
        .unwrap();
    let mailbox = Arc::new(ScanMailbox::new());
    assert!(mailbox.publish(model));

    let mut host = DisplayHost::from_config(cfg);
    host.recall_positions();
    host.attach_scanner(mailbox);
    assert!(matches!(host.on_redraw(), RedrawOutcome::Updated { .. }));
    host
}
