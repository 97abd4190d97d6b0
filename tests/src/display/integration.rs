#![cfg(test)]
use std::fs;
use std::thread;
use std::time::{Duration, Instant};

use chanman_common::config::LayoutStrategy;
use chanman_common::geometry::{Position, Size};
use chanman_common::topology::{
    ChannelMode, ContainerKind, EntityData, PortData, PortDirection, PortUsage, TopologyModel,
};
use chanman_core::host::{DisplayHost, RedrawOutcome};
use chanman_core::layout::{LayoutEngine, LayoutReport};
use chanman_core::reconcile::ReconcileOutcome;
use chanman_core::scanner::{ScanTiming, ScannerThread, SnapshotFileProbe, StaticProbe};
use chanman_core::store::PositionStore;

/*************************************************************
                   Scanner -> display host
**************************************************************/

#[test]
fn remembered_and_fresh_entities_settle_then_stay_put() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.txt");
    fs::write(&settings, "B\t10\t20\n").unwrap();

    let mut host = host_with(&settings);
    assert_eq!(host.recall_positions(), 1);
    let scanner = ScannerThread::spawn(StaticProbe::new(a_to_b()), quick()).unwrap();
    host.attach_scanner(scanner.handoff());

    let (first, layout) = next_update(&mut host);
    assert!(first.change_seen);
    assert_eq!(first.added, vec!["A".to_string(), "B".to_string()]);
    assert_eq!(position_of(&host, "B"), Position::new(10.0, 20.0));

    let graph = layout.graph.expect("force-directed pass builds a graph");
    assert_eq!(graph.edges, 1, "only A -> B");
    assert_eq!(graph.anchor_edges, 0, "A and B are connected, nothing is anchored");
    assert!(layout.solver.is_some(), "A has no remembered position");

    let a_before = position_of(&host, "A");
    let (second, layout) = next_update(&mut host);
    assert!(!second.change_seen);
    assert!(layout.placed.is_empty());
    assert_eq!(position_of(&host, "A"), a_before);
    assert_eq!(position_of(&host, "B"), Position::new(10.0, 20.0));
}

#[test]
fn topology_changes_reach_the_panel() {
    let probe = StaticProbe::new(a_to_b());
    let snapshot = probe.handle();
    let scanner = ScannerThread::spawn(probe, quick()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let mut host = host_with(&dir.path().join("settings.txt"));
    host.attach_scanner(scanner.handoff());
    next_update(&mut host);

    {
        let mut model = snapshot.lock();
        model.clear();
        model.add_entity(entity("A", "/A/out", PortDirection::Output)).unwrap();
        model.add_entity(entity("C", "/C/in", PortDirection::Input)).unwrap();
        model.add_connection("/A/out", "/C/in", ChannelMode::Udp);
    }

    let (outcome, _) = wait_for(&mut host, |outcome| outcome.change_seen);
    assert_eq!(outcome.added, vec!["C".to_string()]);
    assert_eq!(outcome.removed, vec!["B".to_string()]);

    let names: Vec<&str> = host.entities().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["A", "C"]);
    let a = host.panel().find_known_entity("A").unwrap();
    let links = a.port("/A/out").unwrap().output_connections();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].entity, "C");
    assert_eq!(links[0].mode, ChannelMode::Udp);
}

#[test]
fn skipped_scan_is_followed_by_a_real_one() {
    let scanner = ScannerThread::spawn(StaticProbe::new(a_to_b()), quick()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut host = host_with(&dir.path().join("settings.txt"));
    host.attach_scanner(scanner.handoff());
    host.skip_scan();

    let skipped = redraw_until(&mut host, |outcome| !is_quiet(outcome));
    assert_eq!(skipped, RedrawOutcome::Skipped);
    assert!(host.entities().is_empty());

    let (outcome, _) = next_update(&mut host);
    assert!(outcome.change_seen);
    assert_eq!(host.entities().len(), 2);
}

#[test]
fn snapshot_file_edits_are_followed() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("topology.json");
    fs::write(&snapshot, serde_json::to_string(&a_to_b()).unwrap()).unwrap();

    let mut scanner =
        ScannerThread::spawn(SnapshotFileProbe::new(&snapshot), quick()).unwrap();
    let mut host = host_with(&dir.path().join("settings.txt"));
    host.attach_scanner(scanner.handoff());

    let (first, _) = next_update(&mut host);
    assert_eq!(first.added.len(), 2);

    let mut smaller = TopologyModel::new();
    smaller.add_entity(entity("A", "/A/out", PortDirection::Output)).unwrap();
    fs::write(&snapshot, serde_json::to_string(&smaller).unwrap()).unwrap();

    let (outcome, _) = wait_for(&mut host, |outcome| outcome.change_seen);
    assert_eq!(outcome.removed, vec!["B".to_string()]);
    assert_eq!(outcome.purged_links, 1);

    host.detach_scanner();
    assert!(scanner.stop() >= 2);
}

/*************************************************************
                          Helpers
**************************************************************/

const PATIENCE: Duration = Duration::from_secs(10);

fn quick() -> ScanTiming {
    ScanTiming {
        interval: Duration::from_millis(10),
        fast_interval: Duration::from_millis(1),
    }
}

fn host_with(settings: &std::path::Path) -> DisplayHost {
    DisplayHost::new(
        PositionStore::new(settings),
        LayoutEngine::new(LayoutStrategy::ForceDirected, Some(2024)),
        Size::new(800.0, 600.0),
    )
    .with_read_policy(Duration::from_millis(5), 20)
}

fn entity(name: &str, port: &str, direction: PortDirection) -> EntityData {
    let mut data = EntityData::new(ContainerKind::Service, name, "", "");
    data.add_port(PortData::new(port, PortUsage::Service, direction));
    data
}

fn a_to_b() -> TopologyModel {
    let mut model = TopologyModel::new();
    model.add_entity(entity("A", "/A/out", PortDirection::Output)).unwrap();
    model.add_entity(entity("B", "/B/in", PortDirection::Input)).unwrap();
    model.add_connection("/A/out", "/B/in", ChannelMode::Tcp);
    model
}

fn position_of(host: &DisplayHost, name: &str) -> Position {
    host.panel().find_known_entity(name).unwrap().position()
}

fn is_quiet(outcome: &RedrawOutcome) -> bool {
    matches!(outcome, RedrawOutcome::Idle | RedrawOutcome::Busy)
}

fn redraw_until(host: &mut DisplayHost, wanted: impl Fn(&RedrawOutcome) -> bool) -> RedrawOutcome {
    let deadline = Instant::now() + PATIENCE;
    loop {
        let outcome = host.on_redraw();
        if wanted(&outcome) {
            return outcome;
        }
        assert!(Instant::now() < deadline, "gave up waiting, last redraw: {outcome:?}");
        thread::sleep(Duration::from_millis(2));
    }
}

fn wait_for(
    host: &mut DisplayHost,
    wanted: impl Fn(&ReconcileOutcome) -> bool,
) -> (ReconcileOutcome, LayoutReport) {
    let outcome = redraw_until(host, |outcome| match outcome {
        RedrawOutcome::Updated { reconcile, .. } => wanted(reconcile),
        _ => false,
    });
    match outcome {
        RedrawOutcome::Updated { reconcile, layout } => (reconcile, layout),
        other => panic!("expected an update, got {other:?}"),
    }
}

fn next_update(host: &mut DisplayHost) -> (ReconcileOutcome, LayoutReport) {
    wait_for(host, |_| true)
}
