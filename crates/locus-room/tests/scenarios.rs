//! Integration test: end-to-end room and orchestrator scenarios.
//!
//! Covers single-room movement on a bounded square grid, hex distances,
//! room-graph pathfinding before and after a door is removed, the cascade
//! when a room leaves an orchestrator, a cross-room move consumed by a
//! separate thread through a channel bus, and memberships following direct
//! room edits.

use locus_core::{EntityId, ErrorKind, Position, RoomId, SpatialEvent};
use locus_grid::{Grid, HexGrid, HexGridConfig, SquareGrid, SquareGridConfig};
use locus_room::{
    BasicConnection, ChannelBus, OrchestratorConfig, OrchestratorError, Room, RoomConfig,
    RoomError, RoomOrchestrator,
};
use locus_test_utils::{creature, wall, RecordingBus};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn square_room(id: &str, size: f64) -> Arc<Room> {
    Arc::new(Room::new(RoomConfig::new(
        id,
        "dungeon",
        SquareGrid::new(SquareGridConfig::new(size, size)),
    )))
}

fn p(x: f64, y: f64) -> Position {
    Position::new(x, y)
}

// ── Single room ──────────────────────────────────────────────────────

#[test]
fn hero_walks_to_the_corner_but_not_past_it() {
    let room = square_room("hall", 10.0);
    let hero = EntityId::from("hero");
    room.place_entity(creature("hero"), p(5.0, 5.0)).unwrap();

    room.move_entity(&hero, p(9.0, 9.0)).unwrap();
    assert_eq!(room.entity_position(&hero), Some(p(9.0, 9.0)));

    let err = room.move_entity(&hero, p(10.0, 10.0)).unwrap_err();
    assert!(matches!(err, RoomError::InvalidPosition { .. }));
    assert!(err.to_string().contains("not valid"));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(room.entity_position(&hero), Some(p(9.0, 9.0)));
}

#[test]
fn pointy_hex_distances() {
    let grid = HexGrid::new(HexGridConfig::new(10.0, 10.0));
    assert_eq!(grid.distance(p(5.0, 5.0), p(6.0, 5.0)), 1.0);
    assert_eq!(grid.distance(p(5.0, 5.0), p(6.0, 6.0)), 2.0);
}

#[test]
fn walls_split_a_corridor() {
    let room = square_room("corridor", 10.0);
    room.place_entity(wall("w"), p(5.0, 0.0)).unwrap();
    room.place_entity(creature("scout"), p(0.0, 0.0)).unwrap();

    assert!(room.is_line_of_sight_blocked(p(0.0, 0.0), p(9.0, 0.0)));
    let err = room.move_entity(&"scout".into(), p(5.0, 0.0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Blocked);
    room.move_entity(&"scout".into(), p(4.0, 0.0)).unwrap();
}

// ── Orchestrator ─────────────────────────────────────────────────────

#[test]
fn door_removal_disconnects_rooms() {
    let orch = RoomOrchestrator::new(OrchestratorConfig::default());
    orch.add_room(square_room("a", 10.0)).unwrap();
    orch.add_room(square_room("b", 10.0)).unwrap();
    orch.add_connection(Arc::new(BasicConnection::door("door", "a", "b", 1.0)))
        .unwrap();

    let walker = creature("walker");
    let (a, b) = (RoomId::from("a"), RoomId::from("b"));
    assert_eq!(
        orch.find_path(&a, &b, walker.as_ref()).unwrap(),
        vec![a.clone(), b.clone()]
    );
    assert_eq!(
        orch.find_path(&b, &a, walker.as_ref()).unwrap(),
        vec![b.clone(), a.clone()]
    );

    orch.remove_connection(&"door".into()).unwrap();
    let err = orch.find_path(&a, &b, walker.as_ref()).unwrap_err();
    assert!(matches!(err, OrchestratorError::NoPath { .. }));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn removing_a_hub_drops_every_spoke() {
    let orch = RoomOrchestrator::new(OrchestratorConfig::default());
    orch.add_room(square_room("hub", 10.0)).unwrap();
    for (i, spoke) in ["n", "e", "s", "w"].into_iter().enumerate() {
        orch.add_room(square_room(spoke, 10.0)).unwrap();
        orch.add_connection(Arc::new(BasicConnection::door(
            format!("hub-{spoke}").as_str(),
            "hub",
            spoke,
            1.0,
        )))
        .unwrap();
        orch.place_entity(
            &RoomId::from("hub"),
            creature(&format!("guest{i}")),
            p(i as f64, 0.0),
        )
        .unwrap();
    }
    orch.add_connection(Arc::new(BasicConnection::tunnel("n-s", "n", "s", 4.0)))
        .unwrap();

    let bus = Arc::new(RecordingBus::new());
    orch.connect_bus(bus.clone());
    orch.remove_room(&"hub".into()).unwrap();

    let left: Vec<_> = orch.all_connections().keys().map(|c| c.to_string()).collect();
    assert_eq!(left, vec!["n-s"]);
    for i in 0..4 {
        assert_eq!(orch.entity_room(&format!("guest{i}").as_str().into()), None);
    }
    match &bus.events()[..] {
        [SpatialEvent::RoomRemoved(e)] => assert_eq!(e.dropped_connections.len(), 4),
        other => panic!("unexpected events {other:?}"),
    }
}

#[test]
fn transition_events_reach_another_thread() {
    let orch = RoomOrchestrator::new(OrchestratorConfig::default().with_type("keep"));
    let upstairs = square_room("upstairs", 5.0);
    orch.add_room(square_room("cellar", 5.0)).unwrap();
    orch.add_room(upstairs.clone()).unwrap();
    orch.add_connection(Arc::new(BasicConnection::stairs(
        "stairs", "cellar", "upstairs", 2.0, true,
    )))
    .unwrap();
    let rat = creature("rat");
    orch.place_entity(&"cellar".into(), rat.clone(), p(1.0, 1.0))
        .unwrap();

    let (bus, rx) = ChannelBus::unbounded();
    orch.connect_bus(Arc::new(bus));

    let placer = std::thread::spawn(move || {
        let event = rx.recv().unwrap();
        let SpatialEvent::EntityRoomTransition(t) = event else {
            panic!("unexpected event {event:?}");
        };
        assert_eq!(t.to_room, RoomId::from("upstairs"));
        upstairs.place_entity(rat, p(0.0, 0.0)).unwrap();
        upstairs
    });

    orch.move_entity_between_rooms(&"rat".into(), &"cellar".into(), &"upstairs".into(), &"stairs".into())
        .unwrap();
    let upstairs = placer.join().unwrap();

    assert_eq!(upstairs.entity_position(&"rat".into()), Some(p(0.0, 0.0)));
    assert_eq!(orch.entity_room(&"rat".into()), Some(RoomId::from("upstairs")));
}

#[test]
fn follower_tracks_direct_room_edits() {
    let orch = Arc::new(RoomOrchestrator::new(OrchestratorConfig::default()));
    let (bus, rx) = ChannelBus::unbounded();
    for id in ["hall", "vault"] {
        let room = square_room(id, 6.0);
        room.connect_bus(Arc::new(bus.clone()));
        orch.add_room(room).unwrap();
    }
    orch.connect_bus(Arc::new(bus));
    let follower = orch.follow_events(rx).unwrap();

    let hall = orch.room(&"hall".into()).unwrap();
    let vault = orch.room(&"vault".into()).unwrap();
    hall.place_entity(creature("guard"), p(1.0, 1.0)).unwrap();
    hall.place_entity(creature("thief"), p(2.0, 2.0)).unwrap();
    hall.move_entity(&"thief".into(), p(3.0, 3.0)).unwrap();
    hall.remove_entity(&"thief".into()).unwrap();
    vault.place_entity(creature("thief"), p(0.0, 0.0)).unwrap();
    drop((hall, vault));

    // The vault placement is the last event on the channel.
    let deadline = Instant::now() + Duration::from_secs(5);
    while orch.entity_room(&"thief".into()) != Some(RoomId::from("vault")) {
        assert!(Instant::now() < deadline, "follower never caught up");
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(orch.entity_room(&"guard".into()), Some(RoomId::from("hall")));

    // Dropping the orchestrator drops every bus clone and ends the thread.
    drop(orch);
    let changed = follower.join().unwrap();
    assert!(changed >= 2, "changed={changed}");
}
