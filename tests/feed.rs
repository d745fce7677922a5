use std::io::{BufRead, BufReader};
use std::net::TcpStream;
use std::time::Duration;

use charged_particles::{Body, DVec3, Execution, Parameters, Simulation, Snapshot, SnapshotFeed};

#[test]
fn viewer_receives_snapshot_lines() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut sim = Simulation::with_execution(Parameters::default(), Execution::Sequential).unwrap();
    sim.spawn(Body::proton(DVec3::new(-20.0, 0.0, 0.0), DVec3::zero()));
    sim.spawn(Body::electron(DVec3::new(40.0, 0.0, 0.0), DVec3::zero()));
    sim.tick();

    let feed = SnapshotFeed::bind("127.0.0.1:0").unwrap();
    let line = sim.snapshot().to_line().unwrap();
    assert!(feed.publish(line.clone()));
    // the single slot is taken until a viewer drains it
    assert!(!feed.publish(line.clone()));

    let stream = TcpStream::connect(feed.local_addr()).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let mut reader = BufReader::new(stream);
    let mut received = String::new();
    reader.read_line(&mut received).unwrap();

    assert_eq!(received, line);
    let snapshot = Snapshot::from_line(&received).unwrap();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.records[0].position.len(), 3);
}

#[test]
fn dropping_the_feed_closes_the_listener() {
    let _ = env_logger::builder().is_test(true).try_init();

    let feed = SnapshotFeed::bind("127.0.0.1:0").unwrap();
    let addr = feed.local_addr();
    assert!(TcpStream::connect(addr).is_ok());

    drop(feed);

    assert!(TcpStream::connect(addr).is_err());
}
