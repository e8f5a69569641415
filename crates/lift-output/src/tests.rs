//! Unit tests for lift-output writers.

use std::fs;

use lift_core::{Building, Hallway, PassengerId, PassengerRng, SimConfig, SimTime};
use lift_passenger::Passenger;
use lift_schedule::PassengerInfo;
use lift_sim::{PassengerHandler, SimObserver};

use crate::{CsvWriter, DeductionRow, DeliveryRow, OutputWriter, SimOutputObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn delivery(id: u32) -> DeliveryRow {
    DeliveryRow {
        passenger_id:    id,
        injection_time:  2.5,
        delivery_time:   41.25,
        start_floor:     3,
        start_hallway:   Hallway::Front,
        end_floor:       7,
        end_hallway:     Hallway::Back,
        satisfaction:    80.0,
        deduction_count: 1,
    }
}

fn deduction(id: u32) -> DeductionRow {
    DeductionRow {
        passenger_id: id,
        time:         12.0,
        factor:       0.8,
        reason:       "door traversal failed".to_string(),
    }
}

fn info() -> PassengerInfo {
    let building = Building::reference();
    let mut rng = PassengerRng::new(7, PassengerId(0));
    PassengerInfo::new(
        SimTime::from_secs(2),
        (3, Hallway::Front),
        (7, Hallway::Back),
        &building,
        &mut rng,
    )
    .unwrap()
}

fn read_lines(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path).unwrap().lines().map(str::to_string).collect()
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::*;

    #[test]
    fn files_created() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert!(dir.path().join("deliveries.csv").exists());
        assert!(dir.path().join("deductions.csv").exists());
    }

    #[test]
    fn headers_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let deliveries = read_lines(&dir.path().join("deliveries.csv"));
        assert_eq!(
            deliveries[0],
            "passenger_id,injection_time,delivery_time,start_floor,start_hallway,\
             end_floor,end_hallway,satisfaction,deduction_count"
        );
        let deductions = read_lines(&dir.path().join("deductions.csv"));
        assert_eq!(deductions[0], "passenger_id,time,factor,reason");
    }

    #[test]
    fn rows_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_deliveries(&[delivery(4)]).unwrap();
        w.write_deductions(&[deduction(4), deduction(5)]).unwrap();
        w.finish().unwrap();

        let deliveries = read_lines(&dir.path().join("deliveries.csv"));
        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[1], "4,2.500,41.250,3,FRONT,7,BACK,80.000,1");

        let deductions = read_lines(&dir.path().join("deductions.csv"));
        assert_eq!(deductions.len(), 3);
        assert_eq!(deductions[1], "4,12.000,0.80,door traversal failed");
        assert!(deductions[2].starts_with("5,"));
    }

    #[test]
    fn finish_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn empty_batches_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_deliveries(&[]).unwrap();
        w.write_deductions(&[]).unwrap();
        w.finish().unwrap();

        assert_eq!(read_lines(&dir.path().join("deliveries.csv")).len(), 1);
    }

    #[test]
    fn missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CsvWriter::new(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn observer_batches_deductions_per_delivery() {
        let dir = tempfile::tempdir().unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());

        let p = Passenger::new(PassengerId(0), info());
        obs.on_deduction(SimTime::from_secs(5), PassengerId(0), 0.5, "missed opening");
        obs.on_deduction(SimTime::from_secs(9), PassengerId(0), 0.8, "door traversal failed");

        // Nothing reaches disk until the delivery.
        let before = fs::read_to_string(dir.path().join("deductions.csv")).unwrap();
        assert!(!before.contains("missed opening"));

        obs.on_delivered(SimTime::from_secs(30), &p);
        let handler = PassengerHandler::new(vec![info()], &SimConfig::default());
        obs.on_sim_end(SimTime::from_secs(30), &handler);
        assert!(obs.take_error().is_none());

        let deductions = read_lines(&dir.path().join("deductions.csv"));
        assert_eq!(deductions.len(), 3);
        assert_eq!(deductions[1], "0,5.000,0.50,missed opening");

        // Not delivered through the state machine, so time runs from injection to `now`.
        let deliveries = read_lines(&dir.path().join("deliveries.csv"));
        assert_eq!(deliveries[1], "0,2.000,28.000,3,FRONT,7,BACK,100.000,0");
    }

    #[test]
    fn sim_end_flushes_stranded_deductions() {
        let dir = tempfile::tempdir().unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());

        obs.on_deduction(SimTime::from_secs(5), PassengerId(3), 0.5, "missed opening");
        let handler = PassengerHandler::new(vec![info()], &SimConfig::default());
        obs.on_sim_end(SimTime::from_secs(60), &handler);
        assert!(obs.take_error().is_none());
        drop(obs.into_writer());

        let deductions = read_lines(&dir.path().join("deductions.csv"));
        assert_eq!(deductions.len(), 2);
        assert!(deductions[1].starts_with("3,5.000"));
    }
}

// ── SQLite ────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::*;
    use crate::SqliteWriter;

    fn count(conn: &rusqlite::Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn db_created() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn rows_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_deliveries(&[delivery(1), delivery(2)]).unwrap();
        w.write_deductions(&[deduction(1)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        assert_eq!(count(&conn, "deliveries"), 2);
        assert_eq!(count(&conn, "deductions"), 1);

        let (hallway, satisfaction): (String, f64) = conn
            .query_row(
                "SELECT end_hallway, satisfaction FROM deliveries WHERE passenger_id = 2",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(hallway, "BACK");
        assert!((satisfaction - 80.0).abs() < 1e-9);
    }

    #[test]
    fn finish_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn empty_batches_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_deliveries(&[]).unwrap();
        w.write_deductions(&[]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        assert_eq!(count(&conn, "deliveries"), 0);
    }
}
