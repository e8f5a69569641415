//! Unit tests for lift-schedule.

use lift_core::{Building, Direction, Hallway, PassengerId, PassengerRng, SimTime};

use crate::{PassengerInfo, ScheduleError, TimerQueue, load_passengers_reader, parse_descriptor};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn rng(id: u32) -> PassengerRng {
    PassengerRng::new(7, PassengerId(id))
}

fn parse(line: &str) -> Result<PassengerInfo, ScheduleError> {
    parse_descriptor(line, SimTime::ZERO, &Building::reference(), &mut rng(0))
}

// ── PassengerInfo ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod info {
    use super::*;

    #[test]
    fn directions_follow_floors() {
        let up = parse("0s 3 FRONT 7 BACK").unwrap();
        assert_eq!(up.travel_direction, Direction::Up);
        assert_eq!(up.hall_call_direction, Direction::Up);

        let down = parse("0s 8 FRONT 2 BACK").unwrap();
        assert_eq!(down.travel_direction, Direction::Down);
        assert_eq!(down.hall_call_direction, Direction::Down);
    }

    #[test]
    fn in_car_start_has_no_direction() {
        let p = parse("0s 0 FRONT 5 FRONT").unwrap();
        assert!(p.starts_in_car());
        assert_eq!(p.travel_direction, Direction::Stop);
        assert_eq!(p.hall_call_direction, Direction::Stop);
    }

    #[test]
    fn same_floor_trip_hall_call() {
        let bottom = parse("0s 1 FRONT 1 BACK").unwrap();
        assert_eq!(bottom.travel_direction, Direction::Stop);
        assert_eq!(bottom.hall_call_direction, Direction::Up);

        let top = parse("0s 8 FRONT 8 FRONT").unwrap();
        assert_eq!(top.hall_call_direction, Direction::Down);

        let middle = parse("0s 5 FRONT 5 FRONT").unwrap();
        assert_eq!(middle.travel_direction, Direction::Stop);
        assert_ne!(middle.hall_call_direction, Direction::Stop);
    }

    #[test]
    fn traits_within_ranges() {
        for id in 0..50 {
            let p = PassengerInfo::new(
                SimTime::ZERO,
                (3, Hallway::Front),
                (7, Hallway::Back),
                &Building::reference(),
                &mut rng(id),
            )
            .unwrap();
            let t = &p.traits;
            assert!((250..=1000).contains(&t.hall_press_time.as_millis()));
            assert!((250..=1000).contains(&t.car_press_time.as_millis()));
            assert!((20..=45).contains(&t.width));
            assert!((1000..=2000).contains(&t.door_traversal_delay.as_millis()));
            assert!((2000..=4000).contains(&t.door_backout_delay.as_millis()));
            assert!((3..=5).contains(&t.missed_opening_threshold));
        }
    }

    #[test]
    fn same_seed_same_traits() {
        let a = parse("0s 3 FRONT 7 BACK").unwrap();
        let b = parse("0s 3 FRONT 7 BACK").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn validation() {
        let invalid = |line: &str| matches!(parse(line), Err(ScheduleError::Invalid(_)));
        assert!(invalid("0s 9 FRONT 1 FRONT"), "start floor out of range");
        assert!(invalid("1s 0 FRONT 1 FRONT"), "in-car start after time 0");
        assert!(invalid("0s 2 FRONT 1 FRONT"), "no front landing on floor 2");
        assert!(invalid("0s 1 FRONT 0 FRONT"), "end floor 0");
        assert!(invalid("0s 1 FRONT 8 BACK"), "no back landing on floor 8");
        // Start floor 0 ignores the start side.
        assert!(parse("0s 0 BACK 3 FRONT").is_ok());
    }
}

// ── Descriptor parsing ────────────────────────────────────────────────────────

#[cfg(test)]
mod descriptor {
    use super::*;

    #[test]
    fn roundtrip_preserves_fields() {
        let p = parse("12.5s 3 FRONT 7 BACK").unwrap();
        assert_eq!(p.to_string(), "12.5s 3 FRONT 7 BACK");

        let again = parse(&p.to_string()).unwrap();
        assert_eq!(again.injection_time, p.injection_time);
        assert_eq!((again.start_floor, again.start_hallway), (3, Hallway::Front));
        assert_eq!((again.end_floor, again.end_hallway), (7, Hallway::Back));
    }

    #[test]
    fn relative_time_adds_to_latest() {
        let building = Building::reference();
        let p = parse_descriptor("+2s 1 FRONT 4 FRONT", SimTime::from_secs(10), &building, &mut rng(0))
            .unwrap();
        assert_eq!(p.injection_time, SimTime::from_secs(12));
    }

    #[test]
    fn field_errors() {
        assert!(matches!(parse("0s 3 FRONT 7"), Err(ScheduleError::Parse(_))));
        assert!(matches!(parse("0s three FRONT 7 BACK"), Err(ScheduleError::Parse(_))));
        assert!(matches!(parse("0s 3 SIDE 7 BACK"), Err(ScheduleError::Core(_))));
        assert!(matches!(parse("soon 3 FRONT 7 BACK"), Err(ScheduleError::Core(_))));
    }

    #[test]
    fn loader_skips_comments_and_tracks_latest() {
        let text = "\
; header comment
0s 3 FRONT 7 BACK   ; first

5s 1 BACK 2 BACK
+1s 4 FRONT 6 FRONT
2s 6 FRONT 1 FRONT
+1s 5 FRONT 3 FRONT
";
        let ps = load_passengers_reader(text.as_bytes(), &Building::reference(), 1).unwrap();
        let times: Vec<u64> = ps.iter().map(|p| p.injection_time.as_millis()).collect();
        // The absolute 2s does not move the latest time back from 6s.
        assert_eq!(times, vec![0, 5000, 6000, 2000, 7000]);
    }

    #[test]
    fn loader_seeds_by_position() {
        let text = "0s 3 FRONT 7 BACK\n0s 3 FRONT 7 BACK\n";
        let building = Building::reference();
        let ps = load_passengers_reader(text.as_bytes(), &building, 11).unwrap();
        let direct = PassengerInfo::new(
            SimTime::ZERO,
            (3, Hallway::Front),
            (7, Hallway::Back),
            &building,
            &mut PassengerRng::new(11, PassengerId(1)),
        )
        .unwrap();
        assert_eq!(ps[1], direct);
    }

    #[test]
    fn loader_reports_line_number() {
        let text = "0s 3 FRONT 7 BACK\n; ok\n0s 3 FRONT 99 BACK\n";
        match load_passengers_reader(text.as_bytes(), &Building::reference(), 0) {
            Err(ScheduleError::AtLine { line, source }) => {
                assert_eq!(line, 3);
                assert!(matches!(*source, ScheduleError::Invalid(_)));
            }
            other => panic!("expected AtLine error, got {other:?}"),
        }
    }
}

// ── TimerQueue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod timer_queue {
    use super::*;

    #[test]
    fn pops_in_time_then_insertion_order() {
        let mut q = TimerQueue::new();
        q.push(SimTime::from_secs(2), "late");
        q.push(SimTime::from_secs(1), "first");
        q.push(SimTime::from_secs(1), "second");
        assert_eq!(q.len(), 3);
        assert_eq!(q.next_time(), Some(SimTime::from_secs(1)));

        let until = SimTime::from_secs(5);
        assert_eq!(q.pop_due(until), Some((SimTime::from_secs(1), "first")));
        assert_eq!(q.pop_due(until), Some((SimTime::from_secs(1), "second")));
        assert_eq!(q.pop_due(until), Some((SimTime::from_secs(2), "late")));
        assert_eq!(q.pop_due(until), None);
        assert!(q.is_empty());
    }

    #[test]
    fn respects_horizon() {
        let mut q = TimerQueue::new();
        q.push(SimTime::from_secs(3), 1u32);
        assert_eq!(q.pop_due(SimTime::from_secs(2)), None);
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop_due(SimTime::from_secs(3)), Some((SimTime::from_secs(3), 1)));
    }

    #[test]
    fn clear_empties() {
        let mut q = TimerQueue::new();
        q.push(SimTime::ZERO, ());
        q.push(SimTime::from_secs(1), ());
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.next_time(), None);
    }
}
