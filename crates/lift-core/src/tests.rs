//! Unit tests for lift-core primitives.

#[cfg(test)]
mod ids {
    use crate::PassengerId;

    #[test]
    fn index_roundtrip() {
        let id = PassengerId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(PassengerId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(PassengerId::INVALID.0, u32::MAX);
        assert_eq!(PassengerId::default(), PassengerId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(PassengerId(7).to_string(), "Passenger 7");
    }
}

#[cfg(test)]
mod hallway {
    use crate::{Direction, Hallway};

    #[test]
    fn tokens() {
        assert_eq!("FRONT".parse::<Hallway>().unwrap(), Hallway::Front);
        assert_eq!("BACK".parse::<Hallway>().unwrap(), Hallway::Back);
        assert!("front".parse::<Hallway>().is_err());
        assert_eq!(Hallway::Back.to_string(), "BACK");
        assert_eq!(Hallway::Front.opposite(), Hallway::Back);
    }

    #[test]
    fn direction_between() {
        assert_eq!(Direction::between(3, 7), Direction::Up);
        assert_eq!(Direction::between(7, 3), Direction::Down);
        assert_eq!(Direction::between(4, 4), Direction::Stop);
        assert_eq!(Direction::default(), Direction::Stop);
    }
}

#[cfg(test)]
mod building {
    use crate::{Building, Hallway};

    #[test]
    fn reference_layout() {
        let b = Building::reference();
        assert_eq!(b.floors(), 8);
        assert!(b.has_landing(1, Hallway::Front));
        assert!(b.has_landing(1, Hallway::Back));
        assert!(!b.has_landing(2, Hallway::Front));
        assert!(b.has_landing(2, Hallway::Back));
        assert!(b.has_landing(5, Hallway::Front));
        assert!(!b.has_landing(5, Hallway::Back));
        assert!(b.has_landing(7, Hallway::Back));
        assert!(!b.has_landing(8, Hallway::Back));
    }

    #[test]
    fn out_of_range_floors_have_no_landing() {
        let b = Building::reference();
        assert!(!b.has_landing(0, Hallway::Front));
        assert!(!b.has_landing(9, Hallway::Front));
        assert!(!b.has_landing(-1, Hallway::Back));
    }

    #[test]
    fn landing_iteration_order() {
        let b = Building::reference();
        let all: Vec<_> = b.landings().collect();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0], (1, Hallway::Front));
        assert_eq!(all[1], (1, Hallway::Back));
        assert_eq!(all[2], (2, Hallway::Back));
        assert_eq!(*all.last().unwrap(), (8, Hallway::Front));
    }

    #[test]
    fn rejects_empty_and_doorless_floors() {
        assert!(Building::new(vec![]).is_err());
        assert!(Building::new(vec![[true, false], [false, false]]).is_err());
        assert!(Building::new(vec![[true, true]]).is_ok());
    }
}

#[cfg(test)]
mod time {
    use crate::{PassengerTiming, SimClock, SimConfig, SimTime};

    #[test]
    fn parse_units() {
        assert_eq!("100ms".parse::<SimTime>().unwrap(), SimTime::from_millis(100));
        assert_eq!("2s".parse::<SimTime>().unwrap(), SimTime::from_secs(2));
        assert_eq!("1.5 s".parse::<SimTime>().unwrap(), SimTime::from_millis(1500));
        assert_eq!("3M".parse::<SimTime>().unwrap(), SimTime::from_secs(180));
        assert_eq!("1h".parse::<SimTime>().unwrap(), SimTime::from_secs(3600));
        assert_eq!("250us".parse::<SimTime>().unwrap(), SimTime::from_nanos(250_000));
        assert_eq!("7ns".parse::<SimTime>().unwrap(), SimTime::from_nanos(7));
    }

    #[test]
    fn parse_words_and_plus() {
        assert_eq!("ZERO".parse::<SimTime>().unwrap(), SimTime::ZERO);
        assert_eq!("forever".parse::<SimTime>().unwrap(), SimTime::FOREVER);
        assert_eq!("INFINITE".parse::<SimTime>().unwrap(), SimTime::FOREVER);
        assert_eq!("+3s".parse::<SimTime>().unwrap(), SimTime::from_secs(3));
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "s", "12", "1.2.3s", ".5s", "5parsecs", "-1s"] {
            assert!(bad.parse::<SimTime>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn display_is_fractional_seconds() {
        assert_eq!(SimTime::ZERO.to_string(), "0s");
        assert_eq!(SimTime::from_millis(12_500).to_string(), "12.5s");
        assert_eq!(SimTime::from_nanos(1).to_string(), "0.000000001s");
        assert_eq!(SimTime::FOREVER.to_string(), "FOREVER");
    }

    #[test]
    fn display_parses_back_exactly() {
        for t in [SimTime::from_nanos(1), SimTime::from_millis(12_345), SimTime::from_secs(90)] {
            assert_eq!(t.to_string().parse::<SimTime>().unwrap(), t);
        }
    }

    #[test]
    fn arithmetic_saturates() {
        let t = SimTime::from_secs(1);
        assert_eq!(t + SimTime::from_millis(500), SimTime::from_millis(1500));
        assert_eq!(SimTime::FOREVER.offset(t), SimTime::FOREVER);
        assert_eq!(SimTime::ZERO - t, SimTime::ZERO);
        assert_eq!(SimTime::from_secs(3).since(t), SimTime::from_secs(2));
    }

    #[test]
    fn clock_advances() {
        let mut clock = SimClock::new();
        assert_eq!(clock.now(), SimTime::ZERO);
        clock.advance_to(SimTime::from_secs(4));
        assert_eq!(clock.now(), SimTime::from_secs(4));
        assert_eq!(clock.to_string(), "t=4s");
    }

    #[test]
    fn default_timing() {
        let t = PassengerTiming::default();
        assert_eq!(t.door_check, SimTime::from_millis(100));
        assert_eq!(t.call_check, SimTime::from_millis(200));
        assert_eq!(t.call_recheck, SimTime::from_millis(500));
        assert_eq!(t.null_period, SimTime::from_millis(1));
        assert_eq!(t.backoff, SimTime::from_secs(10));
    }

    #[test]
    fn config_end_time() {
        let mut cfg = SimConfig::default();
        assert_eq!(cfg.end_time(), SimTime::FOREVER);
        cfg.end_time = Some(SimTime::from_secs(60));
        assert_eq!(cfg.end_time(), SimTime::from_secs(60));
    }
}

#[cfg(test)]
mod rng {
    use crate::{PassengerId, PassengerRng};

    #[test]
    fn same_seed_same_stream() {
        let mut a = PassengerRng::new(99, PassengerId(3));
        let mut b = PassengerRng::new(99, PassengerId(3));
        for _ in 0..16 {
            assert_eq!(a.gen_range(0..1000u32), b.gen_range(0..1000u32));
        }
    }

    #[test]
    fn different_passengers_diverge() {
        let mut a = PassengerRng::new(99, PassengerId(3));
        let mut b = PassengerRng::new(99, PassengerId(4));
        let xs: Vec<u64> = (0..8).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }
}
