//! Landing table: which (floor, hallway) pairs have a hall door.
//!
//! Floors are numbered from 1.  Floor 0 is not a landing; it stands for
//! "already inside the car" in passenger descriptors.

use crate::{Hallway, LiftError, LiftResult};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Building {
    /// `landings[f - 1][h.index()]` is true when floor `f` has a landing on
    /// side `h`.
    landings: Vec<[bool; 2]>,
}

impl Building {
    /// Build from a per-floor `[front, back]` table, bottom floor first.
    pub fn new(landings: Vec<[bool; 2]>) -> LiftResult<Self> {
        if landings.is_empty() {
            return Err(LiftError::Config("building has no floors".into()));
        }
        if let Some(i) = landings.iter().position(|l| !l[0] && !l[1]) {
            return Err(LiftError::Config(format!("floor {} has no landing", i + 1)));
        }
        Ok(Self { landings })
    }

    /// The 8-floor reference hoistway.
    pub fn reference() -> Self {
        const F: [bool; 2] = [true, false];
        const B: [bool; 2] = [false, true];
        const FB: [bool; 2] = [true, true];
        Self { landings: vec![FB, B, F, F, F, F, FB, F] }
    }

    /// Number of floors (the highest floor number).
    #[inline]
    pub fn floors(&self) -> i32 {
        self.landings.len() as i32
    }

    /// `true` if `floor` is within the building and has a landing on `hallway`.
    pub fn has_landing(&self, floor: i32, hallway: Hallway) -> bool {
        self.landing_index(floor, hallway).is_some()
    }

    /// Dense index of an existing landing, for per-landing arrays sized
    /// `floors() * 2`.
    pub fn landing_index(&self, floor: i32, hallway: Hallway) -> Option<usize> {
        if floor < 1 || floor > self.floors() {
            return None;
        }
        let f = (floor - 1) as usize;
        self.landings[f][hallway.index()].then_some(f * 2 + hallway.index())
    }

    /// Every existing landing, bottom floor first, front before back.
    pub fn landings(&self) -> impl Iterator<Item = (i32, Hallway)> + '_ {
        self.landings.iter().enumerate().flat_map(|(i, sides)| {
            Hallway::ALL
                .into_iter()
                .filter(move |h| sides[h.index()])
                .map(move |h| (i as i32 + 1, h))
        })
    }
}

impl Default for Building {
    fn default() -> Self {
        Self::reference()
    }
}
