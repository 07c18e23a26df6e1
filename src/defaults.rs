/// A shift is only schedulable once it has this many distinct valid stops.
pub const MIN_STOPS_PER_SHIFT: usize = 2;
