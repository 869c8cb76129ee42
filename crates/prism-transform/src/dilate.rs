//! Time dilation through a piecewise-linear warp.
//!
//! Dilation aligns two sounds' internal landmarks (attack end, sustain
//! start) onto a common target timeline before morphing. The warp is
//! monotone, so breakpoint order inside every partial is preserved.

use prism_core::{PartialCollection, TimeMap};
use rayon::prelude::*;

/// Replace every breakpoint's time with `map(time)`.
pub fn dilate(collection: &mut PartialCollection, map: &TimeMap) {
    collection
        .as_mut_slice()
        .par_iter_mut()
        .for_each(|p| p.map_times(|t| map.map(t)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use prism_core::{Breakpoint, Partial};

    fn collection() -> PartialCollection {
        let mut p = Partial::with_label(1);
        p.insert(Breakpoint::new(0.2, 100.0, 0.5, 0.0, 0.0));
        p.insert(Breakpoint::new(0.5, 100.0, 0.5, 0.0, 0.0));
        p.insert(Breakpoint::new(1.0, 100.0, 0.5, 0.0, 0.0));
        [p].into_iter().collect()
    }

    #[test]
    fn identity_map_leaves_times_unchanged() {
        let mut c = collection();
        let before = c.clone();
        dilate(&mut c, &TimeMap::identity());
        assert_eq!(c, before);
    }

    #[test]
    fn anchors_move_landmarks_onto_the_target_timeline() {
        let mut c = collection();
        // Map the landmark at 0.5 s out to 1.0 s, keeping 1.0 fixed.
        let map = TimeMap::from_anchors([(0.5, 1.0), (1.0, 1.5)]).unwrap();
        dilate(&mut c, &map);
        let times: Vec<f64> = c.iter().next().unwrap().points().iter().map(|b| b.time).collect();
        assert_relative_eq!(times[0], 0.4);
        assert_relative_eq!(times[1], 1.0);
        assert_relative_eq!(times[2], 1.5);
    }
}
