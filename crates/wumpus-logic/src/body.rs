//! The physical (or simulated) robot the controller drives.
//!
//! Every call blocks until the action has finished. Implementations do not
//! track pose; the controller keeps its own position and heading.

/// Locomotion, sensing and the one-shot arrow.
pub trait RobotBody {
    /// Raw reading at the current cell: `0b1000` if the gold is here,
    /// otherwise an OR of `0b001` breeze, `0b010` stench, `0b100` glitter.
    fn get_reading(&mut self) -> u8;

    /// Fire the arrow in the current heading.
    fn trigger_disable_action(&mut self);

    /// Turn 90° clockwise in place.
    fn rotate_clockwise(&mut self);

    /// Turn 90° counter-clockwise in place.
    fn rotate_counterclockwise(&mut self);

    /// Turn around. Override if the hardware can do it in one motion.
    fn rotate_180(&mut self) {
        self.rotate_clockwise();
        self.rotate_clockwise();
    }

    /// Move one cell forward.
    fn advance(&mut self);
}

impl<B: RobotBody + ?Sized> RobotBody for &mut B {
    fn get_reading(&mut self) -> u8 {
        (**self).get_reading()
    }
    fn trigger_disable_action(&mut self) {
        (**self).trigger_disable_action()
    }
    fn rotate_clockwise(&mut self) {
        (**self).rotate_clockwise()
    }
    fn rotate_counterclockwise(&mut self) {
        (**self).rotate_counterclockwise()
    }
    fn rotate_180(&mut self) {
        (**self).rotate_180()
    }
    fn advance(&mut self) {
        (**self).advance()
    }
}
