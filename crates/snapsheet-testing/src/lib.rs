//! Test harness for snapsheet: robot-style gesture scripting against
//! in-memory fakes. See [`SheetRobot`].

pub mod robot;

pub use robot::{FakeSurface, FakeViewport, SheetRobot};
