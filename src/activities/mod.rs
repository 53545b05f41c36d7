//! The activities module provides the prebuilt activities of a simulation:
//! basic, move and shift amount activities that operate on concepts, and
//! sequential, while, repeat and parallel activities that compose other
//! activities.  Custom activities implement the `ActivityModel` trait, and
//! can be made available to scenario files with the `SerializableActivity`
//! derive and the `register!` macro of `clsim_derive`.

pub mod activity;
pub mod basic;
pub mod condition;
pub mod lifecycle;
pub mod move_activity;
pub mod parallel;
pub mod sequential;
pub mod shift_amount;
pub mod single_run;
pub mod while_activity;

pub mod activity_factory;
pub mod activity_repr;
pub mod activity_trait;

pub use self::activity::Activity;
pub use self::activity_repr::ActivityRepr;
pub use self::activity_trait::{ActivityModel, SerializableActivity};
pub use self::basic::BasicActivity;
pub use self::condition::{ActivityState, Condition, ContainerState, Trigger};
pub use self::lifecycle::ActivityCore;
pub use self::move_activity::MoveActivity;
pub use self::parallel::ParallelActivity;
pub use self::sequential::SequentialActivity;
pub use self::shift_amount::{ShiftAmountActivity, ShiftPhase};
pub use self::single_run::{single_run_process, SingleRun};
pub use self::while_activity::{RepeatActivity, WhileActivity};
