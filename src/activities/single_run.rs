use super::condition::Condition;
use super::move_activity::MoveActivity;
use super::sequential::SequentialActivity;
use super::shift_amount::{ShiftAmountActivity, ShiftPhase};
use super::while_activity::WhileActivity;
use super::Activity;

/// Concepts and conditions of a single run process: a mover shuttling
/// content from an origin to a destination.
pub struct SingleRun<'a> {
    pub name: &'a str,
    pub origin: &'a str,
    pub destination: &'a str,
    pub mover: &'a str,
    pub loader: &'a str,
    pub unloader: &'a str,
    pub start_event: Option<Condition>,
    pub stop_event: Option<Condition>,
    pub requested_resources: Option<&'a str>,
}

/// Builds a while activity over the cycle sail empty, load, sail filled
/// and unload.  Unless a stop event is given, the cycle repeats until the
/// origin is empty or the destination is full.
pub fn single_run_process(run: SingleRun) -> Activity {
    let (origin, destination) = (run.origin, run.destination);
    let stop_event = run.stop_event.unwrap_or_else(|| {
        Condition::Or(vec![
            Condition::container_empty(origin),
            Condition::container_full(destination),
        ])
    });
    let group = run.requested_resources;
    let grouped = |activity: Activity| match group {
        Some(group) => activity.with_requested_resources(group),
        None => activity,
    };

    let cycle = vec![
        grouped(Activity::new(
            &format!("{} sailing empty", run.name),
            Box::new(MoveActivity::new(run.mover, run.origin)),
        )),
        grouped(Activity::new(
            &format!("{} loading", run.name),
            Box::new(
                ShiftAmountActivity::new(run.loader, run.origin, run.mover)
                    .with_phase(ShiftPhase::Loading),
            ),
        )),
        grouped(Activity::new(
            &format!("{} sailing filled", run.name),
            Box::new(MoveActivity::new(run.mover, run.destination)),
        )),
        grouped(Activity::new(
            &format!("{} unloading", run.name),
            Box::new(
                ShiftAmountActivity::new(run.unloader, run.mover, run.destination)
                    .with_phase(ShiftPhase::Unloading),
            ),
        )),
    ];
    let sequence = Activity::new(
        &format!("{} sequence", run.name),
        Box::new(SequentialActivity::new(cycle)),
    );
    let activity = Activity::new(
        run.name,
        Box::new(WhileActivity::new(vec![sequence], stop_event)),
    );
    match run.start_event {
        Some(start_event) => activity.with_start_event(start_event),
        None => activity,
    }
}
