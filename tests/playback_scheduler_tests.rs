use approx::assert_relative_eq;
use tensile_rig::RigError;
use tensile_rig::api::{
    GraphState, PacingScheduler, PlaybackEvent, PlaybackEvents, compute_sample_delays,
};
use tensile_rig::core::{CurveSource, MaterialProfile, ScaledSample, SpecimenContext, SpeedMode};

const CURVE: &str = "0|0\n100|5\n80|7\n40|10";

fn specimen() -> SpecimenContext {
    SpecimenContext::new(50.0, 100.0, 30.0, SpeedMode::DeformationRate)
}

fn material() -> MaterialProfile {
    MaterialProfile::new("steel", CurveSource::Text(CURVE.to_owned()))
        .with_rupture_stress_threshold_mpa(50.0)
}

fn ready_scheduler() -> PacingScheduler {
    let mut scheduler = PacingScheduler::new(0.001);
    let mut events = PlaybackEvents::new();
    scheduler
        .prepare(specimen(), &material(), &mut events)
        .expect("prepare");
    assert_eq!(scheduler.state(), GraphState::Ready);
    scheduler
}

fn plotted_indices(events: &PlaybackEvents) -> Vec<usize> {
    events
        .iter()
        .filter_map(|event| match event {
            PlaybackEvent::SamplePlotted { index, .. } => Some(*index),
            _ => None,
        })
        .collect()
}

fn state_changes(events: &PlaybackEvents) -> Vec<GraphState> {
    events
        .iter()
        .filter_map(|event| match event {
            PlaybackEvent::StateChanged(state) => Some(*state),
            _ => None,
        })
        .collect()
}

#[test]
fn delays_follow_strain_steps_and_crosshead_speed() {
    let samples = vec![
        ScaledSample::new(0.0, 0.0),
        ScaledSample::new(5.0, 10.0),
        ScaledSample::new(7.0, 8.0),
        ScaledSample::new(10.0, 4.0),
    ];
    let delays = compute_sample_delays(&samples, 50.0, 30.0, 0.001);

    assert_eq!(delays.len(), 4);
    assert_relative_eq!(delays[0], 0.001);
    assert_relative_eq!(delays[1], 5.0, epsilon = 1e-9);
    assert_relative_eq!(delays[2], 2.0, epsilon = 1e-9);
    assert_relative_eq!(delays[3], 3.0, epsilon = 1e-9);
}

#[test]
fn delays_are_floored_for_flat_or_backward_strain() {
    let samples = vec![
        ScaledSample::new(1.0, 0.0),
        ScaledSample::new(1.0, 1.0),
        ScaledSample::new(0.5, 2.0),
    ];
    let delays = compute_sample_delays(&samples, 50.0, 30.0, 0.002);
    assert!(delays.iter().all(|delay| (*delay - 0.002).abs() <= 1e-12));
}

#[test]
fn prepare_emits_derived_values_between_state_changes() {
    let mut scheduler = PacingScheduler::new(0.001);
    let mut events = PlaybackEvents::new();
    scheduler
        .prepare(specimen(), &material(), &mut events)
        .expect("prepare");

    assert_eq!(events.len(), 4);
    assert_eq!(events[0], PlaybackEvent::StateChanged(GraphState::Preparing));
    match events[1] {
        PlaybackEvent::MaxForceCalculated(force) => assert_relative_eq!(force, 10.0),
        other => panic!("unexpected event: {other:?}"),
    }
    match events[2] {
        PlaybackEvent::KeyPointsCalculated(key_points) => {
            assert_relative_eq!(key_points.uts_strain_percent.expect("uts"), 5.0);
            assert_relative_eq!(
                key_points.rupture_strain_percent.expect("rupture"),
                9.25,
                epsilon = 1e-9
            );
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(events[3], PlaybackEvent::StateChanged(GraphState::Ready));

    let run = scheduler.prepared_run().expect("prepared run");
    assert_eq!(run.samples.len(), 4);
    assert_relative_eq!(run.max_strain_percent, 10.0);
    assert_eq!(run.material_name, "steel");
}

#[test]
fn prepare_without_curve_lands_in_error() {
    let mut material = material();
    material.curve = None;

    let mut scheduler = PacingScheduler::new(0.001);
    let mut events = PlaybackEvents::new();
    let err = scheduler
        .prepare(specimen(), &material, &mut events)
        .expect_err("missing curve");

    assert!(matches!(err, RigError::Configuration(_)));
    assert_eq!(scheduler.state(), GraphState::Error);
    assert_eq!(
        state_changes(&events),
        vec![GraphState::Preparing, GraphState::Error]
    );
    assert!(scheduler.prepared_run().is_none());
}

#[test]
fn prepare_with_malformed_curve_lands_in_error() {
    let material = MaterialProfile::new("broken", CurveSource::Text("0|0\nx|y".to_owned()));
    let mut scheduler = PacingScheduler::new(0.001);
    let mut events = PlaybackEvents::new();
    let err = scheduler
        .prepare(specimen(), &material, &mut events)
        .expect_err("malformed curve");

    assert!(matches!(err, RigError::Parse { line: 2, .. }));
    assert_eq!(scheduler.state(), GraphState::Error);

    // Error is recoverable through a fresh prepare.
    let mut events = PlaybackEvents::new();
    scheduler
        .prepare(specimen(), &self::material(), &mut events)
        .expect("prepare after error");
    assert_eq!(scheduler.state(), GraphState::Ready);
}

#[test]
fn prepare_rejects_invalid_specimen() {
    let specimen = SpecimenContext::new(50.0, 0.0, 30.0, SpeedMode::DeformationRate);
    let mut scheduler = PacingScheduler::new(0.001);
    let mut events = PlaybackEvents::new();
    let err = scheduler
        .prepare(specimen, &material(), &mut events)
        .expect_err("zero area");
    assert!(matches!(err, RigError::Configuration(_)));
    assert_eq!(scheduler.state(), GraphState::Error);
}

#[test]
fn samples_are_emitted_on_their_wake_times() {
    let mut scheduler = ready_scheduler();
    let mut events = PlaybackEvents::new();
    scheduler.start(0.0, &mut events).expect("start");
    assert_eq!(scheduler.state(), GraphState::Plotting);

    let mut events = PlaybackEvents::new();
    assert_eq!(scheduler.advance(0.0, &mut events), 1);
    assert_eq!(plotted_indices(&events), vec![0]);

    let mut events = PlaybackEvents::new();
    assert_eq!(scheduler.advance(0.0015, &mut events), 1);
    assert_eq!(scheduler.advance(4.9, &mut events), 0);
    assert_eq!(scheduler.advance(5.002, &mut events), 1);
    assert_eq!(plotted_indices(&events), vec![1, 2]);
    assert_eq!(scheduler.playback().current_index, 3);
    assert_relative_eq!(scheduler.playback().last_force_kn, 8.0);

    let mut events = PlaybackEvents::new();
    assert_eq!(scheduler.advance(7.002, &mut events), 1);
    assert_eq!(scheduler.state(), GraphState::Plotting);
    assert_relative_eq!(
        scheduler.next_wake_in(7.002).expect("wake pending"),
        2.999,
        epsilon = 1e-6
    );

    // The last sample's wait elapses before the run finishes.
    let mut events = PlaybackEvents::new();
    assert_eq!(scheduler.advance(10.0, &mut events), 0);
    assert_eq!(scheduler.state(), GraphState::Plotting);
    assert_eq!(scheduler.advance(10.002, &mut events), 0);
    assert_eq!(state_changes(&events), vec![GraphState::Finished]);
    assert!(scheduler.next_wake_in(10.002).is_none());
}

#[test]
fn late_advance_catches_up_in_order() {
    let mut scheduler = ready_scheduler();
    let mut events = PlaybackEvents::new();
    scheduler.start(0.0, &mut events).expect("start");

    let mut events = PlaybackEvents::new();
    assert_eq!(scheduler.advance(100.0, &mut events), 4);
    assert_eq!(plotted_indices(&events), vec![0, 1, 2, 3]);
    assert_eq!(events.last(), Some(&PlaybackEvent::StateChanged(GraphState::Finished)));
}

#[test]
fn pause_preserves_remaining_wait() {
    let mut scheduler = ready_scheduler();
    let mut events = PlaybackEvents::new();
    scheduler.start(0.0, &mut events).expect("start");
    scheduler.advance(0.0015, &mut events);
    assert_eq!(scheduler.playback().current_index, 2);

    scheduler.pause(2.0, &mut events).expect("pause");
    assert_eq!(scheduler.state(), GraphState::Paused);
    assert!(scheduler.next_wake_in(2.0).is_none());

    let mut events = PlaybackEvents::new();
    assert_eq!(scheduler.advance(50.0, &mut events), 0);
    assert!(events.is_empty());

    scheduler.resume(50.0, &mut events).expect("resume");
    assert_eq!(state_changes(&events), vec![GraphState::Plotting]);
    assert_relative_eq!(
        scheduler.next_wake_in(50.0).expect("wake pending"),
        3.001,
        epsilon = 1e-9
    );

    let mut events = PlaybackEvents::new();
    assert_eq!(scheduler.advance(52.9, &mut events), 0);
    assert_eq!(scheduler.advance(53.002, &mut events), 1);
    assert_eq!(plotted_indices(&events), vec![2]);
}

#[test]
fn start_while_paused_resumes() {
    let mut scheduler = ready_scheduler();
    let mut events = PlaybackEvents::new();
    scheduler.start(0.0, &mut events).expect("start");
    scheduler.pause(0.0, &mut events).expect("pause");
    scheduler.start(1.0, &mut events).expect("start resumes");
    assert_eq!(scheduler.state(), GraphState::Plotting);
    assert_eq!(scheduler.playback().current_index, 0);
}

#[test]
fn invalid_commands_leave_state_unchanged() {
    let mut scheduler = PacingScheduler::new(0.001);
    let mut events = PlaybackEvents::new();

    let err = scheduler.start(0.0, &mut events).expect_err("start from idle");
    assert!(matches!(
        err,
        RigError::InvalidCommand {
            command: "start",
            state: GraphState::Idle
        }
    ));
    assert!(scheduler.pause(0.0, &mut events).is_err());
    assert!(scheduler.resume(0.0, &mut events).is_err());
    assert!(events.is_empty());
    assert_eq!(scheduler.state(), GraphState::Idle);

    let mut scheduler = ready_scheduler();
    let mut events = PlaybackEvents::new();
    scheduler.start(0.0, &mut events).expect("start");
    let err = scheduler
        .prepare(specimen(), &material(), &mut events)
        .expect_err("prepare while plotting");
    assert!(matches!(
        err,
        RigError::InvalidCommand {
            command: "prepare",
            state: GraphState::Plotting
        }
    ));
    assert_eq!(scheduler.state(), GraphState::Plotting);
}

#[test]
fn reset_discards_run_from_any_state() {
    let mut scheduler = ready_scheduler();
    let mut events = PlaybackEvents::new();
    scheduler.start(0.0, &mut events).expect("start");
    scheduler.advance(1.0, &mut events);

    let mut events = PlaybackEvents::new();
    scheduler.reset(&mut events);
    assert_eq!(state_changes(&events), vec![GraphState::Idle]);
    assert!(scheduler.prepared_run().is_none());
    assert_eq!(scheduler.playback().current_index, 0);

    let mut events = PlaybackEvents::new();
    assert_eq!(scheduler.advance(100.0, &mut events), 0);
    assert!(events.is_empty());
}

#[test]
fn finished_run_can_be_prepared_again() {
    let mut scheduler = ready_scheduler();
    let mut events = PlaybackEvents::new();
    scheduler.start(0.0, &mut events).expect("start");
    scheduler.advance(100.0, &mut events);
    assert_eq!(scheduler.state(), GraphState::Finished);

    let mut events = PlaybackEvents::new();
    scheduler
        .prepare(specimen(), &material(), &mut events)
        .expect("prepare after finish");
    assert_eq!(scheduler.state(), GraphState::Ready);
    assert_eq!(scheduler.playback().current_index, 0);
}
