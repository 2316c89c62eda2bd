use std::cell::RefCell;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use colony_ai::builder::{always, goto, when_goto};
use colony_ai::{
    AiState, CitizenStatus, DesiredActivity, FaultReport, FaultStage, HostTask, Job,
    SchedulerConfig, Target, TargetFault, TargetScheduler, TaskSet, TickOutcome, Transition,
    Worker, WorkerAi,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("colony_ai=debug")
        .with_test_writer()
        .try_init();
}

/// Context that records which targets ran.
#[derive(Default)]
struct Trace {
    ran: Vec<&'static str>,
}

fn mark(label: &'static str, result: Transition) -> impl FnMut(&mut Trace) -> Transition {
    move |trace| {
        trace.ran.push(label);
        result
    }
}

/// Blocking target hands over to a state-local target, then disappears.
///
/// T1(AI_BLOCKING_PRIO, true -> X, unregister) and T2(X, true -> Y):
/// tick 1 fires T1 and removes it, tick 2 fires T2.
#[test]
fn blocking_target_hands_over_to_state_tier() {
    init_logging();
    let mut scheduler = TargetScheduler::new();
    let ids = scheduler.register_targets([
        always(AiState::AiBlockingPrio, mark("t1", AiState::Prepare.into()))
            .unregister_after_transition(),
        always(AiState::Prepare, mark("t2", AiState::Gathering.into())),
    ]);

    let mut trace = Trace::default();

    let first = scheduler.tick(&mut trace);
    assert_eq!(
        first,
        TickOutcome::Transitioned {
            target: ids[0],
            from: AiState::Init,
            to: AiState::Prepare
        }
    );
    assert!(scheduler.registry().tier(AiState::AiBlockingPrio).is_empty());

    let second = scheduler.tick(&mut trace);
    assert_eq!(second.new_state(), Some(AiState::Gathering));
    assert_eq!(trace.ran, vec!["t1", "t2"]);
}

/// T3(EVENT, predicate faults) then T4(EVENT, true -> Z): the fault is
/// absorbed and T4 fires in the same tick.
#[test]
fn faulting_event_predicate_does_not_block_next_event() {
    let faults = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&faults);

    let mut scheduler = TargetScheduler::new();
    scheduler.set_fault_handler(move |report: &FaultReport<'_>| {
        sink.borrow_mut().push((report.name.to_string(), report.stage));
    });
    scheduler.register_targets([
        Target::new(AiState::Event, |_: &mut Trace| Ok(AiState::Dump.into()))
            .with_predicate(|_| Err(TargetFault::failed("entity despawned")))
            .named("t3"),
        always(AiState::Event, mark("t4", AiState::Deliver.into())).named("t4"),
    ]);

    let mut trace = Trace::default();
    let outcome = scheduler.tick(&mut trace);

    assert_eq!(outcome.new_state(), Some(AiState::Deliver));
    assert_eq!(trace.ran, vec!["t4"]);
    assert_eq!(*faults.borrow(), vec![("t3".to_string(), FaultStage::Predicate)]);
}

#[test]
fn blocking_tier_wins_even_when_registered_last() {
    let mut scheduler = TargetScheduler::new();
    scheduler.register_targets([
        always(AiState::Init, mark("state", AiState::Decide.into())),
        always(AiState::StateBlockingPrio, mark("state-blocking", AiState::Paused.into())),
        always(AiState::Event, mark("event", AiState::Deliver.into())),
        always(AiState::AiBlockingPrio, mark("ai-blocking", AiState::Eating.into())),
    ]);

    let mut trace = Trace::default();
    scheduler.tick(&mut trace);

    assert_eq!(scheduler.state(), AiState::Eating);
    assert_eq!(trace.ran, vec!["ai-blocking"]);
}

#[test]
fn event_preempts_state_blocking_tier() {
    let mut scheduler = TargetScheduler::new();
    scheduler.register_targets([
        always(AiState::StateBlockingPrio, mark("state-blocking", AiState::Paused.into())),
        always(AiState::Event, mark("event", AiState::Deliver.into())),
    ]);

    let mut trace = Trace::default();
    scheduler.tick(&mut trace);

    assert_eq!(scheduler.state(), AiState::Deliver);
    assert_eq!(trace.ran, vec!["event"]);
}

#[test]
fn action_fault_never_changes_state() {
    init_logging();
    let mut scheduler = TargetScheduler::new();
    scheduler.register_targets([
        goto(AiState::Init, AiState::Mining),
        Target::new(AiState::Mining, |_: &mut Trace| {
            Err(TargetFault::failed("pickaxe broke"))
        })
        .named("mine"),
    ]);

    let mut trace = Trace::default();
    scheduler.tick(&mut trace);
    for _ in 0..3 {
        assert_eq!(scheduler.tick(&mut trace), TickOutcome::Unchanged);
        assert_eq!(scheduler.state(), AiState::Mining);
    }

    let snapshot = scheduler.metrics().snapshot();
    assert_eq!(snapshot.action_faults, 3);
    assert_eq!(snapshot.transitions, 1);
}

/// Log output captured from a scoped subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn each_action_fault_is_logged_once_with_its_target() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut scheduler = TargetScheduler::new();
        scheduler.register_targets([
            Target::new(AiState::Init, |_: &mut Trace| Ok(Transition::None))
                .with_predicate(|_| Err(TargetFault::failed("stale entity")))
                .named("lookout"),
            Target::new(AiState::Init, |_: &mut Trace| {
                Err(TargetFault::failed("pickaxe broke"))
            })
            .named("miner"),
        ]);

        let mut trace = Trace::default();
        for _ in 0..3 {
            assert_eq!(scheduler.tick(&mut trace), TickOutcome::Unchanged);
        }
        assert_eq!(scheduler.metrics().snapshot().predicate_faults, 3);
    });

    let lines = logs.lines();
    let warnings: Vec<&String> = lines
        .iter()
        .filter(|line| line.contains("Action for target failed"))
        .collect();
    assert_eq!(warnings.len(), 3);
    assert!(warnings.iter().all(|line| {
        line.contains("WARN") && line.contains("miner") && line.contains("pickaxe broke")
    }));
    assert!(
        lines
            .iter()
            .all(|line| !line.contains("lookout") && !line.contains("stale entity"))
    );
}

#[test]
fn tick_never_unwinds_into_the_host() {
    let mut scheduler = TargetScheduler::new();
    scheduler.register_targets([
        Target::new(AiState::Init, |_: &mut Trace| Ok(AiState::Dump.into()))
            .with_predicate(|_| panic!("entity reference was null"))
            .named("null-deref"),
        Target::new(AiState::Init, |_: &mut Trace| -> Result<Transition, TargetFault> {
            panic!("slot index out of range")
        })
        .named("out-of-bounds"),
    ]);

    let mut trace = Trace::default();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| scheduler.tick(&mut trace)));

    assert_eq!(outcome.ok(), Some(TickOutcome::Unchanged));
    assert_eq!(scheduler.state(), AiState::Init);
    let snapshot = scheduler.metrics().snapshot();
    assert_eq!(snapshot.predicate_faults, 1);
    assert_eq!(snapshot.action_faults, 1);
}

#[test]
fn non_unregistering_target_is_eligible_every_tick() {
    let mut scheduler = TargetScheduler::new();
    let ids = scheduler.register_targets([always(
        AiState::Event,
        mark("heartbeat", AiState::Idle.into()),
    )]);

    let mut trace = Trace::default();
    for _ in 0..3 {
        scheduler.tick(&mut trace);
    }

    assert_eq!(trace.ran, vec!["heartbeat"; 3]);
    assert_eq!(scheduler.registry().tier(AiState::Event), &[ids[0]]);
}

#[test]
fn manual_unregister_is_a_no_op_when_absent() {
    let mut scheduler = TargetScheduler::<Trace>::new();
    let id = scheduler.register_target(goto(AiState::Init, AiState::Decide).named("once"));

    let removed = scheduler.unregister_target(id).expect("registered");
    assert_eq!(removed.name(), "once");
    assert!(scheduler.unregister_target(id).is_none());

    let mut trace = Trace::default();
    assert_eq!(scheduler.tick(&mut trace), TickOutcome::Unchanged);
}

#[derive(Default)]
struct Citizen {
    activity: DesiredActivity,
    status: CitizenStatus,
    hunger: u32,
}

#[derive(Clone, Default)]
struct CitizenRef(Rc<RefCell<Citizen>>);

impl Worker for CitizenRef {
    fn desired_activity(&self) -> DesiredActivity {
        self.0.borrow().activity
    }

    fn set_status(&mut self, status: CitizenStatus) {
        self.0.borrow_mut().status = status;
    }
}

struct Fisherman {
    citizen: CitizenRef,
    catches: u32,
}

impl Job for Fisherman {
    type Worker = CitizenRef;

    fn name(&self) -> &str {
        "fisherman"
    }

    fn citizen_entity(&self) -> Option<CitizenRef> {
        Some(self.citizen.clone())
    }
}

fn fisherman_ai(citizen: &CitizenRef) -> WorkerAi<Fisherman> {
    let job = Fisherman {
        citizen: citizen.clone(),
        catches: 0,
    };
    let mut ai = WorkerAi::with_config(job, SchedulerConfig::default()).expect("citizen alive");
    ai.register_targets([
        Target::new(AiState::AiBlockingPrio, |job: &mut Fisherman| {
            job.citizen.0.borrow_mut().hunger = 0;
            Ok(AiState::Idle.into())
        })
        .with_predicate(|job: &Fisherman| Ok(job.citizen.0.borrow().hunger > 5))
        .named("eat"),
        goto(AiState::Init, AiState::Idle),
        when_goto(AiState::Idle, |job: &Fisherman| job.catches < 100, AiState::Fishing)
            .with_okay_to_eat(true),
        Target::new(AiState::Fishing, |job: &mut Fisherman| {
            job.catches += 1;
            job.citizen.0.borrow_mut().hunger += 1;
            Ok(Transition::None)
        })
        .named("fish"),
    ]);
    ai
}

#[test]
fn worker_ai_runs_under_host_task_set() {
    let citizen = CitizenRef::default();
    let mut tasks = TaskSet::new();
    let handle = tasks.add_task(3, fisherman_ai(&citizen));

    // Not asked to work yet
    tasks.tick();
    assert!(!tasks.is_running(handle));
    assert_eq!(tasks.get(handle).unwrap().state(), AiState::Init);

    citizen.0.borrow_mut().activity = DesiredActivity::Work;
    tasks.tick();
    assert!(tasks.is_running(handle));
    assert_eq!(citizen.0.borrow().status, CitizenStatus::Working);
    assert_eq!(tasks.get(handle).unwrap().state(), AiState::Idle);

    for _ in 0..10 {
        tasks.tick();
    }
    let ai = tasks.get(handle).unwrap();
    assert!(ai.job().catches > 0);
    assert!(citizen.0.borrow().hunger <= 6);

    citizen.0.borrow_mut().activity = DesiredActivity::Sleep;
    tasks.tick();
    assert!(!tasks.is_running(handle));
    assert_eq!(citizen.0.borrow().status, CitizenStatus::Idle);
}

#[test]
fn reset_to_idle_interrupts_multi_tick_behavior() {
    let citizen = CitizenRef::default();
    let mut ai = fisherman_ai(&citizen);

    ai.update_task();
    ai.update_task();
    assert_eq!(ai.state(), AiState::Fishing);
    assert!(!ai.is_okay_to_eat());

    ai.reset_ai_to_idle();
    assert_eq!(ai.state(), AiState::Idle);
    assert!(ai.is_okay_to_eat());
    assert_eq!(ai.metrics().snapshot().resets, 1);
}
