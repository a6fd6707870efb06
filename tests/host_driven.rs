//! Drive the engine the way an embedding visualizer would: through the
//! public API only, with host-owned output, input and notify hook.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use bf::{
    Action, BracketStrategy, CellRange, Engine, EngineOptions, InputQueue, OutputLog, Status,
    StepOutcome,
};

#[test]
fn timer_driven_host_sees_every_step() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();

    let mut vm = Engine::new("++[>+<-]");
    vm.set_notify(move |obs| log.borrow_mut().push((obs.status, obs.ip, obs.tape.position())));

    assert_eq!(vm.start(), Status::Running);
    let mut ticks = 0;
    while vm.tick() == Status::Running {
        ticks += 1;
        assert!(ticks < 1_000, "program should finish");
    }

    assert_eq!(vm.status(), Status::Complete);
    assert_eq!(vm.tape().cell_at(1), 2);
    let seen = seen.borrow();
    assert_eq!(seen.len() as u64, vm.steps_executed());
    assert_eq!(seen.last(), Some(&(Status::Complete, 8, 0)));
    assert!(seen[..seen.len() - 1].iter().all(|(s, _, _)| *s == Status::Running));
}

#[test]
fn ticked_host_resumes_after_pushing_input() {
    let mut vm = Engine::new(",.");
    vm.start();
    assert_eq!(vm.tick(), Status::Waiting);
    assert_eq!(vm.cursor().position(), 0);

    vm.input_mut().push(5);
    assert_eq!(vm.tick(), Status::Running);
    assert_eq!(vm.cursor().position(), 1);
    assert_eq!(vm.tick(), Status::Complete);
    assert_eq!(vm.output().values(), &[5]);
}

#[test]
fn waiting_program_resumes_when_input_arrives() {
    let mut vm = Engine::new(",[.,]");
    assert_eq!(vm.run(), Status::Waiting);
    assert_eq!(vm.cursor().position(), 0);
    assert_eq!(vm.last_action(), Some(Action::AwaitInput));

    vm.input_mut().push_text("ab");
    assert_eq!(vm.run(), Status::Waiting);
    assert_eq!(vm.output().to_text(), "ab");
    assert_eq!(vm.cursor().position(), 3);

    vm.input_mut().push(0);
    assert_eq!(vm.run(), Status::Complete);
    assert_eq!(vm.output().values(), &[97, 98]);
}

#[test]
fn pause_and_resume_keep_state() {
    let mut vm = Engine::new("+++++.");
    vm.start();
    vm.tick();
    vm.tick();
    vm.pause();
    assert_eq!(vm.status(), Status::Paused);
    assert_eq!(vm.tick(), Status::Paused);
    assert_eq!(vm.tape().read(), 2);

    assert_eq!(vm.run(), Status::Complete);
    assert_eq!(vm.output().values(), &[5]);

    // Starting a finished program begins again from a blank tape.
    assert_eq!(vm.run(), Status::Complete);
    assert_eq!(vm.output().values(), &[5, 5]);
}

#[test]
fn closures_serve_as_sink_and_provider() {
    let printed = Rc::new(RefCell::new(String::new()));
    let out = printed.clone();
    let mut feed: VecDeque<i64> = "hi".chars().map(|c| c as i64).collect();

    let mut vm = Engine::with_host(
        ",+.,+.",
        EngineOptions::default(),
        move |v: i64| out.borrow_mut().push(char::from_u32(v as u32).unwrap_or('?')),
        move || feed.pop_front(),
    );
    assert_eq!(vm.run(), Status::Complete);
    assert_eq!(printed.borrow().as_str(), "ij");
}

#[test]
fn wide_signed_cells_and_table_brackets() {
    let options = EngineOptions {
        range: CellRange::new(16, true).unwrap(),
        brackets: BracketStrategy::Table,
    };
    let mut vm: Engine<OutputLog, InputQueue> = Engine::with_options("-.[+]", options);
    assert_eq!(vm.run_steps(3), Status::Paused);
    assert_eq!(vm.output().values(), &[-1]);
    assert_eq!(vm.run(), Status::Complete);
    assert_eq!(vm.tape().read(), 0);
}

#[test]
fn single_step_pauses_between_instructions() {
    let mut vm = Engine::new("+,");
    assert_eq!(vm.step_and_pause(), StepOutcome::Continue);
    assert_eq!(vm.status(), Status::Paused);
    assert_eq!(vm.step_and_pause(), StepOutcome::AwaitInput);
    assert_eq!(vm.status(), Status::Waiting);
    vm.input_mut().push(7);
    assert_eq!(vm.step_and_pause(), StepOutcome::Continue);
    assert_eq!(vm.status(), Status::Complete);
    assert_eq!(vm.tape().read(), 7);
}
