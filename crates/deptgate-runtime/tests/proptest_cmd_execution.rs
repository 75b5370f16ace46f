//! Property tests for command execution order in the simulator.

use deptgate_core::event::Event;
use deptgate_render::frame::Frame;
use deptgate_runtime::{Cmd, Model, ProgramSimulator};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Push(u8),
    Quit,
}

#[derive(Debug)]
enum Msg {
    Run(Vec<Step>),
    Push(u8),
    Ignored,
}

impl From<Event> for Msg {
    fn from(_: Event) -> Self {
        Msg::Ignored
    }
}

#[derive(Default)]
struct Recorder {
    seen: Vec<u8>,
}

impl Model for Recorder {
    type Message = Msg;

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Run(steps) => Cmd::sequence(
                steps
                    .into_iter()
                    .map(|s| match s {
                        Step::Push(v) => Cmd::task(move || Msg::Push(v)),
                        Step::Quit => Cmd::quit(),
                    })
                    .collect(),
            ),
            Msg::Push(v) => {
                self.seen.push(v);
                Cmd::none()
            }
            Msg::Ignored => Cmd::none(),
        }
    }

    fn view(&self, _frame: &mut Frame) {}
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![4 => any::<u8>().prop_map(Step::Push), 1 => Just(Step::Quit)]
}

proptest! {
    #[test]
    fn effects_stop_at_first_quit(steps in proptest::collection::vec(step(), 0..20)) {
        let expected: Vec<u8> = steps
            .iter()
            .take_while(|s| !matches!(s, Step::Quit))
            .filter_map(|s| match s {
                Step::Push(v) => Some(*v),
                Step::Quit => None,
            })
            .collect();
        let quits = steps.iter().any(|s| matches!(s, Step::Quit));

        let mut sim = ProgramSimulator::new(Recorder::default());
        sim.init();
        sim.send(Msg::Run(steps));

        prop_assert_eq!(&sim.model().seen, &expected);
        prop_assert_eq!(sim.is_running(), !quits);
    }
}
