//! Property tests over random host interleavings of time and input

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use proptest::prelude::*;

use rhythm_strike::{Action, Outcome, Session, SessionStatus, Settings, Tuning};

#[derive(Debug, Clone)]
enum Op {
    Advance(u64),
    Press(usize),
    Stop,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (1u64..400).prop_map(Op::Advance),
        4 => (0usize..4).prop_map(Op::Press),
        1 => Just(Op::Stop),
    ]
}

struct Run {
    session: Session,
    rewards: Rc<Cell<u32>>,
    outcomes: Vec<Outcome>,
    max_lives_seen: u8,
}

fn run(seed: u64, ops: &[Op]) -> Run {
    let rewards = Rc::new(Cell::new(0));
    let counter = Rc::clone(&rewards);
    let mut session = Session::open(Tuning::default(), Settings::default(), seed, move |_| {
        counter.set(counter.get() + 1)
    })
    .unwrap();
    session.start().unwrap();

    let mut outcomes = Vec::new();
    let mut max_lives_seen = session.state().lives;
    for op in ops {
        match op {
            Op::Advance(dt) => outcomes.extend(session.advance(*dt)),
            Op::Press(i) => outcomes.extend(session.resolve(Action::ALL[*i]).outcomes().to_vec()),
            Op::Stop => session.stop(),
        }
        max_lives_seen = max_lives_seen.max(session.state().lives);
    }
    Run {
        session,
        rewards,
        outcomes,
        max_lives_seen,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_lives_stay_in_bounds(seed in any::<u64>(), ops in prop::collection::vec(op_strategy(), 0..120)) {
        let run = run(seed, &ops);
        prop_assert!(run.max_lives_seen <= 5);
        prop_assert!(run.session.state().lives <= 5);
    }

    #[test]
    fn prop_each_target_removed_exactly_once(seed in any::<u64>(), ops in prop::collection::vec(op_strategy(), 0..120)) {
        let run = run(seed, &ops);

        let spawned: HashSet<u32> = run
            .outcomes
            .iter()
            .filter_map(|o| match o {
                Outcome::Spawned { id, .. } => Some(*id),
                _ => None,
            })
            .collect();

        let mut removals: HashMap<u32, usize> = HashMap::new();
        for id in run.outcomes.iter().filter_map(Outcome::removed_target) {
            *removals.entry(id).or_default() += 1;
        }

        for (id, count) in &removals {
            prop_assert_eq!(*count, 1, "target {} removed {} times", id, count);
            prop_assert!(spawned.contains(id));
            prop_assert!(!run.session.targets().contains(*id));
        }
        for id in &spawned {
            let removed = removals.contains_key(id);
            let present = run.session.targets().contains(*id);
            // Stopping leaves the set frozen, so a spawned target is either
            // still there or removed, never both and never lost
            prop_assert!(removed ^ present, "target {} removed={} present={}", id, removed, present);
        }
    }

    #[test]
    fn prop_reward_paid_at_most_once(seed in any::<u64>(), ops in prop::collection::vec(op_strategy(), 0..120)) {
        let run = run(seed, &ops);
        let paid = run.rewards.get();
        prop_assert!(paid <= 1);
        if paid == 1 {
            prop_assert_eq!(run.session.status(), SessionStatus::GameOver);
            prop_assert!(run.session.state().reward.is_some());
        }
    }

    #[test]
    fn prop_score_and_hits_never_decrease(seed in any::<u64>(), ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut session = Session::open(Tuning::default(), Settings::default(), seed, |_| {}).unwrap();
        session.start().unwrap();

        let mut last = (0u64, 0u32);
        for op in &ops {
            match op {
                Op::Advance(dt) => { session.advance(*dt); }
                Op::Press(i) => { session.resolve(Action::ALL[*i]); }
                Op::Stop => session.stop(),
            }
            let now = (session.state().score, session.state().hit_count);
            prop_assert!(now.0 >= last.0 && now.1 >= last.1);
            last = now;
        }
    }

    #[test]
    fn prop_same_seed_replays_exactly(seed in any::<u64>(), ops in prop::collection::vec(op_strategy(), 0..60)) {
        let a = run(seed, &ops);
        let b = run(seed, &ops);
        prop_assert_eq!(a.outcomes, b.outcomes);
        prop_assert_eq!(a.session.state(), b.session.state());
    }
}
