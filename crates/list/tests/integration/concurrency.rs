use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use sorta_list::{BatchPolicy, ListConfig};
use sorta_primitives::{Comparator, Operation};

use crate::common::{Contact, Event, Gate, Mode, by_rank, contact, gated, list, settle};

#[test]
fn producers_commit_in_order_and_runs_never_overlap() {
	const PRODUCERS: u32 = 4;
	const COMMITS: u32 = 50;

	let (list, mut runner, recorder) = list(by_rank(), ListConfig::default(), Mode::Advance);
	let producers: Vec<_> = (0..PRODUCERS)
		.map(|p| {
			let list = list.clone();
			thread::spawn(move || {
				let mut editor = list.edit();
				for step in 0..COMMITS {
					editor.add(contact(p, step * PRODUCERS + p, "row")).commit();
				}
			})
		})
		.collect();

	while producers.iter().any(|handle| !handle.is_finished()) {
		runner.run_pending();
		thread::yield_now();
	}
	for handle in producers {
		handle.join().unwrap();
	}
	settle(&list, &mut runner);

	recorder.assert_well_formed();
	assert_eq!(recorder.change_sets().len(), (PRODUCERS * COMMITS) as usize);
	let ranks: Vec<_> = list.snapshot().iter().map(|c| (c.id, c.rank)).collect();
	let expected: Vec<_> = (0..PRODUCERS).map(|p| (p, (COMMITS - 1) * PRODUCERS + p)).collect();
	assert_eq!(ranks, expected);
	assert_eq!(recorder.shown(), list.snapshot().as_slice());
}

#[test]
fn coalesce_policy_folds_queued_commits_into_one_change_set() {
	let gate = Arc::new(Gate::default());
	let config = ListConfig {
		batch: BatchPolicy::Coalesce { max_transactions: 8 },
		..ListConfig::default()
	};
	let (list, mut runner, recorder) = list(gated(&gate), config, Mode::Advance);

	list.edit().add(contact(1, 10, "A")).commit();
	settle(&list, &mut runner);

	gate.close();
	list.edit().add(contact(2, 20, "B")).commit();
	gate.wait_entered();
	list.edit().add(contact(3, 30, "C")).commit();
	list.edit().add(contact(4, 40, "D")).commit();
	list.edit().add(contact(5, 5, "E")).commit();
	assert_eq!(list.pending(), 3);
	gate.open();
	settle(&list, &mut runner);

	let sets = recorder.change_sets();
	assert_eq!(sets.len(), 3);
	assert_eq!(sets[1].operations(), &[Operation::Insert { at: 1, count: 1 }]);
	assert_eq!(
		sets[2].operations(),
		&[Operation::Insert { at: 2, count: 2 }, Operation::Insert { at: 0, count: 1 }]
	);
	assert_eq!(list.len(), 5);
	recorder.assert_well_formed();
}

#[test]
fn comparator_panic_is_contained_and_list_keeps_working() {
	let cmp = by_rank();
	let poisoned: Comparator<Contact> = Arc::new(move |a: &Contact, b: &Contact| {
		if a.name == "boom" || b.name == "boom" {
			panic!("comparator exploded");
		}
		cmp(a, b)
	});
	let (list, mut runner, recorder) = list(poisoned, ListConfig::default(), Mode::Advance);

	list.edit().add(contact(1, 1, "A")).commit();
	list.edit().add(contact(2, 2, "boom")).commit();
	list.edit().add(contact(3, 3, "C")).commit();
	settle(&list, &mut runner);

	assert!(!list.is_running());
	assert_eq!(list.snapshot().iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 3]);
	assert_eq!(recorder.change_sets().len(), 2);
	let events = recorder.events();
	assert_eq!(events.first(), Some(&Event::Started));
	assert_eq!(events.last(), Some(&Event::Finished));
	recorder.assert_well_formed();
}
