use pretty_assertions::assert_eq;
use sorta_list::ListConfig;
use sorta_primitives::{Error, Operation};

use crate::common::{Mode, by_rank, contact, list, settle};

#[test]
fn fresh_list_reads_as_empty() {
	let (list, _runner, _) = list(by_rank(), ListConfig::default(), Mode::Advance);

	assert_eq!(list.len(), 0);
	assert!(list.is_empty());
	assert!(list.snapshot().is_empty());
	assert_eq!(list.get(0), Err(Error::OutOfRange { position: 0, len: 0 }));
	assert!(!list.is_running());
}

#[test]
fn reads_stay_on_old_snapshot_until_consumer_advances() {
	let (list, mut runner, recorder) = list(by_rank(), ListConfig::default(), Mode::Hold);
	let (a, b) = (contact(1, 1, "A"), contact(2, 2, "B"));

	list.edit().add(a.clone()).commit();
	list.edit().add(b.clone()).commit();
	settle(&list, &mut runner);

	assert_eq!(list.backlog_len(), 2);
	assert_eq!(list.len(), 0);

	let (first, advance) = recorder.take_held();
	assert_eq!(first.operations(), &[Operation::Insert { at: 0, count: 1 }]);
	let state = advance.advance();
	assert_eq!(state.as_slice(), &[a.clone()]);
	assert_eq!(list.len(), 1);
	assert_eq!(list.get(1), Err(Error::OutOfRange { position: 1, len: 1 }));

	let (second, advance) = recorder.take_held();
	assert_eq!(second.operations(), &[Operation::Insert { at: 1, count: 1 }]);
	let _ = advance.advance();
	assert_eq!(list.snapshot().as_slice(), &[a, b]);
	assert_eq!(list.backlog_len(), 0);
}

#[test]
fn dropped_advance_still_makes_snapshot_visible() {
	let (list, mut runner, recorder) = list(by_rank(), ListConfig::default(), Mode::Drop);
	list.edit().add(contact(1, 1, "A")).commit();
	list.edit().add(contact(2, 2, "B")).commit();
	settle(&list, &mut runner);

	assert_eq!(recorder.change_sets().len(), 2);
	assert_eq!(list.backlog_len(), 0);
	assert_eq!(list.len(), 2);
	recorder.assert_well_formed();
}

#[test]
fn held_snapshot_survives_later_commits() {
	let (list, mut runner, _) = list(by_rank(), ListConfig::default(), Mode::Advance);
	list.edit().add(contact(1, 1, "A")).commit();
	settle(&list, &mut runner);
	let held = list.snapshot();

	list.edit().clear().commit();
	settle(&list, &mut runner);

	assert_eq!(held.len(), 1);
	assert!(list.is_empty());
}
