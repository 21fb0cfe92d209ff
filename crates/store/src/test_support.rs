use std::sync::Arc;

use sorta_primitives::{ChangeSet, ChangeSink, Comparator, Entry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Item {
	pub id: u32,
	pub key: u32,
	pub body: u32,
}

pub(crate) fn item(id: u32, key: u32) -> Item {
	Item { id, key, body: 0 }
}

impl Entry for Item {
	fn same_identity(&self, other: &Self) -> bool {
		self.id == other.id
	}

	fn same_content(&self, other: &Self) -> bool {
		self.key == other.key && self.body == other.body
	}
}

pub(crate) fn by_key() -> Comparator<Item> {
	Arc::new(|a: &Item, b: &Item| a.key.cmp(&b.key).then(a.id.cmp(&b.id)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
	Old(Item),
	Changed(u32),
	New,
}

struct Replay(Vec<Slot>);

impl ChangeSink for Replay {
	fn moved(&mut self, from: usize, to: usize) {
		let slot = self.0.remove(from);
		self.0.insert(to, slot);
	}

	fn inserted(&mut self, at: usize, count: usize) {
		self.0.splice(at..at, std::iter::repeat_n(Slot::New, count));
	}

	fn removed(&mut self, at: usize, count: usize) {
		self.0.drain(at..at + count);
	}

	fn changed(&mut self, at: usize, count: usize) {
		for slot in &mut self.0[at..at + count] {
			if let Slot::Old(old) = slot {
				*slot = Slot::Changed(old.id);
			}
		}
	}
}

/// Replays `cs` over `old` and checks that the result lines up with `new`.
pub(crate) fn assert_replays(old: &[Item], cs: &ChangeSet, new: &[Item]) {
	let mut replay = Replay(old.iter().cloned().map(Slot::Old).collect());
	cs.apply_to(&mut replay);
	assert_eq!(replay.0.len(), new.len(), "length mismatch after {cs:?}");
	for (i, (slot, item)) in replay.0.iter().zip(new).enumerate() {
		match slot {
			Slot::Old(old) => {
				assert!(old.same_identity(item), "slot {i} holds {old:?}, expected {item:?} after {cs:?}");
				assert!(old.same_content(item), "slot {i} changed without a change op after {cs:?}");
			}
			Slot::Changed(id) => assert_eq!(*id, item.id, "slot {i} after {cs:?}"),
			Slot::New => {}
		}
	}
}
