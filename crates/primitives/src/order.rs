use std::cmp::Ordering;
use std::sync::Arc;

/// Shared total-order comparator over list items.
///
/// Fixed for the lifetime of a list; changing the order means building a new
/// list.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

type Applies<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;
type Compare<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// One ordering rule: a pair predicate plus the order it imposes.
pub struct OrderRule<T> {
	label: &'static str,
	applies: Applies<T>,
	compare: Compare<T>,
}

impl<T> OrderRule<T> {
	/// Creates a rule from an applicability predicate and an ordering.
	pub fn new(
		label: &'static str,
		applies: impl Fn(&T, &T) -> bool + Send + Sync + 'static,
		compare: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static,
	) -> Self {
		Self {
			label,
			applies: Box::new(applies),
			compare: Box::new(compare),
		}
	}

	/// Returns true if this rule decides the order of `a` and `b`.
	pub fn applies(&self, a: &T, b: &T) -> bool {
		(self.applies)(a, b)
	}

	/// Orders `a` relative to `b`.
	pub fn compare(&self, a: &T, b: &T) -> Ordering {
		(self.compare)(a, b)
	}
}

impl<T> std::fmt::Debug for OrderRule<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("OrderRule").field("label", &self.label).finish_non_exhaustive()
	}
}

/// Composes a comparator from a short-circuiting list of [`OrderRule`]s.
///
/// Rules are tried in insertion order; the first applicable rule decides.
/// Pairs no rule applies to compare as [`Ordering::Equal`].
///
/// ```
/// use std::cmp::Ordering;
/// use sorta_primitives::OrderBuilder;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// enum Kind { Header, Row }
///
/// let cmp = OrderBuilder::<(Kind, u32)>::new()
/// 	.general_order(|item| item.0, [Kind::Header, Kind::Row])
/// 	.model_order(|item| item.0, Kind::Row, |a, b| a.1.cmp(&b.1))
/// 	.build();
///
/// assert_eq!(cmp(&(Kind::Header, 9), &(Kind::Row, 1)), Ordering::Less);
/// assert_eq!(cmp(&(Kind::Row, 2), &(Kind::Row, 1)), Ordering::Greater);
/// assert_eq!(cmp(&(Kind::Header, 2), &(Kind::Header, 1)), Ordering::Equal);
/// ```
pub struct OrderBuilder<T> {
	rules: Vec<OrderRule<T>>,
}

impl<T> Default for OrderBuilder<T> {
	fn default() -> Self {
		Self { rules: Vec::new() }
	}
}

impl<T: 'static> OrderBuilder<T> {
	/// Creates a builder with no rules.
	pub fn new() -> Self {
		Self::default()
	}

	/// Orders items of different kinds by the position of their kind in `kinds`.
	///
	/// Applies only to pairs whose kinds differ and are both listed. Fewer than
	/// two kinds cannot order anything, so the rule is skipped.
	pub fn general_order<K, F>(mut self, kind_of: F, kinds: impl IntoIterator<Item = K>) -> Self
	where
		K: PartialEq + Send + Sync + 'static,
		F: Fn(&T) -> K + Send + Sync + 'static,
	{
		let kinds: Vec<K> = kinds.into_iter().collect();
		if kinds.len() < 2 {
			return self;
		}

		let kinds = Arc::new(kinds);
		let kind_of = Arc::new(kind_of);
		let (k1, f1) = (Arc::clone(&kinds), Arc::clone(&kind_of));
		self.rules.push(OrderRule::new(
			"general",
			move |a, b| {
				let (ka, kb) = (f1(a), f1(b));
				ka != kb && k1.contains(&ka) && k1.contains(&kb)
			},
			move |a, b| {
				let rank = |item: &T| {
					let kind = kind_of(item);
					kinds.iter().position(|k| *k == kind)
				};
				rank(a).cmp(&rank(b))
			},
		));
		self
	}

	/// Orders two items of `kind` with `cmp`.
	pub fn model_order<K, F, C>(mut self, kind_of: F, kind: K, cmp: C) -> Self
	where
		K: PartialEq + Send + Sync + 'static,
		F: Fn(&T) -> K + Send + Sync + 'static,
		C: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
	{
		self.rules
			.push(OrderRule::new("model", move |a, b| kind_of(a) == kind && kind_of(b) == kind, cmp));
		self
	}

	/// Appends an arbitrary rule.
	pub fn rule(mut self, rule: OrderRule<T>) -> Self {
		self.rules.push(rule);
		self
	}

	/// Returns the number of rules.
	pub fn len(&self) -> usize {
		self.rules.len()
	}

	/// Returns true if no rules were added.
	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// Builds the composed comparator.
	pub fn build(self) -> Comparator<T>
	where
		T: Send + Sync,
	{
		let rules = self.rules;
		Arc::new(move |a: &T, b: &T| {
			rules
				.iter()
				.find(|rule| rule.applies(a, b))
				.map_or(Ordering::Equal, |rule| rule.compare(a, b))
		})
	}
}
