//! Placement policy: uniform random sampling without replacement from
//! the currently-alive endpoint set.

use rand::seq::SliceRandom;
use rand::thread_rng;

/// Sample `r` distinct endpoints from `alive`, uniformly and without
/// replacement. Each call to `sample` is independent: two calls for two
/// different blocks of the same upload may (and usually will) draw
/// different sets.
pub fn sample(alive: &[String], r: usize) -> Vec<String> {
	let mut rng = thread_rng();
	let mut pool: Vec<String> = alive.to_vec();
	pool.shuffle(&mut rng);
	pool.truncate(r);
	pool
}

/// Pick one endpoint uniformly at random from `candidates`, or `None` if
/// `candidates` is empty.
pub fn pick_one(candidates: &[String]) -> Option<String> {
	candidates.choose(&mut thread_rng()).cloned()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn sample_is_distinct_and_sized() {
		let alive: Vec<String> = (0..10).map(|i| format!("n{}", i)).collect();
		for _ in 0..50 {
			let s = sample(&alive, 3);
			assert_eq!(s.len(), 3);
			let unique: std::collections::HashSet<_> = s.iter().collect();
			assert_eq!(unique.len(), 3);
			for e in &s {
				assert!(alive.contains(e));
			}
		}
	}

	#[test]
	fn sample_more_than_available_truncates() {
		let alive: Vec<String> = vec!["a".into(), "b".into()];
		let s = sample(&alive, 5);
		assert_eq!(s.len(), 2);
	}
}
