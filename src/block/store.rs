//! Local, per-block disk store.
//!
//! One file per block at `<storage_root>/<sanitized_block_id>.blk`,
//! written whole — there is no append or partial-write interface. The
//! node is stateless beyond this directory; restart rebuilds nothing in
//! memory, each operation just touches disk directly.

use std::path::PathBuf;

use tokio::fs;
use tokio::io::AsyncWriteExt;

use neofs_util::error::Error;

pub struct BlockStore {
	data_dir: PathBuf,
}

/// Block ids are supplied by the coordinator and not parsed; only
/// path-unsafe characters are sanitized before use as a file name
/// (`/` becomes `_`).
pub fn sanitize_block_id(block_id: &str) -> String {
	block_id.replace('/', "_")
}

impl BlockStore {
	pub fn new(data_dir: PathBuf) -> Self {
		Self { data_dir }
	}

	fn path_for(&self, block_id: &str) -> PathBuf {
		let mut path = self.data_dir.clone();
		path.push(format!("{}.blk", sanitize_block_id(block_id)));
		path
	}

	/// Ensure the storage directory exists.
	pub async fn init(&self) -> Result<(), Error> {
		fs::create_dir_all(&self.data_dir).await?;
		Ok(())
	}

	/// PutBlock: overwrites any existing block with that id. Writes to
	/// a temp file first and renames into place so a concurrent
	/// GetBlock never observes a partial write.
	pub async fn put(&self, block_id: &str, data: &[u8]) -> Result<(), Error> {
		let path = self.path_for(block_id);
		let mut tmp_path = path.clone();
		tmp_path.set_extension("blk.tmp");

		let mut f = fs::File::create(&tmp_path).await?;
		f.write_all(data).await?;
		f.sync_all().await?;
		drop(f);

		fs::rename(&tmp_path, &path).await?;
		Ok(())
	}

	/// GetBlock: returns the stored bytes, or `NotFound`.
	pub async fn get(&self, block_id: &str) -> Result<Vec<u8>, Error> {
		let path = self.path_for(block_id);
		match fs::read(&path).await {
			Ok(data) => Ok(data),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				Err(Error::NotFound(format!("block {}", block_id)))
			}
			Err(e) => Err(e.into()),
		}
	}

	/// DeleteBlock: removes the block. NotFound is reported to the
	/// caller so it can decide whether it matters — for the coordinator
	/// fan-out it does not.
	pub async fn delete(&self, block_id: &str) -> Result<(), Error> {
		let path = self.path_for(block_id);
		match fs::remove_file(&path).await {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				Err(Error::NotFound(format!("block {}", block_id)))
			}
			Err(e) => Err(e.into()),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[tokio::test]
	async fn put_get_delete_round_trip() {
		let dir = mktemp::Temp::new_dir().unwrap();
		let store = BlockStore::new(dir.to_path_buf());
		store.init().await.unwrap();

		store.put("a.txt__blk0", b"abc").await.unwrap();
		assert_eq!(store.get("a.txt__blk0").await.unwrap(), b"abc");

		store.delete("a.txt__blk0").await.unwrap();
		assert!(matches!(store.get("a.txt__blk0").await, Err(Error::NotFound(_))));
	}

	#[tokio::test]
	async fn get_missing_is_not_found() {
		let dir = mktemp::Temp::new_dir().unwrap();
		let store = BlockStore::new(dir.to_path_buf());
		store.init().await.unwrap();
		assert!(matches!(store.get("nope").await, Err(Error::NotFound(_))));
	}

	#[tokio::test]
	async fn delete_missing_is_not_found_not_fatal() {
		let dir = mktemp::Temp::new_dir().unwrap();
		let store = BlockStore::new(dir.to_path_buf());
		store.init().await.unwrap();
		assert!(matches!(store.delete("nope").await, Err(Error::NotFound(_))));
	}

	#[test]
	fn sanitizes_slashes() {
		assert_eq!(sanitize_block_id("a/b__blk0"), "a_b__blk0");
	}
}
