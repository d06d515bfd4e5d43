use std::io;
use std::ops::Deref;

use bytes::{Bytes, BytesMut};
use spin::Mutex;

/// Source of reusable write buffers for the codecs.
pub trait BufferPool: Send + Sync {
	/// Hand out an empty buffer with at least `min_capacity` bytes of capacity.
	fn rent(&self, min_capacity: usize) -> BytesMut;

	/// Take back a buffer previously handed out by [`BufferPool::rent`].
	fn give_back(&self, buffer: BytesMut);
}

/// Free-list pool of `BytesMut` slabs behind a spin lock.
///
/// At most `max_retained` buffers are kept; buffers that grew beyond
/// `max_capacity` are released instead of retained.
#[derive(Debug)]
pub struct SlabBufferPool {
	free_list: Mutex<Vec<BytesMut>>,
	max_retained: usize,
	max_capacity: usize,
}

impl Default for SlabBufferPool {
	fn default() -> Self {
		Self::new(Self::DEFAULT_MAX_RETAINED, Self::DEFAULT_MAX_CAPACITY)
	}
}

impl SlabBufferPool {
	/// Default number of retained buffers.
	pub const DEFAULT_MAX_RETAINED: usize = 32;
	/// Default largest buffer capacity kept for reuse.
	pub const DEFAULT_MAX_CAPACITY: usize = 1 << 20;
	/// Capacity of freshly allocated buffers when the request is smaller.
	pub const DEFAULT_CAPACITY: usize = 1024;

	/// Create a pool with explicit retention bounds.
	pub fn new(max_retained: usize, max_capacity: usize) -> Self {
		Self {
			free_list: Mutex::new(Vec::new()),
			max_retained,
			max_capacity,
		}
	}

	/// Number of buffers currently parked in the free list.
	pub fn retained(&self) -> usize {
		self.free_list.lock().len()
	}
}

impl BufferPool for SlabBufferPool {
	fn rent(&self, min_capacity: usize) -> BytesMut {
		let reused = {
			let mut list = self.free_list.lock();
			list.iter().position(|buf| buf.capacity() >= min_capacity).map(|index| list.swap_remove(index))
		};
		match reused {
			Some(mut buf) => {
				buf.clear();
				buf
			}
			None => BytesMut::with_capacity(min_capacity.max(Self::DEFAULT_CAPACITY)),
		}
	}

	fn give_back(&self, mut buffer: BytesMut) {
		if buffer.capacity() == 0 || buffer.capacity() > self.max_capacity {
			return;
		}
		buffer.clear();
		let mut list = self.free_list.lock();
		if list.len() < self.max_retained {
			list.push(buffer);
		}
	}
}

/// Write buffer rented from a [`BufferPool`], returned to it on drop.
///
/// Without a pool the buffer is allocated directly and simply freed.
pub struct PooledBuffer<'p> {
	buffer: BytesMut,
	pool: Option<&'p dyn BufferPool>,
}

impl<'p> PooledBuffer<'p> {
	/// Rent from `pool`, or allocate directly when `pool` is `None`.
	pub fn rent(pool: Option<&'p dyn BufferPool>, min_capacity: usize) -> Self {
		let buffer = match pool {
			Some(pool) => pool.rent(min_capacity),
			None => BytesMut::with_capacity(min_capacity),
		};
		Self { buffer, pool }
	}

	/// Directly allocated buffer that belongs to no pool.
	pub fn unpooled(min_capacity: usize) -> Self {
		Self::rent(None, min_capacity)
	}

	/// Written bytes.
	pub fn as_slice(&self) -> &[u8] {
		&self.buffer
	}

	/// Number of written bytes.
	pub fn len(&self) -> usize {
		self.buffer.len()
	}

	/// Whether nothing has been written.
	pub fn is_empty(&self) -> bool {
		self.buffer.is_empty()
	}

	/// Detach the written bytes; the storage leaves the pool for good.
	pub fn into_bytes(mut self) -> Bytes {
		std::mem::take(&mut self.buffer).freeze()
	}
}

impl Deref for PooledBuffer<'_> {
	type Target = [u8];

	fn deref(&self) -> &[u8] {
		&self.buffer
	}
}

impl AsRef<[u8]> for PooledBuffer<'_> {
	fn as_ref(&self) -> &[u8] {
		&self.buffer
	}
}

impl io::Write for PooledBuffer<'_> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.buffer.extend_from_slice(buf);
		Ok(buf.len())
	}

	fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
		self.buffer.extend_from_slice(buf);
		Ok(())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl std::fmt::Debug for PooledBuffer<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PooledBuffer").field("len", &self.buffer.len()).field("pooled", &self.pool.is_some()).finish()
	}
}

impl Drop for PooledBuffer<'_> {
	fn drop(&mut self) {
		if let Some(pool) = self.pool {
			pool.give_back(std::mem::take(&mut self.buffer));
		}
	}
}
