// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed-capacity byte FIFO shared between an interrupt handler and the main loop.
//!
//! The queue is declared as a `static` and split once into a [`Producer`] and a [`Consumer`].
//! Each handle is handed to exactly one execution context, so the only possible race is producer
//! against consumer. Every push, pop and length read runs inside a short critical section that
//! covers the index bookkeeping and the single byte copy.
//!
//! When full, [`Producer::push`] overwrites the oldest unread byte, so the freshest bytes win.
//! Use [`Producer::try_push`] where dropping is not acceptable.
//!
//! ```
//! use forcerig::serial::fifo::Fifo;
//!
//! static QUEUE: Fifo<3> = Fifo::new();
//!
//! let (mut tx, mut rx) = QUEUE.split().unwrap();
//! for b in 1..=4 {
//!     tx.push(b);
//! }
//! assert_eq!(rx.pop(), Some(2));
//! assert_eq!(rx.overruns(), 1);
//! ```

use core::cell::RefCell;
use core::convert::Infallible;

use critical_section::Mutex;

struct Ring<const N: usize> {
    buf: [u8; N],
    head: usize,
    tail: usize,
    len: usize,
    overruns: u32,
    split: bool,
}

impl<const N: usize> Ring<N> {
    fn push(&mut self, byte: u8) -> Option<u8> {
        let evicted = if self.len == N {
            // head == tail here, so the slot being written holds the oldest byte.
            let old = self.buf[self.tail];
            self.tail = (self.tail + 1) % N;
            self.overruns = self.overruns.wrapping_add(1);
            Some(old)
        } else {
            self.len += 1;
            None
        };
        self.buf[self.head] = byte;
        self.head = (self.head + 1) % N;
        evicted
    }

    fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        let byte = self.buf[self.tail];
        self.tail = (self.tail + 1) % N;
        self.len -= 1;
        Some(byte)
    }
}

/// Interrupt-safe single-producer/single-consumer byte queue.
pub struct Fifo<const N: usize> {
    ring: Mutex<RefCell<Ring<N>>>,
}

impl<const N: usize> Fifo<N> {
    pub const fn new() -> Self {
        assert!(N > 0, "fifo capacity must be non-zero");
        Self {
            ring: Mutex::new(RefCell::new(Ring {
                buf: [0; N],
                head: 0,
                tail: 0,
                len: 0,
                overruns: 0,
                split: false,
            })),
        }
    }

    /// Hand out the producer and consumer handles. Only the first call succeeds.
    pub fn split(&self) -> Option<(Producer<'_, N>, Consumer<'_, N>)> {
        let first = critical_section::with(|cs| {
            let mut ring = self.ring.borrow_ref_mut(cs);
            !core::mem::replace(&mut ring.split, true)
        });
        if first {
            Some((Producer { fifo: self }, Consumer { fifo: self }))
        } else {
            None
        }
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    fn with<R>(&self, f: impl FnOnce(&mut Ring<N>) -> R) -> R {
        critical_section::with(|cs| {
            let mut ring = self.ring.borrow_ref_mut(cs);
            f(&mut *ring)
        })
    }

    fn len(&self) -> usize {
        self.with(|r| r.len)
    }
}

impl<const N: usize> Default for Fifo<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write side of a [`Fifo`].
pub struct Producer<'a, const N: usize> {
    fifo: &'a Fifo<N>,
}

impl<'a, const N: usize> Producer<'a, N> {
    /// Append a byte. If the queue is full, the oldest byte is dropped and returned.
    #[inline]
    pub fn push(&mut self, byte: u8) -> Option<u8> {
        self.fifo.with(|r| r.push(byte))
    }

    /// Append a byte only if there is room.
    pub fn try_push(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        self.fifo.with(|r| {
            if r.len == N {
                Err(nb::Error::WouldBlock)
            } else {
                r.push(byte);
                Ok(())
            }
        })
    }

    /// Offer `byte` to `bypass` while the queue is empty; append it if `bypass` declines.
    ///
    /// The emptiness check, `bypass` and the append happen in one critical section, so the
    /// consumer cannot drain the queue in between.
    pub fn push_or_bypass(
        &mut self,
        byte: u8,
        bypass: impl FnOnce(u8) -> bool,
    ) -> nb::Result<(), Infallible> {
        self.fifo.with(|r| {
            if r.len == 0 && bypass(byte) {
                Ok(())
            } else if r.len == N {
                Err(nb::Error::WouldBlock)
            } else {
                r.push(byte);
                Ok(())
            }
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fifo.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        N
    }
}

/// Read side of a [`Fifo`].
pub struct Consumer<'a, const N: usize> {
    fifo: &'a Fifo<N>,
}

impl<'a, const N: usize> Consumer<'a, N> {
    /// Remove the oldest byte, or `None` if the queue is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<u8> {
        self.fifo.with(|r| r.pop())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fifo.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        N
    }

    /// Bytes lost to overwrite-on-full since startup (wrapping).
    pub fn overruns(&self) -> u32 {
        self.fifo.with(|r| r.overruns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_only_once() {
        let fifo: Fifo<4> = Fifo::new();
        assert!(fifo.split().is_some());
        assert!(fifo.split().is_none());
    }

    #[test]
    fn wraps_around() {
        let fifo: Fifo<3> = Fifo::new();
        let (mut tx, mut rx) = fifo.split().unwrap();
        for round in 0..10u8 {
            tx.push(round);
            tx.push(round.wrapping_add(100));
            assert_eq!(rx.pop(), Some(round));
            assert_eq!(rx.pop(), Some(round.wrapping_add(100)));
            assert_eq!(rx.pop(), None);
        }
        assert_eq!(rx.overruns(), 0);
    }

    #[test]
    fn overwrite_returns_evicted_byte() {
        let fifo: Fifo<2> = Fifo::new();
        let (mut tx, mut rx) = fifo.split().unwrap();
        assert_eq!(tx.push(1), None);
        assert_eq!(tx.push(2), None);
        assert!(tx.is_full());
        assert_eq!(tx.push(3), Some(1));
        assert_eq!(tx.push(4), Some(2));
        assert_eq!(rx.len(), 2);
        assert_eq!(rx.pop(), Some(3));
        assert_eq!(rx.pop(), Some(4));
        assert!(rx.is_empty());
        assert_eq!(rx.overruns(), 2);
    }

    #[test]
    fn try_push_refuses_when_full() {
        let fifo: Fifo<1> = Fifo::new();
        let (mut tx, mut rx) = fifo.split().unwrap();
        assert_eq!(tx.try_push(7), Ok(()));
        assert_eq!(tx.try_push(8), Err(nb::Error::WouldBlock));
        assert_eq!(rx.pop(), Some(7));
        assert_eq!(tx.try_push(9), Ok(()));
        assert_eq!(rx.pop(), Some(9));
        assert_eq!(rx.overruns(), 0);
    }

    #[test]
    fn bypass_only_offered_on_empty_queue() {
        let fifo: Fifo<2> = Fifo::new();
        let (mut tx, mut rx) = fifo.split().unwrap();
        let mut taken = Vec::new();

        assert_eq!(tx.push_or_bypass(1, |b| { taken.push(b); true }), Ok(()));
        assert!(tx.is_empty());

        // Declined: the byte is queued instead.
        assert_eq!(tx.push_or_bypass(2, |_| false), Ok(()));
        assert_eq!(tx.push_or_bypass(3, |_| panic!("queue not empty")), Ok(()));
        assert_eq!(
            tx.push_or_bypass(4, |_| panic!("queue not empty")),
            Err(nb::Error::WouldBlock)
        );

        assert_eq!(taken, [1]);
        assert_eq!(rx.pop(), Some(2));
        assert_eq!(rx.pop(), Some(3));
        assert_eq!(rx.pop(), None);
        assert_eq!(rx.overruns(), 0);
    }
}
