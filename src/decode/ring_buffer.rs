//! Fixed-capacity queue of decoded frames between the frame assembler and a
//! reader. Overflow silently drops the oldest unread entry — this is a
//! documented policy, not an error.
//!
//! Grounded on the C `SMPTEDecoder`'s `qWritePos`/`qLen` circular queue in
//! `original_source/src/decoder.c`'s `ltc_decode`, rendered as a plain
//! `Vec<Option<T>>` with two mod-`N` indices.

pub(crate) struct RingBuffer<T> {
    buf: Vec<Option<T>>,
    capacity: usize,
    write: usize,
    read: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut buf = Vec::with_capacity(capacity);
        buf.resize_with(capacity, || None);
        Self {
            buf,
            capacity,
            write: 0,
            read: 0,
            len: 0,
        }
    }

    /// Push a new entry. When full, overwrites the oldest unread entry and
    /// advances the read index to match.
    pub(crate) fn push(&mut self, item: T) {
        let overwrote = self.len == self.capacity;
        self.buf[self.write] = Some(item);
        self.write = (self.write + 1) % self.capacity;
        if overwrote {
            self.read = (self.read + 1) % self.capacity;
            log::debug!("ltc decoder ring buffer full, dropped oldest frame");
        } else {
            self.len += 1;
        }
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.buf[self.read].take();
        self.read = (self.read + 1) % self.capacity;
        self.len -= 1;
        item
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn clear(&mut self) {
        for slot in &mut self.buf {
            *slot = None;
        }
        self.write = 0;
        self.read = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_drops_oldest() {
        let mut rb = RingBuffer::new(3);
        rb.push(1);
        rb.push(2);
        rb.push(3);
        rb.push(4);
        assert_eq!(rb.len(), 3);
        assert_eq!(rb.pop(), Some(2));
        assert_eq!(rb.pop(), Some(3));
        assert_eq!(rb.pop(), Some(4));
        assert_eq!(rb.pop(), None);
    }

    #[test]
    fn flush_empties_queue() {
        let mut rb = RingBuffer::new(4);
        rb.push(1);
        rb.push(2);
        rb.clear();
        assert_eq!(rb.len(), 0);
        assert_eq!(rb.pop(), None);
    }

    #[test]
    fn fifo_order_preserved_without_overflow() {
        let mut rb: RingBuffer<i32> = RingBuffer::new(5);
        for i in 0..4 {
            rb.push(i);
        }
        assert_eq!(rb.len(), 4);
        for i in 0..4 {
            assert_eq!(rb.pop(), Some(i));
        }
    }
}
